// src/engine/mod.rs

//! Orchestration engine.
//!
//! The [`Runtime`] is the single loop that:
//! - consumes filesystem [`ChangeEvent`]s and folds them through the watch
//!   rules into the debouncer,
//! - submits each coalesced task set to the scheduler once its window
//!   elapses,
//! - pushes a live reload notification after a successful re-run,
//! - exits on shutdown or when the event source closes.
//!
//! Runs execute inline in the loop, so submissions arriving while a run is
//! active queue naturally in the event channel and are debounced afresh
//! afterwards, against the latest file state.
//!
//! [`ChangeEvent`]: crate::watch::ChangeEvent

pub mod runtime;

pub use runtime::{Runtime, RuntimeOptions};
