// src/config/mod.rs

//! Settings loading and validation.
//!
//! Settings are loaded once at startup into an immutable [`Settings`] value
//! that is passed explicitly into the scheduler, the watch rules and the
//! asset pipeline. There is no ambient global lookup.

pub mod loader;
pub mod model;

pub use loader::load_and_validate;
pub use model::{PathSettings, Settings};
