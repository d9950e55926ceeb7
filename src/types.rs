use std::fmt;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Build mode, passed through opaquely to the artifact transforms.
///
/// Production mode changes only transform behaviour (minification instead of
/// readable output); it never changes the shape of the task graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

/// Why a run was submitted to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// The initial full build at startup.
    ColdStart,
    /// A filesystem change matched one or more watch rules.
    FileChange,
}

/// One category of source material with its own watch rule and transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetClass {
    /// Static files copied verbatim into the output tree.
    Static,
    /// Page templates (plus partials/layouts feeding into them).
    Template,
    /// Style sheets, compiled into a single artifact.
    Style,
    /// Script modules, bundled into a single artifact.
    Script,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssetClass::Static => "static",
            AssetClass::Template => "template",
            AssetClass::Style => "style",
            AssetClass::Script => "script",
        };
        f.write_str(s)
    }
}
