//! Crate error type.

/// Errors surfaced by the scene bridge.
///
/// A missing engine handle is not an error: operations invoked before startup
/// or after teardown are skipped.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The engine's binary module could not be fetched or initialized.
    #[error("engine module failed to load: {0}")]
    ModuleLoad(String),
    /// Document listener registration could not be redirected to the surface.
    #[error("listener redirection failed: {0}")]
    Redirect(String),
    /// The engine object could not be constructed.
    #[error("engine construction failed: {0}")]
    Construct(String),
    /// A call on the engine handle threw.
    #[error("engine call `{method}` failed: {message}")]
    Engine { method: String, message: String },
    /// A call on the module's virtual filesystem threw.
    #[error("filesystem call `{method}` failed: {message}")]
    Fs { method: String, message: String },
    /// The engine emitted an event name outside the known set.
    #[error("unknown scene event: {0}")]
    UnknownEvent(String),
    /// An engine event payload did not have the expected shape.
    #[error("malformed `{event}` payload: {source}")]
    Payload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// Scene options failed to parse or validate.
    #[error("invalid scene options: {0}")]
    Options(String),
    /// Any other host platform failure.
    #[error("platform error: {0}")]
    Platform(String),
}

impl SceneError {
    /// Whether this error belongs to the startup sequence (module load,
    /// redirection, engine construction or `start`).
    #[must_use]
    pub fn is_initialization(&self) -> bool {
        match self {
            Self::ModuleLoad(_) | Self::Redirect(_) | Self::Construct(_) => true,
            Self::Engine { method, .. } => method == "start",
            _ => false,
        }
    }
}
