//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the run, so
//! `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lifegrid_core::config::ConfigError,
    },

    /// Grid construction or seeding failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: lifegrid_world::WorldError,
    },

    /// The controller failed to stop cleanly.
    #[error("controller error: {source}")]
    Controller {
        /// The underlying controller error.
        #[from]
        source: lifegrid_core::controller::ControllerError,
    },

    /// Logging could not be initialized.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}
