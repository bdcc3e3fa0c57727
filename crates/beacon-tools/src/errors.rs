//! Tool invocation errors.

/// Error returned by a tool invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments were present but unusable.
    #[error("invalid arguments: {message}")]
    InvalidArgs {
        /// Description of what is wrong.
        message: String,
    },

    /// The tool ran but failed.
    #[error("{message}")]
    Failed {
        /// Description.
        message: String,
    },
}
