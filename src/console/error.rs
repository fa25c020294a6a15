//! Console errors

use crate::core::TransformError;

/// Error returned by frame hooks
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by console operations
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("console size {width}x{height} must be positive")]
    InvalidSize { width: i32, height: i32 },

    #[error("position ({x}, {y}) out of bounds")]
    OutOfBounds { x: i32, y: i32 },

    #[error("sub-console ({x}, {y}, {width}x{height}) is out of bounds")]
    SubConsoleOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("{0} is not permitted on a sub-console")]
    NotPermittedOnSubConsole(&'static str),

    #[error("priority of the root console can't be changed")]
    PriorityOnRoot,

    #[error("no transform given")]
    NoTransform,

    #[error("sub-console not found")]
    SubConsoleNotFound,

    #[error("component {0:?} not found")]
    ComponentNotFound(String),

    #[error("console has been removed from its parent")]
    Detached,

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("hook failed: {0}")]
    Hook(#[source] HookError),

    #[error("host error: {0}")]
    Host(String),
}
