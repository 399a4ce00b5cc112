mod commands;
mod context;
mod history;

use thiserror::Error;

use crate::error::DocumentError;

pub use commands::Command;
pub use context::CommandContext;
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The command refers to document state that does not exist
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// The undo stack is empty
    #[error("nothing to undo")]
    NothingToUndo,
    /// The redo stack is empty
    #[error("nothing to redo")]
    NothingToRedo,
}
