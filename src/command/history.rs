use super::{Command, CommandContext, CommandError, CommandResult};

/// A command that has been applied, paired with the command that reverses it
#[derive(Debug, Clone)]
struct Applied {
    command: Command,
    inverse: Command,
}

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<Applied>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and add it to the history if successful
    pub fn execute(&mut self, command: Command, ctx: &mut CommandContext<'_>) -> CommandResult {
        let inverse = command.execute(ctx)?;
        log::debug!("Executed {}", command.name());

        self.undo_stack.push(Applied { command, inverse });
        self.redo_stack.clear(); // Clear redo stack when new command is executed
        Ok(())
    }

    /// Undo the last executed command
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let applied = self.undo_stack.pop().ok_or(CommandError::NothingToUndo)?;
        if let Err(err) = applied.inverse.execute(ctx) {
            log::error!("Undo of {} failed: {}", applied.command.name(), err);
            self.undo_stack.push(applied);
            return Err(err);
        }
        log::debug!("Undid {}", applied.command.name());
        self.redo_stack.push(applied.command);
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let command = self.redo_stack.pop().ok_or(CommandError::NothingToRedo)?;
        match command.execute(ctx) {
            Ok(inverse) => {
                log::debug!("Redid {}", command.name());
                self.undo_stack.push(Applied { command, inverse });
                Ok(())
            }
            Err(err) => {
                log::error!("Redo of {} failed: {}", command.name(), err);
                self.redo_stack.push(command);
                Err(err)
            }
        }
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_name(&self) -> Option<&'static str> {
        self.undo_stack.last().map(|applied| applied.command.name())
    }

    pub fn redo_name(&self) -> Option<&'static str> {
        self.redo_stack.last().map(Command::name)
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
