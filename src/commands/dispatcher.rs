use super::{
    handler::{
        ClearCommand, DocCommand, HelpCommand, ModelCommand, OpenCommand, QuitCommand,
        QuizCommand, ResetCommand, SaveCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::DocChatError;
use crate::session::Session;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        session: &mut Session,
    ) -> Result<Option<String>, DocChatError> {
        self.registry.execute(command, args, session)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("help", HelpCommand);
    registry.register("quit", QuitCommand);
    registry.register("open", OpenCommand);
    registry.register("doc", DocCommand);
    registry.register("quiz", QuizCommand);
    registry.register("reset", ResetCommand);
    registry.register("clear", ClearCommand);
    registry.register("model", ModelCommand);
    registry.register("save", SaveCommand);

    CommandDispatcher::new(Arc::new(registry))
}
