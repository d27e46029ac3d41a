use crate::cli::Args;
use crate::commands::dispatcher::CommandDispatcher;
use crate::context;
use crate::core::error::DocChatError;
use crate::display;
use crate::extract::DocumentFormat;
use crate::input;
use crate::providers::{LLMProvider, Message};
use crate::session::{Document, Session};
use futures::StreamExt;
use is_terminal::IsTerminal;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

/// Run one question/answer exchange against the active document.
///
/// The user turn is appended only after the gateway call has fully
/// succeeded, so a failed or interrupted call leaves the conversation
/// exactly as it was with no orphaned question.
pub async fn exchange(
    session: &mut Session,
    question: &str,
    on_chunk: &mut dyn FnMut(&str),
) -> Result<String, DocChatError> {
    let document = session.document.as_ref().ok_or_else(|| {
        DocChatError::Input("No document loaded. Use /open <path> first.".to_string())
    })?;

    let messages = context::assemble(document, &session.conversation, question);
    debug!(turns = messages.len(), "submitting exchange");

    let mut stream = session.provider.get_response_stream(&messages).await?;
    let mut answer = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        on_chunk(&chunk);
        answer.push_str(&chunk);
    }
    drop(stream);

    session.conversation.append(Message::user(question));
    session.conversation.append(Message::assistant(answer.clone()));
    Ok(answer)
}

/// Generate one quiz question from the active document and append it as a
/// single assistant turn. Gated until the conversation is reset.
pub async fn generate_quiz(
    session: &mut Session,
    on_chunk: &mut dyn FnMut(&str),
) -> Result<String, DocChatError> {
    let document = session.document.as_ref().ok_or_else(|| {
        DocChatError::Input("No document loaded. Use /open <path> first.".to_string())
    })?;
    if session.quiz_generated {
        return Err(DocChatError::Input(
            "A quiz was already generated for this document. /reset to request another."
                .to_string(),
        ));
    }

    let messages = context::quiz_messages(document);
    let mut stream = session.provider.get_response_stream(&messages).await?;
    let mut question = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        on_chunk(&chunk);
        question.push_str(&chunk);
    }
    drop(stream);

    session.conversation.append(Message::assistant(question.clone()));
    session.quiz_generated = true;
    Ok(question)
}

pub struct Application {
    pub args: Args,
    pub provider: Box<dyn LLMProvider>,
    pub command_dispatcher: CommandDispatcher,
    pub model: String,
}

impl Application {
    pub fn new(
        args: Args,
        provider: Box<dyn LLMProvider>,
        command_dispatcher: CommandDispatcher,
        model: String,
    ) -> Self {
        Self {
            args,
            provider,
            command_dispatcher,
            model,
        }
    }

    pub async fn run(&mut self) -> Result<(), DocChatError> {
        let mut session = Session::new(self.provider.clone_provider(), &self.model);

        // Piped stdin is ingested as a plain-text document.
        let piped = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| DocChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        if let Some(path) = self.args.file.clone() {
            self.open_document(&mut session, &path)?;
        } else if let Some(text) = piped {
            session.load_document(Document {
                name: "stdin".to_string(),
                format: DocumentFormat::Txt,
                content: text,
            });
        }

        if self.args.quiz || self.args.query.is_some() {
            self.run_one_shot(&mut session).await
        } else if !io::stdin().is_terminal() {
            Err(DocChatError::Input(
                "No question provided (stdin is not a terminal)".to_string(),
            ))
        } else {
            self.run_interactive(&mut session).await
        }
    }

    fn open_document(&self, session: &mut Session, path: &Path) -> Result<(), DocChatError> {
        let document = Document::from_path(path)?;
        let name = document.name.clone();
        let chars = document.content.chars().count();
        if session.load_document(document) {
            display::display_info(&format!("Loaded {} ({} chars).", name, chars));
        }
        Ok(())
    }

    /// Answer a single question (and/or quiz request), print, and exit.
    async fn run_one_shot(&self, session: &mut Session) -> Result<(), DocChatError> {
        if self.args.quiz {
            let document = session.document.as_ref().ok_or_else(|| {
                DocChatError::Input("No document given. Use --file or pipe one in.".to_string())
            })?;
            let messages = context::quiz_messages(document);
            let question = session.provider.get_response(&messages).await?;
            display::display_answer(&question);
            session.conversation.append(Message::assistant(question));
            session.quiz_generated = true;
        }

        if let Some(query) = self.args.query.clone() {
            let document = session.document.as_ref().ok_or_else(|| {
                DocChatError::Input("No document given. Use --file or pipe one in.".to_string())
            })?;
            let messages = context::assemble(document, &session.conversation, &query);
            let answer = session.provider.get_response(&messages).await?;
            display::display_answer(&answer);
            session.conversation.append(Message::user(query));
            session.conversation.append(Message::assistant(answer));
        }

        Ok(())
    }

    async fn run_interactive(&self, session: &mut Session) -> Result<(), DocChatError> {
        display::display_banner(&session.model);

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        loop {
            let input = match input::read_input(&mut editor)? {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(rest) = input.strip_prefix('/') {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                if parts.is_empty() {
                    continue;
                }
                let command = parts[0];
                let args = &parts[1..];

                match self.command_dispatcher.execute(command, args, session) {
                    Ok(Some(output)) => println!("{}", output),
                    Ok(None) => {}
                    Err(e) => display::display_error(&e),
                }

                if session.quiz_requested {
                    session.quiz_requested = false;
                    if let Err(e) = self.stream_quiz(session).await {
                        display::display_error(&e);
                    }
                }

                if !session.should_continue {
                    break;
                }
                continue;
            }

            if let Err(e) = self.stream_exchange(session, &input).await {
                display::display_error(&e);
            }
        }

        input::save_history(&mut editor)?;
        Ok(())
    }

    async fn stream_exchange(
        &self,
        session: &mut Session,
        question: &str,
    ) -> Result<(), DocChatError> {
        let answer = exchange(session, question, &mut print_chunk).await?;
        if !answer.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    async fn stream_quiz(&self, session: &mut Session) -> Result<(), DocChatError> {
        let question = generate_quiz(session, &mut print_chunk).await?;
        if !question.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}

fn print_chunk(chunk: &str) {
    if !chunk.is_empty() {
        print!("{}", chunk);
        let _ = io::stdout().flush();
    }
}
