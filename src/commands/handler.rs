use crate::config::Config;
use crate::core::error::DocChatError;
use crate::extract::SUPPORTED_EXTENSIONS;
use crate::session::{Document, Session};
use std::path::Path;

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, session: &mut Session, args: &[&str])
    -> Result<Option<String>, DocChatError>;
    fn help(&self) -> &'static str;
}

pub struct HelpCommand;
pub struct QuitCommand;
pub struct OpenCommand;
pub struct DocCommand;
pub struct QuizCommand;
pub struct ResetCommand;
pub struct ClearCommand;
pub struct ModelCommand;
pub struct SaveCommand;

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, DocChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            HelpCommand.help().to_string(),
            OpenCommand.help().to_string(),
            DocCommand.help().to_string(),
            QuizCommand.help().to_string(),
            ResetCommand.help().to_string(),
            ClearCommand.help().to_string(),
            ModelCommand.help().to_string(),
            SaveCommand.help().to_string(),
            QuitCommand.help().to_string(),
            String::new(),
            "Anything not starting with '/' is asked as a question about the active document."
                .to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for QuitCommand {
    fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, DocChatError> {
        session.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for OpenCommand {
    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<Option<String>, DocChatError> {
        if args.is_empty() {
            return Ok(Some(format!(
                "Usage: /open <path> (supported: {})",
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        let path = args.join(" ");
        let document = Document::from_path(Path::new(&path))?;
        let name = document.name.clone();
        let chars = document.content.chars().count();

        if session.load_document(document) {
            Ok(Some(format!(
                "Loaded {} ({} chars). Conversation cleared.",
                name, chars
            )))
        } else {
            Ok(Some(format!(
                "{} is already the active document; conversation kept.",
                name
            )))
        }
    }

    fn help(&self) -> &'static str {
        "/open <path> - Load a document (txt, md, pdf, docx, xlsx, xls, csv)"
    }
}

impl CommandHandler for DocCommand {
    fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, DocChatError> {
        match &session.document {
            Some(doc) => Ok(Some(format!(
                "Active document: {} ({}, {} chars); {} turn(s) in conversation.",
                doc.name,
                doc.format,
                doc.content.chars().count(),
                session.conversation.len()
            ))),
            None => Ok(Some("No document loaded. Use /open <path>.".to_string())),
        }
    }

    fn help(&self) -> &'static str {
        "/doc - Show the active document"
    }
}

impl CommandHandler for QuizCommand {
    fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, DocChatError> {
        if session.document.is_none() {
            return Ok(Some(
                "No document loaded. Use /open <path> first.".to_string(),
            ));
        }
        if session.quiz_generated {
            return Ok(Some(
                "A quiz was already generated for this document. /reset to request another."
                    .to_string(),
            ));
        }

        // The actual gateway call is async; the application loop picks
        // this up after dispatch, like `should_continue` for /quit.
        session.quiz_requested = true;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quiz - Generate one study question from the document"
    }
}

impl CommandHandler for ResetCommand {
    fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, DocChatError> {
        session.reset_conversation();
        Ok(Some("Conversation cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/reset - Clear the conversation (keeps the document)"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(
        &self,
        session: &mut Session,
        _args: &[&str],
    ) -> Result<Option<String>, DocChatError> {
        session.clear_document();
        Ok(Some("Document and conversation cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Clear the document and the conversation"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<Option<String>, DocChatError> {
        if args.is_empty() {
            Ok(Some(format!("Current model: {}", session.model)))
        } else {
            let new_model = args[0].to_string();
            session.provider.set_model(&new_model);
            session.model = new_model;
            Ok(Some(format!("Model changed to: {}", session.model)))
        }
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the current model"
    }
}

impl CommandHandler for SaveCommand {
    fn execute(&self, session: &mut Session, args: &[&str]) -> Result<Option<String>, DocChatError> {
        if session.conversation.is_empty() {
            return Ok(Some("Nothing to save yet.".to_string()));
        }

        let filename = if args.is_empty() {
            chrono::Local::now()
                .format("%Y%m%d_%H%M%S.json")
                .to_string()
        } else {
            args[0].to_string()
        };

        let transcript_dir = Config::transcript_dir();
        std::fs::create_dir_all(&transcript_dir)?;
        let path = transcript_dir.join(filename);

        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &session.conversation.all())?;

        Ok(Some(format!("Transcript saved to: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/save <filename> - Export the transcript as JSON"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DocumentFormat;
    use crate::providers::{LLMProvider, Message};
    use futures::stream::BoxStream;
    use std::io::Write;

    struct NullProvider;

    #[async_trait::async_trait]
    impl LLMProvider for NullProvider {
        async fn get_response(&self, _messages: &[Message]) -> Result<String, DocChatError> {
            Err(DocChatError::Gateway("null provider".to_string()))
        }

        async fn get_response_stream(
            &self,
            _messages: &[Message],
        ) -> Result<BoxStream<'static, Result<String, DocChatError>>, DocChatError> {
            Err(DocChatError::Gateway("null provider".to_string()))
        }

        fn set_model(&mut self, _model: &str) {}

        fn clone_provider(&self) -> Box<dyn LLMProvider> {
            Box::new(NullProvider)
        }
    }

    fn session() -> Session {
        Session::new(Box::new(NullProvider), "test-model")
    }

    #[test]
    fn open_loads_a_document_and_reports_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"some notes").unwrap();

        let mut session = session();
        let path_str = path.to_string_lossy().into_owned();
        let output = OpenCommand
            .execute(&mut session, &[path_str.as_str()])
            .unwrap();

        assert!(output.unwrap().contains("notes.txt"));
        assert_eq!(session.document.as_ref().unwrap().content, "some notes");
    }

    #[test]
    fn open_rejects_unsupported_extensions_without_touching_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.exe");
        std::fs::write(&path, b"MZ").unwrap();

        let mut session = session();
        session.load_document(crate::session::Document {
            name: "keep.txt".to_string(),
            format: DocumentFormat::Txt,
            content: "keep me".to_string(),
        });
        session.conversation.append(Message::user("q"));

        let path_str = path.to_string_lossy().into_owned();
        let err = OpenCommand
            .execute(&mut session, &[path_str.as_str()])
            .unwrap_err();

        assert!(matches!(err, DocChatError::UnsupportedFormat(_)));
        assert_eq!(session.document.as_ref().unwrap().name, "keep.txt");
        assert_eq!(session.conversation.len(), 1);
    }

    #[test]
    fn quiz_requires_a_document() {
        let mut session = session();
        let output = QuizCommand.execute(&mut session, &[]).unwrap();
        assert!(output.unwrap().contains("No document"));
        assert!(!session.quiz_requested);
    }

    #[test]
    fn quiz_is_gated_until_reset() {
        let mut session = session();
        session.load_document(crate::session::Document {
            name: "a.txt".to_string(),
            format: DocumentFormat::Txt,
            content: "alpha".to_string(),
        });

        assert!(QuizCommand.execute(&mut session, &[]).unwrap().is_none());
        assert!(session.quiz_requested);

        session.quiz_requested = false;
        session.quiz_generated = true;
        let output = QuizCommand.execute(&mut session, &[]).unwrap();
        assert!(output.unwrap().contains("already generated"));
        assert!(!session.quiz_requested);

        ResetCommand.execute(&mut session, &[]).unwrap();
        assert!(QuizCommand.execute(&mut session, &[]).unwrap().is_none());
        assert!(session.quiz_requested);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut session = session();
        QuitCommand.execute(&mut session, &[]).unwrap();
        assert!(!session.should_continue);
    }
}
