//! Session-scoped state: the active document, the conversation log tied to
//! it, and the quiz gate. One session, one document, one writer.

use crate::core::error::DocChatError;
use crate::extract::{self, DocumentFormat};
use crate::providers::{LLMProvider, Message};
use std::path::Path;
use tracing::debug;

/// The active document: fully-extracted text plus the identity used to
/// decide whether an upload replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub format: DocumentFormat,
    pub content: String,
}

impl Document {
    pub fn from_path(path: &Path) -> Result<Self, DocChatError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DocChatError::UnsupportedFormat(String::new()))?;
        let format = DocumentFormat::from_extension(extension)
            .ok_or_else(|| DocChatError::UnsupportedFormat(extension.to_lowercase()))?;

        let bytes = std::fs::read(path)?;
        let content = extract::extract_as(&bytes, format)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(name = %name, format = %format, chars = content.len(), "document extracted");

        Ok(Document {
            name,
            format,
            content,
        })
    }
}

/// Append-only log of turns scoped to the active document. Turns are never
/// removed individually; the only removal is a whole-log `reset`.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    turns: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn append(&mut self, turn: Message) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

pub struct Session {
    pub document: Option<Document>,
    pub conversation: Conversation,
    pub quiz_generated: bool,
    pub provider: Box<dyn LLMProvider>,
    pub model: String,
    pub should_continue: bool,
    /// Set by the quiz command handler; the application loop consumes it.
    pub quiz_requested: bool,
}

impl Session {
    pub fn new(provider: Box<dyn LLMProvider>, model: &str) -> Self {
        Self {
            document: None,
            conversation: Conversation::new(),
            quiz_generated: false,
            provider,
            model: model.to_string(),
            should_continue: true,
            quiz_requested: false,
        }
    }

    /// Install a document. The conversation and the quiz gate are cleared
    /// exactly when the document identity (name + content) changes; an
    /// identical re-upload keeps the log.
    ///
    /// Returns `true` when the document was replaced.
    pub fn load_document(&mut self, document: Document) -> bool {
        if let Some(current) = &self.document {
            if current.name == document.name && current.content == document.content {
                return false;
            }
        }

        debug!(name = %document.name, "replacing active document");
        self.document = Some(document);
        self.reset_conversation();
        true
    }

    pub fn clear_document(&mut self) {
        self.document = None;
        self.reset_conversation();
    }

    pub fn reset_conversation(&mut self) {
        self.conversation.reset();
        self.quiz_generated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Role;
    use futures::stream::BoxStream;
    use pretty_assertions::assert_eq;

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

    fn doc(name: &str, content: &str) -> Document {
        Document {
            name: name.to_string(),
            format: DocumentFormat::Txt,
            content: content.to_string(),
        }
    }

    fn session() -> Session {
        Session::new(Box::new(NullProvider), "test-model")
    }

    #[test]
    fn new_document_empties_conversation_and_quiz_flag() {
        let mut session = session();
        session.load_document(doc("a.txt", "alpha"));
        session.conversation.append(Message::user("q"));
        session.conversation.append(Message::assistant("a"));
        session.quiz_generated = true;

        let replaced = session.load_document(doc("b.txt", "beta"));

        assert!(replaced);
        assert!(session.conversation.is_empty());
        assert!(!session.quiz_generated);
    }

    #[test]
    fn identical_reupload_keeps_conversation() {
        let mut session = session();
        session.load_document(doc("a.txt", "alpha"));
        session.conversation.append(Message::user("q"));

        let replaced = session.load_document(doc("a.txt", "alpha"));

        assert!(!replaced);
        assert_eq!(session.conversation.len(), 1);
    }

    #[test]
    fn same_name_new_content_still_resets() {
        let mut session = session();
        session.load_document(doc("a.txt", "v1"));
        session.conversation.append(Message::user("q"));

        assert!(session.load_document(doc("a.txt", "v2")));
        assert!(session.conversation.is_empty());
    }

    #[test]
    fn two_exchanges_produce_four_ordered_turns() {
        let mut session = session();
        session.load_document(doc("a.txt", "alpha"));

        session.conversation.append(Message::user("first?"));
        session.conversation.append(Message::assistant("one."));
        session.conversation.append(Message::user("second?"));
        session.conversation.append(Message::assistant("two."));

        let roles: Vec<Role> = session.conversation.all().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    #[test]
    fn clear_document_drops_everything() {
        let mut session = session();
        session.load_document(doc("a.txt", "alpha"));
        session.conversation.append(Message::user("q"));
        session.quiz_generated = true;

        session.clear_document();

        assert!(session.document.is_none());
        assert!(session.conversation.is_empty());
        assert!(!session.quiz_generated);
    }
}
