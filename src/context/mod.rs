//! Builds the exact message sequence sent to the completion gateway.
//!
//! Two framings, chosen by conversation state: the first exchange for a
//! document inlines it in the user turn with no system role; every later
//! exchange carries the document in a synthesized system turn, replays the
//! stored history in order, and appends the new question. Output is
//! byte-identical for identical inputs.

use crate::providers::Message;
use crate::session::{Conversation, Document};

pub fn assemble(
    document: &Document,
    conversation: &Conversation,
    question: &str,
) -> Vec<Message> {
    if conversation.is_empty() {
        return vec![Message::user(format!(
            "Here is the content of the document:\n\n{}\n\n---\n\n{}",
            document.content, question
        ))];
    }

    let mut messages = Vec::with_capacity(conversation.len() + 2);
    messages.push(Message::system(format!(
        "{}\n\n{}",
        SYSTEM_PROMPT_FOR_DOCUMENT, document.content
    )));
    messages.extend(conversation.all().iter().cloned());
    messages.push(Message::user(question));
    messages
}

/// Message list for a quiz request: educator persona plus the full
/// document text, asking for exactly one question.
pub fn quiz_messages(document: &Document) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT_FOR_QUIZ),
        Message::user(format!(
            "Here is the content of the document:\n\n{}\n\n---\n\n{}",
            document.content, QUIZ_REQUEST
        )),
    ]
}

const SYSTEM_PROMPT_FOR_DOCUMENT: &str = "You are a helpful assistant answering questions about \
a document the user has uploaded. Ground every answer in the document content below. If the \
document does not contain the answer, say so.\n\nDocument content:";

const SYSTEM_PROMPT_FOR_QUIZ: &str = "You are an educator helping a student study a document. \
Write exactly one question about the document, either multiple-choice with four options or a \
short free-form question. Do not include the answer.";

const QUIZ_REQUEST: &str = "Generate one quiz question from this document.";
