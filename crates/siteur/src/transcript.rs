//! Conversation state of the transit assistant.

use serde::{Deserialize, Serialize};

pub const GREETING: &str = "¡Hola! Soy tu asistente de transporte de \
                            Guadalajara. ¿En qué puedo ayudarte hoy?";
pub const PROMPT_PREFIX: &str =
    "Eres un asistente experto en SITEUR y Macrobus Guadalajara. Pregunta: ";
pub const EMPTY_REPLY_FALLBACK: &str = "Lo siento.";
pub const ERROR_REPLY: &str = "Error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

/// One outgoing request, tagged with the session that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub session: u64,
    pub prompt: String,
}

/// Outcome of a request as seen by the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// The service answered without any text.
    Empty,
    Failed,
}

/// Append-only transcript with at most one request in flight.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    session: u64,
    in_flight: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            session: 0,
            in_flight: false,
        }
    }
}

impl ChatSession {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Append the user turn and build the request for it.
    ///
    /// Returns `None` for blank input or while a reply is pending.
    pub fn send(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() || self.in_flight {
            return None;
        }
        self.messages.push(ChatMessage::user(text));
        self.in_flight = true;
        Some(ChatRequest {
            session: self.session,
            prompt: format!("{}{}", PROMPT_PREFIX, text),
        })
    }

    /// Record the reply to the request issued in `session`.
    ///
    /// Replies addressed to an earlier session are dropped.
    pub fn receive(&mut self, session: u64, reply: Reply) -> bool {
        if session != self.session || !self.in_flight {
            log::debug!("dropping assistant reply for session {}", session);
            return false;
        }
        let content = match reply {
            Reply::Text(text) if !text.is_empty() => text,
            Reply::Text(_) | Reply::Empty => EMPTY_REPLY_FALLBACK.to_string(),
            Reply::Failed => ERROR_REPLY.to_string(),
        };
        self.messages.push(ChatMessage::assistant(&content));
        self.in_flight = false;
        true
    }

    /// Start over from the greeting. Any pending reply becomes stale.
    pub fn reset(&mut self) {
        self.session += 1;
        self.messages = vec![ChatMessage::assistant(GREETING)];
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_starts_with_greeting() {
        let chat = ChatSession::default();
        assert_eq!(chat.messages(), &[ChatMessage::assistant(GREETING)]);
        assert!(!chat.is_busy());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut chat = ChatSession::default();
        assert_eq!(chat.send("   "), None);
        assert_eq!(chat.send(""), None);
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn test_network_error_appends_literal_error_turn() {
        let mut chat = ChatSession::default();
        let request = chat.send("¿Cómo llego a Oblatos?").unwrap();
        assert_eq!(
            request.prompt,
            "Eres un asistente experto en SITEUR y Macrobus Guadalajara. \
             Pregunta: ¿Cómo llego a Oblatos?"
        );
        assert!(chat.is_busy());
        assert_eq!(chat.messages().len(), 2);

        assert!(chat.receive(request.session, Reply::Failed));
        assert_eq!(
            chat.messages()[1..],
            [
                ChatMessage::user("¿Cómo llego a Oblatos?"),
                ChatMessage::assistant("Error."),
            ]
        );
        assert!(!chat.is_busy());
    }

    #[test]
    fn test_second_send_while_busy_is_rejected() {
        let mut chat = ChatSession::default();
        let first = chat.send("hola").unwrap();
        assert_eq!(chat.send("otra"), None);
        chat.receive(first.session, Reply::Text("Buenas".to_string()));
        assert_eq!(chat.messages().last().unwrap().content, "Buenas");
        assert!(chat.send("otra").is_some());
    }

    #[test]
    fn test_empty_reply_uses_fallback() {
        let mut chat = ChatSession::default();
        let request = chat.send("hola").unwrap();
        chat.receive(request.session, Reply::Empty);
        assert_eq!(chat.messages().last().unwrap().content, "Lo siento.");
    }

    #[test]
    fn test_reply_after_reset_is_dropped() {
        let mut chat = ChatSession::default();
        let request = chat.send("hola").unwrap();
        chat.reset();
        assert!(!chat.receive(request.session, Reply::Text("tarde".into())));
        assert_eq!(chat.messages().len(), 1);
        assert!(!chat.is_busy());
    }
}
