//! Cross-component messages delivered to the content side.
//!
//! # Responsibility
//! - Define the wire shape of messages sent by popup/quick-launch surfaces.
//! - Route "paste" into the tracked field with append semantics.
//!
//! # Invariants
//! - Handling never panics; failures come back as `ok=false` envelopes.
//! - Response messages never echo note text.

use crate::insert::focus::FocusTracker;
use crate::insert::target::InsertMode;
use log::info;
use serde::{Deserialize, Serialize};

/// Message sent from an extension surface to the content side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostMessage {
    /// Insert `value` into the currently tracked field.
    Paste { value: String },
}

/// Response envelope returned to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Whether the message took effect.
    pub ok: bool,
    /// Human-readable status for diagnostics/UI.
    pub message: String,
}

impl MessageResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Handles one decoded message against the focus context.
pub fn handle_message(focus: &FocusTracker, message: &HostMessage) -> MessageResponse {
    match message {
        HostMessage::Paste { value } => match focus.insert(value.as_str(), InsertMode::Append) {
            Ok(()) => {
                info!("event=message_paste module=message status=ok");
                MessageResponse::success("pasted")
            }
            Err(err) => MessageResponse::failure(err.to_string()),
        },
    }
}

/// Decodes a raw JSON message and handles it.
///
/// Unknown actions and malformed payloads yield an `ok=false` envelope.
pub fn handle_raw_message(focus: &FocusTracker, raw: &str) -> MessageResponse {
    match serde_json::from_str::<HostMessage>(raw) {
        Ok(message) => handle_message(focus, &message),
        Err(err) => MessageResponse::failure(format!("unsupported message: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_message, handle_raw_message, HostMessage};
    use crate::insert::focus::FocusTracker;
    use crate::insert::target::EditableElement;

    #[test]
    fn paste_message_uses_action_tag() {
        let message: HostMessage =
            serde_json::from_str(r#"{"action":"paste","value":"hi"}"#).unwrap();
        assert_eq!(
            message,
            HostMessage::Paste {
                value: "hi".to_string()
            }
        );
    }

    #[test]
    fn paste_appends_to_plain_field() {
        let mut focus = FocusTracker::new();
        let field = EditableElement::plain("Hello ").into_handle();
        focus.on_focus(&field);

        let response = handle_message(
            &focus,
            &HostMessage::Paste {
                value: "world".to_string(),
            },
        );
        assert!(response.ok);
        assert_eq!(field.borrow().target.text(), "Hello world");
    }

    #[test]
    fn paste_without_target_and_unknown_action_fail_softly() {
        let focus = FocusTracker::new();
        let response = handle_raw_message(&focus, r#"{"action":"paste","value":"x"}"#);
        assert!(!response.ok);
        assert!(response.message.contains("no focused field"));

        let unknown = handle_raw_message(&focus, r#"{"action":"explode"}"#);
        assert!(!unknown.ok);
        assert!(unknown.message.starts_with("unsupported message"));
    }
}
