use serde::Deserialize;
use uuid::Uuid;

use crate::constants::PENDING_ID_PREFIX;
use crate::models::Record;

/// A server-confirmed chat message.
///
/// `id` is the identity key; `created_at` is the ordering key,
/// server-assigned with seconds resolution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachment_url: Option<String>,
    pub created_at: u64,
    #[serde(rename = "userId")]
    pub sender_id: String,
    #[serde(rename = "userName", default)]
    pub sender_name: String,
    #[serde(rename = "userAvatarUrl", default)]
    pub sender_avatar_url: String,
}

impl Record for Message {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }
}

/// An outbound message as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl Draft {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }
}

/// Raw attachment bytes for a multipart send.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// An optimistically inserted message awaiting server confirmation.
///
/// Created on submit with a locally generated id, retired when a
/// forward poll observes the canonical counterpart, or rolled back on
/// send failure.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub local_id: String,
    pub text: String,
    pub has_attachment: bool,
    pub created_at: u64,
    pub sender_id: String,
}

impl PendingSend {
    pub fn new(draft: &Draft, sender_id: impl Into<String>) -> Self {
        let created_at = chrono::Utc::now().timestamp().max(0) as u64;
        Self {
            local_id: format!("{}{}", PENDING_ID_PREFIX, Uuid::new_v4()),
            text: draft.text.clone(),
            has_attachment: draft.attachment.is_some(),
            created_at,
            sender_id: sender_id.into(),
        }
    }

    /// Whether a server-confirmed message is the canonical counterpart
    /// of this pending entry: same author, same text, same attachment
    /// presence, confirmed no earlier than the optimistic insert.
    pub fn is_confirmed_by(&self, message: &Message) -> bool {
        message.sender_id == self.sender_id
            && message.text == self.text
            && message.attachment_url.is_some() == self.has_attachment
            && message.created_at >= self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_message(id: &str, text: &str, sender: &str, created_at: u64) -> Message {
        Message {
            id: id.to_string(),
            text: text.to_string(),
            attachment_url: None,
            created_at,
            sender_id: sender.to_string(),
            sender_name: String::new(),
            sender_avatar_url: String::new(),
        }
    }

    #[test]
    fn test_message_deserializes_wire_fields() {
        let json = r#"{
            "id": "m1",
            "text": "hello",
            "attachmentUrl": "files/cat.png",
            "createdAt": 1700000000,
            "userId": "u1",
            "userName": "Alice",
            "userAvatarUrl": "files/alice.png"
        }"#;

        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.attachment_url.as_deref(), Some("files/cat.png"));
        assert_eq!(msg.sender_id, "u1");
        assert_eq!(msg.sender_name, "Alice");
        assert_eq!(msg.created_at, 1700000000);
    }

    #[test]
    fn test_message_tolerates_missing_optional_fields() {
        let json = r#"{"id": "m2", "createdAt": 5, "userId": "u1"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.text, "");
        assert!(msg.attachment_url.is_none());
    }

    #[test]
    fn test_pending_confirmed_by_matching_canonical() {
        let draft = Draft::text("hi");
        let pending = PendingSend::new(&draft, "me");

        let confirmed = server_message("srv-9", "hi", "me", pending.created_at + 1);
        assert!(pending.is_confirmed_by(&confirmed));
    }

    #[test]
    fn test_pending_not_confirmed_by_other_sender_or_text() {
        let draft = Draft::text("hi");
        let pending = PendingSend::new(&draft, "me");

        let wrong_sender = server_message("a", "hi", "them", pending.created_at);
        let wrong_text = server_message("b", "bye", "me", pending.created_at);
        assert!(!pending.is_confirmed_by(&wrong_sender));
        assert!(!pending.is_confirmed_by(&wrong_text));
    }

    #[test]
    fn test_pending_not_confirmed_by_older_message() {
        let draft = Draft::text("hi");
        let pending = PendingSend::new(&draft, "me");

        // Same author and text but confirmed before the optimistic
        // insert: an earlier, unrelated message, not ours.
        let older = server_message("c", "hi", "me", pending.created_at - 10);
        assert!(!pending.is_confirmed_by(&older));
    }

    #[test]
    fn test_pending_attachment_presence_must_match() {
        let draft = Draft {
            text: "pic".to_string(),
            attachment: Some(Attachment {
                file_name: "cat.png".to_string(),
                bytes: vec![1, 2, 3],
            }),
        };
        let pending = PendingSend::new(&draft, "me");

        let without = server_message("d", "pic", "me", pending.created_at);
        assert!(!pending.is_confirmed_by(&without));

        let mut with = server_message("e", "pic", "me", pending.created_at);
        with.attachment_url = Some("files/cat.png".to_string());
        assert!(pending.is_confirmed_by(&with));
    }
}
