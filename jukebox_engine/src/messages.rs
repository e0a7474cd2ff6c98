use serde::Serialize;

/// Outbound payloads the module assembles for the host's delivery layer.
/// Transport is the host's concern; the module only fills these in.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    ServerText {
        recipient: String,
        text: String,
    },
    MenuDisplay {
        recipient: String,
        title: String,
        entries: Vec<String>,
    },
    SoundPlayback {
        recipient: String,
        clip: String,
    },
}

impl Message {
    pub fn server_text(recipient: &str, text: impl Into<String>) -> Self {
        Message::ServerText {
            recipient: recipient.to_string(),
            text: text.into(),
        }
    }

    pub fn sound(recipient: &str, clip: impl Into<String>) -> Self {
        Message::SoundPlayback {
            recipient: recipient.to_string(),
            clip: clip.into(),
        }
    }
}
