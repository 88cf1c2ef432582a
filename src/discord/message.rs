//! Webhook message payloads and their HTTP body encoding.

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::discord::WebhookError;

/// A file uploaded alongside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookFile {
    /// File name shown by Discord
    pub name: String,
    /// Raw file content
    pub data: Vec<u8>,
}

/// Attachment metadata referencing an uploaded file by its part index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub id: usize,
    pub filename: String,
    pub description: String,
}

/// Message body for webhook create and edit requests.
///
/// Serialized as the JSON payload. When `files` is not empty the payload is
/// sent as `payload_json` inside a multipart body with one `files[<index>]`
/// part per file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Attachments to keep on the message. `Some(vec![])` clears every
    /// previous attachment when editing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(skip)]
    pub files: Vec<WebhookFile>,
}

impl WebhookMessage {
    /// Creates a text only message.
    pub fn text(content: String) -> Self {
        WebhookMessage {
            content,
            ..Default::default()
        }
    }

    /// Creates a message with uploaded files, one attachment entry per file.
    pub fn with_files(content: String, files: Vec<WebhookFile>) -> Self {
        let attachments = files
            .iter()
            .enumerate()
            .map(|(id, file)| Attachment {
                id,
                filename: file.name.clone(),
                description: file.name.clone(),
            })
            .collect();

        WebhookMessage {
            content,
            attachments: Some(attachments),
            files,
        }
    }

    /// Whether the message has to be sent as a multipart body.
    pub fn is_multipart(&self) -> bool {
        !self.files.is_empty()
    }

    /// Builds the multipart body of a message carrying files.
    pub fn to_form(&self) -> Result<Form, WebhookError> {
        let payload = serde_json::to_string(self)?;
        let mut form = Form::new().text("payload_json", payload);

        for (index, file) in self.files.iter().enumerate() {
            let part = Part::bytes(file.data.clone())
                .file_name(file.name.clone())
                .mime_str(mime::IMAGE_PNG.as_ref())?;
            form = form.part(format!("files[{}]", index), part);
        }

        Ok(form)
    }
}
