//! Interaction payload data model
//!
//! Inbound payloads deserialize from the platform's interaction webhook JSON;
//! outbound payloads serialize back to it. Message bodies stay close to the
//! wire: embeds and components ride through as raw `serde_json::Value`, since
//! shaping them is the caller's concern, not the dispatcher's.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::enums::{
    ApplicationCommandOptionType, ApplicationCommandType, InteractionResponseType, InteractionType,
};

/// One inbound event: a command invocation, component click, modal submission,
/// autocomplete request or ping.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub application_id: Option<String>,
    /// Token authenticating follow-up calls for this interaction.
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub data: Option<InteractionData>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub member: Option<Value>,
    #[serde(default)]
    pub user: Option<Value>,
    /// The message a component interaction was attached to.
    #[serde(default)]
    pub message: Option<Value>,
}

impl Interaction {
    /// Values picked in a select menu, empty for other interaction kinds.
    pub fn select_values(&self) -> &[String] {
        self.data.as_ref().map(|d| d.values.as_slice()).unwrap_or(&[])
    }

    /// The user a user-context-menu command targeted, resolved.
    pub fn target_user(&self) -> Option<&User> {
        let data = self.data.as_ref()?;
        let target_id = data.target_id.as_deref()?;
        data.resolved.as_ref()?.users.get(target_id)
    }

    /// The message a message-context-menu command targeted, as raw JSON.
    pub fn target_message(&self) -> Option<&Value> {
        let data = self.data.as_ref()?;
        let target_id = data.target_id.as_deref()?;
        data.resolved.as_ref()?.messages.get(target_id)
    }
}

/// The `data` payload of an interaction. One struct covers all inbound
/// shapes; absent fields default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<ApplicationCommandType>,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
    #[serde(default)]
    pub resolved: Option<ResolvedData>,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub component_type: Option<u8>,
    /// Selected values for select-menu components.
    #[serde(default)]
    pub values: Vec<String>,
    /// Submitted rows for modal interactions.
    #[serde(default)]
    pub components: Vec<ModalRow>,
    pub target_id: Option<String>,
}

/// A single option value (or nested subcommand) on an inbound command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<u8>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
    /// Set on the option currently being typed during autocomplete.
    #[serde(default)]
    pub focused: bool,
}

/// Entities the platform resolved for the ids referenced by option values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolvedData {
    #[serde(default)]
    pub users: HashMap<String, User>,
    #[serde(default)]
    pub members: HashMap<String, Value>,
    #[serde(default)]
    pub roles: HashMap<String, Role>,
    #[serde(default)]
    pub channels: HashMap<String, Channel>,
    #[serde(default)]
    pub attachments: HashMap<String, Attachment>,
    #[serde(default)]
    pub messages: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<u8>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Either a resolved user or a resolved role, for mentionable options.
#[derive(Debug, Clone, PartialEq)]
pub enum Mentionable {
    User(User),
    Role(Role),
}

impl Mentionable {
    pub fn id(&self) -> &str {
        match self {
            Mentionable::User(user) => &user.id,
            Mentionable::Role(role) => &role.id,
        }
    }
}

/// One action row of a submitted modal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalRow {
    #[serde(rename = "type", default)]
    pub kind: Option<u8>,
    #[serde(default)]
    pub components: Vec<ModalField>,
}

/// One submitted field inside a modal action row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalField {
    #[serde(default)]
    pub custom_id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<u8>,
    #[serde(default)]
    pub value: Option<String>,
}

/// A file uploaded alongside a message, carried out-of-band and sent as a
/// multipart `files[i]` part.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

impl FileAttachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Message payload for immediate responses, updates and follow-ups.
///
/// Embeds and component rows are raw JSON values shaped by the caller. The
/// `update` marker selects UPDATE_MESSAGE over CHANNEL_MESSAGE_WITH_SOURCE
/// and never reaches the wire itself.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<Value>,
    #[serde(skip)]
    pub attachments: Vec<FileAttachment>,
    #[serde(skip)]
    pub update: bool,
}

/// MessageFlags::EPHEMERAL
const EPHEMERAL: u64 = 1 << 6;

impl MessageResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(mut self, embed: Value) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn component_row(mut self, row: Value) -> Self {
        self.components.push(row);
        self
    }

    pub fn attach(mut self, attachment: FileAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Only the invoking user will see this message.
    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(self.flags.unwrap_or(0) | EPHEMERAL);
        self
    }

    /// Deliver as an update to the message the component was attached to.
    pub fn as_update(mut self) -> Self {
        self.update = true;
        self
    }

    /// Split into the JSON body and the files to send multipart. When files
    /// are present the body gains the `attachments: [{id, filename}]` index
    /// the platform pairs with the `files[i]` parts.
    pub fn into_payload(mut self) -> Result<(Value, Vec<FileAttachment>)> {
        let files = std::mem::take(&mut self.attachments);
        let mut body = serde_json::to_value(&self)?;
        if !files.is_empty() {
            let index: Vec<Value> = files
                .iter()
                .enumerate()
                .map(|(i, file)| json!({ "id": i, "filename": file.filename }))
                .collect();
            if let Some(map) = body.as_object_mut() {
                map.insert("attachments".to_string(), Value::Array(index));
            }
        }
        Ok((body, files))
    }
}

/// Payload for a MODAL response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModalResponse {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<Value>,
}

impl ModalResponse {
    pub fn new(custom_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            title: title.into(),
            components: Vec::new(),
        }
    }

    pub fn component_row(mut self, row: Value) -> Self {
        self.components.push(row);
        self
    }
}

/// The synchronous wire response to an interaction.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: InteractionResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl InteractionResponse {
    pub fn new(kind: InteractionResponseType, data: Option<Value>) -> Self {
        Self { kind, data }
    }

    pub fn pong() -> Self {
        Self::new(InteractionResponseType::Pong, None)
    }
}

/// What dispatch hands back to the embedding HTTP layer.
#[derive(Debug)]
pub enum Reply {
    /// Plain JSON response body.
    Json(InteractionResponse),
    /// Multipart body: `payload_json` plus `files[i]` parts.
    Multipart {
        payload: InteractionResponse,
        files: Vec<FileAttachment>,
    },
    /// Routing miss; the HTTP layer should answer 404 with this reason.
    NotFound(&'static str),
}

impl Reply {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Reply::NotFound(_))
    }

    /// The response payload, if any.
    pub fn payload(&self) -> Option<&InteractionResponse> {
        match self {
            Reply::Json(payload) | Reply::Multipart { payload, .. } => Some(payload),
            Reply::NotFound(_) => None,
        }
    }
}

/// One choice a string/integer/number option offers (or an autocomplete
/// callback returns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: ChoiceValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    String(String),
    Integer(i64),
    Number(f64),
}

impl Choice {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::String(value.into()),
        }
    }

    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::Integer(value),
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::Number(value),
        }
    }

    /// The choice's value as the JSON it takes on the wire.
    pub fn value_json(&self) -> Value {
        match &self.value {
            ChoiceValue::String(s) => Value::from(s.clone()),
            ChoiceValue::Integer(i) => Value::from(*i),
            ChoiceValue::Number(n) => Value::from(*n),
        }
    }
}

/// Recorded schema for one option, ready for bulk registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSchema {
    #[serde(rename = "type")]
    pub kind: ApplicationCommandOptionType,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_types: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionSchema>>,
}

/// Recorded schema for one top-level command, ready for bulk registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSchema {
    /// Omitted for chat-input commands, which are the platform default.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ApplicationCommandType>,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_localizations: Option<std::collections::BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_localizations: Option<std::collections::BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<bool>,
}
