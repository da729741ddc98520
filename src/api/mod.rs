//! # API Module
//!
//! Wire-level data model for the interactions protocol plus the thin REST
//! client used for follow-up delivery and command registration.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with enums, payload types and REST client

pub mod client;
pub mod enums;
pub mod types;

// Re-export commonly used items
pub use client::{HttpClient, InteractionClient, DEFAULT_API_BASE};
pub use enums::{
    ApplicationCommandOptionType, ApplicationCommandType, ComponentType, InteractionResponseType,
    InteractionType,
};
pub use types::{
    Attachment, Channel, Choice, ChoiceValue, CommandSchema, FileAttachment, Interaction,
    InteractionData, InteractionOption, InteractionResponse, Mentionable, MessageResponse,
    ModalField, ModalResponse, ModalRow, OptionSchema, Reply, ResolvedData, Role, User,
};
