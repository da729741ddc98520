//! Declare-once slash commands, message components and modals for Discord
//! HTTP interactions.
//!
//! A command is an ordinary function: it runs hooks to describe its options
//! and sub-handlers, then returns the handler to invoke. The same function
//! body records the registration schema, extracts live option values, and
//! routes component/modal callbacks back to the exact handler that declared
//! them — which execution mode is active is the dispatcher's business, never
//! the command's.
//!
//! ```ignore
//! fn add() -> CommandHandler {
//!     use_description("Add two numbers");
//!     let a = NumberOption::new("a", "First operand").required();
//!     let b = NumberOption::new("b", "Second operand").required();
//!     handler(move |_interaction| async move {
//!         Ok(CommandResponse::text(format!("{a} + {b} = {}", a + b)))
//!     })
//! }
//!
//! let dispatcher = Dispatcher::new(
//!     CommandSet::new().command("add", add),
//!     Arc::new(HttpClient::new(config.application_id)),
//! );
//! ```

// Core layer - shared configuration
pub mod core;

// API layer - wire types and REST client
pub mod api;

// Command layer - declaration hooks, recording, registry
pub mod commands;

// Interaction layer - routing and response protocol
pub mod interactions;

// Application layer
pub mod dispatch;
pub mod error;

// Re-export core config
pub use crate::core::Config;

// Re-export the primary API surface
pub use api::{
    Choice, ChoiceValue, CommandSchema, FileAttachment, HttpClient, Interaction,
    InteractionClient, InteractionResponse, MessageResponse, ModalResponse, OptionSchema, Reply,
};
pub use commands::{
    deploy_commands, handler, record_commands, use_button, use_default_permission,
    use_description, use_description_localizations, use_input, use_modal,
    use_name_localizations, use_select_menu, AttachmentOption, BooleanOption, ChannelOption,
    Command, CommandHandler, CommandResponse, CommandSet, Group, IntegerOption,
    MentionableOption, NumberOption, RoleOption, StringOption, UserOption,
};
pub use dispatch::Dispatcher;
pub use error::Error;
pub use interactions::{TaskSpawner, TokioSpawner};
