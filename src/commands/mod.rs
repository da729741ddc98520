//! # Command System
//!
//! Declare-once command handling: one body per command runs hooks and returns
//! the handler, serving as schema recorder, live value extractor and
//! component registry depending on the active execution mode.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with hooks, recorder and registry

pub mod deploy;
pub mod hooks;
pub mod options;
pub mod recorder;
pub mod tree;
pub mod types;

pub(crate) mod instantiate;
pub(crate) mod state;

use crate::api::enums::ApplicationCommandType;

// Each command is assigned an id of the form:
// `parley:{ApplicationCommandType}[/{group}][/{subgroup}]/{name}`.
// Including the kind tag lets chat-input, user and message commands share a
// name.
//
// Each component custom id begins with this command id, and has the form:
// `{command_id}${component_index}#`
// Callers are free to append text after the `#`, and the correct handler is
// still invoked. This is why ':', '/', '$' and '#' are rejected in names.
// Custom ids must also stay inside the platform's 100-character field limit.
pub(crate) const ID_PREFIX: &str = "parley";

/// Build the stable id for a command path.
pub(crate) fn command_id(kind: ApplicationCommandType, segments: &[&str]) -> String {
    let mut id = format!("{ID_PREFIX}:{}", u8::from(kind));
    for segment in segments {
        id.push('/');
        id.push_str(segment);
    }
    id
}

// Re-export commonly used items
pub use deploy::deploy_commands;
pub use hooks::{
    use_button, use_default_permission, use_description, use_description_localizations,
    use_input, use_modal, use_name_localizations, use_select_menu,
};
pub use options::{
    AttachmentOption, BooleanOption, ChannelOption, IntegerOption, MentionableOption,
    NumberOption, RoleOption, StringOption, UserOption,
};
pub use recorder::record_commands;
pub use tree::{CommandNode, CommandSet, Group};
pub use types::{
    handler, AutocompleteCallback, BoxFuture, Command, CommandHandler, CommandResponse,
    ComponentHandler, DeferredResponse, ModalHandler,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_id_joins_segments() {
        assert_eq!(
            command_id(ApplicationCommandType::ChatInput, &["notes", "tags", "add"]),
            "parley:1/notes/tags/add"
        );
        assert_eq!(
            command_id(ApplicationCommandType::Message, &["Quote"]),
            "parley:3/Quote"
        );
    }
}
