//! Schema recording
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! Runs every declared command body once in recording mode and folds the
//! results into the bulk-registration schema. All naming and shape validation
//! happens here, so a defective declaration fails at startup rather than on
//! the first live event.

use crate::api::enums::{ApplicationCommandOptionType, ApplicationCommandType};
use crate::api::types::{CommandSchema, OptionSchema};
use crate::error::Error;

use super::state::{self, Mode, Recording, RuntimeContext};
use super::tree::{CommandNode, CommandSet};
use super::types::Command;
use super::command_id;

/// Reject names containing the characters reserved for custom ids.
fn validate_name(name: &str) -> Result<(), Error> {
    if name.chars().any(|c| matches!(c, ':' | '/' | '$' | '#')) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Run one command body in recording mode and collect what it declared.
fn record_leaf(
    id: &str,
    name: &str,
    definition: &Command,
    require_description: bool,
) -> Result<Recording, Error> {
    let guard = state::enter(RuntimeContext::new(id, Mode::Recording(Recording::default())));
    (**definition)();
    let ctx = guard.finish();
    let Mode::Recording(recording) = ctx.mode else {
        unreachable!("recording scope always finishes in recording mode");
    };

    if require_description && recording.description.is_empty() {
        return Err(Error::MissingDescription(name.to_string()));
    }
    for option in &recording.options {
        validate_name(&option.name)?;
    }
    Ok(recording)
}

fn subcommand_schema(name: &str, recording: &Recording) -> OptionSchema {
    OptionSchema {
        kind: ApplicationCommandOptionType::SubCommand,
        name: name.to_string(),
        description: recording.description.clone(),
        required: None,
        autocomplete: None,
        choices: None,
        channel_types: None,
        min_value: None,
        max_value: None,
        min_length: None,
        max_length: None,
        options: (!recording.options.is_empty()).then(|| recording.options.clone()),
    }
}

fn record_chat_input_commands(set: &CommandSet) -> Result<Vec<CommandSchema>, Error> {
    let kind = ApplicationCommandType::ChatInput;
    let mut schemas = Vec::new();

    for (name, node) in &set.commands {
        validate_name(name)?;
        match node {
            CommandNode::Leaf(definition) => {
                let id = command_id(kind, &[name]);
                let recording = record_leaf(&id, name, definition, true)?;
                schemas.push(CommandSchema {
                    kind: None,
                    name: name.clone(),
                    description: recording.description.clone(),
                    name_localizations: recording.name_localizations.clone(),
                    description_localizations: recording.description_localizations.clone(),
                    options: (!recording.options.is_empty()).then(|| recording.options.clone()),
                    default_permission: recording.default_permission,
                });
            }
            CommandNode::Group(entries) => {
                let mut default_permission = true;
                let mut options = Vec::new();
                for (group_name, group_node) in entries {
                    validate_name(group_name)?;
                    match group_node {
                        CommandNode::Leaf(definition) => {
                            let id = command_id(kind, &[name, group_name]);
                            let recording = record_leaf(&id, group_name, definition, true)?;
                            if recording.default_permission == Some(false) {
                                default_permission = false;
                            }
                            options.push(subcommand_schema(group_name, &recording));
                        }
                        CommandNode::Group(subgroup) => {
                            let mut subgroup_options = Vec::new();
                            for (leaf_name, leaf_node) in subgroup {
                                validate_name(leaf_name)?;
                                let CommandNode::Leaf(definition) = leaf_node else {
                                    return Err(Error::GroupTooDeep(format!(
                                        "{name}/{group_name}/{leaf_name}"
                                    )));
                                };
                                let id = command_id(kind, &[name, group_name, leaf_name]);
                                let recording = record_leaf(&id, leaf_name, definition, true)?;
                                if recording.default_permission == Some(false) {
                                    default_permission = false;
                                }
                                subgroup_options.push(subcommand_schema(leaf_name, &recording));
                            }
                            options.push(OptionSchema {
                                kind: ApplicationCommandOptionType::SubCommandGroup,
                                name: group_name.clone(),
                                description: group_name.clone(),
                                required: None,
                                autocomplete: None,
                                choices: None,
                                channel_types: None,
                                min_value: None,
                                max_value: None,
                                min_length: None,
                                max_length: None,
                                options: Some(subgroup_options),
                            });
                        }
                    }
                }
                schemas.push(CommandSchema {
                    kind: None,
                    name: name.clone(),
                    description: name.clone(),
                    name_localizations: None,
                    description_localizations: None,
                    options: Some(options),
                    default_permission: (!default_permission).then_some(false),
                });
            }
        }
    }
    Ok(schemas)
}

fn record_context_menu_commands(
    kind: ApplicationCommandType,
    commands: &std::collections::BTreeMap<String, Command>,
) -> Result<Vec<CommandSchema>, Error> {
    let mut schemas = Vec::new();
    for (name, definition) in commands {
        validate_name(name)?;
        let id = command_id(kind, &[name]);
        // Context-menu commands carry no description
        let recording = record_leaf(&id, name, definition, false)?;
        schemas.push(CommandSchema {
            kind: Some(kind),
            name: name.clone(),
            description: recording.description.clone(),
            name_localizations: recording.name_localizations.clone(),
            description_localizations: recording.description_localizations.clone(),
            options: (!recording.options.is_empty()).then(|| recording.options.clone()),
            default_permission: recording.default_permission,
        });
    }
    Ok(schemas)
}

/// Record the full command set into bulk-registration schemas.
pub fn record_commands(set: &CommandSet) -> Result<Vec<CommandSchema>, Error> {
    let mut schemas = record_chat_input_commands(set)?;
    schemas.extend(record_context_menu_commands(
        ApplicationCommandType::User,
        &set.user_commands,
    )?);
    schemas.extend(record_context_menu_commands(
        ApplicationCommandType::Message,
        &set.message_commands,
    )?);
    Ok(schemas)
}
