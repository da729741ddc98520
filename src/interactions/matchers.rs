//! Event-to-handler routing
//!
//! Both matchers return `Option`: every failure to resolve is a routing miss
//! the dispatcher maps to a not-found reply, never an error.

use std::collections::HashMap;

use crate::api::enums::ApplicationCommandType;
use crate::api::types::{Interaction, InteractionOption};
use crate::commands::tree::{CommandNode, CommandSet};
use crate::commands::types::Command;
use crate::commands::{command_id, ID_PREFIX};

/// Resolve a command (or autocomplete) interaction to the owning declaration,
/// its full command id, and the leaf's options keyed by name.
///
/// Chat-input events descend the declared tree while the matched node is a
/// group, following the single nested option present at each level;
/// context-menu events are flat lookups.
pub(crate) fn match_command(
    interaction: &Interaction,
    set: &CommandSet,
) -> Option<(String, Command, HashMap<String, InteractionOption>)> {
    let data = interaction.data.as_ref()?;
    let kind = data.kind?;
    let name = data.name.as_deref()?;
    let mut id = command_id(kind, &[name]);

    let (command, leaf_options) = match kind {
        ApplicationCommandType::ChatInput => {
            let mut node = set.commands.get(name)?;
            let mut options: &[InteractionOption] = &data.options;
            loop {
                match node {
                    CommandNode::Leaf(command) => break (command.clone(), options),
                    CommandNode::Group(entries) => {
                        let next = options.first()?;
                        id.push('/');
                        id.push_str(&next.name);
                        node = entries.get(&next.name)?;
                        options = &next.options;
                    }
                }
            }
        }
        ApplicationCommandType::User => {
            (set.user_commands.get(name)?.clone(), data.options.as_slice())
        }
        ApplicationCommandType::Message => {
            (set.message_commands.get(name)?.clone(), data.options.as_slice())
        }
    };

    let options = leaf_options
        .iter()
        .map(|option| (option.name.clone(), option.clone()))
        .collect();
    Some((id, command, options))
}

/// Resolve a component/modal custom id back to the declaring command.
///
/// The id is truncated at the first `$`, the prefix and kind tag stripped,
/// and the remaining segments walked through the declared tree; the final
/// segment must land on a leaf.
pub(crate) fn match_custom_id(custom_id: &str, set: &CommandSet) -> Option<(String, Command)> {
    let (command_id, _) = custom_id.split_once('$')?;
    let locator = command_id.strip_prefix(ID_PREFIX)?.strip_prefix(':')?;
    let mut parts = locator.split('/');
    let kind = ApplicationCommandType::try_from(parts.next()?.parse::<u8>().ok()?).ok()?;

    let command = match kind {
        ApplicationCommandType::ChatInput => {
            let mut node = set.commands.get(parts.next()?)?;
            for part in parts {
                match node {
                    CommandNode::Group(entries) => node = entries.get(part)?,
                    CommandNode::Leaf(_) => break,
                }
            }
            match node {
                CommandNode::Leaf(command) => command.clone(),
                CommandNode::Group(_) => return None,
            }
        }
        ApplicationCommandType::User => set.user_commands.get(parts.next()?)?.clone(),
        ApplicationCommandType::Message => set.message_commands.get(parts.next()?)?.clone(),
    };
    Some((command_id.to_string(), command))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commands::hooks::use_description;
    use crate::commands::tree::Group;
    use crate::commands::types::{handler, CommandHandler, CommandResponse};

    fn ping() -> CommandHandler {
        use_description("Check the bot is alive");
        handler(|_interaction| async move { Ok(CommandResponse::text("pong")) })
    }

    fn set() -> CommandSet {
        CommandSet::new()
            .command("ping", ping)
            .group(
                "notes",
                Group::new()
                    .command("write", ping)
                    .group("tags", Group::new().command("add", ping)),
            )
            .user_command("Inspect", ping)
    }

    fn command_interaction(data: serde_json::Value) -> Interaction {
        serde_json::from_value(json!({ "id": "1", "type": 2, "token": "tok", "data": data }))
            .expect("interaction")
    }

    #[test]
    fn test_match_flat_command() {
        let interaction = command_interaction(json!({
            "name": "ping", "type": 1,
            "options": [{ "name": "extra", "type": 3, "value": "x" }]
        }));
        let (id, _command, options) = match_command(&interaction, &set()).expect("match");
        assert_eq!(id, "parley:1/ping");
        assert!(options.contains_key("extra"));
    }

    #[test]
    fn test_match_descends_nested_groups() {
        let interaction = command_interaction(json!({
            "name": "notes", "type": 1,
            "options": [{
                "name": "tags", "type": 2,
                "options": [{
                    "name": "add", "type": 1,
                    "options": [{ "name": "tag", "type": 3, "value": "rust" }]
                }]
            }]
        }));
        let (id, _command, options) = match_command(&interaction, &set()).expect("match");
        assert_eq!(id, "parley:1/notes/tags/add");
        assert_eq!(options.len(), 1);
        assert_eq!(options["tag"].value, Some(json!("rust")));
    }

    #[test]
    fn test_match_context_menu_is_flat() {
        let interaction = command_interaction(json!({ "name": "Inspect", "type": 2 }));
        let (id, _command, options) = match_command(&interaction, &set()).expect("match");
        assert_eq!(id, "parley:2/Inspect");
        assert!(options.is_empty());
    }

    #[test]
    fn test_unknown_command_is_a_miss() {
        let interaction = command_interaction(json!({ "name": "nope", "type": 1 }));
        assert!(match_command(&interaction, &set()).is_none());
    }

    #[test]
    fn test_group_without_nested_option_is_a_miss() {
        let interaction = command_interaction(json!({ "name": "notes", "type": 1 }));
        assert!(match_command(&interaction, &set()).is_none());
    }

    #[test]
    fn test_custom_id_routes_to_leaf() {
        let (id, _command) =
            match_custom_id("parley:1/notes/tags/add$0#user42", &set()).expect("match");
        assert_eq!(id, "parley:1/notes/tags/add");

        let (id, _command) = match_custom_id("parley:2/Inspect$3#", &set()).expect("match");
        assert_eq!(id, "parley:2/Inspect");
    }

    #[test]
    fn test_custom_id_misses_never_error() {
        let set = set();
        assert!(match_custom_id("parley:1/unknown$0#", &set).is_none());
        assert!(match_custom_id("parley:1/notes$0#", &set).is_none());
        assert!(match_custom_id("other:1/ping$0#", &set).is_none());
        assert!(match_custom_id("parley:9/ping$0#", &set).is_none());
        assert!(match_custom_id("no-dollar-sign", &set).is_none());
        assert!(match_custom_id("", &set).is_none());
    }
}
