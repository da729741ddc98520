//! Mode-specific command body execution
//!
//! Each inbound event re-runs the owning command body under the mode the
//! event calls for, then pulls the right artifact out of the finished
//! context: the live handler, a registered component/modal handler, or the
//! focused option's autocomplete callback.

use std::collections::HashMap;

use crate::api::types::{InteractionOption, ResolvedData};

use super::state::{
    self, AutocompleteInstantiation, ComponentInstantiation, Handling, Mode, RuntimeContext,
};
use super::types::{AutocompleteCallback, Command, CommandHandler, ComponentHandler, ModalHandler};

/// Run the body in handling mode and return the handler it produced, with
/// every option hook fed from the live interaction.
pub(crate) fn instantiate_command_handler(
    command_id: &str,
    definition: &Command,
    options: HashMap<String, InteractionOption>,
    resolved: ResolvedData,
) -> CommandHandler {
    let guard = state::enter(RuntimeContext::new(
        command_id,
        Mode::Handling(Handling { options, resolved }),
    ));
    let handler = (**definition)();
    guard.finish();
    handler
}

/// Truncate an incoming custom id at the first `#`, dropping any suffix the
/// declaring handler appended for its own use.
fn routing_key(custom_id: &str) -> &str {
    match custom_id.find('#') {
        Some(index) => &custom_id[..=index],
        None => "",
    }
}

/// Run the body in component-instantiation mode and look up the handler the
/// incoming custom id addresses.
pub(crate) fn instantiate_component_handler(
    command_id: &str,
    definition: &Command,
    custom_id: &str,
) -> Option<ComponentHandler> {
    let guard = state::enter(RuntimeContext::new(
        command_id,
        Mode::Component(ComponentInstantiation::default()),
    ));
    (**definition)();
    let ctx = guard.finish();
    let Mode::Component(mut component) = ctx.mode else {
        unreachable!("component scope always finishes in component mode");
    };
    component.component_handlers.remove(routing_key(custom_id))
}

/// Run the body in component-instantiation mode with the submitted field
/// values visible to `use_input`, and look up the addressed modal handler.
pub(crate) fn instantiate_modal_handler(
    command_id: &str,
    definition: &Command,
    custom_id: &str,
    field_values: HashMap<String, String>,
) -> Option<ModalHandler> {
    let guard = state::enter(RuntimeContext::new(
        command_id,
        Mode::Component(ComponentInstantiation {
            field_values,
            ..Default::default()
        }),
    ));
    (**definition)();
    let ctx = guard.finish();
    let Mode::Component(mut component) = ctx.mode else {
        unreachable!("component scope always finishes in component mode");
    };
    component.modal_handlers.remove(routing_key(custom_id))
}

/// Run the body in autocomplete-instantiation mode and return the callback
/// registered for the focused option.
pub(crate) fn instantiate_autocomplete_handler(
    command_id: &str,
    definition: &Command,
    options: HashMap<String, InteractionOption>,
) -> Option<AutocompleteCallback> {
    let focused = options
        .values()
        .find(|option| option.focused)
        .map(|option| option.name.clone())?;
    let guard = state::enter(RuntimeContext::new(
        command_id,
        Mode::Autocomplete(AutocompleteInstantiation {
            options,
            handlers: HashMap::new(),
        }),
    ));
    (**definition)();
    let ctx = guard.finish();
    let Mode::Autocomplete(mut autocomplete) = ctx.mode else {
        unreachable!("autocomplete scope always finishes in autocomplete mode");
    };
    autocomplete.handlers.remove(&focused)
}
