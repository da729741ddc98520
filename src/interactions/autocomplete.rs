//! Autocomplete interactions
//!
//! Exactly one callback fires per request: the one registered for the
//! focused option. Callback errors propagate to the caller even in
//! development, since an autocomplete popup cannot display a diagnostic.

use anyhow::Result;
use log::debug;
use serde_json::json;
use uuid::Uuid;

use crate::api::enums::InteractionResponseType;
use crate::api::types::{Interaction, InteractionResponse, Reply};
use crate::commands::instantiate::instantiate_autocomplete_handler;
use crate::dispatch::Dispatcher;

use super::matchers::match_command;

pub(crate) async fn handle_autocomplete(
    dispatcher: &Dispatcher,
    request_id: Uuid,
    interaction: Interaction,
) -> Result<Reply> {
    let Some((command_id, command, options)) =
        match_command(&interaction, dispatcher.commands())
    else {
        return Ok(Reply::NotFound("command not found"));
    };
    debug!("[{request_id}] Autocompleting {command_id}");

    let Some(callback) = instantiate_autocomplete_handler(&command_id, &command, options) else {
        return Ok(Reply::NotFound("autocomplete not found"));
    };

    let choices = (*callback)(interaction).await?;
    Ok(Reply::Json(InteractionResponse::new(
        InteractionResponseType::ApplicationCommandAutocompleteResult,
        Some(json!({ "choices": choices })),
    )))
}
