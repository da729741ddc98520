//! Message component interactions

use anyhow::Result;
use log::debug;
use uuid::Uuid;

use crate::api::types::{Interaction, Reply};
use crate::commands::instantiate::instantiate_component_handler;
use crate::dispatch::Dispatcher;

use super::matchers::match_custom_id;

pub(crate) async fn handle_component(
    dispatcher: &Dispatcher,
    request_id: Uuid,
    interaction: Interaction,
) -> Result<Reply> {
    let Some(custom_id) = interaction
        .data
        .as_ref()
        .and_then(|data| data.custom_id.clone())
    else {
        return Ok(Reply::NotFound("component not found"));
    };
    debug!("[{request_id}] Processing component interaction: {custom_id}");

    let Some((command_id, command)) = match_custom_id(&custom_id, dispatcher.commands()) else {
        return Ok(Reply::NotFound("command not found"));
    };
    let Some(handler) = instantiate_component_handler(&command_id, &command, &custom_id) else {
        return Ok(Reply::NotFound("component not found"));
    };

    let token = interaction.token.clone();
    let result = (*handler)(interaction).await;
    dispatcher.finish(request_id, &token, result).await
}
