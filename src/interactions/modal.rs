//! Modal submit interactions

use std::collections::HashMap;

use anyhow::Result;
use log::debug;
use uuid::Uuid;

use crate::api::enums::ComponentType;
use crate::api::types::{Interaction, Reply};
use crate::commands::instantiate::instantiate_modal_handler;
use crate::dispatch::Dispatcher;

use super::matchers::match_custom_id;

pub(crate) async fn handle_modal(
    dispatcher: &Dispatcher,
    request_id: Uuid,
    interaction: Interaction,
) -> Result<Reply> {
    let Some(custom_id) = interaction
        .data
        .as_ref()
        .and_then(|data| data.custom_id.clone())
    else {
        return Ok(Reply::NotFound("modal not found"));
    };
    debug!("[{request_id}] Processing modal submit: {custom_id}");

    let Some((command_id, command)) = match_custom_id(&custom_id, dispatcher.commands()) else {
        return Ok(Reply::NotFound("command not found"));
    };

    // Collect submitted field values, keyed by each field's custom id
    let mut field_values = HashMap::new();
    if let Some(data) = &interaction.data {
        for row in &data.components {
            if row.kind != Some(u8::from(ComponentType::ActionRow)) {
                continue;
            }
            for field in &row.components {
                field_values.insert(field.custom_id.clone(), field.value.clone().unwrap_or_default());
            }
        }
    }

    let Some(handler) = instantiate_modal_handler(&command_id, &command, &custom_id, field_values)
    else {
        return Ok(Reply::NotFound("modal not found"));
    };

    let token = interaction.token.clone();
    let result = (*handler)(interaction).await;
    dispatcher.finish(request_id, &token, result).await
}
