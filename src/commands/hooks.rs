//! Metadata, component and modal hooks
//!
//! These run inside a command body. Metadata hooks only mutate the in-flight
//! schema while recording; component and modal hooks allocate custom ids in
//! declaration order and register their sub-handlers when the matching map is
//! active. Every hook panics when called outside a command body.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use crate::api::Interaction;

use super::state::{self, Mode};
use super::types::{BoxFuture, ComponentHandler, ModalHandler};
use super::CommandResponse;

/// Declare the command's description. Required for chat-input commands;
/// context-menu commands have none.
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_description(description: impl Into<String>) {
    let description = description.into();
    state::with_active(|ctx| {
        if let Mode::Recording(recording) = &mut ctx.mode {
            recording.description = description;
        }
    });
}

/// Declare localized command names.
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_name_localizations<I, K, V>(localizations: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let map = localizations
        .into_iter()
        .map(|(locale, name)| (locale.into(), name.into()))
        .collect();
    state::with_active(|ctx| {
        if let Mode::Recording(recording) = &mut ctx.mode {
            recording.name_localizations = Some(map);
        }
    });
}

/// Declare localized command descriptions.
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_description_localizations<I, K, V>(localizations: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let map = localizations
        .into_iter()
        .map(|(locale, description)| (locale.into(), description.into()))
        .collect();
    state::with_active(|ctx| {
        if let Mode::Recording(recording) = &mut ctx.mode {
            recording.description_localizations = Some(map);
        }
    });
}

/// Declare whether the command is enabled by default. A `false` on any leaf
/// folds up to its top-level command during recording.
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_default_permission(permission: bool) {
    state::with_active(|ctx| {
        if let Mode::Recording(recording) = &mut ctx.mode {
            recording.default_permission = Some(permission);
        }
    });
}

fn use_custom_id() -> String {
    state::with_active(|ctx| ctx.next_custom_id())
}

fn wrap_component<F, Fut>(handler: F) -> ComponentHandler
where
    F: Fn(Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CommandResponse>> + Send + 'static,
{
    Arc::new(move |interaction| -> BoxFuture<Result<CommandResponse>> {
        Box::pin(handler(interaction))
    })
}

/// Declare a button handler. Returns the custom id to put on the button; any
/// text appended after the id survives the round trip and is visible to the
/// handler, without affecting routing.
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_button<F, Fut>(handler: F) -> String
where
    F: Fn(Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CommandResponse>> + Send + 'static,
{
    let custom_id = use_custom_id();
    let handler = wrap_component(handler);
    state::with_active(|ctx| {
        if let Mode::Component(component) = &mut ctx.mode {
            component.component_handlers.insert(custom_id.clone(), handler);
        }
    });
    custom_id
}

/// Declare a select-menu handler. Same addressing contract as [`use_button`];
/// the picked values arrive on the interaction's `data.values`.
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_select_menu<F, Fut>(handler: F) -> String
where
    F: Fn(Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CommandResponse>> + Send + 'static,
{
    let custom_id = use_custom_id();
    let handler = wrap_component(handler);
    state::with_active(|ctx| {
        if let Mode::Component(component) = &mut ctx.mode {
            component.component_handlers.insert(custom_id.clone(), handler);
        }
    });
    custom_id
}

/// Declare a modal-submit handler. Returns the custom id to open the modal
/// with.
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_modal<F, Fut>(handler: F) -> String
where
    F: Fn(Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CommandResponse>> + Send + 'static,
{
    let custom_id = use_custom_id();
    let handler: ModalHandler = wrap_component(handler);
    state::with_active(|ctx| {
        if let Mode::Component(component) = &mut ctx.mode {
            component.modal_handlers.insert(custom_id.clone(), handler);
        }
    });
    custom_id
}

/// Declare a modal text field. Returns `(custom_id, value)` — the id to put
/// on the field, and the submitted text when a modal submission is being
/// handled ("" in every other mode).
///
/// # Panics
///
/// Panics if called outside a command body.
pub fn use_input() -> (String, String) {
    state::with_active(|ctx| {
        let custom_id = ctx.next_custom_id();
        let value = match &ctx.mode {
            Mode::Component(component) => component
                .field_values
                .get(&custom_id)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        };
        (custom_id, value)
    })
}
