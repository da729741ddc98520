//! Option-declaring hooks
//!
//! One builder per option kind. Builders describe the option (constraints,
//! choices, autocomplete) and terminate with either `.required()` returning
//! the bare value or `.optional()` returning `Option` — the same declaration
//! records schema, extracts a live value, or yields a placeholder, depending
//! on the active execution mode.
//!
//! Placeholder rule: a required option falls back to its first declared
//! choice, or the kind's zero value without choices; an optional option falls
//! back to absent. The placeholder keeps recording-mode return values
//! type-correct and is discarded before the schema ships.

use std::future::Future;

use anyhow::Result;
use serde_json::Value;

use crate::api::enums::ApplicationCommandOptionType;
use crate::api::types::{
    Attachment, Channel, Choice, Interaction, Mentionable, OptionSchema, Role, User,
};

use super::state::{self, Mode};
use super::types::AutocompleteCallback;

struct OptionSpec {
    kind: ApplicationCommandOptionType,
    name: String,
    description: String,
    required: bool,
    choices: Vec<Choice>,
    channel_types: Option<Vec<u8>>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    min_length: Option<u16>,
    max_length: Option<u16>,
    autocomplete: Option<AutocompleteCallback>,
    zero: Value,
}

impl OptionSpec {
    fn new(kind: ApplicationCommandOptionType, name: &str, description: &str, zero: Value) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            required: false,
            choices: Vec::new(),
            channel_types: None,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
            autocomplete: None,
            zero,
        }
    }

    fn schema(&self, autocomplete: bool) -> OptionSchema {
        OptionSchema {
            kind: self.kind,
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.required.then_some(true),
            autocomplete: autocomplete.then_some(true),
            choices: (!self.choices.is_empty()).then(|| self.choices.clone()),
            channel_types: self.channel_types.clone(),
            min_value: self.min_value,
            max_value: self.max_value,
            min_length: self.min_length,
            max_length: self.max_length,
            options: None,
        }
    }

    fn placeholder(&self) -> Option<Value> {
        self.required.then(|| {
            self.choices
                .first()
                .map(Choice::value_json)
                .unwrap_or_else(|| self.zero.clone())
        })
    }
}

/// Drive one option declaration through the active execution mode.
///
/// # Panics
///
/// Panics if called outside a command body.
fn register(mut spec: OptionSpec, matches: fn(&Value) -> bool) -> Option<Value> {
    state::with_active(|ctx| {
        let callback = spec.autocomplete.take();
        let placeholder = spec.placeholder();
        match &mut ctx.mode {
            Mode::Recording(recording) => {
                recording.options.push(spec.schema(callback.is_some()));
                placeholder
            }
            Mode::Handling(handling) => handling
                .options
                .get(&spec.name)
                .and_then(|option| option.value.clone())
                .filter(matches)
                .or(placeholder),
            Mode::Autocomplete(autocomplete) => {
                if let Some(callback) = callback {
                    autocomplete.handlers.insert(spec.name.clone(), callback);
                }
                autocomplete
                    .options
                    .get(&spec.name)
                    .and_then(|option| option.value.clone())
                    .filter(matches)
                    .or(placeholder)
            }
            Mode::Component(_) => placeholder,
        }
    })
}

fn wrap_autocomplete<F, Fut>(callback: F) -> AutocompleteCallback
where
    F: Fn(Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Choice>>> + Send + 'static,
{
    std::sync::Arc::new(move |interaction| -> super::types::BoxFuture<Result<Vec<Choice>>> {
        Box::pin(callback(interaction))
    })
}

fn resolved_user(id: &str) -> Option<User> {
    state::with_active(|ctx| match &ctx.mode {
        Mode::Handling(handling) => handling.resolved.users.get(id).cloned(),
        _ => None,
    })
}

fn resolved_role(id: &str) -> Option<Role> {
    state::with_active(|ctx| match &ctx.mode {
        Mode::Handling(handling) => handling.resolved.roles.get(id).cloned(),
        _ => None,
    })
}

fn resolved_channel(id: &str) -> Option<Channel> {
    state::with_active(|ctx| match &ctx.mode {
        Mode::Handling(handling) => handling.resolved.channels.get(id).cloned(),
        _ => None,
    })
}

fn resolved_attachment(id: &str) -> Option<Attachment> {
    state::with_active(|ctx| match &ctx.mode {
        Mode::Handling(handling) => handling.resolved.attachments.get(id).cloned(),
        _ => None,
    })
}

/// A string option, optionally constrained by choices or length bounds.
pub struct StringOption {
    spec: OptionSpec,
}

impl StringOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::String,
                name,
                description,
                Value::from(""),
            ),
        }
    }

    pub fn choice(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.choices.push(Choice::string(name, value));
        self
    }

    pub fn min_length(mut self, length: u16) -> Self {
        self.spec.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: u16) -> Self {
        self.spec.max_length = Some(length);
        self
    }

    pub fn autocomplete<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Choice>>> + Send + 'static,
    {
        self.spec.autocomplete = Some(wrap_autocomplete(callback));
        self
    }

    pub fn required(mut self) -> String {
        self.spec.required = true;
        self.finish().unwrap_or_default()
    }

    pub fn optional(self) -> Option<String> {
        self.finish()
    }

    fn finish(self) -> Option<String> {
        register(self.spec, Value::is_string).and_then(|v| v.as_str().map(str::to_owned))
    }
}

/// An integer option, optionally constrained by choices or numeric bounds.
pub struct IntegerOption {
    spec: OptionSpec,
}

impl IntegerOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::Integer,
                name,
                description,
                Value::from(0),
            ),
        }
    }

    pub fn choice(mut self, name: impl Into<String>, value: i64) -> Self {
        self.spec.choices.push(Choice::integer(name, value));
        self
    }

    pub fn min(mut self, value: i64) -> Self {
        self.spec.min_value = Some(value as f64);
        self
    }

    pub fn max(mut self, value: i64) -> Self {
        self.spec.max_value = Some(value as f64);
        self
    }

    pub fn autocomplete<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Choice>>> + Send + 'static,
    {
        self.spec.autocomplete = Some(wrap_autocomplete(callback));
        self
    }

    pub fn required(mut self) -> i64 {
        self.spec.required = true;
        self.finish().unwrap_or_default()
    }

    pub fn optional(self) -> Option<i64> {
        self.finish()
    }

    fn finish(self) -> Option<i64> {
        register(self.spec, Value::is_i64).and_then(|v| v.as_i64())
    }
}

/// A boolean option.
pub struct BooleanOption {
    spec: OptionSpec,
}

impl BooleanOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::Boolean,
                name,
                description,
                Value::from(false),
            ),
        }
    }

    pub fn required(mut self) -> bool {
        self.spec.required = true;
        self.finish().unwrap_or_default()
    }

    pub fn optional(self) -> Option<bool> {
        self.finish()
    }

    fn finish(self) -> Option<bool> {
        register(self.spec, Value::is_boolean).and_then(|v| v.as_bool())
    }
}

/// A floating-point number option, optionally constrained by choices or
/// numeric bounds.
pub struct NumberOption {
    spec: OptionSpec,
}

impl NumberOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::Number,
                name,
                description,
                Value::from(0.0),
            ),
        }
    }

    pub fn choice(mut self, name: impl Into<String>, value: f64) -> Self {
        self.spec.choices.push(Choice::number(name, value));
        self
    }

    pub fn min(mut self, value: f64) -> Self {
        self.spec.min_value = Some(value);
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.spec.max_value = Some(value);
        self
    }

    pub fn autocomplete<F, Fut>(mut self, callback: F) -> Self
    where
        F: Fn(Interaction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Choice>>> + Send + 'static,
    {
        self.spec.autocomplete = Some(wrap_autocomplete(callback));
        self
    }

    pub fn required(mut self) -> f64 {
        self.spec.required = true;
        self.finish().unwrap_or_default()
    }

    pub fn optional(self) -> Option<f64> {
        self.finish()
    }

    fn finish(self) -> Option<f64> {
        register(self.spec, Value::is_number).and_then(|v| v.as_f64())
    }
}

/// A user-reference option. Resolves to the full user when the event carries
/// resolution data, otherwise to a bare-id stub (autocomplete events omit
/// resolution).
pub struct UserOption {
    spec: OptionSpec,
}

impl UserOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::User,
                name,
                description,
                Value::from(""),
            ),
        }
    }

    pub fn required(mut self) -> User {
        self.spec.required = true;
        let id = self.finish().unwrap_or_default();
        resolved_user(&id).unwrap_or(User {
            id,
            ..Default::default()
        })
    }

    pub fn optional(self) -> Option<User> {
        let id = self.finish()?;
        Some(resolved_user(&id).unwrap_or(User {
            id,
            ..Default::default()
        }))
    }

    fn finish(self) -> Option<String> {
        register(self.spec, Value::is_string).and_then(|v| v.as_str().map(str::to_owned))
    }
}

/// A channel-reference option, optionally restricted to channel kinds.
pub struct ChannelOption {
    spec: OptionSpec,
}

impl ChannelOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::Channel,
                name,
                description,
                Value::from(""),
            ),
        }
    }

    /// Restrict which channel kinds may be picked (platform channel-type
    /// values).
    pub fn channel_types(mut self, types: impl IntoIterator<Item = u8>) -> Self {
        self.spec.channel_types = Some(types.into_iter().collect());
        self
    }

    pub fn required(mut self) -> Channel {
        self.spec.required = true;
        let id = self.finish().unwrap_or_default();
        resolved_channel(&id).unwrap_or(Channel {
            id,
            ..Default::default()
        })
    }

    pub fn optional(self) -> Option<Channel> {
        let id = self.finish()?;
        Some(resolved_channel(&id).unwrap_or(Channel {
            id,
            ..Default::default()
        }))
    }

    fn finish(self) -> Option<String> {
        register(self.spec, Value::is_string).and_then(|v| v.as_str().map(str::to_owned))
    }
}

/// A role-reference option.
pub struct RoleOption {
    spec: OptionSpec,
}

impl RoleOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::Role,
                name,
                description,
                Value::from(""),
            ),
        }
    }

    pub fn required(mut self) -> Role {
        self.spec.required = true;
        let id = self.finish().unwrap_or_default();
        resolved_role(&id).unwrap_or(Role {
            id,
            ..Default::default()
        })
    }

    pub fn optional(self) -> Option<Role> {
        let id = self.finish()?;
        Some(resolved_role(&id).unwrap_or(Role {
            id,
            ..Default::default()
        }))
    }

    fn finish(self) -> Option<String> {
        register(self.spec, Value::is_string).and_then(|v| v.as_str().map(str::to_owned))
    }
}

/// A user-or-role reference option. Resolution prefers users; without
/// resolution data the stub is user-shaped.
pub struct MentionableOption {
    spec: OptionSpec,
}

impl MentionableOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::Mentionable,
                name,
                description,
                Value::from(""),
            ),
        }
    }

    pub fn required(mut self) -> Mentionable {
        self.spec.required = true;
        let id = self.finish().unwrap_or_default();
        resolve_mentionable(id)
    }

    pub fn optional(self) -> Option<Mentionable> {
        self.finish().map(resolve_mentionable)
    }

    fn finish(self) -> Option<String> {
        register(self.spec, Value::is_string).and_then(|v| v.as_str().map(str::to_owned))
    }
}

fn resolve_mentionable(id: String) -> Mentionable {
    if let Some(user) = resolved_user(&id) {
        return Mentionable::User(user);
    }
    if let Some(role) = resolved_role(&id) {
        return Mentionable::Role(role);
    }
    Mentionable::User(User {
        id,
        ..Default::default()
    })
}

/// An attachment option. Cannot be autocompleted.
pub struct AttachmentOption {
    spec: OptionSpec,
}

impl AttachmentOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            spec: OptionSpec::new(
                ApplicationCommandOptionType::Attachment,
                name,
                description,
                Value::from(""),
            ),
        }
    }

    pub fn required(mut self) -> Attachment {
        self.spec.required = true;
        let id = self.finish().unwrap_or_default();
        resolved_attachment(&id).unwrap_or(Attachment {
            id,
            ..Default::default()
        })
    }

    pub fn optional(self) -> Option<Attachment> {
        let id = self.finish()?;
        Some(resolved_attachment(&id).unwrap_or(Attachment {
            id,
            ..Default::default()
        }))
    }

    fn finish(self) -> Option<String> {
        register(self.spec, Value::is_string).and_then(|v| v.as_str().map(str::to_owned))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::commands::state::{
        enter, AutocompleteInstantiation, Handling, Mode, Recording, RuntimeContext,
    };

    fn recording_scope() -> crate::commands::state::ScopeGuard {
        enter(RuntimeContext::new(
            "parley:1/test",
            Mode::Recording(Recording::default()),
        ))
    }

    fn handling_scope(options: Vec<(&str, Value)>) -> crate::commands::state::ScopeGuard {
        let options = options
            .into_iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    crate::api::InteractionOption {
                        name: name.to_string(),
                        value: Some(value),
                        ..Default::default()
                    },
                )
            })
            .collect();
        enter(RuntimeContext::new(
            "parley:1/test",
            Mode::Handling(Handling {
                options,
                resolved: Default::default(),
            }),
        ))
    }

    #[test]
    fn test_recording_required_returns_zero_value() {
        let guard = recording_scope();
        assert_eq!(StringOption::new("s", "d").required(), "");
        assert_eq!(IntegerOption::new("i", "d").required(), 0);
        assert_eq!(NumberOption::new("n", "d").required(), 0.0);
        assert!(!BooleanOption::new("b", "d").required());
        let ctx = guard.finish();
        match ctx.mode {
            Mode::Recording(recording) => assert_eq!(recording.options.len(), 4),
            _ => panic!("expected recording mode"),
        }
    }

    #[test]
    fn test_recording_required_with_choices_returns_first_choice() {
        let _guard = recording_scope();
        let persona = StringOption::new("persona", "who responds")
            .choice("Obi-Wan", "obi")
            .choice("Chef", "chef")
            .required();
        assert_eq!(persona, "obi");

        let level = IntegerOption::new("level", "how loud")
            .choice("quiet", 1)
            .choice("loud", 11)
            .required();
        assert_eq!(level, 1);
    }

    #[test]
    fn test_recording_optional_returns_none() {
        let _guard = recording_scope();
        assert_eq!(StringOption::new("s", "d").optional(), None);
        assert_eq!(IntegerOption::new("i", "d").optional(), None);
        assert_eq!(UserOption::new("u", "d").optional(), None);
    }

    #[test]
    fn test_recording_captures_constraints() {
        let guard = recording_scope();
        StringOption::new("prompt", "what to say")
            .min_length(1)
            .max_length(2000)
            .required();
        let _ = IntegerOption::new("count", "how many").min(1).max(10).optional();
        let ctx = guard.finish();
        let options = match ctx.mode {
            Mode::Recording(recording) => recording.options,
            _ => panic!("expected recording mode"),
        };

        assert_eq!(options[0].min_length, Some(1));
        assert_eq!(options[0].max_length, Some(2000));
        assert_eq!(options[0].required, Some(true));
        assert_eq!(options[1].min_value, Some(1.0));
        assert_eq!(options[1].max_value, Some(10.0));
        assert_eq!(options[1].required, None);
    }

    #[test]
    fn test_handling_returns_live_values() {
        let _guard = handling_scope(vec![("a", json!(1)), ("s", json!("hello"))]);
        assert_eq!(NumberOption::new("a", "d").required(), 1.0);
        assert_eq!(StringOption::new("s", "d").optional(), Some("hello".to_string()));
    }

    #[test]
    fn test_handling_missing_optional_returns_none() {
        let _guard = handling_scope(vec![]);
        assert_eq!(StringOption::new("absent", "d").optional(), None);
    }

    #[test]
    fn test_handling_wrong_type_falls_back_to_placeholder() {
        let _guard = handling_scope(vec![("n", json!("not a number"))]);
        assert_eq!(NumberOption::new("n", "d").required(), 0.0);
        assert_eq!(NumberOption::new("n", "d").optional(), None);
    }

    #[test]
    fn test_handling_resolves_user_reference() {
        let mut resolved = crate::api::ResolvedData::default();
        resolved.users.insert(
            "42".to_string(),
            User {
                id: "42".to_string(),
                username: Some("obi".to_string()),
                ..Default::default()
            },
        );
        let mut options = HashMap::new();
        options.insert(
            "who".to_string(),
            crate::api::InteractionOption {
                name: "who".to_string(),
                value: Some(json!("42")),
                ..Default::default()
            },
        );
        let _guard = enter(RuntimeContext::new(
            "parley:1/test",
            Mode::Handling(Handling { options, resolved }),
        ));

        let user = UserOption::new("who", "d").required();
        assert_eq!(user.username.as_deref(), Some("obi"));
    }

    #[test]
    fn test_unresolved_reference_returns_id_stub() {
        let _guard = handling_scope(vec![("who", json!("42"))]);
        let user = UserOption::new("who", "d").required();
        assert_eq!(user.id, "42");
        assert_eq!(user.username, None);

        let target = MentionableOption::new("who", "d").required();
        assert_eq!(target.id(), "42");
        assert!(matches!(target, Mentionable::User(_)));
    }

    #[test]
    fn test_autocomplete_mode_registers_callback() {
        let guard = enter(RuntimeContext::new(
            "parley:1/test",
            Mode::Autocomplete(AutocompleteInstantiation::default()),
        ));
        StringOption::new("query", "d")
            .autocomplete(|_interaction| async move { Ok(vec![Choice::string("a", "a")]) })
            .required();
        StringOption::new("plain", "d").required();
        let ctx = guard.finish();

        match ctx.mode {
            Mode::Autocomplete(autocomplete) => {
                assert!(autocomplete.handlers.contains_key("query"));
                assert!(!autocomplete.handlers.contains_key("plain"));
            }
            _ => panic!("expected autocomplete mode"),
        }
    }

    #[test]
    fn test_recording_marks_autocomplete_capable() {
        let guard = recording_scope();
        StringOption::new("query", "d")
            .autocomplete(|_interaction| async move { Ok(Vec::new()) })
            .required();
        let ctx = guard.finish();

        let options = match ctx.mode {
            Mode::Recording(recording) => recording.options,
            _ => panic!("expected recording mode"),
        };
        assert_eq!(options[0].autocomplete, Some(true));
    }

    #[test]
    #[should_panic(expected = "hooks must be called inside a command")]
    fn test_option_hook_outside_command_panics() {
        StringOption::new("s", "d").optional();
    }
}
