//! Per-dispatch hook state
//!
//! One command body behaves differently per execution mode: recording builds
//! schema, handling reads live option values, component/autocomplete
//! instantiation collect the sub-handlers the body declares. The active
//! [`RuntimeContext`] lives in a thread-local slot entered through an RAII
//! guard, so it is allocated fresh per dispatch and torn down on every exit
//! path, including panics. Command bodies are synchronous, so the scope never
//! spans an await and concurrent dispatches cannot observe each other.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::api::types::{InteractionOption, OptionSchema, ResolvedData};

use super::types::{AutocompleteCallback, ComponentHandler, ModalHandler};

/// Which of the four execution modes the current command body runs under,
/// together with that mode's working data.
pub(crate) enum Mode {
    Recording(Recording),
    Handling(Handling),
    Component(ComponentInstantiation),
    Autocomplete(AutocompleteInstantiation),
}

/// Schema accumulated while recording a command body.
#[derive(Default)]
pub(crate) struct Recording {
    pub options: Vec<OptionSchema>,
    pub description: String,
    pub name_localizations: Option<BTreeMap<String, String>>,
    pub description_localizations: Option<BTreeMap<String, String>>,
    pub default_permission: Option<bool>,
}

/// Live values for one inbound command interaction.
#[derive(Default)]
pub(crate) struct Handling {
    pub options: HashMap<String, InteractionOption>,
    pub resolved: ResolvedData,
}

/// Sub-handler maps collected while re-running a body to route a component
/// or modal event. `field_values` holds submitted modal field text keyed by
/// custom id.
#[derive(Default)]
pub(crate) struct ComponentInstantiation {
    pub component_handlers: HashMap<String, ComponentHandler>,
    pub modal_handlers: HashMap<String, ModalHandler>,
    pub field_values: HashMap<String, String>,
}

/// Autocomplete callbacks collected while re-running a body, plus the live
/// option values so hooks still return something type-correct.
#[derive(Default)]
pub(crate) struct AutocompleteInstantiation {
    pub options: HashMap<String, InteractionOption>,
    pub handlers: HashMap<String, AutocompleteCallback>,
}

/// Request-scoped hook state for one execution of a command body.
pub(crate) struct RuntimeContext {
    pub command_id: String,
    pub component_count: u32,
    pub mode: Mode,
}

impl RuntimeContext {
    pub(crate) fn new(command_id: impl Into<String>, mode: Mode) -> Self {
        Self {
            command_id: command_id.into(),
            component_count: 0,
            mode,
        }
    }

    /// Allocate the next component custom id, in declaration order.
    pub(crate) fn next_custom_id(&mut self) -> String {
        let custom_id = format!("{}${}#", self.command_id, self.component_count);
        self.component_count += 1;
        custom_id
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<RuntimeContext>> = RefCell::new(None);
}

/// Guard for an entered command scope. Dropping it (including on panic)
/// restores whatever was active before.
pub(crate) struct ScopeGuard {
    prev: Option<RuntimeContext>,
}

/// Enter a command scope for the duration of one body execution.
pub(crate) fn enter(context: RuntimeContext) -> ScopeGuard {
    let prev = ACTIVE.with(|slot| slot.borrow_mut().replace(context));
    ScopeGuard { prev }
}

impl ScopeGuard {
    /// Close the scope and hand back the context with everything the body
    /// recorded or registered.
    pub(crate) fn finish(mut self) -> RuntimeContext {
        let context = ACTIVE.with(|slot| {
            let mut slot = slot.borrow_mut();
            std::mem::replace(&mut *slot, self.prev.take())
        });
        std::mem::forget(self);
        context.expect("command scope already closed")
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        ACTIVE.with(|slot| *slot.borrow_mut() = self.prev.take());
    }
}

/// Run `f` against the active context.
///
/// # Panics
///
/// Panics if no command body is currently executing — hooks must be called
/// inside a command.
pub(crate) fn with_active<R>(f: impl FnOnce(&mut RuntimeContext) -> R) -> R {
    ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let context = slot.as_mut().expect("hooks must be called inside a command");
        f(context)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RuntimeContext {
        RuntimeContext::new("parley:1/test", Mode::Recording(Recording::default()))
    }

    #[test]
    fn test_custom_ids_count_up_in_declaration_order() {
        let mut ctx = context();
        assert_eq!(ctx.next_custom_id(), "parley:1/test$0#");
        assert_eq!(ctx.next_custom_id(), "parley:1/test$1#");
        assert_eq!(ctx.next_custom_id(), "parley:1/test$2#");
    }

    #[test]
    fn test_scope_finish_returns_context() {
        let guard = enter(context());
        with_active(|ctx| {
            ctx.next_custom_id();
        });
        let ctx = guard.finish();
        assert_eq!(ctx.component_count, 1);
    }

    #[test]
    fn test_scope_clears_on_drop() {
        let guard = enter(context());
        drop(guard);
        let result = std::panic::catch_unwind(|| with_active(|_| ()));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_scopes_restore_previous() {
        let outer = enter(context());
        let inner = enter(RuntimeContext::new(
            "parley:1/inner",
            Mode::Recording(Recording::default()),
        ));
        assert_eq!(inner.finish().command_id, "parley:1/inner");
        with_active(|ctx| assert_eq!(ctx.command_id, "parley:1/test"));
        drop(outer);
    }

    #[test]
    #[should_panic(expected = "hooks must be called inside a command")]
    fn test_hooks_outside_a_command_panic() {
        with_active(|_| ());
    }
}
