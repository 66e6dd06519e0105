//! Application registry - injection slots keyed by app handle.
//!
//! Manages the plugin's per-application state:
//! - Opaque handle allocation (one id per application instance)
//! - Two injection slots per app: settings and controller
//! - Per-app component registry (name → factory)
//! - Setup-phase context stack for the zero-argument accessor
//!
//! Keying everything by handle identity instead of a module-level singleton
//! keeps multiple application instances in one process (tests, embedded
//! hosts) fully isolated from each other.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::component::{Cleanup, ModalProps};
use crate::engine::ModalEngine;
use crate::settings::ModalSettings;

/// Factory registered under a component name.
pub type ComponentFactory = Rc<dyn Fn(ModalProps) -> Cleanup>;

// =============================================================================
// Registry State
// =============================================================================

/// Injection slots and component registry for one application.
#[derive(Default)]
struct AppSlots {
    settings: Option<ModalSettings>,
    controller: Option<Rc<dyn ModalEngine>>,
    components: HashMap<String, ComponentFactory>,
}

thread_local! {
    /// Per-app slot records, keyed by handle id.
    static APPS: RefCell<HashMap<u64, AppSlots>> = RefCell::new(HashMap::new());

    /// Next handle id to allocate.
    static NEXT_APP_ID: RefCell<u64> = const { RefCell::new(0) };

    /// Stack of apps currently in their setup phase.
    static SETUP_STACK: RefCell<Vec<AppHandle>> = RefCell::new(Vec::new());
}

// =============================================================================
// AppHandle
// =============================================================================

/// Opaque identity of one application instance.
///
/// Copyable and hashable; holds no state itself. All slot state lives in the
/// thread-local registry under this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppHandle(u64);

impl AppHandle {
    /// Allocate a fresh application handle with empty slots.
    pub fn new() -> Self {
        let id = NEXT_APP_ID.with(|next| {
            let mut next = next.borrow_mut();
            let id = *next;
            *next += 1;
            id
        });
        APPS.with(|apps| {
            apps.borrow_mut().insert(id, AppSlots::default());
        });
        Self(id)
    }
}

impl Default for AppHandle {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Injection Slots
// =============================================================================

/// Publish the settings record under the app's settings slot.
pub fn provide_settings(app: AppHandle, settings: ModalSettings) {
    APPS.with(|apps| {
        if let Some(slots) = apps.borrow_mut().get_mut(&app.0) {
            slots.settings = Some(settings);
        }
    });
}

/// Publish the controller under the app's controller slot.
pub fn provide_controller(app: AppHandle, controller: Rc<dyn ModalEngine>) {
    APPS.with(|apps| {
        if let Some(slots) = apps.borrow_mut().get_mut(&app.0) {
            slots.controller = Some(controller);
        }
    });
}

/// Read the app's settings slot.
pub fn inject_settings(app: AppHandle) -> Option<ModalSettings> {
    APPS.with(|apps| {
        apps.borrow()
            .get(&app.0)
            .and_then(|slots| slots.settings.clone())
    })
}

/// Read the app's controller slot.
pub fn inject_controller(app: AppHandle) -> Option<Rc<dyn ModalEngine>> {
    APPS.with(|apps| {
        apps.borrow()
            .get(&app.0)
            .and_then(|slots| slots.controller.clone())
    })
}

// =============================================================================
// Component Registry
// =============================================================================

/// Register a component factory under `name` for the given app.
pub fn register_component(app: AppHandle, name: &str, factory: ComponentFactory) {
    APPS.with(|apps| {
        if let Some(slots) = apps.borrow_mut().get_mut(&app.0) {
            slots.components.insert(name.to_string(), factory);
        }
    });
}

/// Look up a component factory by name for the given app.
pub fn component(app: AppHandle, name: &str) -> Option<ComponentFactory> {
    APPS.with(|apps| {
        apps.borrow()
            .get(&app.0)
            .and_then(|slots| slots.components.get(name).cloned())
    })
}

// =============================================================================
// Setup-Phase Context Stack
// =============================================================================

/// App whose setup phase is currently running, if any.
pub fn current_app() -> Option<AppHandle> {
    SETUP_STACK.with(|stack| stack.borrow().last().copied())
}

/// Enter an app's setup phase. The host calls this before running component
/// setup so zero-argument accessors resolve against the right app.
pub fn enter_setup(app: AppHandle) {
    SETUP_STACK.with(|stack| stack.borrow_mut().push(app));
}

/// Leave the innermost setup phase.
pub fn exit_setup() {
    SETUP_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
}

/// Run `body` with `app` as the current setup context.
pub fn with_setup<R>(app: AppHandle, body: impl FnOnce() -> R) -> R {
    enter_setup(app);
    let result = body();
    exit_setup();
    result
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_apps() {
    APPS.with(|apps| apps.borrow_mut().clear());
    NEXT_APP_ID.with(|next| *next.borrow_mut() = 0);
    SETUP_STACK.with(|stack| stack.borrow_mut().clear());
}
