//! Installer - one-shot plugin registration per application.
//!
//! `install` runs once at application bootstrap. It constructs the one modal
//! engine for that app, publishes the settings and the engine into the app's
//! injection slots, wires triggers, and registers the companion component.
//! After it returns, any component setup in that app can call
//! [`use_modal`](crate::accessor::use_modal).
//!
//! # Trigger deferral
//!
//! Engine constructors auto-wire triggers when the triggers subsystem is
//! active. Were that allowed during install, a trigger could fire against a
//! controller no injection slot knows about yet. The installer therefore
//! constructs the engine with `triggers.enabled` forced to `Some(false)` and
//! re-activates wiring only after both slots are populated, honoring the
//! caller's original intent: anything but an explicit `Some(false)` wires.

use std::rc::Rc;

use crate::component::{accessible_minimodal, MODAL_COMPONENT_NAME};
use crate::engine::{Minimodal, ModalEngine};
use crate::registry::{
    provide_controller, provide_settings, register_component, AppHandle, ComponentFactory,
};
use crate::settings::ModalSettings;

/// Install the plugin into `app` with the bundled [`Minimodal`] engine.
///
/// Installing twice on the same handle is not guarded against: the second
/// call constructs a second engine and overwrites both slots, orphaning the
/// first. Engine construction failures propagate - an application without a
/// working modal controller does not start.
pub fn install(app: AppHandle, options: Option<ModalSettings>) {
    install_with(app, options, Minimodal::new);
}

/// Install the plugin into `app`, constructing the engine with `build`.
///
/// The engine factory receives the settings with trigger wiring neutered;
/// see the module docs for why. Returns the typed engine so hosts bringing
/// their own engine (and tests instrumenting the install sequence) keep
/// concrete access; the injection slot holds the same instance as
/// `Rc<dyn ModalEngine>`.
pub fn install_with<E>(
    app: AppHandle,
    options: Option<ModalSettings>,
    build: impl FnOnce(ModalSettings) -> E,
) -> Rc<E>
where
    E: ModalEngine + 'static,
{
    let mut settings = options.unwrap_or_default();
    let intended_triggers = settings.triggers.enabled;

    // Neutered construction: the constructor must not wire triggers.
    settings.triggers.enabled = Some(false);
    let engine = Rc::new(build(settings));
    let controller: Rc<dyn ModalEngine> = engine.clone();

    // The published settings carry the caller's original trigger intent;
    // only the engine was constructed with the neutered copy.
    let mut published = controller.settings();
    published.triggers.enabled = intended_triggers;
    provide_settings(app, published);
    provide_controller(app, controller);

    if intended_triggers != Some(false) {
        engine.add_triggers();
    }

    let factory: ComponentFactory = Rc::new(accessible_minimodal);
    register_component(app, MODAL_COMPONENT_NAME, factory);

    tracing::debug!(
        ?app,
        triggers = intended_triggers != Some(false),
        "modal plugin installed"
    );

    engine
}

// =============================================================================
// Tests
// =============================================================================
