//! Accessor hook - bound-operation façade over the installed controller.
//!
//! `use_modal` is callable from any component's setup phase, any number of
//! times. Each call resolves the one controller published at install time and
//! returns a [`ModalHandle`]: the five modal operations bound to that
//! controller, the raw controller, and a fresh `animated` mirror signal.
//!
//! # The animated mirror
//!
//! The engine's animation flag is tri-state (`Option<bool>`); consumers want
//! a plain boolean. Every hook call allocates its own `Signal<bool>` seeded
//! `false` and registers one effect that copies the engine flag into it,
//! collapsing `None` to `false`. One watcher per hook call, never a shared
//! global one. The handle owns the watcher: clones share it, and it is
//! stopped when the last clone drops.
//!
//! # Misuse posture
//!
//! Calling the hook outside any installed application does not fail. It
//! returns a detached handle whose operations report
//! [`ModalError::NotInstalled`] when invoked and whose mirror stays `false`.
//! `try_use_modal` is the strict variant for callers that prefer the miss to
//! surface at hook time.

use std::rc::Rc;

use spark_signals::{effect, signal, Signal};

use crate::engine::ModalEngine;
use crate::error::ModalError;
use crate::registry::{current_app, inject_controller, AppHandle};
use crate::settings::ModalSettings;

// =============================================================================
// ModalHandle
// =============================================================================

/// Owns a running effect; stops it when dropped.
///
/// The stop closure returned by `effect()` holds the only strong reference
/// to the effect node (signals track reactions weakly), so whoever holds the
/// watcher decides how long the effect lives.
struct Watch(Option<Box<dyn FnOnce()>>);

impl Watch {
    fn new(stop: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(stop)))
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        if let Some(stop) = self.0.take() {
            stop();
        }
    }
}

/// Façade returned by the accessor hook.
///
/// Cloning is cheap and detachment-safe: a clone shares the same controller
/// and the same mirror watcher, so an operation invoked through a clone long
/// after the original handle is gone still addresses the controller published
/// at install time, and the mirror keeps tracking until the last clone drops.
#[derive(Clone)]
pub struct ModalHandle {
    modal: Option<Rc<dyn ModalEngine>>,
    animated: Signal<bool>,
    /// Keeps the mirror effect alive for the lifetime of the handle (and all
    /// of its clones).
    _watch: Option<Rc<Watch>>,
}

impl ModalHandle {
    fn detached() -> Self {
        Self {
            modal: None,
            animated: signal(false),
            _watch: None,
        }
    }

    fn bound(modal: Rc<dyn ModalEngine>) -> Self {
        let animated = signal(false);

        // The per-call watcher: engine flag → boolean mirror, None → false.
        let source = modal.animated();
        let mirror = animated.clone();
        let stop = effect(move || {
            mirror.set(source.get().unwrap_or(false));
        });

        Self {
            modal: Some(modal),
            animated,
            _watch: Some(Rc::new(Watch::new(stop))),
        }
    }

    fn engine(&self) -> Result<&Rc<dyn ModalEngine>, ModalError> {
        self.modal.as_ref().ok_or(ModalError::NotInstalled)
    }

    /// Whether this handle is bound to an installed controller.
    pub fn is_installed(&self) -> bool {
        self.modal.is_some()
    }

    /// The raw controller, if installed.
    pub fn modal(&self) -> Option<Rc<dyn ModalEngine>> {
        self.modal.clone()
    }

    /// The boolean animation mirror for this hook call.
    ///
    /// Reading it inside an effect or derived tracks it.
    pub fn animated_signal(&self) -> Signal<bool> {
        self.animated.clone()
    }

    /// Current value of the animation mirror.
    pub fn animated(&self) -> bool {
        self.animated.get()
    }

    /// The engine's own settings record.
    ///
    /// This is the copy the engine was constructed with, in which
    /// `triggers.enabled` is forced to `Some(false)` (the installer defers
    /// trigger wiring). The published record carrying the caller's original
    /// trigger intent lives in the settings slot; read it with
    /// [`inject_settings`](crate::registry::inject_settings).
    pub fn settings(&self) -> Result<ModalSettings, ModalError> {
        Ok(self.engine()?.settings())
    }

    /// Open the modal with the given id.
    pub fn open_modal(&self, id: &str) -> Result<(), ModalError> {
        self.engine()?.open_modal(id)
    }

    /// Close a modal: `Some(id)` closes that modal, `None` the topmost one.
    pub fn close_modal(&self, id: Option<&str>) -> Result<(), ModalError> {
        self.engine()?.close_modal(id)
    }

    /// Close every open modal.
    pub fn close_all_modals(&self) -> Result<(), ModalError> {
        self.engine()?.close_all_modals()
    }

    /// Width of the scroll gutter reserved while a modal locks scrolling.
    pub fn scrollbar_width(&self) -> Result<u16, ModalError> {
        Ok(self.engine()?.scrollbar_width())
    }

    /// Wire the declared triggers.
    pub fn add_triggers(&self) -> Result<(), ModalError> {
        self.engine()?.add_triggers();
        Ok(())
    }
}

// =============================================================================
// Hook
// =============================================================================

/// Accessor hook: the modal façade for the current setup context.
///
/// Never fails. Outside an installed application it returns a detached
/// handle; see the module docs.
pub fn use_modal() -> ModalHandle {
    match current_app() {
        Some(app) => use_modal_in(app),
        None => {
            tracing::debug!("use_modal called outside any app context");
            ModalHandle::detached()
        }
    }
}

/// Strict accessor hook: errors at hook time when nothing is installed.
pub fn try_use_modal() -> Result<ModalHandle, ModalError> {
    let app = current_app().ok_or(ModalError::NotInstalled)?;
    try_use_modal_in(app)
}

/// Accessor hook for an explicit app, bypassing the setup context.
pub fn use_modal_in(app: AppHandle) -> ModalHandle {
    match inject_controller(app) {
        Some(modal) => ModalHandle::bound(modal),
        None => {
            tracing::debug!(?app, "use_modal called before install");
            ModalHandle::detached()
        }
    }
}

/// Strict accessor hook for an explicit app.
pub fn try_use_modal_in(app: AppHandle) -> Result<ModalHandle, ModalError> {
    inject_controller(app)
        .map(ModalHandle::bound)
        .ok_or(ModalError::NotInstalled)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::reset_mounted;
    use crate::engine::Minimodal;
    use crate::install::install;
    use crate::registry::{reset_apps, with_setup};

    fn setup() -> AppHandle {
        reset_apps();
        reset_mounted();
        let app = AppHandle::new();
        install(app, None);
        app
    }

    fn installed_minimodal(handle: &ModalHandle) -> Rc<dyn ModalEngine> {
        handle.modal().expect("handle should be bound")
    }

    #[test]
    fn test_hook_resolves_installed_controller() {
        let app = setup();

        let handle = with_setup(app, use_modal);
        assert!(handle.is_installed());

        handle.open_modal("greeting").unwrap();
        handle.close_modal(None).unwrap();
    }

    #[test]
    fn test_identity_same_controller_across_calls() {
        let app = setup();

        let first = use_modal_in(app);
        let second = use_modal_in(app);

        let a = installed_minimodal(&first);
        let b = installed_minimodal(&second);
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_detached_handle_outside_any_app() {
        reset_apps();
        reset_mounted();

        let handle = use_modal();
        assert!(!handle.is_installed());
        assert!(!handle.animated());

        assert_eq!(handle.open_modal("a"), Err(ModalError::NotInstalled));
        assert_eq!(handle.close_modal(None), Err(ModalError::NotInstalled));
        assert_eq!(handle.close_all_modals(), Err(ModalError::NotInstalled));
        assert_eq!(handle.scrollbar_width(), Err(ModalError::NotInstalled));
        assert_eq!(handle.add_triggers(), Err(ModalError::NotInstalled));
    }

    #[test]
    fn test_hook_before_install_is_detached() {
        reset_apps();
        reset_mounted();

        let app = AppHandle::new();
        let handle = use_modal_in(app);
        assert!(!handle.is_installed());
        assert_eq!(handle.open_modal("a"), Err(ModalError::NotInstalled));
    }

    #[test]
    fn test_try_use_modal_errors_at_hook_time() {
        reset_apps();
        reset_mounted();

        assert!(matches!(try_use_modal(), Err(ModalError::NotInstalled)));

        let app = AppHandle::new();
        assert!(matches!(
            try_use_modal_in(app),
            Err(ModalError::NotInstalled)
        ));

        install(app, None);
        assert!(try_use_modal_in(app).is_ok());
    }

    #[test]
    fn test_animated_mirror_tracks_engine_flag() {
        let app = setup();
        let handle = use_modal_in(app);

        // Seeded false even though the engine flag is still None.
        assert!(!handle.animated());

        let engine = installed_minimodal(&handle);
        engine.animated().set(Some(true));
        assert!(handle.animated());

        // The nullish engine state normalizes to false, never surfaces None.
        engine.animated().set(None);
        assert!(!handle.animated());

        engine.animated().set(Some(false));
        assert!(!handle.animated());
    }

    #[test]
    fn test_each_hook_call_gets_its_own_mirror() {
        let app = setup();

        let first = use_modal_in(app);
        let second = use_modal_in(app);

        // Writing one mirror directly must not leak into the other.
        first.animated_signal().set(true);
        assert!(first.animated());
        assert!(!second.animated());

        // Both still observe the same engine.
        installed_minimodal(&first).animated().set(Some(true));
        assert!(first.animated());
        assert!(second.animated());
    }

    #[test]
    fn test_operations_survive_detachment() {
        let app = setup();

        let handle = use_modal_in(app);
        let detached_clone = handle.clone();
        drop(handle);

        detached_clone.open_modal("still-works").unwrap();
        let engine = inject_controller(app).unwrap();
        assert_eq!(engine.animated().get(), Some(true));
    }

    #[test]
    fn test_operations_delegate_to_published_controller() {
        let app = setup();

        let handle = use_modal_in(app);
        handle.open_modal("from-hook").unwrap();

        let published = inject_controller(app).unwrap();
        let bound = installed_minimodal(&handle);
        assert!(Rc::ptr_eq(&published, &bound));
    }

    #[test]
    fn test_mirror_updates_after_hook_returns() {
        let app = setup();
        let handle = use_modal_in(app);
        let engine = installed_minimodal(&handle);

        // The watcher must outlive the hook call itself: a flag change well
        // after setup still reaches the mirror, synchronously.
        engine.animated().set(Some(true));
        assert!(handle.animated(), "mirror did not observe Some(true)");
    }

    #[test]
    fn test_mirror_keeps_watching_through_clones() {
        let app = setup();

        let handle = use_modal_in(app);
        let kept = handle.clone();
        drop(handle);

        // The clone shares the watcher; dropping the original must not
        // stop it.
        installed_minimodal(&kept).animated().set(Some(true));
        assert!(kept.animated());

        installed_minimodal(&kept).animated().set(None);
        assert!(!kept.animated());
    }

    #[test]
    fn test_settings_visible_through_handle() {
        let app = setup();
        let handle = use_modal_in(app);

        let settings = handle.settings().unwrap();
        assert!(settings.focus.enabled);

        // The handle surfaces the engine's construction copy, in which the
        // installer neutered trigger wiring; the published slot keeps the
        // caller's intent (None here, the default).
        assert_eq!(settings.triggers.enabled, Some(false));
        let published = crate::registry::inject_settings(app).unwrap();
        assert_eq!(published.triggers.enabled, None);
    }

    #[test]
    fn test_open_close_through_minimodal_surface() {
        reset_apps();
        reset_mounted();

        let app = AppHandle::new();
        install_minimodal_with_stack(app);

        let handle = use_modal_in(app);
        handle.open_modal("a").unwrap();
        handle.open_modal("b").unwrap();
        handle.close_all_modals().unwrap();
        assert_eq!(handle.close_modal(None), Err(ModalError::NothingOpen));
    }

    fn install_minimodal_with_stack(app: AppHandle) {
        use crate::settings::{ModalSettings, MultipleSettings};
        install(
            app,
            Some(ModalSettings {
                multiple: MultipleSettings { enabled: true },
                ..Default::default()
            }),
        );
    }

    #[test]
    fn test_minimodal_downcast_not_needed_for_ops() {
        // The façade only ever goes through the trait; make sure a plain
        // Minimodal round-trips through it unchanged.
        let engine: Rc<dyn ModalEngine> = Rc::new(Minimodal::new(Default::default()));
        let handle = ModalHandle::bound(engine.clone());
        handle.open_modal("x").unwrap();
        assert_eq!(engine.animated().get(), Some(true));
    }
}
