//! Companion modal component - props contract and mount glue.
//!
//! Rendering is the host's job; this module defines the props the component
//! accepts and the mount/unmount bookkeeping the plugin layer owns. Mounting
//! registers the modal surface id for the current app so the host renderer
//! (and the engine's stack) have a surface to address; the returned cleanup
//! deregisters it.
//!
//! The component is registered by the installer under the fixed name
//! [`MODAL_COMPONENT_NAME`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::Signal;

use crate::registry::{current_app, AppHandle};

/// Fixed name the component is registered under at install time.
pub const MODAL_COMPONENT_NAME: &str = "AccessibleMinimodal";

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// PropValue - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Static props are read once; signal and getter props stay live, so a host
/// can flip `hide_close_btn` reactively without remounting the component.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Vertical alignment of the modal within its viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Align to the top edge.
    Top,
    /// Align to the bottom edge.
    Bottom,
    /// Center vertically (the default).
    #[default]
    Center,
}

/// Props accepted by the companion modal component.
///
/// Only `id` is required - it names the modal surface the engine's
/// open/close operations address.
#[derive(Clone)]
pub struct ModalProps {
    /// Modal surface id. Required.
    pub id: String,
    /// Hide the built-in close button.
    pub hide_close_btn: PropValue<bool>,
    /// Opt out of the engine's default styling for this surface.
    pub reset_styles: PropValue<bool>,
    /// Vertical alignment within the viewport.
    pub valign: PropValue<VAlign>,
}

impl ModalProps {
    /// Props for the modal surface `id`, everything else defaulted.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hide_close_btn: PropValue::default(),
            reset_styles: PropValue::default(),
            valign: PropValue::default(),
        }
    }

    /// Set `hide_close_btn`.
    pub fn hide_close_btn(mut self, value: impl Into<PropValue<bool>>) -> Self {
        self.hide_close_btn = value.into();
        self
    }

    /// Set `reset_styles`.
    pub fn reset_styles(mut self, value: impl Into<PropValue<bool>>) -> Self {
        self.reset_styles = value.into();
        self
    }

    /// Set `valign`.
    pub fn valign(mut self, value: impl Into<PropValue<VAlign>>) -> Self {
        self.valign = value.into();
        self
    }
}

// =============================================================================
// Mounted Surfaces
// =============================================================================

thread_local! {
    /// Mounted modal surfaces per app: id → props of the mounted component.
    static MOUNTED: RefCell<HashMap<AppHandle, Vec<ModalProps>>> = RefCell::new(HashMap::new());
}

/// Ids of the modal surfaces currently mounted in `app`, in mount order.
pub fn mounted_modals(app: AppHandle) -> Vec<String> {
    MOUNTED.with(|mounted| {
        mounted
            .borrow()
            .get(&app)
            .map(|surfaces| surfaces.iter().map(|p| p.id.clone()).collect())
            .unwrap_or_default()
    })
}

/// Reset all mounted-surface state (for testing).
pub fn reset_mounted() {
    MOUNTED.with(|mounted| mounted.borrow_mut().clear());
}

// =============================================================================
// Component
// =============================================================================

/// Mount a modal surface in the current app's setup context.
///
/// Registers `props.id` as a mounted surface and returns a cleanup that
/// removes it. Mounting outside any app context is a traced no-op: the
/// returned cleanup does nothing, matching the plugin's degrade-silently
/// posture for misuse during setup.
pub fn accessible_minimodal(props: ModalProps) -> Cleanup {
    let Some(app) = current_app() else {
        tracing::debug!(modal = %props.id, "modal surface mounted outside any app context");
        return Box::new(|| {});
    };

    tracing::trace!(modal = %props.id, ?app, "mount modal surface");
    let id = props.id.clone();
    MOUNTED.with(|mounted| {
        mounted.borrow_mut().entry(app).or_default().push(props);
    });

    Box::new(move || {
        MOUNTED.with(|mounted| {
            if let Some(surfaces) = mounted.borrow_mut().get_mut(&app) {
                if let Some(position) = surfaces.iter().position(|p| p.id == id) {
                    surfaces.remove(position);
                }
            }
        });
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{reset_apps, with_setup};
    use spark_signals::signal;

    fn setup() {
        reset_apps();
        reset_mounted();
    }

    #[test]
    fn test_mount_and_cleanup() {
        setup();

        let app = AppHandle::new();
        let cleanup = with_setup(app, || accessible_minimodal(ModalProps::new("settings")));

        assert_eq!(mounted_modals(app), vec!["settings".to_string()]);

        cleanup();
        assert!(mounted_modals(app).is_empty());
    }

    #[test]
    fn test_mount_outside_context_is_noop() {
        setup();

        let cleanup = accessible_minimodal(ModalProps::new("orphan"));
        cleanup();

        let app = AppHandle::new();
        assert!(mounted_modals(app).is_empty());
    }

    #[test]
    fn test_mount_order_preserved() {
        setup();

        let app = AppHandle::new();
        with_setup(app, || {
            let _a = accessible_minimodal(ModalProps::new("a"));
            let _b = accessible_minimodal(ModalProps::new("b"));
        });

        assert_eq!(mounted_modals(app), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_props_builder_defaults() {
        let props = ModalProps::new("m");
        assert_eq!(props.id, "m");
        assert!(!props.hide_close_btn.get());
        assert!(!props.reset_styles.get());
        assert_eq!(props.valign.get(), VAlign::Center);
    }

    #[test]
    fn test_reactive_prop_stays_live() {
        let hide = signal(false);
        let props = ModalProps::new("m").hide_close_btn(hide.clone());

        assert!(!props.hide_close_btn.get());
        hide.set(true);
        assert!(props.hide_close_btn.get());
    }

    #[test]
    fn test_valign_prop() {
        let props = ModalProps::new("m").valign(VAlign::Top);
        assert_eq!(props.valign.get(), VAlign::Top);
    }
}
