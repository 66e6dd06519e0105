//! # spark-modal
//!
//! Accessible modal plugin for [spark-signals](https://github.com/RLabs-Inc/spark-signals)
//! reactive applications.
//!
//! The crate is integration glue, not a modal engine: the behavioral pieces
//! (focus trapping, styling, stacking policy) live behind the [`ModalEngine`]
//! seam. What lives here is the plumbing every host needs exactly once:
//!
//! ```text
//! install(app, settings) → engine constructed (triggers deferred)
//!                        → settings + controller injection slots
//!                        → triggers wired
//!                        → "AccessibleMinimodal" component registered
//!
//! use_modal() → ModalHandle { bound operations, animated mirror, raw controller }
//! ```
//!
//! The installer runs once per application handle; the accessor hook runs any
//! number of times afterward, each call getting its own `animated` mirror
//! signal watching the one shared controller.
//!
//! ## Example
//!
//! ```
//! use spark_modal::{install, use_modal, with_setup, AppHandle, ModalSettings, MultipleSettings};
//!
//! let app = AppHandle::new();
//! install(app, Some(ModalSettings {
//!     multiple: MultipleSettings { enabled: true },
//!     ..Default::default()
//! }));
//!
//! let modal = with_setup(app, use_modal);
//! modal.open_modal("settings").unwrap();
//! assert!(modal.animated());
//! ```
//!
//! ## Modules
//!
//! - [`settings`] - Option groups and the active-subsystem feature set
//! - [`engine`] - The [`ModalEngine`] seam and the bundled [`Minimodal`] engine
//! - [`registry`] - App-keyed injection slots and the setup context stack
//! - [`install`] - One-shot plugin registration
//! - [`accessor`] - The `use_modal` hook and [`ModalHandle`] façade
//! - [`component`] - Companion component props and mount glue

pub mod accessor;
pub mod component;
pub mod engine;
pub mod error;
pub mod install;
pub mod registry;
pub mod settings;

// Re-export the full public surface

pub use accessor::{try_use_modal, try_use_modal_in, use_modal, use_modal_in, ModalHandle};

pub use component::{
    accessible_minimodal, mounted_modals, reset_mounted, Cleanup, ModalProps, PropValue, VAlign,
    MODAL_COMPONENT_NAME,
};

pub use engine::{Minimodal, ModalEngine};

pub use error::ModalError;

pub use install::{install, install_with};

pub use registry::{
    component, current_app, enter_setup, exit_setup, inject_controller, inject_settings,
    provide_controller, provide_settings, register_component, reset_apps, with_setup, AppHandle,
    ComponentFactory,
};

pub use settings::{
    FocusSettings, ModalFeatures, ModalSettings, MultipleSettings, StyleSettings, TriggerAction,
    TriggerBinding, TriggerSettings,
};
