//! Modal settings - per-subsystem option groups.
//!
//! Settings are a plain record of option groups, one per engine subsystem
//! (focus, style, multiple, triggers). Each group carries an activation flag;
//! groups left unspecified fall back to their defaults rather than failing.
//!
//! The triggers group is the odd one out: its flag is tri-state. `None` means
//! "wire triggers unless the caller explicitly opted out", which the installer
//! relies on to defer the engine constructor's auto-wiring side effect.

use bitflags::bitflags;

// =============================================================================
// Option Groups
// =============================================================================

/// Focus-trap subsystem options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSettings {
    /// Whether the engine traps and restores focus. On by default.
    pub enabled: bool,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Built-in styling subsystem options (backdrop, scroll gutter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSettings {
    /// Whether the engine applies its default styling. On by default.
    pub enabled: bool,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Stacked-modal subsystem options.
///
/// Off by default: opening a modal replaces the currently open one unless the
/// caller opts into stacking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultipleSettings {
    /// Whether more than one modal may be open at a time.
    pub enabled: bool,
}

/// Action a trigger dispatches when fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    /// Open the modal with the given id.
    Open(String),
    /// Close the topmost open modal.
    Close,
    /// Close every open modal.
    CloseAll,
}

/// A declarative trigger: a named target bound to a modal action.
///
/// The stand-in for trigger elements in a host UI. The host fires a target by
/// name; the engine dispatches the bound action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerBinding {
    /// Host-side name of the trigger (e.g. a button id).
    pub target: String,
    /// Action dispatched when the target fires.
    pub action: TriggerAction,
}

impl TriggerBinding {
    /// Bind `target` to opening the modal `modal_id`.
    pub fn open(target: impl Into<String>, modal_id: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            action: TriggerAction::Open(modal_id.into()),
        }
    }

    /// Bind `target` to closing the topmost modal.
    pub fn close(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            action: TriggerAction::Close,
        }
    }

    /// Bind `target` to closing every open modal.
    pub fn close_all(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            action: TriggerAction::CloseAll,
        }
    }
}

/// Trigger-wiring subsystem options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerSettings {
    /// Tri-state activation flag.
    ///
    /// - `None`: wire triggers (the default-on interpretation)
    /// - `Some(true)`: wire triggers
    /// - `Some(false)`: never wire triggers automatically
    pub enabled: Option<bool>,
    /// Bindings wired when trigger activation runs.
    pub bindings: Vec<TriggerBinding>,
}

// =============================================================================
// ModalSettings
// =============================================================================

/// Full settings record handed to [`install`](crate::install).
///
/// Every group is optional in spirit: `ModalSettings::default()` yields a
/// working configuration, and struct-update syntax fills the rest:
///
/// ```
/// use spark_modal::{ModalSettings, MultipleSettings};
///
/// let settings = ModalSettings {
///     multiple: MultipleSettings { enabled: true },
///     ..Default::default()
/// };
/// assert!(settings.focus.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalSettings {
    /// Focus-trap subsystem.
    pub focus: FocusSettings,
    /// Default styling subsystem.
    pub style: StyleSettings,
    /// Stacked-modal subsystem.
    pub multiple: MultipleSettings,
    /// Trigger-wiring subsystem.
    pub triggers: TriggerSettings,
}

impl ModalSettings {
    /// Compute the active-subsystem set for these settings.
    pub fn features(&self) -> ModalFeatures {
        let mut features = ModalFeatures::empty();
        if self.focus.enabled {
            features |= ModalFeatures::FOCUS;
        }
        if self.style.enabled {
            features |= ModalFeatures::STYLE;
        }
        if self.multiple.enabled {
            features |= ModalFeatures::MULTIPLE;
        }
        if self.triggers.enabled != Some(false) {
            features |= ModalFeatures::TRIGGERS;
        }
        features
    }
}

bitflags! {
    /// Active engine subsystems, derived from [`ModalSettings`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModalFeatures: u8 {
        /// Focus trapping and focus return.
        const FOCUS = 1 << 0;
        /// Default styling (backdrop, scroll gutter).
        const STYLE = 1 << 1;
        /// More than one modal open at a time.
        const MULTIPLE = 1 << 2;
        /// Automatic trigger wiring.
        const TRIGGERS = 1 << 3;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ModalSettings::default();
        assert!(settings.focus.enabled);
        assert!(settings.style.enabled);
        assert!(!settings.multiple.enabled);
        assert_eq!(settings.triggers.enabled, None);
        assert!(settings.triggers.bindings.is_empty());
    }

    #[test]
    fn test_features_default() {
        let features = ModalSettings::default().features();
        assert!(features.contains(ModalFeatures::FOCUS));
        assert!(features.contains(ModalFeatures::STYLE));
        assert!(!features.contains(ModalFeatures::MULTIPLE));
        // Tri-state None counts as enabled.
        assert!(features.contains(ModalFeatures::TRIGGERS));
    }

    #[test]
    fn test_features_triggers_explicit_off() {
        let settings = ModalSettings {
            triggers: TriggerSettings {
                enabled: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!settings.features().contains(ModalFeatures::TRIGGERS));
    }

    #[test]
    fn test_features_triggers_explicit_on() {
        let settings = ModalSettings {
            triggers: TriggerSettings {
                enabled: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(settings.features().contains(ModalFeatures::TRIGGERS));
    }

    #[test]
    fn test_trigger_binding_constructors() {
        let open = TriggerBinding::open("btn-open", "settings-modal");
        assert_eq!(open.target, "btn-open");
        assert_eq!(open.action, TriggerAction::Open("settings-modal".to_string()));

        let close = TriggerBinding::close("btn-close");
        assert_eq!(close.action, TriggerAction::Close);

        let close_all = TriggerBinding::close_all("btn-close-all");
        assert_eq!(close_all.action, TriggerAction::CloseAll);
    }
}
