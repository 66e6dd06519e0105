//! Modal engine seam and the bundled default engine.
//!
//! The plugin layer is deliberately thin: everything behavioral lives behind
//! the [`ModalEngine`] trait, which captures the exact surface the installer
//! and accessor rely on - settings, the reactive `animated` flag, and the
//! five operations. Nothing in this crate assumes members beyond these.
//!
//! [`Minimodal`] is the bundled engine: a reactive open-modal stack with
//! declarative trigger wiring. It implements modal bookkeeping, not modal
//! behavior - focus trapping, styling, and animation timing belong to the
//! host renderer.

use std::cell::RefCell;

use spark_signals::{signal, Signal};

use crate::error::ModalError;
use crate::settings::{ModalFeatures, ModalSettings, TriggerAction, TriggerBinding};

// =============================================================================
// ModalEngine - the collaborator seam
// =============================================================================

/// Surface of a modal controller as seen by the plugin layer.
///
/// Object-safe: engines are shared as `Rc<dyn ModalEngine>` between the
/// injection slot and every accessor handle. All methods take `&self`;
/// engines use interior mutability, like all reactive state in this stack.
pub trait ModalEngine {
    /// The engine's settings record.
    fn settings(&self) -> ModalSettings;

    /// The engine's animation flag.
    ///
    /// Tri-state on purpose: `None` means "no transition has happened yet"
    /// and is distinct from `Some(false)` (a transition that settled). The
    /// accessor bridge normalizes both to `false` for consumers.
    fn animated(&self) -> Signal<Option<bool>>;

    /// Open the modal with the given id.
    fn open_modal(&self, id: &str) -> Result<(), ModalError>;

    /// Close a modal: `Some(id)` closes that modal, `None` the topmost one.
    fn close_modal(&self, id: Option<&str>) -> Result<(), ModalError>;

    /// Close every open modal.
    fn close_all_modals(&self) -> Result<(), ModalError>;

    /// Width of the scroll gutter the engine reserves while a modal locks
    /// scrolling, in cells.
    fn scrollbar_width(&self) -> u16;

    /// Wire the declared triggers. Idempotent per target.
    fn add_triggers(&self);
}

// =============================================================================
// Minimodal - bundled default engine
// =============================================================================

/// The bundled stack-based modal engine.
///
/// State is held in signals so that deriveds and effects in the host
/// application react to stack and animation changes without any wiring
/// beyond reading them.
///
/// # Construction side effect
///
/// `Minimodal::new` wires triggers immediately when the triggers subsystem is
/// active. The installer constructs the engine with a neutered trigger flag
/// and re-activates after the engine is published, so triggers can never fire
/// against a controller no component can reach yet.
pub struct Minimodal {
    settings: ModalSettings,
    features: ModalFeatures,
    /// Open modal ids, bottom to top.
    open_stack: Signal<Vec<String>>,
    animated: Signal<Option<bool>>,
    wired: RefCell<Vec<TriggerBinding>>,
}

impl Minimodal {
    /// Construct an engine from settings.
    ///
    /// Wires triggers right away unless `settings.triggers.enabled` is
    /// literally `Some(false)`.
    pub fn new(settings: ModalSettings) -> Self {
        let features = settings.features();
        let engine = Self {
            settings,
            features,
            open_stack: signal(Vec::new()),
            animated: signal(None),
            wired: RefCell::new(Vec::new()),
        };
        if features.contains(ModalFeatures::TRIGGERS) {
            engine.add_triggers();
        }
        engine
    }

    /// The active-subsystem set.
    pub fn features(&self) -> ModalFeatures {
        self.features
    }

    /// Reactive open-modal stack, bottom to top.
    ///
    /// Reading it inside an effect or derived tracks stack changes.
    pub fn open_stack(&self) -> Signal<Vec<String>> {
        self.open_stack.clone()
    }

    /// Ids of the currently open modals, bottom to top.
    pub fn open_modals(&self) -> Vec<String> {
        self.open_stack.get()
    }

    /// Id of the topmost open modal.
    pub fn active_modal(&self) -> Option<String> {
        self.open_stack.get().last().cloned()
    }

    /// Whether the modal with the given id is open.
    pub fn is_open(&self, id: &str) -> bool {
        self.open_stack.get().iter().any(|open| open == id)
    }

    /// Number of wired triggers.
    pub fn trigger_count(&self) -> usize {
        self.wired.borrow().len()
    }

    /// Mark the current open/close transition as finished.
    ///
    /// The host calls this when its animation completes; consumers observing
    /// the accessor's `animated` mirror see the flag drop back to `false`.
    pub fn settle(&self) {
        self.animated.set(Some(false));
    }

    /// Fire the trigger wired to `target`, dispatching its bound action.
    ///
    /// Returns `Ok(false)` when no trigger is wired to that target.
    pub fn fire_trigger(&self, target: &str) -> Result<bool, ModalError> {
        let action = self
            .wired
            .borrow()
            .iter()
            .find(|binding| binding.target == target)
            .map(|binding| binding.action.clone());
        match action {
            None => Ok(false),
            Some(TriggerAction::Open(id)) => {
                self.open_modal(&id)?;
                Ok(true)
            }
            Some(TriggerAction::Close) => {
                self.close_modal(None)?;
                Ok(true)
            }
            Some(TriggerAction::CloseAll) => {
                self.close_all_modals()?;
                Ok(true)
            }
        }
    }

    fn begin_transition(&self) {
        self.animated.set(Some(true));
    }
}

impl ModalEngine for Minimodal {
    fn settings(&self) -> ModalSettings {
        self.settings.clone()
    }

    fn animated(&self) -> Signal<Option<bool>> {
        self.animated.clone()
    }

    fn open_modal(&self, id: &str) -> Result<(), ModalError> {
        let mut stack = self.open_stack.get();
        if stack.iter().any(|open| open == id) {
            return Err(ModalError::AlreadyOpen(id.to_string()));
        }
        if self.features.contains(ModalFeatures::MULTIPLE) {
            stack.push(id.to_string());
        } else {
            // Single-modal mode: opening replaces whatever is open.
            stack = vec![id.to_string()];
        }
        tracing::trace!(modal = id, depth = stack.len(), "open modal");
        self.open_stack.set(stack);
        self.begin_transition();
        Ok(())
    }

    fn close_modal(&self, id: Option<&str>) -> Result<(), ModalError> {
        let mut stack = self.open_stack.get();
        match id {
            None => {
                if stack.pop().is_none() {
                    return Err(ModalError::NothingOpen);
                }
            }
            Some(id) => {
                let Some(position) = stack.iter().position(|open| open == id) else {
                    return Err(ModalError::NotOpen(id.to_string()));
                };
                stack.remove(position);
            }
        }
        tracing::trace!(modal = ?id, depth = stack.len(), "close modal");
        self.open_stack.set(stack);
        self.begin_transition();
        Ok(())
    }

    fn close_all_modals(&self) -> Result<(), ModalError> {
        if self.open_stack.get().is_empty() {
            return Err(ModalError::NothingOpen);
        }
        tracing::trace!("close all modals");
        self.open_stack.set(Vec::new());
        self.begin_transition();
        Ok(())
    }

    fn scrollbar_width(&self) -> u16 {
        // One gutter cell while scroll-lock styling is active.
        if self.features.contains(ModalFeatures::STYLE) {
            1
        } else {
            0
        }
    }

    fn add_triggers(&self) {
        let mut wired = self.wired.borrow_mut();
        for binding in &self.settings.triggers.bindings {
            let already = wired.iter().any(|w| w.target == binding.target);
            if !already {
                tracing::trace!(target = %binding.target, "wire trigger");
                wired.push(binding.clone());
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
