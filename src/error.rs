//! Error taxonomy for modal operations.
//!
//! Startup failures (engine construction) are fatal and propagate as panics
//! from the engine constructor; everything after install is a `Result` at the
//! operation call site. Missing-installation misuse is deferred: the hook
//! itself never fails, its operations report [`ModalError::NotInstalled`]
//! when invoked.

use thiserror::Error;

/// Errors surfaced by modal operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// An operation was invoked through a handle obtained outside any
    /// installed application.
    #[error("modal plugin is not installed in this application")]
    NotInstalled,

    /// `open_modal` was asked to open a modal that is already on the stack.
    #[error("modal `{0}` is already open")]
    AlreadyOpen(String),

    /// `close_modal` was asked to close a modal that is not open.
    #[error("modal `{0}` is not open")]
    NotOpen(String),

    /// A close operation ran with no modal open.
    #[error("no modal is open")]
    NothingOpen,
}
