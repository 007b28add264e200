//! Global page state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Holds the resolved configuration plus the one-per-page listener flags.

use pm_ui_types::AdminUiConfig;
use std::cell::RefCell;

#[derive(Clone, Debug, Default)]
pub struct PageState {
    pub config: AdminUiConfig,
    /// Document-level dropdown closer installed.
    pub dropdown_closer_bound: bool,
}

thread_local! {
    static STATE: RefCell<PageState> = RefCell::new(PageState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&PageState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut PageState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

// ── Convenience accessors ──

pub fn config() -> AdminUiConfig {
    with(|s| s.config.clone())
}

pub fn set_config(config: AdminUiConfig) {
    with_mut(|s| s.config = config);
}

pub fn debug_enabled() -> bool {
    with(|s| s.config.debug)
}

/// Returns `true` the first time it is called.
pub fn claim_dropdown_closer() -> bool {
    with_mut(|s| !std::mem::replace(&mut s.dropdown_closer_bound, true))
}
