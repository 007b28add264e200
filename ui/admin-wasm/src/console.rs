//! Browser console logging. Debug output only appears with `"debug": true`
//! in the page config.

use crate::state;

pub fn debug(msg: &str) {
    if state::debug_enabled() {
        gloo_console::debug!("[admin-ui]", msg);
    }
}

pub fn warn(msg: &str) {
    gloo_console::warn!("[admin-ui]", msg);
}
