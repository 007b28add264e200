//! Page configuration.
//!
//! Read once at start-up from
//! `<script type="application/json" id="admin-ui-config">`. A missing block
//! means defaults; a malformed one is reported and also falls back to defaults.

use crate::console;
use crate::dom;
use pm_ui_types::AdminUiConfig;

pub const CONFIG_ELEMENT_ID: &str = "admin-ui-config";

pub fn load() -> AdminUiConfig {
    let Some(raw) = dom::by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) else {
        return AdminUiConfig::default();
    };
    if raw.trim().is_empty() {
        return AdminUiConfig::default();
    }
    match AdminUiConfig::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            console::warn(&format!("{e:#}; using defaults"));
            AdminUiConfig::default()
        }
    }
}
