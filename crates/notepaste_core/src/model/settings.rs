//! User settings document and trigger binding.
//!
//! # Responsibility
//! - Define the persisted `settings` shape written by the settings surface.
//! - Resolve the inline picker trigger binding from one canonical flag.
//!
//! # Invariants
//! - Unknown or missing fields fall back to defaults instead of failing reads.
//! - Legacy trigger keys (`useShiftSlash`, `useSlashWithCtrl`) map onto the
//!   canonical `useCtrlSlash` flag, even when both are present.

use serde::{Deserialize, Serialize};

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSettings")]
pub struct Settings {
    /// When set, the picker opens on `Ctrl+/` instead of a bare `/`.
    pub use_ctrl_slash: bool,
    pub auto_fill_placeholders: bool,
    /// Request a generated name for newly created notes.
    pub autoname_selection: bool,
    /// Credential for the remote naming service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_sounds: Option<bool>,
}

/// Read-side shape; older surfaces wrote the trigger flag under other keys,
/// sometimes more than one of them in the same document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredSettings {
    use_ctrl_slash: Option<bool>,
    use_slash_with_ctrl: Option<bool>,
    use_shift_slash: Option<bool>,
    auto_fill_placeholders: bool,
    autoname_selection: bool,
    key: Option<String>,
    play_sounds: Option<bool>,
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        // Precedence: canonical, then popup key, then install seed key.
        let use_ctrl_slash = stored
            .use_ctrl_slash
            .or(stored.use_slash_with_ctrl)
            .or(stored.use_shift_slash)
            .unwrap_or(false);
        Self {
            use_ctrl_slash,
            auto_fill_placeholders: stored.auto_fill_placeholders,
            autoname_selection: stored.autoname_selection,
            key: stored.key,
            play_sounds: stored.play_sounds,
        }
    }
}

impl Settings {
    /// Returns the active picker trigger binding.
    pub fn trigger_binding(&self) -> TriggerBinding {
        if self.use_ctrl_slash {
            TriggerBinding::CtrlSlash
        } else {
            TriggerBinding::Slash
        }
    }
}

/// Keystroke that opens the inline picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerBinding {
    /// Bare `/`, which is also typed into the focused field.
    #[default]
    Slash,
    /// `Ctrl+/`, which does not produce a character in the field.
    CtrlSlash,
}

#[cfg(test)]
mod tests {
    use super::{Settings, TriggerBinding};

    #[test]
    fn legacy_trigger_keys_map_to_canonical_flag() {
        let shift: Settings =
            serde_json::from_value(serde_json::json!({ "useShiftSlash": true })).unwrap();
        let ctrl: Settings =
            serde_json::from_value(serde_json::json!({ "useSlashWithCtrl": true })).unwrap();
        assert_eq!(shift.trigger_binding(), TriggerBinding::CtrlSlash);
        assert_eq!(ctrl.trigger_binding(), TriggerBinding::CtrlSlash);
    }

    #[test]
    fn both_legacy_keys_resolve_to_popup_key() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "useShiftSlash": false,
            "useSlashWithCtrl": true,
            "autonameSelection": true
        }))
        .unwrap();
        assert_eq!(settings.trigger_binding(), TriggerBinding::CtrlSlash);
        assert!(settings.autoname_selection);
    }

    #[test]
    fn canonical_key_wins_over_legacy_keys() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "useCtrlSlash": false,
            "useSlashWithCtrl": true,
            "useShiftSlash": true
        }))
        .unwrap();
        assert_eq!(settings.trigger_binding(), TriggerBinding::Slash);
    }

    #[test]
    fn written_settings_read_back_unchanged() {
        let settings = Settings {
            use_ctrl_slash: true,
            key: Some("sk".to_string()),
            play_sounds: Some(false),
            ..Settings::default()
        };
        let value = serde_json::to_value(&settings).unwrap();
        let back: Settings = serde_json::from_value(value).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.trigger_binding(), TriggerBinding::Slash);
    }

    #[test]
    fn serializes_canonical_key_only() {
        let value = serde_json::to_value(Settings {
            use_ctrl_slash: true,
            ..Settings::default()
        })
        .unwrap();
        assert_eq!(value["useCtrlSlash"], true);
        assert!(value.get("useShiftSlash").is_none());
        assert!(value.get("key").is_none());
    }
}
