//! Keystroke model and trigger matching.

use crate::insert::target::InsertMode;
use crate::model::settings::TriggerBinding;

/// Key event as reported by the host (`KeyboardEvent.key` + modifiers).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn is(&self, key: &str) -> bool {
        self.key == key
    }
}

impl TriggerBinding {
    /// Returns whether `input` opens the picker under this binding.
    ///
    /// `Ctrl+/` also accepts `Cmd+/` for macOS hosts.
    pub fn matches(self, input: &KeyInput) -> bool {
        if !input.is("/") || input.alt {
            return false;
        }
        match self {
            Self::Slash => !input.ctrl && !input.meta,
            Self::CtrlSlash => input.ctrl || input.meta,
        }
    }

    /// Insertion mode for a note picked after this trigger.
    ///
    /// A bare `/` lands in the field and has to be replaced; `Ctrl+/` does
    /// not produce a character.
    pub fn insertion_mode(self) -> InsertMode {
        match self {
            Self::Slash => InsertMode::ReplaceTrailingChar,
            Self::CtrlSlash => InsertMode::Append,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KeyInput;
    use crate::insert::target::InsertMode;
    use crate::model::settings::TriggerBinding;

    #[test]
    fn bare_slash_binding_ignores_modified_slash() {
        assert!(TriggerBinding::Slash.matches(&KeyInput::new("/")));
        assert!(!TriggerBinding::Slash.matches(&KeyInput::new("/").with_ctrl()));
        assert!(!TriggerBinding::Slash.matches(&KeyInput::new("?")));
    }

    #[test]
    fn ctrl_binding_requires_modifier() {
        assert!(!TriggerBinding::CtrlSlash.matches(&KeyInput::new("/")));
        assert!(TriggerBinding::CtrlSlash.matches(&KeyInput::new("/").with_ctrl()));
        assert!(TriggerBinding::CtrlSlash.matches(&KeyInput::new("/").with_meta()));
        assert_eq!(TriggerBinding::CtrlSlash.insertion_mode(), InsertMode::Append);
    }
}
