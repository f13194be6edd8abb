//! The ways a rig can be poked.

/// A key, as far as the rig cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Return/Enter
    Enter,
    /// The space bar
    Space,
    /// Anything else, by name
    Other(String),
}

impl Key {
    /// Convert from a key name, either in the style of DOM's `KeyboardEvent.key` (`"Enter"`,
    /// `" "`) or a spelled out `"Space"`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" | "enter" | "Return" | "return" => Self::Enter,
            " " | "Space" | "space" => Self::Space,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Raw input arriving on the rig's interactive surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A pointer click
    Click,
    /// The pointer entering the rig. There's no debounce, every hover is a full poke.
    Hover,
    /// A key press while the rig is focused
    Key(Key),
}

/// What caused an eruption.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// Pointer click
    Click,
    /// Pointer hover
    Hover,
    /// `Enter` or `Space`
    Key,
}

/// Whether the host should go ahead with its own default handling of an input, like scrolling
/// the page on `Space`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The rig handled it, the host's default behaviour must be suppressed
    PreventDefault,
    /// The rig ignored it
    Default,
}

impl InputEvent {
    /// The trigger this input amounts to, if any.
    #[must_use]
    pub const fn trigger_source(&self) -> Option<TriggerSource> {
        match self {
            Self::Click => Some(TriggerSource::Click),
            Self::Hover => Some(TriggerSource::Hover),
            Self::Key(Key::Enter | Key::Space) => Some(TriggerSource::Key),
            Self::Key(Key::Other(_)) => None,
        }
    }

    /// Activation keys are consumed by the rig, everything else is left alone.
    #[must_use]
    pub const fn outcome(&self) -> KeyOutcome {
        match self {
            Self::Key(Key::Enter | Key::Space) => KeyOutcome::PreventDefault,
            Self::Click | Self::Hover | Self::Key(Key::Other(_)) => KeyOutcome::Default,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn activation_keys_trigger() {
        for name in ["Enter", " ", "Space"] {
            let event = InputEvent::Key(Key::from_name(name));
            assert_eq!(event.trigger_source(), Some(TriggerSource::Key));
            assert_eq!(event.outcome(), KeyOutcome::PreventDefault);
        }
    }

    #[test]
    fn other_keys_are_ignored() {
        let event = InputEvent::Key(Key::from_name("x"));
        assert_eq!(event.trigger_source(), None);
        assert_eq!(event.outcome(), KeyOutcome::Default);
    }

    #[test]
    fn pointer_events_trigger() {
        assert_eq!(
            InputEvent::Click.trigger_source(),
            Some(TriggerSource::Click)
        );
        assert_eq!(
            InputEvent::Hover.trigger_source(),
            Some(TriggerSource::Hover)
        );
        assert_eq!(InputEvent::Hover.outcome(), KeyOutcome::Default);
    }
}
