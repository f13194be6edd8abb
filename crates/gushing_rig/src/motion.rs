//! Respecting the reduced motion accessibility preference.
//!
//! Only the ambient idle wiggle is ever suppressed. Poking the rig always gets you a spray,
//! because that's a direct response to something the user did.

/// Whether to follow the system's reduced motion preference or to ignore it.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReducedMotionOverride {
    /// Follow the system preference
    #[default]
    System,
    /// Always reduce motion
    ForcedOn,
    /// Never reduce motion
    ForcedOff,
}

impl ReducedMotionOverride {
    /// The forced value, if there is one.
    #[must_use]
    pub const fn forced(self) -> Option<bool> {
        match self {
            Self::System => None,
            Self::ForcedOn => Some(true),
            Self::ForcedOff => Some(false),
        }
    }
}

/// Should the rig wiggle when it's at rest?
///
/// `system_reduced` is `None` when the host can't tell us the preference, in which case we
/// carry on as though no reduction was asked for.
#[must_use]
pub fn is_idle_animation_enabled(
    idle: bool,
    reduced_motion: ReducedMotionOverride,
    system_reduced: Option<bool>,
) -> bool {
    let is_reduced = reduced_motion
        .forced()
        .unwrap_or_else(|| system_reduced.unwrap_or(false));
    idle && !is_reduced
}

/// The system-wide reduced motion preference. The host owns this and updates it, each rig holds
/// a [`MotionSubscription`] to it.
#[derive(Debug)]
pub struct SystemMotionPreference {
    /// The sending side of the preference. `None` means unknown.
    preference_tx: tokio::sync::watch::Sender<Option<bool>>,
}

impl Default for SystemMotionPreference {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SystemMotionPreference {
    /// The name of the ENV variable that hosts can use to report the preference.
    pub const ENV_KEY: &'static str = "GUSHER_REDUCED_MOTION";

    /// Instantiate with a known, or unknown, initial preference.
    #[must_use]
    pub fn new(initial: Option<bool>) -> Self {
        let (preference_tx, _) = tokio::sync::watch::channel(initial);
        Self { preference_tx }
    }

    /// Read the preference from the [`Self::ENV_KEY`] ENV variable.
    #[must_use]
    pub fn from_env() -> Self {
        let initial = std::env::var(Self::ENV_KEY)
            .ok()
            .and_then(|value| Self::parse(&value));
        tracing::debug!("System reduced motion preference from ENV: {initial:?}");
        Self::new(initial)
    }

    /// Parse a textual preference. Anything unrecognised is treated as unknown.
    #[must_use]
    pub fn parse(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "reduce" | "reduced" => Some(true),
            "0" | "false" | "no-preference" => Some(false),
            _ => None,
        }
    }

    /// Report a change of preference to all subscribers.
    pub fn set(&self, reduced: Option<bool>) {
        tracing::debug!("System reduced motion preference changed to: {reduced:?}");
        self.preference_tx.send_replace(reduced);
    }

    /// The current preference.
    #[must_use]
    pub fn get(&self) -> Option<bool> {
        *self.preference_tx.borrow()
    }

    /// Start listening to changes. The subscription is released when it's dropped.
    #[must_use]
    pub fn subscribe(&self) -> MotionSubscription {
        MotionSubscription {
            preference_rx: self.preference_tx.subscribe(),
        }
    }

    /// How many live subscriptions there are.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.preference_tx.receiver_count()
    }
}

/// A live subscription to the system preference.
#[derive(Debug)]
pub struct MotionSubscription {
    /// The receiving side of the preference.
    preference_rx: tokio::sync::watch::Receiver<Option<bool>>,
}

impl MotionSubscription {
    /// The preference as it is right now, marking it as seen.
    pub fn current(&mut self) -> Option<bool> {
        *self.preference_rx.borrow_and_update()
    }

    /// Wait for the next change. The outer `None` means the host has gone away and there will be
    /// no more changes.
    pub async fn changed(&mut self) -> Option<Option<bool>> {
        self.preference_rx.changed().await.ok()?;
        Some(*self.preference_rx.borrow_and_update())
    }
}
