//! Running a rig as its own tokio task.
//!
//! All state changes happen inside the one task, in the order that messages arrive on its
//! protocol channel. Deferred resets are fire-and-forget tasks that just sleep and then send a
//! message back to the controller. Nothing ever cancels them, if the controller has gone by the
//! time they fire then their message is simply dropped.

use rand::Rng;
use snafu::ResultExt as _;

use crate::droplet::Droplet;
use crate::errors::{ConfigSnafu, ControllerEndedSnafu, GushingRigError};
use crate::eruption::{Eruption, RUMBLE_WINDOW, SPRAY_WINDOW};
use crate::input::{InputEvent, KeyOutcome, TriggerSource};
use crate::motion::{MotionSubscription, ReducedMotionOverride, SystemMotionPreference};
use crate::physics::RigConfig;

/// The size of the controller's inbound channel.
const PROTOCOL_BUFFER: usize = 64;

/// Messages that drive the controller.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Protocol {
    /// The rig was poked.
    Trigger(TriggerSource),
    /// The rumble window of the given generation has passed.
    RumbleElapsed(u64),
    /// The spray window of the given generation has passed.
    SprayElapsed(u64),
    /// Leave the controller loop.
    End,
}

/// Everything a renderer needs to draw the rig. One is published after every state change.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The number of eruptions so far.
    pub generation: u64,
    /// Whether the rig is rumbling.
    pub is_erupting: bool,
    /// The live spray, empty when at rest.
    pub current_batch: Vec<Droplet>,
    /// Whether the ambient idle wiggle should be playing.
    pub is_idle_animation_enabled: bool,
}

/// Called synchronously every time the rig erupts.
pub type OnErupt = Box<dyn Fn() + Send + Sync>;

/// Owns a rig and everything that happens to it.
pub struct Controller<R> {
    /// The state machine.
    eruption: Eruption,
    /// Random source for sampling droplets.
    rng: R,
    /// Whether the idle wiggle was asked for in the config.
    idle: bool,
    /// Whether to listen to the system's reduced motion preference.
    reduced_motion: ReducedMotionOverride,
    /// The last known system preference. `None` when unknown.
    system_reduced: Option<bool>,
    /// Our subscription to the system preference. Only taken out when following the system.
    motion: Option<MotionSubscription>,
    /// Optional notification for every eruption.
    on_erupt: Option<OnErupt>,
    /// Where snapshots are sent.
    output: tokio::sync::mpsc::Sender<Snapshot>,
}

/// What woke the controller loop.
enum Event {
    /// Something arrived on the protocol channel. `None` when every sender has gone.
    Protocol(Option<Protocol>),
    /// The system preference changed. `None` when the host stopped reporting it.
    Motion(Option<Option<bool>>),
}

impl<R: Rng + Send + Sync + 'static> Controller<R> {
    /// Instantiate. Refuses invalid physics, there's no sampling from inverted ranges.
    pub fn new(
        config: &RigConfig,
        rng: R,
        output: tokio::sync::mpsc::Sender<Snapshot>,
    ) -> Result<Self, GushingRigError> {
        let physics = config.physics.validate().context(ConfigSnafu)?;
        Ok(Self {
            eruption: Eruption::new(physics, config.droplet_count),
            rng,
            idle: config.idle,
            reduced_motion: config.reduced_motion,
            system_reduced: None,
            motion: None,
            on_erupt: None,
            output,
        })
    }

    /// Get told about every eruption. Panics in the callback are caught and logged, they never
    /// stop an eruption.
    #[must_use]
    pub fn with_on_erupt(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_erupt = Some(Box::new(callback));
        self
    }

    /// Follow the system's reduced motion preference. Does nothing when the config forces the
    /// preference either way.
    #[must_use]
    pub fn with_system_motion(mut self, preference: &SystemMotionPreference) -> Self {
        if let Some(forced) = self.reduced_motion.forced() {
            tracing::debug!("Reduced motion forced to {forced}, ignoring the system preference");
            return self;
        }

        let mut subscription = preference.subscribe();
        self.system_reduced = subscription.current();
        self.motion = Some(subscription);
        self
    }

    /// Start the controller loop.
    pub fn spawn(self) -> (ControllerHandle, tokio::task::JoinHandle<()>) {
        let (protocol_tx, protocol_rx) = tokio::sync::mpsc::channel(PROTOCOL_BUFFER);
        let timer_tx = protocol_tx.downgrade();
        let task = tokio::spawn(self.run(protocol_rx, timer_tx));
        (ControllerHandle { protocol_tx }, task)
    }

    /// The main loop.
    async fn run(
        mut self,
        mut protocol_rx: tokio::sync::mpsc::Receiver<Protocol>,
        timer_tx: tokio::sync::mpsc::WeakSender<Protocol>,
    ) {
        tracing::debug!("Starting eruption controller");
        self.publish().await;

        let mut motion = self.motion.take();

        loop {
            #[expect(
                clippy::integer_division_remainder_used,
                reason = "This is caused by the `tokio::select!`"
            )]
            let event = tokio::select! {
                message = protocol_rx.recv() => Event::Protocol(message),
                change = Self::next_motion_change(&mut motion), if motion.is_some() => {
                    Event::Motion(change)
                }
            };

            match event {
                Event::Protocol(None | Some(Protocol::End)) => break,
                Event::Protocol(Some(message)) => {
                    self.handle_protocol_message(message, &timer_tx).await;
                }
                Event::Motion(Some(reduced)) => self.set_system_reduced(reduced).await,
                Event::Motion(None) => {
                    tracing::debug!("System motion preference gone, keeping the last known one");
                    motion = None;
                }
            }
        }

        drop(motion);
        tracing::debug!("Leaving eruption controller loop");
    }

    /// Wait for the system preference to change.
    async fn next_motion_change(motion: &mut Option<MotionSubscription>) -> Option<Option<bool>> {
        match motion {
            Some(subscription) => subscription.changed().await,
            None => std::future::pending().await,
        }
    }

    /// Handle a single message from the protocol channel.
    async fn handle_protocol_message(
        &mut self,
        message: Protocol,
        timer_tx: &tokio::sync::mpsc::WeakSender<Protocol>,
    ) {
        tracing::trace!("Eruption controller received: {message:?}");
        let is_changed = match message {
            Protocol::Trigger(source) => {
                self.erupt(source, timer_tx);
                true
            }
            Protocol::RumbleElapsed(generation) => self.eruption.rumble_elapsed(generation),
            Protocol::SprayElapsed(generation) => self.eruption.spray_elapsed(generation),
            Protocol::End => false,
        };

        if is_changed {
            self.publish().await;
        }
    }

    /// Start a new eruption, replacing any current one.
    fn erupt(&mut self, source: TriggerSource, timer_tx: &tokio::sync::mpsc::WeakSender<Protocol>) {
        tracing::debug!("Rig poked by: {source:?}");
        let generation = self.eruption.trigger(&mut self.rng);
        self.notify_erupt();
        Self::schedule(timer_tx, RUMBLE_WINDOW, Protocol::RumbleElapsed(generation));
        Self::schedule(timer_tx, SPRAY_WINDOW, Protocol::SprayElapsed(generation));
    }

    /// Call the `on_erupt` callback, isolating any panic.
    fn notify_erupt(&self) {
        let Some(callback) = &self.on_erupt else {
            return;
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback));
        if let Err(payload) = result {
            let message: &str = if let Some(message) = payload.downcast_ref::<String>() {
                message
            } else if let Some(message) = payload.downcast_ref::<&str>() {
                message
            } else {
                "Caught a panic with an unknown type."
            };
            tracing::error!("`on_erupt` callback panicked: {message:?}");
        }
    }

    /// Send a message back to ourselves after a delay.
    fn schedule(
        timer_tx: &tokio::sync::mpsc::WeakSender<Protocol>,
        delay: std::time::Duration,
        message: Protocol,
    ) {
        let Some(protocol_tx) = timer_tx.upgrade() else {
            tracing::trace!("No senders left, not scheduling {message:?}");
            return;
        };

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if protocol_tx.send(message).await.is_err() {
                tracing::trace!("Controller ended before {message:?} fired");
            }
        });
    }

    /// Record a change in the system preference.
    async fn set_system_reduced(&mut self, reduced: Option<bool>) {
        let was_enabled = self.is_idle_animation_enabled();
        self.system_reduced = reduced;
        if was_enabled != self.is_idle_animation_enabled() {
            self.publish().await;
        }
    }

    /// Should the idle wiggle be playing?
    fn is_idle_animation_enabled(&self) -> bool {
        crate::motion::is_idle_animation_enabled(
            self.idle,
            self.reduced_motion,
            self.system_reduced,
        )
    }

    /// The current state, for the renderer.
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            generation: self.eruption.generation(),
            is_erupting: self.eruption.is_erupting(),
            current_batch: self.eruption.current_batch().to_vec(),
            is_idle_animation_enabled: self.is_idle_animation_enabled(),
        }
    }

    /// Send the current state to the renderer.
    async fn publish(&self) {
        let result = self.output.send(self.snapshot()).await;
        if let Err(error) = result {
            tracing::debug!("Renderer has gone, dropping snapshot: {error:?}");
        }
    }
}

/// A cheap, cloneable way to talk to a running controller.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    /// The controller's inbound channel.
    protocol_tx: tokio::sync::mpsc::Sender<Protocol>,
}

impl ControllerHandle {
    /// Poke the rig.
    pub async fn trigger(&self, source: TriggerSource) -> Result<(), GushingRigError> {
        self.send(Protocol::Trigger(source)).await
    }

    /// Pass on raw input. The returned outcome says whether the host must suppress its own
    /// default handling, like scrolling on `Space`. That holds even when the controller has
    /// ended, so a failed trigger is only logged. Use [`Self::trigger`] to see the error.
    pub async fn input(&self, event: &InputEvent) -> KeyOutcome {
        if let Some(source) = event.trigger_source() {
            if let Err(error) = self.trigger(source).await {
                tracing::warn!("Input {event:?} didn't reach the controller: {error}");
            }
        }
        event.outcome()
    }

    /// Ask the controller to exit its loop. Its motion subscription is released as it leaves.
    pub async fn end(&self) -> Result<(), GushingRigError> {
        self.send(Protocol::End).await
    }

    /// Send on the protocol channel.
    async fn send(&self, message: Protocol) -> Result<(), GushingRigError> {
        self.protocol_tx
            .send(message)
            .await
            .map_err(|_error| ControllerEndedSnafu.build())
    }
}
