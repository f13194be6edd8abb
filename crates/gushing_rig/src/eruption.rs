//! The synchronous heart of the rig: a trigger starts an eruption, and two resets later it's back
//! to rest.
//!
//! "Erupting" and "cooling down" overlap, so rather than an enum of states there are just 2
//! independent resets. Each trigger bumps a generation counter, and each reset is tagged with the
//! generation that scheduled it. A reset from an older generation is ignored, so a slow reset
//! from a previous poke can't cut short a newer eruption.

use rand::Rng;

use crate::droplet::{Droplet, DropletIds};
use crate::physics::ValidatedPhysics;

/// How long the rig rumbles after being poked.
pub const RUMBLE_WINDOW: std::time::Duration = std::time::Duration::from_millis(1000);

/// How long the spray of droplets stays around after being poked.
pub const SPRAY_WINDOW: std::time::Duration = std::time::Duration::from_millis(1400);

/// The state of one rig.
#[derive(Debug)]
pub struct Eruption {
    /// The ranges to sample droplets from.
    physics: ValidatedPhysics,
    /// Droplets per eruption.
    droplet_count: usize,
    /// Source of droplet IDs.
    ids: DropletIds,
    /// Incremented by every trigger. 0 means the rig has never been poked.
    generation: u64,
    /// True from a trigger until its rumble window elapses.
    is_erupting: bool,
    /// The live spray. Empty when at rest.
    current_batch: Vec<Droplet>,
}

impl Eruption {
    /// Instantiate a rig at rest.
    #[must_use]
    pub fn new(physics: ValidatedPhysics, droplet_count: usize) -> Self {
        Self {
            physics,
            droplet_count,
            ids: DropletIds::default(),
            generation: 0,
            is_erupting: false,
            current_batch: Vec::new(),
        }
    }

    /// Poke the rig. Always allowed, even mid-eruption, in which case the old spray is thrown
    /// away and a fresh one replaces it.
    ///
    /// Returns the generation that the caller should tag its deferred resets with.
    pub fn trigger<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.is_erupting = true;
        self.current_batch =
            crate::sampler::sample(&self.physics, self.droplet_count, &mut self.ids, rng);

        tracing::debug!(
            "Eruption {} started with {} droplets",
            self.generation,
            self.current_batch.len()
        );
        self.generation
    }

    /// The rumble window of `generation` has elapsed. Returns whether anything changed.
    pub fn rumble_elapsed(&mut self, generation: u64) -> bool {
        if !self.is_current(generation, "rumble") || !self.is_erupting {
            return false;
        }
        self.is_erupting = false;
        true
    }

    /// The spray window of `generation` has elapsed. Returns whether anything changed.
    pub fn spray_elapsed(&mut self, generation: u64) -> bool {
        if !self.is_current(generation, "spray") || self.current_batch.is_empty() {
            return false;
        }
        self.current_batch.clear();
        true
    }

    /// Whether a reset belongs to the most recent trigger.
    fn is_current(&self, generation: u64, reset: &str) -> bool {
        if generation == self.generation {
            return true;
        }

        tracing::trace!(
            "Ignoring stale {reset} reset from eruption {generation}, now on {}",
            self.generation
        );
        false
    }

    /// The number of triggers so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Is the rig rumbling?
    #[must_use]
    pub const fn is_erupting(&self) -> bool {
        self.is_erupting
    }

    /// The live spray.
    #[must_use]
    pub fn current_batch(&self) -> &[Droplet] {
        &self.current_batch
    }
}
