//! A single droplet of oil.

/// One particle of a spray. Droplets are never changed once they're sampled, a new eruption
/// always brings a whole new batch.
///
/// A renderer is expected to start the droplet at the rig's nozzle and animate it to
/// `(dx, dy)` over `duration_ms`, after waiting `delay_ms`.
#[derive(serde::Serialize, bon::Builder, Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct Droplet {
    /// Only for telling droplets apart in a render list, never for ordering.
    pub id: u64,
    /// Horizontal displacement in pixels.
    pub dx: f32,
    /// Vertical displacement in pixels. Negative is up.
    pub dy: f32,
    /// Diameter in pixels.
    pub size: f32,
    /// How long the flight takes.
    pub duration_ms: f32,
    /// How long to wait before taking off.
    pub delay_ms: f32,
    /// The sampled direction of travel.
    pub angle_degrees: f32,
    /// The sampled distance of travel.
    pub magnitude: f32,
}

/// Hands out droplet IDs. They only ever go up, so they're unique for as long as the owning rig
/// lives.
#[derive(Default, Debug)]
pub struct DropletIds {
    /// The most recently issued ID
    last: u64,
}

impl DropletIds {
    /// Get a fresh ID. The first one is `1`.
    pub fn next_id(&mut self) -> u64 {
        self.last = self.last.wrapping_add(1);
        self.last
    }
}
