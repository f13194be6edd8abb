//! All the variables that shape a spray of droplets.

use snafu::ensure;

use crate::errors::{
    ConfigError, InvertedRangeSnafu, NegativeBoundSnafu, NonFiniteSnafu, RangeOverflowSnafu,
};

/// The numeric ranges that every droplet is sampled from.
///
/// Angles are in degrees and follow screen space, so `-90` points straight up. Powers and sizes
/// are in pixels, durations and delays in milliseconds.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// The direction the spray is centred on
    pub angle_center: f32,
    /// The total spread of the spray, half of it either side of the centre
    pub angle_spread: f32,
    /// The shortest distance a droplet travels
    pub power_min: f32,
    /// The furthest distance a droplet travels
    pub power_max: f32,
    /// Smallest droplet
    pub size_min: f32,
    /// Biggest droplet
    pub size_max: f32,
    /// Quickest flight
    pub duration_min: f32,
    /// Slowest flight
    pub duration_max: f32,
    /// The longest a droplet waits before it starts flying
    pub delay_max: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            angle_center: -90.0,
            angle_spread: 80.0,
            power_min: 60.0,
            power_max: 125.0,
            size_min: 3.0,
            size_max: 8.0,
            duration_min: 650.0,
            duration_max: 1200.0,
            delay_max: 120.0,
        }
    }
}

impl PhysicsConfig {
    /// A tighter, slightly weaker spray that's nice for fiddling with the ranges.
    #[must_use]
    pub fn playground() -> Self {
        Self {
            angle_spread: 40.0,
            power_max: 120.0,
            ..Self::default()
        }
    }

    /// Check every range, returning the first problem found.
    pub fn validate(self) -> Result<ValidatedPhysics, ConfigError> {
        let fields = [
            ("angle_center", self.angle_center),
            ("angle_spread", self.angle_spread),
            ("power_min", self.power_min),
            ("power_max", self.power_max),
            ("size_min", self.size_min),
            ("size_max", self.size_max),
            ("duration_min", self.duration_min),
            ("duration_max", self.duration_max),
            ("delay_max", self.delay_max),
        ];
        for (field, value) in fields {
            ensure!(value.is_finite(), NonFiniteSnafu { field });
        }

        // The angle centre is the only value that's allowed to be negative.
        for (field, value) in fields.into_iter().skip(1) {
            ensure!(value >= 0.0, NegativeBoundSnafu { field, value });
        }

        let pairs = [
            ("power", self.power_min, self.power_max),
            ("size", self.size_min, self.size_max),
            ("duration", self.duration_min, self.duration_max),
        ];
        for (field, min, max) in pairs {
            ensure!(min <= max, InvertedRangeSnafu { field, min, max });
        }

        let (angle_min, angle_max) = self.angle_range();
        let ranges = [
            ("angle", angle_min, angle_max),
            ("power", self.power_min, self.power_max),
            ("size", self.size_min, self.size_max),
            ("duration", self.duration_min, self.duration_max),
            ("delay", 0.0, self.delay_max),
        ];
        for (field, min, max) in ranges {
            ensure!(
                is_samplable(min, max),
                RangeOverflowSnafu { field, min, max }
            );
        }

        Ok(ValidatedPhysics(self))
    }

    /// The closed range of angles, in degrees, that droplets are sprayed at.
    #[must_use]
    pub const fn angle_range(&self) -> (f32, f32) {
        let half_spread = self.angle_spread / 2.0;
        (
            self.angle_center - half_spread,
            self.angle_center + half_spread,
        )
    }
}

/// Whether `rand` can sample the closed range without overflowing. It divides the width by a
/// number just under 1, so a width right up against `f32::MAX` is still too wide.
const fn is_samplable(min: f32, max: f32) -> bool {
    min.is_finite() && max.is_finite() && ((max - min) / (1.0 - f32::EPSILON)).is_finite()
}

impl TryFrom<PhysicsConfig> for ValidatedPhysics {
    type Error = ConfigError;

    fn try_from(config: PhysicsConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}

/// Physics that have passed [`PhysicsConfig::validate`]. The sampler only accepts these, so
/// there's no way to sample from an inverted range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedPhysics(PhysicsConfig);

impl ValidatedPhysics {
    /// The underlying ranges.
    #[must_use]
    pub const fn get(&self) -> &PhysicsConfig {
        &self.0
    }
}

/// Everything needed to build one rig.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RigConfig {
    /// Whether the rig should gently wiggle when nothing is happening
    pub idle: bool,
    /// How many droplets each eruption produces
    pub droplet_count: usize,
    /// Whether to follow the system's reduced motion preference or to force it
    pub reduced_motion: crate::motion::ReducedMotionOverride,
    /// The ranges each droplet is sampled from
    pub physics: PhysicsConfig,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            idle: true,
            droplet_count: 14,
            reduced_motion: crate::motion::ReducedMotionOverride::default(),
            physics: PhysicsConfig::default(),
        }
    }
}
