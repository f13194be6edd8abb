//! Errors for this library

/// All the known errors returned by this crate.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GushingRigError {
    #[snafu(display("Invalid rig configuration"))]
    /// The rig was given physics that it refuses to sample from
    Config {
        /// The parent error type
        source: ConfigError,
    },

    #[snafu(display("The eruption controller is no longer running"))]
    /// Sending to a controller whose loop has already exited
    ControllerEnded,

    /// General errors that don't need to be matched on
    #[snafu(whatever, display("{message}"))]
    Whatever {
        /// A helpful message acompanying the error
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        /// The parent error type
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// A caller bug in the physics config. We never clamp or repair these, because that would just
/// hide the bug.
#[derive(Debug, Clone, PartialEq, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("`{field}` must be a finite number"))]
    /// `NaN` or infinite
    NonFinite {
        /// The name of the offending config field
        field: &'static str,
    },

    #[snafu(display("`{field}` must not be negative, got {value}"))]
    /// Sizes, powers, durations, delays and the angle spread can't go below zero
    NegativeBound {
        /// The name of the offending config field
        field: &'static str,
        /// The value that was given
        value: f32,
    },

    #[snafu(display("`{field}_min` ({min}) is greater than `{field}_max` ({max})"))]
    /// A `min`/`max` pair that is the wrong way round
    InvertedRange {
        /// The shared prefix of the pair, eg `power` for `power_min` and `power_max`
        field: &'static str,
        /// The given minimum
        min: f32,
        /// The given maximum
        max: f32,
    },

    #[snafu(display("The `{field}` range, from {min} to {max}, is too wide to sample from"))]
    /// Finite settings that add up to a range whose bounds or width overflow
    RangeOverflow {
        /// The name of the range, eg `angle` for the one made from `angle_center` and
        /// `angle_spread`
        field: &'static str,
        /// The lower bound of the range
        min: f32,
        /// The upper bound of the range
        max: f32,
    },
}
