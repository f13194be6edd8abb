//! # Gushing Rig
//! A little drilling rig that gushes oil when you poke it.
//!
//! Every poke (a click, a hover or an activation key) samples a fresh spray of droplets, each with
//! its own trajectory, size and timing. The rig then rumbles for a moment before the spray fades
//! away. Whatever draws the rig is kept at arm's length: it only ever receives [`Snapshot`]s.
//!
//! There are 2 layers. [`Eruption`] is the plain, synchronous state machine, useful when you want
//! to drive the timings yourself. [`Controller`] wraps it in a tokio task that owns the deferred
//! resets and the subscription to the system's reduced motion preference.
//!
//! [`Snapshot`]: controller::Snapshot
//! [`Eruption`]: eruption::Eruption
//! [`Controller`]: controller::Controller

#![expect(clippy::pub_use, reason = "This seems to come from the `bon` crate")]

pub mod controller;
pub mod droplet;
pub mod errors;
pub mod eruption;
pub mod input;
pub mod motion;
pub mod physics;
pub mod sampler;
