//! Capability constants.
//!
//! The runtime's usage and map-mode flags as an explicit, immutable value.
//! Code that builds resource-creation requests receives a [`CapabilitySet`]
//! instead of reaching for process-wide constants.

mod set;

pub use set::{CapabilitySet, FlagGroup, UnknownFlag};
