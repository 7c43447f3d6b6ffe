//! gpucheck engine crate.
//!
//! Deterministic adapter selection, validation-scoped execution of GPU work,
//! and the workloads used to check a WebGPU implementation end to end.

pub mod caps;
pub mod device;
pub mod fixtures;
pub mod logging;
pub mod scope;

pub use caps::CapabilitySet;
pub use device::{
    get_gpu, select_adapter, selection_hints, DeviceInit, Environment, GpuSession, Platform,
    SelectError,
};
pub use scope::{run_scoped, ScopeOutcome, ValidationFailure};
