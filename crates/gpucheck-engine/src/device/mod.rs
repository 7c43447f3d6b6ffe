//! Adapter selection and device management.
//!
//! This module is responsible for:
//! - describing the host platform and process environment as plain values
//! - deriving adapter selection hints from them
//! - creating the wgpu runtime and matching adapters against the hints
//! - opening a device/queue session and reading buffers back

mod env;
mod error;
mod hints;
mod platform;
mod readback;
mod runtime;
mod selector;
mod session;

pub use env::{Environment, CI_RENDERER_FLAG, REQUIRE_GPU_FLAG};
pub use error::{HintParseError, SelectError};
pub use hints::{
    AdapterHint, AdapterIdentity, SelectionHints, LINUX_SOFTWARE_RASTERIZER,
    WINDOWS_SOFTWARE_ADAPTER,
};
pub use platform::Platform;
pub use readback::{bytes_to_f32, read_buffer};
pub use runtime::GpuRuntime;
pub use selector::{get_gpu, select_adapter, selection_hints, GpuHandle, Selection};
pub use session::{DeviceInit, GpuSession};
