use crate::caps::CapabilitySet;

use super::hints::{LINUX_SOFTWARE_RASTERIZER, WINDOWS_SOFTWARE_ADAPTER};
use super::{AdapterHint, Environment, GpuRuntime, Platform, SelectError, SelectionHints};

/// Derives the adapter hint list from the environment and host platform.
///
/// Pure: the result depends only on `(env, platform)`. When the CI renderer
/// flag is set, the Windows software adapter is requested on Windows and the
/// Linux software rasterizer on Linux. Mac and other hosts get no hint, as
/// does any host without the flag.
pub fn selection_hints(env: &Environment, platform: Platform) -> SelectionHints {
    let mut hints = SelectionHints::new();

    if env.prefers_ci_renderer() {
        if platform == Platform::Windows {
            hints.push(AdapterHint::adapter(WINDOWS_SOFTWARE_ADAPTER));
        }
        if platform == Platform::Linux {
            hints.push(AdapterHint::adapter(LINUX_SOFTWARE_RASTERIZER));
        }
    }

    hints
}

/// A runtime handle paired with the capability constants it exposes.
pub struct GpuHandle {
    pub runtime: GpuRuntime,
    pub capabilities: CapabilitySet,
}

impl GpuHandle {
    /// Creates the runtime for an explicit hint list.
    pub fn with_hints(hints: SelectionHints) -> Self {
        Self {
            runtime: GpuRuntime::create(hints),
            capabilities: CapabilitySet::from_runtime(),
        }
    }

    /// Requests an adapter, consuming the handle into a [`Selection`].
    pub async fn request_adapter(self) -> Result<Selection, SelectError> {
        let adapter = self.runtime.request_adapter().await?;
        Ok(Selection {
            adapter,
            runtime: self.runtime,
            capabilities: self.capabilities,
        })
    }
}

/// Result of a successful adapter selection.
pub struct Selection {
    pub adapter: wgpu::Adapter,
    pub runtime: GpuRuntime,
    pub capabilities: CapabilitySet,
}

/// Builds the runtime for `(env, platform)` without requesting an adapter.
pub fn get_gpu(env: &Environment, platform: Platform) -> GpuHandle {
    let hints = selection_hints(env, platform);
    log::debug!("selection hints for {platform}: {hints}");
    GpuHandle::with_hints(hints)
}

/// Derives the hints, creates the runtime and requests a matching adapter.
///
/// `NoAdapterFound` is returned unchanged; the hint list is fixed for the
/// run, so a retry would fail the same way.
pub async fn select_adapter(env: &Environment, platform: Platform) -> Result<Selection, SelectError> {
    get_gpu(env, platform).request_adapter().await
}
