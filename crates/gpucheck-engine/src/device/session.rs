use anyhow::{Context, Result};

use super::AdapterIdentity;

/// Device request parameters.
///
/// Defaults target the broadest set of adapters, software rasterizers
/// included.
#[derive(Debug, Clone)]
pub struct DeviceInit {
    /// Debug label attached to the device.
    pub label: String,

    /// Required wgpu features.
    ///
    /// The built-in checks need none.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter.
    pub required_limits: wgpu::Limits,

    /// Allocation strategy hint.
    pub memory_hints: wgpu::MemoryHints,
}

impl Default for DeviceInit {
    fn default() -> Self {
        Self {
            label: "gpucheck device".to_string(),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
        }
    }
}

/// A selected adapter with its logical device and queue.
///
/// The session owns the device; checks borrow it one at a time.
pub struct GpuSession {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuSession {
    /// Requests a device and queue from `adapter`.
    pub async fn open(adapter: wgpu::Adapter, init: DeviceInit) -> Result<Self> {
        let DeviceInit {
            label,
            required_features,
            required_limits,
            memory_hints,
        } = init;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(label.as_str()),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        log::debug!("device `{label}` created");

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn identity(&self) -> AdapterIdentity {
        AdapterIdentity::from(&self.adapter_info())
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Limits the device was created with.
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Destroys the device. Resources created from it become invalid.
    pub fn destroy(&self) {
        self.device.destroy();
    }
}
