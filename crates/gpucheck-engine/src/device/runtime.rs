use super::{AdapterIdentity, SelectError, SelectionHints};

/// Owns the wgpu instance and the hint list it was created with.
///
/// Creating a runtime never fails. Whether any adapter satisfies the hints is
/// only decided by [`GpuRuntime::request_adapter`].
pub struct GpuRuntime {
    /// wgpu instance used to enumerate and request adapters.
    instance: wgpu::Instance,

    /// Constraints every returned adapter must satisfy.
    hints: SelectionHints,
}

impl GpuRuntime {
    /// Creates the runtime with all backends enabled.
    pub fn create(hints: SelectionHints) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        log::debug!("gpu runtime created with hints {hints}");

        Self { instance, hints }
    }

    pub fn hints(&self) -> &SelectionHints {
        &self.hints
    }

    /// Lists every adapter the runtime can see, in enumeration order.
    pub async fn adapters(&self) -> Vec<AdapterIdentity> {
        self.instance
            .enumerate_adapters(wgpu::Backends::all())
            .await
            .iter()
            .map(|adapter| AdapterIdentity::from(&adapter.get_info()))
            .collect()
    }

    /// Requests an adapter satisfying every hint.
    ///
    /// With no hints the runtime's default high-performance adapter is used.
    /// Otherwise the first enumerated adapter matching all hints wins. There is
    /// no retry and no fallback: a miss is reported as
    /// [`SelectError::NoAdapterFound`] listing what was available.
    pub async fn request_adapter(&self) -> Result<wgpu::Adapter, SelectError> {
        if self.hints.is_empty() {
            let requested = self
                .instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await;

            return match requested {
                Ok(adapter) => {
                    log_selected(&adapter);
                    Ok(adapter)
                }
                Err(err) => Err(SelectError::NoAdapterFound {
                    diagnostic: describe_miss(&err.to_string(), &self.adapters().await),
                }),
            };
        }

        let adapters = self.instance.enumerate_adapters(wgpu::Backends::all()).await;
        let identities: Vec<AdapterIdentity> = adapters
            .iter()
            .map(|adapter| AdapterIdentity::from(&adapter.get_info()))
            .collect();

        let chosen = adapters
            .into_iter()
            .zip(&identities)
            .find(|(_, identity)| self.hints.matches_all(identity))
            .map(|(adapter, _)| adapter);

        match chosen {
            Some(adapter) => {
                log_selected(&adapter);
                Ok(adapter)
            }
            None => Err(SelectError::NoAdapterFound {
                diagnostic: describe_miss(
                    &format!("no adapter matches hints {}", self.hints),
                    &identities,
                ),
            }),
        }
    }
}

fn log_selected(adapter: &wgpu::Adapter) {
    log::info!("selected adapter {}", AdapterIdentity::from(&adapter.get_info()));
}

/// Formats the reason for a miss followed by the adapters that were available.
fn describe_miss(reason: &str, available: &[AdapterIdentity]) -> String {
    let mut out = String::from(reason);
    if available.is_empty() {
        out.push_str("; no adapters available");
        return out;
    }

    out.push_str("; available adapters:");
    for identity in available {
        out.push_str("\n  - ");
        out.push_str(&identity.to_string());
    }
    out
}
