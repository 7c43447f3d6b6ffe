use std::fmt;
use std::str::FromStr;

use super::HintParseError;

/// Name fragment of the Windows software adapter (WARP, "Microsoft Basic Render Driver").
pub const WINDOWS_SOFTWARE_ADAPTER: &str = "Microsoft";

/// Name fragment of Mesa's Linux software rasterizer.
pub const LINUX_SOFTWARE_RASTERIZER: &str = "llvmpipe";

/// The adapter properties hints are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterIdentity {
    pub name: String,
    /// PCI vendor id, or a backend-specific id when there is none.
    pub vendor: u32,
    /// PCI device id, or a backend-specific id when there is none.
    pub device: u32,
    pub driver: String,
    pub driver_info: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl From<&wgpu::AdapterInfo> for AdapterIdentity {
    fn from(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            vendor: info.vendor,
            device: info.device,
            driver: info.driver.clone(),
            driver_info: info.driver_info.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }
}

impl AdapterIdentity {
    /// Labelled fields for diagnostics: description, vendor, device, driver.
    pub fn report_lines(&self) -> [(&'static str, String); 4] {
        [
            ("description", self.name.clone()),
            ("vendor", format!("{:#06x}", self.vendor)),
            ("device", format!("{:#06x}", self.device)),
            ("driver", format!("{} {}", self.driver, self.driver_info).trim().to_string()),
        ]
    }
}

impl fmt::Display for AdapterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [backend={}, device-type={}]",
            self.name,
            backend_name(self.backend),
            device_type_name(self.device_type)
        )?;
        if !self.driver.is_empty() {
            write!(f, " driver: {}", self.driver)?;
            if !self.driver_info.is_empty() {
                write!(f, " ({})", self.driver_info)?;
            }
        }
        Ok(())
    }
}

/// A single constraint on which adapter a request may resolve to.
///
/// The string form is `key=value`:
/// - `adapter=<substring>` matches the adapter name or driver description,
///   ASCII case-insensitively
/// - `backend=<vulkan|metal|dx12|gl|webgpu>`
/// - `device-type=<discrete|integrated|virtual|cpu|other>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterHint {
    Adapter(String),
    Backend(wgpu::Backend),
    DeviceType(wgpu::DeviceType),
}

impl AdapterHint {
    pub fn adapter(name: impl Into<String>) -> Self {
        AdapterHint::Adapter(name.into())
    }

    /// Returns true when `info` satisfies this hint.
    pub fn matches(&self, info: &AdapterIdentity) -> bool {
        match self {
            AdapterHint::Adapter(needle) => {
                let needle = needle.to_ascii_lowercase();
                [&info.name, &info.driver, &info.driver_info]
                    .iter()
                    .any(|field| field.to_ascii_lowercase().contains(&needle))
            }
            AdapterHint::Backend(backend) => info.backend == *backend,
            AdapterHint::DeviceType(device_type) => info.device_type == *device_type,
        }
    }
}

impl fmt::Display for AdapterHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterHint::Adapter(name) => write!(f, "adapter={name}"),
            AdapterHint::Backend(backend) => write!(f, "backend={}", backend_name(*backend)),
            AdapterHint::DeviceType(ty) => write!(f, "device-type={}", device_type_name(*ty)),
        }
    }
}

impl FromStr for AdapterHint {
    type Err = HintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(HintParseError::new(s, "expected key=value"));
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(HintParseError::new(s, "empty value"));
        }

        match key.trim() {
            "adapter" => Ok(AdapterHint::Adapter(value.to_string())),
            "backend" => parse_backend(value)
                .map(AdapterHint::Backend)
                .ok_or_else(|| HintParseError::new(s, format!("unknown backend `{value}`"))),
            "device-type" => parse_device_type(value)
                .map(AdapterHint::DeviceType)
                .ok_or_else(|| HintParseError::new(s, format!("unknown device type `{value}`"))),
            other => Err(HintParseError::new(s, format!("unknown key `{other}`"))),
        }
    }
}

fn backend_name(backend: wgpu::Backend) -> &'static str {
    match backend {
        wgpu::Backend::Vulkan => "vulkan",
        wgpu::Backend::Metal => "metal",
        wgpu::Backend::Dx12 => "dx12",
        wgpu::Backend::Gl => "gl",
        wgpu::Backend::BrowserWebGpu => "webgpu",
        #[allow(unreachable_patterns)]
        _ => "unknown",
    }
}

fn parse_backend(s: &str) -> Option<wgpu::Backend> {
    match s.to_ascii_lowercase().as_str() {
        "vulkan" | "vk" => Some(wgpu::Backend::Vulkan),
        "metal" => Some(wgpu::Backend::Metal),
        "dx12" | "d3d12" => Some(wgpu::Backend::Dx12),
        "gl" | "gles" | "opengl" => Some(wgpu::Backend::Gl),
        "webgpu" => Some(wgpu::Backend::BrowserWebGpu),
        _ => None,
    }
}

fn device_type_name(ty: wgpu::DeviceType) -> &'static str {
    match ty {
        wgpu::DeviceType::DiscreteGpu => "discrete",
        wgpu::DeviceType::IntegratedGpu => "integrated",
        wgpu::DeviceType::VirtualGpu => "virtual",
        wgpu::DeviceType::Cpu => "cpu",
        wgpu::DeviceType::Other => "other",
    }
}

fn parse_device_type(s: &str) -> Option<wgpu::DeviceType> {
    match s.to_ascii_lowercase().as_str() {
        "discrete" => Some(wgpu::DeviceType::DiscreteGpu),
        "integrated" => Some(wgpu::DeviceType::IntegratedGpu),
        "virtual" => Some(wgpu::DeviceType::VirtualGpu),
        "cpu" => Some(wgpu::DeviceType::Cpu),
        "other" => Some(wgpu::DeviceType::Other),
        _ => None,
    }
}

/// Ordered list of adapter hints.
///
/// An adapter is acceptable only if it matches every hint. An empty list means
/// "use the runtime default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionHints(Vec<AdapterHint>);

impl SelectionHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hint: AdapterHint) {
        self.0.push(hint);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AdapterHint> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[AdapterHint] {
        &self.0
    }

    /// String forms of the hints, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn matches_all(&self, info: &AdapterIdentity) -> bool {
        self.0.iter().all(|hint| hint.matches(info))
    }
}

impl FromIterator<AdapterHint> for SelectionHints {
    fn from_iter<I: IntoIterator<Item = AdapterHint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<AdapterHint> for SelectionHints {
    fn extend<I: IntoIterator<Item = AdapterHint>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a SelectionHints {
    type Item = &'a AdapterHint;
    type IntoIter = std::slice::Iter<'a, AdapterHint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SelectionHints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, hint) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{hint}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, backend: wgpu::Backend, device_type: wgpu::DeviceType) -> AdapterIdentity {
        AdapterIdentity {
            name: name.to_string(),
            vendor: 0x10005,
            device: 0,
            driver: "test driver".to_string(),
            driver_info: "1.0".to_string(),
            backend,
            device_type,
        }
    }

    fn llvmpipe() -> AdapterIdentity {
        info(
            "llvmpipe (LLVM 17.0.6, 256 bits)",
            wgpu::Backend::Vulkan,
            wgpu::DeviceType::Cpu,
        )
    }

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn parses_adapter_hint() {
        let hint: AdapterHint = "adapter=llvmpipe".parse().unwrap();
        assert_eq!(hint, AdapterHint::adapter("llvmpipe"));
    }

    #[test]
    fn parses_backend_and_device_type() {
        assert_eq!(
            "backend=Vulkan".parse::<AdapterHint>().unwrap(),
            AdapterHint::Backend(wgpu::Backend::Vulkan)
        );
        assert_eq!(
            "device-type=cpu".parse::<AdapterHint>().unwrap(),
            AdapterHint::DeviceType(wgpu::DeviceType::Cpu)
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for s in ["adapter=Microsoft", "backend=dx12", "device-type=integrated"] {
            let hint: AdapterHint = s.parse().unwrap();
            assert_eq!(hint.to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_hints() {
        assert!("llvmpipe".parse::<AdapterHint>().is_err());
        assert!("adapter=".parse::<AdapterHint>().is_err());
        assert!("backend=glide".parse::<AdapterHint>().is_err());
        assert!("vendor=nvidia".parse::<AdapterHint>().is_err());
    }

    // ── matching ──────────────────────────────────────────────────────────

    #[test]
    fn adapter_hint_is_case_insensitive_substring() {
        assert!(AdapterHint::adapter("LLVMPIPE").matches(&llvmpipe()));
        assert!(AdapterHint::adapter("pipe").matches(&llvmpipe()));
        assert!(!AdapterHint::adapter("Microsoft").matches(&llvmpipe()));
    }

    #[test]
    fn adapter_hint_also_checks_driver_fields() {
        let mut warp = info("Basic Render Driver", wgpu::Backend::Dx12, wgpu::DeviceType::Cpu);
        warp.driver = "Microsoft".to_string();
        assert!(AdapterHint::adapter("microsoft").matches(&warp));
    }

    #[test]
    fn empty_list_matches_anything() {
        assert!(SelectionHints::new().matches_all(&llvmpipe()));
    }

    #[test]
    fn every_hint_must_match() {
        let hints: SelectionHints = [
            AdapterHint::adapter("llvmpipe"),
            AdapterHint::Backend(wgpu::Backend::Gl),
        ]
        .into_iter()
        .collect();
        assert!(!hints.matches_all(&llvmpipe()));

        let hints: SelectionHints = [
            AdapterHint::adapter("llvmpipe"),
            AdapterHint::DeviceType(wgpu::DeviceType::Cpu),
        ]
        .into_iter()
        .collect();
        assert!(hints.matches_all(&llvmpipe()));
    }

    #[test]
    fn identity_display_names_backend_and_driver() {
        assert_eq!(
            llvmpipe().to_string(),
            "llvmpipe (LLVM 17.0.6, 256 bits) [backend=vulkan, device-type=cpu] driver: test driver (1.0)"
        );
    }

    #[test]
    fn report_lines_follow_description_vendor_device_order() {
        let lines = llvmpipe().report_lines();
        let labels: Vec<&str> = lines.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, ["description", "vendor", "device", "driver"]);
        assert_eq!(lines[0].1, "llvmpipe (LLVM 17.0.6, 256 bits)");
        assert_eq!(lines[1].1, "0x10005");
        assert_eq!(lines[2].1, "0x0000");
        assert_eq!(lines[3].1, "test driver 1.0");
    }

    #[test]
    fn list_display_keeps_order() {
        let hints: SelectionHints = [
            AdapterHint::adapter("a"),
            AdapterHint::Backend(wgpu::Backend::Metal),
        ]
        .into_iter()
        .collect();
        assert_eq!(hints.to_string(), "[adapter=a, backend=metal]");
        assert_eq!(hints.to_strings(), vec!["adapter=a", "backend=metal"]);
    }
}
