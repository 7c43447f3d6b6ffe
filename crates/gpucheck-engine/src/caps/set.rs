use std::collections::BTreeMap;
use std::fmt;

/// A family of named flag constants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FlagGroup {
    BufferUsage,
    MapMode,
    TextureUsage,
    ShaderStage,
    ColorWrite,
}

impl FlagGroup {
    pub const ALL: [FlagGroup; 5] = [
        FlagGroup::BufferUsage,
        FlagGroup::MapMode,
        FlagGroup::TextureUsage,
        FlagGroup::ShaderStage,
        FlagGroup::ColorWrite,
    ];

    /// WebGPU name of the constant namespace.
    pub fn name(self) -> &'static str {
        match self {
            FlagGroup::BufferUsage => "GPUBufferUsage",
            FlagGroup::MapMode => "GPUMapMode",
            FlagGroup::TextureUsage => "GPUTextureUsage",
            FlagGroup::ShaderStage => "GPUShaderStage",
            FlagGroup::ColorWrite => "GPUColorWrite",
        }
    }
}

impl fmt::Display for FlagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A flag name missing from its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFlag {
    pub group: FlagGroup,
    pub name: String,
}

impl fmt::Display for UnknownFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown flag {}.{}", self.group, self.name)
    }
}

impl std::error::Error for UnknownFlag {}

/// Symbolic flag names mapped to the values the runtime defines for them.
///
/// Queried once per session and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    groups: BTreeMap<FlagGroup, BTreeMap<&'static str, u32>>,
}

// WebGPU's GPUMapMode values; wgpu models map modes as an enum.
const MAP_MODE_READ: u32 = 0x1;
const MAP_MODE_WRITE: u32 = 0x2;

impl CapabilitySet {
    /// Reads the flag constants exposed by wgpu.
    pub fn from_runtime() -> Self {
        let mut groups = BTreeMap::new();

        groups.insert(
            FlagGroup::BufferUsage,
            wgpu::BufferUsages::all()
                .iter_names()
                .map(|(name, flag)| (name, flag.bits()))
                .collect(),
        );
        groups.insert(
            FlagGroup::MapMode,
            BTreeMap::from([("READ", MAP_MODE_READ), ("WRITE", MAP_MODE_WRITE)]),
        );
        groups.insert(
            FlagGroup::TextureUsage,
            wgpu::TextureUsages::all()
                .iter_names()
                .map(|(name, flag)| (name, flag.bits()))
                .collect(),
        );
        groups.insert(
            FlagGroup::ShaderStage,
            wgpu::ShaderStages::all()
                .iter_names()
                .map(|(name, flag)| (name, flag.bits()))
                .collect(),
        );
        groups.insert(
            FlagGroup::ColorWrite,
            wgpu::ColorWrites::all()
                .iter_names()
                .map(|(name, flag)| (name, flag.bits()))
                .collect(),
        );

        Self { groups }
    }

    pub fn get(&self, group: FlagGroup, name: &str) -> Option<u32> {
        self.groups.get(&group)?.get(name).copied()
    }

    /// Iterates `(name, value)` pairs of a group in name order.
    pub fn group(&self, group: FlagGroup) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.groups
            .get(&group)
            .into_iter()
            .flat_map(|flags| flags.iter().map(|(name, value)| (*name, *value)))
    }

    fn combine(&self, group: FlagGroup, names: &[&str]) -> Result<u32, UnknownFlag> {
        names.iter().try_fold(0u32, |bits, name| {
            self.get(group, name)
                .map(|value| bits | value)
                .ok_or_else(|| UnknownFlag {
                    group,
                    name: name.to_string(),
                })
        })
    }

    /// Combines named buffer usages, e.g. `["MAP_READ", "COPY_DST"]`.
    pub fn buffer_usages(&self, names: &[&str]) -> Result<wgpu::BufferUsages, UnknownFlag> {
        self.combine(FlagGroup::BufferUsage, names)
            .map(wgpu::BufferUsages::from_bits_truncate)
    }

    /// Combines named texture usages, e.g. `["RENDER_ATTACHMENT", "COPY_SRC"]`.
    pub fn texture_usages(&self, names: &[&str]) -> Result<wgpu::TextureUsages, UnknownFlag> {
        self.combine(FlagGroup::TextureUsage, names)
            .map(wgpu::TextureUsages::from_bits_truncate)
    }

    pub fn map_mode(&self, name: &str) -> Result<wgpu::MapMode, UnknownFlag> {
        match self.get(FlagGroup::MapMode, name) {
            Some(MAP_MODE_READ) => Ok(wgpu::MapMode::Read),
            Some(MAP_MODE_WRITE) => Ok(wgpu::MapMode::Write),
            _ => Err(UnknownFlag {
                group: FlagGroup::MapMode,
                name: name.to_string(),
            }),
        }
    }
}
