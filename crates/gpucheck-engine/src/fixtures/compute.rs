use anyhow::{Context, Result};

use crate::caps::CapabilitySet;
use crate::device::{bytes_to_f32, read_buffer, GpuSession};

const SHADER: &str = include_str!("shaders/double.wgsl");

/// Invocations per workgroup; must match `@workgroup_size` in the shader.
pub const WORKGROUP_SIZE: u32 = 64;

/// Workgroup grid `(x, y)` covering `len` elements.
///
/// Uses a single row while the group count fits in `max_per_dimension`, then
/// folds into rows of `max_per_dimension` groups. The shader skips indices
/// past the end of the buffer.
pub fn dispatch_shape(len: usize, max_per_dimension: u32) -> Result<(u32, u32)> {
    anyhow::ensure!(max_per_dimension > 0, "device allows no compute workgroups");

    let groups = u32::try_from(len.div_ceil(WORKGROUP_SIZE as usize))
        .with_context(|| format!("{len} elements need too many workgroups"))?;
    if groups <= max_per_dimension {
        return Ok((groups, 1));
    }

    let rows = groups.div_ceil(max_per_dimension);
    anyhow::ensure!(
        rows <= max_per_dimension,
        "{len} elements exceed the dispatch limit of {max_per_dimension}x{max_per_dimension} workgroups"
    );
    Ok((max_per_dimension, rows))
}

/// Doubles every value on the GPU and reads the result back.
///
/// The storage buffer is copied into a separate `MAP_READ` buffer for
/// readback.
pub fn double_values(session: &GpuSession, caps: &CapabilitySet, input: &[f32]) -> Result<Vec<f32>> {
    anyhow::ensure!(!input.is_empty(), "nothing to double");

    let limits = session.limits();
    let (groups_x, groups_y) =
        dispatch_shape(input.len(), limits.max_compute_workgroups_per_dimension)?;

    let device = session.device();
    let bytes: &[u8] = bytemuck::cast_slice(input);
    let size = bytes.len() as u64;

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("doubling compute module"),
        source: wgpu::ShaderSource::Wgsl(SHADER.into()),
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("doubling compute pipeline"),
        layout: None,
        module: &module,
        entry_point: Some("double_values"),
        compilation_options: Default::default(),
        cache: None,
    });

    let work_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("work buffer"),
        size,
        usage: caps
            .buffer_usages(&["STORAGE", "COPY_SRC", "COPY_DST"])
            .context("work buffer usage")?,
        mapped_at_creation: false,
    });
    session.queue().write_buffer(&work_buffer, 0, bytes);

    let result_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("result buffer"),
        size,
        usage: caps
            .buffer_usages(&["MAP_READ", "COPY_DST"])
            .context("result buffer usage")?,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bind group for work buffer"),
        layout: &pipeline.get_bind_group_layout(0),
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: work_buffer.as_entire_binding(),
        }],
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("doubling encoder"),
    });

    // Pass must end before the copy is recorded.
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("doubling compute pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(groups_x, groups_y, 1);
    }

    encoder.copy_buffer_to_buffer(&work_buffer, 0, &result_buffer, 0, size);
    session.queue().submit(std::iter::once(encoder.finish()));

    let raw = read_buffer(device, &result_buffer).context("failed to read back doubled values")?;
    Ok(bytes_to_f32(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_inputs_use_one_row() {
        assert_eq!(dispatch_shape(1, 65_535).unwrap(), (1, 1));
        assert_eq!(dispatch_shape(3, 65_535).unwrap(), (1, 1));
        assert_eq!(dispatch_shape(64, 65_535).unwrap(), (1, 1));
        assert_eq!(dispatch_shape(65, 65_535).unwrap(), (2, 1));
        assert_eq!(dispatch_shape(70_000, 65_535).unwrap(), (1_094, 1));
    }

    #[test]
    fn group_count_at_limit_stays_one_row() {
        let len = 65_535 * WORKGROUP_SIZE as usize;
        assert_eq!(dispatch_shape(len, 65_535).unwrap(), (65_535, 1));
    }

    #[test]
    fn past_limit_folds_into_rows() {
        let len = 65_536 * WORKGROUP_SIZE as usize;
        assert_eq!(dispatch_shape(len, 65_535).unwrap(), (65_535, 2));

        let (x, y) = dispatch_shape(1_000 * WORKGROUP_SIZE as usize + 1, 100).unwrap();
        assert_eq!((x, y), (100, 11));
        assert!(x as usize * y as usize * WORKGROUP_SIZE as usize > 1_000 * 64);
    }

    #[test]
    fn grid_beyond_both_dimensions_is_rejected() {
        let len = 101 * 100 * WORKGROUP_SIZE as usize;
        assert!(dispatch_shape(len, 100).is_err());
        assert!(dispatch_shape(1, 0).is_err());
    }
}
