use anyhow::{Context, Result};

use crate::caps::CapabilitySet;
use crate::device::{read_buffer, GpuSession};

const SHADER: &str = include_str!("shaders/triangle.wgsl");

/// Width and height of the render target, in texels.
pub const TARGET_SIZE: u32 = 4;

/// Row pitch of the readback buffer; one `R8Unorm` row padded to the copy alignment.
pub const BYTES_PER_ROW: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;

/// Expected readback of [`render_triangle`]: the upper-left half covered.
pub fn expected_triangle_rows() -> Vec<u8> {
    let rows: [[u8; 4]; 4] = [
        [255, 255, 255, 0],
        [255, 255, 0, 0],
        [255, 0, 0, 0],
        [0, 0, 0, 0],
    ];

    let mut expected = vec![0u8; (BYTES_PER_ROW * TARGET_SIZE) as usize];
    for (i, row) in rows.iter().enumerate() {
        let start = i * BYTES_PER_ROW as usize;
        expected[start..start + row.len()].copy_from_slice(row);
    }
    expected
}

/// Draws a fixed triangle into a 4x4 single-channel texture and returns the
/// texture rows copied out at a [`BYTES_PER_ROW`] stride.
pub fn render_triangle(session: &GpuSession, caps: &CapabilitySet) -> Result<Vec<u8>> {
    let device = session.device();

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("hardcoded triangle shaders"),
        source: wgpu::ShaderSource::Wgsl(SHADER.into()),
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("hardcoded triangle pipeline"),
        layout: None,

        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs"),
            compilation_options: Default::default(),
            buffers: &[],
        },

        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    let size = wgpu::Extent3d {
        width: TARGET_SIZE,
        height: TARGET_SIZE,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("triangle target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: caps
            .texture_usages(&["RENDER_ATTACHMENT", "COPY_SRC"])
            .context("target texture usage")?,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback buffer"),
        size: u64::from(BYTES_PER_ROW * TARGET_SIZE),
        usage: caps
            .buffer_usages(&["COPY_DST", "MAP_READ"])
            .context("readback buffer usage")?,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("triangle encoder"),
    });

    // Pass borrows the encoder; drop it before recording the copy.
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(&pipeline);
        pass.draw(0..3, 0..1);
    }

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(BYTES_PER_ROW),
                rows_per_image: Some(TARGET_SIZE),
            },
        },
        size,
    );
    session.queue().submit(std::iter::once(encoder.finish()));

    read_buffer(device, &readback).context("failed to read back triangle rows")
}
