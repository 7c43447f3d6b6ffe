use std::sync::mpsc;

use anyhow::{Context, Result};

/// Copies the contents of a `MAP_READ` buffer to host memory.
///
/// Blocks on the device until the mapping resolves, then unmaps the buffer.
pub fn read_buffer(device: &wgpu::Device, buffer: &wgpu::Buffer) -> Result<Vec<u8>> {
    let slice = buffer.slice(..);

    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        // Receiver outlives the poll below; a failed send only means we already bailed.
        let _ = tx.send(result);
    });

    device
        .poll(wgpu::PollType::wait_indefinitely())
        .context("failed to wait for buffer mapping")?;

    rx.recv()
        .context("buffer mapping callback was never invoked")?
        .context("failed to map buffer for reading")?;

    let bytes = {
        let view = slice.get_mapped_range();
        view.to_vec()
    };
    buffer.unmap();

    Ok(bytes)
}

/// Reinterprets native-endian bytes as `f32` values. Trailing bytes are ignored.
pub fn bytes_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(chunk);
            f32::from_ne_bytes(raw)
        })
        .collect()
}
