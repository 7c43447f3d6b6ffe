//! Shared helpers for `gpucheck-engine` integration tests.

use gpucheck_engine::device::{select_adapter, DeviceInit, Environment, GpuSession, Platform};
use gpucheck_engine::CapabilitySet;

pub fn skip_or_panic(env: &Environment, test_name: &str, reason: &str) {
    if env.requires_gpu() {
        panic!("GPUCHECK_REQUIRE_GPU is enabled but {test_name} cannot run: {reason}");
    }
    eprintln!("skipping {test_name}: {reason}");
}

/// Selects an adapter the same way the CLI does and opens a session on it.
///
/// Returns `None` (after logging why) when this machine has no usable adapter.
pub fn open_session(test_name: &str) -> Option<(GpuSession, CapabilitySet)> {
    let env = Environment::from_process();

    let selection = match pollster::block_on(select_adapter(&env, Platform::current())) {
        Ok(selection) => selection,
        Err(err) => {
            skip_or_panic(&env, test_name, &err.to_string());
            return None;
        }
    };

    match pollster::block_on(GpuSession::open(selection.adapter, DeviceInit::default())) {
        Ok(session) => Some((session, selection.capabilities)),
        Err(err) => {
            skip_or_panic(&env, test_name, &format!("{err:#}"));
            None
        }
    }
}
