//! GPU workloads used to check an adapter end to end.
//!
//! These are fixtures: a doubling compute shader and a hardcoded triangle.
//! [`Check`] wraps each of them with the assertion on its result.

pub mod compute;
pub mod render;

use std::fmt;

use anyhow::Result;

use crate::caps::CapabilitySet;
use crate::device::GpuSession;
use crate::scope::{ensure_eq, AssertionFailure};

pub use compute::double_values;
pub use render::{expected_triangle_rows, render_triangle};

/// Input of the compute check.
pub const COMPUTE_INPUT: [f32; 3] = [1.0, 3.0, 5.0];

/// One end-to-end check.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Check {
    /// Device exists and reports sane limits.
    Device,
    /// `[1, 3, 5]` doubles to `[2, 6, 10]`.
    Compute,
    /// The triangle covers the expected texels.
    Render,
}

impl Check {
    pub const ALL: [Check; 3] = [Check::Device, Check::Compute, Check::Render];

    pub fn name(self) -> &'static str {
        match self {
            Check::Device => "creates a device",
            Check::Compute => "computes",
            Check::Render => "renders",
        }
    }

    /// Runs the workload and asserts on its output.
    ///
    /// Meant to be called inside [`crate::scope::run_scoped`].
    pub fn run(self, session: &GpuSession, caps: &CapabilitySet) -> Result<()> {
        match self {
            Check::Device => check_device(session),
            Check::Compute => {
                let expected: Vec<f32> = COMPUTE_INPUT.iter().map(|x| x * 2.0).collect();
                let actual = double_values(session, caps, &COMPUTE_INPUT)?;
                ensure_eq("doubled values", &expected, &actual)?;
                Ok(())
            }
            Check::Render => {
                let actual = render_triangle(session, caps)?;
                ensure_eq("triangle rows", &expected_triangle_rows(), &actual)?;
                Ok(())
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check_device(session: &GpuSession) -> Result<()> {
    for (label, value) in session.identity().report_lines() {
        log::info!("adapter {label}: {value}");
    }

    let max_bind_groups = session.limits().max_bind_groups;
    if max_bind_groups == 0 {
        return Err(AssertionFailure {
            what: "max_bind_groups".to_string(),
            expected: "> 0".to_string(),
            actual: max_bind_groups.to_string(),
        }
        .into());
    }
    Ok(())
}
