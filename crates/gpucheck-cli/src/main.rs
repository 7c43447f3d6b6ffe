use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gpucheck_engine::caps::FlagGroup;
use gpucheck_engine::device::{
    selection_hints, AdapterHint, DeviceInit, Environment, GpuHandle, GpuRuntime,
    GpuSession, Platform, SelectionHints,
};
use gpucheck_engine::fixtures::Check;
use gpucheck_engine::logging::{init_logging, LoggingConfig};
use gpucheck_engine::{run_scoped, CapabilitySet};

#[derive(Debug, Parser)]
#[command(name = "gpucheck", about = "Select a WebGPU adapter and run validation-scoped checks")]
struct Cli {
    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every adapter the runtime can see.
    Adapters,
    /// Print the capability constants exposed by the runtime.
    Caps,
    /// Select an adapter and run the device, compute and render checks.
    Smoke {
        /// Extra adapter hint (`adapter=`, `backend=`, `device-type=`), appended
        /// after the ones derived from the environment. Repeatable.
        #[arg(long = "hint", value_name = "KEY=VALUE")]
        hints: Vec<AdapterHint>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = Environment::from_process();

    init_logging(
        LoggingConfig {
            env_filter: cli.log,
            ..Default::default()
        },
        &env,
    );

    match cli.command {
        Command::Adapters => list_adapters(),
        Command::Caps => {
            print_caps(&CapabilitySet::from_runtime());
            Ok(())
        }
        Command::Smoke { hints } => {
            let mut all = selection_hints(&env, Platform::current());
            all.extend(hints);
            pollster::block_on(smoke(all))
        }
    }
}

/// Adapter name no runtime reports; requesting it yields the full adapter list.
const UNMATCHABLE_ADAPTER: &str = "gpucheck-list-adapters";

fn list_adapters() -> Result<()> {
    let runtime = GpuRuntime::create(SelectionHints::from_iter([AdapterHint::adapter(
        UNMATCHABLE_ADAPTER,
    )]));

    match pollster::block_on(runtime.request_adapter()) {
        Err(err) => println!("{}", err.diagnostic()),
        Ok(adapter) => println!("matched unexpectedly: {}", adapter.get_info().name),
    }
    Ok(())
}

fn print_caps(caps: &CapabilitySet) {
    for group in FlagGroup::ALL {
        println!("{group}");
        for (name, value) in caps.group(group) {
            println!("  {name:<20} {value:#x}");
        }
    }
}

async fn smoke(hints: SelectionHints) -> Result<()> {
    log::info!("platform {}, hints {hints}", Platform::current());

    let selection = GpuHandle::with_hints(hints).request_adapter().await?;
    let session = GpuSession::open(selection.adapter, DeviceInit::default())
        .await
        .context("failed to open a session on the selected adapter")?;
    let caps = selection.capabilities;

    println!("adapter: {}", session.identity());

    let mut failed = 0;
    for check in Check::ALL {
        match run_scoped(session.device(), || async { check.run(&session, &caps) }).await {
            Ok(()) => println!("ok    {check}"),
            Err(err) => {
                failed += 1;
                println!("FAIL  {check}: {err:#}");
            }
        }
    }

    session.destroy();

    if failed > 0 {
        anyhow::bail!("{failed} of {} checks failed", Check::ALL.len());
    }
    Ok(())
}
