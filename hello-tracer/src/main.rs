use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Context as _, anyhow};
use clap::Parser;
use hello_tracer::{
    AyaKernel, CancellationFlag, ProgramHandle, ShutdownController,
    config::{DEFAULT_OBJECT_DIR, TracerConfig, object_path},
    event::EventPrinter,
    loader, logging,
    perf::PerfBuffer,
    poller::{self, PollStats},
    session,
};
use log::{debug, error, info};

#[derive(Parser)]
#[command(author, version, about = "Loads hello.bpf.o and prints the events it emits", long_about = None)]
struct CliArgs {
    /// Directory containing `hello.bpf.o`.
    #[arg(value_name = "DIR", default_value = DEFAULT_OBJECT_DIR)]
    dir: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let args = CliArgs::parse();

    let outcome = run(args).await;
    if let Err(e) = &outcome {
        error!("{e:#}");
    }
    ExitCode::from(session::exit_status(&outcome))
}

async fn run(args: CliArgs) -> anyhow::Result<PollStats> {
    let config = TracerConfig::default();

    let flag = CancellationFlag::new();
    let _shutdown = ShutdownController::install(flag.clone())
        .context("failed to install interrupt handler")?;

    loader::bump_memlock_rlimit();

    let path = object_path(&args.dir);
    session::run(
        AyaKernel,
        &path,
        &config,
        async |program: &mut ProgramHandle<AyaKernel>| -> anyhow::Result<PollStats> {
            let name = program.name().to_owned();
            let binding = program
                .map_mut(&config.event_map)
                .ok_or_else(|| anyhow!("map `{}` was not resolved", config.event_map))?;
            let mut buffer = PerfBuffer::new(binding, config.pages_per_cpu)?;
            let mut printer = EventPrinter::new(&name, io::stdout().lock());

            info!("tracing {name} (Ctrl-C to exit)");

            let stats = poller::run(&mut buffer, &mut printer, &flag, config.poll_timeout).await;
            debug!(
                "poller stopped after {} waits, {} records, {} failed waits",
                stats.waits, stats.records, stats.failures
            );
            Ok(stats)
        },
    )
    .await
}
