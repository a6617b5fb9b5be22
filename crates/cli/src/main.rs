use std::io;

use clap::Parser;

use stockcast_cli::Shell;
use stockcast_infra::InventoryService;
use stockcast_observability::LogFormat;

#[derive(Parser)]
#[command(name = "stockcast", about = "Interactive inventory and demand forecasting")]
struct Cli {
    /// Log output format ("json" or "pretty").
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Log at debug level when RUST_LOG is unset.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    stockcast_observability::tracing::init_with_default(cli.log_format, default_filter);

    let service = InventoryService::in_memory();
    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(&service, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}
