use anyhow::{Context, Result};
use stock_monitor::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("stock-monitor error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run_main() -> Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level, args.log_format)?;

    let config_path = args.config.display().to_string();
    run(args)
        .await
        .with_context(|| format!("monitor run with config {} failed", config_path))
}
