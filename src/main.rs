mod cli;
mod dashboard;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use nifty_journal::config::Config;
use nifty_journal::exchange::YahooFinance;
use nifty_journal::trading::desk::TradingDesk;
use nifty_journal::trading::session::Session;

use crate::cli::Command;
use crate::dashboard::Dashboard;

#[tokio::main]
async fn main() {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match cli::parse(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {:#}\n\n{}", e, cli::USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(cfg, parsed).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cfg: Config, parsed: cli::Cli) -> Result<()> {
    if parsed.command == Command::Help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let desk = TradingDesk::new(&cfg)?;
    let session = Session::open(desk.sizer(), parsed.risk.apply(&cfg))?;
    let feed = Box::new(YahooFinance::new(&cfg)?);
    let mut dashboard = Dashboard::new(cfg, desk, feed, session);

    match parsed.command {
        Command::Status => dashboard.print_status().await,
        Command::Watch => dashboard.watch().await,
        Command::Log(entry) => dashboard.log_trade(entry),
        Command::Review { days, json } => dashboard.review(days, json),
        Command::ResetLock => dashboard.reset_lock(),
        Command::Help => Ok(()),
    }
}
