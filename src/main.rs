use clap::Parser;

use meetpanel::cli::{self, Cli, Command};
use meetpanel::config::MeetpanelConfig;
use meetpanel::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match MeetpanelConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(2);
            }
        },
        None => MeetpanelConfig::default(),
    };
    logging::init(&config.log);

    let result = match cli.command {
        Command::Probe {
            url,
            attempts,
            delay_ms,
        } => cli::handle_probe(&config, &url, attempts, delay_ms)
            .await
            .map(|ready| if ready { 0 } else { 1 }),
        Command::Summarize { poll, participant } => {
            cli::handle_summarize(&poll, &participant).map(|()| 0)
        }
        Command::MockHls { port, ready_after } => {
            cli::handle_mock_hls(port, ready_after).await.map(|()| 0)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    }
}
