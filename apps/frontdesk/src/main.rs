use clap::Parser;
use std::process::ExitCode;

use frontdesk::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    frontdesk::init_tracing();

    let cli = Cli::parse();
    let json = cli.global.json;

    match frontdesk::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                match serde_json::to_string_pretty(&err) {
                    Ok(body) => eprintln!("{body}"),
                    Err(_) => eprintln!("error: {err}"),
                }
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
