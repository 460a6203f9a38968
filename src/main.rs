mod application;
mod domain;
mod infrastructure;
mod presentation;

use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::logging;
use crate::presentation::cli::Cli;
use colored::Colorize;
use std::io::IsTerminal;

/// gurl: a command-line tool like curl, but very simple
///
/// Builds one HTTP request from the command line (method, URL, `key=value`
/// form fields or piped stdin as the body), sends it, and prints the
/// response headers and/or body.
#[tokio::main]
async fn main() {
    logging::init();

    let cli = Cli::parse_args(std::env::args_os());
    let stdin_piped = !std::io::stdin().is_terminal();

    let connect = || -> anyhow::Result<_> {
        Ok(HyperHttpClient::new()?.create_request_service())
    };

    let mut stdout = tokio::io::stdout();
    if let Err(err) = cli.run(connect, stdin_piped, &mut stdout).await {
        eprintln!("{}", format!("{:#}", err).red());
        std::process::exit(1);
    }
}
