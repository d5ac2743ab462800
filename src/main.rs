use clap::Parser;
use install_jdk::cli::{Cli, CommandHandler, FORMATTER};
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let handler = match CommandHandler::new() {
        Ok(handler) => handler,
        Err(e) => {
            print!("{}", FORMATTER.format_error(&e.to_string()));
            process::exit(1);
        }
    };

    if let Err(e) = handler.handle(cli).await {
        print!("{}", FORMATTER.format_error(&e.to_string()));
        process::exit(1);
    }
}
