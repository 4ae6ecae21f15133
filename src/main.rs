use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = tickerproxy::cli::Cli::parse();
    if let Err(e) = tickerproxy::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
