//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`]. Each handler lives in its
//! own submodule.

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::TickerProxyError;

pub async fn dispatch(cli: Cli) -> Result<(), TickerProxyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  tickerproxy v{version} \u{2014} Alpha Vantage relay\n\n  \
         No command provided. To get started:\n\n    \
         tickerproxy run                       Start the relay (key from $ALPHA_VANTAGE_API_KEY)\n    \
         tickerproxy run --api-key-file FILE   Start the relay with a key file\n    \
         tickerproxy health                    Check a running instance\n    \
         tickerproxy --help                    See all commands and options\n"
    );
}
