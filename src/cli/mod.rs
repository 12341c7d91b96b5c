use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;

use crate::core::Variant;

#[derive(Subcommand)]
enum Command {
    /// Run the chat web server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,

        /// Single conversation or multiple rooms. Defaults to
        /// NOTECHAT_VARIANT or rooms.
        #[arg(long, value_enum)]
        variant: Option<Variant>,
    },
    /// Start a chat session in the terminal
    Chat {
        #[arg(long, value_enum)]
        variant: Option<Variant>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve {
            host,
            port,
            variant,
        }) => {
            serve::run(host, port, variant).await?;
        }
        Some(Command::Chat { variant }) => {
            chat::run(variant).await?;
        }
        None => {}
    }

    Ok(())
}
