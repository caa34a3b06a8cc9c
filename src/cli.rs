use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "handout")]
#[command(author, version, about = "Telegram bot that distributes an application archive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (long polling plus the status web server)
    Run,

    /// Print store statistics to stdout and exit
    Stats,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
