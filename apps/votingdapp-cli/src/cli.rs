use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, global = true)]
    /// Path to a TOML config file
    pub config: Option<PathBuf>,

    #[arg(short = 'u', long, global = true)]
    /// URL for solana RPC (takes precedence over VOTINGDAPP_RPC_URL and the config file)
    pub rpc_url: Option<String>,

    #[arg(short, long, global = true)]
    /// Path to the signer key. Without it only read commands are available
    pub keypair: Option<PathBuf>,

    #[arg(long, global = true)]
    /// b58 encoded address of the deployed votingdapp program
    pub program_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every poll
    Polls,
    /// Show a poll, its candidates and whether you have voted
    Poll {
        /// b58 encoded poll address, as printed by `polls`
        address: String,
    },
    /// Print the poll counter (-1 when the program is not initialized)
    Counter,
    /// Create the program's counter and registration accounts
    Init,
    /// Create a new poll
    CreatePoll {
        #[arg(long)]
        description: String,
        #[arg(long)]
        /// Start of voting: RFC 3339 date-time or unix seconds
        start: String,
        #[arg(long)]
        /// End of voting: RFC 3339 date-time or unix seconds
        end: String,
    },
    /// Register a candidate in a poll
    Register { poll_id: u64, name: String },
    /// Vote for a candidate
    Vote { poll_id: u64, cid: u64 },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "votingdapp",
            "vote",
            "3",
            "7",
            "--keypair",
            "id.json",
            "-u",
            "http://localhost:8899",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::Vote { poll_id: 3, cid: 7 });
        assert_eq!(cli.keypair, Some(PathBuf::from("id.json")));
        assert_eq!(cli.rpc_url.as_deref(), Some("http://localhost:8899"));
    }
}
