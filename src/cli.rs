//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};

/// TickGate realtime market-data gateway
#[derive(Debug, Parser)]
#[command(name = "tickgate-server", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/{env}`
    #[arg(short, long, env = "TICKGATE_ENV", default_value = "development")]
    pub env: String,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the gateway
    Serve,
    /// Mint a signed access token for local testing
    Token(TokenArgs),
}

/// Arguments for `token`
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Principal identifier (`sub` claim)
    #[arg(long)]
    pub user_id: String,

    /// Principal email
    #[arg(long)]
    pub email: String,

    /// Token lifetime in minutes; uses `auth.access_ttl_minutes` when omitted
    #[arg(long)]
    pub ttl_minutes: Option<i64>,
}
