use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tln", about = concat!("[~] traceline v", env!("CARGO_PKG_VERSION"), " - replay recorded instrumentation buffers"), version)]
pub struct Cli {
    /// Payload file: a JSON object with a `buffer_items` array
    pub payload: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different config file (default: ./traceline.toml if present)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show buffer statistics (per-kind counts, tag index)
    Stats,
    /// Print the expanded timeline as text
    Dump(DumpArgs),
}

#[derive(Args)]
pub struct DumpArgs {
    /// Only show entries of these kinds: event, query, prompt, other
    #[arg(long = "kind", value_name = "KIND")]
    pub kinds: Vec<String>,

    /// Only show entries carrying a tag value, as KEY=VALUE (repeatable;
    /// values for the same key OR together, distinct keys AND)
    #[arg(long = "tag", value_name = "KEY=VALUE")]
    pub tags: Vec<String>,
}
