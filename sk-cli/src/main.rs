//! `skctl`: operator tooling for scheduler cluster snapshots.
mod snapshot;

use clap::{
    Parser,
    Subcommand,
};
use sk_core::prelude::*;

#[derive(Parser)]
#[command(
    about = "command-line app for capturing scheduler cluster snapshots",
    version,
    propagate_version = true
)]
struct SkCommandRoot {
    #[command(subcommand)]
    subcommand: SkSubcommand,

    #[arg(short, long, global = true, default_value = "warn")]
    verbosity: String,
}

#[derive(Subcommand)]
enum SkSubcommand {
    #[command(about = "write the cluster snapshot for a pod that could not be scheduled")]
    Snapshot(snapshot::Args),
}

#[tokio::main]
async fn main() -> EmptyResult {
    let args = SkCommandRoot::parse();
    sk_core::logging::setup(&args.verbosity);

    match &args.subcommand {
        SkSubcommand::Snapshot(args) => snapshot::cmd(args).await,
    }
}

#[cfg(test)]
mod tests;
