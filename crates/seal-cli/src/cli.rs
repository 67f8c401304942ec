use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "seal",
    about = "SEAL — tamper-evident provenance proofs for media files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Provenance root directory.
    #[arg(long, global = true, default_value = "proofs")]
    pub root: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Hash a media file and write its baseline proof
    Prove(ProveArgs),
    /// Check whether a proof exists for a digest
    Check(CheckArgs),
    /// Print the proof record for a digest
    Show(ShowArgs),
}

#[derive(Args)]
pub struct ProveArgs {
    /// Media file to prove.
    pub path: PathBuf,

    /// Use this precomputed digest instead of hashing the file.
    #[arg(long)]
    pub digest: Option<String>,

    /// Include device identifiers in the evidence record.
    #[arg(long)]
    pub device_ids: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Hex content digest.
    pub digest: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Hex content digest.
    pub digest: String,
}
