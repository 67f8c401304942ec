use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;

use seal_crypto::Ed25519Signer;
use seal_engine::{EngineConfig, EvidenceOptions, FsStreams, ProofEngine};
use seal_notary::{AlwaysOnline, Notarizer};
use seal_record::{NoDeviceInfo, NoLocation, NoNetworkInfo, RecordBuilder};
use seal_store::ProvenanceStore;
use seal_types::{ContentDigest, MediaSource};

use crate::cli::{CheckArgs, Cli, Command, ProveArgs, ShowArgs};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Prove(args) => cmd_prove(&cli.root, args).await,
        Command::Check(args) => cmd_check(&cli.root, args),
        Command::Show(args) => cmd_show(&cli.root, args),
    }
}

fn build_engine(root: &Path, device_ids: bool) -> ProofEngine {
    let config = EngineConfig {
        evidence: EvidenceOptions {
            show_device_ids: device_ids,
            ..Default::default()
        },
        ..Default::default()
    };
    let builder = RecordBuilder::new(
        Arc::new(NoDeviceInfo),
        Arc::new(NoNetworkInfo),
        Arc::new(NoLocation),
    )
    .with_notes(format!("seal v{}", env!("CARGO_PKG_VERSION")));

    ProofEngine::new(
        ProvenanceStore::new(root),
        Arc::new(Ed25519Signer::generate()),
        builder,
        Notarizer::new(Vec::new(), Arc::new(AlwaysOnline)),
        Arc::new(FsStreams),
        config,
    )
}

async fn cmd_prove(root: &Path, args: ProveArgs) -> anyhow::Result<()> {
    let engine = build_engine(root, args.device_ids);
    let source = MediaSource::new(&args.path);

    let digest = match args.digest {
        Some(hex) => {
            let digest = ContentDigest::from_hex(&hex).context("invalid digest")?;
            engine.process_with_digest(&source, digest).await
        }
        None => engine.process(&source).await,
    };

    match digest {
        Some(digest) => {
            println!("{} Proof written for {}", "✓".green().bold(), args.path.display());
            println!("  Digest: {}", digest.to_hex().yellow());
            println!("  Record: {}", engine.store().proof_path(&digest).display());
            Ok(())
        }
        None => anyhow::bail!("no proof generated for {}", args.path.display()),
    }
}

fn cmd_check(root: &Path, args: CheckArgs) -> anyhow::Result<()> {
    let digest = ContentDigest::from_hex(&args.digest).context("invalid digest")?;
    let store = ProvenanceStore::new(root);

    if store.proof_exists(&digest) {
        println!("{} Proof exists: {}", "✓".green().bold(), digest.short_hex().yellow());
    } else {
        println!("{} No proof for {}", "✗".red().bold(), digest.short_hex().yellow());
    }
    Ok(())
}

fn cmd_show(root: &Path, args: ShowArgs) -> anyhow::Result<()> {
    let digest = ContentDigest::from_hex(&args.digest).context("invalid digest")?;
    let store = ProvenanceStore::new(root);

    if !store.proof_exists(&digest) {
        anyhow::bail!("no proof for {}", digest.to_hex());
    }

    let record = fs::read_to_string(store.proof_path(&digest))
        .with_context(|| format!("cannot read proof for {}", digest.to_hex()))?;
    print!("{record}");

    if store.media_sig_path(&digest).exists() {
        println!("{}", "media signature present".dimmed());
    }
    if store.proof_sig_path(&digest).exists() {
        println!("{}", "record signature present".dimmed());
    }
    Ok(())
}
