#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Selker combat simulation.

mod runner;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use selker_config::ConfigProvider;
use selker_ranking::{
    submit_with_fallback, FileStore, LocalRanking, MemoryStore, OfflineBackend, RankingStore,
    ScoreRecord, SubmitOutcome,
};
use selker_system_scaling::ScaleManager;

/// Headless driver for the Selker combat simulation.
#[derive(Debug, Parser)]
#[command(name = "selker", version, about)]
struct Args {
    /// Seed for the deterministic simulation streams.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Path to a TOML tuning file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated run duration in seconds.
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Apply the mobile presentation reduction to the reported scale.
    #[arg(long)]
    mobile: bool,

    /// Nickname recorded with the final score.
    #[arg(long, default_value = "player")]
    nickname: String,

    /// Directory for the persisted local ranking list. In-memory when omitted.
    #[arg(long)]
    ranking_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigProvider::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConfigProvider::fallback(),
    };

    let scale = ScaleManager::new(800.0, 600.0, args.mobile);
    println!("presentation scale: {:.2}", scale.factor());

    let summary = runner::run(
        &config,
        args.seed,
        Duration::from_secs(args.duration),
        |wave, score| println!("wave {wave} reached, score {score}"),
    );

    println!(
        "run finished: score {}, wave {}, weapon level {}, {}s played{}",
        summary.score,
        summary.wave,
        summary.weapon_level,
        summary.play_time_seconds,
        if summary.game_over { ", game over" } else { "" },
    );

    let record = ScoreRecord {
        nickname: args.nickname.clone(),
        score: summary.score,
        wave: summary.wave,
        weapon_level: summary.weapon_level,
        play_time_seconds: summary.play_time_seconds,
    };

    let mut store: Box<dyn RankingStore> = match &args.ranking_dir {
        Some(dir) => Box::new(FileStore::new(dir.clone())),
        None => Box::new(MemoryStore::new()),
    };
    let mut local = LocalRanking::load(store.as_ref()).context("failed to load ranking list")?;
    let mut backend = OfflineBackend;

    let outcome = submit_with_fallback(&mut backend, &mut local, store.as_mut(), record)
        .context("failed to persist ranking list")?;
    match outcome {
        SubmitOutcome::Remote => println!("score submitted"),
        SubmitOutcome::LocalFallback => println!("backend offline, score kept locally"),
    }

    for (rank, entry) in local.records().iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:>8}  wave {:>2}",
            rank + 1,
            entry.nickname,
            entry.score,
            entry.wave,
        );
    }

    Ok(())
}
