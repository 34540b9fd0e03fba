use anyhow::Context;
use baduk_arena::config::MatchConfig;
use baduk_arena::runner::MatchRunner;
use baduk_arena::store::{FileStore, SnapshotStore};
use baduk_engine::{Game, VariantKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "baduk-arena")]
#[command(about = "Replays Go variant matches and keeps their snapshots")]
struct Cli {
    /// Directory holding game snapshots
    #[arg(long, global = true, default_value = "data/snapshots")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available variants
    Variants,
    /// Replay a match file
    Play {
        /// Path to the TOML match file
        file: PathBuf,
        /// Stop at the first rejected move
        #[arg(long)]
        strict: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a stored game
    Show {
        /// Snapshot id
        id: String,
    },
    /// List stored games
    List,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Variants => {
            for kind in VariantKind::ALL {
                println!("{:<10} {}", kind.id(), kind.description());
            }
        }
        Commands::Play { file, strict, json } => {
            let config = MatchConfig::load(&file)
                .with_context(|| format!("loading {}", file.display()))?;
            let moves = config.submissions()?;
            let mut store = FileStore::open(&cli.store)?;

            let game = match &config.snapshot {
                Some(id) if store.contains(id) => {
                    tracing::info!(%id, "resuming from snapshot");
                    store.load(id)?
                }
                _ => Game::create(&config.variant, &config.config)?,
            };

            let mut runner = MatchRunner::new(game, strict);
            let report = runner.run(&moves)?;
            let game = runner.into_game();

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_game(&game);
                println!(
                    "{} moves accepted, {} rejected",
                    report.accepted,
                    report.rejected.len()
                );
                for rejection in &report.rejected {
                    println!("  #{} {}: {}", rejection.index, rejection.submission, rejection.reason);
                }
            }

            if let Some(id) = &config.snapshot {
                store.save(id, &game)?;
                tracing::info!(%id, "snapshot saved");
            }
        }
        Commands::Show { id } => {
            let store = FileStore::open(&cli.store)?;
            let game = store.load(&id)?;
            print_game(&game);
        }
        Commands::List => {
            let store = FileStore::open(&cli.store)?;
            for id in store.list()? {
                match store.load(&id) {
                    Ok(game) => println!(
                        "{:<20} {:<10} {} turns{}",
                        id,
                        game.kind(),
                        game.state().history().len(),
                        if game.is_over() { ", finished" } else { "" }
                    ),
                    Err(e) => tracing::warn!(%id, error = %e, "unreadable snapshot"),
                }
            }
        }
    }

    Ok(())
}

fn print_game(game: &Game) {
    println!("Variant: {}", game.kind());
    for (i, board) in game.state().boards().iter().enumerate() {
        if game.state().boards().len() > 1 {
            println!("Reality {}:", if i == 0 { 'A' } else { 'B' });
        }
        print!("{}", board);
    }

    let score = game.score();
    for (i, total) in score.totals.iter().enumerate() {
        let captures = baduk_core::Color::new(i as u8)
            .map(|c| game.state().captures(c))
            .unwrap_or(0);
        println!("Player {}: {} points, {} captures", i, total, captures);
    }
    match game.state().outcome() {
        Some(outcome) => match outcome.winner() {
            Some(winner) => println!("Result: {} wins", winner),
            None => println!("Result: draw"),
        },
        None => println!("Result: in progress"),
    }
}
