//! Nine Men's Morris GUI
//!
//! A graphical interface for playing Nine Men's Morris against the computer
//! or another player.

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use morris::ui::{GameMode, MorrisApp};
use morris::Difficulty;

/// Nine Men's Morris with an alpha-beta computer opponent
#[derive(Parser, Debug)]
#[command(name = "morris")]
#[command(about = "Play Nine Men's Morris", long_about = None)]
#[command(version)]
struct Cli {
    /// Who plays
    #[arg(long, value_enum, default_value_t = ModeArg::Pvcpu)]
    mode: ModeArg,

    /// Computer strength
    #[arg(long, value_enum, default_value_t = DifficultyArg::Medium)]
    difficulty: DifficultyArg,

    /// Log filter, e.g. `morris=debug` (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    /// Two players at one screen
    Pvp,
    /// Human as White against the computer
    Pvcpu,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pvp => GameMode::PvP,
            ModeArg::Pvcpu => GameMode::PvCpu,
        }
    }
}

impl From<DifficultyArg> for Difficulty {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn main() -> Result<(), eframe::Error> {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("morris=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mode = GameMode::from(cli.mode);
    let difficulty = Difficulty::from(cli.difficulty);
    info!(?mode, ?difficulty, "starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([640.0, 560.0])
            .with_title("Nine Men's Morris"),
        ..Default::default()
    };

    eframe::run_native(
        "Nine Men's Morris",
        options,
        Box::new(move |cc| Ok(Box::new(MorrisApp::new(cc, mode, difficulty)))),
    )
}
