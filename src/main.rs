//! Chromablock CLI
//!
//! Headless demonstration of the interactive block classifier: runs the
//! frame-paced session loop against a mock camera, feeding it a scripted
//! sequence of operator commands.

use chromablock::{
    capture::{FileConfig, FrameSource, MockCamera},
    classes::{ClassStore, Palette},
    session::{Command, LogPresenter, Presenter, SessionController, TickStatus},
};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Online color-histogram block classifier demo.
#[derive(Debug, Parser)]
#[command(name = "chromablock", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Number of ticks to run (overrides the config).
    #[arg(long)]
    ticks: Option<u32>,

    /// Classification block size in pixels (overrides the config).
    #[arg(long)]
    block_size: Option<u32>,

    /// Use macro-block (4x4) grouped classification for the overlay.
    #[arg(long)]
    grouped: bool,

    /// Scripted operator commands, one character per tick.
    ///
    /// Uses the session key bindings (q f v b a n r c); any other
    /// character is a tick without a command.
    #[arg(long, default_value = "..b..r....")]
    script: String,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Chromablock v{}", chromablock::VERSION);
    info!("This is a demonstration using mock camera input");

    let mut config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(block_size) = cli.block_size {
        config.classify.block_size = block_size;
    }
    if let Err(e) = config.classify.validate(&config.capture) {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let mut camera = MockCamera::new();
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open frame source: {}", e);
        std::process::exit(1);
    }

    // Ctrl-C requests a quit command on the next tick
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        if let Err(e) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let store = ClassStore::with_palette(Palette::new(config.classify.min_color_distance));
    let mut session = match SessionController::start(&mut camera, store, config.classify.clone()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start session: {}", e);
            std::process::exit(1);
        }
    };
    session.set_grouped(cli.grouped);

    let mut presenter = LogPresenter;
    let tick_interval = std::time::Duration::from_millis(config.session.tick_ms);
    let tick_limit = match cli.ticks {
        Some(n) => Some(n),
        None if config.session.continuous => None,
        None => Some(config.session.tick_count),
    };

    info!(
        block_size = config.classify.block_size,
        grouped = cli.grouped,
        script = %cli.script,
        "processing ticks..."
    );

    let mut script = cli.script.chars();
    let mut completed: u32 = 0;
    loop {
        if tick_limit.is_some_and(|limit| completed >= limit) {
            info!(ticks = completed, "tick limit reached");
            break;
        }

        // One command per tick: Ctrl-C wins over the script
        let command = if interrupted.load(Ordering::SeqCst) {
            Some(Command::Quit)
        } else {
            script.next().and_then(Command::from_key)
        };

        match session.tick(&mut camera, command) {
            Ok(TickStatus::Running(output)) => {
                presenter.present(session.current_frame(), &output);
            }
            Ok(TickStatus::Finished) => break,
            Err(e) => {
                warn!("Tick failed: {}", e);
            }
        }

        completed += 1;
        std::thread::sleep(tick_interval);
    }

    info!(
        ticks = session.ticks(),
        classes = session.store().class_count(),
        "session ended"
    );
    camera.close();
}
