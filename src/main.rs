use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tabular_cartpole::{config::TrainerConfig, trainer::Mode};

/// Balance a pole on a cart with discretized SARSA
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Learn a new table and write the checkpoint, otherwise evaluate the saved one
    #[arg(long, default_value_t = false)]
    train: bool,

    /// Draw the cart and pole in the terminal
    #[arg(long, default_value_t = false)]
    render: bool,

    /// YAML trainer config, defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Episode budget, of training or evaluation depending on the mode
    #[arg(long)]
    episodes: Option<usize>,

    /// Run on the gym-rs simulator instead of the built-in environment
    #[cfg(feature = "gym")]
    #[arg(long, default_value_t = false)]
    gym: bool,
}

/// Log into the renderer's pane while it owns the terminal, to stderr otherwise
#[cfg(feature = "viz")]
fn init_logger(render: bool) -> Result<()> {
    if render {
        tui_logger::init_logger(log::LevelFilter::Info)?;
        tui_logger::set_default_level(log::LevelFilter::Info);
        return Ok(());
    }
    init_env_logger();
    Ok(())
}

#[cfg(not(feature = "viz"))]
fn init_logger(_render: bool) -> Result<()> {
    init_env_logger();
    Ok(())
}

fn init_env_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn load_config(args: &Args) -> Result<TrainerConfig> {
    let mut config = match &args.config {
        Some(path) => TrainerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrainerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(episodes) = args.episodes {
        config = if args.train {
            config.max_episodes(episodes)
        } else {
            config.eval_episodes(episodes)
        };
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "gym")]
fn run_gym(
    config: &TrainerConfig,
    args: &Args,
) -> tabular_cartpole::error::Result<tabular_cartpole::trainer::TrainingReport> {
    use gym_rs::utils::renderer::RenderMode;
    use tabular_cartpole::gym::GymCartPole;

    let mode = if args.render {
        RenderMode::Human
    } else {
        RenderMode::None
    };
    tabular_cartpole::run(GymCartPole::new(mode), config, args.train)
}

fn main() -> Result<()> {
    let args = Args::parse();
    #[cfg(feature = "gym")]
    let use_tui = args.render && !args.gym;
    #[cfg(not(feature = "gym"))]
    let use_tui = args.render;
    init_logger(use_tui)?;

    let config = load_config(&args)?;

    #[cfg(feature = "gym")]
    let report = if args.gym {
        run_gym(&config, &args)?
    } else {
        tabular_cartpole::solve(&config, args.train, args.render)?
    };
    #[cfg(not(feature = "gym"))]
    let report = tabular_cartpole::solve(&config, args.train, args.render)?;

    match report.mode {
        Mode::Train => info!(
            "trained for {} episodes, solved: {}, mean reward {:.1}, epsilon {:.2}",
            report.episodes(),
            report.solved,
            report.trailing_mean(config.window),
            report.final_epsilon
        ),
        Mode::Evaluate => info!(
            "evaluated {} episodes, mean reward {:.1}",
            report.episodes(),
            report.trailing_mean(report.episodes())
        ),
    }
    Ok(())
}
