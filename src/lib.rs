/// Learning agents
pub mod algo;

/// Binary persistence of action-value tables
pub mod checkpoint;

/// Trainer configuration
pub mod config;

/// Time-decaying hyperparameters
pub mod decay;

/// Mapping continuous observations to discrete states
pub mod discretize;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Error type
pub mod error;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Reward plots
pub mod plot;

/// Episode records and the progress log
pub mod record;

/// Training and evaluation loops
pub mod trainer;

/// Terminal rendering
#[cfg(feature = "viz")]
pub mod viz;

mod util;

use crate::{
    config::TrainerConfig,
    env::DiscreteActionSpace,
    error::Result,
    gym::CartPole,
    trainer::{Trainer, TrainingReport},
};

/// Train a new agent or evaluate a saved one on the built-in CartPole
///
/// - `train` - learn from scratch and write the checkpoint, otherwise load the checkpoint and
///   run greedy episodes
/// - `render` - draw the environment in the terminal while running, requires the `viz` feature
pub fn solve(config: &TrainerConfig, train: bool, render: bool) -> Result<TrainingReport> {
    let env = CartPole::new(config.seed.map(|s| s.wrapping_add(1)));
    if render {
        #[cfg(feature = "viz")]
        return run(viz::Rendered::new(env)?, config, train);
        #[cfg(not(feature = "viz"))]
        return Err(error::Error::RenderUnavailable);
    }
    run(env, config, train)
}

/// [`solve`] with a caller-provided environment
///
/// The environment is dropped before the plot is written.
pub fn run<E>(env: E, config: &TrainerConfig, train: bool) -> Result<TrainingReport>
where
    E: DiscreteActionSpace<Observation = [f32; 4]>,
    E::Action: Copy + Into<usize>,
{
    let report = if train {
        Trainer::new(env, config.clone())?.train()?
    } else {
        Trainer::from_checkpoint(env, config.clone())?.evaluate()?
    };

    if let Some(path) = &config.plot_path {
        plot::save_trailing_mean(&report.rewards, config.window, path)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn test_config(dir: &TempDir) -> TrainerConfig {
        TrainerConfig::default()
            .output_dir(dir.path())
            .plot_path(None)
            .seed(5)
            .max_episodes(30)
            .eval_episodes(3)
    }

    #[test]
    fn solve_train_then_evaluate() -> Result<()> {
        let dir = TempDir::new("solve")?;
        let config = test_config(&dir);

        let trained = solve(&config, true, false)?;
        assert_eq!(trained.episodes(), 30);
        assert!(config.checkpoint_path.exists());

        let evaluated = solve(&config, false, false)?;
        assert_eq!(evaluated.episodes(), 3);
        assert!(evaluated.rewards.iter().all(|&r| r <= 201.0));
        Ok(())
    }

    #[test]
    fn evaluate_without_checkpoint_fails() {
        let dir = TempDir::new("solve").unwrap();
        assert!(solve(&test_config(&dir), false, false).is_err());
    }

    #[cfg(not(feature = "viz"))]
    #[test]
    fn render_needs_viz() {
        let dir = TempDir::new("solve").unwrap();
        assert!(matches!(
            solve(&test_config(&dir), true, true),
            Err(error::Error::RenderUnavailable)
        ));
    }
}
