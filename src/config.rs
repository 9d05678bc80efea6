//! Configuration of [`Trainer`](crate::trainer::Trainer).
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    algo::SarsaAgentConfig,
    decay,
    discretize::{Discretizer, LinSpace},
    error::{Error, Result},
    exploration::EpsilonGreedy,
};

/// Bin boundaries for each CartPole observation component
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BinsConfig {
    pub position: LinSpace,
    pub velocity: LinSpace,
    pub angle: LinSpace,
    pub angular_velocity: LinSpace,
}

impl Default for BinsConfig {
    fn default() -> Self {
        Self {
            position: LinSpace::new(-2.4, 2.4, 10),
            velocity: LinSpace::new(-4.0, 4.0, 10),
            angle: LinSpace::new(-0.2095, 0.2095, 10),
            angular_velocity: LinSpace::new(-4.0, 4.0, 10),
        }
    }
}

impl BinsConfig {
    pub fn discretizer(&self) -> Result<Discretizer<4>> {
        Discretizer::from_spaces([
            self.position,
            self.velocity,
            self.angle,
            self.angular_velocity,
        ])
    }
}

/// Configuration of [`Trainer`](crate::trainer::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct TrainerConfig {
    /// Learning rate.
    pub alpha: f32,

    /// Discount factor, in `[0, 1)`.
    pub gamma: f32,

    /// Exploration probability of the first episode.
    pub epsilon_start: f32,

    /// Amount subtracted from epsilon after every training episode.
    pub epsilon_decay: f32,

    /// The maximum number of training episodes.
    pub max_episodes: usize,

    /// The number of greedy episodes run in evaluation mode.
    pub eval_episodes: usize,

    /// An episode stops once its reward exceeds this value.
    pub reward_cap: f32,

    /// Training stops once the trailing mean reward reaches this value.
    pub success_threshold: f32,

    /// Number of episodes in the trailing mean.
    pub window: usize,

    /// Interval of progress records in episodes.
    pub log_interval: usize,

    /// Seed of the agent and environment RNGs, drawn from entropy when absent.
    pub seed: Option<u64>,

    pub bins: BinsConfig,

    pub checkpoint_path: PathBuf,

    /// Append-only progress file.
    pub progress_log_path: PathBuf,

    /// Trailing-mean plot, skipped when absent.
    pub plot_path: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.99,
            epsilon_start: 1.0,
            epsilon_decay: 1e-5,
            max_episodes: 100_000,
            eval_episodes: 10,
            reward_cap: 200.0,
            success_threshold: 195.0,
            window: 100,
            log_interval: 100,
            seed: None,
            bins: BinsConfig::default(),
            checkpoint_path: PathBuf::from("cartpole_monte_carlo.pkl"),
            progress_log_path: PathBuf::from("SARSA.txt"),
            plot_path: Some(PathBuf::from("cartpole_monte_carlo.png")),
        }
    }
}

impl TrainerConfig {
    /// Sets the learning rate.
    pub fn alpha(mut self, v: f32) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the initial epsilon and its per-episode decrement.
    pub fn epsilon(mut self, start: f32, decay: f32) -> Self {
        self.epsilon_start = start;
        self.epsilon_decay = decay;
        self
    }

    /// Sets the maximum number of training episodes.
    pub fn max_episodes(mut self, v: usize) -> Self {
        self.max_episodes = v;
        self
    }

    /// Sets the number of evaluation episodes.
    pub fn eval_episodes(mut self, v: usize) -> Self {
        self.eval_episodes = v;
        self
    }

    /// Sets the seed of all RNGs.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Sets the interval of progress records in episodes.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Places the checkpoint, progress log and plot in `dir`, keeping their file names.
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let rebase = |p: &Path| dir.join(p.file_name().unwrap_or(p.as_os_str()));
        self.checkpoint_path = rebase(&self.checkpoint_path);
        self.progress_log_path = rebase(&self.progress_log_path);
        self.plot_path = self.plot_path.as_deref().map(rebase);
        self
    }

    /// Sets the plot file, `None` disables plotting.
    pub fn plot_path(mut self, v: Option<PathBuf>) -> Self {
        self.plot_path = v;
        self
    }

    /// Checks value ranges and bins.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        if !(0.0..=1.0).contains(&self.alpha) {
            return invalid(format!("alpha must be in [0, 1], got {}", self.alpha));
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return invalid(format!("gamma must be in [0, 1), got {}", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return invalid(format!(
                "epsilon_start must be in [0, 1], got {}",
                self.epsilon_start
            ));
        }
        if self.epsilon_decay.is_nan() || self.epsilon_decay < 0.0 {
            return invalid(format!(
                "epsilon_decay must be non-negative, got {}",
                self.epsilon_decay
            ));
        }
        if self.window == 0 {
            return invalid("window must be positive".into());
        }
        if self.log_interval == 0 {
            return invalid("log_interval must be positive".into());
        }
        if !self.reward_cap.is_finite() {
            return invalid(format!("reward_cap must be finite, got {}", self.reward_cap));
        }
        self.bins.discretizer()?;
        Ok(())
    }

    /// Agent settings derived from this configuration.
    pub fn agent_config(&self) -> Result<SarsaAgentConfig> {
        let schedule = decay::Linear::new(self.epsilon_decay, self.epsilon_start, 0.0)?;
        Ok(SarsaAgentConfig {
            exploration: EpsilonGreedy::new(schedule),
            alpha: self.alpha,
            gamma: self.gamma,
            reward_cap: self.reward_cap,
        })
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b: Self = serde_yaml::from_reader(rdr)?;
        b.validate()?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        serde_yaml::to_writer(&mut file, self)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn default_is_valid() {
        let config = TrainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bins.discretizer().unwrap().shape(), [11; 4]);
        let agent = config.agent_config().unwrap();
        assert_eq!(agent.exploration.epsilon(0), 1.0, "starts fully random");
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(TrainerConfig::default().gamma(1.0).validate().is_err(), "gamma < 1");
        assert!(TrainerConfig::default().alpha(-0.1).validate().is_err());
        assert!(TrainerConfig::default().epsilon(1.5, 0.0).validate().is_err());
        assert!(TrainerConfig::default().epsilon(1.0, -1.0).validate().is_err());
        assert!(TrainerConfig::default().log_interval(0).validate().is_err());

        let mut config = TrainerConfig::default();
        config.bins.angle = LinSpace::new(0.2, -0.2, 10);
        assert!(matches!(config.validate(), Err(Error::InvalidBins(_))));
    }

    #[test]
    fn yaml_round_trip() -> Result<()> {
        let dir = TempDir::new("config")?;
        let path = dir.path().join("trainer.yaml");
        let config = TrainerConfig::default().max_episodes(500).seed(3);
        config.save(&path)?;
        let loaded = TrainerConfig::load(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn partial_yaml_uses_defaults() -> Result<()> {
        let dir = TempDir::new("config")?;
        let path = dir.path().join("trainer.yaml");
        std::fs::write(&path, "alpha: 0.2\nmax_episodes: 10\n")?;
        let loaded = TrainerConfig::load(&path)?;
        assert_eq!(loaded.alpha, 0.2);
        assert_eq!(loaded.max_episodes, 10);
        assert_eq!(loaded.gamma, 0.99, "missing keys take defaults");
        Ok(())
    }

    #[test]
    fn output_dir_rebases_files() {
        let config = TrainerConfig::default().output_dir("/tmp/run");
        assert_eq!(config.checkpoint_path, Path::new("/tmp/run/cartpole_monte_carlo.pkl"));
        assert_eq!(config.progress_log_path, Path::new("/tmp/run/SARSA.txt"));
        assert_eq!(
            config.plot_path.as_deref(),
            Some(Path::new("/tmp/run/cartpole_monte_carlo.png"))
        );
    }
}
