//! Training and evaluation loops around a [`SarsaAgent`].
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    algo::SarsaAgent,
    checkpoint,
    config::TrainerConfig,
    ds::{ActionTable, RingBuffer},
    env::DiscreteActionSpace,
    error::Result,
    record::{ProgressLog, ProgressRecord},
};

/// Whether a run updates the table or only follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Evaluate,
}

/// Outcome of a [`Trainer`] run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub mode: Mode,
    /// Total reward of every episode, in order
    pub rewards: Vec<f32>,
    /// The trailing mean reached the success threshold
    pub solved: bool,
    /// Exploration probability when the run ended
    pub final_epsilon: f32,
}

impl TrainingReport {
    pub fn episodes(&self) -> usize {
        self.rewards.len()
    }

    /// Mean reward of the last `window` episodes
    pub fn trailing_mean(&self, window: usize) -> f32 {
        let tail = &self.rewards[self.rewards.len().saturating_sub(window.max(1))..];
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().sum::<f32>() / tail.len() as f32
    }
}

/// Drives a [`SarsaAgent`] through episodes of a CartPole-like environment
///
/// The trainer owns the environment, the agent with its action-value table, and the RNG used
/// for exploration, so a run has no state outside this value.
pub struct Trainer<E> {
    env: E,
    agent: SarsaAgent<4>,
    rng: StdRng,
    config: TrainerConfig,
    progress: ProgressLog,
}

impl<E> Trainer<E>
where
    E: DiscreteActionSpace<Observation = [f32; 4]>,
    E::Action: Copy + Into<usize>,
{
    /// Set up training from a zeroed table
    pub fn new(env: E, config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let agent = SarsaAgent::new(
            config.bins.discretizer()?,
            env.action_count(),
            config.agent_config()?,
        );
        Ok(Self::build(env, agent, config))
    }

    /// Set up from the table stored at the configured checkpoint path
    ///
    /// **Errors** if the checkpoint is missing or its shape does not match the configured bins
    pub fn from_checkpoint(env: E, config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let discretizer = config.bins.discretizer()?;
        let mut shape = discretizer.shape().to_vec();
        shape.push(env.action_count());
        let table = checkpoint::load(&config.checkpoint_path, &shape)?;
        let agent = SarsaAgent::with_table(discretizer, table, config.agent_config()?)?;
        Ok(Self::build(env, agent, config))
    }

    fn build(env: E, agent: SarsaAgent<4>, config: TrainerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let progress = ProgressLog::new(config.progress_log_path.clone());
        Self {
            env,
            agent,
            rng,
            config,
            progress,
        }
    }

    pub fn agent(&self) -> &SarsaAgent<4> {
        &self.agent
    }

    pub fn table(&self) -> &ActionTable {
        self.agent.table()
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Train until the trailing mean reward reaches the success threshold or the episode
    /// budget runs out, then write the checkpoint
    pub fn train(&mut self) -> Result<TrainingReport> {
        let mut rewards = Vec::new();
        let mut window = RingBuffer::new(self.config.window);
        let mut solved = false;

        for i in 0..self.config.max_episodes {
            let epsilon = self.agent.epsilon();
            let episode = self.agent.go(&mut self.env, &mut self.rng)?;
            rewards.push(episode.reward);
            window.push(episode.reward);

            let record = ProgressRecord {
                episode: i,
                reward: episode.reward,
                epsilon,
                mean_reward: window.mean(),
            };
            if i % self.config.log_interval == 0 {
                info!("{record}");
                self.progress.append(&record)?;
            }
            if record.mean_reward >= self.config.success_threshold {
                info!("solved after {} episodes: {record}", i + 1);
                solved = true;
                break;
            }

            self.agent.next_episode();
        }

        if !solved {
            info!(
                "episode budget of {} exhausted, mean reward {:.1}",
                self.config.max_episodes,
                window.mean()
            );
        }
        self.save_checkpoint()?;

        Ok(TrainingReport {
            mode: Mode::Train,
            rewards,
            solved,
            final_epsilon: self.agent.epsilon(),
        })
    }

    /// Run greedy episodes without updating the table
    pub fn evaluate(&mut self) -> Result<TrainingReport> {
        let mut rewards = Vec::with_capacity(self.config.eval_episodes);
        for i in 0..self.config.eval_episodes {
            let episode = self.agent.play(&mut self.env, &mut self.rng)?;
            info!("Episode: {i}  Rewards: {}", episode.reward);
            rewards.push(episode.reward);
        }

        Ok(TrainingReport {
            mode: Mode::Evaluate,
            rewards,
            solved: false,
            final_epsilon: 0.0,
        })
    }

    pub fn save_checkpoint(&self) -> Result<()> {
        checkpoint::save(self.agent.table(), &self.config.checkpoint_path)
    }
}
