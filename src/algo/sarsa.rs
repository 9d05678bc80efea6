use log::debug;
use rand::Rng;

use crate::{
    assert_interval, decay,
    discretize::Discretizer,
    ds::ActionTable,
    env::{DiscreteActionSpace, Environment},
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    util::argmax,
};

/// Configuration for the [`SarsaAgent`]
#[derive(Debug, Clone)]
pub struct SarsaAgentConfig {
    pub exploration: EpsilonGreedy<decay::Linear>,
    pub alpha: f32,
    pub gamma: f32,
    /// An episode is cut short once its accumulated reward exceeds this value
    pub reward_cap: f32,
}

impl Default for SarsaAgentConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Linear::new(1e-5, 1.0, 0.0).expect("rate and bounds agree"),
            ),
            alpha: 0.1,
            gamma: 0.99,
            reward_cap: 200.0,
        }
    }
}

/// Why an episode stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// The environment reached a terminal state
    Terminated,
    /// The accumulated reward exceeded the agent's cap
    RewardCap,
    /// The environment hit its own step limit
    TimeLimit,
}

/// Summary of a finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Episode {
    pub reward: f32,
    pub steps: usize,
    pub end: EpisodeEnd,
}

/// An on-policy SARSA agent over a discretized observation space
///
/// Observations are mapped to discrete states by a [`Discretizer`], and action values
/// are kept in a dense [`ActionTable`]. Each step applies the one-step update
///
/// Q(s,a) ← Q(s,a) + α (r + γ Q(s',a') - Q(s,a))
///
/// where `a'` is the action the policy picks in `s'` and then actually takes. The update
/// bootstraps on every step, including the one that ends the episode.
///
/// ### Generics
/// - `N` - The number of observation dimensions
#[derive(Debug, Clone)]
pub struct SarsaAgent<const N: usize> {
    table: ActionTable,
    discretizer: Discretizer<N>,
    exploration: EpsilonGreedy<decay::Linear>,
    alpha: f32,      // learning rate
    gamma: f32,      // discount factor
    reward_cap: f32, // episode reward limit
    episode: u32,    // current training episode
}

impl<const N: usize> SarsaAgent<N> {
    /// Initialize a new `SarsaAgent` with a zeroed table
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(discretizer: Discretizer<N>, actions: usize, config: SarsaAgentConfig) -> Self {
        let table = ActionTable::zeros(&discretizer.shape(), actions);
        Self::build(discretizer, table, config)
    }

    /// Initialize a `SarsaAgent` from an existing table, e.g. one loaded from a checkpoint
    ///
    /// **Errors** if the table's state axes do not match the discretizer
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn with_table(
        discretizer: Discretizer<N>,
        table: ActionTable,
        config: SarsaAgentConfig,
    ) -> Result<Self> {
        let mut expected = discretizer.shape().to_vec();
        expected.push(table.action_count());
        table.ensure_shape(&expected)?;
        Ok(Self::build(discretizer, table, config))
    }

    fn build(discretizer: Discretizer<N>, table: ActionTable, config: SarsaAgentConfig) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            table,
            discretizer,
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            reward_cap: config.reward_cap,
            episode: 0,
        }
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    pub fn into_table(self) -> ActionTable {
        self.table
    }

    pub fn discretizer(&self) -> &Discretizer<N> {
        &self.discretizer
    }

    /// Number of completed training episodes, the time step of the epsilon schedule
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Current exploration probability
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.episode)
    }

    /// Advance the epsilon schedule by one episode
    pub fn next_episode(&mut self) {
        self.episode += 1;
    }

    /// Apply the SARSA update to the value of `action` in `state`
    pub fn learn(
        &mut self,
        state: &[usize; N],
        action: usize,
        reward: f32,
        next_state: &[usize; N],
        next_action: usize,
    ) {
        let next_q = self.table.get(next_state, next_action);
        let q = self.table.get_mut(state, action);
        *q += self.alpha * (reward + self.gamma * next_q - *q);
        debug_assert!(q.is_finite(), "action value diverged");
    }

    /// Best known action in `state`, ties going to the lowest action index
    fn greedy<E>(&self, env: &E, state: &[usize; N]) -> Result<E::Action>
    where
        E: DiscreteActionSpace,
        E::Action: Copy + Into<usize>,
    {
        let row = self.table.row(state);
        let actions = env.actions();
        let best = argmax(actions.iter().map(|&a| row[a.into()]))
            .ok_or_else(|| Error::Environment("no actions available".into()))?;
        Ok(actions[best])
    }

    /// Choose an action based on the current state and, while training, the exploration policy
    fn act<E, R>(&self, env: &E, state: &[usize; N], train: bool, rng: &mut R) -> Result<E::Action>
    where
        E: DiscreteActionSpace,
        E::Action: Copy + Into<usize>,
        R: Rng + ?Sized,
    {
        if !train {
            return self.greedy(env, state);
        }
        match self.exploration.choose(self.episode, rng) {
            Choice::Explore => Ok(env.random_action(rng)),
            Choice::Exploit => self.greedy(env, state),
        }
    }

    fn run<E, R>(&mut self, env: &mut E, rng: &mut R, train: bool) -> Result<Episode>
    where
        E: DiscreteActionSpace<Observation = [f32; N]>,
        E::Action: Copy + Into<usize>,
        R: Rng + ?Sized,
    {
        if env.action_count() != self.table.action_count() {
            let mut expected = self.discretizer.shape().to_vec();
            expected.push(env.action_count());
            return Err(Error::ShapeMismatch {
                expected,
                found: self.table.shape().to_vec(),
            });
        }

        let mut state = self.discretizer.discretize(&env.reset()?);
        let mut action = self.act(&*env, &state, train, rng)?;
        let mut reward = 0.0;
        let mut steps = 0;

        let end = loop {
            let transition = env.step(action)?;
            let next_state = self.discretizer.discretize(&transition.observation);
            let next_action = self.act(&*env, &next_state, train, rng)?;

            if train {
                self.learn(
                    &state,
                    action.into(),
                    transition.reward,
                    &next_state,
                    next_action.into(),
                );
            }

            reward += transition.reward;
            steps += 1;
            (state, action) = (next_state, next_action);

            if transition.terminated {
                break EpisodeEnd::Terminated;
            }
            if reward > self.reward_cap {
                break EpisodeEnd::RewardCap;
            }
            if transition.truncated {
                break EpisodeEnd::TimeLimit;
            }
        };

        debug!("episode finished after {steps} steps with reward {reward} ({end:?})");
        Ok(Episode { reward, steps, end })
    }

    /// Run one training episode in the given environment, updating the table every step
    ///
    /// The epsilon schedule is not advanced; call [`next_episode`](Self::next_episode).
    pub fn go<E, R>(&mut self, env: &mut E, rng: &mut R) -> Result<Episode>
    where
        E: DiscreteActionSpace<Observation = [f32; N]>,
        E::Action: Copy + Into<usize>,
        R: Rng + ?Sized,
    {
        self.run(env, rng, true)
    }

    /// Run one greedy episode without exploring or updating the table
    pub fn play<E, R>(&mut self, env: &mut E, rng: &mut R) -> Result<Episode>
    where
        E: DiscreteActionSpace<Observation = [f32; N]>,
        E::Action: Copy + Into<usize>,
        R: Rng + ?Sized,
    {
        self.run(env, rng, false)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        discretize::{Bins, LinSpace},
        env::tests::MockEnv,
        gym::CartPole,
    };

    fn corridor_discretizer() -> Discretizer<4> {
        let coarse = || Bins::new(vec![0.0]).unwrap();
        Discretizer::new([
            Bins::new(vec![-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap(),
            coarse(),
            coarse(),
            coarse(),
        ])
    }

    fn cart_pole_discretizer() -> Discretizer<4> {
        Discretizer::from_spaces([
            LinSpace::new(-2.4, 2.4, 10),
            LinSpace::new(-4.0, 4.0, 10),
            LinSpace::new(-0.2095, 0.2095, 10),
            LinSpace::new(-4.0, 4.0, 10),
        ])
        .unwrap()
    }

    fn config(alpha: f32, gamma: f32) -> SarsaAgentConfig {
        SarsaAgentConfig {
            alpha,
            gamma,
            ..Default::default()
        }
    }

    #[test]
    fn update_fixed_point() {
        let mut agent = SarsaAgent::new(corridor_discretizer(), 2, config(0.1, 0.5));
        let (s, s2) = ([1, 0, 0, 0], [2, 0, 0, 0]);
        *agent.table.get_mut(&s, 0) = 1.0;
        *agent.table.get_mut(&s2, 1) = 2.0;

        agent.learn(&s, 0, 0.0, &s2, 1);
        assert_eq!(agent.table().get(&s, 0), 1.0, "gamma * Q(s',a') == Q(s,a) is a fixed point");
    }

    #[test]
    fn update_moves_alpha_of_gap() {
        let mut agent = SarsaAgent::new(corridor_discretizer(), 2, config(0.25, 0.5));
        let (s, s2) = ([1, 0, 0, 0], [2, 0, 0, 0]);
        *agent.table.get_mut(&s, 1) = 2.0;
        *agent.table.get_mut(&s2, 0) = 4.0;

        // target = 1 + 0.5 * 4 = 3, gap = 1
        agent.learn(&s, 1, 1.0, &s2, 0);
        assert!((agent.table().get(&s, 1) - 2.25).abs() < 1e-6, "moved by alpha * gap");
        assert_eq!(agent.table().get(&s2, 0), 4.0, "next state untouched");
        assert_eq!(
            agent.table().values().iter().filter(|&&x| x != 0.0).count(),
            2,
            "only the updated cell changed"
        );
    }

    #[test]
    fn greedy_breaks_ties_low() {
        let agent = SarsaAgent::new(corridor_discretizer(), 2, config(0.1, 0.9));
        let env = MockEnv::new(2, 10);
        assert_eq!(agent.greedy(&env, &[0; 4]).unwrap(), 0, "tie goes to action 0");

        let mut agent = agent;
        *agent.table.get_mut(&[0; 4], 1) = 0.5;
        assert_eq!(agent.greedy(&env, &[0; 4]).unwrap(), 1, "larger value wins");
    }

    #[test]
    fn play_does_not_learn() {
        let mut agent = SarsaAgent::new(corridor_discretizer(), 2, config(0.5, 0.9));
        let mut env = MockEnv::new(2, 10);
        let mut rng = StdRng::seed_from_u64(0);

        let episode = agent.play(&mut env, &mut rng).unwrap();
        assert!(agent.table().values().iter().all(|&x| x == 0.0), "table untouched");
        assert_eq!(episode.end, EpisodeEnd::Terminated, "greedy walks left off the corridor");
        assert_eq!(episode.steps, 3);
    }

    #[test]
    fn go_learns_and_stays_finite() {
        let mut agent = SarsaAgent::new(corridor_discretizer(), 2, config(0.5, 0.9));
        let mut env = MockEnv::new(2, 10);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..50 {
            agent.go(&mut env, &mut rng).unwrap();
            agent.next_episode();
        }
        assert_eq!(agent.episode(), 50, "episode counter advanced");
        assert!(agent.table().values().iter().any(|&x| x != 0.0), "table updated");
        assert!(agent.table().is_finite(), "values stay finite");
    }

    #[test]
    fn reward_cap_stops_episode() {
        let mut agent = SarsaAgent::new(
            corridor_discretizer(),
            2,
            SarsaAgentConfig {
                reward_cap: 3.0,
                ..Default::default()
            },
        );
        // a corridor too wide to leave within the cap
        let mut env = MockEnv::new(100, 1000);
        let mut rng = StdRng::seed_from_u64(1);
        let episode = agent.go(&mut env, &mut rng).unwrap();
        assert_eq!(episode.end, EpisodeEnd::RewardCap);
        assert_eq!(episode.steps, 4, "stops on the first step exceeding the cap");
        assert_eq!(episode.reward, 4.0);
    }

    #[test]
    fn cart_pole_episodes_are_bounded() {
        let mut agent = SarsaAgent::new(cart_pole_discretizer(), 2, SarsaAgentConfig::default());
        let mut env = CartPole::new(Some(9));
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let episode = agent.go(&mut env, &mut rng).unwrap();
            assert!(episode.steps <= 201, "within reward cap + 1 steps");
            assert!(episode.reward <= 201.0);
            agent.next_episode();
        }
        assert!(agent.table().is_finite(), "values stay finite");
    }

    #[test]
    fn with_table_checks_shape() {
        let table = ActionTable::zeros(&[3, 2, 2, 2], 2);
        let result = SarsaAgent::with_table(corridor_discretizer(), table, Default::default());
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));

        let table = ActionTable::zeros(&[6, 2, 2, 2], 2);
        assert!(SarsaAgent::with_table(corridor_discretizer(), table, Default::default()).is_ok());
    }

    #[test]
    fn action_count_mismatch_fails() {
        let mut agent = SarsaAgent::new(corridor_discretizer(), 3, Default::default());
        let mut env = MockEnv::new(2, 10);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            agent.go(&mut env, &mut rng),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "Invalid value")]
    fn rejects_alpha_out_of_range() {
        SarsaAgent::new(corridor_discretizer(), 2, config(1.5, 0.9));
    }
}
