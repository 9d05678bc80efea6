use rand::Rng;

use crate::error::Result;

/// The outcome of a single environment step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<O> {
    /// The observation after the action was applied, also provided on the final step
    pub observation: O,
    /// The reward received for the action
    pub reward: f32,
    /// The episode reached a terminal state of the underlying dynamics
    pub terminated: bool,
    /// The episode was cut short by a limit outside the dynamics, e.g. a step limit
    pub truncated: bool,
}

impl<O> Transition<O> {
    /// Whether no further steps may be taken in this episode
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent,
/// treated as a black box by the agents in this crate.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type Observation;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the initial observation
    fn reset(&mut self) -> Result<Self::Observation>;

    /// Update the environment in response to an action taken by an agent
    ///
    /// Errors from the underlying simulator are propagated to the caller and are fatal to the run.
    fn step(&mut self, action: Self::Action) -> Result<Transition<Self::Observation>>;

    /// Sample an action uniformly from the action space
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action;
}

/// An environment with a finite, ordered set of actions
///
/// The position of an action in [`actions`](DiscreteActionSpace::actions) is its index in
/// an action-value table.
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions, ordered by index
    ///
    /// The returned vector should never be empty.
    fn actions(&self) -> Vec<Self::Action>;

    /// Number of available actions
    fn action_count(&self) -> usize {
        self.actions().len()
    }
}
