use gym_rs::core::{ActionReward, Env};
use gym_rs::envs::classical_control::cartpole::{CartPoleEnv, CartPoleObservation};
use gym_rs::utils::renderer::RenderMode;
use rand::Rng;

use super::cart_pole::CPAction;
use crate::env::{DiscreteActionSpace, Environment, Transition};
use crate::error::Result;

fn obs2arr(observation: CartPoleObservation) -> [f32; 4] {
    let values = Vec::from(observation);
    std::array::from_fn(|i| values[i] as f32)
}

/// CartPole backed by the [gym_rs](https://github.com/MathisWellmann/gym-rs) simulator
///
/// Use this instead of [`CartPole`](super::CartPole) to get gym-rs' own window rendering
/// with [`RenderMode::Human`].
#[derive(Debug, Clone)]
pub struct GymCartPole {
    gym_env: CartPoleEnv,
}

impl GymCartPole {
    pub fn new(render_mode: RenderMode) -> Self {
        Self {
            gym_env: CartPoleEnv::new(render_mode),
        }
    }
}

impl Environment for GymCartPole {
    type Observation = [f32; 4];
    type Action = CPAction;

    fn reset(&mut self) -> Result<Self::Observation> {
        Ok(obs2arr(self.gym_env.reset(None, false, None).0))
    }

    fn step(&mut self, action: Self::Action) -> Result<Transition<Self::Observation>> {
        let ActionReward {
            observation,
            reward,
            done,
            ..
        } = self.gym_env.step(action as usize);

        Ok(Transition {
            observation: obs2arr(observation),
            reward: *reward as f32,
            terminated: done,
            truncated: false,
        })
    }

    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action {
        if rng.gen_bool(0.5) {
            CPAction::Right
        } else {
            CPAction::Left
        }
    }
}

impl DiscreteActionSpace for GymCartPole {
    fn actions(&self) -> Vec<Self::Action> {
        vec![CPAction::Left, CPAction::Right]
    }
}
