use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::env::{DiscreteActionSpace, Environment, Transition};
use crate::error::{Error, Result};

const GRAVITY: f64 = 9.8;
const CART_MASS: f64 = 1.0;
const POLE_MASS: f64 = 0.1;
const TOTAL_MASS: f64 = CART_MASS + POLE_MASS;
/// Half the pole's length
const POLE_HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = POLE_MASS * POLE_HALF_LENGTH;
const FORCE_MAG: f64 = 10.0;
/// Seconds between state updates
const TAU: f64 = 0.02;

/// Cart position beyond which the episode terminates
pub const X_THRESHOLD: f64 = 2.4;
/// Pole angle (12 degrees) beyond which the episode terminates
pub const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
/// Step limit of the v1 environment
pub const MAX_EPISODE_STEPS: usize = 500;

/// Actions for the [`CartPole`] environment, representing applying a left or right force to the cart
#[derive(FromRepr, EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CPAction {
    Left = 0,
    Right = 1,
}

impl From<CPAction> for usize {
    fn from(action: CPAction) -> Self {
        action as usize
    }
}

impl TryFrom<usize> for CPAction {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Self::from_repr(value).ok_or_else(|| Error::Environment(format!("invalid action {value}")))
    }
}

/// The classic CartPole balancing task
///
/// A pole is attached by an unactuated joint to a cart moving along a frictionless track.
/// Every step the cart is pushed left or right with a fixed force and a reward of `1` is
/// given, including the step that ends the episode. The episode terminates when the pole
/// leans more than 12 degrees or the cart leaves `[-2.4, 2.4]`, and is truncated after
/// [`MAX_EPISODE_STEPS`] steps.
///
/// Observations are `[x, x_dot, theta, theta_dot]`. The dynamics are integrated with the
/// explicit Euler method, matching Gymnasium's `CartPole-v1`.
#[derive(Debug, Clone)]
pub struct CartPole {
    state: [f64; 4],
    rng: StdRng,
    steps: usize,
    max_steps: usize,
    done: bool,
}

impl CartPole {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: [0.0; 4],
            rng,
            steps: 0,
            max_steps: MAX_EPISODE_STEPS,
            done: true,
        }
    }

    /// Override the truncation step limit
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    fn observe(&self) -> [f32; 4] {
        self.state.map(|x| x as f32)
    }
}

impl Environment for CartPole {
    type Observation = [f32; 4];
    type Action = CPAction;

    fn reset(&mut self) -> Result<Self::Observation> {
        let dist = Uniform::new_inclusive(-0.05, 0.05);
        self.state = std::array::from_fn(|_| dist.sample(&mut self.rng));
        self.steps = 0;
        self.done = false;
        Ok(self.observe())
    }

    fn step(&mut self, action: Self::Action) -> Result<Transition<Self::Observation>> {
        if self.done {
            return Err(Error::Environment(
                "step called on a finished episode, call reset first".into(),
            ));
        }

        let [x, x_dot, theta, theta_dot] = self.state;
        let force = match action {
            CPAction::Left => -FORCE_MAG,
            CPAction::Right => FORCE_MAG,
        };
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot.powi(2) * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (POLE_HALF_LENGTH * (4.0 / 3.0 - POLE_MASS * cos_theta.powi(2) / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.steps += 1;

        let [x, _, theta, _] = self.state;
        let terminated = !(-X_THRESHOLD..=X_THRESHOLD).contains(&x)
            || !(-THETA_THRESHOLD..=THETA_THRESHOLD).contains(&theta);
        let truncated = !terminated && self.steps >= self.max_steps;
        self.done = terminated || truncated;

        Ok(Transition {
            observation: self.observe(),
            reward: 1.0,
            terminated,
            truncated,
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

impl DiscreteActionSpace for CartPole {
    fn actions(&self) -> Vec<Self::Action> {
        CPAction::VARIANTS.to_vec()
    }
}
