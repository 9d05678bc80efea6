use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Exploration probability at time `t`, clamped to `[0,1]`
    pub fn epsilon(&self, t: u32) -> f32 {
        self.epsilon.evaluate(t as f32).clamp(0.0, 1.0)
    }

    /// Invoke epsilon greedy policy at time `t`, exploring with probability epsilon
    pub fn choose<R: Rng + ?Sized>(&self, t: u32, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon(t) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay;

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let greedy = EpsilonGreedy::new(decay::Linear::new(0.0, 0.0, 0.0).unwrap());
        let random = EpsilonGreedy::new(decay::Linear::new(0.0, 1.0, 1.0).unwrap());
        for t in 0..1000 {
            assert_eq!(greedy.choose(t, &mut rng), Choice::Exploit, "epsilon 0 never explores");
            assert_eq!(random.choose(t, &mut rng), Choice::Explore, "epsilon 1 always explores");
        }
    }

    #[test]
    fn explores_at_rate_epsilon() {
        let mut rng = StdRng::seed_from_u64(11);
        let policy = EpsilonGreedy::new(decay::Linear::new(0.0, 0.3, 0.3).unwrap());
        let explored = (0..10_000)
            .filter(|&t| policy.choose(t, &mut rng) == Choice::Explore)
            .count();
        assert!((2700..3300).contains(&explored), "explored {explored} of 10000");
    }

    #[test]
    fn epsilon_follows_schedule() {
        let policy = EpsilonGreedy::new(decay::Linear::new(0.1, 1.0, 0.0).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert!((policy.epsilon(5) - 0.5).abs() < 1e-6);
        assert_eq!(policy.epsilon(20), 0.0, "floored at zero");
    }
}
