use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::{
    decay::{self, Decay},
    error::{Error, Result},
};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
///
/// Each decision is a Bernoulli(ε) trial drawn from the caller's generator: success means
/// explore, failure means exploit.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration rate at episode `episode`
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode as f64)
    }

    /// Invoke epsilon greedy policy for the given episode
    ///
    /// Fails if the schedule yields a rate outside `[0, 1]`.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Result<Choice> {
        let epsilon = self.epsilon(episode);
        let trial = Bernoulli::new(epsilon).map_err(|_| Error::InvalidProbability(epsilon))?;
        Ok(if trial.sample(rng) {
            Choice::Explore
        } else {
            Choice::Exploit
        })
    }
}

impl EpsilonGreedy<decay::Constant> {
    /// Explore with a fixed probability `epsilon`
    pub fn constant(epsilon: f64) -> Self {
        Self::new(decay::Constant::new(epsilon))
    }

    /// Never explore
    pub fn greedy() -> Self {
        Self::constant(0.0)
    }
}
