use crate::{env::Environment, error::Result, exp::Exp};

/// Which part of its lifecycle an agent is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No episode has been started yet
    NotStarted,
    /// Fewer episodes than configured for training have completed; transitions update values
    Training,
    /// Training is over; transitions only count toward the reward totals
    Evaluation,
}

/// The per-step and per-episode contract between a learning agent and the harness driving it
pub trait Agent<E: Environment> {
    /// Choose an action for `state`, or `None` if it is terminal
    fn act(&mut self, env: &E, state: &E::State) -> Result<Option<E::Action>>;

    /// Learn from a realized transition
    ///
    /// Fails if the action is not legal in the transition's starting state.
    fn learn(&mut self, env: &E, exp: Exp<E>) -> Result<()>;

    /// The greedy action for `state`, without side effects
    fn policy(&self, env: &E, state: &E::State) -> Option<E::Action>;

    /// The estimated value of `state`: its best action value, or `0.0` if terminal
    fn value(&self, env: &E, state: &E::State) -> f64;

    fn start_episode(&mut self);

    fn stop_episode(&mut self);

    fn phase(&self) -> Phase;
}

/// Episode counters and reward totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    /// Episodes completed so far, training and evaluation alike
    pub episodes_so_far: u32,
    /// Number of leading episodes used for training
    pub num_training: u32,
    /// Reward collected in the current episode
    pub episode_rewards: f64,
    /// Actions taken in the current episode
    pub episode_steps: u32,
    /// Total reward over all completed training episodes
    pub accum_train_rewards: f64,
    /// Total reward over all completed evaluation episodes
    pub accum_test_rewards: f64,
    /// Total reward since the last periodic report
    pub window_rewards: f64,
    started: bool,
}

impl EpisodeStats {
    pub fn new(num_training: u32) -> Self {
        Self {
            num_training,
            ..Self::default()
        }
    }

    pub fn is_in_training(&self) -> bool {
        self.episodes_so_far < self.num_training
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::NotStarted
        } else if self.is_in_training() {
            Phase::Training
        } else {
            Phase::Evaluation
        }
    }

    pub(crate) fn start(&mut self) {
        self.started = true;
        self.episode_rewards = 0.0;
        self.episode_steps = 0;
    }

    /// Close the current episode and fold its reward into the totals
    pub(crate) fn stop(&mut self) {
        if self.is_in_training() {
            self.accum_train_rewards += self.episode_rewards;
        } else {
            self.accum_test_rewards += self.episode_rewards;
        }
        self.window_rewards += self.episode_rewards;
        self.episodes_so_far += 1;
        self.episode_rewards = 0.0;
        self.episode_steps = 0;
    }

    pub fn average_train_rewards(&self) -> f64 {
        let n = self.episodes_so_far.min(self.num_training);
        if n == 0 {
            0.0
        } else {
            self.accum_train_rewards / n as f64
        }
    }

    pub fn average_test_rewards(&self) -> f64 {
        let n = self.episodes_so_far.saturating_sub(self.num_training);
        if n == 0 {
            0.0
        } else {
            self.accum_test_rewards / n as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_stats_lifecycle() {
        let mut stats = EpisodeStats::new(2);
        assert_eq!(stats.phase(), Phase::NotStarted);

        for reward in [1.0, 3.0] {
            stats.start();
            assert_eq!(stats.phase(), Phase::Training);
            stats.episode_rewards += reward;
            stats.stop();
        }
        assert_eq!(stats.phase(), Phase::Evaluation);
        assert_eq!(stats.average_train_rewards(), 2.0);
        assert_eq!(stats.average_test_rewards(), 0.0, "no evaluation episodes yet");

        stats.start();
        stats.episode_rewards += 10.0;
        stats.stop();
        assert_eq!(stats.accum_test_rewards, 10.0);
        assert_eq!(stats.average_test_rewards(), 10.0);
        assert_eq!(stats.window_rewards, 14.0);
        assert_eq!(stats.episodes_so_far, 3);
    }

    #[test]
    fn episode_stats_without_training() {
        let mut stats = EpisodeStats::new(0);
        assert!(!stats.is_in_training());
        stats.start();
        assert_eq!(stats.phase(), Phase::Evaluation);
    }
}
