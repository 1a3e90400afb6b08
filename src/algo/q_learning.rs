use log::{debug, info, trace};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    agent::{Agent, EpisodeStats, Phase},
    assert_interval,
    decay::{self, Decay},
    ds::SparseMap,
    env::Environment,
    error::{Error, Result},
    exp::Exp,
    exploration::{Choice, EpsilonGreedy},
    features::FeatureExtractor,
    value::{LinearQ, QTable, ValueStore},
};

/// Configuration for the [`QAgent`]
pub struct QAgentConfig<D: Decay> {
    /// Exploration policy, evaluated at the number of completed episodes
    ///
    /// **Default**: a constant epsilon of `0.5`
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate, in `(0, 1]`
    ///
    /// **Default**: `0.5`
    pub alpha: f64,
    /// Discount factor, in `[0, 1]`
    ///
    /// **Default**: `1.0`
    pub gamma: f64,
    /// Number of leading episodes during which transitions update the value store
    ///
    /// **Default**: `100`
    pub num_training: u32,
    /// Seed for exploration and tie-breaking; `None` seeds from the OS
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
    /// Log a progress report every this many episodes; `0` disables it
    ///
    /// **Default**: `100`
    pub report_interval: u32,
}

impl Default for QAgentConfig<decay::Constant> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.5),
            alpha: 0.5,
            gamma: 1.0,
            num_training: 100,
            seed: None,
            report_interval: 100,
        }
    }
}

impl QAgentConfig<decay::Constant> {
    /// Conservative exploration and a short horizon, suited to grid worlds with many steps
    /// per episode. Training length is left to the harness.
    pub fn pacman() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.05),
            alpha: 0.2,
            gamma: 0.8,
            num_training: 0,
            ..Self::default()
        }
    }
}

/// A one-step, off-policy Q-learning agent over any [`ValueStore`]
///
/// On each transition (s, a, r, s') the estimate of Q(s, a) moves toward
/// r + γ · max<sub>a'</sub> Q(s', a'), where the max is read from the store before the update
/// and is `0.0` when s' is terminal.
///
/// ### Generics
/// - `E` - The [`Environment`] supplying the legal actions of each state
/// - `V` - The value store: a [`QTable`] for exact values or a [`LinearQ`] for approximate ones
/// - `D` - The decay strategy of the exploration rate
pub struct QAgent<E, V, D = decay::Constant>
where
    E: Environment,
    V: ValueStore<E::State, E::Action>,
    D: Decay,
{
    store: V,
    exploration: EpsilonGreedy<D>,
    alpha: f64, // learning rate
    gamma: f64, // discount factor
    rng: StdRng,
    stats: EpisodeStats,
    report_interval: u32,
    last: Option<(E::State, E::Action)>,
}

/// A [`QAgent`] with exact, tabular values
pub type QTableAgent<E, D = decay::Constant> =
    QAgent<E, QTable<<E as Environment>::State, <E as Environment>::Action>, D>;

/// A [`QAgent`] with values linear in the features produced by `X`
pub type ApproximateQAgent<E, X, D = decay::Constant> =
    QAgent<E, LinearQ<<E as Environment>::State, <E as Environment>::Action, X>, D>;

impl<E, V, D> QAgent<E, V, D>
where
    E: Environment,
    V: ValueStore<E::State, E::Action>,
    D: Decay,
{
    /// Initialize a new `QAgent` around an empty value store
    ///
    /// **Panics** if `alpha` is not in the interval `(0,1]` or `gamma` is not in `[0,1]`
    pub fn new(config: QAgentConfig<D>, store: V) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert!(config.alpha > 0.0, "Invalid value for `config.alpha`. Must be positive.");
        assert_interval!(config.gamma, 0.0, 1.0);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            rng,
            stats: EpisodeStats::new(config.num_training),
            report_interval: config.report_interval,
            last: None,
        }
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// The exploration rate for the current episode
    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon(self.stats.episodes_so_far)
    }

    /// Replace the exploration policy, e.g. to stop exploring once evaluation begins
    pub fn set_exploration(&mut self, exploration: EpsilonGreedy<D>) {
        self.exploration = exploration;
    }

    /// The current estimate of Q(`state`, `action`)
    ///
    /// Fails if `action` is not legal in `state`.
    pub fn q_value(&self, env: &E, state: &E::State, action: &E::Action) -> Result<f64> {
        if !env.actions(state).contains(action) {
            return Err(Error::illegal_action(state, action));
        }
        Ok(self.store.q_value(state, action))
    }

    /// Report that the action last chosen by [`act`](Agent::act) led to `state` with `reward`
    ///
    /// Does nothing if no action has been chosen since the last observation.
    pub fn observe(&mut self, env: &E, state: &E::State, reward: f64) -> Result<()> {
        match self.last.take() {
            Some((last_state, last_action)) => {
                self.learn(env, Exp::new(last_state, last_action, state.clone(), reward))
            }
            None => Ok(()),
        }
    }

    /// Observe the final transition of an episode into `state`, then close the episode
    pub fn end_episode(&mut self, env: &E, state: &E::State, reward: f64) -> Result<()> {
        self.observe(env, state, reward)?;
        self.stop_episode();
        Ok(())
    }

    fn report(&mut self) {
        let stats = &self.stats;
        let n = stats.episodes_so_far;
        if stats.is_in_training() {
            info!(
                "completed {n} of {} training episodes, average training reward {:.2}",
                stats.num_training,
                stats.average_train_rewards()
            );
        } else {
            info!(
                "completed {} evaluation episodes, average evaluation reward {:.2}",
                n - stats.num_training,
                stats.average_test_rewards()
            );
        }
        info!(
            "average reward over the last {} episodes {:.2}",
            self.report_interval,
            stats.window_rewards / self.report_interval as f64
        );
        self.stats.window_rewards = 0.0;
    }
}

impl<E, D> QAgent<E, QTable<E::State, E::Action>, D>
where
    E: Environment,
    D: Decay,
{
    /// Initialize a tabular agent with every Q value at `0.0`
    pub fn tabular(config: QAgentConfig<D>) -> Self {
        Self::new(config, QTable::new())
    }

    pub fn q_table(&self) -> &QTable<E::State, E::Action> {
        &self.store
    }
}

impl<E, X, D> QAgent<E, LinearQ<E::State, E::Action, X>, D>
where
    E: Environment,
    X: FeatureExtractor<E::State, E::Action>,
    D: Decay,
{
    /// Initialize an approximate agent with every weight at `0.0`
    pub fn approximate(config: QAgentConfig<D>, extractor: X) -> Self {
        Self::new(config, LinearQ::new(extractor))
    }

    pub fn weights(&self) -> &SparseMap<X::Feature> {
        self.store.weights()
    }
}

impl<E, V, D> Agent<E> for QAgent<E, V, D>
where
    E: Environment,
    V: ValueStore<E::State, E::Action>,
    D: Decay,
{
    fn act(&mut self, env: &E, state: &E::State) -> Result<Option<E::Action>> {
        let actions = env.actions(state);
        if actions.is_empty() {
            return Ok(None);
        }

        let choice = self.exploration.choose(self.stats.episodes_so_far, &mut self.rng)?;
        let action = match choice {
            Choice::Explore => actions.choose(&mut self.rng).cloned(),
            Choice::Exploit => self.store.best_action(state, &actions, &mut self.rng),
        };
        debug!("{choice:?} in {state:?}: {action:?}");

        if let Some(action) = &action {
            self.last = Some((state.clone(), action.clone()));
            self.stats.episode_steps += 1;
        }
        Ok(action)
    }

    fn learn(&mut self, env: &E, exp: Exp<E>) -> Result<()> {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = exp;

        if !env.actions(&state).contains(&action) {
            return Err(Error::illegal_action(&state, &action));
        }
        self.stats.episode_rewards += reward;

        if !self.stats.is_in_training() {
            trace!("evaluation phase, not updating {state:?} {action:?}");
            return Ok(());
        }

        let next_value = self.store.best_value(&next_state, &env.actions(&next_state));
        let target = reward + self.gamma * next_value;
        self.store.update(&state, &action, target, self.alpha);
        trace!(
            "Q({state:?}, {action:?}) -> {} (target {target})",
            self.store.q_value(&state, &action)
        );
        Ok(())
    }

    fn policy(&self, env: &E, state: &E::State) -> Option<E::Action> {
        self.store.first_best_action(state, &env.actions(state))
    }

    fn value(&self, env: &E, state: &E::State) -> f64 {
        self.store.best_value(state, &env.actions(state))
    }

    fn start_episode(&mut self) {
        self.last = None;
        self.stats.start();
    }

    fn stop_episode(&mut self) {
        let was_training = self.stats.is_in_training();
        let reward = self.stats.episode_rewards;
        let steps = self.stats.episode_steps;
        self.stats.stop();
        self.last = None;

        let n = self.stats.episodes_so_far;
        debug!("episode {n} finished after {steps} steps with reward {reward:.2}");
        if was_training && !self.stats.is_in_training() {
            info!(
                "training complete after {n} episodes, average training reward {:.2}",
                self.stats.average_train_rewards()
            );
        }
        if self.report_interval > 0 && n % self.report_interval == 0 {
            self.report();
        }
    }

    fn phase(&self) -> Phase {
        self.stats.phase()
    }
}
