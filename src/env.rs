use std::{fmt::Debug, hash::Hash};

use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::error::{Error, Result};

/// A trait for state and action types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Hashable: Clone + Eq + Hash + Debug {}

impl<T> Hashable for T where T: Clone + Eq + Hash + Debug {}

/// The part of an environment an agent needs to learn in it: the legal actions of a state
///
/// States and actions are opaque to the agent. An empty action set marks a terminal state,
/// whose value is exactly `0.0`.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Hashable;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Hashable;

    /// Get the legal actions for `state`, or an empty vector if `state` is terminal
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Determine if `state` is terminal
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.actions(state).is_empty()
    }
}

/// Represents a Markov decision process with a known model, defining the dynamics of an
/// environment in which an agent can operate.
///
/// This represents the common case of a discrete-time MDP with one agent and a finite state
/// space and action space.
pub trait MarkovDecisionProcess {
    type State: Hashable;
    type Action: Hashable;

    /// Every state of the process
    fn states(&self) -> Vec<Self::State>;

    fn start_state(&self) -> Self::State;

    /// Actions available in `state`, ignoring whether it is terminal
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor states of taking `action` in `state` paired with their probabilities
    fn transitions(&self, state: &Self::State, action: &Self::Action) -> Vec<(Self::State, f64)>;

    /// Reward of the transition `state --action--> next_state`
    fn reward(&self, state: &Self::State, action: &Self::Action, next_state: &Self::State) -> f64;

    fn is_terminal(&self, state: &Self::State) -> bool;
}

/// Adapts a [`MarkovDecisionProcess`] into an [`Environment`]
///
/// Terminal states of the process have no legal actions.
#[derive(Debug, Clone)]
pub struct MdpEnv<M> {
    mdp: M,
}

impl<M: MarkovDecisionProcess> MdpEnv<M> {
    pub fn new(mdp: M) -> Self {
        Self { mdp }
    }

    pub fn mdp(&self) -> &M {
        &self.mdp
    }

    /// Sample a successor of taking `action` in `state` from the model
    ///
    /// **Returns** `(next_state, reward)`
    pub fn sample<R: Rng + ?Sized>(
        &self,
        state: &M::State,
        action: &M::Action,
        rng: &mut R,
    ) -> Result<(M::State, f64)> {
        let mut transitions = self.mdp.transitions(state, action);
        let dist = WeightedIndex::new(transitions.iter().map(|(_, p)| *p)).map_err(|_| {
            Error::InvalidTransitionModel {
                state: format!("{state:?}"),
                action: format!("{action:?}"),
            }
        })?;
        let next_state = transitions.swap_remove(dist.sample(rng)).0;
        let reward = self.mdp.reward(state, action, &next_state);
        Ok((next_state, reward))
    }
}

impl<M: MarkovDecisionProcess> Environment for MdpEnv<M> {
    type State = M::State;
    type Action = M::Action;

    fn actions(&self, state: &Self::State) -> Vec<Self::Action> {
        if self.mdp.is_terminal(state) {
            Vec::new()
        } else {
            self.mdp.possible_actions(state)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// Environment with a fixed table of legal actions; unlisted states are terminal
    pub(crate) struct MockEnv {
        actions: HashMap<u32, Vec<char>>,
    }

    impl MockEnv {
        pub(crate) fn new(table: &[(u32, &[char])]) -> Self {
            Self {
                actions: table.iter().map(|&(s, a)| (s, a.to_vec())).collect(),
            }
        }
    }

    impl Environment for MockEnv {
        type State = u32;
        type Action = char;

        fn actions(&self, state: &Self::State) -> Vec<Self::Action> {
            self.actions.get(state).cloned().unwrap_or_default()
        }
    }

    /// Corridor `0 - 1 - ... - len`; `len` is terminal and entering it pays `10.0`
    ///
    /// Moves succeed with probability `1 - slip` and otherwise leave the agent in place.
    pub(crate) struct Corridor {
        pub(crate) len: u32,
        pub(crate) slip: f64,
    }

    impl MarkovDecisionProcess for Corridor {
        type State = u32;
        type Action = char;

        fn states(&self) -> Vec<u32> {
            (0..=self.len).collect()
        }

        fn start_state(&self) -> u32 {
            0
        }

        fn possible_actions(&self, _state: &u32) -> Vec<char> {
            vec!['<', '>']
        }

        fn transitions(&self, state: &u32, action: &char) -> Vec<(u32, f64)> {
            let target = match action {
                '<' => state.saturating_sub(1),
                _ => (state + 1).min(self.len),
            };
            vec![(target, 1.0 - self.slip), (*state, self.slip)]
        }

        fn reward(&self, state: &u32, _action: &char, next_state: &u32) -> f64 {
            if *next_state == self.len && *state != self.len {
                10.0
            } else {
                0.0
            }
        }

        fn is_terminal(&self, state: &u32) -> bool {
            *state == self.len
        }
    }

    #[test]
    fn mock_env_terminal_states() {
        let env = MockEnv::new(&[(0, &['a', 'b'])]);
        assert_eq!(env.actions(&0), ['a', 'b']);
        assert!(!env.is_terminal(&0));
        assert!(env.is_terminal(&1), "unlisted states are terminal");
    }

    #[test]
    fn mdp_env_hides_actions_of_terminal_states() {
        let env = MdpEnv::new(Corridor { len: 3, slip: 0.0 });
        assert_eq!(env.actions(&0), ['<', '>']);
        assert!(env.actions(&3).is_empty(), "terminal state has no legal actions");
        assert_eq!(env.mdp().states(), [0, 1, 2, 3]);
        assert_eq!(env.mdp().start_state(), 0);
    }

    #[test]
    fn mdp_env_sample_functional() {
        let mut rng = StdRng::seed_from_u64(7);
        let env = MdpEnv::new(Corridor { len: 2, slip: 0.0 });
        assert_eq!(env.sample(&0, &'>', &mut rng), Ok((1, 0.0)));
        assert_eq!(env.sample(&1, &'>', &mut rng), Ok((2, 10.0)), "entering the end pays");
        assert_eq!(env.sample(&0, &'<', &mut rng), Ok((0, 0.0)));

        let broken = MdpEnv::new(Corridor { len: 2, slip: 2.0 });
        assert!(matches!(
            broken.sample(&0, &'>', &mut rng),
            Err(Error::InvalidTransitionModel { .. })
        ));
    }
}
