//! Value stores: exact or approximate estimates of Q(state, action)

use rand::{seq::SliceRandom, Rng};

use crate::util::argmax_all;

mod linear;
mod q_table;

pub use linear::LinearQ;
pub use q_table::QTable;

/// Holds action-value estimates and moves them toward sampled targets
///
/// The provided methods take the legal actions of the queried state explicitly; an empty
/// slice denotes a terminal state, whose value is `0.0` whatever the store holds.
pub trait ValueStore<S, A> {
    /// The current estimate of Q(`state`, `action`); unseen pairs are `0.0`
    fn q_value(&self, state: &S, action: &A) -> f64;

    /// Move Q(`state`, `action`) toward `target` with step size `alpha`
    fn update(&mut self, state: &S, action: &A, target: f64, alpha: f64);

    /// max<sub>a</sub> Q(`state`, a) over `actions`, or `0.0` if there are none
    fn best_value(&self, state: &S, actions: &[A]) -> f64 {
        actions
            .iter()
            .map(|a| self.q_value(state, a))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// An action achieving [`best_value`](Self::best_value), ties broken uniformly at random
    fn best_action<R>(&self, state: &S, actions: &[A], rng: &mut R) -> Option<A>
    where
        A: Clone,
        R: Rng + ?Sized,
    {
        let values: Vec<f64> = actions.iter().map(|a| self.q_value(state, a)).collect();
        argmax_all(&values)
            .choose(rng)
            .map(|&i| actions[i].clone())
    }

    /// The first action, in the order given, achieving [`best_value`](Self::best_value)
    ///
    /// Deterministic and free of side effects, for introspection.
    fn first_best_action(&self, state: &S, actions: &[A]) -> Option<A>
    where
        A: Clone,
    {
        let values: Vec<f64> = actions.iter().map(|a| self.q_value(state, a)).collect();
        argmax_all(&values).first().map(|&i| actions[i].clone())
    }
}
