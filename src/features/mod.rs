//! Feature extraction: mapping a (state, action) pair to a sparse vector of named signals

use std::marker::PhantomData;

use crate::{
    ds::SparseMap,
    env::Hashable,
    grid::{Pos, Position},
};

mod pacman;

pub use pacman::{AdvancedConfig, AdvancedExtractor, PacmanFeature, SimpleExtractor};

/// Sparse mapping from feature name to value; absent features are `0.0`
pub type FeatureVector<F> = SparseMap<F>;

/// Describes a (state, action) pair by named real-valued signals
///
/// Implementations must be pure: the same inputs always give the same vector, and the state
/// is never mutated. Vectors are built fresh on every call.
pub trait FeatureExtractor<S, A> {
    /// Feature name
    type Feature: Hashable;

    fn features(&self, state: &S, action: &A) -> FeatureVector<Self::Feature>;
}

/// One indicator feature per (state, action) pair
///
/// A linear approximator over these features is exactly a Q-table.
pub struct IdentityExtractor<S, A> {
    _marker: PhantomData<fn(&S, &A)>,
}

impl<S, A> IdentityExtractor<S, A> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<S, A> Default for IdentityExtractor<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hashable, A: Hashable> FeatureExtractor<S, A> for IdentityExtractor<S, A> {
    type Feature = (S, A);

    fn features(&self, state: &S, action: &A) -> FeatureVector<(S, A)> {
        FeatureVector::from_iter([((state.clone(), action.clone()), 1.0)])
    }
}

/// Feature names emitted by the [`CoordinateExtractor`]
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum CoordinateFeature<S, A> {
    State(S),
    X(i32),
    Y(i32),
    Action(A),
}

/// Indicators for the state, each of its coordinates and the action, independently
///
/// Deliberately weak: it cannot represent interactions between position and action.
pub struct CoordinateExtractor<S, A> {
    _marker: PhantomData<fn(&S, &A)>,
}

impl<S, A> CoordinateExtractor<S, A> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<S, A> Default for CoordinateExtractor<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> FeatureExtractor<S, A> for CoordinateExtractor<S, A>
where
    S: Hashable + Position,
    A: Hashable,
{
    type Feature = CoordinateFeature<S, A>;

    fn features(&self, state: &S, action: &A) -> FeatureVector<Self::Feature> {
        let (x, y): Pos = state.position();
        FeatureVector::from_iter([
            (CoordinateFeature::State(state.clone()), 1.0),
            (CoordinateFeature::X(x), 1.0),
            (CoordinateFeature::Y(y), 1.0),
            (CoordinateFeature::Action(action.clone()), 1.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_extractor_single_indicator() {
        let extractor = IdentityExtractor::<u32, char>::new();
        let features = extractor.features(&3u32, &'a');
        assert_eq!(features.len(), 1);
        assert_eq!(features.get(&(3, 'a')), 1.0);
        assert_eq!(features.get(&(3, 'b')), 0.0);
    }

    #[test]
    fn coordinate_extractor_functional() {
        let extractor = CoordinateExtractor::<Pos, char>::new();
        let features = extractor.features(&(2, 5), &'n');
        assert_eq!(features.len(), 4);
        for feature in [
            CoordinateFeature::State((2, 5)),
            CoordinateFeature::X(2),
            CoordinateFeature::Y(5),
            CoordinateFeature::Action('n'),
        ] {
            assert_eq!(features.get(&feature), 1.0, "{feature:?} present");
        }
    }

    #[test]
    fn coordinate_extractor_shares_features_across_states() {
        let extractor = CoordinateExtractor::<Pos, char>::new();
        let a = extractor.features(&(1, 1), &'n');
        let b = extractor.features(&(1, 4), &'s');
        assert!(b.contains_key(&CoordinateFeature::X(1)), "same column, same x feature");
        assert_eq!(a.dot(&b), 1.0, "only the x feature is shared");
    }
}
