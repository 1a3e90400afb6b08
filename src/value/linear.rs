use std::marker::PhantomData;

use crate::{
    ds::SparseMap,
    features::FeatureExtractor,
};

use super::ValueStore;

/// Linear function approximation: Q(s,a) = Σ<sub>f</sub> w<sub>f</sub> · φ<sub>f</sub>(s,a)
///
/// Only the features present in φ(s,a) are visited, both when evaluating and when updating.
/// Weights of unseen features are `0.0`; the weight vector grows as new features appear.
pub struct LinearQ<S, A, X: FeatureExtractor<S, A>> {
    extractor: X,
    weights: SparseMap<X::Feature>,
    _marker: PhantomData<fn(&S, &A)>,
}

impl<S, A, X: FeatureExtractor<S, A>> LinearQ<S, A, X> {
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
            weights: SparseMap::new(),
            _marker: PhantomData,
        }
    }

    pub fn weights(&self) -> &SparseMap<X::Feature> {
        &self.weights
    }

    pub fn extractor(&self) -> &X {
        &self.extractor
    }
}

impl<S, A, X: FeatureExtractor<S, A>> ValueStore<S, A> for LinearQ<S, A, X> {
    fn q_value(&self, state: &S, action: &A) -> f64 {
        self.extractor.features(state, action).dot(&self.weights)
    }

    /// w<sub>f</sub> ← w<sub>f</sub> + α · (target − Q(s,a)) · φ<sub>f</sub>(s,a) for every f in φ(s,a)
    fn update(&mut self, state: &S, action: &A, target: f64, alpha: f64) {
        let features = self.extractor.features(state, action);
        let diff = target - features.dot(&self.weights);
        for (feature, value) in &features {
            self.weights.add(feature.clone(), alpha * diff * value);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        features::{CoordinateExtractor, CoordinateFeature, IdentityExtractor},
        grid::Pos,
        value::QTable,
    };

    use super::*;

    #[test]
    fn linear_q_gradient_step() {
        let mut q = LinearQ::new(CoordinateExtractor::<Pos, char>::new());
        q.update(&(1, 2), &'n', 8.0, 0.5);

        // four unit features share the error of 8.0
        for feature in [
            CoordinateFeature::State((1, 2)),
            CoordinateFeature::X(1),
            CoordinateFeature::Y(2),
            CoordinateFeature::Action('n'),
        ] {
            assert_eq!(q.weights().get(&feature), 4.0, "{feature:?}");
        }
        assert_eq!(q.q_value(&(1, 2), &'n'), 16.0);
        assert_eq!(q.q_value(&(1, 5), &'s'), 4.0, "generalizes through the x feature");
    }

    #[test]
    fn linear_q_sparse_update_isolation() {
        let mut q = LinearQ::new(CoordinateExtractor::<Pos, char>::new());
        q.update(&(1, 1), &'n', 4.0, 0.5);
        let before = q.weights().clone();

        q.update(&(2, 2), &'s', -3.0, 0.5);
        for (feature, weight) in &before {
            assert_eq!(q.weights().get(feature), *weight, "{feature:?} untouched");
        }
        assert_eq!(q.weights().len(), 8, "new features added, none removed");
    }

    #[test]
    fn linear_q_identity_matches_table() {
        let mut linear = LinearQ::new(IdentityExtractor::<u32, char>::new());
        let mut table = QTable::new();
        let targets = [(0, 'a', 3.0), (0, 'a', -1.5), (1, 'b', 0.7), (0, 'a', 2.25)];
        for (s, a, target) in targets {
            linear.update(&s, &a, target, 0.3);
            table.update(&s, &a, target, 0.3);
            assert_eq!(linear.q_value(&s, &a), table.q_value(&s, &a));
        }
        assert_eq!(linear.weights().len(), table.entries().len());
    }
}
