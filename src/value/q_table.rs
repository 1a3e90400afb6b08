use crate::{ds::SparseMap, env::Hashable};

use super::ValueStore;

/// Exact action values, one entry per visited (state, action) pair
#[derive(Debug, Clone)]
pub struct QTable<S: Hashable, A: Hashable> {
    table: SparseMap<(S, A)>,
}

impl<S: Hashable, A: Hashable> Default for QTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hashable, A: Hashable> QTable<S, A> {
    pub fn new() -> Self {
        Self {
            table: SparseMap::new(),
        }
    }

    pub fn entries(&self) -> &SparseMap<(S, A)> {
        &self.table
    }
}

impl<S: Hashable, A: Hashable> ValueStore<S, A> for QTable<S, A> {
    fn q_value(&self, state: &S, action: &A) -> f64 {
        self.table.get(&(state.clone(), action.clone()))
    }

    /// Q(s,a) ← Q(s,a) + α(target − Q(s,a)), i.e. (1 − α)Q(s,a) + α·target
    fn update(&mut self, state: &S, action: &A, target: f64, alpha: f64) {
        let q_value = self.q_value(state, action);
        self.table
            .set((state.clone(), action.clone()), q_value + alpha * (target - q_value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_table_update_rule() {
        let mut table = QTable::new();
        assert_eq!(table.q_value(&0u32, &'a'), 0.0, "unseen pairs are zero");

        table.update(&0, &'a', 10.0, 0.5);
        assert_eq!(table.q_value(&0, &'a'), 5.0);
        table.update(&0, &'a', 10.0, 0.5);
        assert_eq!(table.q_value(&0, &'a'), 7.5);
        assert_eq!(table.q_value(&0, &'b'), 0.0, "other actions untouched");
        assert_eq!(table.entries().len(), 1);
    }

    #[test]
    fn q_table_terminal_value_ignores_entries() {
        let mut table = QTable::new();
        table.update(&9u32, &'a', 100.0, 1.0);
        assert_eq!(table.q_value(&9, &'a'), 100.0);
        assert_eq!(table.best_value(&9, &[]), 0.0, "no legal actions means value zero");
    }

    #[test]
    fn q_table_full_step_replaces_estimate() {
        let mut table = QTable::new();
        table.update(&0u32, &'a', 3.0, 1.0);
        table.update(&0, &'a', -2.0, 1.0);
        assert_eq!(table.q_value(&0, &'a'), -2.0);
    }
}
