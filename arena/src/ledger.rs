use std::collections::BTreeMap;

/// Identity of a genome within a population
pub type GenomeId = u64;

/// Fitness totals for one generation.
///
/// Entries are created explicitly by the driver; a genome that never entered a
/// pairing has no entry at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitnessLedger {
    totals: BTreeMap<GenomeId, f32>,
}

impl FitnessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a genome's total over at zero
    pub fn reset(&mut self, id: GenomeId) {
        self.totals.insert(id, 0.0);
    }

    /// Give a genome a zero total unless it already has one
    pub fn ensure(&mut self, id: GenomeId) {
        self.totals.entry(id).or_insert(0.0);
    }

    /// Add to a genome's total
    pub fn credit(&mut self, id: GenomeId, amount: f32) {
        *self.totals.entry(id).or_insert(0.0) += amount;
    }

    pub fn get(&self, id: GenomeId) -> Option<f32> {
        self.totals.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GenomeId, f32)> + '_ {
        self.totals.iter().map(|(id, fitness)| (*id, *fitness))
    }

    /// Highest total; the lowest id wins ties
    pub fn best(&self) -> Option<(GenomeId, f32)> {
        self.iter().fold(None, |best, (id, fitness)| match best {
            Some((_, top)) if top >= fitness => best,
            _ => Some((id, fitness)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_overwrites_and_ensure_does_not() {
        let mut ledger = FitnessLedger::new();
        ledger.credit(1, 5.0);
        ledger.ensure(1);
        assert_eq!(ledger.get(1), Some(5.0), "ensure keeps an existing total");

        ledger.reset(1);
        assert_eq!(ledger.get(1), Some(0.0), "reset starts over");

        ledger.ensure(2);
        assert_eq!(ledger.get(2), Some(0.0));
        assert_eq!(ledger.get(3), None);
    }

    #[test]
    fn test_credit_is_additive_and_order_independent() {
        let mut ab_then_ac = FitnessLedger::new();
        ab_then_ac.reset(1);
        ab_then_ac.credit(1, 3.0);
        ab_then_ac.credit(1, 7.0);

        let mut ac_then_ab = FitnessLedger::new();
        ac_then_ab.reset(1);
        ac_then_ab.credit(1, 7.0);
        ac_then_ab.credit(1, 3.0);

        assert_eq!(ab_then_ac.get(1), Some(10.0));
        assert_eq!(ab_then_ac, ac_then_ab);
    }

    #[test]
    fn test_best_prefers_lowest_id_on_ties() {
        let mut ledger = FitnessLedger::new();
        assert_eq!(ledger.best(), None);
        ledger.credit(4, 2.0);
        ledger.credit(2, 9.0);
        ledger.credit(7, 9.0);
        assert_eq!(ledger.best(), Some((2, 9.0)));
        assert_eq!(ledger.len(), 3);
    }
}
