// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Troves

use serde::{Deserialize, Serialize};

// ─── Trove ──────────────────────────────────────────────────────────────────

/// One collateralized debt position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trove {
    /// Units of collateral held.
    pub collateral: f64,
    /// Outstanding issued-asset balance.
    pub debt: f64,
    /// Target collateral ratio drawn at open.
    pub initial_ratio: f64,
    /// Relative tolerance before the owner reacts to ratio drift.
    pub inattention: f64,
    /// Step the trove was opened at.
    pub opened_at: u64,
}

impl Trove {
    /// Trove sized so that `price * collateral / debt == ratio`.
    pub fn with_ratio(collateral: f64, ratio: f64, inattention: f64, price: f64, opened_at: u64) -> Self {
        Self {
            collateral,
            debt: price * collateral / ratio,
            initial_ratio: ratio,
            inattention,
            opened_at,
        }
    }

    /// Current collateral ratio at `price`. Debt-free troves are infinitely safe.
    pub fn collateral_ratio(&self, price: f64) -> f64 {
        if self.debt == 0.0 {
            return f64::INFINITY;
        }
        price * self.collateral / self.debt
    }

    /// Signed drift from target, measured in units of the owner's tolerance.
    pub fn deviation(&self, price: f64) -> f64 {
        (self.collateral_ratio(price) - self.initial_ratio) / (self.initial_ratio * self.inattention)
    }

    pub fn view(&self, price: f64) -> TroveView {
        TroveView {
            collateral: self.collateral,
            debt: self.debt,
            initial_ratio: self.initial_ratio,
            current_ratio: self.collateral_ratio(price),
            inattention: self.inattention,
            opened_at: self.opened_at,
        }
    }
}

/// Trove with its ratio evaluated at a given price, for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TroveView {
    pub collateral: f64,
    pub debt: f64,
    pub initial_ratio: f64,
    pub current_ratio: f64,
    pub inattention: f64,
    pub opened_at: u64,
}

// ─── TrovePopulation ────────────────────────────────────────────────────────

/// All open troves plus the collateral price they are valued at.
///
/// The price is stored once for the whole population; ratios are always
/// derived from it, so no trove can carry a stale ratio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrovePopulation {
    troves: Vec<Trove>,
    collateral_price: f64,
}

impl TrovePopulation {
    pub fn new(collateral_price: f64) -> Self {
        Self { troves: Vec::with_capacity(1024), collateral_price }
    }

    pub fn from_troves(troves: Vec<Trove>, collateral_price: f64) -> Self {
        Self { troves, collateral_price }
    }

    pub fn collateral_price(&self) -> f64 {
        self.collateral_price
    }

    pub fn set_collateral_price(&mut self, price: f64) {
        self.collateral_price = price;
    }

    pub fn len(&self) -> usize {
        self.troves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.troves.is_empty()
    }

    pub fn troves(&self) -> &[Trove] {
        &self.troves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trove> {
        self.troves.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Trove> {
        self.troves.iter_mut()
    }

    pub fn get(&self, idx: usize) -> Option<&Trove> {
        self.troves.get(idx)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Trove> {
        self.troves.get_mut(idx)
    }

    pub fn push(&mut self, trove: Trove) {
        self.troves.push(trove);
    }

    pub fn ratio_of(&self, trove: &Trove) -> f64 {
        trove.collateral_ratio(self.collateral_price)
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.troves.iter().map(|t| self.ratio_of(t)).collect()
    }

    pub fn total_debt(&self) -> f64 {
        self.troves.iter().map(|t| t.debt).sum()
    }

    pub fn total_collateral(&self) -> f64 {
        self.troves.iter().map(|t| t.collateral).sum()
    }

    /// Remove every trove whose ratio satisfies `pred`, keeping the order of
    /// the survivors. Returns the removed troves in their original order.
    pub(crate) fn extract_where(&mut self, pred: impl Fn(f64) -> bool) -> Vec<Trove> {
        let price = self.collateral_price;
        let (removed, kept): (Vec<Trove>, Vec<Trove>) = std::mem::take(&mut self.troves)
            .into_iter()
            .partition(|t| pred(t.collateral_ratio(price)));
        self.troves = kept;
        removed
    }

    /// Remove the troves at `indices` (any order, duplicates ignored),
    /// keeping the order of the survivors.
    pub(crate) fn remove_indices(&mut self, indices: &[usize]) -> Vec<Trove> {
        let mut doomed = vec![false; self.troves.len()];
        for &i in indices {
            if let Some(flag) = doomed.get_mut(i) {
                *flag = true;
            }
        }
        let mut removed = Vec::with_capacity(indices.len());
        let mut kept = Vec::with_capacity(self.troves.len().saturating_sub(indices.len()));
        for (trove, gone) in std::mem::take(&mut self.troves).into_iter().zip(doomed) {
            if gone {
                removed.push(trove);
            } else {
                kept.push(trove);
            }
        }
        self.troves = kept;
        removed
    }

    /// Stable sort, riskiest (lowest ratio) first.
    pub(crate) fn sort_by_ratio(&mut self) {
        let price = self.collateral_price;
        self.troves.sort_by(|a, b| {
            a.collateral_ratio(price).total_cmp(&b.collateral_ratio(price))
        });
    }

    /// Remove the first `n` troves.
    pub(crate) fn drain_front(&mut self, n: usize) -> Vec<Trove> {
        let n = n.min(self.troves.len());
        self.troves.drain(..n).collect()
    }

    pub fn snapshot(&self) -> Vec<TroveView> {
        self.troves.iter().map(|t| t.view(self.collateral_price)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn trove(collateral: f64, debt: f64) -> Trove {
        Trove { collateral, debt, initial_ratio: 1.5, inattention: 0.3, opened_at: 0 }
    }

    #[test]
    fn ratio_from_price() {
        let t = trove(10.0, 5000.0);
        assert!((t.collateral_ratio(1000.0) - 2.0).abs() < 1e-12);
        assert!((t.collateral_ratio(500.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn debt_free_trove_is_infinitely_safe() {
        assert_eq!(trove(1.0, 0.0).collateral_ratio(1000.0), f64::INFINITY);
    }

    #[test]
    fn with_ratio_hits_target() {
        let t = Trove::with_ratio(5000.0, 2.3, 0.3, 1000.0, 0);
        assert!((t.collateral_ratio(1000.0) - 2.3).abs() < 1e-12);
    }

    #[test]
    fn deviation_in_tolerance_units() {
        // ratio 2.0 vs target 1.5 with tolerance 0.3: (0.5) / (0.45)
        let t = trove(10.0, 5000.0);
        assert!((t.deviation(1000.0) - 0.5 / 0.45).abs() < 1e-12);
    }

    #[test]
    fn ratios_follow_population_price() {
        let mut pop = TrovePopulation::from_troves(vec![trove(10.0, 5000.0)], 1000.0);
        pop.set_collateral_price(750.0);
        assert!((pop.ratios()[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn extract_where_preserves_survivor_order() {
        let mut pop = TrovePopulation::from_troves(
            vec![trove(1.0, 1000.0), trove(10.0, 1000.0), trove(1.0, 900.0), trove(20.0, 1000.0)],
            1000.0,
        );
        let removed = pop.extract_where(|r| r < 1.2);
        assert_eq!(removed.len(), 2);
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.troves()[0].collateral, 10.0);
        assert_eq!(pop.troves()[1].collateral, 20.0);
    }

    #[test]
    fn remove_indices_ignores_out_of_range() {
        let mut pop = TrovePopulation::from_troves(vec![trove(1.0, 1.0), trove(2.0, 1.0), trove(3.0, 1.0)], 1.0);
        let removed = pop.remove_indices(&[2, 0, 9]);
        assert_eq!(removed.len(), 2);
        assert_eq!(pop.troves()[0].collateral, 2.0);
    }

    #[test]
    fn sort_by_ratio_puts_riskiest_first() {
        let mut pop = TrovePopulation::from_troves(
            vec![trove(3.0, 1000.0), trove(1.5, 1000.0), trove(2.0, 1000.0)],
            1000.0,
        );
        pop.sort_by_ratio();
        let ratios = pop.ratios();
        assert!(ratios.windows(2).all(|w| w[0] <= w[1]));
        let front = pop.drain_front(1);
        assert_eq!(front[0].collateral, 1.5);
        assert_eq!(pop.len(), 2);
    }

    #[test]
    fn totals() {
        let pop = TrovePopulation::from_troves(vec![trove(1.0, 10.0), trove(2.0, 20.0)], 1.0);
        assert_eq!(pop.total_debt(), 30.0);
        assert_eq!(pop.total_collateral(), 3.0);
    }
}
