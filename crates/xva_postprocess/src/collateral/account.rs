//! Per-sample collateral balance history.

/// Collateral balance and settled margin calls along one sample path.
///
/// Amounts are in collateral currency; positive balances are collateral
/// held, negative balances are collateral posted. Index 0 is today and is
/// always zero.
#[derive(Clone, Debug, PartialEq)]
pub struct CollateralAccount {
    balance: Vec<f64>,
    margin_calls: Vec<f64>,
}

impl CollateralAccount {
    /// Creates an empty account over `n_points` profile dates.
    pub fn new(n_points: usize) -> Self {
        Self {
            balance: vec![0.0; n_points],
            margin_calls: vec![0.0; n_points],
        }
    }

    /// Balance after settlement at profile date `k`.
    #[inline]
    pub fn balance(&self, k: usize) -> f64 {
        self.balance[k]
    }

    /// Balance at every profile date.
    #[inline]
    pub fn balances(&self) -> &[f64] {
        &self.balance
    }

    /// Settled margin call at every profile date (0 where nothing settled).
    #[inline]
    pub fn margin_calls(&self) -> &[f64] {
        &self.margin_calls
    }

    /// Number of margin calls that settled along the path.
    pub fn settled_call_count(&self) -> usize {
        self.margin_calls.iter().filter(|&&m| m != 0.0).count()
    }

    pub(crate) fn settle(&mut self, k: usize, call: f64, new_balance: f64) {
        self.margin_calls[k] = call;
        self.balance[k] = new_balance;
    }

    pub(crate) fn carry(&mut self, k: usize) {
        self.balance[k] = self.balance[k - 1];
    }
}
