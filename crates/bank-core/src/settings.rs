use serde::{Deserialize, Serialize};

/// Bank-wide rates and thresholds. Mutated only via `SET_RATES`; the rest
/// are fixed for the lifetime of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BankSettings {
    pub credit_interest_rate: f64,
    pub deposit_interest_rate: f64,
    pub large_operation_threshold: f64,
    pub large_loan_threshold: f64,
}

impl Default for BankSettings {
    fn default() -> Self {
        Self {
            credit_interest_rate: 12.0,
            deposit_interest_rate: 6.5,
            large_operation_threshold: 150_000.0,
            large_loan_threshold: 50_000.0,
        }
    }
}

impl BankSettings {
    /// The cap below which an unverified client's WITHDRAW/TRANSFER is
    /// allowed to execute immediately.
    pub fn unverified_operation_cap(&self) -> f64 {
        self.large_operation_threshold / 10.0
    }
}
