use bank_core::{BankError, BankResult, BankSettings, ClientStatus};

/// The operation categories `can_perform_operation` gates on. Distinct from
/// [`bank_core::OperationType`], which only distinguishes the two approval
/// queues — this enum also covers operations, like deposits, that never
/// reach the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Deposit,
    Withdraw,
    Transfer,
    CreateAccount,
    CreditOperation,
}

/// Operators and verified clients pass unconditionally. An unverified
/// client is capped on WITHDRAW/TRANSFER, blocked outright from credit
/// operations, and otherwise unrestricted here — the account-type-specific
/// restriction on CREATE_ACCOUNT (no Credit/Deposit accounts before
/// verification) is layered on top by the caller.
pub fn can_perform_operation(client_status: ClientStatus, is_operator: bool, kind: OperationKind, amount: f64, settings: &BankSettings) -> BankResult<()> {
    if is_operator || client_status == ClientStatus::Verified {
        return Ok(());
    }
    match kind {
        OperationKind::Withdraw | OperationKind::Transfer => {
            let cap = settings.unverified_operation_cap();
            if amount > cap {
                return Err(BankError::ExceedsUnverifiedLimit { limit: cap });
            }
            Ok(())
        }
        OperationKind::CreditOperation => Err(BankError::CreditOperationRequiresVerification),
        OperationKind::Deposit | OperationKind::CreateAccount => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BankSettings {
        BankSettings::default()
    }

    #[test]
    fn unverified_client_under_cap_is_allowed() {
        let cap = settings().unverified_operation_cap();
        assert!(can_perform_operation(ClientStatus::PendingVerification, false, OperationKind::Withdraw, cap, &settings()).is_ok());
    }

    #[test]
    fn unverified_client_over_cap_is_denied() {
        let cap = settings().unverified_operation_cap();
        let err = can_perform_operation(ClientStatus::PendingVerification, false, OperationKind::Withdraw, cap + 1.0, &settings()).unwrap_err();
        assert!(matches!(err, BankError::ExceedsUnverifiedLimit { .. }));
    }

    #[test]
    fn unverified_client_cannot_do_credit_operations() {
        let err = can_perform_operation(ClientStatus::PendingVerification, false, OperationKind::CreditOperation, 0.0, &settings()).unwrap_err();
        assert!(matches!(err, BankError::CreditOperationRequiresVerification));
    }

    #[test]
    fn operator_bypasses_the_cap() {
        let cap = settings().unverified_operation_cap();
        assert!(can_perform_operation(ClientStatus::PendingVerification, true, OperationKind::Withdraw, cap * 100.0, &settings()).is_ok());
    }

    #[test]
    fn verified_client_has_no_cap() {
        let cap = settings().unverified_operation_cap();
        assert!(can_perform_operation(ClientStatus::Verified, false, OperationKind::Withdraw, cap * 100.0, &settings()).is_ok());
    }

    #[test]
    fn deposit_is_always_allowed() {
        assert!(can_perform_operation(ClientStatus::PendingVerification, false, OperationKind::Deposit, 1_000_000.0, &settings()).is_ok());
    }
}
