//! Error types for vending machine operations.

use thiserror::Error;

use crate::Amount;
use crate::model::ItemId;

/// The machine operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CollectPayment,
    Dispense,
    Cancel,
}

impl Operation {
    /// Why the operation is rejected outside of its valid state.
    pub fn rejection(self) -> &'static str {
        match self {
            Operation::CollectPayment => "cannot collect payment mid-transaction",
            Operation::Dispense => "cannot dispense before payment",
            Operation::Cancel => "nothing to cancel",
        }
    }
}

/// Error returned by [`VendingMachine::apply`](super::VendingMachine::apply).
///
/// A failed operation never changes the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// Recoverable: retry with a stocked item.
    #[error("item {0} not found in inventory")]
    ItemNotFound(ItemId),

    /// Recoverable: retry with the exact price.
    #[error("invalid payment for item {item}: expected {expected}, received {received}")]
    InvalidPayment {
        item: ItemId,
        expected: Amount,
        received: Amount,
    },

    /// The operation is not valid in the current state.
    #[error("{:?} rejected in {state} state: {}", .operation, .operation.rejection())]
    InvalidStateTransition {
        operation: Operation,
        state: &'static str,
    },

    /// `dispense`/`cancel` named a different item than the one paid for.
    #[error("payment was collected for item {paid_for}, not {requested}")]
    ItemMismatch { paid_for: ItemId, requested: ItemId },

    /// Accepting the payment would overflow the collected total.
    #[error("collecting {amount} would overflow the collected total {collected}")]
    Overflow { collected: Amount, amount: Amount },
}

impl MachineError {
    /// Whether retrying with different arguments can succeed without first
    /// calling another operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MachineError::ItemNotFound(_) | MachineError::InvalidPayment { .. }
        )
    }
}
