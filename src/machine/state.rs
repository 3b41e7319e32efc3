use crate::Amount;
use crate::model::ItemId;

/// The payment held while the machine waits to dispense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSale {
    /// The item that was paid for.
    pub item: ItemId,
    /// The amount collected for it, refunded on cancel.
    pub paid: Amount,
}

/// Current position of the machine in its transaction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineState {
    /// No transaction open; a payment may be collected.
    #[default]
    Ready,
    /// Payment collected, item not yet handed over.
    AwaitingDispense(PendingSale),
    // No terminal state: the machine cycles back to Ready
}

impl MachineState {
    pub fn name(&self) -> &'static str {
        match self {
            MachineState::Ready => "ready",
            MachineState::AwaitingDispense(_) => "awaiting-dispense",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, MachineState::Ready)
    }

    pub fn pending(&self) -> Option<&PendingSale> {
        match self {
            MachineState::Ready => None,
            MachineState::AwaitingDispense(pending) => Some(pending),
        }
    }
}
