//! Core domain types for the vending machine.

use thiserror::Error;

use crate::Amount;

/// Inventory key of an item.
pub type ItemId = u32;

/// Error raised when constructing an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    #[error("item price cannot be negative, got {0}")]
    NegativePrice(Amount),
}

/// A sellable item. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    name: String,
    price: Amount,
}

impl Item {
    pub fn new(name: impl Into<String>, price: Amount) -> Result<Self, ItemError> {
        if price.is_negative() {
            return Err(ItemError::NegativePrice(price));
        }
        Ok(Self {
            name: name.into(),
            price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Amount {
        self.price
    }
}

/// A command representing the possible inputs of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pay for an item; the amount must match its price exactly.
    Collect { item: ItemId, amount: Amount },
    /// Hand over the item that was paid for.
    Dispense { item: ItemId },
    /// Abort the open transaction and refund the payment.
    Cancel { item: ItemId },
}

impl Command {
    pub fn item(&self) -> ItemId {
        match self {
            Command::Collect { item, .. }
            | Command::Dispense { item }
            | Command::Cancel { item } => *item,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Collect { .. } => "collect",
            Command::Dispense { .. } => "dispense",
            Command::Cancel { .. } => "cancel",
        }
    }
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Payment accepted; the machine now waits to dispense `item`.
    Collected { item: ItemId, amount: Amount },
    /// The item was handed over and removed from the inventory.
    Dispensed { item: ItemId, dispensed: Item },
    /// The item is not in the inventory (already dispensed or never stocked).
    NothingToDispense { item: ItemId },
    /// The open transaction was aborted and `refund` returned.
    Cancelled { item: ItemId, refund: Amount },
}
