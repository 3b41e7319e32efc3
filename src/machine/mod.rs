//! Vending machine state machine.
//!
//! The machine cycles between `Ready` and `AwaitingDispense`: a payment is
//! collected for one item, then the item is either dispensed or the payment
//! refunded. Every operation is checked against the current state and a
//! rejected operation leaves the machine untouched.
//! Also supports driving the machine from an async stream of commands.

use std::collections::HashMap;
use std::time::Duration;

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Amount;
use crate::model::{Command, Item, ItemId, Outcome};

mod state;
pub use state::{MachineState, PendingSale};

mod error;
pub use error::{MachineError, Operation};

/// A vending machine.
///
/// Holds the inventory, the total collected so far and the current state.
/// The collected total includes the payment of an open transaction; it is
/// settled on dispense and refunded on cancel.
#[derive(Debug)]
pub struct VendingMachine {
    state: MachineState,
    collected: Amount,
    inventory: HashMap<ItemId, Item>,
    /// Auto-cancel a pending sale after this long without a command (only in `run`)
    dispense_timeout: Option<Duration>,
}

/// Public API
impl VendingMachine {
    pub fn new() -> Self {
        Self {
            state: MachineState::Ready,
            collected: Amount::ZERO,
            inventory: HashMap::new(),
            dispense_timeout: None,
        }
    }

    /// Auto-cancel a pending sale when `run` receives no command within `timeout`.
    pub fn with_dispense_timeout(mut self, timeout: Duration) -> Self {
        self.dispense_timeout = Some(timeout);
        self
    }

    /// Stock an item, returning the entry it replaced.
    pub fn stock(&mut self, id: ItemId, item: Item) -> Option<Item> {
        self.inventory.insert(id, item)
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Total collected, including the payment of an open transaction.
    pub fn collected(&self) -> Amount {
        self.collected
    }

    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.inventory.get(&id)
    }

    /// Return the current inventory.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.inventory.iter().map(|(id, item)| (*id, item))
    }

    pub fn collect_payment(
        &mut self,
        amount: Amount,
        item: ItemId,
    ) -> Result<Outcome, MachineError> {
        self.apply(Command::Collect { item, amount })
    }

    pub fn dispense(&mut self, item: ItemId) -> Result<Outcome, MachineError> {
        self.apply(Command::Dispense { item })
    }

    pub fn cancel(&mut self, item: ItemId) -> Result<Outcome, MachineError> {
        self.apply(Command::Cancel { item })
    }

    /// Apply a single command on top of the current machine state
    pub fn apply(&mut self, command: Command) -> Result<Outcome, MachineError> {
        let result = match command {
            Command::Collect { item, amount } => self.apply_collect(item, amount),
            Command::Dispense { item } => self.apply_dispense(item),
            Command::Cancel { item } => self.apply_cancel(item),
        };
        self.log_result(&command, &result);
        result
    }

    /// Run the machine with the given command stream until it ends.
    ///
    /// The task calling `run` is the only writer, so concurrent producers
    /// should feed it through a channel.
    pub async fn run(&mut self, mut commands: impl Stream<Item = Command> + Unpin) {
        loop {
            let deadline = match self.state {
                MachineState::AwaitingDispense(_) => self.dispense_timeout,
                MachineState::Ready => None,
            };

            let next = match deadline {
                Some(limit) => match tokio::time::timeout(limit, commands.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        self.expire();
                        continue;
                    }
                },
                None => commands.next().await,
            };

            let Some(command) = next else {
                break;
            };
            // a rejected command must not stop the machine; it is already logged
            let _ = self.apply(command);
        }
    }
}

/// Private API
impl VendingMachine {
    fn log_result(&self, command: &Command, result: &Result<Outcome, MachineError>) {
        let kind = command.kind();
        let item = command.item();
        match result {
            Ok(outcome) => {
                info!(
                    item = %item,
                    outcome = ?outcome,
                    state = self.state.name(),
                    collected = %self.collected,
                    "{kind} applied"
                );
            }
            Err(e) => {
                info!(
                    item = %item,
                    state = self.state.name(),
                    reason = %e,
                    "{kind} skipped"
                );
            }
        }
    }

    /// Apply a `Command::Collect`:
    /// - Ensure the machine is ready
    /// - Ensure the item is stocked and the amount matches its price
    /// - Add the amount to the collected total (without overflowing) and wait for dispense
    fn apply_collect(&mut self, item: ItemId, amount: Amount) -> Result<Outcome, MachineError> {
        if let MachineState::AwaitingDispense(_) = self.state {
            return Err(self.rejected(Operation::CollectPayment));
        }

        let expected = self
            .inventory
            .get(&item)
            .map(Item::price)
            .ok_or(MachineError::ItemNotFound(item))?;

        if amount != expected {
            return Err(MachineError::InvalidPayment {
                item,
                expected,
                received: amount,
            });
        }

        self.collected = self
            .collected
            .checked_add(amount)
            .ok_or(MachineError::Overflow {
                collected: self.collected,
                amount,
            })?;
        self.state = MachineState::AwaitingDispense(PendingSale { item, paid: amount });

        Ok(Outcome::Collected { item, amount })
    }

    /// Apply a `Command::Dispense`:
    /// - Report nothing to dispense if the item is gone
    /// - Ensure a payment was collected for this very item
    /// - Remove it from inventory and return to ready (payment is settled)
    ///
    /// A missing item is reported before the state is checked, so dispensing
    /// twice reports rather than fails.
    fn apply_dispense(&mut self, item: ItemId) -> Result<Outcome, MachineError> {
        match self.state {
            MachineState::AwaitingDispense(pending) if pending.item == item => {}
            _ if !self.inventory.contains_key(&item) => {
                return Ok(Outcome::NothingToDispense { item });
            }
            MachineState::AwaitingDispense(pending) => {
                return Err(MachineError::ItemMismatch {
                    paid_for: pending.item,
                    requested: item,
                });
            }
            MachineState::Ready => return Err(self.rejected(Operation::Dispense)),
        }

        match self.inventory.remove(&item) {
            Some(dispensed) => {
                self.state = MachineState::Ready;
                Ok(Outcome::Dispensed { item, dispensed })
            }
            None => Ok(Outcome::NothingToDispense { item }),
        }
    }

    /// Apply a `Command::Cancel`:
    /// - Ensure a payment was collected for this very item
    /// - Refund it from the collected total and return to ready
    fn apply_cancel(&mut self, item: ItemId) -> Result<Outcome, MachineError> {
        let MachineState::AwaitingDispense(pending) = self.state else {
            return Err(self.rejected(Operation::Cancel));
        };

        if pending.item != item {
            return Err(MachineError::ItemMismatch {
                paid_for: pending.item,
                requested: item,
            });
        }

        Ok(self.refund(pending))
    }

    /// Auto-cancel the pending sale after the dispense timeout elapsed.
    fn expire(&mut self) {
        if let MachineState::AwaitingDispense(pending) = self.state {
            let outcome = self.refund(pending);
            warn!(
                item = %pending.item,
                refund = %pending.paid,
                outcome = ?outcome,
                "dispense timed out, transaction cancelled"
            );
        }
    }

    fn refund(&mut self, pending: PendingSale) -> Outcome {
        // paid was added on collect, so the total cannot go negative
        self.collected -= pending.paid;
        self.state = MachineState::Ready;
        Outcome::Cancelled {
            item: pending.item,
            refund: pending.paid,
        }
    }

    fn rejected(&self, operation: Operation) -> MachineError {
        MachineError::InvalidStateTransition {
            operation,
            state: self.state.name(),
        }
    }
}

impl Default for VendingMachine {
    fn default() -> Self {
        Self::new()
    }
}
