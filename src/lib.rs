pub mod amount;
pub mod csv;
pub mod machine;
pub mod model;

pub use amount::{Amount, AmountError};
pub use machine::{MachineError, MachineState, VendingMachine};
pub use model::{Command, Item, ItemId, Outcome};
