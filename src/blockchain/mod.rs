pub mod bindings;
pub mod ethereum;
pub mod simulated;
pub mod traits;

pub use simulated::{SimulatedChain, SimulatedWillContract};
pub use traits::{TxOutcome, WillContract};
