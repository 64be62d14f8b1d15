//! Domain types shared by the request builder and the ledger client.

mod address;
mod amount;
mod argument;
mod digest;
mod operation;
mod operation_request;

pub use address::{ADDRESS_HEX_LEN, Address};
pub use amount::Amount;
pub use argument::Argument;
pub use digest::TransactionDigest;
pub use operation::{ArgumentSlot, OperationKind};
pub use operation_request::{OperationRequest, OperationRequestBuilder};
