//! JSON-RPC method names used by the client.

/// Latest checkpoint sequence number, as a decimal string.
pub const GET_LATEST_CHECKPOINT_SEQUENCE_NUMBER: &str = "sui_getLatestCheckpointSequenceNumber";

/// Reference gas price for the current epoch, as a decimal string.
pub const GET_REFERENCE_GAS_PRICE: &str = "suix_getReferenceGasPrice";

/// Object lookup by id.
pub const GET_OBJECT: &str = "sui_getObject";

/// Builds unsigned transaction bytes for a Move call.
pub const MOVE_CALL: &str = "unsafe_moveCall";

/// Submits a signed transaction block.
pub const EXECUTE_TRANSACTION_BLOCK: &str = "sui_executeTransactionBlock";

/// Request type for [`EXECUTE_TRANSACTION_BLOCK`]: return once the node has applied the effects.
pub const WAIT_FOR_LOCAL_EXECUTION: &str = "WaitForLocalExecution";
