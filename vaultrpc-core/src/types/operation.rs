//! Vault operation kinds and their argument layouts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of one positional argument of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentSlot {
    /// An object id, validated with the address rule.
    ObjectId(&'static str),
    /// A strictly positive amount.
    Amount(&'static str),
}

impl ArgumentSlot {
    /// Name of the argument, for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ArgumentSlot::ObjectId(name) | ArgumentSlot::Amount(name) => name,
        }
    }
}

const DEPOSIT_SLOTS: &[ArgumentSlot] = &[
    ArgumentSlot::ObjectId("vault_id"),
    ArgumentSlot::ObjectId("coin_id"),
    ArgumentSlot::Amount("amount"),
];

const WITHDRAW_SLOTS: &[ArgumentSlot] = &[
    ArgumentSlot::ObjectId("vault_id"),
    ArgumentSlot::Amount("amount"),
];

const STRATEGY_EXECUTE_SLOTS: &[ArgumentSlot] = &[
    ArgumentSlot::ObjectId("strategy_id"),
    ArgumentSlot::ObjectId("vault_id"),
];

/// Operations a caller can request against the vault package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    /// `vault::deposit(vault_id, coin_id, amount)`
    Deposit,
    /// `vault::withdraw(vault_id, amount)`
    Withdraw,
    /// `strategy::execute(strategy_id, vault_id)`
    StrategyExecute,
}

impl OperationKind {
    /// Positional argument layout.
    pub fn slots(self) -> &'static [ArgumentSlot] {
        match self {
            OperationKind::Deposit => DEPOSIT_SLOTS,
            OperationKind::Withdraw => WITHDRAW_SLOTS,
            OperationKind::StrategyExecute => STRATEGY_EXECUTE_SLOTS,
        }
    }

    /// Exact number of arguments the operation takes.
    pub fn arity(self) -> usize {
        self.slots().len()
    }

    /// Returns `true` if the operation moves value and therefore carries an amount.
    pub fn is_value_moving(self) -> bool {
        self.slots()
            .iter()
            .any(|slot| matches!(slot, ArgumentSlot::Amount(_)))
    }

    /// Move module the operation calls into.
    pub fn module(self) -> &'static str {
        match self {
            OperationKind::Deposit | OperationKind::Withdraw => "vault",
            OperationKind::StrategyExecute => "strategy",
        }
    }

    /// Move function the operation calls.
    pub fn function(self) -> &'static str {
        match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdraw => "withdraw",
            OperationKind::StrategyExecute => "execute",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module(), self.function())
    }
}
