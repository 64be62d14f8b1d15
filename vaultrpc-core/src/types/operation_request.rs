//! Validated operation requests.
//!
//! An [`OperationRequest`] can only be obtained through validation, so every
//! value of the type satisfies the address, arity and amount rules of its
//! [`OperationKind`]. Nothing here performs I/O.
//!
//! ```rust
//! use vaultrpc_core::error::ValidationError;
//! use vaultrpc_core::types::{Argument, OperationKind, OperationRequest};
//!
//! let package = "0x1234567890abcdef1234567890abcdef12345678";
//! let vault = "0xabcdef1234567890abcdef1234567890abcdef12";
//! let coin = "0x00000000000000000000000000000000000000c0";
//!
//! let request = OperationRequest::builder(OperationKind::Deposit)
//!     .target(package)
//!     .argument(vault)
//!     .argument(coin)
//!     .argument(1_000_000_000_u64)
//!     .type_argument("0x2::sui::SUI")
//!     .build()
//!     .unwrap();
//! assert_eq!(request.amount().map(|a| a.get()), Some(1_000_000_000));
//!
//! let err = OperationRequest::build(
//!     OperationKind::Deposit,
//!     package,
//!     vec![Argument::from(vault), Argument::from(1_u64)],
//!     vec![],
//! )
//! .unwrap_err();
//! assert_eq!(err, ValidationError::ArityMismatch { expected: 3, actual: 2 });
//! ```

use crate::error::ValidationError;
use crate::types::{Address, Amount, Argument, ArgumentSlot, OperationKind};
use serde::Serialize;
use tracing::debug;

/// A validated, normalized request to call a vault package function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    kind: OperationKind,
    target: Address,
    arguments: Vec<Argument>,
    type_arguments: Vec<String>,
}

impl OperationRequest {
    /// Creates a builder for the given operation kind.
    pub fn builder(kind: OperationKind) -> OperationRequestBuilder {
        OperationRequestBuilder::new(kind)
    }

    /// Validates and normalizes caller-supplied fields.
    ///
    /// Checks run in order: target address, arity, then each argument from
    /// left to right. The first failure is returned.
    pub fn build(
        kind: OperationKind,
        target: &str,
        arguments: Vec<Argument>,
        type_arguments: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let target = Address::parse(target)?;

        let slots = kind.slots();
        if arguments.len() != slots.len() {
            return Err(ValidationError::ArityMismatch {
                expected: slots.len(),
                actual: arguments.len(),
            });
        }

        let arguments = slots
            .iter()
            .zip(arguments)
            .map(|(slot, argument)| normalize_argument(*slot, argument))
            .collect::<Result<Vec<_>, _>>()?;

        let type_arguments = type_arguments
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .collect();

        debug!(kind = %kind, target = %target, "Operation request validated");

        Ok(Self {
            kind,
            target,
            arguments,
            type_arguments,
        })
    }

    /// The operation kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The package address the call targets.
    pub fn target(&self) -> &Address {
        &self.target
    }

    /// Normalized positional arguments.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Normalized type arguments.
    pub fn type_arguments(&self) -> &[String] {
        &self.type_arguments
    }

    /// The amount carried by a value-moving operation.
    pub fn amount(&self) -> Option<Amount> {
        self.kind
            .slots()
            .iter()
            .zip(&self.arguments)
            .find_map(|(slot, argument)| match (slot, argument) {
                (ArgumentSlot::Amount(_), Argument::Integer(n)) => Amount::try_from(*n).ok(),
                _ => None,
            })
    }

    /// Fully qualified function path, e.g. `0x…::vault::deposit`.
    pub fn function_path(&self) -> String {
        format!("{}::{}", self.target, self.kind)
    }

    /// Arguments rendered in the node's JSON convention.
    pub fn arguments_json(&self) -> Vec<serde_json::Value> {
        self.arguments.iter().map(Argument::to_json).collect()
    }
}

fn normalize_argument(slot: ArgumentSlot, argument: Argument) -> Result<Argument, ValidationError> {
    match slot {
        ArgumentSlot::ObjectId(_) => match argument {
            Argument::String(id) => Ok(Argument::String(Address::parse(&id)?.into_string())),
            other => Err(ValidationError::InvalidAddress(other.to_string())),
        },
        ArgumentSlot::Amount(name) => match argument {
            Argument::Integer(n) => {
                Amount::try_from(n)?;
                Ok(Argument::Integer(n))
            }
            other => Err(ValidationError::InvalidAmount(format!(
                "{name} must be an integer, got {other}"
            ))),
        },
    }
}

/// Fluent builder for [`OperationRequest`].
#[derive(Debug, Clone)]
pub struct OperationRequestBuilder {
    kind: OperationKind,
    target: Option<String>,
    arguments: Vec<Argument>,
    type_arguments: Vec<String>,
}

impl OperationRequestBuilder {
    /// Creates an empty builder.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            target: None,
            arguments: Vec::new(),
            type_arguments: Vec::new(),
        }
    }

    /// Sets the package address.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Appends a positional argument.
    pub fn argument(mut self, argument: impl Into<Argument>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Appends several positional arguments.
    pub fn arguments<I, A>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Appends a type argument.
    pub fn type_argument(mut self, tag: impl Into<String>) -> Self {
        self.type_arguments.push(tag.into());
        self
    }

    /// Validates the collected fields. A missing target is an invalid address.
    pub fn build(self) -> Result<OperationRequest, ValidationError> {
        let target = self.target.unwrap_or_default();
        OperationRequest::build(self.kind, &target, self.arguments, self.type_arguments)
    }
}
