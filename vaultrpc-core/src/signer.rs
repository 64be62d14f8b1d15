//! Signing capability consumed by the ledger client.
//!
//! Key storage and wallet protocols live outside this workspace; callers
//! plug in a [`Signer`] backed by whatever holds their keys.

use crate::error::Result;
use crate::types::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature scheme flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// Ed25519
    Ed25519,
    /// ECDSA over secp256k1
    Secp256k1,
    /// ECDSA over secp256r1
    Secp256r1,
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureScheme::Ed25519 => "ed25519",
            SignatureScheme::Secp256k1 => "secp256k1",
            SignatureScheme::Secp256r1 => "secp256r1",
        };
        f.write_str(name)
    }
}

/// A signature over transaction bytes, in the node's serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Base64 serialized signature (flag, signature, public key).
    pub signature: String,
    /// Scheme used to produce it.
    pub scheme: SignatureScheme,
    /// Base64 public key.
    pub public_key: String,
}

/// Produces signatures for the account that sends transactions.
#[async_trait]
pub trait Signer: Send + Sync + fmt::Debug {
    /// Address of the signing account.
    fn address(&self) -> &Address;

    /// Signs base64-encoded transaction bytes.
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`Error::Signing`](crate::error::Error::Signing).
    async fn sign(&self, tx_bytes: &str) -> Result<Signature>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Debug)]
    struct RefusingSigner(Address);

    #[async_trait]
    impl Signer for RefusingSigner {
        fn address(&self) -> &Address {
            &self.0
        }

        async fn sign(&self, _tx_bytes: &str) -> Result<Signature> {
            Err(Error::signing("hardware wallet locked"))
        }
    }

    #[tokio::test]
    async fn test_signer_is_object_safe() {
        let address = Address::parse("0x1234567890abcdef1234567890abcdef12345678").unwrap();
        let signer: Box<dyn Signer> = Box::new(RefusingSigner(address.clone()));
        assert_eq!(signer.address(), &address);
        assert!(matches!(signer.sign("AAAA").await, Err(Error::Signing(_))));
    }

    #[test]
    fn test_scheme_serde() {
        assert_eq!(
            serde_json::to_value(SignatureScheme::Secp256k1).unwrap(),
            serde_json::json!("secp256k1")
        );
        assert_eq!(SignatureScheme::Ed25519.to_string(), "ed25519");
    }
}
