//! Signed mutation calls.
//!
//! A grant or revoke is submitted as a [`SignedCall`]: the canonical bytes of
//! the call, prefixed with [`CALL_DOMAIN`], signed by the calling principal.
//! Verification binds the caller identity to the exact record being granted
//! or revoked.
//!
//! On the wire a signed call is one canonical CBOR array carrying the call,
//! the caller, and the signature.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::{self, Field};
use crate::crypto::{Blake3Hash, Keypair, Principal, Signature};
use crate::error::{CoreError, Result};
use crate::record::Record;

/// Domain separation prefix for call signatures.
pub const CALL_DOMAIN: &[u8] = b"rolebook-call-v1:";

/// Which mutation a call requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    Grant,
    Revoke,
}

impl CallKind {
    pub const fn tag(self) -> u64 {
        match self {
            CallKind::Grant => 1,
            CallKind::Revoke => 2,
        }
    }

    pub fn from_tag(tag: u64) -> Result<Self> {
        match tag {
            1 => Ok(CallKind::Grant),
            2 => Ok(CallKind::Revoke),
            other => Err(CoreError::UnknownCallKind(other)),
        }
    }
}

/// An unsigned grant or revoke request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub kind: CallKind,
    pub record: Record,
    /// Caller-chosen value that makes otherwise identical calls distinct.
    pub nonce: u64,
}

impl Call {
    pub const fn grant(record: Record) -> Self {
        Self {
            kind: CallKind::Grant,
            record,
            nonce: 0,
        }
    }

    pub const fn revoke(record: Record) -> Self {
        Self {
            kind: CallKind::Revoke,
            record,
            nonce: 0,
        }
    }

    pub const fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Canonical CBOR: `[kind, system, principal, role, nonce]`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let [system, principal, role] = self.record.fields();
        canonical::encode_array(&[
            Field::Uint(self.kind.tag()),
            system,
            principal,
            role,
            Field::Uint(self.nonce),
        ])
    }

    /// The message a caller signs: `CALL_DOMAIN || canonical_bytes`.
    pub fn signing_message(&self) -> Bytes {
        let canonical = self.canonical_bytes();
        let mut msg = Vec::with_capacity(CALL_DOMAIN.len() + canonical.len());
        msg.extend_from_slice(CALL_DOMAIN);
        msg.extend_from_slice(&canonical);
        Bytes::from(msg)
    }

    /// Sign this call as the principal owning `keypair`.
    pub fn sign(self, keypair: &Keypair) -> SignedCall {
        let signature = keypair.sign(&self.signing_message());
        SignedCall {
            caller: keypair.principal(),
            call: self,
            signature,
        }
    }
}

/// Content address of a signed call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub Blake3Hash);

impl fmt::Debug for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallId({})", &self.0.to_hex()[..16])
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_hex()[..16])
    }
}

/// Items in the wire encoding of a signed call.
const SIGNED_CALL_ARITY: usize = 7;

/// A call together with its caller and the caller's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCall {
    pub caller: Principal,
    pub call: Call,
    pub signature: Signature,
}

impl SignedCall {
    /// Check that `caller` signed exactly this call.
    pub fn verify(&self) -> Result<()> {
        self.caller
            .verify(&self.call.signing_message(), &self.signature)
    }

    /// Wire encoding:
    /// `[kind, system, principal, role, nonce, caller, signature]`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let [system, principal, role] = self.call.record.fields();
        canonical::encode_array(&[
            Field::Uint(self.call.kind.tag()),
            system,
            principal,
            role,
            Field::Uint(self.call.nonce),
            Field::Bytes(self.caller.as_bytes()),
            Field::Bytes(self.signature.as_bytes()),
        ])
    }

    /// Decode the wire encoding, rejecting malformed or non-canonical input.
    ///
    /// The signature is not checked here; see [`SignedCall::verify`].
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let items = canonical::decode_array(bytes, SIGNED_CALL_ARITY)?;
        let signed = Self {
            caller: Principal::from_bytes(canonical::bytes_at(&items, 5)?),
            call: Call {
                kind: CallKind::from_tag(canonical::uint_at(&items, 0)?)?,
                record: Record::from_items(&items, 1)?,
                nonce: canonical::uint_at(&items, 4)?,
            },
            signature: Signature::from_bytes(canonical::bytes_at(&items, 6)?),
        };
        canonical::ensure_canonical(bytes, &signed.canonical_bytes())?;
        Ok(signed)
    }

    /// Blake3 of the wire encoding.
    pub fn id(&self) -> CallId {
        CallId(Blake3Hash::hash(&self.canonical_bytes()))
    }
}
