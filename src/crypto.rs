//! Cryptographic oracles the state-transition core is allowed to call
//! directly: BLAKE2b-256 hashing and Ed25519 signature verification over
//! guarantee credentials. Every other primitive (Bandersnatch ring
//! signatures, BLS, ticket VRF verification) is out of scope and modeled
//! as an opaque oracle trait elsewhere (see [`crate::transitions::epoch`]).

use blake2::digest::{Update, VariableOutput};
use blake2::Blake2bVar;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::config::GUARANTEE_SIGNATURE_CONTEXT;

pub type Hash = [u8; 32];

/// BLAKE2b-256 hash of arbitrary bytes.
#[must_use]
pub fn blake2b256(data: &[u8]) -> Hash {
    let mut hasher = Blake2bVar::new(32).expect("BLAKE2b-256 output size 32 is valid");
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize_variable(&mut out).expect("32-byte output");
    out
}

/// Verify an Ed25519 signature over `"$jam_guarantee" ‖ hash(canonical(work_report))`.
///
/// Returns `false` (rather than an error) on a malformed key or signature —
/// guarantee-credential failure is a silent-skip condition at the STF level,
/// not a fatal one.
#[must_use]
pub fn verify_guarantee_signature(
    public_key: &[u8],
    report_hash: &Hash,
    signature: &[u8; 64],
) -> bool {
    let Ok(key_bytes): Result<[u8; 32], _> = public_key.try_into() else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let signature = Signature::from_bytes(signature);

    let mut message = Vec::with_capacity(GUARANTEE_SIGNATURE_CONTEXT.len() + 32);
    message.extend_from_slice(GUARANTEE_SIGNATURE_CONTEXT);
    message.extend_from_slice(report_hash);

    verifying_key.verify(&message, &signature).is_ok()
}
