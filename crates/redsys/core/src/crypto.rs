//! Cryptographic operations of the HMAC_SHA256_V1 signature scheme
//!
//! Every order gets its own signing key: the order identifier, zero-filled to
//! the DES block size, is encrypted under the merchant secret with 3-key
//! triple DES in CBC mode and a zero IV. The ciphertext keys an HMAC-SHA256
//! over the exact bytes that travel on the wire.

use std::fmt;

use cipher::{BlockEncryptMut, KeyIvInit, generic_array::GenericArray};
use des::TdesEde3;
use hmac::{Hmac, Mac, digest::KeyInit};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::trace;
#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    MerchantSecret, codec,
    constants::{DES_BLOCK_SIZE, SIGNATURE_LEN},
};

type TdesCbc = cbc::Encryptor<TdesEde3>;
type HmacSha256 = Hmac<Sha256>;

/// Raw HMAC-SHA256 output
pub type Signature = [u8; SIGNATURE_LEN];

/// Per-order signing key
///
/// Recomputed for every sign or verify operation and never persisted.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    /// The key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// Zero-fill `data` to the next multiple of the DES block size
///
/// Input that is already block aligned is returned unchanged. This is plain
/// NUL filling, not PKCS#7.
pub fn zero_pad(data: &[u8]) -> Vec<u8> {
    let mut padded = data.to_vec();
    let remainder = padded.len() % DES_BLOCK_SIZE;
    if remainder != 0 {
        padded.resize(padded.len() + DES_BLOCK_SIZE - remainder, 0);
    }
    padded
}

/// Derive the signing key for an order
///
/// # Arguments
///
/// * `order` - The order identifier as sent on the wire
/// * `secret` - The merchant secret
///
/// # Returns
///
/// The 3DES-CBC encryption of the zero-padded order, same length as the
/// padded plaintext
pub fn derive_key(order: &str, secret: &MerchantSecret) -> DerivedKey {
    let mut buf = zero_pad(order.as_bytes());

    // Zero IV, no padding layer: the buffer is already block aligned
    let mut encryptor = TdesCbc::new(secret.cipher_key(), &GenericArray::default());
    for block in buf.chunks_exact_mut(DES_BLOCK_SIZE) {
        encryptor.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }

    trace!(order, len = buf.len(), "Derived per-order signing key");
    DerivedKey(buf)
}

/// Compute HMAC-SHA256 over `message`
pub fn sign(message: &[u8], key: &DerivedKey) -> Signature {
    // HMAC hashes over-long keys and pads short ones, so no length is rejected
    let mut mac = <HmacSha256 as KeyInit>::new_from_slice(key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

/// Compute HMAC-SHA256 over `message` and base64 encode it
pub fn sign_and_encode(message: &[u8], key: &DerivedKey) -> String {
    codec::encode_base64(sign(message, key))
}

/// Derive the order key and sign `message` in one step
pub fn signature_for(message: &[u8], order: &str, secret: &MerchantSecret) -> String {
    sign_and_encode(message, &derive_key(order, secret))
}

/// Compare two encoded signatures byte for byte in constant time
pub fn signatures_match(expected: &str, received: &str) -> bool {
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
