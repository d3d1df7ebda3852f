//! Merchant secret handling

use std::fmt;

use cipher::Key;
use des::TdesEde3;
#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    Result, codec,
    constants::MERCHANT_SECRET_LEN,
    error::KeyError,
    validation::ValidationError,
};

/// The merchant's shared secret, decoded to a 3-key triple DES key
///
/// Issued by the gateway operator and stored base64-encoded. The key bytes are
/// wiped on drop and never printed.
#[derive(Clone)]
#[cfg_attr(feature = "zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct MerchantSecret {
    key: [u8; MERCHANT_SECRET_LEN],
}

impl MerchantSecret {
    /// Decode a base64 merchant secret
    ///
    /// Fails with a validation error on blank input and with a [`KeyError`]
    /// when the value does not decode to exactly 24 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        if encoded.trim().is_empty() {
            return Err(ValidationError::Blank("merchant secret").into());
        }

        let decoded = codec::decode_base64(encoded).map_err(|_| KeyError::Encoding)?;
        Ok(Self::from_bytes(&decoded)?)
    }

    /// Wrap raw key bytes
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, KeyError> {
        let key = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: MERCHANT_SECRET_LEN,
            actual: bytes.len(),
        })?;

        Ok(Self { key })
    }

    /// The key in the form the cipher expects
    pub(crate) fn cipher_key(&self) -> &Key<TdesEde3> {
        Key::<TdesEde3>::from_slice(&self.key)
    }
}

impl fmt::Debug for MerchantSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantSecret").finish_non_exhaustive()
    }
}

impl std::str::FromStr for MerchantSecret {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base64(s)
    }
}
