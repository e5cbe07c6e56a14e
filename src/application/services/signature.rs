//! `X-Line-Signature` verification.
//!
//! The platform signs every webhook body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in the header.

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    pub valid: bool,
    /// Returned so callers can log it next to the provided value.
    pub computed: String,
}

#[derive(Clone)]
pub struct SignatureVerifier {
    channel_secret: String,
}

impl SignatureVerifier {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: channel_secret.into(),
        }
    }

    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.channel_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Exact, case-sensitive comparison in constant time. No trimming.
    pub fn verify(&self, body: &[u8], provided: &str) -> SignatureCheck {
        let computed = self.sign(body);
        let valid = computed.len() == provided.len()
            && computed
                .as_bytes()
                .iter()
                .zip(provided.as_bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0;

        SignatureCheck { valid, computed }
    }
}
