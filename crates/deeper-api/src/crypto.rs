// Login password encryption
//
// The device never receives the plaintext password: the admin UI encrypts
// it with a fixed RSA public key and sends the base64 ciphertext. Padding
// is OAEP with SHA-1 for both the hash and MGF1.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha1::Sha1;

use crate::error::Error;

/// Public key shipped with the client. Override it through configuration
/// when the device firmware uses a different key pair.
pub const DEFAULT_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----
MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQCw4jsvfHnMut0HbDMVR/XiuefR
8HrJL9Hf/FvdRE6/d/y60TPhfadEbBHC1iZpNwpL2qr+0R+m6/Zs16Tf2SA3r4L7
9JOUO6TVDhl5u9RIRRBpntR9HA6Qh5qf1HbnnOfK7eoiEtVqhCBMNuO+4NRdlaQd
kFzIxnj3IrbppSPbFQIDAQAB
-----END PUBLIC KEY-----
";

/// Encrypts login passwords with the device public key.
#[derive(Debug, Clone)]
pub struct PasswordEncryptor {
    key: RsaPublicKey,
}

impl PasswordEncryptor {
    /// Parse a PEM public key. Accepts both SPKI (`BEGIN PUBLIC KEY`) and
    /// PKCS#1 (`BEGIN RSA PUBLIC KEY`) encodings.
    pub fn from_pem(pem: &str) -> Result<Self, Error> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| Error::Crypto(format!("invalid public key: {e}")))?;
        Ok(Self { key })
    }

    /// Encrypt `plaintext` and return the base64-encoded ciphertext.
    ///
    /// An empty password encrypts to an empty string, matching what the
    /// admin UI submits for a blank field.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let mut rng = rand::thread_rng();
        let ciphertext = self
            .key
            .encrypt(&mut rng, Oaep::new::<Sha1>(), plaintext.as_bytes())
            .map_err(|e| Error::Crypto(e.to_string()))?;
        Ok(STANDARD.encode(ciphertext))
    }
}

impl Default for PasswordEncryptor {
    fn default() -> Self {
        Self::from_pem(DEFAULT_PUBLIC_KEY_PEM).expect("built-in public key is valid PEM")
    }
}
