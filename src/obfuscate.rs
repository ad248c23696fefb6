//! Reversible obfuscation of stored text.
//!
//! XORs the UTF-8 bytes with a repeating key and base64-encodes the result.
//! This hides a snapshot from a casual glance at the store and nothing more;
//! anyone holding the key (which ships with the binary) can reverse it.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{CgpaError, Result};

pub const DEFAULT_KEY: &str = "cgpa-calculator-secret-2024";

pub struct Obfuscator {
    key: Vec<u8>,
}

impl Obfuscator {
    pub fn new(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(CgpaError::InvalidInput(
                "obfuscation key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            key: key.as_bytes().to_vec(),
        })
    }

    pub fn obfuscate(&self, plain: &str) -> String {
        STANDARD.encode(self.xor(plain.as_bytes()))
    }

    pub fn reveal(&self, encoded: &str) -> Result<String> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CgpaError::Persistence(format!("obfuscated value is not base64: {e}")))?;
        String::from_utf8(self.xor(&bytes))
            .map_err(|e| CgpaError::Persistence(format!("obfuscated value is not UTF-8: {e}")))
    }

    fn xor(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}

impl Default for Obfuscator {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.as_bytes().to_vec(),
        }
    }
}
