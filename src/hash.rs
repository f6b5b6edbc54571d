//! Keyed hashing
//!
//! HMAC over the SHA-2 family, rendered as lowercase hex. Used both to verify
//! stored password hashes and as a general purpose keyed hash.

use hmac::Hmac;
use hmac::Mac;
use hmac::digest::KeyInit;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// HMAC algorithm selected by `hash_method`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashMethod {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl FromStr for HashMethod {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha224" => Ok(HashMethod::Sha224),
            "sha256" => Ok(HashMethod::Sha256),
            "sha384" => Ok(HashMethod::Sha384),
            "sha512" => Ok(HashMethod::Sha512),
            other => Err(AuthError::Config(format!("Unsupported hash_method: {}", other))),
        }
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashMethod::Sha224 => "sha224",
            HashMethod::Sha256 => "sha256",
            HashMethod::Sha384 => "sha384",
            HashMethod::Sha512 => "sha512",
        };
        f.write_str(name)
    }
}

/// Keyed hasher built from configuration
#[derive(Clone)]
pub struct Hasher {
    method: HashMethod,
    key: Option<String>,
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("method", &self.method)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Hasher {
    pub fn new(method: HashMethod, key: Option<String>) -> Self {
        Self { method, key }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self::new(config.hash_method.parse()?, config.hash_key.clone()))
    }

    pub fn method(&self) -> HashMethod {
        self.method
    }

    /// Compute the keyed hash of `input`.
    ///
    /// Fails with a configuration error when no `hash_key` is set.
    pub fn hash(&self, input: &str) -> Result<String, AuthError> {
        let key = self.key()?;
        let data = input.as_bytes();
        match self.method {
            HashMethod::Sha224 => hex_digest::<Hmac<Sha224>>(key, data),
            HashMethod::Sha256 => hex_digest::<Hmac<Sha256>>(key, data),
            HashMethod::Sha384 => hex_digest::<Hmac<Sha384>>(key, data),
            HashMethod::Sha512 => hex_digest::<Hmac<Sha512>>(key, data),
        }
    }

    /// Whether `expected` is exactly `hash(input)`, compared in constant time.
    ///
    /// Anything other than lowercase hex of the right length never matches.
    pub fn verify(&self, input: &str, expected: &str) -> Result<bool, AuthError> {
        let key = self.key()?;
        let tag = match hex::decode(expected) {
            Ok(tag) if hex::encode(&tag) == expected => tag,
            _ => return Ok(false),
        };

        let data = input.as_bytes();
        match self.method {
            HashMethod::Sha224 => verify_digest::<Hmac<Sha224>>(key, data, &tag),
            HashMethod::Sha256 => verify_digest::<Hmac<Sha256>>(key, data, &tag),
            HashMethod::Sha384 => verify_digest::<Hmac<Sha384>>(key, data, &tag),
            HashMethod::Sha512 => verify_digest::<Hmac<Sha512>>(key, data, &tag),
        }
    }

    fn key(&self) -> Result<&[u8], AuthError> {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key.as_bytes()),
            _ => Err(AuthError::Config(
                "A valid hash key must be set in your auth config".into(),
            )),
        }
    }
}

fn keyed_mac<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<M, AuthError> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|e| AuthError::Config(format!("Invalid hash key: {}", e)))?;
    mac.update(data);
    Ok(mac)
}

fn hex_digest<M: Mac + KeyInit>(key: &[u8], data: &[u8]) -> Result<String, AuthError> {
    Ok(hex::encode(keyed_mac::<M>(key, data)?.finalize().into_bytes()))
}

// verify_slice compares in constant time
fn verify_digest<M: Mac + KeyInit>(key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool, AuthError> {
    Ok(keyed_mac::<M>(key, data)?.verify_slice(tag).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_hmac_sha256_known_vector() {
        let hasher = Hasher::new(HashMethod::Sha256, Some("key".into()));
        assert_eq!(
            hasher.hash(FOX).unwrap(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_digest_lengths() {
        let cases = [
            (HashMethod::Sha224, 56),
            (HashMethod::Sha256, 64),
            (HashMethod::Sha384, 96),
            (HashMethod::Sha512, 128),
        ];
        for (method, len) in cases {
            let hasher = Hasher::new(method, Some("key".into()));
            let digest = hasher.hash("password").unwrap();
            assert_eq!(digest.len(), len, "{method}");
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_key_changes_output() {
        let a = Hasher::new(HashMethod::Sha256, Some("one".into()));
        let b = Hasher::new(HashMethod::Sha256, Some("two".into()));
        assert_ne!(a.hash("same").unwrap(), b.hash("same").unwrap());
    }

    #[test]
    fn test_missing_key_fails() {
        let unset = Hasher::new(HashMethod::Sha256, None);
        let empty = Hasher::new(HashMethod::Sha256, Some(String::new()));
        for input in ["", "password", FOX] {
            assert!(unset.hash(input).unwrap_err().is_config());
            assert!(empty.hash(input).unwrap_err().is_config());
        }
    }

    #[test]
    fn test_verify() {
        let hasher = Hasher::new(HashMethod::Sha256, Some("key".into()));
        let digest = hasher.hash("alice123").unwrap();

        assert!(hasher.verify("alice123", &digest).unwrap());
        assert!(!hasher.verify("alice124", &digest).unwrap());
        assert!(!hasher.verify("alice123", &digest.to_uppercase()).unwrap());
        assert!(!hasher.verify("alice123", &digest[..62]).unwrap());
        assert!(!hasher.verify("alice123", "not hex").unwrap());
        assert!(!hasher.verify("alice123", "").unwrap());
    }

    #[test]
    fn test_verify_matches_every_method() {
        for method in [HashMethod::Sha224, HashMethod::Sha384, HashMethod::Sha512] {
            let hasher = Hasher::new(method, Some("key".into()));
            let digest = hasher.hash("pw").unwrap();
            assert!(hasher.verify("pw", &digest).unwrap(), "{method}");
        }
    }

    #[test]
    fn test_verify_requires_key() {
        let hasher = Hasher::new(HashMethod::Sha256, None);
        assert!(hasher.verify("pw", "00").unwrap_err().is_config());
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("SHA512".parse::<HashMethod>().unwrap(), HashMethod::Sha512);
        assert_eq!(" sha224 ".parse::<HashMethod>().unwrap(), HashMethod::Sha224);
        assert!("md5".parse::<HashMethod>().unwrap_err().is_config());
    }

    #[test]
    fn test_debug_redacts_key() {
        let hasher = Hasher::new(HashMethod::Sha256, Some("top-secret".into()));
        assert!(!format!("{hasher:?}").contains("top-secret"));
    }
}
