//! Password Hashing and Verification
//!
//! Argon2id hashing with a self-describing encoded format:
//!
//! ```text
//! $argon2id$v=19$m=<memory KiB>,t=<iterations>,p=<parallelism>$<b64 salt>$<b64 digest>
//! ```
//!
//! Base64 segments use the standard alphabet without padding, which makes the
//! output identical to a PHC string produced by other Argon2 implementations.
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - Cost parameters are recorded per hash, so defaults can be raised
//!   without invalidating stored credentials
//! - Digest comparison runs in constant time
//! - Derived digests are zeroized on drop

use std::fmt;
use std::str::FromStr;

use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{constant_time_eq, from_base64, to_base64, try_random_bytes};

// ============================================================================
// Constants
// ============================================================================

/// Algorithm identifier written into every hash
pub const ALGORITHM_ID: &str = "argon2id";

/// The only Argon2 version this verifier accepts (0x13)
pub const SUPPORTED_VERSION: u32 = 19;

/// Segment separator
const DELIMITER: char = '$';

/// Leading empty segment + algorithm, version, params, salt, digest
const SEGMENT_COUNT: usize = 6;

/// Cost fields in the order they must appear
const COST_FIELDS: [&str; 3] = ["m", "t", "p"];

// ============================================================================
// Error Types
// ============================================================================

/// Password hashing/verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Entropy source or KDF failure while creating a hash
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Wrong number of segments or unknown algorithm
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// The embedded version is not the one this verifier implements
    #[error("Unsupported argon2 version: {found}")]
    UnsupportedVersion { found: u32 },

    /// A numeric field or base64 segment is malformed
    #[error("Malformed password hash: {0}")]
    Parse(String),
}

// ============================================================================
// Hash Parameters
// ============================================================================

/// KDF cost parameters, fixed at hash time and embedded in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParameters {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Time cost (passes over memory)
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
    /// Salt length in bytes
    pub salt_len: usize,
    /// Digest length in bytes
    pub digest_len: usize,
}

impl Default for HashParameters {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 2,
            salt_len: 16,
            digest_len: 32,
        }
    }
}

impl HashParameters {
    fn argon2(&self) -> Result<Argon2<'static>, argon2::Error> {
        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(self.digest_len),
        )?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Derive a digest of `digest_len` bytes
    fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, argon2::Error> {
        let mut out = Zeroizing::new(vec![0u8; self.digest_len]);
        self.argon2()?.hash_password_into(password, salt, &mut out)?;
        Ok(out)
    }
}

// ============================================================================
// Encoded Hash
// ============================================================================

/// A parsed `$argon2id$...` string
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash {
    pub params: HashParameters,
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${ALGORITHM_ID}$v={SUPPORTED_VERSION}$m={},t={},p={}${}${}",
            self.params.memory_kib,
            self.params.iterations,
            self.params.parallelism,
            to_base64(&self.salt),
            to_base64(&self.digest),
        )
    }
}

impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("params", &self.params)
            .field("digest", &"[HASH]")
            .finish()
    }
}

impl FromStr for EncodedHash {
    type Err = PasswordHashError;

    /// Segment layout and version are checked here; the rest of the PHC
    /// grammar is left to [`PasswordHash`].
    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = encoded.split(DELIMITER).collect();
        if segments.len() != SEGMENT_COUNT || !segments[0].is_empty() {
            return Err(PasswordHashError::InvalidHashFormat);
        }
        if segments[1] != ALGORITHM_ID {
            return Err(PasswordHashError::InvalidHashFormat);
        }

        let version: u32 = segments[2]
            .strip_prefix("v=")
            .ok_or_else(|| PasswordHashError::Parse("missing version field".to_string()))
            .and_then(|v| parse_number(v, "version"))?;
        if version != SUPPORTED_VERSION {
            return Err(PasswordHashError::UnsupportedVersion { found: version });
        }

        let phc =
            PasswordHash::new(encoded).map_err(|e| PasswordHashError::Parse(e.to_string()))?;
        let (memory_kib, iterations, parallelism) = parse_cost(&phc)?;

        let salt = phc
            .salt
            .ok_or_else(|| PasswordHashError::Parse("missing salt".to_string()))
            .and_then(|salt| {
                from_base64(salt.as_str())
                    .map_err(|e| PasswordHashError::Parse(format!("salt: {e}")))
            })?;
        let digest = phc
            .hash
            .ok_or_else(|| PasswordHashError::Parse("missing digest".to_string()))?
            .as_bytes()
            .to_vec();

        Ok(Self {
            params: HashParameters {
                memory_kib,
                iterations,
                parallelism,
                salt_len: salt.len(),
                digest_len: digest.len(),
            },
            salt,
            digest,
        })
    }
}

/// Read `m`, `t` and `p`, which must be the only cost fields, in that order
fn parse_cost(phc: &PasswordHash<'_>) -> Result<(u32, u32, u32), PasswordHashError> {
    let in_order = phc.params.iter().count() == COST_FIELDS.len()
        && phc
            .params
            .iter()
            .zip(COST_FIELDS)
            .all(|((ident, _), key)| ident.as_str() == key);
    if !in_order {
        return Err(PasswordHashError::Parse(format!(
            "expected cost fields m,t,p, got {}",
            phc.params
        )));
    }

    let field = |key: &str| -> Result<u32, PasswordHashError> {
        phc.params
            .get(key)
            .ok_or_else(|| PasswordHashError::Parse(format!("missing {key} field")))?
            .decimal()
            .map_err(|e| PasswordHashError::Parse(format!("{key}: {e}")))
    };

    Ok((field("m")?, field("t")?, field("p")?))
}

fn parse_number(value: &str, field: &str) -> Result<u32, PasswordHashError> {
    value
        .parse()
        .map_err(|e| PasswordHashError::Parse(format!("{field}: {e}")))
}

// ============================================================================
// Hasher
// ============================================================================

/// Stateless Argon2id hasher
///
/// ## Examples
/// ```rust
/// use platform::password::{HashParameters, PasswordHasher};
///
/// let hasher = PasswordHasher::new(HashParameters {
///     memory_kib: 1024,
///     iterations: 1,
///     ..HashParameters::default()
/// });
/// let encoded = hasher.hash("correct horse").unwrap();
/// assert!(hasher.verify("correct horse", &encoded).unwrap());
/// assert!(!hasher.verify("battery staple", &encoded).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    params: HashParameters,
}

impl PasswordHasher {
    pub fn new(params: HashParameters) -> Self {
        Self { params }
    }

    /// Parameters used for new hashes
    pub fn params(&self) -> &HashParameters {
        &self.params
    }

    /// Hash a plaintext password into the encoded format
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let salt = try_random_bytes(self.params.salt_len)
            .map_err(|e| PasswordHashError::Hashing(format!("entropy source: {e}")))?;

        let digest = self
            .params
            .derive(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::Hashing(e.to_string()))?;

        let encoded = EncodedHash {
            params: self.params,
            salt,
            digest: digest.to_vec(),
        };
        Ok(encoded.to_string())
    }

    /// Verify a plaintext against an encoded hash
    ///
    /// Derivation uses the parameters recorded in `encoded`, never
    /// `self.params`. A wrong password is `Ok(false)`, not an error.
    pub fn verify(&self, plaintext: &str, encoded: &str) -> Result<bool, PasswordHashError> {
        let stored: EncodedHash = encoded.parse()?;

        // Parameters that parse but that argon2 rejects (p=0, short salt) make
        // the stored string malformed rather than a failed hash attempt.
        let candidate = stored
            .params
            .derive(plaintext.as_bytes(), &stored.salt)
            .map_err(|e| PasswordHashError::Parse(e.to_string()))?;

        Ok(constant_time_eq(&candidate, &stored.digest))
    }

    /// True when `encoded` was produced with different cost parameters than
    /// the current ones (or cannot be parsed at all)
    pub fn needs_rehash(&self, encoded: &str) -> bool {
        match encoded.parse::<EncodedHash>() {
            Ok(stored) => {
                stored.params.memory_kib != self.params.memory_kib
                    || stored.params.iterations != self.params.iterations
                    || stored.params.parallelism != self.params.parallelism
                    || stored.params.salt_len != self.params.salt_len
                    || stored.params.digest_len != self.params.digest_len
            }
            Err(_) => true,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
