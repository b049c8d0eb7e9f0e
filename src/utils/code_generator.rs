//! Short code generation.
//!
//! Codes are drawn uniformly from the 62-character alphabet `A-Z a-z 0-9`.
//! Entropy comes from an injected [`RandomSource`] so callers can substitute
//! deterministic sources in tests.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::MAX_CODE_LENGTH;
use crate::error::AppError;

/// Characters a generated code may contain.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Bytes at or above this value are discarded to keep the mapping onto the
/// alphabet unbiased (248 = 4 * 62).
const REJECTION_THRESHOLD: u8 = 248;

/// Source of random bytes.
pub trait RandomSource: Send + Sync {
    /// Fills `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
        getrandom::fill(buf).map_err(|e| {
            AppError::internal(
                "Random source failure",
                json!({ "reason": e.to_string() }),
            )
        })
    }
}

/// Generates random short codes.
#[derive(Clone)]
pub struct CodeGenerator {
    source: Arc<dyn RandomSource>,
}

impl CodeGenerator {
    pub fn new(source: Arc<dyn RandomSource>) -> Self {
        Self { source }
    }

    /// Generator backed by the operating system CSPRNG.
    pub fn secure() -> Self {
        Self::new(Arc::new(OsRandom))
    }

    /// Generates a code of exactly `length` alphanumeric characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `length` is 0 or above
    /// [`MAX_CODE_LENGTH`]. Returns [`AppError::Internal`] if the random
    /// source fails.
    pub fn generate(&self, length: usize) -> Result<String, AppError> {
        if length == 0 || length > MAX_CODE_LENGTH {
            return Err(AppError::invalid_input(
                format!("Code length must be between 1 and {MAX_CODE_LENGTH}"),
                json!({ "length": length }),
            ));
        }

        let mut code = String::with_capacity(length);
        // Roughly 3% of bytes are rejected, so one extra chunk is usually enough.
        let mut buffer = [0u8; MAX_CODE_LENGTH * 2];

        while code.len() < length {
            self.source.fill(&mut buffer)?;

            for &byte in &buffer {
                if byte >= REJECTION_THRESHOLD {
                    continue;
                }
                code.push(ALPHABET[usize::from(byte) % ALPHABET.len()] as char);
                if code.len() == length {
                    break;
                }
            }
        }

        Ok(code)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::secure()
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator").finish_non_exhaustive()
    }
}
