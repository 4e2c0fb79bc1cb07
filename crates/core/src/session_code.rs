//! Live session join codes.
//!
//! Codes look like `PCKL-7B2Q`: two groups of four characters drawn from an
//! alphabet without the easily confused `I`, `O`, `0` and `1`. Codes are
//! compared case-insensitively, so every lookup normalizes to uppercase
//! before touching the database.

use std::future::Future;

use rand::Rng;

use crate::error::CoreError;

/// Characters a code may contain.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Characters per group (a code has two groups).
pub const CODE_GROUP_LEN: usize = 4;

/// Separator between the two groups.
pub const CODE_SEPARATOR: char = '-';

/// Length of a full code including the separator. Input fields cap at this.
pub const CODE_DISPLAY_LEN: usize = CODE_GROUP_LEN * 2 + 1;

/// Maximum number of candidate codes tried before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 20;

/// Generate a random code using the thread-local RNG.
pub fn generate_code() -> String {
    generate_code_with(&mut rand::rng())
}

/// Generate a random code from the given RNG.
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(CODE_DISPLAY_LEN);
    for i in 0..CODE_GROUP_LEN * 2 {
        if i == CODE_GROUP_LEN {
            code.push(CODE_SEPARATOR);
        }
        let idx = rng.random_range(0..CODE_ALPHABET.len());
        code.push(char::from(CODE_ALPHABET[idx]));
    }
    code
}

/// Canonical form used for storage and lookup: trimmed and uppercased.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Normalize user-typed input the way the code field does: trimmed,
/// uppercased, and capped at [`CODE_DISPLAY_LEN`] characters.
pub fn normalize_code_input(input: &str) -> String {
    normalize_code(input).chars().take(CODE_DISPLAY_LEN).collect()
}

/// Whether `code` has the exact shape of a generated code.
pub fn is_well_formed(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != CODE_DISPLAY_LEN {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| {
        if i == CODE_GROUP_LEN {
            *b == CODE_SEPARATOR as u8
        } else {
            CODE_ALPHABET.contains(b)
        }
    })
}

/// Run `attempt` with fresh candidate codes until it yields a value.
///
/// `attempt` returns `Ok(None)` when the candidate collided with an existing
/// code. After [`MAX_CODE_ATTEMPTS`] collisions this fails with
/// [`CoreError::Internal`]; a duplicate is never returned.
pub async fn with_unique_code<T, E, F, Fut>(mut attempt: F) -> Result<T, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    E: From<CoreError>,
{
    for _ in 0..MAX_CODE_ATTEMPTS {
        if let Some(value) = attempt(generate_code()).await? {
            return Ok(value);
        }
    }
    Err(CoreError::Internal("Could not generate a unique session code".into()).into())
}
