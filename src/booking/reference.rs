//! Human-readable booking references: `PREFIX-<base36 millis>-<4 chars>`.

use chrono::{DateTime, Utc};

use crate::random::RandomSource;

pub const DEFAULT_PREFIX: &str = "TE";

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

/// Upper-case base-36 rendering of `n`
#[must_use]
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

pub fn generate_reference(prefix: &str, now: DateTime<Utc>, rng: &mut dyn RandomSource) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.below(0, 36) as usize]))
        .collect();
    format!("{prefix}-{}-{suffix}", to_base36(millis))
}
