//! Small free functions shared by more than one module.

use std::fmt::Write;

/// Lowercase hex encoding, used for content hashes (map snapshot version,
/// graph cache fingerprint) where pulling in a dedicated hex crate would be
/// overkill for a handful of call sites.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, byte| {
        write!(acc, "{byte:02x}").expect("writing to a String never fails");
        acc
    })
}

/// Formats a duration in seconds as `H:MM:SS`, for the CLI demo.
pub fn format_duration_s(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}
