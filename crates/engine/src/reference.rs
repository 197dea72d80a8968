//! Reference number generation.
//!
//! Reference numbers are the human-legible identifiers printed on statements,
//! distinct from the internal UUIDs. Each one is a timestamp component plus
//! 48 bits of random suffix, so collisions within the unique index are
//! negligible.

use chrono::Utc;
use uuid::Uuid;

/// Prefix for transfer reference numbers.
pub const TRANSFER_PREFIX: &str = "TXF";
/// Prefix for ledger entry reference numbers.
pub const LEDGER_PREFIX: &str = "TXN";

/// Generates a reference number: `{prefix}{YYYYmmddHHMMSS}{12 hex chars}`.
#[must_use]
pub fn generate(prefix: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let entropy = Uuid::new_v4().simple().to_string();
    // 12 hex chars = 48 bits of entropy.
    let suffix = entropy[..12].to_uppercase();
    format!("{prefix}{timestamp}{suffix}")
}
