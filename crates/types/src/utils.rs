//! Utility functions and helpers

use std::time::Duration;

/// Placeholder printed in place of secret material
pub const REDACTED: &str = "<redacted>";

/// Parse a duration literal such as `30s`, `15m`, `1h`, `7d` or a bare
/// number of seconds.
pub fn parse_duration_literal(literal: &str) -> Option<Duration> {
    let literal = literal.trim();
    if literal.is_empty() {
        return None;
    }

    let split = literal
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(literal.len());
    let (digits, unit) = literal.split_at(split);
    if digits.is_empty() {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let multiplier = match unit.trim() {
        "" | "s" | "sec" | "secs" => 1,
        "m" | "min" | "mins" => 60,
        "h" | "hr" | "hrs" => 60 * 60,
        "d" | "day" | "days" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => return None,
    };

    amount.checked_mul(multiplier).map(Duration::from_secs)
}

/// Mask a secret for display, keeping nothing of the original value
pub fn redact_secret(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        REDACTED.to_string()
    }
}

/// Check that a URL starts with one of the given schemes (`"http"` matches `http://...`)
pub fn has_scheme(url: &str, schemes: &[&str]) -> bool {
    schemes.iter().any(|scheme| {
        url.strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
            .map(|rest| !rest.is_empty())
            .unwrap_or(false)
    })
}
