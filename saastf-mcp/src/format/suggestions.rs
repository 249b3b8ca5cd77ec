//! Alternative names offered when a subdomain is taken.

use chrono::{Datelike, Utc};

const ENV_SUFFIXES: [&str; 7] = ["dev", "prod", "staging", "test", "demo", "api", "app"];
const PREFIXES: [&str; 4] = ["my", "the", "get", "try"];

/// Up to `count` distinct alternatives to `name`, using the current year.
pub fn generate_suggestions(name: &str, count: usize) -> Vec<String> {
    suggestions_for_year(name, count, Utc::now().year())
}

/// Fills from environment suffixes, then year suffixes, numeric suffixes and
/// finally alternative prefixes, stopping once `count` is reached.
pub fn suggestions_for_year(name: &str, count: usize, year: i32) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(count + 2);

    for suffix in ENV_SUFFIXES {
        if candidates.len() >= count {
            break;
        }
        candidates.push(format!("{name}-{suffix}"));
    }

    if candidates.len() < count {
        candidates.push(format!("{name}-{year}"));
        candidates.push(format!("{name}{year}"));
    }

    for i in 1..=5 {
        if candidates.len() >= count {
            break;
        }
        candidates.push(format!("{name}{i}"));
    }

    for prefix in PREFIXES {
        if candidates.len() >= count {
            break;
        }
        candidates.push(format!("{prefix}-{name}"));
    }

    let mut unique = Vec::with_capacity(count);
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique.truncate(count);
    unique
}

/// `Try: a, b, or c`.
pub fn format_suggestions(suggestions: &[String]) -> String {
    match suggestions {
        [] => "No suggestions available".to_string(),
        [only] => format!("Try: {only}"),
        [init @ .., last] => format!("Try: {}, or {last}", init.join(", ")),
    }
}
