//! Browser locale matching.
//!
//! # Responsibilities
//! - Parse `Accept-Language` into an ordered preference list
//! - Score preferences against the registry (exact, then language-only)
//! - Pick the best candidate with a deterministic tie-break
//!
//! # Design Decisions
//! - Header weights are not re-sorted; header order is priority
//! - Empty entries (`fr,,en`) keep their position, so `n` counts them
//! - Exact matches score `1 - i/n`, language-only matches `0.999 - i/n`
//! - Equal scores prefer the longer (more specific) locale code

use std::cmp::Ordering;

use crate::locale::registry::{primary_subtag, LocaleRegistry};

/// Split an `Accept-Language` header into tags, dropping `;q=` weights.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    if header.trim().is_empty() {
        return Vec::new();
    }
    header
        .split(',')
        .filter_map(|tag| tag.split(';').next())
        .map(|tag| tag.trim().to_string())
        .collect()
}

/// Candidate produced by one matching pass.
#[derive(Debug, Clone, PartialEq)]
struct MatchScore {
    code: String,
    score: f64,
}

/// Find the configured locale code that best matches `preferences`.
pub fn match_browser_locale<S: AsRef<str>>(
    locales: &LocaleRegistry,
    preferences: &[S],
) -> Option<String> {
    let total = preferences.len() as f64;
    let mut matched: Vec<MatchScore> = Vec::with_capacity(2);

    // Exact tag
    for (index, preference) in preferences.iter().enumerate() {
        let preference = preference.as_ref();
        if let Some(locale) = locales.iter().find(|l| l.tag().eq_ignore_ascii_case(preference)) {
            matched.push(MatchScore {
                code: locale.code.clone(),
                score: 1.0 - index as f64 / total,
            });
            break;
        }
    }

    // Language only
    for (index, preference) in preferences.iter().enumerate() {
        let language = primary_subtag(preference.as_ref());
        if let Some(locale) = locales.iter().find(|l| l.language().eq_ignore_ascii_case(language)) {
            matched.push(MatchScore {
                code: locale.code.clone(),
                score: 0.999 - index as f64 / total,
            });
            break;
        }
    }

    best_candidate(matched)
}

fn best_candidate(mut matched: Vec<MatchScore>) -> Option<String> {
    matched.sort_by(|a, b| {
        if a.score == b.score {
            b.code.len().cmp(&a.code.len())
        } else {
            b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
        }
    });

    matched.into_iter().next().map(|m| m.code)
}
