use std::collections::HashSet;

use crate::analysis::domain::Vulnerability;

/// Merges advisory lists from multiple sources, deduplicating by advisory id.
///
/// Lists are consumed in argument order and each advisory is kept only on
/// first sight of its id. This makes the tie-break explicit: when two
/// sources report the same advisory, the earlier list's record wins all
/// metadata (title, description, severity) and later duplicates are
/// discarded. The set of included ids is independent of source order; only
/// which source "wins" a collision depends on it.
pub fn merge_advisories(sources: Vec<Vec<Vulnerability>>) -> Vec<Vulnerability> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for source in sources {
        for vulnerability in source {
            if seen.insert(vulnerability.id.clone()) {
                merged.push(vulnerability);
            }
        }
    }

    merged
}
