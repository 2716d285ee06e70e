use chrono::{DateTime, Utc};

use crate::analysis::domain::{
    DownloadStats, PackageMetadata, RepositoryStats, SeverityCounts, TrustScore,
    TrustScoreBreakdown, Vulnerability,
};

/// Raw maximum of the security dimension.
const SECURITY_MAX: f64 = 40.0;
/// Raw maximum of the maintenance dimension.
const MAINTENANCE_MAX: f64 = 25.0;
/// Raw maximum of the popularity dimension.
const POPULARITY_MAX: f64 = 20.0;
/// Raw maximum of the dependency dimension.
const DEPENDENCIES_MAX: f64 = 15.0;

/// Computes the composite trust score for one package.
///
/// Pure and deterministic: no I/O, and the clock is the `as_of` parameter
/// so identical inputs always produce identical output. Exposed at the
/// crate root so collaborators holding partial data (e.g. re-scoring after
/// a metadata refresh) can invoke it without re-fetching anything.
///
/// The four raw sub-scores are weighted 40/25/20/15 out of 100. The
/// breakdown reports each sub-score normalized to its own 0-100 scale and
/// rounded per field; breakdown values are per-dimension percentages and do
/// not sum to the composite.
pub fn calculate_trust_score(
    vulnerabilities: &[Vulnerability],
    metadata: &PackageMetadata,
    dependency_count: usize,
    repository_stats: Option<&RepositoryStats>,
    download_stats: Option<&DownloadStats>,
    as_of: DateTime<Utc>,
) -> TrustScore {
    let security = security_score(&SeverityCounts::tally(vulnerabilities));
    let maintenance = maintenance_score(metadata, repository_stats, as_of);
    let popularity = popularity_score(repository_stats, download_stats);
    let dependencies = dependency_score(dependency_count);

    let composite = (security + maintenance + popularity + dependencies)
        .round()
        .clamp(0.0, 100.0);

    TrustScore {
        score: composite as u8,
        breakdown: TrustScoreBreakdown {
            security: normalize(security, SECURITY_MAX),
            maintenance: normalize(maintenance, MAINTENANCE_MAX),
            popularity: normalize(popularity, POPULARITY_MAX),
            dependencies: normalize(dependencies, DEPENDENCIES_MAX),
        },
    }
}

/// Normalizes a raw sub-score to its own 0-100 percentage, rounded.
fn normalize(raw: f64, max: f64) -> u8 {
    (raw / max * 100.0).round() as u8
}

/// Security: start at 40, subtract 15 per critical, 10 per high, 5 per
/// medium advisory. Low-severity advisories do not subtract. Floors at 0
/// no matter how many advisories exist.
fn security_score(counts: &SeverityCounts) -> f64 {
    let penalty =
        15.0 * counts.critical as f64 + 10.0 * counts.high as f64 + 5.0 * counts.medium as f64;
    (SECURITY_MAX - penalty).clamp(0.0, SECURITY_MAX)
}

/// Maintenance: start at 25; subtract 15 if the last registry publish is
/// >= 730 days old, else 10 if >= 365, else 5 if >= 180 (largest threshold
/// met wins, not cumulative); add back 5 if the repository's last commit is
/// within 30 days. Missing dates adjust nothing.
fn maintenance_score(
    metadata: &PackageMetadata,
    repository_stats: Option<&RepositoryStats>,
    as_of: DateTime<Utc>,
) -> f64 {
    let mut score = MAINTENANCE_MAX;

    if let Some(last_publish) = metadata.last_publish {
        let days = (as_of - last_publish).num_days();
        if days >= 730 {
            score -= 15.0;
        } else if days >= 365 {
            score -= 10.0;
        } else if days >= 180 {
            score -= 5.0;
        }
    }

    if let Some(last_commit) = repository_stats.and_then(|stats| stats.last_commit) {
        if (as_of - last_commit).num_days() <= 30 {
            score += 5.0;
        }
    }

    score.clamp(0.0, MAINTENANCE_MAX)
}

/// Popularity: base 5, plus the single highest star bracket met, plus the
/// single highest monthly-download bracket met.
fn popularity_score(
    repository_stats: Option<&RepositoryStats>,
    download_stats: Option<&DownloadStats>,
) -> f64 {
    let mut score: f64 = 5.0;

    if let Some(stats) = repository_stats {
        score += match stats.stars {
            s if s > 10_000 => 8.0,
            s if s > 1_000 => 6.0,
            s if s > 100 => 4.0,
            s if s > 10 => 2.0,
            _ => 0.0,
        };
    }

    if let Some(last_month) = download_stats.and_then(|stats| stats.last_month) {
        score += match last_month {
            d if d > 1_000_000 => 7.0,
            d if d > 100_000 => 5.0,
            d if d > 10_000 => 3.0,
            d if d > 1_000 => 1.0,
            _ => 0.0,
        };
    }

    score.clamp(0.0, POPULARITY_MAX)
}

/// Dependencies: fewer direct dependencies score higher. A step function of
/// the count, not of dependency complexity.
fn dependency_score(count: usize) -> f64 {
    match count {
        c if c > 100 => 5.0,
        c if c > 50 => 10.0,
        c if c > 20 => 12.0,
        _ => 15.0,
    }
}
