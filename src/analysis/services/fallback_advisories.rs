use crate::analysis::domain::{Severity, Vulnerability};

/// Static offline advisory table for a handful of well-known packages.
///
/// Consulted only when both live advisory sources returned nothing (whether
/// "no advisories" or "unreachable" — the two are indistinguishable by
/// design at this point). Keyed by exact package name; entries are returned
/// verbatim.
pub fn fallback_advisories(package_name: &str) -> Vec<Vulnerability> {
    match package_name {
        "lodash" => vec![Vulnerability::new(
            "CVE-2019-10744".to_string(),
            Severity::Critical,
            "Prototype pollution in lodash".to_string(),
            "Versions of lodash before 4.17.12 are vulnerable to prototype pollution via defaultsDeep, allowing the addition or modification of Object prototype properties.".to_string(),
        )
        .with_cvss(9.1)
        .with_fixed_in("4.17.12")],
        "minimist" => vec![Vulnerability::new(
            "CVE-2020-7598".to_string(),
            Severity::Medium,
            "Prototype pollution in minimist".to_string(),
            "minimist before 1.2.2 can be tricked into adding or modifying properties of Object.prototype via a constructor or __proto__ payload.".to_string(),
        )
        .with_cvss(5.6)
        .with_fixed_in("1.2.2")],
        "event-stream" => vec![Vulnerability::new(
            "NPM-EVENT-STREAM-2018".to_string(),
            Severity::Critical,
            "Malicious flatmap-stream dependency".to_string(),
            "event-stream 3.3.6 depended on the malicious flatmap-stream package, which targeted cryptocurrency wallets.".to_string(),
        )
        .with_fixed_in("4.0.0")],
        "requests" => vec![Vulnerability::new(
            "CVE-2018-18074".to_string(),
            Severity::High,
            "Credential leak on redirect in requests".to_string(),
            "The requests package before 2.20.0 sends an HTTP Authorization header to an http URI upon receiving a same-hostname https-to-http redirect.".to_string(),
        )
        .with_cvss(7.5)
        .with_fixed_in("2.20.0")],
        "urllib3" => vec![Vulnerability::new(
            "CVE-2021-33503".to_string(),
            Severity::High,
            "Catastrophic backtracking in urllib3 URL parsing".to_string(),
            "urllib3 before 1.26.5 can suffer denial of service via catastrophic regular-expression backtracking when parsing a URL with many @ characters in the authority component.".to_string(),
        )
        .with_cvss(7.5)
        .with_fixed_in("1.26.5")],
        "nginx" => vec![Vulnerability::new(
            "CVE-2021-23017".to_string(),
            Severity::High,
            "Off-by-one in the nginx DNS resolver".to_string(),
            "A one-byte memory overwrite in the nginx resolver can be triggered by a crafted DNS response when the resolver directive is configured, potentially leading to worker process crash or code execution.".to_string(),
        )
        .with_cvss(7.7)
        .with_fixed_in("1.21.0")],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_package_returns_entries() {
        let entries = fallback_advisories("lodash");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "CVE-2019-10744");
        assert_eq!(entries[0].severity, Severity::Critical);
        assert_eq!(entries[0].fixed_in.as_deref(), Some("4.17.12"));
    }

    #[test]
    fn test_unknown_package_returns_empty_not_null() {
        assert!(fallback_advisories("definitely-not-a-real-package").is_empty());
    }

    #[test]
    fn test_lookup_is_exact_match() {
        assert!(fallback_advisories("Lodash").is_empty());
        assert!(fallback_advisories("lodash ").is_empty());
    }

    #[test]
    fn test_entries_are_verbatim_across_calls() {
        assert_eq!(fallback_advisories("requests"), fallback_advisories("requests"));
    }
}
