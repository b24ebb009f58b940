//! Static domain-to-shop mapping
//!
//! The domain map is loaded once from configuration and is immutable until
//! an explicit reload. Lookups are case-insensitive and exact-match only;
//! there is no wildcard or suffix matching. Which shop a domain maps to is
//! purely structural configuration, never derived from shop data.

use tracing::warn;

/// Ordered, normalized domain → shop-slug table.
#[derive(Debug, Clone, Default)]
pub struct DomainMap {
    /// Declaration order, kept for introspection and reload diffing.
    entries: Vec<(String, String)>,
}

impl DomainMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(domain, slug)` pairs. Domains are normalized; on a
    /// duplicate domain the first declaration wins and the rest are
    /// dropped with a warning.
    pub fn from_pairs<I, D, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, S)>,
        D: Into<String>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (domain, slug) in pairs {
            map.insert(domain.into(), slug.into());
        }
        map
    }

    pub fn insert(&mut self, domain: impl Into<String>, slug: impl Into<String>) {
        let domain = normalize_host(&domain.into());
        let slug = slug.into();
        if self.entries.iter().any(|(d, _)| d == &domain) {
            warn!(domain = %domain, slug = %slug, "duplicate domain mapping ignored");
            return;
        }
        self.entries.push((domain, slug));
    }

    /// Exact lookup of a raw host header value.
    pub fn lookup(&self, host: &str) -> Option<&str> {
        let normalized = normalize_host(host);
        self.entries
            .iter()
            .find(|(domain, _)| domain == &normalized)
            .map(|(_, slug)| slug.as_str())
    }

    /// Mapped domains in declaration order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(domain, _)| domain.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercase the host and strip any port suffix.
///
/// Bracketed IPv6 hosts keep their brackets so they stay exact-match keys.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = if let Some(end) = host.strip_prefix('[').and(host.find(']')) {
        &host[..=end]
    } else {
        host.split(':').next().unwrap_or(host)
    };
    without_port.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DomainMap {
        DomainMap::from_pairs([
            ("knihy.example", "knihy"),
            ("www.knihy.example", "knihy"),
            ("hracky.example", "hracky"),
        ])
    }

    #[test]
    fn test_exact_lookup() {
        let map = sample();
        assert_eq!(map.lookup("knihy.example"), Some("knihy"));
        assert_eq!(map.lookup("hracky.example"), Some("hracky"));
        assert_eq!(map.lookup("unknown.example"), None);
    }

    #[test]
    fn test_case_insensitive() {
        let map = sample();
        assert_eq!(map.lookup("KNIHY.Example"), Some("knihy"));
    }

    #[test]
    fn test_port_stripped() {
        let map = sample();
        assert_eq!(map.lookup("knihy.example:8080"), Some("knihy"));
    }

    #[test]
    fn test_no_partial_matching() {
        let map = sample();
        assert_eq!(map.lookup("sub.knihy.example"), None);
        assert_eq!(map.lookup("knihy"), None);
    }

    #[test]
    fn test_duplicate_first_wins() {
        let map = DomainMap::from_pairs([("knihy.example", "first"), ("KNIHY.EXAMPLE", "second")]);
        assert_eq!(map.lookup("knihy.example"), Some("first"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_normalize_host_ipv6() {
        assert_eq!(normalize_host("[::1]:8080"), "[::1]");
        assert_eq!(normalize_host("127.0.0.1:8080"), "127.0.0.1");
        assert_eq!(normalize_host("Example.COM"), "example.com");
    }
}
