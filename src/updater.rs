//! The update engine: read cache, fetch IP, compare, update.

use crate::cache::IpCache;
use crate::detector::IpSource;
use crate::error::Result;
use crate::webfaction::DnsApi;

/// Whether the fetched address requires a DNS update.
///
/// An absent cache always differs, so the first run forces an update.
/// Comparison is exact string equality with no normalization.
pub fn ip_addresses_differ(cached: Option<&str>, fetched: &str) -> bool {
    cached != Some(fetched)
}

/// Outcome of one update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The fetched address matches the cache; nothing was touched.
    Unchanged { current: String },
    /// The remote record was replaced and the cache rewritten.
    Updated {
        previous: Option<String>,
        current: String,
    },
}

/// One-shot DDNS updater with injected collaborators.
pub struct DdnsUpdater {
    cache: IpCache,
    source: Box<dyn IpSource>,
    dns: Box<dyn DnsApi>,
    domain: String,
}

impl DdnsUpdater {
    /// Assemble an updater for a single domain.
    pub fn new(
        cache: IpCache,
        source: Box<dyn IpSource>,
        dns: Box<dyn DnsApi>,
        domain: String,
    ) -> Self {
        Self {
            cache,
            source,
            dns,
            domain,
        }
    }

    /// Run the read → fetch → compare → update sequence once.
    ///
    /// The cache is only rewritten after the remote replace succeeded;
    /// on any failure it keeps its pre-run contents so the next run
    /// retries the update.
    pub async fn run(&self) -> Result<UpdateOutcome> {
        let cached = self.cache.load()?;
        let fetched = self.source.fetch().await?;

        if !ip_addresses_differ(cached.as_deref(), &fetched) {
            tracing::info!(domain = %self.domain, ip = %fetched, "IP address unchanged");
            return Ok(UpdateOutcome::Unchanged { current: fetched });
        }

        tracing::info!(
            domain = %self.domain,
            previous = cached.as_deref().unwrap_or("none"),
            current = %fetched,
            "IP address changed, replacing DNS override"
        );

        self.dns.replace_override(&self.domain, &fetched).await?;
        self.cache.store(&fetched)?;

        Ok(UpdateOutcome::Updated {
            previous: cached,
            current: fetched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::MockIpSource;
    use crate::error::DdnsError;
    use crate::webfaction::MockDnsApi;
    use tempfile::{tempdir, TempDir};

    #[test]
    fn test_absent_cache_differs() {
        assert!(ip_addresses_differ(None, "203.0.113.5"));
    }

    #[test]
    fn test_equal_addresses_do_not_differ() {
        assert!(!ip_addresses_differ(Some("203.0.113.5"), "203.0.113.5"));
    }

    #[test]
    fn test_different_addresses_differ() {
        assert!(ip_addresses_differ(Some("203.0.113.5"), "198.51.100.9"));
    }

    fn cache_in(dir: &TempDir) -> IpCache {
        IpCache::new(dir.path().join("current-ip"))
    }

    fn source_returning(ip: &str) -> Box<MockIpSource> {
        let ip = ip.to_string();
        let mut source = MockIpSource::new();
        source.expect_fetch().returning(move || Ok(ip.clone()));
        Box::new(source)
    }

    #[tokio::test]
    async fn test_first_run_updates_and_writes_cache() {
        let dir = tempdir().unwrap();

        let mut dns = MockDnsApi::new();
        dns.expect_replace_override()
            .withf(|domain, ip| domain == "host.example.com" && ip == "203.0.113.5")
            .times(1)
            .returning(|_, _| Ok(()));

        let updater = DdnsUpdater::new(
            cache_in(&dir),
            source_returning("203.0.113.5"),
            Box::new(dns),
            "host.example.com".to_string(),
        );

        let outcome = updater.run().await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                previous: None,
                current: "203.0.113.5".to_string(),
            }
        );

        let content = std::fs::read_to_string(dir.path().join("current-ip")).unwrap();
        assert_eq!(content, "203.0.113.5\n");
    }

    #[tokio::test]
    async fn test_unchanged_ip_makes_no_remote_call() {
        let dir = tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.store("203.0.113.5").unwrap();

        let mut dns = MockDnsApi::new();
        dns.expect_replace_override().times(0);

        let updater = DdnsUpdater::new(
            cache,
            source_returning("203.0.113.5"),
            Box::new(dns),
            "host.example.com".to_string(),
        );

        let outcome = updater.run().await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Unchanged {
                current: "203.0.113.5".to_string(),
            }
        );

        // Cache file untouched.
        let content = std::fs::read_to_string(dir.path().join("current-ip")).unwrap();
        assert_eq!(content, "203.0.113.5\n");
    }

    #[tokio::test]
    async fn test_changed_ip_replaces_record_and_cache() {
        let dir = tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.store("203.0.113.5").unwrap();

        let mut dns = MockDnsApi::new();
        dns.expect_replace_override()
            .withf(|_, ip| ip == "198.51.100.9")
            .times(1)
            .returning(|_, _| Ok(()));

        let updater = DdnsUpdater::new(
            cache,
            source_returning("198.51.100.9"),
            Box::new(dns),
            "host.example.com".to_string(),
        );

        let outcome = updater.run().await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                previous: Some("203.0.113.5".to_string()),
                current: "198.51.100.9".to_string(),
            }
        );

        let content = std::fs::read_to_string(dir.path().join("current-ip")).unwrap();
        assert_eq!(content, "198.51.100.9\n");
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_cache_untouched() {
        let dir = tempdir().unwrap();
        let cache = cache_in(&dir);
        cache.store("203.0.113.5").unwrap();

        let mut dns = MockDnsApi::new();
        dns.expect_replace_override().times(1).returning(|_, _| {
            Err(DdnsError::Api {
                method: "login".to_string(),
                message: "Invalid username or password".to_string(),
            })
        });

        let updater = DdnsUpdater::new(
            cache,
            source_returning("198.51.100.9"),
            Box::new(dns),
            "host.example.com".to_string(),
        );

        let result = updater.run().await;
        assert!(result.is_err());

        let content = std::fs::read_to_string(dir.path().join("current-ip")).unwrap();
        assert_eq!(content, "203.0.113.5\n");
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let dir = tempdir().unwrap();

        let mut dns = MockDnsApi::new();
        dns.expect_replace_override()
            .times(1)
            .returning(|_, _| Ok(()));

        let updater = DdnsUpdater::new(
            cache_in(&dir),
            source_returning("203.0.113.5"),
            Box::new(dns),
            "host.example.com".to_string(),
        );

        // First run updates (stale cache), second run sees no change.
        assert!(matches!(
            updater.run().await.unwrap(),
            UpdateOutcome::Updated { .. }
        ));
        assert!(matches!(
            updater.run().await.unwrap(),
            UpdateOutcome::Unchanged { .. }
        ));
    }
}
