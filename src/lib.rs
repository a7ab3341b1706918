//! # webfaction-ddns
//!
//! Keeps a DNS A record pointing at a host with a dynamic IP address.
//!
//! Each run compares the locally cached IP address against the one
//! reported by an external lookup service. If they differ, the domain's
//! override record is replaced through the WebFaction XML-RPC API and
//! the cache is rewritten. All existing override records for the domain
//! are deleted before the new one is created.
//!
//! ## Usage
//!
//! Intended to run from a periodic scheduler, e.g. a cron entry firing
//! twice a day:
//!
//! ```bash
//! 0 0,12 * * * webfaction-ddns -d host.example.com -u USERNAME -p PASSWORD >/dev/null
//! ```

pub mod cache;
pub mod detector;
pub mod error;
pub mod updater;
pub mod webfaction;

pub use cache::IpCache;
pub use detector::{IpFetcher, IpSource};
pub use error::{DdnsError, Result};
pub use updater::{DdnsUpdater, UpdateOutcome};
pub use webfaction::{DnsApi, WebfactionClient};
