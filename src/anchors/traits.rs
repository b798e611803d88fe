// Anchor source trait: the swap-ready abstraction for the suspicious-anchor list.
//
// Production runs read an uploaded CSV or fetch the shared sheet over HTTP;
// tests hand in a fixed list. The classifier only ever sees the resulting
// SuspiciousAnchorSet.

use anyhow::Result;
use async_trait::async_trait;

use super::SuspiciousAnchorSet;

/// A provider of suspicious anchor phrases. Implementations may do I/O, so
/// loading is async.
#[async_trait]
pub trait AnchorSource: Send + Sync {
    /// Human-readable description for logs ("anchors.csv", a URL, ...).
    fn describe(&self) -> String;

    /// Load the full phrase set.
    async fn load(&self) -> Result<SuspiciousAnchorSet>;
}
