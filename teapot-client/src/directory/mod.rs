/*
    Directory - one-shot file listings.

    `DirectoryLister` fetches a listing once, with a long timeout and no retry,
    and turns it into a `Listing`: rows of links, the empty indicator, or the
    failure indicator. Link rules live in `resource_link`.
*/

mod listing;
mod resource;

pub use listing::{Listing, ListingRow, EMPTY_INDICATOR, FAILED_INDICATOR};
pub use resource::{resource_link, Resource, ResourceKind};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::client::Fetch;
use crate::config::DirectoryConfig;
use crate::metrics;

pub struct DirectoryLister<F: ?Sized> {
    fetcher: Arc<F>,
    timeout: Duration,
}

impl<F: Fetch + ?Sized> DirectoryLister<F> {
    pub fn new(fetcher: Arc<F>, config: &DirectoryConfig) -> Self {
        Self {
            fetcher,
            timeout: config.timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch `url` and decode it, building links for `user` when given
    pub async fn list(&self, url: &str, user: Option<&str>) -> Listing {
        let request = self.fetcher.fetch(url, self.timeout);
        let listing = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(body)) => Listing::from_body(&body, user),
            Ok(Err(e)) => {
                debug!(url = %url, error = %e, "Directory listing failed");
                Listing::Failed
            }
            Err(_) => {
                debug!(url = %url, "Directory listing timed out");
                Listing::Failed
            }
        };

        info!(url = %url, outcome = listing.outcome(), "Directory listed");
        metrics::record_listing(listing.outcome());
        listing
    }
}
