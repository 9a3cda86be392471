use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::db::Database;

use super::summary::{
    filter_summaries, overview, sort_summaries, summarize_customer, CustomerTimingSummary,
    TimingsOverview,
};

/// Read-only reporting pipeline. Holds the last successfully applied
/// summary list; a refresh pass that fails or is superseded leaves it
/// untouched.
#[derive(Clone)]
pub struct ReportsController {
    db: Database,
    cache: Arc<Mutex<Vec<CustomerTimingSummary>>>,
    active: Arc<Mutex<CancellationToken>>,
}

impl ReportsController {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cache: Arc::new(Mutex::new(Vec::new())),
            active: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Recomputes every customer's summary from the store. Starting a new
    /// pass cancels any pass still in flight, so only the newest request
    /// can update the cached view.
    pub async fn refresh(&self) -> Result<Vec<CustomerTimingSummary>> {
        let token = {
            let mut guard = self.active.lock().await;
            guard.cancel();
            *guard = CancellationToken::new();
            guard.clone()
        };

        let customers = self
            .db
            .list_customers()
            .await
            .context("failed to load customers")?;

        let mut summaries = Vec::new();
        for customer in customers {
            if token.is_cancelled() {
                bail!("refresh superseded by a newer request");
            }

            let timings = self
                .db
                .get_step_timings_for_customer(&customer.id)
                .await
                .with_context(|| format!("failed to load timings for customer {}", customer.id))?;

            if let Some(summary) = summarize_customer(&customer, &timings) {
                summaries.push(summary);
            }
        }

        sort_summaries(&mut summaries);

        // A newer pass cancels this token before it touches the cache, so
        // checking under the cache lock makes "newest wins" deterministic.
        let mut cache = self.cache.lock().await;
        if token.is_cancelled() {
            bail!("refresh superseded by a newer request");
        }

        info!("Refreshed timing summaries for {} customers", summaries.len());

        *cache = summaries.clone();
        Ok(summaries)
    }

    pub async fn summaries(&self) -> Vec<CustomerTimingSummary> {
        self.cache.lock().await.clone()
    }

    /// Derives a filtered view over the cached rows; never refetches.
    pub async fn search(&self, term: &str) -> Vec<CustomerTimingSummary> {
        let cache = self.cache.lock().await;
        filter_summaries(&cache, term)
    }

    pub async fn overview(&self) -> TimingsOverview {
        let cache = self.cache.lock().await;
        overview(&cache)
    }
}
