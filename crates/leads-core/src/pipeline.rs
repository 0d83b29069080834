//! Read-only aggregate views for the dashboard

use std::sync::Arc;

use leads_types::{DashboardStats, FunnelRow, ProviderBreakdown};

use crate::error::Result;
use crate::store::LeadStore;

/// Produces dashboard counts and funnel views.
///
/// The store serves these as precomputed relational views; nothing is
/// recomputed from raw rows here, the aggregate rows are forwarded as-is.
pub struct PipelineAggregator {
    store: Arc<dyn LeadStore>,
}

impl PipelineAggregator {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    /// The single dashboard aggregate row, `None` when the view is empty
    pub async fn dashboard_stats(&self) -> Result<Option<DashboardStats>> {
        self.store.dashboard_stats().await
    }

    /// Lead counts grouped by current provider
    pub async fn by_provider(&self) -> Result<Vec<ProviderBreakdown>> {
        self.store.leads_by_provider().await
    }

    /// One funnel row per status present in the data
    pub async fn funnel(&self) -> Result<Vec<FunnelRow>> {
        self.store.sales_funnel().await
    }
}
