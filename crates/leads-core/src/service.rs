//! Service facade consumed by the transport adapter

use std::sync::Arc;

use leads_types::{
    CreateOutcome, DashboardStats, FunnelRow, Lead, LeadIntake, LeadPage, LeadStatus,
};

use crate::error::{LeadError, Result};
use crate::lifecycle::LeadLifecycle;
use crate::pipeline::PipelineAggregator;
use crate::store::{LeadFilter, LeadStore};

pub const DEFAULT_PAGE_LIMIT: u32 = 50;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Composes the lifecycle engine and the aggregator behind the operations
/// the transport layer consumes. Holds one shared store handle, injected at
/// construction and reused by every request.
pub struct LeadService {
    lifecycle: LeadLifecycle,
    aggregator: PipelineAggregator,
    store: Arc<dyn LeadStore>,
}

impl LeadService {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self {
            lifecycle: LeadLifecycle::new(Arc::clone(&store)),
            aggregator: PipelineAggregator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Create a lead from extracted document data. A duplicate contact is a
    /// positive "already exists" outcome, not an error.
    pub async fn create_from_extraction(&self, intake: LeadIntake) -> Result<CreateOutcome> {
        self.lifecycle.create(intake).await
    }

    /// List non-archived leads, newest first.
    ///
    /// `limit` defaults to 50 and is clamped to 1..=100; a status filter
    /// outside the enumeration is rejected with `InvalidStatus`.
    pub async fn list(
        &self,
        status: Option<&str>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<LeadPage> {
        let status = match status {
            Some(value) => Some(parse_status(value)?),
            None => None,
        };
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);

        let filter = LeadFilter { status, limit, offset };
        let items = self.store.list(&filter).await?;

        Ok(LeadPage {
            total: items.len(),
            limit,
            offset,
            items,
        })
    }

    /// Fetch one lead by identifier. Archived leads stay fetchable here;
    /// only the lifecycle treats them as gone.
    pub async fn get_by_id(&self, id: &str) -> Result<Lead> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| LeadError::NotFound(id.to_string()))
    }

    /// Validate the target status against the enumeration, then delegate to
    /// the lifecycle. Parsing lives here so the transport hands over raw
    /// strings while the lifecycle only ever sees the closed enum.
    pub async fn change_status(
        &self,
        id: &str,
        new_status: &str,
        note: Option<String>,
    ) -> Result<Lead> {
        let status = parse_status(new_status)?;
        self.lifecycle.transition_status(id, status, note).await
    }

    /// The dashboard aggregate row, `None` when no statistics are available
    pub async fn dashboard_stats(&self) -> Result<Option<DashboardStats>> {
        self.aggregator.dashboard_stats().await
    }

    /// The sales funnel rows
    pub async fn sales_funnel(&self) -> Result<Vec<FunnelRow>> {
        self.aggregator.funnel().await
    }
}

fn parse_status(value: &str) -> Result<LeadStatus> {
    LeadStatus::parse(value).ok_or_else(|| LeadError::InvalidStatus(value.to_string()))
}
