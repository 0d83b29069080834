//! Narrow persistence contract the engine depends on

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use leads_types::{
    DashboardStats, FunnelRow, HistoryEntry, Lead, LeadStatus, ProviderBreakdown,
};

use crate::error::Result;

/// Row handed to the store for insertion; the store assigns `id` and
/// `created_at`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub name: String,
    pub contact_phone: String,
    pub email: Option<String>,
    pub current_provider: Option<String>,
    pub current_value: Option<f64>,
    pub proposed_value: Option<f64>,
    pub estimated_savings: Option<f64>,
    pub beneficiary_ages: Vec<u32>,
    pub contract_type: Option<String>,
    pub notes: Option<String>,
    pub source: String,
    pub source_payload: Value,
    pub status: LeadStatus,
    pub archived: bool,
    pub history: Vec<HistoryEntry>,
}

/// Mutable-field subset for partial updates
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeadChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
}

/// Filter and pagination window for listings
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub limit: u32,
    pub offset: u32,
}

/// Storage abstraction so the lifecycle and aggregator can be exercised in
/// isolation. Implemented by the hosted-store adapter and injected as a
/// single process-wide shared handle.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert one record. `Ok(None)` means the store's uniqueness guard on
    /// (contact_phone, non-archived) skipped the row.
    async fn insert(&self, record: LeadRecord) -> Result<Option<Lead>>;

    /// Fetch by identifier. Archived rows are returned; callers apply their
    /// own visibility rules.
    async fn get_by_id(&self, id: &str) -> Result<Option<Lead>>;

    /// Newest non-archived lead with this contact phone.
    async fn get_latest_active_by_contact(&self, contact_phone: &str) -> Result<Option<Lead>>;

    /// Non-archived leads, newest created first.
    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>>;

    /// Partial update; `None` when no row matched the identifier.
    async fn update(&self, id: &str, changes: &LeadChanges) -> Result<Option<Lead>>;

    /// Mark archived; `false` when the lead does not exist.
    async fn archive(&self, id: &str) -> Result<bool>;

    /// Single-row dashboard aggregate; `None` when the view has no row.
    async fn dashboard_stats(&self) -> Result<Option<DashboardStats>>;

    /// Grouped counts by current provider.
    async fn leads_by_provider(&self) -> Result<Vec<ProviderBreakdown>>;

    /// One funnel row per status present in the data.
    async fn sales_funnel(&self) -> Result<Vec<FunnelRow>>;
}
