//! Shared types for the lead pipeline engine

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sales lead tracked through the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub contact_phone: String,
    pub email: Option<String>,
    pub current_provider: Option<String>,
    pub current_value: Option<f64>,
    pub proposed_value: Option<f64>,
    pub estimated_savings: Option<f64>,
    #[serde(default)]
    pub beneficiary_ages: Vec<u32>,
    pub contract_type: Option<String>,
    pub notes: Option<String>,
    pub source: String,
    /// Raw extraction output, stored and returned verbatim
    #[serde(default)]
    pub source_payload: serde_json::Value,
    pub status: LeadStatus,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
}

/// Fixed set of pipeline statuses
///
/// The set is flat: any status may follow any other, including transitions
/// out of `Won`/`Lost` (reopened deals).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Negotiation,
    ProposalSent,
    Won,
    Lost,
    Paused,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Negotiation,
        LeadStatus::ProposalSent,
        LeadStatus::Won,
        LeadStatus::Lost,
        LeadStatus::Paused,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::ProposalSent => "proposal_sent",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
            LeadStatus::Paused => "paused",
        }
    }

    /// Parse a wire label, `None` for anything outside the set
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.label() == value)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of event recorded in a lead's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEvent {
    StatusChange,
}

/// One append-only audit record of a status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub event: HistoryEvent,
    pub previous_status: LeadStatus,
    pub new_status: LeadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Creation fields handed over by the document-extraction process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadIntake {
    pub name: String,
    pub contact_phone: String,
    pub email: Option<String>,
    pub current_provider: Option<String>,
    pub current_value: Option<f64>,
    pub proposed_value: Option<f64>,
    pub estimated_savings: Option<f64>,
    #[serde(default)]
    pub beneficiary_ages: Vec<u32>,
    pub contract_type: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub source_payload: serde_json::Value,
}

/// Result of a create call: a fresh lead, or the canonical existing one
/// when the contact phone already has a non-archived lead
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created(Lead),
    AlreadyExists(Lead),
}

impl CreateOutcome {
    pub fn lead(&self) -> &Lead {
        match self {
            CreateOutcome::Created(lead) | CreateOutcome::AlreadyExists(lead) => lead,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, CreateOutcome::AlreadyExists(_))
    }
}

/// One page of the lead listing
#[derive(Debug, Clone, Serialize)]
pub struct LeadPage {
    /// Number of items returned in this page
    pub total: usize,
    pub limit: u32,
    pub offset: u32,
    pub items: Vec<Lead>,
}

/// Single-row dashboard aggregate served by the store's precomputed view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_leads: i64,
    pub leads_today: i64,
    pub leads_this_week: i64,
    pub leads_this_month: i64,
    #[serde(default)]
    pub leads_by_status: BTreeMap<LeadStatus, i64>,
    pub total_estimated_savings: f64,
    pub avg_estimated_savings: f64,
    /// Won leads over all leads past intake (neither new nor paused)
    pub conversion_rate: f64,
}

/// Grouped lead counts by current provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderBreakdown {
    pub provider: String,
    pub lead_count: i64,
    pub total_current_value: f64,
    pub avg_estimated_savings: f64,
}

/// One sales-funnel row per status present in the data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelRow {
    pub status: LeadStatus,
    pub lead_count: i64,
    pub total_value: f64,
    pub percent_of_funnel: f64,
}
