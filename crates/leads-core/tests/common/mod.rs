//! Shared in-memory store used by the integration tests
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use leads_core::error::{LeadError, Result};
use leads_core::store::{LeadChanges, LeadFilter, LeadRecord, LeadStore};
use leads_types::{DashboardStats, FunnelRow, Lead, ProviderBreakdown};

/// In-memory `LeadStore` with the same visible semantics as the hosted
/// store: id and created_at assignment on insert, newest-first ordering,
/// archived-row filtering, and the (contact_phone, non-archived) insert
/// guard. Failure injection covers the persistence error paths.
#[derive(Default)]
pub struct MemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
    stats: Mutex<Option<DashboardStats>>,
    providers: Mutex<Vec<ProviderBreakdown>>,
    funnel: Mutex<Vec<FunnelRow>>,
    fail_next: Mutex<Option<String>>,
    miss_next_contact_lookup: Mutex<bool>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next store call fail with `Persistence`
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// Make the next contact lookup miss, simulating the window in which a
    /// concurrent creation has not landed yet
    pub fn miss_next_contact_lookup(&self) {
        *self.miss_next_contact_lookup.lock().unwrap() = true;
    }

    pub fn set_stats(&self, stats: DashboardStats) {
        *self.stats.lock().unwrap() = Some(stats);
    }

    pub fn set_providers(&self, rows: Vec<ProviderBreakdown>) {
        *self.providers.lock().unwrap() = rows;
    }

    pub fn set_funnel(&self, rows: Vec<FunnelRow>) {
        *self.funnel.lock().unwrap() = rows;
    }

    pub fn lead_count(&self) -> usize {
        self.leads.lock().unwrap().len()
    }

    pub fn count_for_contact(&self, contact_phone: &str) -> usize {
        self.leads
            .lock()
            .unwrap()
            .iter()
            .filter(|lead| lead.contact_phone == contact_phone)
            .count()
    }

    fn take_failure(&self) -> Result<()> {
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(LeadError::Persistence(message));
        }
        Ok(())
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn insert(&self, record: LeadRecord) -> Result<Option<Lead>> {
        self.take_failure()?;
        let mut leads = self.leads.lock().unwrap();

        let conflict = leads
            .iter()
            .any(|lead| !lead.archived && lead.contact_phone == record.contact_phone);
        if conflict {
            return Ok(None);
        }

        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            name: record.name,
            contact_phone: record.contact_phone,
            email: record.email,
            current_provider: record.current_provider,
            current_value: record.current_value,
            proposed_value: record.proposed_value,
            estimated_savings: record.estimated_savings,
            beneficiary_ages: record.beneficiary_ages,
            contract_type: record.contract_type,
            notes: record.notes,
            source: record.source,
            source_payload: record.source_payload,
            status: record.status,
            archived: record.archived,
            history: record.history,
            created_at: Utc::now(),
        };
        leads.push(lead.clone());
        Ok(Some(lead))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Lead>> {
        self.take_failure()?;
        let leads = self.leads.lock().unwrap();
        Ok(leads.iter().find(|lead| lead.id == id).cloned())
    }

    async fn get_latest_active_by_contact(&self, contact_phone: &str) -> Result<Option<Lead>> {
        self.take_failure()?;

        let mut miss = self.miss_next_contact_lookup.lock().unwrap();
        if *miss {
            *miss = false;
            return Ok(None);
        }
        drop(miss);

        let leads = self.leads.lock().unwrap();
        Ok(leads
            .iter()
            .rev()
            .find(|lead| !lead.archived && lead.contact_phone == contact_phone)
            .cloned())
    }

    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>> {
        self.take_failure()?;
        let leads = self.leads.lock().unwrap();

        Ok(leads
            .iter()
            .rev()
            .filter(|lead| !lead.archived)
            .filter(|lead| filter.status.map_or(true, |status| lead.status == status))
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, changes: &LeadChanges) -> Result<Option<Lead>> {
        self.take_failure()?;
        let mut leads = self.leads.lock().unwrap();

        let lead = match leads.iter_mut().find(|lead| lead.id == id) {
            Some(lead) => lead,
            None => return Ok(None),
        };
        if let Some(status) = changes.status {
            lead.status = status;
        }
        if let Some(history) = &changes.history {
            lead.history = history.clone();
        }
        Ok(Some(lead.clone()))
    }

    async fn archive(&self, id: &str) -> Result<bool> {
        self.take_failure()?;
        let mut leads = self.leads.lock().unwrap();

        match leads.iter_mut().find(|lead| lead.id == id) {
            Some(lead) => {
                lead.archived = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn dashboard_stats(&self) -> Result<Option<DashboardStats>> {
        self.take_failure()?;
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn leads_by_provider(&self) -> Result<Vec<ProviderBreakdown>> {
        self.take_failure()?;
        Ok(self.providers.lock().unwrap().clone())
    }

    async fn sales_funnel(&self) -> Result<Vec<FunnelRow>> {
        self.take_failure()?;
        Ok(self.funnel.lock().unwrap().clone())
    }
}

/// Minimal intake for tests; callers override fields as needed
pub fn intake(name: &str, contact_phone: &str) -> leads_types::LeadIntake {
    leads_types::LeadIntake {
        name: name.to_string(),
        contact_phone: contact_phone.to_string(),
        ..Default::default()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
