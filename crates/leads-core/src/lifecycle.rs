//! Lead lifecycle engine
//!
//! Owns the creation de-duplication rule and the status state machine. This
//! is the only component that mutates a lead's status or appends to its
//! history.

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use leads_types::{CreateOutcome, HistoryEntry, HistoryEvent, Lead, LeadIntake, LeadStatus};

use crate::error::{LeadError, Result};
use crate::store::{LeadChanges, LeadRecord, LeadStore};

/// Origin tag stamped on every lead created from extracted document data
pub const LEAD_SOURCE: &str = "document_scan";

// Optional leading +, then 10 to 15 digits once separators are stripped
static PHONE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("invalid phone shape regex"));

pub struct LeadLifecycle {
    store: Arc<dyn LeadStore>,
}

impl LeadLifecycle {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self { store }
    }

    /// Create a lead from extracted document fields.
    ///
    /// The most recent non-archived lead with the same contact phone is
    /// canonical: when one exists it is returned untouched instead of
    /// writing a second record. The insert itself is an insert-or-skip
    /// against the store's uniqueness guard, so two concurrent creations
    /// for a brand-new contact cannot both land; the loser re-reads the
    /// canonical lead and reports it as already existing.
    pub async fn create(&self, intake: LeadIntake) -> Result<CreateOutcome> {
        validate_intake(&intake)?;
        let contact_phone = normalize_phone(&intake.contact_phone);

        if let Some(existing) = self.store.get_latest_active_by_contact(&contact_phone).await? {
            log::warn!(
                "lead already exists for contact {}: {}",
                contact_phone,
                existing.id
            );
            return Ok(CreateOutcome::AlreadyExists(existing));
        }

        let record = LeadRecord {
            name: intake.name,
            contact_phone: contact_phone.clone(),
            email: intake.email,
            current_provider: intake.current_provider,
            current_value: intake.current_value,
            proposed_value: intake.proposed_value,
            estimated_savings: intake.estimated_savings,
            beneficiary_ages: intake.beneficiary_ages,
            contract_type: intake.contract_type,
            notes: intake.notes,
            source: LEAD_SOURCE.to_string(),
            source_payload: intake.source_payload,
            status: LeadStatus::New,
            archived: false,
            history: Vec::new(),
        };

        match self.store.insert(record).await? {
            Some(lead) => {
                log::info!("lead created: {} - {}", lead.id, lead.name);
                Ok(CreateOutcome::Created(lead))
            }
            None => {
                // Lost the insert race; a concurrent caller wrote the row
                let existing = self
                    .store
                    .get_latest_active_by_contact(&contact_phone)
                    .await?
                    .ok_or_else(|| {
                        LeadError::Persistence(format!(
                            "insert skipped for contact {} but no canonical lead found",
                            contact_phone
                        ))
                    })?;
                log::warn!(
                    "concurrent create for contact {}, returning {}",
                    contact_phone,
                    existing.id
                );
                Ok(CreateOutcome::AlreadyExists(existing))
            }
        }
    }

    /// Move a lead to a new pipeline status, appending exactly one history
    /// entry.
    ///
    /// Archived leads accept no transitions and report `NotFound`. The
    /// status set is flat: any status may follow any other, including
    /// reopening a won or lost lead.
    pub async fn transition_status(
        &self,
        id: &str,
        new_status: LeadStatus,
        note: Option<String>,
    ) -> Result<Lead> {
        let lead = self
            .store
            .get_by_id(id)
            .await?
            .filter(|lead| !lead.archived)
            .ok_or_else(|| LeadError::NotFound(id.to_string()))?;

        let mut history = lead.history;
        history.push(HistoryEntry {
            timestamp: Utc::now(),
            event: HistoryEvent::StatusChange,
            previous_status: lead.status,
            new_status,
            note,
        });

        let changes = LeadChanges {
            status: Some(new_status),
            history: Some(history),
        };

        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| LeadError::NotFound(id.to_string()))?;

        log::info!("lead {} status: {} -> {}", id, lead.status, new_status);
        Ok(updated)
    }

    /// Archive a lead. Archival is a visibility flag, not a pipeline
    /// status, so no history entry is recorded. Returns `false` when the
    /// lead does not exist.
    pub async fn archive(&self, id: &str) -> Result<bool> {
        let archived = self.store.archive(id).await?;
        if archived {
            log::info!("lead archived: {}", id);
        }
        Ok(archived)
    }
}

/// Strip common separators so formatted numbers share one dedup key
fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

fn validate_intake(intake: &LeadIntake) -> Result<()> {
    if intake.name.trim().is_empty() {
        return Err(LeadError::Validation("name is required".to_string()));
    }

    let phone = normalize_phone(&intake.contact_phone);
    if !PHONE_SHAPE.is_match(&phone) {
        return Err(LeadError::Validation(format!(
            "contact phone must be 10 to 15 digits with an optional leading +: {}",
            intake.contact_phone
        )));
    }

    Ok(())
}
