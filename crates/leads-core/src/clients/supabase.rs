//! Supabase adapter for the lead store
//!
//! Speaks the PostgREST wire protocol of the hosted relational store: row
//! filters as `column=eq.value` query parameters, `Prefer` headers for
//! returning representations, and plain `GET`s against the precomputed
//! aggregate views. Built once at process start and shared by all requests.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::json;

use leads_types::{DashboardStats, FunnelRow, Lead, ProviderBreakdown};

use crate::config::{LeadsConfig, StoreConfig};
use crate::error::{LeadError, Result};
use crate::store::{LeadChanges, LeadFilter, LeadRecord, LeadStore};

const LEADS_TABLE: &str = "leads";
const DASHBOARD_VIEW: &str = "dashboard_stats";
const PROVIDER_VIEW: &str = "leads_by_provider";
const FUNNEL_VIEW: &str = "sales_funnel";

/// Hosted-store adapter implementing the lead store contract.
///
/// When the process was started without store configuration the adapter is
/// disconnected and every operation fails fast with `NotConnected` instead
/// of attempting and failing per call.
pub struct SupabaseClient {
    connection: Option<Connection>,
}

struct Connection {
    base_url: String,
    api_key: String,
    http: HttpClient,
}

impl SupabaseClient {
    pub fn new(config: &LeadsConfig) -> Self {
        match &config.supabase {
            Some(store) => Self::connect(store),
            None => {
                log::warn!("lead store not configured, running disconnected");
                Self { connection: None }
            }
        }
    }

    fn connect(config: &StoreConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        log::info!("lead store connected: {}", config.base_url);

        Self {
            connection: Some(Connection {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
                http,
            }),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(LeadError::NotConnected)
    }
}

impl Connection {
    fn rest_url(&self, relation: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, relation)
    }

    fn get(&self, relation: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(self.rest_url(relation)))
    }

    fn post(&self, relation: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.post(self.rest_url(relation)))
    }

    fn patch(&self, relation: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.patch(self.rest_url(relation)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send the request and decode the JSON row set, folding transport and
    /// decode failures into `Persistence`
    async fn rows<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Vec<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| LeadError::Persistence(format!("{}: request failed: {}", context, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("{} failed (status {}): {}", context, status, body);
            return Err(LeadError::Persistence(format!(
                "{} failed (status {}): {}",
                context, status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LeadError::Persistence(format!("{}: failed to read response: {}", context, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| LeadError::Persistence(format!("{}: failed to parse response: {}", context, e)))
    }
}

#[async_trait]
impl LeadStore for SupabaseClient {
    async fn insert(&self, record: LeadRecord) -> Result<Option<Lead>> {
        let conn = self.connection()?;

        // ignore-duplicates rides the partial unique index on
        // (contact_phone) WHERE NOT archived: a conflicting row comes back
        // as an empty representation instead of an error
        let request = conn
            .post(LEADS_TABLE)
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(&record);

        let rows: Vec<Lead> = conn.rows(request, "insert lead").await?;
        Ok(rows.into_iter().next())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Lead>> {
        let conn = self.connection()?;

        let request = conn
            .get(LEADS_TABLE)
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())]);

        let rows: Vec<Lead> = conn.rows(request, "get lead by id").await?;
        Ok(rows.into_iter().next())
    }

    async fn get_latest_active_by_contact(&self, contact_phone: &str) -> Result<Option<Lead>> {
        let conn = self.connection()?;

        let request = conn.get(LEADS_TABLE).query(&[
            ("select", "*".to_string()),
            ("contact_phone", format!("eq.{}", contact_phone)),
            ("archived", "eq.false".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", "1".to_string()),
        ]);

        let rows: Vec<Lead> = conn.rows(request, "get lead by contact").await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>> {
        let conn = self.connection()?;

        let mut params = vec![
            ("select", "*".to_string()),
            ("archived", "eq.false".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", filter.limit.to_string()),
            ("offset", filter.offset.to_string()),
        ];
        if let Some(status) = filter.status {
            params.push(("status", format!("eq.{}", status.label())));
        }

        log::debug!("listing leads: {:?}", params);

        let request = conn.get(LEADS_TABLE).query(&params);
        conn.rows(request, "list leads").await
    }

    async fn update(&self, id: &str, changes: &LeadChanges) -> Result<Option<Lead>> {
        let conn = self.connection()?;

        let request = conn
            .patch(LEADS_TABLE)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(changes);

        let rows: Vec<Lead> = conn.rows(request, "update lead").await?;
        Ok(rows.into_iter().next())
    }

    async fn archive(&self, id: &str) -> Result<bool> {
        let conn = self.connection()?;

        let request = conn
            .patch(LEADS_TABLE)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&json!({ "archived": true }));

        let rows: Vec<Lead> = conn.rows(request, "archive lead").await?;
        Ok(!rows.is_empty())
    }

    async fn dashboard_stats(&self) -> Result<Option<DashboardStats>> {
        let conn = self.connection()?;

        let request = conn.get(DASHBOARD_VIEW).query(&[("select", "*")]);
        let rows: Vec<DashboardStats> = conn.rows(request, "dashboard stats").await?;
        Ok(rows.into_iter().next())
    }

    async fn leads_by_provider(&self) -> Result<Vec<ProviderBreakdown>> {
        let conn = self.connection()?;

        let request = conn.get(PROVIDER_VIEW).query(&[("select", "*")]);
        conn.rows(request, "leads by provider").await
    }

    async fn sales_funnel(&self) -> Result<Vec<FunnelRow>> {
        let conn = self.connection()?;

        let request = conn.get(FUNNEL_VIEW).query(&[("select", "*")]);
        conn.rows(request, "sales funnel").await
    }
}
