//! Lead Pipeline Core Library
//!
//! Lifecycle engine for sales leads produced by an external document
//! extraction process: creation de-duplication, the pipeline status state
//! machine with its append-only audit history, and read-only dashboard
//! aggregates, all over a hosted relational store reached through a narrow
//! repository contract.

pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod service;
pub mod store;

// Re-export main types for easy access
pub use config::{LeadsConfig, StoreConfig};
pub use error::{LeadError, Result};

pub use clients::SupabaseClient;
pub use lifecycle::LeadLifecycle;
pub use pipeline::PipelineAggregator;
pub use service::LeadService;
pub use store::{LeadChanges, LeadFilter, LeadRecord, LeadStore};
