//! # esflow
//!
//! Drives an Elasticsearch-compatible cluster through a full
//! integration-test workflow: connect, reset an index, generate a dataset,
//! load it one document at a time or in bulk, refresh, and verify that
//! searches and aggregations see exactly what was written.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use esflow::{DatasetGenerator, LoadMode, SearchClient, Workflow};
//!
//! # async fn demo() -> esflow::Result<()> {
//! esflow::init_tracing();
//!
//! // ELASTICSEARCH_HOST, ELASTICSEARCH_API_KEY, ...
//! let client = SearchClient::from_env()?;
//!
//! let report = Workflow::new(client, "test_index_2", DatasetGenerator::new(1000))
//!     .with_load_mode(LoadMode::Bulk)
//!     .run()
//!     .await?;
//! println!("{} checks passed", report.len());
//! # Ok(())
//! # }
//! ```
//!
//! The building blocks ([`SearchClient`], [`IndexLifecycle`], [`Loader`],
//! [`query`] builders and [`verify`] predicates) are public for callers that
//! need a different sequence.

pub mod client;
pub mod config;
pub mod dataset;
pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod query;
pub mod types;
pub mod verify;
pub mod workflow;

pub use client::{Refresh, SearchClient};
pub use config::{ApiKey, ClientConfig};
pub use dataset::{Dataset, DatasetGenerator, DatasetProfile, TimestampSpread};
pub use document::Document;
pub use error::{ErrorKind, EsflowError, Result};
pub use index::{Ensured, IndexDefinition, IndexLifecycle, ResetPolicy};
pub use loader::{BulkSummary, LoadMode, LoadReport, Loader};
pub use workflow::{QueryPlan, RunReport, Workflow};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber filtered by `RUST_LOG` (default `info`).
/// Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
