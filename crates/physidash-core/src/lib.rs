//! physidash core library
//!
//! Core functionality for physidash, a terminal dashboard over the JSON
//! document of PhysioNet dataset records curated by an external agent.
//!
//! # Architecture
//!
//! The backing document is the system of record; this crate never writes to
//! it. The refresh pipeline polls it, falls back to a local cached copy when
//! the source is unreachable, and feeds a single [`ViewState`] container
//! that the TUI and CLI render from.
//!
//! # Modules
//!
//! - `models`: the `DatasetRecord` data model
//! - `config`: application configuration
//! - `source`: document polling and refresh outcomes
//! - `cache`: local fallback copy of the document
//! - `export`: JSON/CSV/Markdown rendering
//! - `view`: derived view state and badges

pub mod cache;
pub mod config;
pub mod export;
pub mod models;
pub mod source;
pub mod view;

pub use cache::{CacheError, FallbackCache};
pub use config::{Config, CACHE_SLOT, DOCUMENT_PATH};
pub use export::ExportFormat;
pub use models::{DatasetRecord, NOT_SPECIFIED};
pub use source::{DocumentSource, FetchOutcome, RefreshOutcome, SourceError};
pub use view::{modality_badge, CompletenessClass, DataIndicator, ViewState};
