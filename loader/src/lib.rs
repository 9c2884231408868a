//! # Product Loader - bulk product creation from CSV
//!
//! Reads `products.csv` (no header, six positional columns) and creates one
//! record per row in the products collection, one request at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ products.csv │────▶│   Source    │────▶│    Models    │────▶│  HTTP Sink   │
//! │  (6 fields)  │     │ (csv rows)  │     │ (JSON record)│     │ (POST each)  │
//! └──────────────┘     └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use product_loader::{submit_all, CsvSource, HttpSink, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = Settings::default();
//!     let source = CsvSource::open(&settings.input_path).unwrap();
//!     let sink = HttpSink::from_settings(&settings).unwrap();
//!     let report = submit_all(source, &sink, &mut std::io::stdout()).await.unwrap();
//!     println!("Submitted {} products", report.submitted);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Row and product record
//! - [`source`] - CSV row source
//! - [`sink`] - Record sinks (HTTP)
//! - [`submit`] - Submission loop
//! - [`config`] - Run settings
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Input
pub mod source;

// Output
pub mod sink;

// Orchestration
pub mod submit;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    RecordError,
    SinkError,
    SourceError,
    SubmitError,
    SubmitResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{ProductRecord, Row, PRICE_BY_WEIGHT_FLAG, ROW_WIDTH};

// =============================================================================
// Re-exports - Source and Sink
// =============================================================================

pub use source::{parse_rows, CsvSource};
pub use sink::{HttpSink, RecordSink, SinkResponse};

// =============================================================================
// Re-exports - Submission
// =============================================================================

pub use submit::{preview_all, submit_all, SubmitReport};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{Settings, INPUT_PATH, PRODUCTS_ENDPOINT};
