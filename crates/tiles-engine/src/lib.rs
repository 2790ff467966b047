//! # tiles-engine: Quotation Engine Entry Points
//!
//! The I/O shell of the Tiles quotation system. The app calls two things:
//!
//! - [`QuotationEngine::price_and_aggregate`] when the user taps
//!   "Process Order": totals plus the submission record.
//! - [`QuotationEngine::render_quotation_pdf`] when the user taps
//!   "Share PDF": a file in the cache directory, ready for the share sheet.
//!
//! ## Crate Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          tiles-engine                                   │
//! │                                                                         │
//! │  config.rs  ── EngineConfig: defaults → quotation.toml → TILES_* env    │
//! │  engine.rs  ── QuotationEngine: pricing + rendering entry points        │
//! │  share.rs   ── ShareDesk / ShareTicket: one share per order at a time   │
//! │  sink.rs    ── DocumentSink: where PDFs are written (tokio::fs, memory) │
//! │  error.rs   ── EngineError / SinkError                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```no_run
//! use tiles_engine::{init_tracing, EngineConfig, QuotationEngine, ShareDesk};
//! use tiles_core::{HeaderRecord, LineRecord};
//!
//! # async fn share(header: HeaderRecord, lines: Vec<LineRecord>) -> tiles_engine::EngineResult<()> {
//! init_tracing();
//! let engine = QuotationEngine::new(EngineConfig::load_or_default(None));
//! let desk = ShareDesk::new();
//!
//! let (totals, _payload) = engine.price_and_aggregate(&header, &lines)?;
//! let ticket = desk.try_acquire("1042")?;
//! let path = engine.render_quotation_pdf(&ticket, &header, &lines, &totals).await?;
//! println!("share {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod share;
pub mod sink;

pub use config::{CompanyConfig, DocumentConfig, EngineConfig, OutputConfig};
pub use engine::QuotationEngine;
pub use error::{EngineError, EngineResult, SinkError, SinkResult};
pub use share::{ShareDesk, ShareTicket};
pub use sink::{file_name_for, DocumentSink, FsDocumentSink, MemoryDocumentSink};

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Calling this again keeps the subscriber that
/// is already installed and says so at `debug`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tiles_engine=debug,tiles_render=debug"));

    if let Err(err) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        tracing::debug!(%err, "Tracing subscriber already installed");
    }
}
