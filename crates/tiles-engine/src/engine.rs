//! # Quotation Engine
//!
//! The two entry points the app calls. Everything pure lives in tiles-core
//! and tiles-render; this module coerces app records, logs what was
//! defaulted, and hands finished PDFs to a [`DocumentSink`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuotationEngine                                  │
//! │                                                                         │
//! │  "Process Order"                                                        │
//! │  HeaderRecord + [LineRecord]                                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  price_and_aggregate ──► price_record ──► aggregate ──► build_submission│
//! │        │                                                                │
//! │        ▼                                                                │
//! │  (OrderTotals, SubmissionPayload)                                       │
//! │                                                                         │
//! │  "Share PDF"  (holding a ShareTicket)                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  render_quotation_pdf ──► DocumentModelBuilder ──► render_document      │
//! │        │                                                 │              │
//! │        ▼                                                 ▼              │
//! │  DocumentSink::write("Quotation_<number>.pdf")     overflow warnings    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use tiles_core::{
    aggregate, build_submission, price_record, DocumentModelBuilder, HeaderRecord, LineItem,
    LineRecord, NumericCoercionWarning, OrderHeader, OrderTotals, QuotationDocument,
    SubmissionPayload,
};
use tiles_render::{render_document, LayoutSpec, RenderOptions};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::share::ShareTicket;
use crate::sink::{file_name_for, DocumentSink, FsDocumentSink};

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Prices orders and renders quotation PDFs.
///
/// Holds no per-order state, so one engine serves every order and can be
/// shared across tasks behind an `Arc`.
pub struct QuotationEngine {
    /// Engine configuration.
    config: Arc<EngineConfig>,

    /// Page layout derived from the configuration.
    layout: LayoutSpec,

    /// Where finished PDFs go.
    sink: Arc<dyn DocumentSink>,

    /// Local wall clock.
    clock: Clock,
}

impl QuotationEngine {
    /// Creates an engine writing PDFs into the configured cache directory.
    pub fn new(config: EngineConfig) -> Self {
        let sink = FsDocumentSink::new(config.cache_dir());
        Self::with_sink(config, Arc::new(sink))
    }

    /// Creates an engine writing PDFs to `sink`.
    pub fn with_sink(config: EngineConfig, sink: Arc<dyn DocumentSink>) -> Self {
        QuotationEngine {
            layout: config.layout_spec(),
            config: Arc::new(config),
            sink,
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    /// Replaces the local clock.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    // =========================================================================
    // Process Order
    // =========================================================================

    /// Prices the cart, totals it and builds the submission record.
    ///
    /// Unreadable numbers are defaulted and logged at `warn`; they never fail
    /// the call.
    ///
    /// ## Errors
    /// - `EngineError::Validation(EmptyCart)` for an empty cart
    /// - `EngineError::Submission` if the line details cannot be encoded
    pub fn price_and_aggregate(
        &self,
        header: &HeaderRecord,
        lines: &[LineRecord],
    ) -> EngineResult<(OrderTotals, SubmissionPayload)> {
        let header = coerce_header(header);
        let items = price_lines(lines);

        let totals = aggregate(&items, header.header_discount)?;
        let payload = build_submission(&header, &items, &totals, (self.clock)())?;

        info!(
            lines = items.len(),
            grand_total = %totals.grand_total,
            trans_type = payload.trans_type,
            "Order priced"
        );
        Ok((totals, payload))
    }

    // =========================================================================
    // Share PDF
    // =========================================================================

    /// Builds the printable document for an order.
    ///
    /// `totals` are printed as given; they are not recomputed from `lines`.
    ///
    /// ## Errors
    /// `EngineError::Validation(EmptyDocument)` when there are no lines.
    pub fn build_document(
        &self,
        header: &HeaderRecord,
        lines: &[LineRecord],
        totals: &OrderTotals,
    ) -> EngineResult<QuotationDocument> {
        let header = coerce_header(header);
        let items = price_lines(lines);
        Ok(self.document_builder().build(header, items, *totals)?)
    }

    /// Renders the quotation PDF and writes it to the sink.
    ///
    /// The ticket must have been issued for this order's number. Orders
    /// without a number get one synthesized from the clock and accept any
    /// ticket.
    ///
    /// ## Errors
    /// - `EngineError::TicketMismatch` when the ticket names another order
    /// - `EngineError::Validation(EmptyDocument)` when there are no lines
    /// - `EngineError::Overflow` when rows overflow and strict overflow is on
    /// - `EngineError::Serialization` when the page cannot be encoded
    /// - `EngineError::Sink` when the file cannot be written (retryable)
    pub async fn render_quotation_pdf(
        &self,
        ticket: &ShareTicket,
        header: &HeaderRecord,
        lines: &[LineRecord],
        totals: &OrderTotals,
    ) -> EngineResult<PathBuf> {
        let header = coerce_header(header);
        if let Some(number) = header.document_number() {
            if number != ticket.order_id() {
                return Err(EngineError::TicketMismatch {
                    ticket: ticket.order_id().to_string(),
                    document: number.to_string(),
                });
            }
        }

        let now = (self.clock)();
        let items = price_lines(lines);
        let doc = self.document_builder_at(now).build(header, items, *totals)?;

        let options = RenderOptions {
            strict_overflow: self.config.document.strict_overflow,
            created_at: Some(now),
        };
        let rendered = render_document(&doc, &self.layout, &options)?;
        for warning in &rendered.warnings {
            warn!(
                quotation = %doc.quotation_number(),
                rows = warning.rows,
                required = warning.required,
                available = warning.available,
                "Item table overflows the page"
            );
        }

        let file_name = file_name_for(doc.quotation_number());
        let path = self.sink.write(&file_name, &rendered.bytes).await?;

        info!(
            ?path,
            quotation = %doc.quotation_number(),
            ticket = %ticket.id(),
            bytes = rendered.bytes.len(),
            "Quotation PDF ready"
        );
        Ok(path)
    }

    fn document_builder(&self) -> DocumentModelBuilder {
        self.document_builder_at((self.clock)())
    }

    fn document_builder_at(&self, now: NaiveDateTime) -> DocumentModelBuilder {
        let builder = DocumentModelBuilder::new(now);
        match self.config.document.prepared_by {
            Some(ref name) => builder.default_prepared_by(name.clone()),
            None => builder,
        }
    }
}

// =============================================================================
// Record Coercion
// =============================================================================

fn coerce_header(record: &HeaderRecord) -> OrderHeader {
    let (header, warnings) = OrderHeader::from_record(record);
    log_coercions("header", &warnings);
    header
}

fn price_lines(records: &[LineRecord]) -> Vec<LineItem> {
    records
        .iter()
        .map(|record| {
            let (item, warnings) = price_record(record);
            log_coercions(&record.stock_id, &warnings);
            item
        })
        .collect()
}

fn log_coercions(source: &str, warnings: &[NumericCoercionWarning]) {
    for w in warnings {
        warn!(
            source = %source,
            field = %w.field,
            raw = %w.raw,
            fallback = w.fallback,
            "Unusable number replaced"
        );
    }
    if warnings.is_empty() {
        debug!(source = %source, "Record coerced cleanly");
    }
}
