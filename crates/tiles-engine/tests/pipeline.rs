//! End-to-end runs of both entry points against real sinks.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use lopdf::Document;
use serde_json::json;
use tiles_core::{HeaderRecord, LineRecord, Money, ValidationError};
use tiles_engine::{
    EngineConfig, EngineError, FsDocumentSink, MemoryDocumentSink, QuotationEngine, ShareDesk,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 3)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn line(discount: i64) -> LineRecord {
    serde_json::from_value(json!({
        "stock_id": "803-1333",
        "description": "Glossy Tile 12x12",
        "box": 2,
        "pec": "3",
        "packing": "10",
        "unit_price": 500,
        "text1": discount
    }))
    .unwrap()
}

fn header(trans_no: &str) -> HeaderRecord {
    serde_json::from_value(json!({
        "name": "Ali Traders",
        "phone": "0300-1234567",
        "venue": "I-9 Markaz",
        "type": "Quotation",
        "trans_no": trans_no,
        "salesman": "Usman",
        "so_advance": "1,000"
    }))
    .unwrap()
}

fn memory_engine(config: EngineConfig) -> (QuotationEngine, MemoryDocumentSink) {
    let sink = MemoryDocumentSink::new();
    let engine = QuotationEngine::with_sink(config, Arc::new(sink.clone())).with_clock(now);
    (engine, sink)
}

/// Parses a rendered quotation, checks it is one A4 page and returns the
/// page text.
fn pdf_text(bytes: &[u8]) -> String {
    assert!(bytes.starts_with(b"%PDF-"));
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let media_box: Vec<f32> = doc
        .get_dictionary(pages[&1])
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap())
        .collect();
    for (actual, expected) in media_box.iter().zip([0.0, 0.0, 595.28, 841.89]) {
        assert!((actual - expected).abs() < 0.01, "MediaBox {media_box:?}");
    }
    assert_eq!(media_box.len(), 4);

    doc.extract_text(&[1]).unwrap()
}

fn raw_line(fields: serde_json::Value) -> LineRecord {
    serde_json::from_value(fields).unwrap()
}

#[test]
fn test_scenario_plain_line() {
    let (engine, _) = memory_engine(EngineConfig::default());
    let (totals, payload) = engine
        .price_and_aggregate(&header("1042"), &[line(0)])
        .unwrap();

    assert_eq!(totals.subtotal.format_grouped(), "25,000.00");
    assert_eq!(totals.grand_total.format_grouped(), "25,000.00");
    assert_eq!(payload.party_name, "Ali Traders");
    assert_eq!(payload.so_advance, "1000.00");
    assert_eq!(payload.function_date, "2024-07-03");
    assert_eq!(payload.trans_type, 32);

    let details: serde_json::Value = serde_json::from_str(&payload.sales_order_details).unwrap();
    assert_eq!(details.as_array().unwrap().len(), 1);
}

#[test]
fn test_scenario_discounted_line() {
    let (engine, _) = memory_engine(EngineConfig::default());
    let (totals, payload) = engine
        .price_and_aggregate(&header("1042"), &[line(50)])
        .unwrap();

    assert_eq!(totals.grand_total.format_grouped(), "22,500.00");
    assert_eq!(payload.total, "22500.00");
}

#[test]
fn test_scenario_empty_cart() {
    let (engine, sink) = memory_engine(EngineConfig::default());
    let err = engine.price_and_aggregate(&header("1042"), &[]).unwrap_err();

    assert!(matches!(err, EngineError::Validation(ValidationError::EmptyCart)));
    assert_eq!(err.title(), "Cart Empty");
    assert!(sink.is_empty());
}

#[test]
fn test_huge_counts_are_clamped_not_overflowed() {
    let (engine, _) = memory_engine(EngineConfig::default());
    let huge = raw_line(json!({
        "stock_id": "803-1333",
        "description": "Glossy Tile 12x12",
        "box": "1e19",
        "pec": "3",
        "packing": "10",
        "unit_price": 500
    }));

    let (totals, _) = engine
        .price_and_aggregate(&header("1042"), &[huge.clone(), huge])
        .unwrap();
    assert_eq!(totals.total_boxes, 2_000_000);
    assert!(totals.grand_total > Money::zero());
}

#[test]
fn test_huge_unit_price_keeps_total_positive() {
    let (engine, _) = memory_engine(EngineConfig::default());
    let pricey = raw_line(json!({
        "stock_id": "803-1333",
        "description": "Glossy Tile 12x12",
        "box": 2,
        "pec": 3,
        "packing": 10,
        "unit_price": "1e18"
    }));

    let (totals, payload) = engine
        .price_and_aggregate(&header("1042"), &[pricey])
        .unwrap();
    assert_eq!(totals.grand_total, Money::from_rupees(50_000_000_000_000));
    assert_eq!(payload.total, "50000000000000.00");
}

#[tokio::test]
async fn test_share_writes_pdf_to_cache_dir() {
    let dir = tempfile::tempdir().unwrap();
    let engine = QuotationEngine::with_sink(
        EngineConfig::default(),
        Arc::new(FsDocumentSink::new(dir.path().join("quotes"))),
    )
    .with_clock(now);
    let desk = ShareDesk::new();

    let header = header("1042");
    let lines = [line(50)];
    let (totals, _) = engine.price_and_aggregate(&header, &lines).unwrap();

    let ticket = desk.try_acquire("1042").unwrap();
    let path = engine
        .render_quotation_pdf(&ticket, &header, &lines, &totals)
        .await
        .unwrap();
    drop(ticket);

    assert_eq!(path, dir.path().join("quotes").join("Quotation_1042.pdf"));
    let text = pdf_text(&std::fs::read(&path).unwrap());
    assert!(text.contains("Ali Traders"));
    assert!(text.contains("22,500.00"));
    assert!(text.contains("Amount in words: Twenty Two Thousand Five Hundred Only"));
    assert!(!desk.is_in_flight("1042"));
}

#[tokio::test]
async fn test_second_share_is_refused_while_first_runs() {
    let (engine, sink) = memory_engine(EngineConfig::default());
    let desk = ShareDesk::new();

    let first = desk.try_acquire("1042").unwrap();
    let err = desk.try_acquire("1042").unwrap_err();
    assert!(matches!(err, EngineError::ShareInFlight { .. }));

    let header = header("1042");
    let (totals, _) = engine.price_and_aggregate(&header, &[line(0)]).unwrap();
    engine
        .render_quotation_pdf(&first, &header, &[line(0)], &totals)
        .await
        .unwrap();
    drop(first);

    let again = desk.try_acquire("1042").unwrap();
    engine
        .render_quotation_pdf(&again, &header, &[line(0)], &totals)
        .await
        .unwrap();
    assert_eq!(sink.names(), vec!["Quotation_1042.pdf".to_string()]);
}

#[tokio::test]
async fn test_overflow_warns_by_default_and_fails_when_strict() {
    let lines: Vec<LineRecord> = (0..80).map(|_| line(0)).collect();

    let (engine, sink) = memory_engine(EngineConfig::default());
    let desk = ShareDesk::new();
    let header = header("2001");
    let (totals, _) = engine.price_and_aggregate(&header, &lines).unwrap();

    let ticket = desk.try_acquire("2001").unwrap();
    let path = engine
        .render_quotation_pdf(&ticket, &header, &lines, &totals)
        .await
        .unwrap();
    assert_eq!(path, PathBuf::from("Quotation_2001.pdf"));
    assert_eq!(sink.len(), 1);

    let mut strict = EngineConfig::default();
    strict.document.strict_overflow = true;
    let (engine, sink) = memory_engine(strict);
    let err = engine
        .render_quotation_pdf(&ticket, &header, &lines, &totals)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Overflow(w) if w.rows == 80));
    assert!(!err.is_retryable());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_document_without_number_uses_clock() {
    let (engine, sink) = memory_engine(EngineConfig::default());
    let desk = ShareDesk::new();
    let header: HeaderRecord = serde_json::from_value(json!({ "customer_name": "" })).unwrap();
    let (totals, _) = engine.price_and_aggregate(&header, &[line(0)]).unwrap();

    let ticket = desk.try_acquire("draft").unwrap();
    let path = engine
        .render_quotation_pdf(&ticket, &header, &[line(0)], &totals)
        .await
        .unwrap();

    assert_eq!(path, PathBuf::from("Quotation_Q20240703103000000.pdf"));
    let text = pdf_text(&sink.get("Quotation_Q20240703103000000.pdf").unwrap());
    assert!(text.contains("N/A"));
    assert!(text.contains("03/07/2024"));
}

#[tokio::test]
async fn test_empty_document_is_rejected() {
    let (engine, sink) = memory_engine(EngineConfig::default());
    let desk = ShareDesk::new();
    let (totals, _) = engine
        .price_and_aggregate(&header("1042"), &[line(0)])
        .unwrap();

    let ticket = desk.try_acquire("1042").unwrap();
    let err = engine
        .render_quotation_pdf(&ticket, &header("1042"), &[], &totals)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(ValidationError::EmptyDocument)));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_engines_run_concurrently() {
    let (engine, sink) = memory_engine(EngineConfig::default());
    let engine = Arc::new(engine);
    let desk = ShareDesk::new();

    let tasks: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let desk = desk.clone();
            tokio::spawn(async move {
                let number = format!("30{i}");
                let header = header(&number);
                let lines = vec![line(i * 10)];
                let (totals, _) = engine.price_and_aggregate(&header, &lines)?;
                let ticket = desk.try_acquire(number)?;
                engine
                    .render_quotation_pdf(&ticket, &header, &lines, &totals)
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(sink.len(), 4);
}
