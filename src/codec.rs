//! CSV import/export for trade records.
//!
//! The export writes 16 canonical columns; the importer matches headers
//! case-insensitively in any order, tolerates malformed rows (collecting
//! them as row errors instead of failing the whole file), and recomputes
//! P/L from the parsed economics rather than trusting the file's own P/L
//! columns.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{JournalError, Result};
use crate::models::{Conviction, TradeKind, TradeRecord};

/// Canonical export column order. The importer only requires the six
/// economic/date columns; everything else is optional.
pub const CSV_HEADERS: [&str; 16] = [
    "ID",
    "Symbol",
    "Type",
    "Entry Price",
    "Exit Price",
    "Quantity",
    "Entry Date",
    "Exit Date",
    "Strategy",
    "Tags",
    "Conviction",
    "P/L",
    "P/L %",
    "Notes",
    "URLs",
    "Created At",
];

const REQUIRED_HEADERS: [&str; 6] = [
    "symbol",
    "entry price",
    "exit price",
    "quantity",
    "entry date",
    "exit date",
];

/// Outcome of a tolerant CSV import: the rows that parsed, plus one message
/// per row that was skipped.
#[derive(Debug, Clone)]
pub struct CsvImport {
    pub trades: Vec<TradeRecord>,
    pub row_errors: Vec<String>,
}

/// Serialize trades to CSV text. Zero trades is a no-op condition surfaced
/// as [`JournalError::EmptyExport`] rather than a header-only file.
pub fn export_trades_to_csv(trades: &[TradeRecord]) -> Result<String> {
    if trades.is_empty() {
        return Err(JournalError::EmptyExport);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for trade in trades {
        let exit_price = trade.exit_price.map(format_number).unwrap_or_default();
        writer.write_record([
            trade.id.as_str(),
            trade.symbol.as_str(),
            trade.kind.as_str(),
            format_number(trade.entry_price).as_str(),
            exit_price.as_str(),
            format_number(trade.quantity).as_str(),
            trade.entry_date.as_deref().unwrap_or(""),
            trade.exit_date.as_deref().unwrap_or(""),
            trade.strategy.as_str(),
            trade.tags.join(", ").as_str(),
            trade.conviction.as_str(),
            format_number(trade.pnl).as_str(),
            trade.pnl_percent.as_str(),
            trade.notes.as_str(),
            trade.urls.join("; ").as_str(),
            trade.created_at.to_rfc3339().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| JournalError::InvalidInput(e.to_string()))
}

/// Parse CSV text into trade records.
///
/// Header problems abort the import; row problems skip the row and continue.
/// Row numbers in error messages are 1-based with the header as row 1.
/// `now` stamps synthesized ids and missing creation timestamps.
pub fn import_trades_from_csv(text: &str, now: DateTime<Utc>) -> Result<CsvImport> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    let headers = reader.headers()?.clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect();

    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(JournalError::MissingColumns(missing));
    }

    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut row_errors: Vec<String> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (idx, record) in reader.records().enumerate() {
        let row = idx + 2;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("CSV import: row {} unreadable: {}", row, e);
                row_errors.push(format!("Row {}: {}", row, e));
                continue;
            }
        };

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let symbol = field(&record, &columns, "symbol");
        let entry_price = parse_finite(field(&record, &columns, "entry price"));
        let exit_price = parse_finite(field(&record, &columns, "exit price"));
        let quantity = parse_finite(field(&record, &columns, "quantity"));
        let entry_date = field(&record, &columns, "entry date");
        let exit_date = field(&record, &columns, "exit date");

        if symbol.is_empty()
            || entry_price.is_none()
            || exit_price.is_none()
            || quantity.is_none()
            || entry_date.is_empty()
            || exit_date.is_empty()
        {
            log::warn!("CSV import: row {} missing required fields", row);
            row_errors.push(format!("Row {}: Missing required fields", row));
            continue;
        }

        // Synthesized ids derive from (now, row) so identical input yields
        // an identical result. Row numbers are unique within a batch.
        let id = match field(&record, &columns, "id") {
            raw if !raw.is_empty() && !seen_ids.contains(raw) => raw.to_string(),
            _ => format!("TRADE-{}-{}", now.timestamp_millis(), row),
        };
        seen_ids.insert(id.clone());

        let created_at = DateTime::parse_from_rfc3339(field(&record, &columns, "created at"))
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        let mut trade = TradeRecord {
            id,
            symbol: symbol.to_string(),
            kind: TradeKind::parse_lenient(field(&record, &columns, "type")),
            entry_price: entry_price.unwrap_or(0.0),
            exit_price,
            quantity: quantity.unwrap_or(0.0),
            pnl: 0.0,
            pnl_percent: "0.00".to_string(),
            entry_date: Some(normalize_date(entry_date)),
            exit_date: Some(normalize_date(exit_date)),
            strategy: field(&record, &columns, "strategy").to_string(),
            tags: split_list(field(&record, &columns, "tags"), ','),
            conviction: Conviction::parse_lenient(field(&record, &columns, "conviction")),
            mistakes: Vec::new(),
            notes: field(&record, &columns, "notes").to_string(),
            urls: split_list(field(&record, &columns, "urls"), ';'),
            screenshots: Vec::new(),
            created_at,
        };
        trade.recompute_pnl();
        trades.push(trade);
    }

    if trades.is_empty() {
        return Err(JournalError::NoValidRows);
    }

    log::info!(
        "CSV import: parsed {} trades, {} rows skipped",
        trades.len(),
        row_errors.len()
    );
    Ok(CsvImport { trades, row_errors })
}

fn field<'r>(
    record: &'r csv::StringRecord,
    columns: &HashMap<String, usize>,
    name: &str,
) -> &'r str {
    columns
        .get(name)
        .and_then(|&i| record.get(i))
        .map(str::trim)
        .unwrap_or("")
}

/// Rust's float parser accepts "NaN"/"inf"; those must not enter the
/// metrics layer, so they count as unparseable here.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Best-effort normalization to `YYYY-MM-DD`. Strings chrono can parse are
/// reformatted; `MM/DD/YYYY`-style values are reinterpreted by splitting on
/// `-`/`/`; anything else passes through unchanged.
pub fn normalize_date(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }

    let parts: Vec<&str> = s.split(['-', '/']).collect();
    if parts.len() == 3 {
        if parts[0].len() == 4 {
            // Assume YYYY-MM-DD with out-of-range components; keep as given.
            return s.to_string();
        }
        return format!("{}-{:0>2}-{:0>2}", parts[2], parts[0], parts[1]);
    }

    s.to_string()
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// JS-style shortest representation: integral values print without a
/// trailing ".0" so exported files stay stable across round-trips.
fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeInput;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn sample_trade() -> TradeRecord {
        TradeRecord::create(
            TradeInput {
                symbol: "BTC/USDT".to_string(),
                kind: TradeKind::Long,
                entry_price: 100.0,
                exit_price: Some(110.0),
                quantity: 10.0,
                entry_date: Some("2024-03-01".to_string()),
                exit_date: Some("2024-03-05".to_string()),
                strategy: "Breakout".to_string(),
                tags: vec!["swing".to_string(), "crypto".to_string()],
                conviction: Conviction::APlus,
                notes: "clean setup, \"textbook\" breakout".to_string(),
                urls: vec![
                    "https://example.com/a".to_string(),
                    "https://example.com/b".to_string(),
                ],
                ..Default::default()
            },
            ts(),
        )
    }

    #[test]
    fn test_export_empty_is_signaled() {
        assert!(matches!(
            export_trades_to_csv(&[]),
            Err(JournalError::EmptyExport)
        ));
    }

    #[test]
    fn test_export_has_canonical_header() {
        let text = export_trades_to_csv(&[sample_trade()]).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(
            first_line,
            "ID,Symbol,Type,Entry Price,Exit Price,Quantity,Entry Date,Exit Date,\
             Strategy,Tags,Conviction,P/L,P/L %,Notes,URLs,Created At"
        );
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let original = sample_trade();
        let text = export_trades_to_csv(std::slice::from_ref(&original)).unwrap();
        let imported = import_trades_from_csv(&text, ts()).unwrap();
        assert!(imported.row_errors.is_empty());
        assert_eq!(imported.trades.len(), 1);

        let t = &imported.trades[0];
        assert_eq!(t.id, original.id);
        assert_eq!(t.symbol, original.symbol);
        assert_eq!(t.kind, original.kind);
        assert_eq!(t.entry_price, original.entry_price);
        assert_eq!(t.exit_price, original.exit_price);
        assert_eq!(t.quantity, original.quantity);
        assert_eq!(t.entry_date, original.entry_date);
        assert_eq!(t.exit_date, original.exit_date);
        assert_eq!(t.strategy, original.strategy);
        assert_eq!(t.tags, original.tags);
        assert_eq!(t.conviction, original.conviction);
        assert_eq!(t.notes, original.notes);
        assert_eq!(t.urls, original.urls);
        assert_eq!(t.created_at, original.created_at);
        // P/L is recomputed, deterministically identical
        assert_eq!(t.pnl, original.pnl);
        assert_eq!(t.pnl_percent, original.pnl_percent);
    }

    #[test]
    fn test_encode_decode_encode_is_stable() {
        let first = export_trades_to_csv(&[sample_trade()]).unwrap();
        let decoded = import_trades_from_csv(&first, ts()).unwrap();
        let second = export_trades_to_csv(&decoded.trades).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_columns_abort() {
        let text = "Symbol,Entry Price,Quantity\nBTC,100,1\n";
        match import_trades_from_csv(text, ts()) {
            Err(JournalError::MissingColumns(names)) => {
                assert_eq!(names, vec!["exit price", "entry date", "exit date"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|i| i.trades)),
        }
    }

    #[test]
    fn test_headers_match_case_insensitively_any_order() {
        let text = "exit date,ENTRY DATE,quantity,EXIT PRICE,entry price,SYMBOL\n\
                    2024-03-05,2024-03-01,2,110,100,eth\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(imported.trades[0].symbol, "eth");
        assert_eq!(imported.trades[0].pnl, 20.0);
    }

    #[test]
    fn test_malformed_rows_are_skipped_not_fatal() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date\n\
                    AAA,100,110,1,2024-01-01,2024-01-02\n\
                    BBB,100,abc,1,2024-01-01,2024-01-02\n\
                    CCC,50,60,2,2024-01-03,2024-01-04\n\
                    DDD,10,20,3,2024-01-05,2024-01-06\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(imported.trades.len(), 3);
        assert_eq!(imported.row_errors, vec!["Row 3: Missing required fields"]);
    }

    #[test]
    fn test_no_valid_rows_abort() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date\n\
                    ,100,110,1,2024-01-01,2024-01-02\n";
        assert!(matches!(
            import_trades_from_csv(text, ts()),
            Err(JournalError::NoValidRows)
        ));
    }

    #[test]
    fn test_type_defaults_to_long() {
        let text = "Symbol,Type,Entry Price,Exit Price,Quantity,Entry Date,Exit Date\n\
                    BTC,sideways,100,90,1,2024-01-01,2024-01-02\n\
                    ETH,short,100,90,1,2024-01-01,2024-01-02\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(imported.trades[0].kind, TradeKind::Long);
        assert_eq!(imported.trades[0].pnl, -10.0);
        assert_eq!(imported.trades[1].kind, TradeKind::Short);
        assert_eq!(imported.trades[1].pnl, 10.0);
    }

    #[test]
    fn test_pnl_is_recomputed_not_trusted() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date,P/L,P/L %\n\
                    BTC,100,110,10,2024-01-01,2024-01-02,99999,999.99\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(imported.trades[0].pnl, 100.0);
        assert_eq!(imported.trades[0].pnl_percent, "10.00");
    }

    #[test]
    fn test_quoted_fields_with_commas_and_newlines() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date,Notes\n\
                    BTC,100,110,1,2024-01-01,2024-01-02,\"first line,\nsecond \"\"quoted\"\" line\"\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(
            imported.trades[0].notes,
            "first line,\nsecond \"quoted\" line"
        );
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date\n\
                    AAA,NaN,110,1,2024-01-01,2024-01-02\n\
                    BBB,100,inf,1,2024-01-01,2024-01-02\n\
                    CCC,100,110,infinity,2024-01-01,2024-01-02\n\
                    DDD,100,110,1,2024-01-01,2024-01-02\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(imported.trades.len(), 1);
        assert_eq!(imported.trades[0].symbol, "DDD");
        assert!(imported.trades[0].pnl.is_finite());
        assert_eq!(
            imported.row_errors,
            vec![
                "Row 2: Missing required fields",
                "Row 3: Missing required fields",
                "Row 4: Missing required fields",
            ]
        );
    }

    #[test]
    fn test_imported_metrics_stay_finite() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date\n\
                    AAA,-inf,110,1,2024-01-01,2024-01-02\n\
                    BBB,100,90,1,2024-01-01,2024-01-02\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        let snap = crate::metrics::compute_metrics(
            &imported.trades,
            &[],
            &crate::models::Settings::default(),
        );
        assert!(snap.total_pnl.is_finite());
        assert!(snap.current_capital.is_finite());
    }

    #[test]
    fn test_synthesized_ids_are_deterministic() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date\n\
                    BTC,100,110,1,2024-01-01,2024-01-02\n\
                    ETH,200,210,1,2024-01-01,2024-01-02\n";
        let a = import_trades_from_csv(text, ts()).unwrap();
        let b = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(a.trades[0].id, b.trades[0].id);
        assert_eq!(a.trades[1].id, b.trades[1].id);
        assert_ne!(a.trades[0].id, a.trades[1].id);
        assert!(a.trades[0].id.starts_with("TRADE-"));
    }

    #[test]
    fn test_id_collision_within_batch_gets_fresh_id() {
        let text = "ID,Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date\n\
                    T-1,BTC,100,110,1,2024-01-01,2024-01-02\n\
                    T-1,ETH,200,210,1,2024-01-01,2024-01-02\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(imported.trades[0].id, "T-1");
        assert_ne!(imported.trades[1].id, "T-1");
    }

    #[test]
    fn test_tags_and_urls_split_and_trim() {
        let text = "Symbol,Entry Price,Exit Price,Quantity,Entry Date,Exit Date,Tags,URLs\n\
                    BTC,100,110,1,2024-01-01,2024-01-02,\" swing , crypto ,, \",\"https://a.io ; https://b.io;\"\n";
        let imported = import_trades_from_csv(text, ts()).unwrap();
        assert_eq!(imported.trades[0].tags, vec!["swing", "crypto"]);
        assert_eq!(imported.trades[0].urls, vec!["https://a.io", "https://b.io"]);
    }

    #[test]
    fn test_date_normalization() {
        assert_eq!(normalize_date("2024-03-05"), "2024-03-05");
        assert_eq!(normalize_date("3/5/2024"), "2024-03-05");
        assert_eq!(normalize_date("03/05/2024"), "2024-03-05");
        assert_eq!(normalize_date("2024/03/05"), "2024-03-05");
        assert_eq!(normalize_date("2024-03-05T10:00:00Z"), "2024-03-05");
        assert_eq!(normalize_date("not a date"), "not a date");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_number_formatting_is_js_like() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-0.5), "-0.5");
        assert_eq!(format_number(10.25), "10.25");
    }
}
