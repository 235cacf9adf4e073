//! Reporting side: the signal feed, JSON and CSV exports, artifact bundles.
//!
//! Persisted results carry a `schema_version`; newer versions than this build
//! understands are rejected on import.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{PositionStatus, Trade};
use crate::engine::{BacktestResult, BarSnapshot, SignalLog, SCHEMA_VERSION};
use crate::signals::Relation;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("CSV output is not valid UTF-8")]
    Utf8,
}

/// One line per emitted signal, e.g. `BUY on 2024-03-01 at 101.25`.
pub fn signal_messages(log: &SignalLog) -> Vec<String> {
    log.iter().map(ToString::to_string).collect()
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(result: &BacktestResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn import_json(json: &str) -> Result<BacktestResult, ExportError> {
    let result: BacktestResult = serde_json::from_str(json)?;
    if result.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: result.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(result)
}

// ─── CSV ────────────────────────────────────────────────────────────

fn relation_label(relation: Relation) -> &'static str {
    match relation {
        Relation::Above => "ABOVE",
        Relation::Below => "BELOW",
        Relation::Undefined => "",
    }
}

fn position_label(status: PositionStatus) -> &'static str {
    match status {
        PositionStatus::Flat => "FLAT",
        PositionStatus::Long => "LONG",
    }
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let data = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(data).map_err(|_| ExportError::Utf8)
}

/// Per-bar trace: prices, both averages, relation, position and equity.
///
/// Warm-up averages and an undefined relation are written as empty cells.
pub fn export_trace_csv(trace: &[BarSnapshot]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date", "open", "high", "low", "close", "volume", "short_ma", "long_ma", "relation",
        "position", "equity", "signal",
    ])?;
    for snap in trace {
        let bar = &snap.bar;
        wtr.write_record([
            bar.date.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            opt_cell(snap.short_ma),
            opt_cell(snap.long_ma),
            relation_label(snap.relation).to_string(),
            position_label(snap.position).to_string(),
            format!("{:.2}", snap.equity),
            snap.signal.map(|a| a.to_string()).unwrap_or_default(),
        ])?;
    }
    finish(wtr)
}

pub fn export_signals_csv(log: &SignalLog) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "action", "price"])?;
    for event in log {
        wtr.write_record([
            event.date.to_string(),
            event.action.to_string(),
            event.price.to_string(),
        ])?;
    }
    finish(wtr)
}

pub fn export_trades_csv(trades: &[Trade]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_date",
        "entry_price",
        "exit_date",
        "exit_price",
        "bars_held",
        "pnl",
        "return_pct",
    ])?;
    for t in trades {
        wtr.write_record([
            t.entry_date.to_string(),
            t.entry_price.to_string(),
            t.exit_date.to_string(),
            t.exit_price.to_string(),
            t.bars_held.to_string(),
            format!("{:.6}", t.pnl()),
            format!("{:.4}", t.return_pct()),
        ])?;
    }
    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

fn write_file(path: PathBuf, contents: &str) -> Result<(), ExportError> {
    std::fs::write(&path, contents).map_err(|source| ExportError::Io { path, source })
}

/// Write `result.json`, `trace.csv`, `signals.csv` and `trades.csv` into
/// `{symbol}_{first 12 chars of run_id}/` under `output_dir`.
///
/// Returns the created directory. Rewriting the same run overwrites it.
pub fn save_artifacts(
    result: &BacktestResult,
    run_id: &str,
    output_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let prefix: String = run_id.chars().take(12).collect();
    let run_dir = output_dir.join(format!("{}_{prefix}", result.symbol));
    std::fs::create_dir_all(&run_dir).map_err(|source| ExportError::Io {
        path: run_dir.clone(),
        source,
    })?;

    write_file(run_dir.join("result.json"), &export_json(result)?)?;
    write_file(run_dir.join("trace.csv"), &export_trace_csv(&result.trace)?)?;
    write_file(run_dir.join("signals.csv"), &export_signals_csv(&result.signal_log)?)?;
    write_file(run_dir.join("trades.csv"), &export_trades_csv(&result.trades)?)?;

    log::info!("wrote artifacts to {}", run_dir.display());
    Ok(run_dir)
}

/// Read back `result.json` from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult, ExportError> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path).map_err(|source| ExportError::Io { path, source })?;
    import_json(&json)
}
