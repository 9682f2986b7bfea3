pub mod analysis;
pub mod calendar;
pub mod changes;
mod csv_out;
pub mod deadline;
pub mod email;
mod error;
pub mod fees;
mod header;
pub mod input;
mod model;
mod options;
pub mod report;
mod rows;
mod table_parse;
mod warning;

use serde::Serialize;
use tracing::info;

use crate::header::find_header;
use crate::report::{render_report, sort_records};
use crate::rows::extract_records;

pub use csv_out::{records_to_csv_string, write_records_csv};
pub use error::{AnalysisError, DeadlineError, FeeError, OutputError, ParseError};
pub use model::{Cell, Field, HeaderMap, RawLine, RawTable, Record};
pub use options::{APPEAL_OPTIONS, DECISION_OPTIONS, DecisionMode, NO_APPEAL, ParseOptions};
pub use warning::{ParseWarning, WarningCode};

/// Records in source order plus the non-fatal problems met on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub header: HeaderMap,
    pub records: Vec<Record>,
    pub warnings: Vec<ParseWarning>,
}

/// Sorted records and the rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PedidosReport {
    pub records: Vec<Record>,
    pub warnings: Vec<ParseWarning>,
    pub report: String,
}

/// Recovers the pedidos table from pasted text.
///
/// Fails on an empty paste, an unrecognisable header, a header missing a
/// required column, or when no line after the header could be mapped.
/// Problems with single lines are returned as warnings instead.
pub fn parse_table(text: &str, options: &ParseOptions) -> Result<ParsedTable, ParseError> {
    let table = RawTable::from_text(text);
    if table.is_empty() {
        return Err(ParseError::EmptyTable);
    }

    let found = find_header(&table, options)?;
    let mut warnings = found.warnings;
    let (records, row_warnings) =
        extract_records(&table.lines[found.line_index + 1..], &found.map, options);
    warnings.extend(row_warnings);

    if records.is_empty() {
        return Err(ParseError::NoRecordsExtracted { warnings });
    }

    info!(
        records = records.len(),
        warnings = warnings.len(),
        "pedidos table parsed"
    );

    Ok(ParsedTable {
        header: found.map,
        records,
        warnings,
    })
}

/// Parses, sorts by objeto and renders the report for `mode`.
pub fn process_table(
    text: &str,
    mode: &DecisionMode,
    options: &ParseOptions,
) -> Result<PedidosReport, ParseError> {
    let ParsedTable {
        mut records,
        warnings,
        ..
    } = parse_table(text, options)?;
    sort_records(&mut records);
    let report = render_report(&records, &warnings, mode);

    Ok(PedidosReport {
        records,
        warnings,
        report,
    })
}
