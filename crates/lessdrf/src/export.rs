//! Final SDRF export.
//!
//! Columns are ordered `source name`, `characteristics[...]` (organism and
//! organism part first, the rest sorted), every other column in table order,
//! `comment[...]` sorted, then `factor value[...]` sorted. Sibling columns
//! created for multiple values per row lose their `_N` suffix.

use std::io::Write;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ExportOptions;
use crate::error::{Result, SdrfError};
use crate::table::WorkingTable;

pub const SOURCE_NAME: &str = "source name";
pub const TOOL_METADATA: &str = "comment[tool metadata]";

const ORGANISM: &str = "characteristics[organism]";
const ORGANISM_PART: &str = "characteristics[organism part]";

static SIBLING_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_\d+$").expect("sibling suffix pattern is valid"));

/// Column name as written to the SDRF file.
pub fn export_name(column: &str) -> String {
    SIBLING_SUFFIX.replace(column, "").into_owned()
}

/// Positions of the table's columns in export order, `None` standing for an
/// added `source name`.
fn export_order(headers: &[String]) -> Vec<Option<usize>> {
    let mut characteristics = Vec::new();
    let mut comments = Vec::new();
    let mut factors = Vec::new();
    let mut others = Vec::new();
    let mut source = None;

    for (i, header) in headers.iter().enumerate() {
        if header == SOURCE_NAME {
            source.get_or_insert(i);
        } else if header.starts_with("characteristic") {
            characteristics.push(i);
        } else if header.starts_with("comment") {
            comments.push(i);
        } else if header.starts_with("factor") {
            factors.push(i);
        } else {
            others.push(i);
        }
    }

    let rank = |name: &str| match name {
        ORGANISM => 0,
        ORGANISM_PART => 1,
        _ => 2,
    };
    characteristics.sort_by(|&a, &b| {
        let (a, b) = (&headers[a], &headers[b]);
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
    comments.sort_by(|&a, &b| headers[a].cmp(&headers[b]));
    factors.sort_by(|&a, &b| headers[a].cmp(&headers[b]));

    std::iter::once(source)
        .chain(
            characteristics
                .into_iter()
                .chain(others)
                .chain(comments)
                .chain(factors)
                .map(Some),
        )
        .collect()
}

/// Write `table` as a finished SDRF file.
///
/// `comment[tool metadata]` is set on every row and whitespace around each
/// value is trimmed. The working table itself is not modified.
pub fn export_sdrf(table: &WorkingTable, options: &ExportOptions, writer: impl Write) -> Result<()> {
    let mut table = table.clone();
    table.set_constant(TOOL_METADATA, &options.tool_metadata);

    let headers = table.headers();
    let order = export_order(headers);

    let mut out = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    out.write_record(order.iter().map(|pos| match pos {
        Some(i) => export_name(&headers[*i]),
        None => SOURCE_NAME.to_string(),
    }))?;

    for row in table.rows() {
        out.write_record(order.iter().map(|pos| {
            pos.and_then(|i| row[i].as_deref())
                .map(str::trim)
                .unwrap_or(options.missing_value.as_str())
        }))?;
    }
    out.flush().map_err(|e| SdrfError::io("<sdrf output>", e))?;

    tracing::info!(
        rows = table.row_count(),
        columns = order.len(),
        "exported SDRF"
    );
    Ok(())
}

/// [`export_sdrf`] into a string.
pub fn to_sdrf_string(table: &WorkingTable, options: &ExportOptions) -> Result<String> {
    let mut buffer = Vec::new();
    export_sdrf(table, options, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| SdrfError::EmptyData(format!("export produced invalid UTF-8: {e}")))
}
