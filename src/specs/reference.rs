// src/specs/reference.rs
//
// The 6502 reference page: one opcode table per instruction, mixed in with a
// navigation table. Data tables have exactly four columns:
//
//   Addressing Mode | Opcode | Bytes | Cycles
//
// and the cycle cell reads either "4" or "4 (+1 if page crossed)".

use std::{error::Error, fmt};

use crate::config::{
    consts::{OPCODE_COLUMN, REFERENCE_COLUMNS, SKIP_MARKERS},
    options::{CyclePolicy, ScrapeOptions},
};
use crate::core::{html, net};
use crate::timing::{Timing, TimingTable};

/// A data row whose cycle cell does not start with an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleParseError {
    pub opcode: String,
    pub cell: String,
}

impl fmt::Display for CycleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bad cycle count {:?} for opcode {:?}", self.cell, self.opcode)
    }
}

impl Error for CycleParseError {}

/// Counters for one parse, for the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub tables: usize,
    pub rows: usize,
    pub accepted: usize,
    pub skipped_shape: usize,
    pub skipped_header: usize,
    pub skipped_cycles: usize,
    pub duplicates: usize,
}

/// Fetch the page and extract the opcode → timing table.
/// A page that yields no usable rows is an error.
pub fn fetch(opts: &ScrapeOptions) -> Result<TimingTable, Box<dyn Error + Send + Sync>> {
    let doc = net::http_get(&opts.url, opts.timeout, opts.max_redirects)?;
    let (table, stats) = parse(&doc, opts.on_bad_cycles)?;
    log::debug!("Reference parse: {stats:?}");

    if table.is_empty() {
        return Err(format!("No opcode rows found at {}", opts.url).into());
    }
    log::info!("Scraped {} opcodes from {} tables", table.len(), stats.tables);
    Ok(table)
}

/// Every `<td>` cell text of every `<tr>` of every `<table>`.
pub fn table_rows(doc: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for table in html::blocks_ci(doc, "table") {
        for tr in html::blocks_ci(table, "tr") {
            rows.push(html::blocks_ci(tr, "td").map(html::cell_text).collect());
        }
    }
    rows
}

/// Opcode tables only: exactly four cells, none of them a header or
/// navigation marker.
pub fn is_data_row(cells: &[String]) -> bool {
    cells.len() == REFERENCE_COLUMNS && !is_marker_row(cells)
}

fn is_marker_row(cells: &[String]) -> bool {
    cells.iter().any(|c| SKIP_MARKERS.contains(&c.as_str()))
}

/// `"4"` → `(4, false)`, `"4 *"` or `"4 (+1 if page crossed)"` → `(4, true)`.
/// `None` when the first token is not a base-10 integer.
pub fn parse_cycles(cell: &str) -> Option<(u32, bool)> {
    let mut tokens = cell.split_whitespace();
    let cycles = tokens.next()?.parse::<u32>().ok()?;
    Some((cycles, tokens.next().is_some()))
}

pub fn parse(doc: &str, policy: CyclePolicy) -> Result<(TimingTable, ParseStats), Box<dyn Error + Send + Sync>> {
    let mut out = TimingTable::new();
    let mut stats = ParseStats {
        tables: html::blocks_ci(doc, "table").count(),
        ..ParseStats::default()
    };

    for cells in table_rows(doc) {
        stats.rows += 1;

        if cells.len() != REFERENCE_COLUMNS {
            stats.skipped_shape += 1;
            continue;
        }
        if is_marker_row(&cells) {
            stats.skipped_header += 1;
            continue;
        }

        let opcode = &cells[OPCODE_COLUMN];
        let cell = &cells[REFERENCE_COLUMNS - 1];
        let Some((cycles, page_penalty)) = parse_cycles(cell) else {
            let err = CycleParseError { opcode: opcode.clone(), cell: cell.clone() };
            match policy {
                CyclePolicy::FailFast => return Err(Box::new(err)),
                CyclePolicy::Skip => {
                    log::warn!("{err}; row skipped");
                    stats.skipped_cycles += 1;
                    continue;
                }
            }
        };

        if out.insert(Timing::new(opcode.as_str(), cycles, page_penalty)).is_some() {
            log::debug!("Duplicate opcode {opcode}; keeping the later row");
            stats.duplicates += 1;
        }
        stats.accepted += 1;
    }

    Ok((out, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| s!(*c)).collect()
    }

    const PAGE: &str = r#"
<html><body>
<table><tr><td></td><td><a href="../index.html">Home</a></td><td></td><td></td></tr></table>
<h3><a name="ADC"></a>ADC - Add with Carry</h3>
<table border=1>
<TR><TH>Addressing Mode</TH><TH>Opcode</TH><TH>Bytes</TH><TH>Cycles</TH></TR>
<tr><td><a href="addressing.html#IMM">Immediate</a></td><td align=center>$69</td><td align=center>2</td><td>2</td></tr>
<tr><td><a href="addressing.html#ABX">Absolute,X</a></td><td align=center>$7D</td><td align=center>3</td><td>4 (+1 if page crossed)</td></tr>
</table>
<table><tr><td>Processor Status after use:</td><td>C</td></tr></table>
</body></html>
"#;

    #[test]
    fn cycles_plain_and_marked() {
        assert_eq!(parse_cycles("4"), Some((4, false)));
        assert_eq!(parse_cycles("4 *"), Some((4, true)));
        assert_eq!(parse_cycles("2 (+1 if branch succeeds +2 if to a new page)"), Some((2, true)));
        assert_eq!(parse_cycles(""), None);
        assert_eq!(parse_cycles("four"), None);
        assert_eq!(parse_cycles("-1"), None);
    }

    #[test]
    fn row_filter() {
        assert!(!is_data_row(&row(&["", "Home", "", ""])));
        assert!(!is_data_row(&row(&["Addressing Mode", "Opcode", "Bytes", "Cycles"])));
        assert!(!is_data_row(&row(&["Immediate", "$69", "2"])));
        assert!(!is_data_row(&row(&["Immediate", "$69", "2", "2", "x"])));
        assert!(is_data_row(&row(&["Immediate", "$69", "2", "2"])));
        // markers match whole cells only
        assert!(is_data_row(&row(&["Homeward", "$69", "2", "2"])));
    }

    #[test]
    fn parses_reference_fragment() {
        let (table, stats) = parse(PAGE, CyclePolicy::FailFast).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("$69"), Some(&Timing::new("$69", 2, false)));
        assert_eq!(table.get("$7D"), Some(&Timing::new("$7D", 4, true)));

        assert_eq!(stats.tables, 3);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.skipped_header, 1);
        // <th> header row has no <td> cells; status table has two
        assert_eq!(stats.skipped_shape, 2);
    }

    #[test]
    fn duplicate_rows_last_wins() {
        let doc = "<table>\
            <tr><td>Implied</td><td>NOP</td><td>1</td><td>3</td></tr>\
            <tr><td>Implied</td><td>NOP</td><td>1</td><td>2 *</td></tr>\
            </table>";
        let (table, stats) = parse(doc, CyclePolicy::FailFast).unwrap();
        assert_eq!(table.get("NOP"), Some(&Timing::new("NOP", 2, true)));
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn numeric_entities_in_opcode_cells() {
        let doc = "<table>\
            <tr><td>Immediate</td><td>&#36;69</td><td>2</td><td>2</td></tr>\
            <tr><td>Absolute,X</td><td>&#x24;7D</td><td>3</td><td>4&#160;(+1&nbsp;if page crossed)</td></tr>\
            </table>";
        let (table, _) = parse(doc, CyclePolicy::FailFast).unwrap();
        assert_eq!(table.get("$69"), Some(&Timing::new("$69", 2, false)));
        assert_eq!(table.get("$7D"), Some(&Timing::new("$7D", 4, true)));
    }

    #[test]
    fn bad_cycles_fail_fast() {
        let doc = "<table><tr><td>Implied</td><td>$EA</td><td>1</td><td>n/a</td></tr></table>";
        let err = parse(doc, CyclePolicy::FailFast).unwrap_err();
        let err = err.downcast_ref::<CycleParseError>().unwrap();
        assert_eq!(err.opcode, "$EA");
        assert_eq!(err.cell, "n/a");
    }

    #[test]
    fn bad_cycles_skip() {
        let doc = "<table>\
            <tr><td>Implied</td><td>$EA</td><td>1</td><td></td></tr>\
            <tr><td>Implied</td><td>$E8</td><td>1</td><td>2</td></tr>\
            </table>";
        let (table, stats) = parse(doc, CyclePolicy::Skip).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("$EA").is_none());
        assert_eq!(stats.skipped_cycles, 1);
    }

    #[test]
    fn no_tables_no_rows() {
        let (table, stats) = parse("<html><p>moved</p></html>", CyclePolicy::FailFast).unwrap();
        assert!(table.is_empty());
        assert_eq!(stats, ParseStats::default());
    }
}
