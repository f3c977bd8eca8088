// src/merge.rs
use std::collections::BTreeSet;
use std::error::Error;

use serde_json::Value;

use crate::catalog::Catalog;
use crate::config::consts::{FIELD_CYCLES, FIELD_OPCODE, FIELD_PAGE_PENALTY};
use crate::timing::TimingTable;

/// What the merge did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub records: usize,
    pub matched: usize,
    pub defaulted: usize,
    /// Distinct opcodes that got the zero-cycle default. Records without a
    /// string `opcode` are counted in `defaulted` but not listed.
    pub unmatched: BTreeSet<String>,
}

/// Stamp every record with `cycles` and `+1`, from the table when its
/// `opcode` matches exactly, otherwise `0` / `false`. Existing fields keep
/// their position; new ones go at the end.
pub fn apply(catalog: &mut Catalog, table: &TimingTable) -> Result<MergeReport, Box<dyn Error + Send + Sync>> {
    let mut report = MergeReport { records: catalog.len(), ..MergeReport::default() };

    for (i, record) in catalog.records.iter_mut().enumerate() {
        let Value::Object(fields) = record else {
            return Err(format!("Catalog record {i} is not an object").into());
        };

        let opcode = fields.get(FIELD_OPCODE).and_then(Value::as_str);
        let (timing, hit) = table.get_or_default(opcode);
        if hit {
            report.matched += 1;
        } else {
            report.defaulted += 1;
            if let Some(op) = opcode {
                report.unmatched.insert(s!(op));
            }
        }

        fields.insert(s!(FIELD_CYCLES), Value::from(timing.cycles));
        fields.insert(s!(FIELD_PAGE_PENALTY), Value::from(timing.page_penalty));
    }

    log::info!(
        "Merged {} records: {} matched, {} defaulted",
        report.records, report.matched, report.defaulted
    );
    if !report.unmatched.is_empty() {
        let list: Vec<&str> = report.unmatched.iter().map(String::as_str).collect();
        log::debug!("No timing for: {}", list.join(", "));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::Timing;
    use serde_json::json;

    fn catalog(v: Value) -> Catalog {
        match v {
            Value::Array(records) => Catalog { records },
            _ => unreachable!(),
        }
    }

    #[test]
    fn matched_and_default() {
        let mut c = catalog(json!([{"opcode": "ADC"}, {"opcode": "XXX"}]));
        let table: TimingTable = [Timing::new("ADC", 2, true)].into_iter().collect();

        let report = apply(&mut c, &table).unwrap();

        assert_eq!(
            Value::Array(c.records),
            json!([
                {"opcode": "ADC", "cycles": 2, "+1": true},
                {"opcode": "XXX", "cycles": 0, "+1": false}
            ])
        );
        assert_eq!(report.records, 2);
        assert_eq!(report.matched, 1);
        assert_eq!(report.defaulted, 1);
        assert_eq!(report.unmatched.iter().collect::<Vec<_>>(), vec!["XXX"]);
    }

    #[test]
    fn other_fields_untouched_and_stale_values_overwritten() {
        let mut c = catalog(json!([
            {"name": "LDA", "opcode": "$BD", "cycles": 9, "mode": "AbsoluteX", "+1": false, "bytes": "3"}
        ]));
        let table: TimingTable = [Timing::new("$BD", 4, true)].into_iter().collect();
        apply(&mut c, &table).unwrap();

        let out = serde_json::to_string(&c.records).unwrap();
        assert_eq!(
            out,
            r#"[{"name":"LDA","opcode":"$BD","cycles":4,"mode":"AbsoluteX","+1":true,"bytes":"3"}]"#
        );
    }

    #[test]
    fn missing_or_non_string_opcode_gets_default() {
        let mut c = catalog(json!([{"name": "???"}, {"opcode": 105}]));
        let table: TimingTable = [Timing::new("105", 2, false)].into_iter().collect();
        let report = apply(&mut c, &table).unwrap();

        assert_eq!(c.records[0], json!({"name": "???", "cycles": 0, "+1": false}));
        assert_eq!(c.records[1], json!({"opcode": 105, "cycles": 0, "+1": false}));
        assert_eq!(report.defaulted, 2);
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn idempotent_on_timing_fields() {
        let mut c = catalog(json!([{"opcode": "$69"}, {"opcode": "$02"}]));
        let table: TimingTable = [Timing::new("$69", 2, false)].into_iter().collect();

        apply(&mut c, &table).unwrap();
        let first = c.clone();
        apply(&mut c, &table).unwrap();
        assert_eq!(c, first);
    }

    #[test]
    fn non_object_record_is_an_error() {
        let mut c = catalog(json!([{"opcode": "ADC"}, "ADC"]));
        let err = apply(&mut c, &TimingTable::new()).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }
}
