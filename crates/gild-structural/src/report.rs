use std::io::Write;

use anyhow::{Context, Result};
use gild_assert::{Detail, DetailKind, DiffReport, Document};
use serde_yaml::Value;

/// Plain-text report: a header naming both inputs, then one block per entry.
///
/// ```text
///
/// between golden.yaml
///     and render.yaml
///
/// returned 1 difference
///
/// /spec/replicas  (apps/v1/Deployment/web)
///   ± value change
///     - 1
///     + 3
///
/// ```
pub fn write_human_report(report: &DiffReport, out: &mut dyn Write) -> Result<()> {
    let n = report.diffs.len();
    let noun = if n == 1 { "difference" } else { "differences" };
    write!(
        out,
        "\nbetween {}\n    and {}\n\nreturned {n} {noun}\n\n",
        report.from.display(),
        report.to.display()
    )
    .context("write report header")?;

    for entry in &report.diffs {
        match &entry.document {
            Some(doc) => writeln!(out, "{}  ({doc})", entry.path)?,
            None => writeln!(out, "{}", entry.path)?,
        }
        for detail in &entry.details {
            write_detail(detail, out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_detail(detail: &Detail, out: &mut dyn Write) -> Result<()> {
    match detail.kind {
        DetailKind::Addition => {
            let value = side(&detail.to)?;
            writeln!(out, "  + {} added:", count_label(value))?;
            write_block(value, "    ", out)
        }
        DetailKind::Removal => {
            let value = side(&detail.from)?;
            writeln!(out, "  - {} removed:", count_label(value))?;
            write_block(value, "    ", out)
        }
        DetailKind::Modification => {
            let (from, to) = (side(&detail.from)?, side(&detail.to)?);
            let label = if is_scalar(from) && is_scalar(to) { "value change" } else { "type change" };
            writeln!(out, "  ± {label}")?;
            write_block(from, "    - ", out)?;
            write_block(to, "    + ", out)
        }
        DetailKind::OrderChange => {
            writeln!(out, "  ⇆ order changed")?;
            write_block(side(&detail.from)?, "    - ", out)?;
            write_block(side(&detail.to)?, "    + ", out)
        }
        DetailKind::DocumentAddition => {
            writeln!(out, "  + one document added:")?;
            write_block(side(&detail.to)?, "    ", out)
        }
        DetailKind::DocumentRemoval => {
            writeln!(out, "  - one document removed:")?;
            write_block(side(&detail.from)?, "    ", out)
        }
    }
}

fn side(value: &Option<Document>) -> Result<&Document> {
    value.as_ref().context("detail is missing a value")
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Mapping(_) | Value::Sequence(_))
}

fn count_label(value: &Value) -> String {
    let (n, what) = match value {
        Value::Mapping(m) => (m.len(), "map"),
        Value::Sequence(s) => (s.len(), "list"),
        _ => return "value".to_string(),
    };
    let entries = if n == 1 { "entry" } else { "entries" };
    format!("{n} {what} {entries}")
}

/// Write `value` as YAML, each line behind `prefix`.
fn write_block(value: &Value, prefix: &str, out: &mut dyn Write) -> Result<()> {
    let text = serde_yaml::to_string(value).context("render value")?;
    for line in text.lines() {
        writeln!(out, "{prefix}{line}")?;
    }
    Ok(())
}
