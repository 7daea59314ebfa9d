//! Prints `DESCRIBE` output for the three POS tables next to the expected
//! layout, followed by a per-table drift report. Informational only.

use crate::config::DbConfig;
use crate::db::{ColumnDescription, EXPECTED_SCHEMA, ExpectedTable, PosDatabase};
use crate::error::InspectError;
use std::io::Write;
use tracing::info;

pub async fn run(cfg: &DbConfig, out: &mut impl Write) -> Result<(), InspectError> {
    let mut db = PosDatabase::connect(cfg).await?;
    let result = describe_all(&mut db, out).await;
    db.close().await;
    let live = result?;

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(80))?;
    write_reference(out)?;
    writeln!(out)?;
    write_drift(&live, out)?;
    Ok(())
}

async fn describe_all(
    db: &mut PosDatabase,
    out: &mut impl Write,
) -> Result<Vec<(&'static ExpectedTable, Vec<ColumnDescription>)>, InspectError> {
    writeln!(out, "📋 Table structure check")?;
    writeln!(out, "{}", "=".repeat(80))?;

    let mut live = Vec::with_capacity(EXPECTED_SCHEMA.len());
    for table in EXPECTED_SCHEMA {
        writeln!(out, "{} ({}):", table.title, table.name)?;
        writeln!(out, "{}", "-".repeat(60))?;
        let columns = db.describe(table.name).await?;
        info!(table = table.name, columns = columns.len(), "described table");
        for column in &columns {
            writeln!(out, "{}", format_column(column))?;
        }
        writeln!(out)?;
        live.push((table, columns));
    }
    Ok(live)
}

/// Fixed-width `DESCRIBE` line: field, type, key, null, default, extra.
pub fn format_column(c: &ColumnDescription) -> String {
    format!(
        "   {:<15} {:<15} {:<5} {:<5} {:<10} {}",
        c.field,
        c.sql_type,
        c.key,
        c.null,
        c.default.as_deref().unwrap_or(""),
        c.extra
    )
}

pub fn write_reference(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "📊 Expected structure:")?;
    for table in EXPECTED_SCHEMA {
        writeln!(out)?;
        writeln!(out, "✅ {} ({}):", table.title, table.name)?;
        for column in table.columns {
            writeln!(out, "   {column}")?;
        }
    }
    Ok(())
}

fn write_drift(
    live: &[(&'static ExpectedTable, Vec<ColumnDescription>)],
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(out, "🔎 Drift against expected structure:")?;
    for (table, columns) in live {
        let drift = table.diff(columns);
        if drift.is_empty() {
            writeln!(out, "   {}: matches", table.name)?;
            continue;
        }
        writeln!(out, "   {}: {} difference(s)", table.name, drift.len())?;
        for d in drift {
            writeln!(out, "     - {d}")?;
        }
    }
    Ok(())
}
