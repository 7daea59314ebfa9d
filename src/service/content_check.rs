//! Prints what is currently stored in the POS database: tables, products,
//! latest transactions and details, totals, and today's sales.

use crate::config::DbConfig;
use crate::db::{PosDatabase, ProductRow, SalesStats, TransactionDetailRow, TransactionRow};
use crate::error::InspectError;
use std::fmt::Display;
use std::io::Write;

pub const RECENT_TRANSACTION_LIMIT: i64 = 5;
pub const RECENT_DETAIL_LIMIT: i64 = 10;

/// Connect, print every section, close. The first failing statement aborts the rest.
pub async fn run(cfg: &DbConfig, out: &mut impl Write) -> Result<(), InspectError> {
    writeln!(out, "🔍 Database connection test...")?;
    writeln!(out, "📡 Host: {}:{}", cfg.host, cfg.port)?;
    writeln!(out, "👤 User: {}", cfg.user)?;
    writeln!(out, "🗄️  Database: {}", cfg.name)?;

    let mut db = PosDatabase::connect(cfg).await?;
    writeln!(out, "✅ MySQL connection established")?;
    writeln!(out)?;

    let result = write_report(&mut db, out).await;
    db.close().await;
    result?;

    writeln!(out)?;
    writeln!(out, "✅ Database check complete")?;
    Ok(())
}

async fn write_report(db: &mut PosDatabase, out: &mut impl Write) -> Result<(), InspectError> {
    writeln!(out, "📋 Tables:")?;
    for table in db.list_tables().await? {
        writeln!(out, "   - {table}")?;
    }
    writeln!(out)?;

    writeln!(out, "🛍️  Product master (product_master):")?;
    for product in db.products().await? {
        writeln!(out, "{}", format_product(&product))?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "💰 Transactions (transaction) - latest {RECENT_TRANSACTION_LIMIT}:"
    )?;
    for tx in db.recent_transactions(RECENT_TRANSACTION_LIMIT).await? {
        writeln!(out, "{}", format_transaction(&tx))?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "📝 Transaction details (transaction_detail) - latest {RECENT_DETAIL_LIMIT}:"
    )?;
    for detail in db.recent_details(RECENT_DETAIL_LIMIT).await? {
        writeln!(out, "{}", format_detail(&detail))?;
    }
    writeln!(out)?;

    writeln!(out, "📊 Statistics:")?;
    let stats = db.sales_stats().await?;
    write_stats(&stats, out)?;
    writeln!(out)?;

    writeln!(out, "📅 Today's transactions:")?;
    let today = db.today_transactions().await?;
    write_today(&today, out)?;
    Ok(())
}

pub fn format_product(p: &ProductRow) -> String {
    format!(
        "   ID:{} | Code:{} | Name:{} | Price:¥{}",
        p.prd_id, p.code, p.name, p.price
    )
}

pub fn format_transaction(t: &TransactionRow) -> String {
    format!(
        "   TRD_ID:{} | Operator:{} | Store:{} | POS:{} | Total:¥{} | Ex-tax:¥{} | Date:{}",
        t.trd_id,
        or_dash(&t.emp_cd),
        or_dash(&t.store_cd),
        or_dash(&t.pos_no),
        or_dash(&t.ttl_amt),
        or_dash(&t.ttl_amt_ex_tax),
        or_dash(&t.trd_date),
    )
}

pub fn format_detail(d: &TransactionDetailRow) -> String {
    format!(
        "   DTL_ID:{} | TRD_ID:{} | Product:{} | Unit:¥{} | Qty:{} | Amount:¥{}",
        d.dtl_id,
        d.trd_id,
        or_dash(&d.prd_name),
        or_dash(&d.unit_price),
        or_dash(&d.qty),
        or_dash(&d.amt),
    )
}

pub fn format_today(t: &TransactionRow) -> String {
    format!(
        "   TRD_ID:{} | Operator:{} | Total:¥{} | Time:{}",
        t.trd_id,
        or_dash(&t.emp_cd),
        or_dash(&t.ttl_amt),
        or_dash(&t.trd_date),
    )
}

fn write_stats(stats: &SalesStats, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "   Transactions: {}", stats.transactions)?;
    writeln!(out, "   Detail lines: {}", stats.details)?;
    writeln!(out, "   Total sales: ¥{}", stats.total_sales)
}

fn write_today(today: &[TransactionRow], out: &mut impl Write) -> std::io::Result<()> {
    if today.is_empty() {
        return writeln!(out, "   No transactions today");
    }
    for tx in today {
        writeln!(out, "{}", format_today(tx))?;
    }
    Ok(())
}

fn or_dash<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}
