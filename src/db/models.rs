use chrono::NaiveDateTime;
use sqlx::FromRow;

/// `product_master` row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
#[sqlx(rename_all = "UPPERCASE")]
pub struct ProductRow {
    pub prd_id: i64,
    pub code: String,
    pub name: String,
    pub price: i64,
}

/// `transaction` row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
#[sqlx(rename_all = "UPPERCASE")]
pub struct TransactionRow {
    pub trd_id: i64,
    pub emp_cd: Option<String>,
    pub store_cd: Option<String>,
    pub pos_no: Option<String>,
    pub ttl_amt: Option<i64>,
    pub ttl_amt_ex_tax: Option<i64>,
    pub trd_date: Option<NaiveDateTime>,
}

/// `transaction_detail` row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
#[sqlx(rename_all = "UPPERCASE")]
pub struct TransactionDetailRow {
    pub dtl_id: i64,
    pub trd_id: i64,
    pub prd_id: Option<i64>,
    pub prd_code: Option<String>,
    pub prd_name: Option<String>,
    pub unit_price: Option<i64>,
    pub qty: Option<i64>,
    pub amt: Option<i64>,
}

/// Row counts and sales total over the transaction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesStats {
    pub transactions: i64,
    pub details: i64,
    pub total_sales: i64,
}

/// One line of `DESCRIBE <table>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub field: String,
    pub sql_type: String,
    pub null: String,
    pub key: String,
    pub default: Option<String>,
    pub extra: String,
}

impl ColumnDescription {
    pub fn is_primary_key(&self) -> bool {
        self.key.eq_ignore_ascii_case("PRI")
    }
}
