use crate::config::DbConfig;
use crate::db::models::{
    ColumnDescription, ProductRow, SalesStats, TransactionDetailRow, TransactionRow,
};
use crate::error::InspectError;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Connection, Row};
use tracing::{debug, info, warn};

const PRODUCTS_SQL: &str = "SELECT PRD_ID, CODE, NAME, PRICE FROM product_master ORDER BY PRD_ID";

const RECENT_TRANSACTIONS_SQL: &str = r#"
    SELECT TRD_ID, EMP_CD, STORE_CD, POS_NO, TTL_AMT, TTL_AMT_EX_TAX, TRD_DATE
    FROM `transaction`
    ORDER BY TRD_ID DESC
    LIMIT ?
"#;

const RECENT_DETAILS_SQL: &str = r#"
    SELECT td.DTL_ID, td.TRD_ID, td.PRD_ID, td.PRD_CODE, td.PRD_NAME,
           td.UNIT_PRICE, td.QTY, td.AMT
    FROM transaction_detail td
    ORDER BY td.DTL_ID DESC
    LIMIT ?
"#;

const TODAY_TRANSACTIONS_SQL: &str = r#"
    SELECT TRD_ID, EMP_CD, STORE_CD, POS_NO, TTL_AMT, TTL_AMT_EX_TAX, TRD_DATE
    FROM `transaction`
    WHERE DATE(TRD_DATE) = CURDATE()
    ORDER BY TRD_ID DESC
"#;

/// One TLS connection to the POS database. Every statement is read-only.
pub struct PosDatabase {
    conn: MySqlConnection,
}

impl PosDatabase {
    /// Open the connection, giving up after `connect_timeout_secs`.
    pub async fn connect(cfg: &DbConfig) -> Result<Self, InspectError> {
        info!(
            host = %cfg.host,
            port = cfg.port,
            user = %cfg.user,
            database = %cfg.name,
            "connecting to MySQL"
        );
        let opts = cfg.connect_options();
        let timeout = cfg.connect_timeout();
        let conn = tokio::time::timeout(timeout, MySqlConnection::connect_with(&opts))
            .await
            .map_err(|_| InspectError::DbConnectTimeout(timeout))?
            .map_err(InspectError::DbConnect)?;
        info!("MySQL connection established");
        Ok(Self { conn })
    }

    /// Close the connection. Failures are only logged: by this point the report is already out.
    pub async fn close(self) {
        match self.conn.close().await {
            Ok(()) => debug!("MySQL connection closed"),
            Err(e) => warn!(error = %e, "failed to close MySQL connection cleanly"),
        }
    }

    /// `SHOW TABLES`, in server order.
    pub async fn list_tables(&mut self) -> Result<Vec<String>, InspectError> {
        let rows = sqlx::raw_sql("SHOW TABLES")
            .fetch_all(&mut self.conn)
            .await?;
        rows.iter()
            .map(|row| {
                text_at(row, 0)
                    .map(Option::unwrap_or_default)
                    .map_err(InspectError::from)
            })
            .collect()
    }

    pub async fn products(&mut self) -> Result<Vec<ProductRow>, InspectError> {
        Ok(sqlx::query_as(PRODUCTS_SQL)
            .fetch_all(&mut self.conn)
            .await?)
    }

    pub async fn recent_transactions(
        &mut self,
        limit: i64,
    ) -> Result<Vec<TransactionRow>, InspectError> {
        Ok(sqlx::query_as(RECENT_TRANSACTIONS_SQL)
            .bind(limit)
            .fetch_all(&mut self.conn)
            .await?)
    }

    pub async fn recent_details(
        &mut self,
        limit: i64,
    ) -> Result<Vec<TransactionDetailRow>, InspectError> {
        Ok(sqlx::query_as(RECENT_DETAILS_SQL)
            .bind(limit)
            .fetch_all(&mut self.conn)
            .await?)
    }

    /// Transaction count, detail count and `SUM(TTL_AMT)` (0 on an empty table).
    pub async fn sales_stats(&mut self) -> Result<SalesStats, InspectError> {
        let transactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM `transaction`")
            .fetch_one(&mut self.conn)
            .await?;
        let details: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transaction_detail")
            .fetch_one(&mut self.conn)
            .await?;
        let total_sales: i64 = sqlx::query_scalar(
            "SELECT CAST(COALESCE(SUM(TTL_AMT), 0) AS SIGNED) FROM `transaction`",
        )
        .fetch_one(&mut self.conn)
        .await?;
        Ok(SalesStats {
            transactions,
            details,
            total_sales,
        })
    }

    pub async fn today_transactions(&mut self) -> Result<Vec<TransactionRow>, InspectError> {
        Ok(sqlx::query_as(TODAY_TRANSACTIONS_SQL)
            .fetch_all(&mut self.conn)
            .await?)
    }

    /// `DESCRIBE <table>`. Sent over the text protocol since the server refuses
    /// to prepare it on some versions.
    pub async fn describe(&mut self, table: &str) -> Result<Vec<ColumnDescription>, InspectError> {
        let sql = format!("DESCRIBE `{}`", table.replace('`', "``"));
        let rows = sqlx::raw_sql(&sql).fetch_all(&mut self.conn).await?;
        rows.iter().map(Self::row_to_column).collect()
    }

    fn row_to_column(row: &MySqlRow) -> Result<ColumnDescription, InspectError> {
        Ok(ColumnDescription {
            field: text_at(row, 0)?.unwrap_or_default(),
            sql_type: text_at(row, 1)?.unwrap_or_default(),
            null: text_at(row, 2)?.unwrap_or_default(),
            key: text_at(row, 3)?.unwrap_or_default(),
            default: text_at(row, 4)?,
            extra: text_at(row, 5)?.unwrap_or_default(),
        })
    }
}

// MySQL 8 reports some SHOW/DESCRIBE columns as binary strings, which do not decode as `String`.
fn text_at(row: &MySqlRow, index: usize) -> Result<Option<String>, sqlx::Error> {
    match row.try_get::<Option<String>, _>(index) {
        Err(sqlx::Error::ColumnDecode { .. }) => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .map(|bytes| bytes.map(|b| String::from_utf8_lossy(&b).into_owned())),
        other => other,
    }
}
