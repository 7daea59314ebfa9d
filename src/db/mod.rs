//! Read-only access to the POS database.
//!
//! Layout:
//! - `models.rs`: structs mirroring the rows the inspectors print
//! - `schema.rs`: the expected table layout and a structural diff against `DESCRIBE`
//! - `mysql.rs`: the single TLS connection and the fixed statements run over it

pub mod models;
pub mod mysql;
pub mod schema;

pub use models::{
    ColumnDescription, ProductRow, SalesStats, TransactionDetailRow, TransactionRow,
};
pub use mysql::PosDatabase;
pub use schema::{EXPECTED_SCHEMA, ExpectedColumn, ExpectedTable, SchemaDrift};
