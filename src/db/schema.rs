//! Expected layout of the three POS tables and a structural diff against
//! what `DESCRIBE` reports.

use crate::db::models::ColumnDescription;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedColumn {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub primary_key: bool,
    pub unique: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedTable {
    pub name: &'static str,
    pub title: &'static str,
    pub columns: &'static [ExpectedColumn],
}

const fn col(
    name: &'static str,
    sql_type: &'static str,
    primary_key: bool,
    description: &'static str,
) -> ExpectedColumn {
    ExpectedColumn {
        name,
        sql_type,
        primary_key,
        unique: false,
        description,
    }
}

pub const PRODUCT_MASTER: ExpectedTable = ExpectedTable {
    name: "product_master",
    title: "Product master",
    columns: &[
        col("PRD_ID", "integer", true, "product unique key"),
        ExpectedColumn {
            unique: true,
            ..col("CODE", "char(13)", false, "product code")
        },
        col("NAME", "varchar(50)", false, "product name"),
        col("PRICE", "integer", false, "unit price"),
    ],
};

pub const TRANSACTION: ExpectedTable = ExpectedTable {
    name: "transaction",
    title: "Transaction",
    columns: &[
        col("TRD_ID", "integer", true, "transaction unique key"),
        col("DATETIME", "timestamp", false, "transaction date and time"),
        col("EMP_CD", "char(10)", false, "operator code"),
        col("STORE_CD", "char(5)", false, "store code"),
        col("POS_NO", "char(5)", false, "POS terminal id"),
        col("TOTAL_AMT", "integer", false, "total amount"),
    ],
};

pub const TRANSACTION_DETAIL: ExpectedTable = ExpectedTable {
    name: "transaction_detail",
    title: "Transaction detail",
    columns: &[
        col("TRD_ID", "integer", true, "transaction unique key"),
        col("DTL_ID", "integer", true, "detail unique key"),
        col("PRD_ID", "integer", false, "product unique key"),
        col("PRD_CODE", "char(13)", false, "product code"),
        col("PRD_NAME", "varchar(50)", false, "product name"),
        col("PRD_PRICE", "integer", false, "unit price"),
    ],
};

pub const EXPECTED_SCHEMA: &[ExpectedTable] = &[PRODUCT_MASTER, TRANSACTION, TRANSACTION_DETAIL];

impl fmt::Display for ExpectedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.primary_key {
            write!(f, " (PK)")?;
        }
        write!(f, " {} - {}", self.sql_type, self.description)?;
        if self.unique {
            write!(f, " (unique)")?;
        }
        Ok(())
    }
}

/// One difference between the expected table and the live one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDrift {
    Missing {
        column: &'static str,
    },
    Unexpected {
        column: String,
        sql_type: String,
    },
    Retyped {
        column: &'static str,
        expected: &'static str,
        actual: String,
    },
    KeyMismatch {
        column: &'static str,
        expected_primary: bool,
    },
}

impl fmt::Display for SchemaDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDrift::Missing { column } => write!(f, "missing column {column}"),
            SchemaDrift::Unexpected { column, sql_type } => {
                write!(f, "unexpected column {column} {sql_type}")
            }
            SchemaDrift::Retyped {
                column,
                expected,
                actual,
            } => write!(f, "column {column} is {actual}, expected {expected}"),
            SchemaDrift::KeyMismatch {
                column,
                expected_primary: true,
            } => write!(f, "column {column} should be part of the primary key"),
            SchemaDrift::KeyMismatch {
                column,
                expected_primary: false,
            } => write!(f, "column {column} should not be part of the primary key"),
        }
    }
}

impl ExpectedTable {
    /// Compare against `DESCRIBE` output. Column names match case-insensitively,
    /// types after normalisation (`integer` == `int(11)`).
    pub fn diff(&self, actual: &[ColumnDescription]) -> Vec<SchemaDrift> {
        let mut drift = Vec::new();

        for expected in self.columns {
            let Some(found) = actual
                .iter()
                .find(|c| c.field.eq_ignore_ascii_case(expected.name))
            else {
                drift.push(SchemaDrift::Missing {
                    column: expected.name,
                });
                continue;
            };
            if normalize_type(expected.sql_type) != normalize_type(&found.sql_type) {
                drift.push(SchemaDrift::Retyped {
                    column: expected.name,
                    expected: expected.sql_type,
                    actual: found.sql_type.clone(),
                });
            }
            if expected.primary_key != found.is_primary_key() {
                drift.push(SchemaDrift::KeyMismatch {
                    column: expected.name,
                    expected_primary: expected.primary_key,
                });
            }
        }

        drift.extend(
            actual
                .iter()
                .filter(|c| {
                    !self
                        .columns
                        .iter()
                        .any(|e| e.name.eq_ignore_ascii_case(&c.field))
                })
                .map(|c| SchemaDrift::Unexpected {
                    column: c.field.clone(),
                    sql_type: c.sql_type.clone(),
                }),
        );
        drift
    }
}

const INTEGER_TYPES: &[&str] = &["tinyint", "smallint", "mediumint", "int", "bigint"];

/// Lower-case, map `integer` to `int` and drop integer display widths.
pub fn normalize_type(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    let lower = match lower.strip_prefix("integer") {
        Some(rest) => format!("int{rest}"),
        None => lower,
    };
    let split = lower.find(['(', ' ']).unwrap_or(lower.len());
    let (base, rest) = lower.split_at(split);
    if INTEGER_TYPES.contains(&base)
        && rest.starts_with('(')
        && let Some(close) = rest.find(')')
    {
        return format!("{base}{}", &rest[close + 1..]);
    }
    lower
}
