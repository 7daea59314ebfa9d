//! JSON bodies of the POS REST API (`/api/v1/products/{code}`, `/api/v1/purchase`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator code the server stores when `EMP_CD` is sent empty.
pub const DEFAULT_OPERATOR_CODE: &str = "9999999999";

/// Store code reserved for the mobile register.
pub const MOBILE_STORE_CODE: &str = "30";

/// POS terminal number reserved for the mobile register.
pub const MOBILE_POS_NO: &str = "90";

/// Product master entry as returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Product {
    pub prd_id: i64,
    pub code: String,
    pub name: String,
    pub price: i64,
}

/// One product entry of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LineItem {
    pub prd_id: i64,
    pub code: String,
    pub name: String,
    pub price: i64,
    #[serde(rename = "quantity")]
    pub quantity: i64,
}

impl LineItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self {
            prd_id: product.prd_id,
            code: product.code.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
        }
    }

    /// `PRICE x quantity`, `None` on overflow.
    pub fn amount(&self) -> Option<i64> {
        self.price.checked_mul(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PurchaseRequest {
    pub emp_cd: String,
    pub store_cd: String,
    pub pos_no: String,
    #[serde(rename = "products")]
    pub products: Vec<LineItem>,
}

impl PurchaseRequest {
    /// Purchase from the mobile register (store `30`, terminal `90`).
    pub fn mobile(emp_cd: impl Into<String>, products: Vec<LineItem>) -> Self {
        Self {
            emp_cd: emp_cd.into(),
            store_cd: MOBILE_STORE_CODE.to_string(),
            pos_no: MOBILE_POS_NO.to_string(),
            products,
        }
    }

    /// Sum of `PRICE x quantity` over every line. Prices come from the server,
    /// so overflow is possible and yields `None`.
    pub fn expected_total(&self) -> Option<i64> {
        self.products
            .iter()
            .try_fold(0i64, |total, line| total.checked_add(line.amount()?))
    }
}

/// Transaction identifier; some backends send it as a number, some as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionId::Number(n) => write!(f, "{n}"),
            TransactionId::Text(s) => f.write_str(s),
        }
    }
}

/// Raw purchase response. `TOTAL_AMT` and `TRD_ID` are only guaranteed when `success` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub success: bool,
    #[serde(rename = "TOTAL_AMT", default)]
    pub total_amt: Option<i64>,
    #[serde(rename = "TRD_ID", default)]
    pub trd_id: Option<TransactionId>,
}

/// Purchase response after the required fields have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub total_amt: i64,
    pub trd_id: TransactionId,
}
