pub mod pos;

pub use pos::{
    LineItem, Product, PurchaseReceipt, PurchaseRequest, PurchaseResponse, TransactionId,
};
