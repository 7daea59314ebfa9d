pub mod pos_api;

pub use pos_api::PosApi;
