pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod service;
pub mod types;

pub use config::Config;
pub use error::InspectError;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
