//! Banner storage, reconciliation and cached lookup.

pub mod banner;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;

pub use error::{ServiceError, ServiceResult};
pub use service::BannerService;
