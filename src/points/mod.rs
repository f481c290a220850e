//! Points

pub mod errors;
pub mod gateway;
pub mod models;
pub mod service;

pub use errors::PointsError;
pub use gateway::{LedgerGateway, LedgerGatewayError};
pub use models::LedgerSnapshot;
pub use service::{CheckInOutcome, PointsBackend, PointsConfig, PointsService};
