pub mod points_ledger;
pub mod points_service;

pub use points_ledger::PointsDocument;
pub use points_service::PointsService;
