pub mod commands;
pub mod controller;
pub mod summary;

pub use controller::ReportsController;
pub use summary::{CustomerTimingSummary, TimingsOverview};
