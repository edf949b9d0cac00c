//! Admin dashboard summary.

mod types;

pub use types::DashboardStats;
