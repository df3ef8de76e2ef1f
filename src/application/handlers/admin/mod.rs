//! Admin panel handlers.

mod admin_stats;

pub use admin_stats::{AdminStats, AdminStatsHandler};
