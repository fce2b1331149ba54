mod charts;
mod country_table;
pub mod dashboard;

pub use dashboard::SalesAnalyticsDashboard;
