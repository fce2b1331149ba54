pub mod d405_sales_analytics;

pub use d405_sales_analytics::ui::SalesAnalyticsDashboard;
