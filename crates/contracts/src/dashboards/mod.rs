pub mod d405_sales_analytics;
