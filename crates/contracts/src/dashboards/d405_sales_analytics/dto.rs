use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Revenue of one product in one country (`/revenue-by-country`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryRevenueRow {
    pub country: String,
    pub product_name: String,
    pub total_revenue: f64,
    pub transaction_count: u64,
}

/// Product ranked by purchases (`/top-products`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopProductRow {
    pub product_name: String,
    pub purchase_count: u64,
    /// Current stock, may be negative when the warehouse is oversold
    pub stock_quantity: i64,
}

/// Sales aggregated by calendar month (`/sales-by-month`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySalesRow {
    /// Month name as sent by the server (e.g. "March")
    pub month: String,
    pub year: i32,
    pub sales_volume: f64,
    pub total_sales: f64,
}

/// Region ranked by revenue (`/top-regions`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopRegionRow {
    pub region: String,
    pub total_revenue: f64,
    pub items_sold: u64,
}

/// Scalar totals of the whole dataset (`/summary`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryDto {
    pub total_revenue: f64,
    /// `total_transactions` or `total_records` on the wire
    pub total_records: u64,
    pub total_countries: u64,
    /// `unique_products` or `total_products` on the wire
    pub total_products: u64,
    pub months_covered: u64,
    /// Server timestamp, usually RFC 3339
    pub last_updated: Option<String>,
}

impl SummaryDto {
    /// Derive totals from section data.
    ///
    /// Only as good as the data passed in: for a partially loaded country list
    /// the revenue is a partial sum.
    pub fn from_sections(
        country_revenue: &[CountryRevenueRow],
        top_products: &[TopProductRow],
        monthly_sales: &[MonthlySalesRow],
    ) -> Self {
        let countries: HashSet<&str> = country_revenue
            .iter()
            .map(|row| row.country.as_str())
            .collect();

        Self {
            total_revenue: country_revenue.iter().map(|row| row.total_revenue).sum(),
            total_records: 0,
            total_countries: countries.len() as u64,
            total_products: top_products.len() as u64,
            months_covered: monthly_sales.len() as u64,
            last_updated: None,
        }
    }

    /// Parsed `last_updated`, if the server sent a valid RFC 3339 timestamp
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_updated.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Pagination metadata as declared by the server; every field is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    /// `total` or `count`
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
    pub has_more: Option<bool>,
}

impl PageMeta {
    pub fn is_empty(&self) -> bool {
        self.total.is_none()
            && self.total_pages.is_none()
            && self.has_more.is_none()
    }
}

/// One page of `/revenue-by-country`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryRevenuePage {
    pub rows: Vec<CountryRevenueRow>,
    pub meta: PageMeta,
}

/// Legacy single-shot payload of `/dashboard`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub country_revenues: Vec<CountryRevenueRow>,
    pub top_products: Vec<TopProductRow>,
    pub monthly_sales: Vec<MonthlySalesRow>,
    pub top_regions: Vec<TopRegionRow>,
    pub record_count: u64,
    pub last_updated: Option<String>,
}

impl DashboardSnapshot {
    /// Summary computed from the snapshot lists plus its own record count
    pub fn derive_summary(&self) -> SummaryDto {
        let mut summary = SummaryDto::from_sections(
            &self.country_revenues,
            &self.top_products,
            &self.monthly_sales,
        );
        summary.total_records = self.record_count;
        summary.last_updated = self.last_updated.clone();
        summary
    }
}

/// Sort direction for `/revenue-by-country`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Query string of `/revenue-by-country`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRevenueQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl CountryRevenueQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            sort: None,
            order: None,
        }
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    /// Same page without sort parameters, for servers that reject them
    pub fn without_sort(&self) -> Self {
        Self::new(self.page, self.limit)
    }

    pub fn is_sorted(&self) -> bool {
        self.sort.is_some() || self.order.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, revenue: f64) -> CountryRevenueRow {
        CountryRevenueRow {
            country: country.to_string(),
            product_name: "Widget".to_string(),
            total_revenue: revenue,
            transaction_count: 1,
        }
    }

    #[test]
    fn test_summary_from_sections() {
        let rows = vec![row("DE", 100.0), row("FR", 50.5), row("DE", 10.0)];
        let products = vec![TopProductRow::default(), TopProductRow::default()];
        let summary = SummaryDto::from_sections(&rows, &products, &[]);

        assert_eq!(summary.total_revenue, 160.5);
        assert_eq!(summary.total_countries, 2);
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.months_covered, 0);
    }

    #[test]
    fn test_snapshot_summary_keeps_record_count() {
        let snapshot = DashboardSnapshot {
            country_revenues: vec![row("US", 7.0)],
            record_count: 12_000,
            last_updated: Some("2024-03-15T14:02:26Z".to_string()),
            ..Default::default()
        };
        let summary = snapshot.derive_summary();

        assert_eq!(summary.total_records, 12_000);
        assert_eq!(summary.total_revenue, 7.0);
        assert!(summary.last_updated_at().is_some());
    }

    #[test]
    fn test_query_without_sort() {
        let query = CountryRevenueQuery::new(3, 50).with_sort("total_revenue", SortOrder::Desc);
        assert!(query.is_sorted());

        let plain = query.without_sort();
        assert!(!plain.is_sorted());
        assert_eq!(plain.page, 3);
        assert_eq!(plain.limit, 50);
    }

    #[test]
    fn test_query_clamps_page_and_limit() {
        let query = CountryRevenueQuery::new(0, 0);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 1);
    }
}
