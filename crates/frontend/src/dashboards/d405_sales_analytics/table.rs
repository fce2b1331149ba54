//! Client-side search, sort and stats of the loaded country revenue rows

use crate::shared::list_utils::{filter_list, is_filter_active, sort_list, Searchable, Sortable};
use contracts::dashboards::d405_sales_analytics::{CountryRevenueRow, SortOrder};
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Country,
    ProductName,
    TotalRevenue,
    TransactionCount,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Country,
        SortField::ProductName,
        SortField::TotalRevenue,
        SortField::TransactionCount,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortField::Country => "country",
            SortField::ProductName => "product_name",
            SortField::TotalRevenue => "total_revenue",
            SortField::TransactionCount => "transaction_count",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::Country => "Country",
            SortField::ProductName => "Product",
            SortField::TotalRevenue => "Revenue",
            SortField::TransactionCount => "Transactions",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, SortField::TotalRevenue | SortField::TransactionCount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for TableSort {
    /// Matches the order the server sends pages in
    fn default() -> Self {
        Self {
            field: SortField::TotalRevenue,
            order: SortOrder::Desc,
        }
    }
}

impl TableSort {
    /// Clicking the active column flips it, another column starts descending
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                order: self.order.toggled(),
            }
        } else {
            Self {
                field,
                order: SortOrder::Desc,
            }
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.order == SortOrder::Asc
    }

    /// Revenue order is left to the server, in either direction
    fn is_server_order(&self) -> bool {
        self.field == SortField::TotalRevenue
    }
}

impl Searchable for CountryRevenueRow {
    fn matches_filter(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.country.to_lowercase().contains(&filter)
            || self.product_name.to_lowercase().contains(&filter)
    }
}

impl Sortable for CountryRevenueRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "country" => self.country.to_lowercase().cmp(&other.country.to_lowercase()),
            "product_name" => self
                .product_name
                .to_lowercase()
                .cmp(&other.product_name.to_lowercase()),
            "transaction_count" => self.transaction_count.cmp(&other.transaction_count),
            _ => self.total_revenue.total_cmp(&other.total_revenue),
        }
    }
}

/// Rows to display: search filter, then sort.
///
/// Sorting by revenue with no search keeps the server order as is.
pub fn visible_rows(
    rows: &[CountryRevenueRow],
    search: &str,
    sort: TableSort,
) -> Vec<CountryRevenueRow> {
    let mut visible = filter_list(rows, search);
    if sort.is_server_order() && !is_filter_active(search) {
        return visible;
    }
    sort_list(&mut visible, sort.field.key(), sort.is_ascending());
    visible
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStats {
    pub total_revenue: f64,
    pub total_transactions: u64,
    pub unique_countries: usize,
    pub unique_products: usize,
}

impl TableStats {
    pub fn from_rows(rows: &[CountryRevenueRow]) -> Self {
        let countries: HashSet<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        let products: HashSet<&str> = rows.iter().map(|r| r.product_name.as_str()).collect();
        Self {
            total_revenue: rows.iter().map(|r| r.total_revenue).sum(),
            total_transactions: rows.iter().map(|r| r.transaction_count).sum(),
            unique_countries: countries.len(),
            unique_products: products.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, product: &str, revenue: f64, count: u64) -> CountryRevenueRow {
        CountryRevenueRow {
            country: country.to_string(),
            product_name: product.to_string(),
            total_revenue: revenue,
            transaction_count: count,
        }
    }

    /// Server order with a tie the client sort must not reshuffle
    fn rows() -> Vec<CountryRevenueRow> {
        vec![
            row("Germany", "Lamp", 900.0, 3),
            row("France", "Desk", 500.0, 9),
            row("Austria", "Chair", 500.0, 1),
            row("germany", "Desk", 100.0, 4),
        ]
    }

    fn countries(rows: &[CountryRevenueRow]) -> Vec<&str> {
        rows.iter().map(|r| r.country.as_str()).collect()
    }

    #[test]
    fn test_toggle() {
        let sort = TableSort::default();
        let flipped = sort.toggle(SortField::TotalRevenue);
        assert_eq!(flipped.order, SortOrder::Asc);

        let other = flipped.toggle(SortField::Country);
        assert_eq!(other.field, SortField::Country);
        assert_eq!(other.order, SortOrder::Desc);
    }

    #[test]
    fn test_default_sort_keeps_server_order() {
        let visible = visible_rows(&rows(), "", TableSort::default());
        assert_eq!(visible, rows());
    }

    #[test]
    fn test_search_matches_country_or_product() {
        let visible = visible_rows(&rows(), "GERM", TableSort::default());
        assert_eq!(countries(&visible), vec!["Germany", "germany"]);

        let visible = visible_rows(&rows(), "desk", TableSort::default());
        assert_eq!(countries(&visible), vec!["France", "germany"]);
    }

    #[test]
    fn test_sort_by_column() {
        let asc = TableSort {
            field: SortField::Country,
            order: SortOrder::Asc,
        };
        assert_eq!(
            countries(&visible_rows(&rows(), "", asc)),
            vec!["Austria", "France", "Germany", "germany"]
        );

        let by_count = TableSort::default().toggle(SortField::TransactionCount);
        assert_eq!(
            countries(&visible_rows(&rows(), "", by_count)),
            vec!["France", "germany", "Germany", "Austria"]
        );
    }

    #[test]
    fn test_revenue_ascending_keeps_server_order() {
        let rows = vec![row("A", "Lamp", 900.0, 1), row("B", "Desk", 100.0, 1)];
        let asc = TableSort::default().toggle(SortField::TotalRevenue);
        assert!(asc.is_ascending());
        assert_eq!(countries(&visible_rows(&rows, "", asc)), vec!["A", "B"]);
    }

    #[test]
    fn test_revenue_ascending_with_search_is_sorted() {
        let asc = TableSort::default().toggle(SortField::TotalRevenue);
        assert_eq!(
            countries(&visible_rows(&rows(), "a", asc)),
            vec!["germany", "France", "Austria", "Germany"]
        );
    }

    #[test]
    fn test_stats() {
        let stats = TableStats::from_rows(&rows());
        assert_eq!(stats.total_revenue, 2000.0);
        assert_eq!(stats.total_transactions, 17);
        assert_eq!(stats.unique_countries, 4);
        assert_eq!(stats.unique_products, 3);
        assert_eq!(TableStats::from_rows(&[]), TableStats::default());
    }
}
