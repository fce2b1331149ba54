//! Chart-ready series and headline numbers of the secondary sections

use contracts::dashboards::d405_sales_analytics::{MonthlySalesRow, TopProductRow, TopRegionRow};

pub const TOP_PRODUCTS_SHOWN: usize = 20;
pub const TOP_REGIONS_SHOWN: usize = 30;
pub const PEAK_MONTHS_SHOWN: usize = 4;

const PRODUCT_LABEL_CHARS: usize = 25;
const REGION_LABEL_CHARS: usize = 20;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// First `max_chars` characters plus "..." when longer
pub fn truncate_label(name: &str, max_chars: usize) -> String {
    match name.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &name[..cut]),
        None => name.to_string(),
    }
}

/// 0-based calendar index; `None` for names outside January..December
pub fn month_index(month: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == month.trim())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar<T> {
    pub label: String,
    pub row: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductInsights {
    /// Purchase count desc, at most [`TOP_PRODUCTS_SHOWN`]
    pub bars: Vec<Bar<TopProductRow>>,
    /// All products received, not only the charted ones
    pub total_products: usize,
    pub top_product: String,
    pub avg_purchases: u64,
}

impl ProductInsights {
    pub fn from_rows(rows: &[TopProductRow]) -> Self {
        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| b.purchase_count.cmp(&a.purchase_count));
        sorted.truncate(TOP_PRODUCTS_SHOWN);

        let avg_purchases = if sorted.is_empty() {
            0
        } else {
            let sum: u64 = sorted.iter().map(|r| r.purchase_count).sum();
            (sum as f64 / sorted.len() as f64).round() as u64
        };
        let top_product = sorted
            .first()
            .map(|r| r.product_name.clone())
            .unwrap_or_else(|| "N/A".to_string());

        Self {
            bars: sorted
                .into_iter()
                .map(|row| Bar {
                    label: truncate_label(&row.product_name, PRODUCT_LABEL_CHARS),
                    row,
                })
                .collect(),
            total_products: rows.len(),
            top_product,
            avg_purchases,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyInsights {
    /// Calendar order, unknown month names first; label is "<month> <year>"
    pub points: Vec<Bar<MonthlySalesRow>>,
    pub peak_month: Option<String>,
    pub peak_volume: f64,
    pub total_revenue: f64,
    pub avg_volume: u64,
    /// Highest volume first, at most [`PEAK_MONTHS_SHOWN`]
    pub top_months: Vec<Bar<MonthlySalesRow>>,
}

impl MonthlyInsights {
    pub fn from_rows(rows: &[MonthlySalesRow]) -> Self {
        let mut sorted = rows.to_vec();
        // None < Some(_): unknown names go first, stable otherwise
        sorted.sort_by_key(|r| month_index(&r.month));

        let points: Vec<Bar<MonthlySalesRow>> = sorted
            .into_iter()
            .map(|row| Bar {
                label: format!("{} {}", row.month, row.year),
                row,
            })
            .collect();

        // First of equal maxima wins
        let peak = points.iter().fold(None::<&Bar<MonthlySalesRow>>, |max, p| match max {
            Some(m) if p.row.sales_volume <= m.row.sales_volume => Some(m),
            _ => Some(p),
        });

        let total_revenue = points.iter().map(|p| p.row.total_sales).sum();
        let avg_volume = if points.is_empty() {
            0
        } else {
            let sum: f64 = points.iter().map(|p| p.row.sales_volume).sum();
            (sum / points.len() as f64).round().max(0.0) as u64
        };

        let mut top_months = points.clone();
        top_months.sort_by(|a, b| b.row.sales_volume.total_cmp(&a.row.sales_volume));
        top_months.truncate(PEAK_MONTHS_SHOWN);

        Self {
            peak_month: peak.map(|p| p.label.clone()),
            peak_volume: peak.map(|p| p.row.sales_volume).unwrap_or(0.0),
            points,
            total_revenue,
            avg_volume,
            top_months,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionInsights {
    /// Server order, at most [`TOP_REGIONS_SHOWN`]
    pub bars: Vec<Bar<TopRegionRow>>,
    pub total_revenue: f64,
    pub total_items: u64,
    pub top_region: String,
}

impl RegionInsights {
    pub fn from_rows(rows: &[TopRegionRow]) -> Self {
        let shown = &rows[..rows.len().min(TOP_REGIONS_SHOWN)];
        Self {
            bars: shown
                .iter()
                .map(|row| Bar {
                    label: truncate_label(&row.region, REGION_LABEL_CHARS),
                    row: row.clone(),
                })
                .collect(),
            total_revenue: shown.iter().map(|r| r.total_revenue).sum(),
            total_items: shown.iter().map(|r| r.items_sold).sum(),
            top_region: shown
                .first()
                .map(|r| r.region.clone())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Bar width relative to the largest value, in percent
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}
