use crate::shared::api_utils;
use contracts::dashboards::d405_sales_analytics::{CountryRevenueQuery, SortOrder};

/// Rows per `/revenue-by-country` page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Slack after the last fetch settles before the render is considered done
pub const RENDER_SLACK_MS: u32 = 100;

pub const DEFAULT_SORT_FIELD: &str = "total_revenue";

/// Settings of the sales analytics dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Base URL of the analytics API, e.g. "http://localhost:8080/api"
    pub api_base: String,
    pub page_size: u32,
    pub render_slack_ms: u32,
    /// Server-side sort of the country revenue list; `None` sends no sort params
    pub sort: Option<(String, SortOrder)>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            render_slack_ms: RENDER_SLACK_MS,
            sort: Some((DEFAULT_SORT_FIELD.to_string(), SortOrder::Desc)),
        }
    }
}

impl AnalyticsConfig {
    /// Config for the browser build.
    ///
    /// `ANALYTICS_API_BASE` set at compile time wins, otherwise the API is
    /// expected next to the page host.
    pub fn from_env() -> Self {
        let api_base = match option_env!("ANALYTICS_API_BASE") {
            Some(base) if !base.trim().is_empty() => base.trim().to_string(),
            _ => api_utils::api_base(),
        };
        Self {
            api_base,
            ..Self::default()
        }
    }

    pub fn without_sort(mut self) -> Self {
        self.sort = None;
        self
    }

    /// Query for one page of the country revenue list
    pub fn country_query(&self, page: u32, limit: u32) -> CountryRevenueQuery {
        let query = CountryRevenueQuery::new(page, limit);
        match &self.sort {
            Some((field, order)) => query.with_sort(field.clone(), *order),
            None => query,
        }
    }
}
