use async_trait::async_trait;
use contracts::dashboards::d405_sales_analytics::{
    decode_country_revenue_page, decode_monthly_sales, decode_snapshot, decode_summary,
    decode_top_products, decode_top_regions, CountryRevenuePage, CountryRevenueQuery,
    DashboardSnapshot, DecodeError, MonthlySalesRow, SummaryDto, TopProductRow, TopRegionRow,
};
use gloo_net::http::Request;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl From<DecodeError> for FetchError {
    fn from(err: DecodeError) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Endpoints of the analytics API used by the dashboard
#[async_trait(?Send)]
pub trait DashboardApi {
    async fn summary(&self) -> Result<SummaryDto, FetchError>;

    /// Legacy single-shot payload, used when `/summary` is unavailable
    async fn snapshot(&self) -> Result<DashboardSnapshot, FetchError>;

    async fn country_revenue(
        &self,
        query: &CountryRevenueQuery,
    ) -> Result<CountryRevenuePage, FetchError>;

    async fn top_products(&self) -> Result<Vec<TopProductRow>, FetchError>;

    async fn monthly_sales(&self) -> Result<Vec<MonthlySalesRow>, FetchError>;

    async fn top_regions(&self) -> Result<Vec<TopRegionRow>, FetchError>;
}

/// HTTP client over `gloo-net`
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    base: String,
}

impl HttpDashboardApi {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Выполнить GET и вернуть тело ответа как JSON
async fn get_json(url: &str) -> Result<Value, FetchError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Http(response.status()));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl DashboardApi for HttpDashboardApi {
    async fn summary(&self) -> Result<SummaryDto, FetchError> {
        let body = get_json(&self.url("/summary")).await?;
        Ok(decode_summary(&body)?)
    }

    async fn snapshot(&self) -> Result<DashboardSnapshot, FetchError> {
        let body = get_json(&self.url("/dashboard")).await?;
        Ok(decode_snapshot(&body)?)
    }

    async fn country_revenue(
        &self,
        query: &CountryRevenueQuery,
    ) -> Result<CountryRevenuePage, FetchError> {
        let query_string =
            serde_qs::to_string(query).map_err(|e| FetchError::Request(e.to_string()))?;
        let url = format!("{}?{}", self.url("/revenue-by-country"), query_string);

        let body = get_json(&url).await?;
        Ok(decode_country_revenue_page(&body)?)
    }

    async fn top_products(&self) -> Result<Vec<TopProductRow>, FetchError> {
        let body = get_json(&self.url("/top-products")).await?;
        Ok(decode_top_products(&body)?)
    }

    async fn monthly_sales(&self) -> Result<Vec<MonthlySalesRow>, FetchError> {
        let body = get_json(&self.url("/sales-by-month")).await?;
        Ok(decode_monthly_sales(&body)?)
    }

    async fn top_regions(&self) -> Result<Vec<TopRegionRow>, FetchError> {
        let body = get_json(&self.url("/top-regions")).await?;
        Ok(decode_top_regions(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d405_sales_analytics::SortOrder;

    #[test]
    fn test_url_trims_trailing_slash() {
        let api = HttpDashboardApi::new("http://localhost:8080/api/");
        assert_eq!(api.url("/summary"), "http://localhost:8080/api/summary");
    }

    #[test]
    fn test_country_query_string() {
        let sorted = CountryRevenueQuery::new(2, 50).with_sort("total_revenue", SortOrder::Desc);
        assert_eq!(
            serde_qs::to_string(&sorted).unwrap(),
            "page=2&limit=50&sort=total_revenue&order=desc"
        );
        assert_eq!(
            serde_qs::to_string(&sorted.without_sort()).unwrap(),
            "page=2&limit=50"
        );
    }

    #[test]
    fn test_decode_error_maps_to_fetch_error() {
        let err: FetchError = DecodeError::NotAList("a string").into();
        assert_eq!(
            err.to_string(),
            "Failed to parse response: expected a list of records, got a string"
        );
    }
}
