//! Lenient decoding of analytics API payloads
//!
//! The API is not consistent between endpoints and versions: payloads come
//! either wrapped as `{ "data": ... }` or bare, field names vary, and numbers
//! are sometimes sent as strings. Missing fields decode to zero/empty.

use super::dto::{
    CountryRevenuePage, CountryRevenueRow, DashboardSnapshot, MonthlySalesRow, PageMeta,
    SummaryDto, TopProductRow, TopRegionRow,
};
use serde_json::{Map, Value};
use thiserror::Error;

const UNKNOWN_PRODUCT: &str = "Unknown Product";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("expected a list of records, got {0}")]
    NotAList(&'static str),
    #[error("expected an object, got {0}")]
    NotAnObject(&'static str),
    #[error("record #{index} is {kind}, expected an object")]
    BadRecord { index: usize, kind: &'static str },
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Снимает обёртку `{ "data": ... }`, если она есть
pub fn unwrap_data(value: &Value) -> &Value {
    match value {
        Value::Object(map) => match map.get("data") {
            Some(inner) if !inner.is_null() => inner,
            _ => value,
        },
        _ => value,
    }
}

fn records(value: &Value) -> Result<&[Value], DecodeError> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Null => Ok(&[][..]),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            None | Some(Value::Null) => Ok(&[][..]),
            Some(other) => Err(DecodeError::NotAList(kind_of(other))),
        },
        other => Err(DecodeError::NotAList(kind_of(other))),
    }
}

fn decode_rows<T>(
    value: &Value,
    decode: impl Fn(&Fields<'_>) -> T,
) -> Result<Vec<T>, DecodeError> {
    records(value)?
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(decode(&Fields(map))),
            other => Err(DecodeError::BadRecord {
                index,
                kind: kind_of(other),
            }),
        })
        .collect()
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Field lookup with aliases; the first non-null alias wins
struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .find_map(|key| self.0.get(*key).filter(|v| !v.is_null()))
    }

    fn f64(&self, keys: &[&str]) -> f64 {
        self.opt_f64(keys).unwrap_or(0.0)
    }

    fn opt_f64(&self, keys: &[&str]) -> Option<f64> {
        self.get(keys)
            .and_then(as_f64)
            .filter(|v| v.is_finite())
    }

    fn u64(&self, keys: &[&str]) -> u64 {
        self.opt_u64(keys).unwrap_or(0)
    }

    fn opt_u64(&self, keys: &[&str]) -> Option<u64> {
        self.opt_f64(keys).map(|v| if v > 0.0 { v as u64 } else { 0 })
    }

    fn i64(&self, keys: &[&str]) -> i64 {
        self.opt_f64(keys).map(|v| v as i64).unwrap_or(0)
    }

    fn opt_bool(&self, keys: &[&str]) -> Option<bool> {
        match self.get(keys)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse::<bool>().ok(),
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            _ => None,
        }
    }

    fn opt_string(&self, keys: &[&str]) -> Option<String> {
        match self.get(keys)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn string(&self, keys: &[&str]) -> String {
        self.opt_string(keys).unwrap_or_default()
    }

    fn object(&self, key: &str) -> Option<Fields<'a>> {
        match self.0.get(key) {
            Some(Value::Object(map)) => Some(Fields(map)),
            _ => None,
        }
    }
}

fn country_revenue_row(f: &Fields<'_>) -> CountryRevenueRow {
    CountryRevenueRow {
        country: f.string(&["country"]),
        product_name: f.string(&["product_name", "productName"]),
        total_revenue: f.f64(&["total_revenue", "totalRevenue"]),
        transaction_count: f.u64(&["transaction_count", "transactionCount"]),
    }
}

fn top_product_row(f: &Fields<'_>) -> TopProductRow {
    TopProductRow {
        product_name: f
            .opt_string(&["product_name", "name", "product"])
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        purchase_count: f.u64(&["purchase_count", "purchaseCount", "purchases", "count"]),
        stock_quantity: f.i64(&["current_stock", "stock", "quantity"]),
    }
}

fn monthly_sales_row(f: &Fields<'_>) -> MonthlySalesRow {
    MonthlySalesRow {
        month: f.string(&["month"]),
        year: f.i64(&["year"]) as i32,
        sales_volume: f.f64(&["sales_volume", "salesVolume"]),
        total_sales: f.f64(&["total_sales", "totalSales"]),
    }
}

fn top_region_row(f: &Fields<'_>) -> TopRegionRow {
    TopRegionRow {
        region: f.string(&["region"]),
        total_revenue: f.f64(&["total_revenue", "totalRevenue"]),
        items_sold: f.u64(&["items_sold", "itemsSold"]),
    }
}

fn page_meta(f: &Fields<'_>) -> PageMeta {
    let meta = PageMeta {
        total: f.opt_u64(&["total", "count", "total_count", "totalCount"]),
        total_pages: f.opt_u64(&["totalPages", "total_pages"]).map(|v| v as u32),
        has_more: f.opt_bool(&["hasMore", "has_more"]),
    };
    if meta.is_empty() {
        if let Some(nested) = f.object("pagination") {
            return page_meta(&nested);
        }
    }
    meta
}

/// `/revenue-by-country`: rows plus whatever pagination metadata is present
pub fn decode_country_revenue_page(value: &Value) -> Result<CountryRevenuePage, DecodeError> {
    let rows = decode_rows(value, country_revenue_row)?;
    let meta = match value {
        Value::Object(map) => page_meta(&Fields(map)),
        _ => PageMeta::default(),
    };
    Ok(CountryRevenuePage { rows, meta })
}

pub fn decode_top_products(value: &Value) -> Result<Vec<TopProductRow>, DecodeError> {
    decode_rows(value, top_product_row)
}

pub fn decode_monthly_sales(value: &Value) -> Result<Vec<MonthlySalesRow>, DecodeError> {
    decode_rows(value, monthly_sales_row)
}

pub fn decode_top_regions(value: &Value) -> Result<Vec<TopRegionRow>, DecodeError> {
    decode_rows(value, top_region_row)
}

pub fn decode_summary(value: &Value) -> Result<SummaryDto, DecodeError> {
    let f = match unwrap_data(value) {
        Value::Object(map) => Fields(map),
        Value::Null => return Ok(SummaryDto::default()),
        other => return Err(DecodeError::NotAnObject(kind_of(other))),
    };

    Ok(SummaryDto {
        total_revenue: f.f64(&["total_revenue"]),
        total_records: f.u64(&["total_transactions", "total_records"]),
        total_countries: f.u64(&["total_countries"]),
        total_products: f.u64(&["unique_products", "total_products"]),
        months_covered: f.u64(&["months_covered"]),
        last_updated: f.opt_string(&["last_updated"]),
    })
}

pub fn decode_snapshot(value: &Value) -> Result<DashboardSnapshot, DecodeError> {
    let inner = unwrap_data(value);
    let map = match inner {
        Value::Object(map) => map,
        Value::Null => return Ok(DashboardSnapshot::default()),
        other => return Err(DecodeError::NotAnObject(kind_of(other))),
    };
    let f = Fields(map);
    let list = |key: &str| map.get(key).unwrap_or(&Value::Null);

    Ok(DashboardSnapshot {
        country_revenues: decode_rows(list("country_revenues"), country_revenue_row)?,
        top_products: decode_rows(list("top_products"), top_product_row)?,
        monthly_sales: decode_rows(list("monthly_sales"), monthly_sales_row)?,
        top_regions: decode_rows(list("top_regions"), top_region_row)?,
        record_count: f.u64(&["record_count"]),
        last_updated: f.opt_string(&["last_updated"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_and_bare_lists_decode_the_same() {
        let nested = json!({ "data": [{ "region": "North", "total_revenue": 10.5, "items_sold": 3 }] });
        let bare = json!([{ "region": "North", "total_revenue": 10.5, "items_sold": 3 }]);

        let a = decode_top_regions(&nested).unwrap();
        let b = decode_top_regions(&bare).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].region, "North");
        assert_eq!(a[0].items_sold, 3);
    }

    #[test]
    fn test_top_products_aliases_and_defaults() {
        let value = json!({ "data": [
            { "name": "Lamp", "count": 12, "stock": -2 },
            { "product": "Desk", "purchases": "7" },
            { "purchaseCount": 1 }
        ]});
        let rows = decode_top_products(&value).unwrap();

        assert_eq!(rows[0].product_name, "Lamp");
        assert_eq!(rows[0].purchase_count, 12);
        assert_eq!(rows[0].stock_quantity, -2);
        assert_eq!(rows[1].product_name, "Desk");
        assert_eq!(rows[1].purchase_count, 7);
        assert_eq!(rows[1].stock_quantity, 0);
        assert_eq!(rows[2].product_name, "Unknown Product");
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let value = json!([{ "month": "May", "year": "2024", "sales_volume": "1500", "total_sales": 99.9 }]);
        let rows = decode_monthly_sales(&value).unwrap();

        assert_eq!(rows[0].year, 2024);
        assert_eq!(rows[0].sales_volume, 1500.0);
        assert_eq!(rows[0].total_sales, 99.9);
    }

    #[test]
    fn test_country_page_meta() {
        let value = json!({
            "data": [{ "country": "DE", "product_name": "Lamp", "total_revenue": 5, "transaction_count": 2 }],
            "count": 120,
            "page": 2,
            "totalPages": 3,
            "hasMore": true
        });
        let page = decode_country_revenue_page(&value).unwrap();

        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.meta.total, Some(120));
        assert_eq!(page.meta.total_pages, Some(3));
        assert_eq!(page.meta.has_more, Some(true));
    }

    #[test]
    fn test_country_page_meta_in_pagination_object() {
        let value = json!({ "data": [], "pagination": { "total": 40, "has_more": false } });
        let page = decode_country_revenue_page(&value).unwrap();

        assert_eq!(page.meta.total, Some(40));
        assert_eq!(page.meta.has_more, Some(false));
    }

    #[test]
    fn test_bare_country_page_has_no_meta() {
        let value = json!([{ "country": "FR" }]);
        let page = decode_country_revenue_page(&value).unwrap();

        assert!(page.meta.is_empty());
        assert_eq!(page.rows[0].total_revenue, 0.0);
    }

    #[test]
    fn test_empty_object_is_an_empty_list() {
        assert!(decode_top_regions(&json!({})).unwrap().is_empty());
        assert!(decode_top_regions(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shapes_are_errors() {
        assert_eq!(
            decode_top_regions(&json!("oops")),
            Err(DecodeError::NotAList("a string"))
        );
        assert_eq!(
            decode_top_regions(&json!([1])),
            Err(DecodeError::BadRecord { index: 0, kind: "a number" })
        );
        assert_eq!(
            decode_summary(&json!([1, 2])),
            Err(DecodeError::NotAnObject("an array"))
        );
    }

    #[test]
    fn test_summary_aliases() {
        let a = decode_summary(&json!({ "data": {
            "total_revenue": 500000, "total_transactions": 42, "total_countries": 7,
            "unique_products": 19, "months_covered": 12, "last_updated": "2024-01-01T00:00:00Z"
        }}))
        .unwrap();
        let b = decode_summary(&json!({
            "total_revenue": "500000", "total_records": 42, "total_countries": 7,
            "total_products": 19, "months_covered": 12, "last_updated": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.total_revenue, 500_000.0);
        assert_eq!(a.total_products, 19);
    }

    #[test]
    fn test_snapshot() {
        let value = json!({ "data": {
            "country_revenues": [{ "country": "US", "product_name": "Lamp", "total_revenue": 10, "transaction_count": 1 }],
            "top_products": [{ "product_name": "Lamp", "purchase_count": 3, "current_stock": 5 }],
            "record_count": 1000,
            "last_updated": "2024-03-15T14:02:26Z"
        }});
        let snapshot = decode_snapshot(&value).unwrap();

        assert_eq!(snapshot.country_revenues.len(), 1);
        assert_eq!(snapshot.top_products[0].stock_quantity, 5);
        assert!(snapshot.monthly_sales.is_empty());
        assert_eq!(snapshot.record_count, 1000);
    }
}
