//! Order filtering, pagination and partner sales aggregation.
//!
//! The upstream orders endpoint supports no filter parameters, so callers
//! over-fetch a large page and everything below runs in memory over that
//! snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Upstream page size for the orders listing.
pub const ORDER_FETCH_LIMIT: u32 = 1000;
/// Upstream page size when aggregating partner sales.
pub const SALES_FETCH_LIMIT: u32 = 10_000;

/// An order as the admin API returns it. Only the fields the filters and the
/// sales aggregation touch are typed; everything else passes through `extra`
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "affiliate_id", default)]
    pub affiliate_id: Option<String>,
    #[serde(default)]
    pub stripe_session_id: Option<String>,
    #[serde(default, deserialize_with = "coerce_price")]
    pub price: f64,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub design: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Missing or malformed prices coerce to zero instead of rejecting the order.
fn coerce_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Accepts an RFC 3339 timestamp; anything else becomes `None`.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|text| text.parse::<DateTime<Utc>>().ok()))
}

/// Pull the `items` array out of an upstream orders page, skipping entries
/// that fail to deserialize rather than dropping the whole page.
pub fn parse_items(response: &Value) -> Vec<Order> {
    let Some(items) = response.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(order) => Some(order),
            Err(err) => {
                warn!(error = %err, "skipping unparseable order record");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    Today,
    Week,
    Month,
    #[default]
    All,
}

impl DateFilter {
    /// Inclusive lower bound on `createdAt`; `None` means no floor.
    pub fn floor(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DateFilter::Today => Some(now.date_naive().and_time(NaiveTime::MIN).and_utc()),
            DateFilter::Week => Some(now - Duration::days(7)),
            DateFilter::Month => Some(now - Duration::days(30)),
            DateFilter::All => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilters {
    pub search: Option<String>,
    pub status: Option<String>,
    pub date_filter: DateFilter,
}

/// Applies search, status and date filters in sequence. The result is an
/// order-preserving subset of the input and is idempotent under
/// re-application of the same filters.
pub fn filter_orders<'a>(
    orders: &'a [Order],
    filters: &OrderFilters,
    now: DateTime<Utc>,
) -> Vec<&'a Order> {
    let search = filters
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|term| !term.is_empty());
    let status = filters
        .status
        .as_deref()
        .filter(|status| !status.is_empty() && *status != "all");
    let floor = filters.date_filter.floor(now);

    orders
        .iter()
        .filter(|order| {
            if let Some(term) = &search {
                let hit = [
                    &order.user_email,
                    &order.artist,
                    &order.title,
                    &order.template_name,
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(term.as_str()));
                if !hit {
                    return false;
                }
            }
            if let Some(want) = status {
                if order.status.as_deref() != Some(want) {
                    return false;
                }
            }
            if let Some(floor) = floor {
                match order.created_at {
                    Some(at) if at >= floor => {}
                    _ => return false,
                }
            }
            true
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct OrderPage<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Slices a filtered list into a 1-based page. Out-of-range pages come back
/// empty with the totals intact.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> OrderPage<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = (start + page_size).min(total);

    OrderPage {
        items: items[start..end].to_vec(),
        total,
        page,
        page_size,
        total_pages,
    }
}

const MONTH_NAMES: [&str; 12] = [
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

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub total_sales: f64,
    pub order_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub partner_id: String,
    pub monthly_sales: Vec<MonthlySales>,
    pub total_sales: f64,
    pub total_orders: u64,
}

/// A live, completed order attributed to the partner. Sandbox checkout
/// sessions never count towards revenue share.
fn is_live_completed(order: &Order, partner_id: &str) -> bool {
    order.affiliate_id.as_deref() == Some(partner_id)
        && order
            .stripe_session_id
            .as_deref()
            .is_some_and(|session| session.starts_with("cs_live_"))
        && order.status.as_deref() == Some("completed")
}

/// Groups the partner's live completed orders by calendar month, newest
/// bucket first. Orders without a parseable `createdAt` are left out of the
/// buckets.
pub fn partner_sales(orders: &[Order], partner_id: &str) -> SalesReport {
    let mut buckets: BTreeMap<String, MonthlySales> = BTreeMap::new();

    for order in orders.iter().filter(|o| is_live_completed(o, partner_id)) {
        let Some(at) = order.created_at else { continue };
        let (year, month) = (at.year(), at.month());
        let key = format!("{year:04}-{month:02}");
        let bucket = buckets.entry(key).or_insert_with(|| MonthlySales {
            year,
            month,
            month_name: format!("{} {}", MONTH_NAMES[month as usize - 1], year),
            total_sales: 0.0,
            order_count: 0,
        });
        bucket.total_sales += order.price;
        bucket.order_count += 1;
    }

    // BTreeMap iterates ascending by "YYYY-MM" key; reverse for newest first.
    let monthly_sales: Vec<MonthlySales> = buckets.into_values().rev().collect();
    let total_sales = monthly_sales.iter().map(|m| m.total_sales).sum();
    let total_orders = monthly_sales.iter().map(|m| m.order_count).sum();

    SalesReport {
        partner_id: partner_id.to_string(),
        monthly_sales,
        total_sales,
        total_orders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(value: Value) -> Order {
        serde_json::from_value(value).unwrap()
    }

    fn now() -> DateTime<Utc> {
        "2026-08-28T12:00:00Z".parse().unwrap()
    }

    fn sample_orders() -> Vec<Order> {
        vec![
            order(json!({
                "userEmail": "ada@example.com",
                "artist": "Ada",
                "title": "First Light",
                "templateName": "backdrop",
                "status": "completed",
                "createdAt": "2026-08-28T09:00:00Z",
                "price": 12.5
            })),
            order(json!({
                "userEmail": "brian@example.com",
                "artist": "Brian",
                "title": "Night Drive",
                "templateName": "neon",
                "status": "pending",
                "createdAt": "2026-08-27T09:00:00Z",
                "price": 8.0
            })),
            order(json!({
                "userEmail": "carol@example.com",
                "artist": "Carol",
                "title": "Afterglow",
                "templateName": "backdrop",
                "status": "completed",
                "createdAt": "2026-06-01T09:00:00Z",
                "price": 5.0
            })),
        ]
    }

    #[test]
    fn search_is_case_insensitive_and_spans_fields() {
        let orders = sample_orders();
        let filters = OrderFilters {
            search: Some("BACKDROP".to_string()),
            ..OrderFilters::default()
        };
        let hits = filter_orders(&orders, &filters, now());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].artist.as_deref(), Some("Ada"));
        assert_eq!(hits[1].artist.as_deref(), Some("Carol"));
    }

    #[test]
    fn status_filter_selects_exact_matches_only() {
        // Scenario: completed today vs pending yesterday.
        let orders = sample_orders();
        let filters = OrderFilters {
            status: Some("completed".to_string()),
            date_filter: DateFilter::Week,
            ..OrderFilters::default()
        };
        let hits = filter_orders(&orders, &filters, now());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title.as_deref(), Some("First Light"));
    }

    #[test]
    fn status_all_matches_everything() {
        let orders = sample_orders();
        let filters = OrderFilters {
            status: Some("all".to_string()),
            ..OrderFilters::default()
        };
        assert_eq!(filter_orders(&orders, &filters, now()).len(), 3);
    }

    #[test]
    fn date_floor_today_starts_at_midnight() {
        let orders = sample_orders();
        let filters = OrderFilters {
            date_filter: DateFilter::Today,
            ..OrderFilters::default()
        };
        let hits = filter_orders(&orders, &filters, now());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title.as_deref(), Some("First Light"));
    }

    #[test]
    fn filtering_preserves_order_and_is_idempotent() {
        let orders = sample_orders();
        let filters = OrderFilters {
            status: Some("completed".to_string()),
            ..OrderFilters::default()
        };
        let once: Vec<&Order> = filter_orders(&orders, &filters, now());
        let titles: Vec<_> = once.iter().map(|o| o.title.clone()).collect();

        let cloned: Vec<Order> = once.iter().map(|o| (*o).clone()).collect();
        let twice = filter_orders(&cloned, &filters, now());
        let titles_again: Vec<_> = twice.iter().map(|o| o.title.clone()).collect();
        assert_eq!(titles, titles_again);
    }

    #[test]
    fn pagination_math() {
        let items: Vec<u32> = (0..7).collect();

        let first = paginate(&items, 1, 3);
        assert_eq!(first.items, vec![0, 1, 2]);
        assert_eq!(first.total, 7);
        assert_eq!(first.total_pages, 3);

        let last = paginate(&items, 3, 3);
        assert_eq!(last.items, vec![6]);

        let past_the_end = paginate(&items, 9, 3);
        assert!(past_the_end.items.is_empty());
        assert_eq!(past_the_end.total_pages, 3);

        let exact = paginate(&items[..6], 2, 3);
        assert_eq!(exact.items, vec![3, 4, 5]);
        assert_eq!(exact.total_pages, 2);

        let empty = paginate(&[] as &[u32], 1, 3);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn price_coercion_absorbs_bad_data() {
        let orders = parse_items(&json!({
            "items": [
                { "price": 10.5 },
                { "price": "15.50" },
                { "price": "not a number" },
                {}
            ]
        }));
        let prices: Vec<f64> = orders.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![10.5, 15.5, 0.0, 0.0]);
    }

    #[test]
    fn parse_items_handles_missing_items_key() {
        assert!(parse_items(&json!({})).is_empty());
        assert!(parse_items(&json!({ "items": null })).is_empty());
    }

    #[test]
    fn partner_sales_aggregates_one_bucket_per_month() {
        // Two live completed January orders for "acme".
        let orders = parse_items(&json!({
            "items": [
                {
                    "affiliate_id": "acme",
                    "stripeSessionId": "cs_live_a1",
                    "status": "completed",
                    "createdAt": "2026-01-05T10:00:00Z",
                    "price": 10.0
                },
                {
                    "affiliate_id": "acme",
                    "stripeSessionId": "cs_live_a2",
                    "status": "completed",
                    "createdAt": "2026-01-20T10:00:00Z",
                    "price": "15.50"
                },
                {
                    "affiliate_id": "acme",
                    "stripeSessionId": "cs_test_b1",
                    "status": "completed",
                    "createdAt": "2026-01-21T10:00:00Z",
                    "price": 99.0
                },
                {
                    "affiliate_id": "other",
                    "stripeSessionId": "cs_live_c1",
                    "status": "completed",
                    "createdAt": "2026-01-22T10:00:00Z",
                    "price": 42.0
                }
            ]
        }));

        let report = partner_sales(&orders, "acme");
        assert_eq!(report.monthly_sales.len(), 1);
        let bucket = &report.monthly_sales[0];
        assert_eq!(bucket.year, 2026);
        assert_eq!(bucket.month, 1);
        assert_eq!(bucket.month_name, "January 2026");
        assert_eq!(bucket.total_sales, 25.5);
        assert_eq!(bucket.order_count, 2);
        assert_eq!(report.total_sales, 25.5);
        assert_eq!(report.total_orders, 2);
    }

    #[test]
    fn monthly_buckets_sort_newest_first_and_totals_conserve() {
        let orders = parse_items(&json!({
            "items": [
                { "affiliate_id": "p", "stripeSessionId": "cs_live_1", "status": "completed", "createdAt": "2025-11-01T00:00:00Z", "price": 1.0 },
                { "affiliate_id": "p", "stripeSessionId": "cs_live_2", "status": "completed", "createdAt": "2026-02-01T00:00:00Z", "price": 2.0 },
                { "affiliate_id": "p", "stripeSessionId": "cs_live_3", "status": "completed", "createdAt": "2025-12-01T00:00:00Z", "price": 4.0 }
            ]
        }));

        let report = partner_sales(&orders, "p");
        let keys: Vec<String> = report
            .monthly_sales
            .iter()
            .map(|m| format!("{:04}-{:02}", m.year, m.month))
            .collect();
        assert_eq!(keys, vec!["2026-02", "2025-12", "2025-11"]);
        assert!(keys.windows(2).all(|pair| pair[0] > pair[1]));

        let bucket_sum: f64 = report.monthly_sales.iter().map(|m| m.total_sales).sum();
        assert_eq!(report.total_sales, bucket_sum);
        assert_eq!(report.total_orders, 3);
    }

    #[test]
    fn passthrough_fields_survive_a_round_trip() {
        let raw = json!({
            "_id": "abc123",
            "userId": "u1",
            "status": "pending",
            "price": 3.0,
            "paymentProvider": "stripe"
        });
        let parsed = order(raw);
        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["_id"], "abc123");
        assert_eq!(back["userId"], "u1");
        assert_eq!(back["paymentProvider"], "stripe");
        assert_eq!(back["status"], "pending");
    }
}
