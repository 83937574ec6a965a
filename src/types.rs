use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// One raw item from the shopping search API. Transient — consumed by the
/// title filter, never persisted as-is. The original JSON payload is kept
/// alongside the parsed fields so matches can carry an audit snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSearchItem {
    /// Title as returned by the API, may contain markup like `<b>`.
    pub title: String,
    /// Lowest listed price in won. 0 when the field is absent or unparsable.
    pub price: i64,
    pub shop_name: String,
    pub product_url: String,
    pub raw: serde_json::Value,
}

impl RawSearchItem {
    /// Lenient parse of one entry of the API's `items` array. Missing fields
    /// default to empty/zero; `lprice` arrives as a string but a numeric
    /// value is tolerated too.
    pub fn from_value(v: serde_json::Value) -> Self {
        let title = v
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .to_string();
        let price = v
            .get("lprice")
            .and_then(|p| p.as_i64().or_else(|| p.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(0);
        let shop_name = v
            .get("mallName")
            .and_then(|m| m.as_str())
            .unwrap_or("")
            .to_string();
        let product_url = v
            .get("link")
            .and_then(|l| l.as_str())
            .unwrap_or("")
            .to_string();

        Self {
            title,
            price,
            shop_name,
            product_url,
            raw: v,
        }
    }
}

/// A search result confirmed to match a tracked keyword and cleared of
/// exclusion terms. Title is markup-stripped but keeps its original casing.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatch {
    pub title: String,
    pub price: i64,
    pub shop_name: String,
    pub product_url: String,
    /// Snapshot of the originating raw item, carried through the filter so
    /// the persisted record never depends on positional alignment with the
    /// raw result list.
    pub raw: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Collection buffers — rows accumulated in memory during one run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewPriceLog {
    pub product_id: i64,
    pub shop_name: String,
    pub price: i64,
    pub product_url: Option<String>,
    pub raw_data: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub product_id: i64,
    pub triggered_price: i64,
    pub target_price: i64,
    pub shop_name: String,
}

/// Payload handed to the notifier when a target price is reached.
#[derive(Debug, Clone)]
pub struct AlertNotification {
    pub keyword: String,
    pub price: i64,
    pub target_price: i64,
    pub shop_name: String,
    pub product_url: String,
}

// ---------------------------------------------------------------------------
// Product updates
// ---------------------------------------------------------------------------

/// Partial update for a tracked product. The update endpoint distinguishes
/// "field omitted" (leave as-is) from "field set to null" (clear), so the
/// nullable fields are double options: outer `None` = omitted, `Some(None)`
/// = explicit null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub target_price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub memo: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.target_price.is_none() && self.memo.is_none() && self.is_active.is_none()
    }
}

/// Any value present in the JSON — including null — deserializes to
/// `Some(...)`; a missing key stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// ---------------------------------------------------------------------------
// Product status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Latest collected price is at or below the target.
    GoalReached,
    /// Target set, latest price still above it (or no data yet).
    Monitoring,
    /// No target price configured.
    NoTarget,
}

impl ProductStatus {
    pub fn derive(target_price: Option<i64>, latest_price: Option<i64>) -> Self {
        match (target_price, latest_price) {
            (None, _) => ProductStatus::NoTarget,
            (Some(target), Some(latest)) if latest <= target => ProductStatus::GoalReached,
            _ => ProductStatus::Monitoring,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProductStatus::GoalReached => "goal_reached",
            ProductStatus::Monitoring => "monitoring",
            ProductStatus::NoTarget => "no_target",
        };
        write!(f, "{s}")
    }
}
