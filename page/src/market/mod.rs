//! Market Statistics
//!
//! Everything between the market-data endpoint and the numbers on the
//! page: the upstream payload model, the pure rendering of a payload into
//! display text ([`StatsSnapshot`]), the [`MarketFeed`] fetch seam, and
//! the [`StatsPoller`] loop that keeps the page current.
//!
//! Rendering degrades per field: one absent attribute turns only that
//! field into its placeholder, and absent nested trade activity renders a
//! literal zero. Whole-fetch failures are the poller's business, not the
//! renderer's.

pub mod feed;
pub mod format;
pub mod poller;

pub use feed::{FeedError, FeedStep, HttpFeed, MarketFeed, ScriptedFeed};
pub use format::{format_count, format_number, format_price, format_usd, Trend};
pub use poller::{PollerConfig, StatsPoller};

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Placeholder shown for an individually missing attribute.
pub const PLACEHOLDER: &str = "N/A";

/// Marker shown when a whole fetch failed.
pub const ERROR_MARKER: &str = "Error";

/// Upstream market-data payload, `data.attributes` subset. Every level is
/// optional; the upstream owns this shape and omits freely.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketPayload {
    pub data: Option<PoolData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolData {
    pub attributes: Option<PoolAttributes>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolAttributes {
    pub price_in_usd: Option<String>,
    pub price_percent_change: Option<String>,
    pub from_volume_in_usd: Option<String>,
    pub reserve_in_usd: Option<String>,
    pub fully_diluted_valuation: Option<String>,
    pub historical_data: Option<HistoricalData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalData {
    pub last_24h: Option<TradeActivity>,
}

/// 24h trade-activity counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeActivity {
    pub swaps_count: Option<u64>,
    pub buyers_count: Option<u64>,
    pub sellers_count: Option<u64>,
}

/// The displayed statistic fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatField {
    Price,
    PriceChange,
    Volume,
    Liquidity,
    MarketCap,
    Transactions,
    Buyers,
    Sellers,
}

impl StatField {
    /// All fields, in page order.
    pub const ALL: [Self; 8] = [
        Self::Price,
        Self::PriceChange,
        Self::Volume,
        Self::Liquidity,
        Self::MarketCap,
        Self::Transactions,
        Self::Buyers,
        Self::Sellers,
    ];

    /// Element id of the field on the page.
    #[must_use]
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::PriceChange => "price-change",
            Self::Volume => "volume",
            Self::Liquidity => "liquidity",
            Self::MarketCap => "marketcap",
            Self::Transactions => "transactions",
            Self::Buyers => "buyers",
            Self::Sellers => "sellers",
        }
    }
}

/// Where rendered statistics land. The only side effects the poller has
/// are through this seam: field text and the binary trend color class.
pub trait StatsBoard: Send + Sync {
    /// Set a field's visible text.
    fn set_field(&self, field: StatField, text: &str);

    /// Set the directional color state of the price-change indicator.
    fn set_trend(&self, trend: Trend);
}

/// In-memory board for tests and the headless simulator.
#[derive(Debug, Default)]
pub struct MemoryBoard {
    fields: Mutex<HashMap<StatField, String>>,
    trend: Mutex<Option<Trend>>,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of a field, if ever set.
    #[must_use]
    pub fn field(&self, field: StatField) -> Option<String> {
        self.fields.lock().get(&field).cloned()
    }

    /// Current trend class, if ever set.
    #[must_use]
    pub fn trend(&self) -> Option<Trend> {
        *self.trend.lock()
    }
}

impl StatsBoard for MemoryBoard {
    fn set_field(&self, field: StatField, text: &str) {
        self.fields.lock().insert(field, text.to_string());
    }

    fn set_trend(&self, trend: Trend) {
        *self.trend.lock() = Some(trend);
    }
}

/// A payload rendered to display text. Pure function of the payload;
/// replaced wholesale on every successful fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Rendered text for every field, in page order.
    pub fields: Vec<(StatField, String)>,
    /// Directional state, present when the payload carried a change value.
    pub trend: Option<Trend>,
    /// The raw price-change text, kept for preservation across outages.
    pub change_text: Option<String>,
}

impl StatsSnapshot {
    /// Render a payload. Missing attributes degrade per field.
    #[must_use]
    pub fn render(payload: &MarketPayload) -> Self {
        let attributes = payload
            .data
            .as_ref()
            .and_then(|data| data.attributes.as_ref());

        let text = |value: Option<String>| value.unwrap_or_else(|| PLACEHOLDER.to_string());

        let (change_text, trend) = match attributes.and_then(|a| a.price_percent_change.clone()) {
            Some(change) => {
                let trend = Trend::from_percent(&change);
                (Some(change), Some(trend))
            }
            None => (None, None),
        };

        let activity = attributes
            .and_then(|a| a.historical_data.as_ref())
            .and_then(|h| h.last_24h.as_ref());
        // Absent nested trade activity is a literal zero, not a
        // placeholder.
        let count =
            |pick: fn(&TradeActivity) -> Option<u64>| format_count(activity.and_then(pick).unwrap_or(0));

        let fields = vec![
            (
                StatField::Price,
                text(attributes
                    .and_then(|a| a.price_in_usd.as_deref())
                    .and_then(format_price)),
            ),
            (
                StatField::PriceChange,
                text(change_text.clone()),
            ),
            (
                StatField::Volume,
                text(attributes
                    .and_then(|a| a.from_volume_in_usd.as_deref())
                    .and_then(format_usd)),
            ),
            (
                StatField::Liquidity,
                text(attributes
                    .and_then(|a| a.reserve_in_usd.as_deref())
                    .and_then(format_usd)),
            ),
            (
                StatField::MarketCap,
                text(attributes
                    .and_then(|a| a.fully_diluted_valuation.as_deref())
                    .and_then(format_usd)),
            ),
            (StatField::Transactions, count(|a| a.swaps_count)),
            (StatField::Buyers, count(|a| a.buyers_count)),
            (StatField::Sellers, count(|a| a.sellers_count)),
        ];

        Self {
            fields,
            trend,
            change_text,
        }
    }

    /// Text rendered for one field.
    #[must_use]
    pub fn field(&self, field: StatField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, text)| text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload(attributes: PoolAttributes) -> MarketPayload {
        MarketPayload {
            data: Some(PoolData {
                attributes: Some(attributes),
            }),
        }
    }

    fn full_attributes() -> PoolAttributes {
        PoolAttributes {
            price_in_usd: Some("0.00001234".to_string()),
            price_percent_change: Some("-3.5".to_string()),
            from_volume_in_usd: Some("123456.789".to_string()),
            reserve_in_usd: Some("98765.4".to_string()),
            fully_diluted_valuation: Some("1234567".to_string()),
            historical_data: Some(HistoricalData {
                last_24h: Some(TradeActivity {
                    swaps_count: Some(1234),
                    buyers_count: Some(567),
                    sellers_count: Some(890),
                }),
            }),
        }
    }

    #[test]
    fn renders_full_payload() {
        let snapshot = StatsSnapshot::render(&payload(full_attributes()));
        assert_eq!(snapshot.field(StatField::Price), Some("$0.00001234"));
        assert_eq!(snapshot.field(StatField::PriceChange), Some("-3.5"));
        assert_eq!(snapshot.field(StatField::Volume), Some("$123,456.789"));
        assert_eq!(snapshot.field(StatField::Liquidity), Some("$98,765.4"));
        assert_eq!(snapshot.field(StatField::MarketCap), Some("$1,234,567"));
        assert_eq!(snapshot.field(StatField::Transactions), Some("1,234"));
        assert_eq!(snapshot.field(StatField::Buyers), Some("567"));
        assert_eq!(snapshot.field(StatField::Sellers), Some("890"));
        assert_eq!(snapshot.trend, Some(Trend::Negative));
    }

    #[test]
    fn missing_trade_activity_renders_zero() {
        let mut attributes = full_attributes();
        attributes.historical_data = None;
        let snapshot = StatsSnapshot::render(&payload(attributes));
        assert_eq!(snapshot.field(StatField::Transactions), Some("0"));
        assert_eq!(snapshot.field(StatField::Buyers), Some("0"));
        assert_eq!(snapshot.field(StatField::Sellers), Some("0"));
    }

    #[test]
    fn one_missing_attribute_degrades_only_that_field() {
        let mut attributes = full_attributes();
        attributes.reserve_in_usd = None;
        let snapshot = StatsSnapshot::render(&payload(attributes));
        assert_eq!(snapshot.field(StatField::Liquidity), Some(PLACEHOLDER));
        assert_eq!(snapshot.field(StatField::Volume), Some("$123,456.789"));
        assert_eq!(snapshot.field(StatField::Price), Some("$0.00001234"));
    }

    #[test]
    fn nonnegative_change_sets_up_trend() {
        let mut attributes = full_attributes();
        attributes.price_percent_change = Some("3.5".to_string());
        let snapshot = StatsSnapshot::render(&payload(attributes));
        assert_eq!(snapshot.trend, Some(Trend::NonNegative));
    }

    #[test]
    fn empty_payload_renders_placeholders() {
        let snapshot = StatsSnapshot::render(&MarketPayload::default());
        assert_eq!(snapshot.field(StatField::Price), Some(PLACEHOLDER));
        assert_eq!(snapshot.field(StatField::PriceChange), Some(PLACEHOLDER));
        assert_eq!(snapshot.field(StatField::Transactions), Some("0"));
        assert_eq!(snapshot.trend, None);
        assert_eq!(snapshot.change_text, None);
    }

    #[test]
    fn payload_parses_upstream_shape() {
        let raw = r#"{
            "data": {
                "attributes": {
                    "price_in_usd": "0.5",
                    "price_percent_change": "1.2",
                    "historical_data": { "last_24h": { "swaps_count": 10 } },
                    "unknown_field": true
                }
            }
        }"#;
        let payload: MarketPayload = serde_json::from_str(raw).unwrap();
        let snapshot = StatsSnapshot::render(&payload);
        assert_eq!(snapshot.field(StatField::Price), Some("$0.50000000"));
        assert_eq!(snapshot.field(StatField::Transactions), Some("10"));
        // swaps present, buyers absent inside a present last_24h
        assert_eq!(snapshot.field(StatField::Buyers), Some("0"));
    }

    #[test]
    fn memory_board_round_trip() {
        let board = MemoryBoard::new();
        board.set_field(StatField::Price, "$1.00000000");
        board.set_trend(Trend::NonNegative);
        assert_eq!(board.field(StatField::Price).as_deref(), Some("$1.00000000"));
        assert_eq!(board.trend(), Some(Trend::NonNegative));
        assert_eq!(board.field(StatField::Volume), None);
    }
}
