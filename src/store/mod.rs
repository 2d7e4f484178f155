//! Organizer storefronts.
//!
//! A store is an organizer's public page: profile fields plus the upcoming
//! published events sold through it. The API returns prices as decimal
//! strings; numeric prices are accepted too and normalized to strings so the
//! amount is never rounded through a float.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Public storefront returned by `GET /api/stores/{slug}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Store UUID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-friendly name the store is looked up by.
    pub slug: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Logo image URL.
    #[serde(default)]
    pub logo_image: Option<String>,
    /// Banner image URL.
    #[serde(default)]
    pub banner_image: Option<String>,
    /// Instagram profile link.
    #[serde(default)]
    pub instagram_link: Option<String>,
    /// Website link.
    #[serde(default)]
    pub website_link: Option<String>,
    /// Upcoming published events, earliest first.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Store {
    /// Events that still have at least one tier on sale.
    ///
    /// Events listed without tier details are assumed to be on sale.
    pub fn events_on_sale(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|event| {
            event.tiers.is_empty() || event.tiers.iter().any(TicketTier::is_available)
        })
    }
}

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    /// Live music.
    #[serde(alias = "CONCERT")]
    Concert,
    /// Club nights.
    #[serde(alias = "NIGHTLIFE")]
    Nightlife,
    /// Multi-act festivals.
    #[serde(alias = "FESTIVAL")]
    Festival,
    /// Stage shows.
    #[serde(alias = "THEATRE")]
    Theatre,
    /// Any category this client does not know yet.
    #[serde(other)]
    Other,
}

/// Event listed on a storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event UUID.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Start time with the organizer's UTC offset.
    #[serde(default)]
    pub start_datetime: Option<DateTime<FixedOffset>>,
    /// Venue name.
    #[serde(default)]
    pub location_name: Option<String>,
    /// Poster image URL.
    #[serde(default)]
    pub poster_image: Option<String>,
    /// Cheapest tier price.
    #[serde(default, deserialize_with = "optional_price")]
    pub lowest_price: Option<String>,
    /// Event category.
    #[serde(default)]
    pub category: Option<EventCategory>,
    /// Organizer display name.
    #[serde(default)]
    pub organizer_name: Option<String>,
    /// Ticket tiers, when the listing includes them.
    #[serde(default)]
    pub tiers: Vec<TicketTier>,
}

/// Purchasable ticket tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTier {
    /// Tier UUID.
    pub id: String,
    /// Tier name, e.g. "VIP".
    pub name: String,
    /// Tier description.
    #[serde(default)]
    pub description: String,
    /// Price as a decimal string.
    #[serde(deserialize_with = "price")]
    pub price: String,
    /// Tickets left.
    #[serde(default)]
    pub available_qty: u32,
}

impl TicketTier {
    /// Returns true while tickets remain.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available_qty > 0
    }
}

fn price<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected price string or number, got {other}"
        ))),
    }
}

fn optional_price<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected price string or number, got {other}"
        ))),
    }
}
