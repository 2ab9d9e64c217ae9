//! Request payload types for the pet store resources
//!
//! Field names follow the service's camelCase wire format. Optional parts are
//! omitted from the JSON when unset so that minimal payloads stay minimal.

use serde::{Deserialize, Serialize};

/// Pet availability as accepted by `/pet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

/// Order lifecycle status as accepted by `/store/order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Approved,
    Delivered,
}

impl OrderStatus {
    /// Inventory label this status is counted under.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Approved => "approved",
            Self::Delivered => "delivered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    pub status: PetStatus,
}

impl Pet {
    /// Minimal pet: id, name and status only.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
            photo_urls: None,
            tags: None,
            status,
        }
    }

    #[must_use]
    pub fn with_category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.category = Some(Category {
            id,
            name: name.into(),
        });
        self
    }

    #[must_use]
    pub fn with_photo_urls(mut self, urls: Vec<String>) -> Self {
        self.photo_urls = Some(urls);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, id: i64, name: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(Tag {
            id,
            name: name.into(),
        });
        self
    }

    /// JSON payload for the request body.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub pet_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    pub status: OrderStatus,
    pub complete: bool,
}

impl Order {
    /// JSON payload for the request body.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
