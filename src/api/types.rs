//! Wire types of the catalog service
//!
//! Identifiers are serialized as `_id`. A book carries its category as a bare
//! id when written and as an embedded object when read back. Books are read
//! as raw JSON by the scenarios so that every missing field is reported.

use serde::{Deserialize, Serialize};

/// A book category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Body of a category create or update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    pub title: String,
}

/// Category reference on a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookCategory {
    Embedded(Category),
    Id(String),
}

impl BookCategory {
    /// Id of the referenced category, whichever form was returned
    pub fn id(&self) -> &str {
        match self {
            BookCategory::Embedded(category) => &category.id,
            BookCategory::Id(id) => id,
        }
    }
}

/// Body of a book create
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: f64,
    pub pages: i64,
    /// Category id
    pub category: String,
}

/// Body of a partial book update; unset fields are left out of the request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
