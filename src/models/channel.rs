//! Channel and program models owned by the external cache and guide

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One declared stream URL of a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUrl {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// A live TV channel as stored in the channel cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub genre: Vec<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub stream_urls: Vec<StreamUrl>,
    #[serde(default)]
    pub tvg_id: Option<String>,
    #[serde(default)]
    pub tvg_chno: Option<String>,
}

impl Channel {
    /// EPG linkage id, ignoring blank values
    pub fn linkage_id(&self) -> Option<&str> {
        self.tvg_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Whether any artwork field needs a fallback
    pub fn missing_artwork(&self) -> bool {
        self.poster.is_none() || self.background.is_none() || self.logo.is_none()
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre.iter().any(|g| g == genre)
    }
}

/// A scheduled program from the electronic program guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Program {
    pub fn is_airing_at(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.stop
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Genres arrive either as a single tag or as a list
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(genre)) => vec![genre],
        Some(OneOrMany::Many(genres)) => genres,
        None => Vec::new(),
    })
}
