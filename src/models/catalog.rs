//! Display-ready catalog entries

use serde::{Deserialize, Serialize};

/// A channel as presented in the catalog; `id` is the channel id, never remapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub release_info: String,
    pub poster: String,
    pub background: String,
    pub logo: String,
    pub poster_shape: String,
    pub genres: Vec<String>,
}

impl CatalogEntry {
    /// Channel header shared by every stream descriptor of this channel
    pub fn header(&self) -> super::ChannelHeader {
        super::ChannelHeader {
            id: self.id.clone(),
            poster: Some(self.poster.clone()),
            background: Some(self.background.clone()),
            logo: Some(self.logo.clone()),
            description: Some(self.description.clone()),
        }
    }
}
