//! Stream candidates and the descriptors returned to the player

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stream produced by the external resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStream {
    pub name: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

/// Input handed to the stream proxy: one playable URL with its request headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamCandidate {
    pub name: String,
    pub url: String,
    pub headers: HashMap<String, String>,
}

impl From<&ResolvedStream> for StreamCandidate {
    fn from(stream: &ResolvedStream) -> Self {
        Self {
            name: stream.name.clone(),
            url: stream.url.clone(),
            headers: stream.headers.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyHeaders {
    pub request: HashMap<String, String>,
}

/// Player hints attached to every stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub not_web_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binge_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_headers: Option<ProxyHeaders>,
}

impl BehaviorHints {
    pub fn live(headers: &HashMap<String, String>) -> Self {
        Self {
            not_web_ready: true,
            binge_group: Some("tv".to_string()),
            proxy_headers: (!headers.is_empty()).then(|| ProxyHeaders {
                request: headers.clone(),
            }),
        }
    }
}

/// Channel header copied onto every descriptor of a stream response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHeader {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One playable entry of a stream response; list order is the display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    pub name: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    pub behavior_hints: BehaviorHints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelHeader>,
}

impl StreamDescriptor {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            url: url.into(),
            behavior_hints: BehaviorHints::live(&headers),
            headers,
            channel: None,
        }
    }

    /// Candidate view of this descriptor, used when proxying it
    pub fn candidate(&self) -> StreamCandidate {
        StreamCandidate {
            name: self.name.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
        }
    }
}

impl From<ResolvedStream> for StreamDescriptor {
    fn from(stream: ResolvedStream) -> Self {
        Self::new(
            stream.name,
            stream.title,
            stream.url,
            stream.headers.unwrap_or_default(),
        )
    }
}
