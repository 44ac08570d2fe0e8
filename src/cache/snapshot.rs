//! Immutable channel snapshot with filtering and lookup

use std::collections::HashMap;
use tracing::warn;

use crate::models::Channel;

/// Filter applied to the channel list before paging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChannelFilter {
    #[default]
    None,
    /// Case-insensitive substring of the channel name
    Search(String),
    /// Exact genre tag
    Genre(String),
}

impl ChannelFilter {
    pub fn matches(&self, channel: &Channel) -> bool {
        match self {
            ChannelFilter::None => true,
            ChannelFilter::Search(term) => channel
                .name
                .to_lowercase()
                .contains(&term.trim().to_lowercase()),
            ChannelFilter::Genre(genre) => channel.has_genre(genre),
        }
    }
}

#[derive(Debug, Default)]
pub struct ChannelSnapshot {
    channels: Vec<Channel>,
    index: HashMap<String, usize>,
    genres: Vec<String>,
}

impl ChannelSnapshot {
    /// Build a snapshot; later channels repeating an id are dropped
    pub fn new(channels: Vec<Channel>) -> Self {
        let mut kept = Vec::with_capacity(channels.len());
        let mut index = HashMap::with_capacity(channels.len());
        let mut genres: Vec<String> = Vec::new();

        for channel in channels {
            if index.contains_key(&channel.id) {
                warn!("Duplicate channel id '{}' ignored", channel.id);
                continue;
            }
            for genre in &channel.genre {
                if !genres.contains(genre) {
                    genres.push(genre.clone());
                }
            }
            index.insert(channel.id.clone(), kept.len());
            kept.push(channel);
        }

        Self {
            channels: kept,
            index,
            genres,
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.index.get(id).map(|&i| &self.channels[i])
    }

    /// All genres in first-seen order
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn filtered(&self, filter: &ChannelFilter) -> Vec<&Channel> {
        self.channels.iter().filter(|c| filter.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: &str, name: &str, genres: &[&str]) -> Channel {
        Channel {
            id: id.to_string(),
            name: name.to_string(),
            genre: genres.iter().map(|g| g.to_string()).collect(),
            poster: None,
            background: None,
            logo: None,
            stream_urls: vec![],
            tvg_id: None,
            tvg_chno: None,
        }
    }

    fn snapshot() -> ChannelSnapshot {
        ChannelSnapshot::new(vec![
            channel("rai1", "Rai 1", &["General"]),
            channel("sky-calcio", "Sky Calcio", &["Sport", "Calcio"]),
            channel("dazn", "DAZN 1", &["Sport"]),
            channel("rai1", "Rai 1 duplicate", &["News"]),
        ])
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let snapshot = snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.channel("rai1").unwrap().name, "Rai 1");
        assert!(snapshot.channel("missing").is_none());
    }

    #[test]
    fn test_genres_first_seen_order() {
        assert_eq!(snapshot().genres(), &["General", "Sport", "Calcio"]);
    }

    #[test]
    fn test_filters() {
        let snapshot = snapshot();
        let ids = |filter: ChannelFilter| -> Vec<String> {
            snapshot
                .filtered(&filter)
                .iter()
                .map(|c| c.id.clone())
                .collect()
        };

        assert_eq!(ids(ChannelFilter::None).len(), 3);
        assert_eq!(ids(ChannelFilter::Search("sky".into())), vec!["sky-calcio"]);
        assert_eq!(
            ids(ChannelFilter::Genre("Sport".into())),
            vec!["sky-calcio", "dazn"]
        );
        assert!(ids(ChannelFilter::Genre("sport".into())).is_empty());
    }
}
