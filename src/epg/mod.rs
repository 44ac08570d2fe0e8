//! In-memory program guide
//!
//! The guide file is a JSON document with channel icons and programs, both
//! keyed by linkage id. Keys are normalized on load so lookups are
//! insensitive to case and punctuation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppResult;
use crate::models::Program;
use crate::services::traits::EpgView;
use crate::utils::normalize_id;

/// Number of programs listed after the current one
pub const MAX_UPCOMING_PROGRAMS: usize = 2;

#[derive(Debug, Default, Deserialize)]
pub struct GuideFile {
    #[serde(default)]
    pub icons: HashMap<String, String>,
    #[serde(default)]
    pub programs: HashMap<String, Vec<Program>>,
}

#[derive(Debug, Default)]
struct GuideData {
    icons: HashMap<String, String>,
    programs: HashMap<String, Vec<Program>>,
}

impl From<GuideFile> for GuideData {
    fn from(file: GuideFile) -> Self {
        let icons = file
            .icons
            .into_iter()
            .map(|(id, icon)| (normalize_id(&id), icon))
            .collect();

        let mut programs: HashMap<String, Vec<Program>> = HashMap::new();
        for (id, list) in file.programs {
            programs.entry(normalize_id(&id)).or_default().extend(list);
        }
        for list in programs.values_mut() {
            list.sort_by_key(|p| p.start);
        }

        Self { icons, programs }
    }
}

pub struct GuideStore {
    data: RwLock<GuideData>,
    fixed_now: Option<DateTime<Utc>>,
}

impl GuideStore {
    pub fn new(file: GuideFile) -> Self {
        Self {
            data: RwLock::new(file.into()),
            fixed_now: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(GuideFile::default())
    }

    /// Evaluate "current" and "upcoming" against a fixed instant
    pub fn with_fixed_time(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub async fn load(path: &Path) -> AppResult<Self> {
        let store = Self::empty();
        store.reload(path).await?;
        Ok(store)
    }

    /// Re-read the guide file, replacing all programs and icons
    pub async fn reload(&self, path: &Path) -> AppResult<()> {
        let contents = tokio::fs::read_to_string(path).await?;
        let file: GuideFile = serde_json::from_str(&contents)?;
        let data = GuideData::from(file);
        info!(
            "Loaded guide for {} channels from {}",
            data.programs.len(),
            path.display()
        );
        *self.data.write().await = data;
        Ok(())
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

#[async_trait]
impl EpgView for GuideStore {
    async fn current_program(&self, normalized_id: &str) -> Option<Program> {
        let now = self.now();
        self.data
            .read()
            .await
            .programs
            .get(normalized_id)?
            .iter()
            .find(|p| p.is_airing_at(now))
            .cloned()
    }

    async fn upcoming_programs(&self, normalized_id: &str) -> Vec<Program> {
        let now = self.now();
        self.data
            .read()
            .await
            .programs
            .get(normalized_id)
            .map(|list| {
                list.iter()
                    .filter(|p| p.start > now)
                    .take(MAX_UPCOMING_PROGRAMS)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn channel_icon(&self, linkage_id: &str) -> Option<String> {
        self.data
            .read()
            .await
            .icons
            .get(&normalize_id(linkage_id))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 12, hour, minute, 0).unwrap()
    }

    fn program(title: &str, start: DateTime<Utc>, stop: DateTime<Utc>) -> Program {
        Program {
            title: title.to_string(),
            description: None,
            start,
            stop,
            category: None,
        }
    }

    fn store() -> GuideStore {
        let file = GuideFile {
            icons: HashMap::from([("Rai1.it".to_string(), "http://icons/rai1.png".to_string())]),
            programs: HashMap::from([(
                "Rai1.it".to_string(),
                vec![
                    program("Late", at(22, 0), at(23, 0)),
                    program("News", at(20, 0), at(20, 30)),
                    program("Quiz", at(20, 30), at(21, 0)),
                    program("Film", at(21, 0), at(22, 0)),
                ],
            )]),
        };
        GuideStore::new(file).with_fixed_time(at(20, 10))
    }

    #[tokio::test]
    async fn test_current_program_by_normalized_id() {
        let store = store();
        assert_eq!(store.current_program("rai1.it").await.unwrap().title, "News");
        assert!(store.current_program("Rai1.it").await.is_none());
    }

    #[tokio::test]
    async fn test_upcoming_programs_are_ordered_and_capped() {
        let titles: Vec<String> = store()
            .upcoming_programs("rai1.it")
            .await
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Quiz", "Film"]);
    }

    #[tokio::test]
    async fn test_channel_icon_uses_raw_linkage_id() {
        let store = store();
        assert_eq!(
            store.channel_icon("Rai1.it").await.as_deref(),
            Some("http://icons/rai1.png")
        );
        assert!(store.channel_icon("Canale5.it").await.is_none());
    }
}
