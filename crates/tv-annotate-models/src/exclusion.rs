use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Granularity at which an exclusion rule suppresses annotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionScope {
    /// One exact (channel, date, time) airing.
    Broadcast,
    /// Every airing of the title on one channel.
    Channel,
    /// Every airing of the title anywhere.
    Global,
}

/// An override that suppresses Oscar annotation for a title.
///
/// `channel_id` is meaningful for `Broadcast` and `Channel` scopes, `date`
/// and `time` only for `Broadcast`. `description` is audit text and takes no
/// part in rule identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExclusionRule {
    pub title: String,
    pub scope: ExclusionScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "crate::timefmt::opt", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExclusionRule {
    pub fn global(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            scope: ExclusionScope::Global,
            channel_id: None,
            date: None,
            time: None,
            description: None,
        }
    }

    pub fn channel(title: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            scope: ExclusionScope::Channel,
            channel_id: Some(channel_id.into()),
            date: None,
            time: None,
            description: None,
        }
    }

    pub fn broadcast(
        title: impl Into<String>,
        channel_id: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            title: title.into(),
            scope: ExclusionScope::Broadcast,
            channel_id: Some(channel_id.into()),
            date: Some(date),
            time: Some(time),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
