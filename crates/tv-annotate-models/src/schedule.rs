use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day file from the rolling-window program store, as the scraper
/// writes it: metadata plus per-channel listings keyed by channel id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySchedule {
    #[serde(default)]
    pub metadata: DayMetadata,
    #[serde(default)]
    pub programs: BTreeMap<String, ChannelListing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_channels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels_with_programs: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelListing {
    pub channel: ChannelInfo,
    #[serde(default)]
    pub programs: Vec<ProgramRow>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A raw schedule row. `time` stays a string here; rows with a value the
/// window reader cannot parse are skipped there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramRow {
    pub time: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Scraper's concatenated title + description fallback text; used as a
    /// secondary source when extracting a release year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
}
