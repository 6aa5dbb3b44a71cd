use crate::annotation::WatchProviders;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// All broadcasts of one matched film across the rolling window, collapsed
/// for presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupedFilm {
    /// Broadcast title of the first-seen airing (localized).
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub winner: usize,
    pub nominee: usize,
    pub winner_categories: Vec<String>,
    pub nominee_categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<WatchProviders>,
    /// Contributing airings, most recent first.
    pub broadcasts: Vec<BroadcastRef>,
}

/// Reference to one airing inside a [`GroupedFilm`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BroadcastRef {
    pub channel_id: String,
    pub channel_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_icon: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "crate::timefmt")]
    pub time: NaiveTime,
}
