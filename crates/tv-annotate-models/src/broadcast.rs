use crate::annotation::OscarAnnotation;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single scheduled airing of a program on a channel.
///
/// Produced by flattening the scraper's day files; read-only input to the
/// matcher and annotator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BroadcastEntry {
    pub channel_id: String,
    pub channel_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_icon: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "crate::timefmt")]
    pub time: NaiveTime,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A broadcast plus its optional Oscar annotation.
///
/// The annotation is attached alongside the original entry, never merged into
/// it; "not annotated" is a typed absence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedBroadcast {
    #[serde(flatten)]
    pub broadcast: BroadcastEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oscar: Option<OscarAnnotation>,
}

impl AnnotatedBroadcast {
    /// The input broadcast with no annotation attached.
    pub fn unannotated(broadcast: BroadcastEntry) -> Self {
        Self {
            broadcast,
            oscar: None,
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.oscar.is_some()
    }
}
