pub mod annotation;
pub mod broadcast;
pub mod catalog;
pub mod exclusion;
pub mod grouped;
pub mod schedule;
pub mod timefmt;

pub use annotation::{OscarAnnotation, ProviderEntry, WatchProviders};
pub use broadcast::{AnnotatedBroadcast, BroadcastEntry};
pub use catalog::CatalogEntry;
pub use exclusion::{ExclusionRule, ExclusionScope};
pub use grouped::{BroadcastRef, GroupedFilm};
pub use schedule::{ChannelInfo, ChannelListing, DayMetadata, DaySchedule, ProgramRow};
