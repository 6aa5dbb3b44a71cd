pub mod aggregate;
pub mod annotator;
pub mod catalog;
pub mod exclusions;
pub mod matcher;
pub mod normalize;
pub mod store;
pub mod window;

pub use aggregate::aggregate;
pub use annotator::Annotator;
pub use catalog::{Catalog, CatalogError};
pub use exclusions::{ExclusionError, ExclusionStore, Removal};
pub use matcher::{MatchResult, Matcher};
pub use normalize::{extract_year, normalize, SuffixStripper};
pub use store::{read_json, write_json, DocumentStore, FsDocumentStore, StoreError};
pub use window::{ProgramWindow, WindowError};
