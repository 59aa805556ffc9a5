pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod query;
pub mod snapshot;
pub mod source;

pub use config::{ExportConfig, SourceConfig, TimeFormat};
pub use error::{ExportError, FetchError};
pub use merge::{MergeReport, SkippedTarget, marker_markup, merge_anchors};
pub use pipeline::ExportPipeline;
pub use query::PathQuery;
pub use snapshot::{Snapshot, WordEntry, snapshot};
pub use source::{DocumentSource, HttpSource, StaticSource};
