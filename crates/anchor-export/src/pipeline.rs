//! The two export back ends over one store.

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::merge::{MergeReport, merge_anchors};
use crate::snapshot::{Snapshot, snapshot};
use crate::source::DocumentSource;
use anchor_core::{AnchorStore, TextSurface};

pub struct ExportPipeline<D: DocumentSource> {
    source: D,
    config: ExportConfig,
}

impl<D: DocumentSource> ExportPipeline<D> {
    pub fn new(source: D) -> Self {
        Self::with_config(source, ExportConfig::default())
    }

    pub fn with_config(source: D, config: ExportConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// Fetch the source document and merge every anchor into it.
    ///
    /// A failed fetch aborts the export; missing targets do not.
    pub async fn merge(&self, store: &AnchorStore) -> Result<MergeReport, ExportError> {
        let document = self.source.fetch().await?;
        let report = merge_anchors(&document, store, &self.config)?;
        log::info!(
            "merged {} anchor(s), skipped {}",
            report.merged,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Snapshot of the live hierarchy. Never touches the source.
    pub fn snapshot<S: TextSurface>(&self, surface: &S, store: &AnchorStore) -> Snapshot {
        snapshot(surface, store)
    }
}
