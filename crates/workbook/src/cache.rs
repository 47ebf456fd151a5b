use crate::dataset::{Dataset, DatasetSource};
use crate::error::WorkbookError;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Process-wide, initialize-once holder of the dataset.
///
/// The first caller loads from the source; concurrent callers wait for that load instead of
/// starting their own. A failed load leaves the cache empty, so the next call tries again.
/// There is no invalidation: a changed workbook needs a restart.
pub struct DatasetCache {
    /// `None` for a preloaded cache, which never loads.
    source: Option<Arc<dyn DatasetSource>>,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source: Some(source),
            cell: OnceCell::new(),
        }
    }

    /// A cache that is already populated.
    pub fn preloaded(dataset: Dataset) -> Self {
        Self {
            source: None,
            cell: OnceCell::new_with(Some(Arc::new(dataset))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Returns the cached dataset, loading it on first use.
    pub async fn get(&self) -> Result<Arc<Dataset>, WorkbookError> {
        let dataset = self
            .cell
            .get_or_try_init(|| async {
                let source = self
                    .source
                    .clone()
                    .ok_or_else(|| WorkbookError::Task("no dataset source configured".to_string()))?;
                let origin = source.describe();
                tracing::info!(%origin, "Loading dataset.");

                let dataset = tokio::task::spawn_blocking(move || source.load())
                    .await
                    .map_err(|e| WorkbookError::Task(e.to_string()))?
                    .inspect_err(|e| tracing::warn!(%origin, error = %e, "Dataset load failed."))?;

                tracing::info!(
                    %origin,
                    returns_rows = dataset.returns.row_count(),
                    constituent_rows = dataset.constituents.row_count(),
                    "Dataset loaded and cached."
                );
                Ok::<_, WorkbookError>(Arc::new(dataset))
            })
            .await?;

        Ok(Arc::clone(dataset))
    }
}
