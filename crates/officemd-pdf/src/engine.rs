//! Process-wide PDF engine
//!
//! Pages are laid out on the blocking pool. Each worker loads its own
//! document handle from the shared bytes and renders the pages assigned
//! to it; results carry their page slot so the transcript never depends
//! on completion order.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use pdf_extract::Document;
use tokio::task::JoinSet;
use tracing::{debug, info};

use officemd_core::{structure_text, Config, OfficeError, Result};

use crate::layout::{transcript, LayoutSettings, RunCollector, TextRun};

static ENGINE: OnceCell<PdfEngine> = OnceCell::new();

/// Text extraction over the PDF engine
#[derive(Debug, Clone)]
pub struct PdfEngine {
    settings: LayoutSettings,
    workers: usize,
}

impl Default for PdfEngine {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl PdfEngine {
    /// Create an engine with its own settings
    pub fn new(settings: LayoutSettings) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self { settings, workers }
    }

    /// The shared engine.
    ///
    /// Initialized on first use with default settings and immutable
    /// afterwards; concurrent first calls observe the same instance.
    pub fn global() -> &'static PdfEngine {
        ENGINE.get_or_init(PdfEngine::default)
    }

    /// Limit the number of blocking workers per document
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Layout thresholds in use
    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Extract structured Markdown
    pub async fn extract_markdown(&self, bytes: Vec<u8>, config: &Config) -> Result<String> {
        let text = self.extract_text(bytes).await?;
        let markdown = structure_text(&text);
        if config.newline_delimiter == "\n" {
            Ok(markdown)
        } else {
            Ok(markdown.replace('\n', &config.newline_delimiter))
        }
    }

    /// Extract the flat transcript, one line per baseline
    pub async fn extract_text(&self, bytes: Vec<u8>) -> Result<String> {
        let pages = self.page_runs(bytes).await?;
        Ok(transcript(&pages, &self.settings))
    }

    /// Text runs of every page, in page order
    pub async fn page_runs(&self, bytes: Vec<u8>) -> Result<Vec<Vec<TextRun>>> {
        let bytes: Arc<[u8]> = bytes.into();

        let probe = Arc::clone(&bytes);
        let pages: Vec<u32> = tokio::task::spawn_blocking(move || {
            load(&probe).map(|doc| doc.get_pages().keys().copied().collect::<Vec<u32>>())
        })
        .await
        .map_err(|e| OfficeError::Task(e.to_string()))??;

        info!(pages = pages.len(), "loaded PDF document");
        if pages.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.workers.clamp(1, pages.len());
        let mut tasks = JoinSet::new();
        for worker in 0..workers {
            let bytes = Arc::clone(&bytes);
            let settings = self.settings;
            let assigned: Vec<(usize, u32)> = pages
                .iter()
                .copied()
                .enumerate()
                .skip(worker)
                .step_by(workers)
                .collect();
            tasks.spawn_blocking(move || render_pages(&bytes, &assigned, settings));
        }

        let mut slots: Vec<Vec<TextRun>> = vec![Vec::new(); pages.len()];
        while let Some(joined) = tasks.join_next().await {
            let rendered = joined.map_err(|e| OfficeError::Task(e.to_string()))??;
            for (slot, runs) in rendered {
                if let Some(target) = slots.get_mut(slot) {
                    *target = runs;
                }
            }
        }
        Ok(slots)
    }
}

fn load(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(OfficeError::pdf)
}

fn render_pages(
    bytes: &[u8],
    assigned: &[(usize, u32)],
    settings: LayoutSettings,
) -> Result<Vec<(usize, Vec<TextRun>)>> {
    let doc = load(bytes)?;
    assigned
        .iter()
        .map(|&(slot, page)| {
            let mut collector = RunCollector::new(settings);
            pdf_extract::output_doc_page(&doc, &mut collector, page).map_err(OfficeError::pdf)?;
            debug!(page, runs = collector.runs().len(), "page laid out");
            Ok((slot, collector.into_runs()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use officemd_core::ErrorKind;

    #[test]
    fn test_global_engine_is_shared() {
        let first = PdfEngine::global() as *const PdfEngine;
        let second = PdfEngine::global() as *const PdfEngine;
        assert_eq!(first, second);
        assert_eq!(*PdfEngine::global().settings(), LayoutSettings::default());
    }

    #[test]
    fn test_worker_floor() {
        assert_eq!(PdfEngine::default().with_workers(0).workers, 1);
    }

    #[tokio::test]
    async fn test_garbage_is_corrupted() {
        let err = PdfEngine::global()
            .extract_text(b"not a pdf at all".to_vec())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileCorrupted);
        assert_eq!(err.code(), "OFFICE009");
    }
}
