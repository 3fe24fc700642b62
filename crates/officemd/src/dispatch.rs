//! Format dispatch
//!
//! Every format maps to exactly one pipeline. Container formats run their
//! synthesizer on the blocking pool; PDF goes through the shared engine.

use tracing::{debug, info};

use officemd_core::{Config, Format, OfficeError, Result, Synthesizer};
use officemd_docx::DocxSynthesizer;
use officemd_odf::OdfSynthesizer;
use officemd_pdf::PdfEngine;
use officemd_pptx::PptxSynthesizer;
use officemd_xlsx::XlsxSynthesizer;

/// The synthesizer for a container format, `None` for PDF
pub fn synthesizer_for(format: Format) -> Option<Box<dyn Synthesizer + Send>> {
    match format {
        Format::Docx => Some(Box::new(DocxSynthesizer::new())),
        Format::Pptx => Some(Box::new(PptxSynthesizer::new())),
        Format::Xlsx => Some(Box::new(XlsxSynthesizer::new())),
        Format::Odt | Format::Odp | Format::Ods => Some(Box::new(OdfSynthesizer::new(format))),
        Format::Pdf => None,
    }
}

/// Run the pipeline for `format` over `bytes`
pub async fn dispatch(format: Format, bytes: Vec<u8>, config: Config) -> Result<String> {
    info!(%format, bytes = bytes.len(), "extracting");

    let Some(synthesizer) = synthesizer_for(format) else {
        return PdfEngine::global().extract_markdown(bytes, &config).await;
    };

    debug!(format = %synthesizer.format(), "synthesizer selected");
    tokio::task::spawn_blocking(move || synthesizer.synthesize_bytes(&bytes, &config))
        .await
        .map_err(|e| OfficeError::Task(e.to_string()))?
}
