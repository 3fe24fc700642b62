//! # officemd
//!
//! Extract Markdown from office documents and PDF.
//!
//! Supported inputs: `.docx`, `.pptx`, `.xlsx`, `.odt`, `.odp`, `.ods` and
//! `.pdf`, given either as a path or as an in-memory buffer whose type is
//! sniffed from its content.
//!
//! ## Example
//!
//! ```no_run
//! use officemd::{parse_office, Config};
//!
//! # async fn run() -> officemd::Result<()> {
//! let config = Config::default().with_notes_at_last(true);
//! let markdown = parse_office("deck.pptx", config).await?;
//! println!("{markdown}");
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod input;

pub use dispatch::{dispatch, synthesizer_for};
pub use input::{detect_format, OfficeInput};

pub use officemd_core::{Config, ErrorKind, Format, OfficeError, Result};

use tracing::error;

/// Extract Markdown from a path or a buffer
pub async fn parse_office(input: impl Into<OfficeInput>, config: Config) -> Result<String> {
    let config = config.normalized();
    let report = config.output_error_to_console;

    let result = async {
        let (format, bytes) = input.into().resolve().await?;
        dispatch(format, bytes, config).await
    }
    .await;

    if let Err(e) = &result {
        if report {
            error!(code = e.code(), "{e}");
        }
    }
    result
}

/// Extract Markdown and hand the outcome to `callback`.
///
/// Exactly one of the two arguments is `Some`.
pub async fn parse_office_with_callback<F>(
    input: impl Into<OfficeInput>,
    config: Config,
    callback: F,
) where
    F: FnOnce(Option<String>, Option<OfficeError>),
{
    match parse_office(input, config).await {
        Ok(text) => callback(Some(text), None),
        Err(e) => callback(None, Some(e)),
    }
}

/// Blocking variant of [`parse_office`] for callers without a runtime.
///
/// Must not be called from within an async context.
pub fn parse_office_blocking(input: impl Into<OfficeInput>, config: Config) -> Result<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(parse_office(input, config))
}
