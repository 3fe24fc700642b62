//! Input resolution: paths, buffers and format detection

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use officemd_core::container::{entry_names, extract_files};
use officemd_core::{Format, OfficeError, Result};

/// A document to extract, either on disk or in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfficeInput {
    /// Path whose extension names the format
    Path(PathBuf),
    /// Raw bytes; the format is sniffed
    Bytes(Vec<u8>),
}

impl From<&str> for OfficeInput {
    fn from(path: &str) -> Self {
        OfficeInput::Path(PathBuf::from(path))
    }
}

impl From<String> for OfficeInput {
    fn from(path: String) -> Self {
        OfficeInput::Path(PathBuf::from(path))
    }
}

impl From<&Path> for OfficeInput {
    fn from(path: &Path) -> Self {
        OfficeInput::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for OfficeInput {
    fn from(path: PathBuf) -> Self {
        OfficeInput::Path(path)
    }
}

impl From<Vec<u8>> for OfficeInput {
    fn from(bytes: Vec<u8>) -> Self {
        OfficeInput::Bytes(bytes)
    }
}

impl From<&[u8]> for OfficeInput {
    fn from(bytes: &[u8]) -> Self {
        OfficeInput::Bytes(bytes.to_vec())
    }
}

impl OfficeInput {
    /// Determine the format and load the bytes.
    ///
    /// For paths the extension is checked before the file is touched, so
    /// an unsupported extension is reported even for a missing file.
    pub async fn resolve(self) -> Result<(Format, Vec<u8>)> {
        match self {
            OfficeInput::Path(path) => resolve_path(&path).await,
            OfficeInput::Bytes(bytes) => {
                if bytes.is_empty() {
                    return Err(OfficeError::invalid_input("empty buffer"));
                }
                let format = detect_format(&bytes)?;
                Ok((format, bytes))
            }
        }
    }
}

async fn resolve_path(path: &Path) -> Result<(Format, Vec<u8>)> {
    if path.as_os_str().is_empty() {
        return Err(OfficeError::invalid_input("empty path"));
    }

    match path.extension().map(|ext| ext.to_string_lossy()) {
        Some(ext) => {
            let format = Format::from_extension(&ext)
                .ok_or_else(|| OfficeError::unsupported(ext.to_ascii_lowercase()))?;
            let bytes = read_file(path).await?;
            Ok((format, bytes))
        }
        None => {
            let bytes = read_file(path).await?;
            debug!(path = %path.display(), "no extension, sniffing content");
            let format = detect_format(&bytes)?;
            Ok((format, bytes))
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    let missing = || OfficeError::missing(path.display().to_string());
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(missing()),
        Err(e) if e.kind() == IoErrorKind::NotFound => return Err(missing()),
        Err(e) => return Err(e.into()),
    }
    Ok(tokio::fs::read(path).await?)
}

/// Detect the format of an in-memory document.
///
/// Magic bytes are tried first. Zip archives the sniffer cannot name are
/// classified by the entries they contain.
pub fn detect_format(bytes: &[u8]) -> Result<Format> {
    if let Some(kind) = infer::get(bytes) {
        debug!(mime = kind.mime_type(), "sniffed buffer");
        if let Some(format) = Format::from_extension(kind.extension()) {
            return Ok(format);
        }
        if kind.mime_type() != "application/zip" {
            return Err(OfficeError::ImproperBuffers);
        }
    }
    if bytes.starts_with(b"PK") {
        return classify_container(bytes);
    }
    Err(OfficeError::ImproperBuffers)
}

fn classify_container(bytes: &[u8]) -> Result<Format> {
    let names = entry_names(bytes).map_err(|_| OfficeError::ImproperBuffers)?;
    let has = |pred: &dyn Fn(&str) -> bool| names.iter().any(|n| pred(n));

    if has(&|n| n == "word/document.xml") {
        return Ok(Format::Docx);
    }
    if has(&|n| n.starts_with("ppt/slides/")) {
        return Ok(Format::Pptx);
    }
    if has(&|n| n.starts_with("xl/worksheets/")) {
        return Ok(Format::Xlsx);
    }
    if has(&|n| n == "content.xml") {
        let mimetype = extract_files(bytes, |n| n == "mimetype")?
            .into_iter()
            .next()
            .map(|f| f.content)
            .unwrap_or_default();
        let format = match mimetype.trim() {
            m if m.ends_with("presentation") => Format::Odp,
            m if m.ends_with("spreadsheet") => Format::Ods,
            _ => Format::Odt,
        };
        return Ok(format);
    }
    Err(OfficeError::ImproperBuffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use officemd_core::test_utils::{docx_document, pptx_slide, xlsx_sheet, zip_fixture};
    use officemd_core::ErrorKind;

    #[test]
    fn test_conversions() {
        assert_eq!(
            OfficeInput::from("a.docx"),
            OfficeInput::Path(PathBuf::from("a.docx"))
        );
        assert_eq!(
            OfficeInput::from(b"abc".as_slice()),
            OfficeInput::Bytes(b"abc".to_vec())
        );
        assert_eq!(
            OfficeInput::from(Path::new("x.pdf")),
            OfficeInput::Path(PathBuf::from("x.pdf"))
        );
    }

    #[test]
    fn test_detect_pdf() {
        assert_eq!(detect_format(b"%PDF-1.7\n%\xe2\xe3").unwrap(), Format::Pdf);
    }

    #[test]
    fn test_detect_office_containers() {
        let docx = zip_fixture(&[("word/document.xml", &docx_document(""))]);
        assert_eq!(detect_format(&docx).unwrap(), Format::Docx);

        let pptx = zip_fixture(&[("ppt/slides/slide1.xml", &pptx_slide(&["x"]))]);
        assert_eq!(detect_format(&pptx).unwrap(), Format::Pptx);

        let xlsx = zip_fixture(&[("xl/worksheets/sheet1.xml", &xlsx_sheet(""))]);
        assert_eq!(detect_format(&xlsx).unwrap(), Format::Xlsx);
    }

    #[test]
    fn test_detect_open_document_by_mimetype() {
        let ods = zip_fixture(&[
            ("mimetype", "application/vnd.oasis.opendocument.spreadsheet"),
            ("content.xml", "<office:document-content/>"),
        ]);
        assert_eq!(detect_format(&ods).unwrap(), Format::Ods);

        let odp = zip_fixture(&[
            ("mimetype", "application/vnd.oasis.opendocument.presentation"),
            ("content.xml", "<office:document-content/>"),
        ]);
        assert_eq!(detect_format(&odp).unwrap(), Format::Odp);

        let bare = zip_fixture(&[("content.xml", "<office:document-content/>")]);
        assert_eq!(detect_format(&bare).unwrap(), Format::Odt);
    }

    #[test]
    fn test_unknown_buffers() {
        let err = detect_format(b"just some text").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImproperBuffers);

        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(
            detect_format(&png).unwrap_err().kind(),
            ErrorKind::ImproperBuffers
        );

        let zip = zip_fixture(&[("readme.txt", "hello")]);
        assert_eq!(
            detect_format(&zip).unwrap_err().kind(),
            ErrorKind::ImproperBuffers
        );
    }

    #[tokio::test]
    async fn test_empty_inputs() {
        let err = OfficeInput::Bytes(Vec::new()).resolve().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = OfficeInput::from("").resolve().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_extension_checked_before_existence() {
        let err = OfficeInput::from("/no/such/notes.txt")
            .resolve()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtensionUnsupported);

        let err = OfficeInput::from("/no/such/report.DOCX")
            .resolve()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileDoesNotExist);
    }
}
