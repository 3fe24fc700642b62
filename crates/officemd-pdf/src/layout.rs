//! Positioned text runs and transcript reconstruction
//!
//! The PDF engine reports one glyph at a time with its text rendering
//! matrix. Glyphs that continue each other on the same baseline are
//! merged into a [`TextRun`]; the transcript then joins runs, breaking
//! lines where the baseline moves.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

/// Thresholds used when grouping glyphs, as fractions of the font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    /// Baseline shift that still counts as the same line
    pub line_tolerance: f64,
    /// Horizontal gap beyond which a space is inserted
    pub space_ratio: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            line_tolerance: 0.2,
            space_ratio: 0.1,
        }
    }
}

/// Consecutive glyphs on one baseline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    /// Start of the run
    pub x: f64,
    /// Baseline
    pub y: f64,
    /// Position after the last glyph
    pub end_x: f64,
    /// Font size in device units
    pub font_size: f64,
    /// Decoded text
    pub text: String,
}

impl TextRun {
    fn same_line(&self, y: f64, font_size: f64, settings: &LayoutSettings) -> bool {
        (self.y - y).abs() <= settings.line_tolerance * self.font_size.max(font_size)
    }
}

/// Collects the text runs of one page
#[derive(Debug, Default)]
pub struct RunCollector {
    settings: LayoutSettings,
    runs: Vec<TextRun>,
}

impl RunCollector {
    /// Create a collector
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            settings,
            runs: Vec::new(),
        }
    }

    /// Add one glyph at `(x, y)` advancing by `advance`
    pub fn push_glyph(&mut self, x: f64, y: f64, advance: f64, font_size: f64, text: &str) {
        let settings = self.settings;
        match self.runs.last_mut() {
            Some(run)
                if run.same_line(y, font_size, &settings)
                    && (x - run.end_x).abs() <= settings.space_ratio * font_size =>
            {
                run.text.push_str(text);
                run.end_x = x + advance;
            }
            _ => self.runs.push(TextRun {
                x,
                y,
                end_x: x + advance,
                font_size,
                text: text.to_string(),
            }),
        }
    }

    /// Runs in content-stream order
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Consume the collector
    pub fn into_runs(self) -> Vec<TextRun> {
        self.runs
    }
}

/// Font size after the text rendering matrix is applied
fn effective_font_size(trm: &Transform, font_size: f64) -> f64 {
    let sx = font_size * (trm.m11 + trm.m21);
    let sy = font_size * (trm.m12 + trm.m22);
    let size = (sx * sy).abs().sqrt();
    if size > 0.0 {
        size
    } else {
        font_size.abs().max(1.0)
    }
}

impl OutputDev for RunCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let size = effective_font_size(trm, font_size);
        self.push_glyph(trm.m31, trm.m32, width * size, size, char);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Join page runs into flat text.
///
/// A newline is inserted whenever the baseline changes between runs and
/// between pages. Runs on the same baseline are concatenated, with one
/// space when the gap between them is wider than the space ratio.
pub fn transcript(pages: &[Vec<TextRun>], settings: &LayoutSettings) -> String {
    let mut out = String::new();

    for runs in pages.iter().filter(|runs| !runs.is_empty()) {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        let mut previous: Option<&TextRun> = None;
        for run in runs {
            if let Some(prev) = previous {
                if !prev.same_line(run.y, run.font_size, settings) {
                    out.push('\n');
                } else if run.x - prev.end_x > settings.space_ratio * run.font_size
                    && !out.ends_with(char::is_whitespace)
                    && !run.text.starts_with(char::is_whitespace)
                {
                    out.push(' ');
                }
            }
            out.push_str(&run.text);
            previous = Some(run);
        }
    }

    out
}
