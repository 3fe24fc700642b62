//! Plain-text structuring
//!
//! Turns a flat transcript (as produced from PDF text runs) into Markdown
//! by classifying each line as a heading, a list item or a paragraph.
//!
//! Heading detection is an ordered table of heuristics evaluated top to
//! bottom; the first rule that fires decides the heading level. The order
//! is observable in output: on ambiguous lines an earlier rule shadows a
//! later one, so rules must not be reordered.

use once_cell::sync::Lazy;
use regex::Regex;

static PREFIXED_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());
static MULTI_LEVEL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)+)\.?\s+(\S.*)$").unwrap());
static SECTION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(chapter|section|part|appendix|annex|introduction|conclusions?|abstract|summary|references|bibliography|acknowledge?ments|preface|foreword|glossary|chapitre|partie|annexe|kapitel|abschnitt|anhang|einleitung|zusammenfassung|cap[ií]tulo|secci[oó]n|introducci[oó]n|conclusi[oó]n|resumen|capitolo|sezione|introduzione)\b",
    )
    .unwrap()
});
static NON_LATIN_ENUMERATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(第[0-9０-９一二三四五六七八九十百千]+[章节節部篇条條]|[一二三四五六七八九十]+[、．.]|[（(][一二三四五六七八九十]+[)）]|[①-⑳]|[ⅠⅡⅢⅣⅤⅥⅦⅧⅨⅩ]+[、．.\s])",
    )
    .unwrap()
});
static NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)[.)]\s+(\S.*)$").unwrap());
static BULLET_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[•◦▪▫●○■□‣⁃·]\s*|[-*–]\s+)(\S.*)$").unwrap());

const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "the",
    "to", "with", "vs", "via", "de", "la", "le", "et", "und", "der", "die", "das",
];

/// Heading heuristics, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// All-uppercase short line with blank lines around it
    UppercaseIsolated,
    /// Leading multi-level numbering such as `1.2` or `3.1.4`
    NumericEnumeration,
    /// Starts with a section keyword such as "Chapter" or "Introduction"
    SectionKeyword,
    /// Short title-cased line with blank lines around it
    TitleCaseIsolated,
    /// Mixed-case phrase on the first or last line of the document
    BoundaryPhrase,
    /// Short phrase ending with a colon
    ColonTerminated,
    /// Enumeration marker using non-Latin numerals
    NonLatinEnumeration,
}

type Rule = fn(&LineContext<'_>) -> Option<u8>;

const HEADING_RULES: &[(Heuristic, Rule)] = &[
    (Heuristic::UppercaseIsolated, uppercase_isolated),
    (Heuristic::NumericEnumeration, numeric_enumeration),
    (Heuristic::SectionKeyword, section_keyword),
    (Heuristic::TitleCaseIsolated, title_case_isolated),
    (Heuristic::BoundaryPhrase, boundary_phrase),
    (Heuristic::ColonTerminated, colon_terminated),
    (Heuristic::NonLatinEnumeration, non_latin_enumeration),
];

/// Classification of one transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Blank input line
    Blank,
    /// Line that already carries a Markdown heading prefix
    MarkdownHeading,
    /// Heading detected by a heuristic
    Heading {
        /// Rule that fired
        rule: Heuristic,
        /// Heading level, 1..=6
        level: u8,
    },
    /// `1.` / `1)` list item
    NumberedItem {
        /// Item number as written
        number: String,
        /// Item text
        text: String,
    },
    /// Bulleted list item
    BulletItem {
        /// Item text without the marker
        text: String,
    },
    /// Anything else
    Paragraph,
}

/// A line and its neighbourhood
struct LineContext<'a> {
    lines: &'a [&'a str],
    index: usize,
    first_content: Option<usize>,
    last_content: Option<usize>,
}

impl<'a> LineContext<'a> {
    fn text(&self) -> &'a str {
        self.lines[self.index].trim()
    }

    fn prev_blank(&self) -> bool {
        self.index == 0 || self.lines[self.index - 1].trim().is_empty()
    }

    fn next_blank(&self) -> bool {
        self.lines
            .get(self.index + 1)
            .map_or(true, |line| line.trim().is_empty())
    }

    fn isolated(&self) -> bool {
        self.prev_blank() && self.next_blank()
    }

    fn char_count(&self) -> usize {
        self.text().chars().count()
    }

    fn words(&self) -> Vec<&'a str> {
        self.text().split_whitespace().collect()
    }
}

fn ends_like_sentence(text: &str) -> bool {
    text.ends_with(['.', ',', ';', '!', '?', '。', '，', '；'])
}

fn uppercase_isolated(ctx: &LineContext<'_>) -> Option<u8> {
    let text = ctx.text();
    if ctx.char_count() > 60 || ctx.words().len() > 10 || !ctx.isolated() {
        return None;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    let has_lower = text.chars().any(|c| c.is_lowercase());
    (upper >= 2 && !has_lower).then_some(1)
}

fn numeric_enumeration(ctx: &LineContext<'_>) -> Option<u8> {
    if ctx.char_count() > 80 {
        return None;
    }
    let caps = MULTI_LEVEL_NUMBER.captures(ctx.text())?;
    let rest = caps.get(2)?.as_str();
    let starts_lower = rest.chars().next().is_some_and(|c| c.is_lowercase());
    let numeric_rest = rest.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ' ');
    if starts_lower || numeric_rest || ends_like_sentence(rest) {
        return None;
    }
    let depth = caps.get(1)?.as_str().split('.').count();
    Some(depth.clamp(2, 6) as u8)
}

fn section_keyword(ctx: &LineContext<'_>) -> Option<u8> {
    let text = ctx.text();
    if ctx.char_count() > 80 || ctx.words().len() > 12 || ends_like_sentence(text) {
        return None;
    }
    SECTION_KEYWORD.is_match(text).then_some(2)
}

fn title_case_isolated(ctx: &LineContext<'_>) -> Option<u8> {
    let words = ctx.words();
    if words.is_empty()
        || words.len() > 8
        || ctx.char_count() > 60
        || !ctx.isolated()
        || ends_like_sentence(ctx.text())
    {
        return None;
    }

    let mut saw_letter_word = false;
    for (i, word) in words.iter().enumerate() {
        let Some(first) = word.chars().next() else {
            continue;
        };
        if !first.is_alphabetic() {
            continue;
        }
        saw_letter_word = true;
        if first.is_uppercase() {
            continue;
        }
        let minor = MINOR_WORDS.contains(&word.to_lowercase().as_str());
        if i == 0 || !minor {
            return None;
        }
    }
    saw_letter_word.then_some(2)
}

fn boundary_phrase(ctx: &LineContext<'_>) -> Option<u8> {
    let at_start = ctx.first_content == Some(ctx.index);
    let at_end = ctx.last_content == Some(ctx.index);
    if !at_start && !at_end {
        return None;
    }
    let text = ctx.text();
    let words = ctx.words().len();
    if !(2..=12).contains(&words) || ctx.char_count() > 80 || ends_like_sentence(text) {
        return None;
    }
    let has_upper = text.chars().any(|c| c.is_uppercase());
    let has_lower = text.chars().any(|c| c.is_lowercase());
    if !(has_upper && has_lower) {
        return None;
    }
    Some(if at_start { 1 } else { 2 })
}

fn colon_terminated(ctx: &LineContext<'_>) -> Option<u8> {
    let text = ctx.text();
    let phrase = text.strip_suffix(':').or_else(|| text.strip_suffix('：'))?;
    if phrase.trim().is_empty() || ctx.words().len() > 6 || ctx.char_count() > 50 {
        return None;
    }
    phrase.chars().any(char::is_alphabetic).then_some(3)
}

fn non_latin_enumeration(ctx: &LineContext<'_>) -> Option<u8> {
    if ctx.char_count() > 60 {
        return None;
    }
    NON_LATIN_ENUMERATION.is_match(ctx.text()).then_some(2)
}

fn classify(ctx: &LineContext<'_>) -> LineKind {
    let text = ctx.text();
    if text.is_empty() {
        return LineKind::Blank;
    }
    if PREFIXED_HEADING.is_match(text) {
        return LineKind::MarkdownHeading;
    }

    for (rule, check) in HEADING_RULES {
        if let Some(level) = check(ctx) {
            return LineKind::Heading {
                rule: *rule,
                level,
            };
        }
    }

    if let Some(caps) = NUMBERED_ITEM.captures(text) {
        return LineKind::NumberedItem {
            number: caps[1].to_string(),
            text: caps[2].to_string(),
        };
    }
    if let Some(caps) = BULLET_ITEM.captures(text) {
        return LineKind::BulletItem {
            text: caps[1].to_string(),
        };
    }
    LineKind::Paragraph
}

/// Classify every line of `text`
pub fn classify_lines(text: &str) -> Vec<LineKind> {
    let lines: Vec<&str> = text.lines().collect();
    let first_content = lines.iter().position(|l| !l.trim().is_empty());
    let last_content = lines.iter().rposition(|l| !l.trim().is_empty());

    (0..lines.len())
        .map(|index| {
            classify(&LineContext {
                lines: &lines,
                index,
                first_content,
                last_content,
            })
        })
        .collect()
}

fn separate(output: &mut Vec<String>) {
    if output.last().is_some_and(|last| !last.is_empty()) {
        output.push(String::new());
    }
}

/// Render a flat transcript as Markdown
pub fn structure_text(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let kinds = classify_lines(text);
    let mut output: Vec<String> = Vec::with_capacity(lines.len() * 2);

    for (line, kind) in lines.iter().zip(kinds) {
        let line = line.trim();
        match kind {
            LineKind::Blank => {
                if output.last().is_some_and(|last| !last.is_empty()) {
                    output.push(String::new());
                }
            }
            LineKind::MarkdownHeading => {
                separate(&mut output);
                output.push(line.to_string());
                output.push(String::new());
            }
            LineKind::Heading { level, .. } => {
                separate(&mut output);
                output.push(format!("{} {}", "#".repeat(level as usize), line));
                output.push(String::new());
            }
            LineKind::NumberedItem { number, text } => {
                output.push(format!("{number}. {text}"));
            }
            LineKind::BulletItem { text } => {
                output.push(format!("- {text}"));
            }
            LineKind::Paragraph => {
                separate(&mut output);
                output.push(line.to_string());
                output.push(String::new());
            }
        }
    }

    while output.last().is_some_and(|last| last.is_empty()) {
        output.pop();
    }
    output.join("\n")
}
