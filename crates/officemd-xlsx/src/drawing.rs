//! Text carried by drawings and charts
//!
//! Shapes and chart titles use DrawingML paragraphs (`a:p` / `a:t`).
//! Charts also cache series names and category labels as `c:v` values
//! inside `c:strCache`.

use quick_xml::events::Event;
use quick_xml::Reader;

use officemd_core::Result;

/// Collect paragraph texts from a drawing part
pub fn drawing_texts(xml: &[u8]) -> Result<Vec<String>> {
    collect_texts(xml, false)
}

/// Collect paragraph texts and cached string values from a chart part
pub fn chart_texts(xml: &[u8]) -> Result<Vec<String>> {
    collect_texts(xml, true)
}

fn collect_texts(xml: &[u8], with_string_cache: bool) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut texts = Vec::new();
    let mut paragraph: Option<String> = None;
    let mut cache_depth = 0usize;
    let mut in_text = false;
    let mut in_value = false;
    let mut value = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => paragraph = Some(String::new()),
                b"t" => in_text = paragraph.is_some(),
                b"strCache" if with_string_cache => cache_depth += 1,
                b"v" if cache_depth > 0 => {
                    in_value = true;
                    value.clear();
                }
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"br" => {
                if let Some(p) = paragraph.as_mut() {
                    p.push(' ');
                }
            }
            Event::Text(ref e) if in_text || in_value => {
                let text = e.unescape()?;
                if in_value {
                    value.push_str(&text);
                } else if let Some(p) = paragraph.as_mut() {
                    p.push_str(&text);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    in_text = false;
                    if let Some(p) = paragraph.take() {
                        push_text(&mut texts, &p);
                    }
                }
                b"strCache" if with_string_cache => cache_depth = cache_depth.saturating_sub(1),
                b"v" if in_value => {
                    in_value = false;
                    push_text(&mut texts, &value);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(texts)
}

fn push_text(texts: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        texts.push(text.to_string());
    }
}
