//! Shared string table (xl/sharedStrings.xml)

use quick_xml::events::Event;
use quick_xml::Reader;

use officemd_core::Result;

/// Ordered shared strings, addressed by zero-based index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    items: Vec<String>,
}

impl SharedStrings {
    /// Parse the table.
    ///
    /// Each `si` contributes the concatenation of its `t` runs. Phonetic
    /// runs (`rPh`) are skipped.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut items = Vec::new();
        let mut current: Option<String> = None;
        let mut phonetic_depth = 0usize;
        let mut in_text = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"rPh" => phonetic_depth += 1,
                    b"t" => in_text = current.is_some() && phonetic_depth == 0,
                    _ => {}
                },
                Event::Empty(ref e) if e.local_name().as_ref() == b"si" => {
                    items.push(String::new());
                }
                Event::Text(ref e) if in_text => {
                    if let Some(item) = current.as_mut() {
                        item.push_str(&e.unescape()?);
                    }
                }
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"si" => items.extend(current.take()),
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { items })
    }

    /// Look up a string by index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Number of strings
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for an absent or empty table
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
