//! Document events and the quick-xml backed event source
//!
//! The decoder never touches XML directly; it consumes a stream of
//! [`OmxEvent`]s. [`XmlEventSource`] produces that stream from any `BufRead`
//! with a pull parser, so arbitrarily large files are read incrementally.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::decoder::DecodeError;

/// Name of the inline attribute that stands in for text content
pub const VALUE_ATTRIBUTE: &str = "value";

/// One step of a well-nested element stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmxEvent {
    /// Opening tag, with at most one inline attribute `(name, value)`
    Open {
        /// Element name
        name: String,
        /// Inline attribute, if any
        attribute: Option<(String, String)>,
    },
    /// Character content
    Text(String),
    /// Closing tag
    Close(String),
}

impl OmxEvent {
    /// Opening tag without attribute
    pub fn open(name: impl Into<String>) -> Self {
        OmxEvent::Open {
            name: name.into(),
            attribute: None,
        }
    }

    /// Opening tag carrying an inline `value` attribute
    pub fn open_with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        OmxEvent::Open {
            name: name.into(),
            attribute: Some((VALUE_ATTRIBUTE.to_string(), value.into())),
        }
    }

    /// Text content
    pub fn text(content: impl Into<String>) -> Self {
        OmxEvent::Text(content.into())
    }

    /// Closing tag
    pub fn close(name: impl Into<String>) -> Self {
        OmxEvent::Close(name.into())
    }
}

/// Pull-based event source over an XML document
pub struct XmlEventSource<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    finished: bool,
}

impl XmlEventSource<BufReader<File>> {
    /// Open an XML file for streaming
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> XmlEventSource<R> {
    /// Create an event source from a BufRead source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        let config = xml_reader.config_mut();
        // Text is passed on untrimmed; consumers trim whole element content.
        config.trim_text(false);
        // Self-closing tags become Open + Close.
        config.expand_empty_elements = true;
        // Nesting mismatches are reported by the decoder.
        config.check_end_names = false;

        Self {
            reader: xml_reader,
            buf: Vec::new(),
            finished: false,
        }
    }

    /// Read the next event, or `None` at end of input
    pub fn next_event(&mut self) -> Result<Option<OmxEvent>, DecodeError> {
        if self.finished {
            return Ok(None);
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(ref e) => Some(OmxEvent::Open {
                    name: local_name(e)?,
                    attribute: pick_attribute(e, self.reader.decoder())?,
                }),
                Event::End(ref e) => {
                    let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
                    Some(OmxEvent::Close(name))
                }
                Event::Text(ref t) => {
                    let text = t.unescape()?;
                    if text.trim().is_empty() {
                        None
                    } else {
                        Some(OmxEvent::Text(text.into_owned()))
                    }
                }
                Event::CData(ref c) => {
                    let text = std::str::from_utf8(c)?;
                    Some(OmxEvent::Text(text.to_string()))
                }
                Event::Eof => {
                    self.finished = true;
                    return Ok(None);
                }
                // Declarations, comments, PIs and doctype carry no content.
                _ => None,
            };

            if let Some(event) = event {
                log::trace!("event {:?}", event);
                return Ok(Some(event));
            }
        }
    }
}

impl<R: BufRead> Iterator for XmlEventSource<R> {
    type Item = Result<OmxEvent, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn local_name(e: &BytesStart) -> Result<String, DecodeError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

/// Choose the single inline attribute an element carries
///
/// `value` wins if present; otherwise the first non-namespace attribute.
fn pick_attribute(
    e: &BytesStart,
    decoder: Decoder,
) -> Result<Option<(String, String)>, DecodeError> {
    let mut first = None;
    for attr in e.attributes() {
        let attr = attr.map_err(|e| DecodeError::Xml(quick_xml::Error::from(e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr.decode_and_unescape_value(decoder)?.into_owned();
        if key == VALUE_ATTRIBUTE {
            return Ok(Some((key, value)));
        }
        if first.is_none() {
            first = Some((key, value));
        }
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(xml: &str) -> Vec<OmxEvent> {
        XmlEventSource::new(Cursor::new(xml))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_basic_events() {
        let events = collect(
            r#"<?xml version="1.0"?>
<MSSearch xmlns="http://www.ncbi.nlm.nih.gov">
  <!-- comment -->
  <MSHits_pepstring> PEPTIDEK </MSHits_pepstring>
</MSSearch>"#,
        );

        assert_eq!(
            events,
            vec![
                OmxEvent::open("MSSearch"),
                OmxEvent::open("MSHits_pepstring"),
                OmxEvent::text(" PEPTIDEK "),
                OmxEvent::close("MSHits_pepstring"),
                OmxEvent::close("MSSearch"),
            ]
        );
    }

    #[test]
    fn test_empty_element_with_value() {
        let events = collect(r#"<MSPepHit_reversed value="false"/>"#);
        assert_eq!(
            events,
            vec![
                OmxEvent::open_with_value("MSPepHit_reversed", "false"),
                OmxEvent::close("MSPepHit_reversed"),
            ]
        );
    }

    #[test]
    fn test_value_attribute_preferred() {
        let events = collect(r#"<MSMod id="x" value="oxym">1</MSMod>"#);
        assert_eq!(events[0], OmxEvent::open_with_value("MSMod", "oxym"));
        assert_eq!(events[1], OmxEvent::text("1"));
    }

    #[test]
    fn test_escaped_text() {
        let events = collect("<MSPepHit_defline>a &amp; b</MSPepHit_defline>");
        assert_eq!(events[1], OmxEvent::text("a & b"));
    }

    #[test]
    fn test_escaped_attribute() {
        let events = collect(r#"<MSMod value="a&amp;b">1</MSMod>"#);
        assert_eq!(events[0], OmxEvent::open_with_value("MSMod", "a&b"));
    }

    #[test]
    fn test_text_around_comment_is_not_trimmed() {
        let events = collect("<Doc_title>alpha beta<!-- c --> gamma</Doc_title>");
        assert_eq!(
            events[1..3],
            [OmxEvent::text("alpha beta"), OmxEvent::text(" gamma")]
        );
    }
}
