//! Explicit XML element tree
//!
//! PDML and PSML fragments are first parsed into an [`XmlElement`] tree, which is then walked
//! with bounds-checked accessors. The tree keeps attributes and children in document order.

use crate::config::ParserConfig;
use crate::error::PdmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An XML element: name, attributes, child elements and concatenated text content
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes, in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements, in document order
    pub children: Vec<XmlElement>,
    /// Text content of this element (not including text of children), kept verbatim.
    /// Whitespace-only text of an element with children is dropped.
    pub text: String,
}

impl XmlElement {
    pub fn new<S: Into<String>>(name: S) -> XmlElement {
        XmlElement {
            name: name.into(),
            ..XmlElement::default()
        }
    }

    /// Parse a complete XML document or fragment, using the default (relaxed) configuration
    pub fn parse(text: &str) -> Result<XmlElement, PdmlError> {
        Self::parse_with_config(text, &ParserConfig::default())
    }

    /// Parse a complete XML document or fragment
    ///
    /// The input must contain exactly one root element. Comments, processing instructions and
    /// the XML declaration are ignored.
    pub fn parse_with_config(text: &str, config: &ParserConfig) -> Result<XmlElement, PdmlError> {
        let mut reader = Reader::from_str(text);
        reader.check_end_names(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    check_depth(&stack, &root, config)?;
                    stack.push(element_from_tag(e, config)?);
                }
                Ok(Event::Empty(ref e)) => {
                    check_depth(&stack, &root, config)?;
                    let elt = element_from_tag(e, config)?;
                    attach(&mut stack, &mut root, elt);
                }
                Ok(Event::End(_)) => {
                    // end names are checked by the reader
                    let mut elt = stack
                        .pop()
                        .ok_or_else(|| PdmlError::malformed("unexpected closing tag"))?;
                    // indentation between child elements
                    if !elt.children.is_empty() && elt.text.trim().is_empty() {
                        elt.text.clear();
                    }
                    attach(&mut stack, &mut root, elt);
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape()?;
                    push_text(&mut stack, &text, config)?;
                }
                Ok(Event::CData(e)) => {
                    let data = e.into_inner();
                    push_text(&mut stack, &String::from_utf8_lossy(&data), config)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => (),
                Err(e) => {
                    return Err(PdmlError::MalformedCapture(format!(
                        "xml parsing error: {} at offset {}",
                        e,
                        reader.buffer_position()
                    )))
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(PdmlError::MalformedCapture(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        root.ok_or_else(|| PdmlError::malformed("no root element"))
    }

    /// Returns the value of the attribute `key`, if present
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first child element named `name`
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterate over the child elements named `name`, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the child element at position `index`
    pub fn child_at(&self, index: usize) -> Result<&XmlElement, PdmlError> {
        self.children.get(index).ok_or(PdmlError::IndexOutOfRange {
            index,
            len: self.children.len(),
        })
    }
}

fn check_depth(
    stack: &[XmlElement],
    root: &Option<XmlElement>,
    config: &ParserConfig,
) -> Result<(), PdmlError> {
    if root.is_some() {
        return Err(PdmlError::malformed("content after root element"));
    }
    match config.depth_limit() {
        Some(max) if stack.len() >= max => Err(PdmlError::MalformedCapture(format!(
            "element depth exceeds {}",
            max
        ))),
        _ => Ok(()),
    }
}

fn check_len(len: usize, config: &ParserConfig) -> Result<(), PdmlError> {
    match config.text_limit() {
        Some(max) if len > max => Err(PdmlError::MalformedCapture(format!(
            "text node exceeds {} bytes",
            max
        ))),
        _ => Ok(()),
    }
}

fn element_from_tag(tag: &BytesStart, config: &ParserConfig) -> Result<XmlElement, PdmlError> {
    let mut elt = XmlElement::new(String::from_utf8_lossy(tag.name().as_ref()));
    for attr in tag.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        check_len(value.len(), config)?;
        elt.attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value.into_owned(),
        ));
    }
    Ok(elt)
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, elt: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elt),
        None => *root = Some(elt),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str, config: &ParserConfig) -> Result<(), PdmlError> {
    match stack.last_mut() {
        Some(parent) => {
            check_len(parent.text.len() + text.len(), config)?;
            parent.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(PdmlError::malformed("text outside of root element")),
    }
}
