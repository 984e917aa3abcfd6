//! PSML column structure
//!
//! A PSML document starts with a `<structure>` element listing the column labels, followed by
//! one `<packet>` element per packet:
//!
//! ```xml
//! <psml version="0" creator="wireshark/4.0.6">
//! <structure>
//! <section>No.</section>
//! <section>Time</section>
//! <section>Source</section>
//! </structure>
//! <packet>
//! <section>1</section>
//! <section>0.000000</section>
//! <section>10.0.0.1</section>
//! </packet>
//! </psml>
//! ```

use crate::config::ParserConfig;
use crate::error::PdmlError;
use crate::translate::XmlInput;
use crate::tree::XmlElement;

/// The ordered column labels of a PSML capture
///
/// It is parsed once per capture and shared (usually through an `Arc`) by all the
/// [`PacketSummary`](crate::PacketSummary) values of the capture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PsmlStructure {
    labels: Vec<String>,
}

impl PsmlStructure {
    pub fn new(labels: Vec<String>) -> PsmlStructure {
        PsmlStructure { labels }
    }

    /// Build the structure from a `<structure>` element, or from a `<psml>` element containing
    /// one
    pub fn from_element(elt: &XmlElement) -> Result<PsmlStructure, PdmlError> {
        let structure = if elt.name == "structure" {
            elt
        } else {
            elt.child("structure").ok_or_else(|| {
                PdmlError::MalformedCapture(format!("no PSML structure in <{}>", elt.name))
            })?
        };
        let labels = structure
            .children_named("section")
            .map(|s| s.text.clone())
            .collect();
        Ok(PsmlStructure { labels })
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of the column `label`, if any
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

/// Parse the column structure of a PSML document, using the default configuration
pub fn psml_structure_from_xml<'a, I: Into<XmlInput<'a>>>(
    input: I,
) -> Result<PsmlStructure, PdmlError> {
    psml_structure_from_xml_with_config(input, &ParserConfig::default())
}

/// Parse the column structure of a PSML document
///
/// The input is either a `<structure>` element or a complete `<psml>` document. Byte input
/// must be valid UTF-8: the structure is plain metadata, so there is no encoding fallback.
pub fn psml_structure_from_xml_with_config<'a, I: Into<XmlInput<'a>>>(
    input: I,
    config: &ParserConfig,
) -> Result<PsmlStructure, PdmlError> {
    match input.into() {
        XmlInput::Tree(elt) => PsmlStructure::from_element(elt),
        XmlInput::Text(text) => {
            PsmlStructure::from_element(&XmlElement::parse_with_config(text, config)?)
        }
        XmlInput::Bytes(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                PdmlError::MalformedCapture(format!("PSML structure is not UTF-8: {}", e))
            })?;
            PsmlStructure::from_element(&XmlElement::parse_with_config(text, config)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static STRUCTURE: &str = "<structure><section>No.</section><section>Time</section>\
        <section>Source</section><section>Destination</section></structure>";

    #[test]
    fn structure_from_text() {
        let s = psml_structure_from_xml(STRUCTURE).expect("structure");
        assert_eq!(s.labels(), ["No.", "Time", "Source", "Destination"]);
        assert_eq!(s.position("Source"), Some(2));
        assert_eq!(s.position("Info"), None);
    }

    #[test]
    fn structure_from_document_and_tree() {
        let doc = format!("<psml version=\"0\">{}<packet/></psml>", STRUCTURE);
        let from_doc = psml_structure_from_xml(doc.as_bytes()).expect("structure");
        let tree = XmlElement::parse(STRUCTURE).unwrap();
        let from_tree = psml_structure_from_xml(&tree).expect("structure");
        assert_eq!(from_doc, from_tree);
        assert_eq!(from_doc.len(), 4);
    }

    #[test]
    fn structure_missing() {
        let res = psml_structure_from_xml("<psml><packet/></psml>");
        assert!(matches!(res, Err(PdmlError::MalformedCapture(_))));
        let res = psml_structure_from_xml(&b"<structure>\xff</structure>"[..]);
        assert!(matches!(res, Err(PdmlError::MalformedCapture(_))));
    }
}
