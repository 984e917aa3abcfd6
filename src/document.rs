use crate::config::ParserConfig;
use crate::error::PdmlError;
use crate::packet::Packet;
use crate::translate::packet_from_pdml_element;
use crate::tree::XmlElement;

/// Iterator over the packets of a parsed PDML document
///
/// Packets are translated lazily, in document order. The iterator stops after the first
/// error: a malformed packet element ends the extraction.
#[derive(Debug)]
pub struct PdmlPackets {
    elements: std::vec::IntoIter<XmlElement>,
    failed: bool,
}

impl PdmlPackets {
    /// Number of packet elements not yet translated
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.elements.len()
        }
    }
}

impl Iterator for PdmlPackets {
    type Item = Result<Packet, PdmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let elt = self.elements.next()?;
        let res = packet_from_pdml_element(&elt);
        if res.is_err() {
            self.failed = true;
        }
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl std::iter::FusedIterator for PdmlPackets {}

/// Parse a complete PDML document, and return an iterator over its packets, using the
/// default configuration
///
/// ```rust
/// use pdml_parser::packets_from_xml;
///
/// let xml = r#"<pdml><packet>
///   <proto name="geninfo">
///     <field name="num" show="1"/><field name="len" show="42"/>
///     <field name="caplen" show="42"/><field name="timestamp" value="1.5"/>
///   </proto>
///   <proto name="frame"/>
///   <proto name="eth"/>
/// </packet></pdml>"#;
/// let packets = packets_from_xml(xml)
///     .and_then(|it| it.collect::<Result<Vec<_>, _>>())
///     .expect("valid capture");
/// assert_eq!(packets.len(), 1);
/// assert_eq!(packets[0].length, 42);
/// ```
pub fn packets_from_xml(xml_data: &str) -> Result<PdmlPackets, PdmlError> {
    packets_from_xml_with_config(xml_data, &ParserConfig::default())
}

/// Parse a complete PDML document, and return an iterator over its packets
///
/// The document is parsed once. Only `<packet>` children of the root element are translated;
/// the document-level extraction always uses the PDML path.
pub fn packets_from_xml_with_config(
    xml_data: &str,
    config: &ParserConfig,
) -> Result<PdmlPackets, PdmlError> {
    let root = XmlElement::parse_with_config(xml_data, config)?;
    let elements: Vec<XmlElement> = root
        .children
        .into_iter()
        .filter(|c| c.name == "packet")
        .collect();
    log::debug!("PDML document <{}> has {} packets", root.name, elements.len());
    Ok(PdmlPackets {
        elements: elements.into_iter(),
        failed: false,
    })
}
