//! Translation of PDML and PSML packet fragments
//!
//! A PDML packet looks like:
//!
//! ```xml
//! <packet>
//!   <proto name="geninfo" pos="0" showname="General information" size="60">
//!     <field name="num" pos="0" show="1" showname="Number" value="1" size="60"/>
//!     <field name="len" pos="0" show="60" showname="Frame Length" value="3c" size="60"/>
//!     <field name="caplen" pos="0" show="60" showname="Captured Length" value="3c" size="60"/>
//!     <field name="timestamp" pos="0" show="Jun 29, 2012 07:28:25.298858000 UTC" showname="Captured Time" value="1340954905.298858000" size="60"/>
//!   </proto>
//!   <proto name="frame" showname="Frame 1: 60 bytes on wire" size="60" pos="0">
//!     <field name="frame.interface_id" showname="Interface id: 0 (eth0)" size="0" pos="0" show="0"/>
//!   </proto>
//!   <proto name="eth" showname="Ethernet II" size="14" pos="0">
//!     ...
//!   </proto>
//! </packet>
//! ```
//!
//! The first `<proto>` element is always `geninfo`, and the second one `frame`.

use crate::config::ParserConfig;
use crate::error::PdmlError;
use crate::layer::Layer;
use crate::packet::Packet;
use crate::psml::PsmlStructure;
use crate::summary::PacketSummary;
use crate::tree::XmlElement;
use std::borrow::Cow;
use std::sync::Arc;

/// Input of the translation functions: text, raw bytes, or an already parsed element
#[derive(Clone, Copy, Debug)]
pub enum XmlInput<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    Tree(&'a XmlElement),
}

impl<'a> From<&'a str> for XmlInput<'a> {
    fn from(s: &'a str) -> Self {
        XmlInput::Text(s)
    }
}

impl<'a> From<&'a String> for XmlInput<'a> {
    fn from(s: &'a String) -> Self {
        XmlInput::Text(s)
    }
}

impl<'a> From<&'a [u8]> for XmlInput<'a> {
    fn from(b: &'a [u8]) -> Self {
        XmlInput::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for XmlInput<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        XmlInput::Bytes(b)
    }
}

impl<'a> From<&'a XmlElement> for XmlInput<'a> {
    fn from(e: &'a XmlElement) -> Self {
        XmlInput::Tree(e)
    }
}

/// A translated packet: either a detailed PDML packet or a PSML summary
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedPacket {
    Detailed(Packet),
    Summary(PacketSummary),
}

impl ParsedPacket {
    pub fn as_packet(&self) -> Option<&Packet> {
        match self {
            ParsedPacket::Detailed(p) => Some(p),
            ParsedPacket::Summary(_) => None,
        }
    }

    pub fn as_summary(&self) -> Option<&PacketSummary> {
        match self {
            ParsedPacket::Detailed(_) => None,
            ParsedPacket::Summary(s) => Some(s),
        }
    }
}

impl From<Packet> for ParsedPacket {
    fn from(p: Packet) -> Self {
        ParsedPacket::Detailed(p)
    }
}

impl From<PacketSummary> for ParsedPacket {
    fn from(s: PacketSummary) -> Self {
        ParsedPacket::Summary(s)
    }
}

/// Decode raw bytes as UTF-8, or as ISO-8859-1 if they are not valid UTF-8
///
/// Capture payloads may contain arbitrary bytes in text nodes. ISO-8859-1 maps every byte to
/// a character, so the fallback cannot fail; it is skipped only if disabled in `config`.
pub fn decode_bytes<'a>(bytes: &'a [u8], config: &ParserConfig) -> Result<Cow<'a, str>, PdmlError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(Cow::Borrowed(s)),
        Err(e) if config.encoding_fallback => {
            log::debug!("invalid UTF-8 ({}), decoding fragment as ISO-8859-1", e);
            Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()))
        }
        Err(e) => Err(PdmlError::MalformedCapture(format!(
            "fragment is not UTF-8: {}",
            e
        ))),
    }
}

fn with_element<T, F>(input: XmlInput, config: &ParserConfig, f: F) -> Result<T, PdmlError>
where
    F: FnOnce(&XmlElement) -> Result<T, PdmlError>,
{
    match input {
        XmlInput::Tree(elt) => f(elt),
        XmlInput::Text(text) => f(&XmlElement::parse_with_config(text, config)?),
        XmlInput::Bytes(bytes) => {
            let text = decode_bytes(bytes, config)?;
            f(&XmlElement::parse_with_config(&text, config)?)
        }
    }
}

/// Translate one packet fragment, using the default configuration
///
/// If `psml_structure` is given, the fragment is a PSML row and a [`PacketSummary`] is
/// returned. Otherwise it is a PDML packet and a [`Packet`] is returned.
pub fn packet_from_xml_packet<'a, I: Into<XmlInput<'a>>>(
    xml_pkt: I,
    psml_structure: Option<&Arc<PsmlStructure>>,
) -> Result<ParsedPacket, PdmlError> {
    packet_from_xml_packet_with_config(xml_pkt, psml_structure, &ParserConfig::default())
}

/// Translate one packet fragment
pub fn packet_from_xml_packet_with_config<'a, I: Into<XmlInput<'a>>>(
    xml_pkt: I,
    psml_structure: Option<&Arc<PsmlStructure>>,
    config: &ParserConfig,
) -> Result<ParsedPacket, PdmlError> {
    with_element(xml_pkt.into(), config, |elt| match psml_structure {
        Some(structure) => summary_from_psml_element(elt, structure).map(ParsedPacket::from),
        None => packet_from_pdml_element(elt).map(ParsedPacket::from),
    })
}

/// Translate one PDML packet fragment
pub fn packet_from_pdml<'a, I: Into<XmlInput<'a>>>(
    xml_pkt: I,
    config: &ParserConfig,
) -> Result<Packet, PdmlError> {
    with_element(xml_pkt.into(), config, packet_from_pdml_element)
}

/// Translate one PSML row fragment
pub fn summary_from_psml<'a, I: Into<XmlInput<'a>>>(
    xml_pkt: I,
    structure: &Arc<PsmlStructure>,
    config: &ParserConfig,
) -> Result<PacketSummary, PdmlError> {
    with_element(xml_pkt.into(), config, |elt| {
        summary_from_psml_element(elt, structure)
    })
}

fn expect_packet(elt: &XmlElement) -> Result<(), PdmlError> {
    if elt.name != "packet" {
        return Err(PdmlError::MalformedCapture(format!(
            "expected <packet>, found <{}>",
            elt.name
        )));
    }
    Ok(())
}

/// Build a [`Packet`] from a parsed PDML `<packet>` element
///
/// Fails with `MalformedCapture` if there are fewer than two `<proto>` elements, or if
/// `geninfo` lacks the packet number, lengths or timestamp.
pub fn packet_from_pdml_element(elt: &XmlElement) -> Result<Packet, PdmlError> {
    expect_packet(elt)?;
    let mut protos = elt.children_named("proto");
    let (geninfo, frame_info) = match (protos.next(), protos.next()) {
        (Some(g), Some(f)) => (Layer::from_element(g), Layer::from_element(f)),
        _ => {
            return Err(PdmlError::malformed(
                "PDML packet has fewer than two <proto> elements",
            ))
        }
    };
    let layers: Vec<Layer> = protos.map(Layer::from_element).collect();
    if elt.children.len() != layers.len() + 2 {
        log::trace!(
            "skipped {} non-proto elements in packet",
            elt.children.len() - layers.len() - 2
        );
    }

    let sniff_time = geninfo
        .get_field_value("timestamp", true)
        .map_err(|_| missing_geninfo("timestamp"))?
        .to_owned();
    let interface_captured = frame_info
        .get("interface_id")
        .map(|f| f.raw_value().to_owned());
    Ok(Packet {
        number: geninfo_u32(&geninfo, "num")?,
        length: geninfo_u32(&geninfo, "len")?,
        sniff_time,
        captured_length: geninfo_u32(&geninfo, "caplen")?,
        interface_captured,
        frame_info,
        layers,
    })
}

fn missing_geninfo(name: &str) -> PdmlError {
    PdmlError::MalformedCapture(format!("geninfo has no '{}' field", name))
}

fn geninfo_u32(geninfo: &Layer, name: &str) -> Result<u32, PdmlError> {
    let value = geninfo
        .get_field_value(name, false)
        .map_err(|_| missing_geninfo(name))?;
    value.trim().parse().map_err(|_| {
        PdmlError::MalformedCapture(format!("geninfo '{}' is not a number: {}", name, value))
    })
}

/// Build a [`PacketSummary`] from a parsed PSML `<packet>` row
pub fn summary_from_psml_element(
    elt: &XmlElement,
    structure: &Arc<PsmlStructure>,
) -> Result<PacketSummary, PdmlError> {
    expect_packet(elt)?;
    let values = elt
        .children_named("section")
        .map(|s| s.text.clone())
        .collect();
    Ok(PacketSummary::new(Arc::clone(structure), values))
}
