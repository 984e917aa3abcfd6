//! # PDML and PSML parsers
//!
//! This crate translates the XML packet dumps produced by `tshark` into packets, protocol
//! layers and fields:
//!
//! - PDML (`tshark -T pdml`) is a detailed dump: each packet holds one `<proto>` element per
//!   protocol layer, holding `<field>` elements. It is translated into [`Packet`] values.
//! - PSML (`tshark -T psml`) is a summary dump: a `<structure>` element lists the column
//!   labels, and each packet is a row of column values. It is translated into
//!   [`PacketSummary`] values sharing one [`PsmlStructure`].
//!
//! Translation is a pure function of its input: packets can be translated in parallel, each
//! call uses its own XML reader. The crate does not run `tshark`.
//!
//! # Example: translating a packet fragment
//!
//! ```rust
//! use pdml_parser::*;
//!
//! let xml = r#"<packet>
//!   <proto name="geninfo">
//!     <field name="num" show="1"/><field name="len" show="60"/>
//!     <field name="caplen" show="60"/><field name="timestamp" value="1.000000000"/>
//!   </proto>
//!   <proto name="frame"><field name="frame.interface_id" show="0"/></proto>
//!   <proto name="eth">
//!     <field name="eth.src" show="aa:bb:cc:dd:ee:ff" value="aabbccddeeff"/>
//!   </proto>
//! </packet>"#;
//! match packet_from_xml_packet(xml, None) {
//!     Ok(ParsedPacket::Detailed(packet)) => {
//!         assert_eq!(packet.number, 1);
//!         let eth = packet.layer("eth").expect("eth layer");
//!         assert_eq!(eth.get_field_value("src", false), Ok("aa:bb:cc:dd:ee:ff"));
//!         assert_eq!(eth.get_or("dst", "unknown"), "unknown");
//!     }
//!     other => panic!("unexpected result {:?}", other),
//! }
//! ```
//!
//! # Example: streaming parsing
//!
//! To read the output of a running capture, or a file too large to be loaded, use the
//! [`PdmlReader`] streaming reader. It splits its input into fragments using a circular
//! buffer, see [`traits::XmlReaderIterator`] for the low-level interface.
//!
//! ```rust
//! use pdml_parser::*;
//!
//! let psml = b"<psml><structure><section>No.</section><section>Protocol</section></structure>
//! <packet><section>1</section><section>DNS</section></packet>
//! <packet><section>2</section><section>DNS</section></packet></psml>";
//! let mut reader = PdmlReader::new(65536, &psml[..]).expect("PdmlReader");
//! let mut num_packets = 0;
//! for packet in reader.packets(ParserConfig::default()) {
//!     let summary = packet.expect("valid row");
//!     assert_eq!(summary.as_summary().and_then(|s| s.get("Protocol")), Some("DNS"));
//!     num_packets += 1;
//! }
//! assert_eq!(num_packets, 2);
//! ```

mod blocks;
mod config;
mod document;
mod error;
mod field;
mod layer;
mod packet;
mod psml;
mod reader;
mod summary;
mod translate;
mod tree;
pub use blocks::*;
pub use config::*;
pub use document::*;
pub use error::*;
pub use field::*;
pub use layer::*;
pub use packet::*;
pub use psml::*;
pub use reader::*;
pub use summary::*;
pub use translate::*;
pub use tree::*;

pub mod time;
pub mod traits;

#[cfg(feature = "serialize")]
pub mod serialize;
#[cfg(feature = "serialize")]
pub use serialize::*;
