//! Serialization of packets back to PDML/PSML fragments
//!
//! Enabled with the `serialize` feature. The output of [`ToXml::to_xml`] can be translated
//! again, and gives an equal value.

use crate::field::Field;
use crate::layer::Layer;
use crate::packet::Packet;
use crate::psml::PsmlStructure;
use crate::summary::PacketSummary;
use cookie_factory::combinator::{cond, string};
use cookie_factory::multi::many_ref;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen_simple, GenError, SerializeFn};
use quick_xml::escape::escape;
use std::io::Write;

/// Common trait for all serialization functions
pub trait ToXml {
    /// Serialize to an XML fragment (UTF-8)
    fn to_xml(&self) -> Result<Vec<u8>, GenError>;
}

fn attr<'a, W: Write + 'a>(key: &'a str, value: &'a str) -> impl SerializeFn<W> + 'a {
    tuple((
        string(" "),
        string(key),
        string("=\""),
        string(escape(value)),
        string("\""),
    ))
}

fn opt_attr<'a, W: Write + 'a>(key: &'a str, value: Option<&'a str>) -> impl SerializeFn<W> + 'a {
    cond(value.is_some(), attr(key, value.unwrap_or_default()))
}

fn num_attr<W: Write>(key: &'static str, value: u32) -> impl SerializeFn<W> {
    string(format!(" {}=\"{}\"", key, value))
}

fn field_le<'a, W: Write + 'a>(f: &'a Field) -> impl SerializeFn<W> + 'a {
    tuple((
        string("<field"),
        attr("name", &f.name),
        opt_attr("showname", f.showname.as_deref()),
        opt_attr("show", f.show.as_deref()),
        opt_attr("value", f.value.as_deref()),
        num_attr("size", f.size),
        num_attr("pos", f.pos),
        cond(f.hide, string(" hide=\"yes\"")),
        string("/>\n"),
    ))
}

fn layer_le<'a, W: Write + 'a>(l: &'a Layer) -> impl SerializeFn<W> + 'a {
    tuple((
        string("<proto"),
        attr("name", &l.name),
        opt_attr("showname", l.showname.as_deref()),
        string(">\n"),
        many_ref(&l.fields, |f| field_le(f)),
        string("</proto>\n"),
    ))
}

fn geninfo_field<W: Write>(name: &'static str, value: u32) -> impl SerializeFn<W> {
    string(format!(
        "<field name=\"{}\" show=\"{}\" value=\"{}\"/>\n",
        name, value, value
    ))
}

fn packet_le<'a, W: Write + 'a>(p: &'a Packet) -> impl SerializeFn<W> + 'a {
    tuple((
        string("<packet>\n<proto name=\"geninfo\" showname=\"General information\">\n"),
        geninfo_field("num", p.number),
        geninfo_field("len", p.length),
        geninfo_field("caplen", p.captured_length),
        string("<field name=\"timestamp\""),
        attr("value", &p.sniff_time),
        string("/>\n</proto>\n"),
        layer_le(&p.frame_info),
        many_ref(&p.layers, |l| layer_le(l)),
        string("</packet>\n"),
    ))
}

fn section<'a, W: Write + 'a>(text: &'a str) -> impl SerializeFn<W> + 'a {
    tuple((string("<section>"), string(escape(text)), string("</section>\n")))
}

impl ToXml for Layer {
    fn to_xml(&self) -> Result<Vec<u8>, GenError> {
        gen_simple(layer_le(self), Vec::new())
    }
}

impl ToXml for Packet {
    fn to_xml(&self) -> Result<Vec<u8>, GenError> {
        gen_simple(packet_le(self), Vec::new())
    }
}

impl ToXml for PsmlStructure {
    fn to_xml(&self) -> Result<Vec<u8>, GenError> {
        gen_simple(
            tuple((
                string("<structure>\n"),
                many_ref(self.labels(), |l| section(l)),
                string("</structure>\n"),
            )),
            Vec::new(),
        )
    }
}

impl ToXml for PacketSummary {
    fn to_xml(&self) -> Result<Vec<u8>, GenError> {
        gen_simple(
            tuple((
                string("<packet>\n"),
                many_ref(self.values(), |v| section(v)),
                string("</packet>\n"),
            )),
            Vec::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::psml::psml_structure_from_xml;
    use crate::translate::{packet_from_pdml, summary_from_psml};
    use std::sync::Arc;

    static PACKET: &str = r#"<packet>
      <proto name="geninfo">
        <field name="num" show="12" value="c"/>
        <field name="len" show="74" value="4a"/>
        <field name="caplen" show="74" value="4a"/>
        <field name="timestamp" show="..." value="1340954905.298858000"/>
      </proto>
      <proto name="frame" showname="Frame 12">
        <field name="frame.interface_id" show="1" showname="Interface id: 1 (&lt;lo&gt;)"/>
      </proto>
      <proto name="http" showname="Hypertext Transfer Protocol">
        <field name="" show="GET /?a=1&amp;b=&quot;2&quot; HTTP/1.1\r\n" hide="yes">
          <field name="http.request.method" show="GET" value="474554" size="3" pos="54"/>
        </field>
      </proto>
    </packet>"#;

    #[test]
    fn packet_to_xml() {
        let config = ParserConfig::default();
        let pkt = packet_from_pdml(PACKET, &config).unwrap();
        let xml = pkt.to_xml().expect("serialize");
        let pkt2 = packet_from_pdml(&xml, &config).expect("translate serialized packet");
        assert_eq!(pkt, pkt2);
        assert_eq!(pkt2.interface_captured.as_deref(), Some("1"));
    }

    #[test]
    fn summary_to_xml() {
        let structure = psml_structure_from_xml(
            "<structure><section>No.</section><section>Info</section></structure>",
        )
        .unwrap();
        let xml = structure.to_xml().unwrap();
        let structure = Arc::new(psml_structure_from_xml(&xml).unwrap());
        assert_eq!(structure.labels(), ["No.", "Info"]);
        let row = "<packet><section>1</section><section>a &lt; b</section></packet>";
        let summary = summary_from_psml(row, &structure, &ParserConfig::default()).unwrap();
        let xml = summary.to_xml().unwrap();
        let summary2 = summary_from_psml(&xml, &structure, &ParserConfig::default()).unwrap();
        assert_eq!(summary, summary2);
        assert_eq!(summary2.get("Info"), Some("a < b"));
    }
}
