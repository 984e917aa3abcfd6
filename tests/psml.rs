use pdml_parser::*;
use std::sync::Arc;

static TEST_DNS: &str = include_str!("../assets/dns.psml");

fn summaries(structure: &Arc<PsmlStructure>) -> Vec<PacketSummary> {
    let doc = XmlElement::parse(TEST_DNS).expect("parse");
    doc.children_named("packet")
        .map(|row| match packet_from_xml_packet(row, Some(structure)) {
            Ok(ParsedPacket::Summary(s)) => s,
            other => panic!("unexpected result {:?}", other),
        })
        .collect()
}

#[test]
fn test_psml_structure() {
    let structure = psml_structure_from_xml(TEST_DNS).expect("structure");
    assert_eq!(
        structure.labels(),
        ["No.", "Time", "Source", "Destination", "Protocol", "Length", "Info"]
    );
}

#[test]
fn test_psml_rows() {
    let structure = Arc::new(psml_structure_from_xml(TEST_DNS).unwrap());
    let rows = summaries(&structure);
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.len(), structure.len());
        let labels: Vec<_> = row.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, structure.labels());
        assert!(Arc::ptr_eq(row.structure(), &structure));
    }
    assert_eq!(rows[1].column("Source"), Ok("192.168.1.1"));
    assert_eq!(rows[2].get_or("Protocol", "?"), "ICMP");
    assert_eq!(
        &rows[2]["Info"],
        "Echo (ping) request  id=0x0001, seq=1/256, ttl=64"
    );
    assert_eq!(rows[0].column_at(6), Ok("Standard query 0x1a2b A example.com"));
    assert!(matches!(
        rows[0].column_at(7),
        Err(PdmlError::IndexOutOfRange { index: 7, len: 7 })
    ));
    assert!(rows[0].column("Checksum").unwrap_err().is_not_found());
}

#[test]
fn test_psml_row_bytes() {
    let structure = Arc::new(PsmlStructure::new(vec!["No.".into(), "Info".into()]));
    // "caf\xe9" is not valid UTF-8
    let row: &[u8] = b"<packet><section>4</section><section>caf\xe9</section></packet>";
    let summary = summary_from_psml(row, &structure, &ParserConfig::default()).expect("row");
    assert_eq!(summary.get("Info"), Some("caf\u{e9}"));
}

#[test]
fn test_psml_malformed_row() {
    let structure = Arc::new(PsmlStructure::new(vec!["No.".into()]));
    let res = packet_from_xml_packet("<packet><section>1</packet>", Some(&structure));
    assert!(matches!(res, Err(PdmlError::MalformedCapture(_))));
    let res = packet_from_xml_packet("<row><section>1</section></row>", Some(&structure));
    assert!(matches!(res, Err(PdmlError::MalformedCapture(_))));
}

#[test]
fn test_psml_padded_sections() {
    let structure = Arc::new(PsmlStructure::new(vec!["No.".into(), "Info".into()]));
    let row = "<packet>\n<section>1</section>\n<section>  padded  </section>\n</packet>";
    let summary = summary_from_psml(row, &structure, &ParserConfig::default()).expect("row");
    assert_eq!(summary.get("Info"), Some("  padded  "));
    assert_eq!(summary.get("No."), Some("1"));
}
