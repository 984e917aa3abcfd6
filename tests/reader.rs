use pdml_parser::traits::XmlReaderIterator;
use pdml_parser::*;

static TEST_DNS: &str = include_str!("../assets/dns.pdml");
static TEST_DNS_PSML: &str = include_str!("../assets/dns.psml");

fn read_all(data: &[u8], buffer_size: usize) -> Result<Vec<ParsedPacket>, PdmlError> {
    let mut reader = PdmlReader::new(buffer_size, data).expect("PdmlReader");
    reader.packets(ParserConfig::default()).collect()
}

#[test]
fn test_reader_blocks() {
    let mut reader = PdmlReader::new(65536, TEST_DNS.as_bytes()).expect("PdmlReader");
    let mut num_packets = 0;
    let mut sizes = Vec::new();
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                match block {
                    XmlBlock::Packet(data) => {
                        assert!(data.starts_with(b"<packet>"));
                        assert!(data.ends_with(b"</packet>"));
                        sizes.push(data.len());
                        num_packets += 1;
                    }
                    XmlBlock::Structure(_) => panic!("no structure in PDML data"),
                }
                reader.consume_noshift(offset);
            }
            Err(PdmlError::Eof) => break,
            Err(PdmlError::Incomplete(_)) => {
                reader.refill().unwrap();
            }
            Err(e) => panic!("error while reading: {:?}", e),
        }
    }
    assert_eq!(num_packets, 3);
    assert!(sizes.iter().all(|&sz| sz > 1024));
    // trailing content is skipped before Eof
    assert_eq!(reader.consumed(), TEST_DNS.len());
}

#[test]
fn test_reader_packets() {
    let expected: Vec<ParsedPacket> = packets_from_xml(TEST_DNS)
        .unwrap()
        .map(|p| p.map(ParsedPacket::from))
        .collect::<Result<_, _>>()
        .unwrap();
    // small buffers force the reader to grow
    for &size in &[1024, 4096, 65536] {
        let packets = read_all(TEST_DNS.as_bytes(), size).expect("read packets");
        assert_eq!(packets, expected);
    }
}

#[test]
fn test_reader_psml() {
    let mut reader = PdmlReader::new(256, TEST_DNS_PSML.as_bytes()).expect("PdmlReader");
    let mut packets = reader.packets(ParserConfig::default());
    let first = packets.next().expect("first row").expect("valid row");
    let structure = packets.psml_structure().cloned().expect("structure");
    assert_eq!(structure.len(), 7);
    let rows: Vec<_> = std::iter::once(Ok(first))
        .chain(packets)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows.len(), 3);
    let protocols: Vec<_> = rows
        .iter()
        .filter_map(|p| p.as_summary())
        .map(|s| s.get_or("Protocol", ""))
        .collect();
    assert_eq!(protocols, ["DNS", "DNS", "ICMP"]);
    assert!(rows.iter().all(|p| p.as_packet().is_none()));
}

#[test]
fn test_reader_truncated() {
    let end = TEST_DNS.find("</packet>").unwrap() - 20;
    let mut reader = PdmlReader::new(65536, TEST_DNS[..end].as_bytes()).expect("PdmlReader");
    let res: Vec<_> = reader.packets(ParserConfig::default()).collect();
    assert_eq!(res, [Err(PdmlError::UnexpectedEof)]);
}

#[test]
fn test_reader_empty() {
    let mut reader = PdmlReader::new(1024, &b""[..]).expect("PdmlReader");
    assert!(reader.reader_exhausted());
    assert_eq!(reader.next().map(|_| ()), Err(PdmlError::Eof));
    assert_eq!(reader.packets(ParserConfig::default()).count(), 0);
}

#[test]
fn test_reader_latin1() {
    let data: &[u8] = b"<pdml>\n<packet>\
        <proto name=\"geninfo\"><field name=\"num\" show=\"1\"/><field name=\"len\" show=\"4\"/>\
        <field name=\"caplen\" show=\"4\"/><field name=\"timestamp\" value=\"0.5\"/></proto>\
        <proto name=\"frame\"/>\
        <proto name=\"smb\"><field name=\"smb.file\" show=\"caf\xe9\"/></proto>\
        </packet>\n</pdml>\n";
    let packets = read_all(data, 64).expect("read packets");
    let packet = packets[0].as_packet().expect("detailed packet");
    assert_eq!(packet.layer("smb").unwrap().get_or("file", ""), "caf\u{e9}");

    let mut reader = PdmlReader::new(64, data).expect("PdmlReader");
    let config = ParserConfig {
        encoding_fallback: false,
        ..ParserConfig::default()
    };
    let res: Vec<_> = reader.packets(config).collect();
    assert!(matches!(res[..], [Err(PdmlError::MalformedCapture(_))]));
}

#[test]
fn test_reader_start_tag_fills_buffer() {
    // "<pac" fills the whole buffer
    let mut reader = PdmlReader::new(4, &b"<packet/>"[..]).expect("PdmlReader");
    assert_eq!(reader.next().map(|_| ()), Err(PdmlError::BufferTooSmall));
    assert!(reader.grow(16));
    reader.refill().unwrap();
    match reader.next() {
        Ok((offset, XmlBlock::Packet(data))) => {
            assert_eq!(data, b"<packet/>");
            assert_eq!(offset, 9);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_reader_tiny_buffer() {
    let expected = read_all(TEST_DNS.as_bytes(), 65536).expect("read packets");
    let packets = read_all(TEST_DNS.as_bytes(), 4).expect("read packets");
    assert_eq!(packets, expected);
    let rows = read_all(TEST_DNS_PSML.as_bytes(), 4).expect("read rows");
    assert_eq!(rows.len(), 3);
}
