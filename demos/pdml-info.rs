use pdml_parser::traits::XmlReaderIterator;
use pdml_parser::*;
use std::env;
use std::error::Error;
use std::fs::File;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    for arg in env::args().skip(1) {
        if let Err(e) = print_pdml_info(&arg) {
            eprintln!("{}: {}", arg, e);
        }
    }
}

fn print_pdml_info(arg: &str) -> Result<(), Box<dyn Error>> {
    println!("Name: {}", arg);

    let file = File::open(arg)?;
    let file_size = file.metadata()?.len();
    println!("\tfile size: {}", file_size);

    let mut capacity = 64 * 1024;
    let mut reader = PdmlReader::new(capacity, file)?;

    // Note that we do not call `consume()` here, so the packet iterator
    // will start with the same fragment
    loop {
        match reader.next() {
            Ok((_, XmlBlock::Structure(_))) => {
                println!("\tformat: PSML");
                break;
            }
            Ok((_, XmlBlock::Packet(_))) => {
                println!("\tformat: PDML");
                break;
            }
            Err(PdmlError::Incomplete(_)) => reader.refill()?,
            Err(PdmlError::BufferTooSmall) => {
                capacity *= 2;
                if !reader.grow(capacity) {
                    return Err("could not grow reader buffer".into());
                }
                reader.refill()?;
            }
            Err(PdmlError::Eof) => return Err("no packet found".into()),
            Err(e) => return Err(e.into()),
        }
    }

    let mut num_packets = 0;
    let mut num_layers = 0;
    let mut packets = reader.packets(ParserConfig::default());
    for packet in &mut packets {
        match packet? {
            ParsedPacket::Detailed(p) => {
                print_packet_info(&p);
                num_layers += p.len();
            }
            ParsedPacket::Summary(s) => println!("\t\t{}", s.summary_line()),
        }
        num_packets += 1;
    }
    if let Some(structure) = packets.psml_structure() {
        println!("\tcolumns: {}", structure.labels().join(", "));
    }

    println!("\tnum_packets: {}", num_packets);
    if num_layers > 0 {
        println!("\tnum_layers: {}", num_layers);
    }

    Ok(())
}

fn print_packet_info(packet: &Packet) {
    let names: Vec<_> = packet.iter().map(|l| l.name.as_str()).collect();
    println!(
        "\t\t#{} len={} caplen={} time={} [{}]",
        packet.number,
        packet.length,
        packet.captured_length,
        packet.sniff_time,
        names.join("/")
    );
    if let Some(iface) = packet.interface_captured.as_deref() {
        println!(
            "\t\t\tinterface: {} {}",
            iface,
            packet.frame_info.get_or("interface_name", "")
        );
    }
}
