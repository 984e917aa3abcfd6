use crate::blocks::{BlockKind, XmlBlock};
use crate::config::ParserConfig;
use crate::error::PdmlError;
use crate::psml::{psml_structure_from_xml_with_config, PsmlStructure};
use crate::traits::{BlockResult, XmlReaderIterator};
use crate::translate::{packet_from_xml_packet_with_config, ParsedPacket};
use circular::Buffer;
use nom::bytes::streaming::{tag, take_until};
use nom::character::streaming::one_of;
use nom::combinator::{peek, recognize};
use nom::sequence::terminated;
use nom::{IResult, Offset};
use std::io::Read;
use std::sync::Arc;

type NomError<'a> = nom::error::Error<&'a [u8]>;

/// Start and end tags of the fragments returned by the reader
const BLOCK_TAGS: &[(&str, &str, BlockKind)] = &[
    ("<packet", "</packet>", BlockKind::Packet),
    ("<structure", "</structure>", BlockKind::Structure),
];

/// Result of a scan of the buffer
#[derive(Debug, PartialEq, Eq)]
enum Scan {
    /// A complete fragment at `start..end`
    Found {
        start: usize,
        end: usize,
        kind: BlockKind,
    },
    /// No fragment starts before `skip`; these bytes can be discarded
    NotStarted(usize),
    /// A fragment starts at `start`, but its end tag is not in the buffer
    Partial(usize),
}

fn start_tag<'a>(name: &'static str) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], &'a [u8]> {
    recognize(terminated(tag(name), peek(one_of(" \t\r\n>/"))))
}

/// Length of the fragment starting at `i`, or `None` if the fragment is incomplete
fn block_len(i: &[u8], close: &'static str) -> Option<usize> {
    let (_, head) = take_until::<_, _, NomError>(">")(i).ok()?;
    if head.ends_with(b"/") {
        return Some(head.len() + 1);
    }
    let (_, body) = take_until::<_, _, NomError>(close)(i).ok()?;
    Some(body.len() + close.len())
}

fn scan(data: &[u8]) -> Scan {
    let mut pos = 0;
    loop {
        let rem = match take_until::<_, _, NomError>("<")(&data[pos..]) {
            Ok((rem, _)) => rem,
            Err(_) => return Scan::NotStarted(data.len()),
        };
        let start = data.offset(rem);
        for &(open, close, kind) in BLOCK_TAGS {
            match start_tag(open)(rem) {
                Ok(_) => {
                    return match block_len(rem, close) {
                        Some(len) => Scan::Found {
                            start,
                            end: start + len,
                            kind,
                        },
                        None => Scan::Partial(start),
                    }
                }
                // may be the beginning of a start tag, keep it
                Err(nom::Err::Incomplete(_)) => return Scan::NotStarted(start),
                Err(_) => (),
            }
        }
        pos = start + 1;
    }
}

/// Streaming reader over PDML or PSML data
///
/// This reader splits any input providing the `Read` trait (for ex, the standard output of
/// `tshark -T pdml`) into fragments: one [`XmlBlock::Packet`] per `<packet>` element, and one
/// [`XmlBlock::Structure`] for the PSML `<structure>` element. It is based on a circular
/// buffer, so memory usage is constant.
///
/// Content outside fragments (XML declaration, root element, comments) is skipped. The offset
/// returned by `next` includes the skipped bytes.
///
/// The size of the circular buffer has to be big enough for at least one complete fragment.
/// `next` returns [`PdmlError::BufferTooSmall`] otherwise; use `grow` to enlarge the buffer.
///
/// ## Example
///
/// ```rust
/// use pdml_parser::*;
/// use pdml_parser::traits::XmlReaderIterator;
///
/// let data = b"<pdml><packet><proto name=\"geninfo\"/></packet></pdml>";
/// let mut reader = PdmlReader::new(4096, &data[..]).expect("PdmlReader");
/// let mut num_packets = 0;
/// loop {
///     match reader.next() {
///         Ok((offset, block)) => {
///             if let XmlBlock::Packet(_fragment) = block {
///                 num_packets += 1;
///             }
///             reader.consume(offset);
///         }
///         Err(PdmlError::Eof) => break,
///         Err(PdmlError::Incomplete(_)) => {
///             reader.refill().unwrap();
///         }
///         Err(e) => panic!("error while reading: {:?}", e),
///     }
/// }
/// assert_eq!(num_packets, 1);
/// ```
pub struct PdmlReader<R>
where
    R: Read,
{
    reader: R,
    buffer: Buffer,
    consumed: usize,
    reader_exhausted: bool,
}

impl<R> PdmlReader<R>
where
    R: Read,
{
    /// Creates a new `PdmlReader<R>` with the provided buffer capacity.
    pub fn new(capacity: usize, reader: R) -> Result<PdmlReader<R>, PdmlError> {
        let buffer = Buffer::with_capacity(capacity);
        Self::from_buffer(buffer, reader)
    }

    /// Creates a new `PdmlReader<R>` using the provided `Buffer`.
    pub fn from_buffer(mut buffer: Buffer, mut reader: R) -> Result<PdmlReader<R>, PdmlError> {
        let sz = reader.read(buffer.space()).or(Err(PdmlError::ReadError))?;
        buffer.fill(sz);
        Ok(PdmlReader {
            reader,
            buffer,
            consumed: 0,
            reader_exhausted: sz == 0,
        })
    }

    /// Iterate over the translated packets, refilling the buffer as needed
    ///
    /// PSML structure fragments are not returned: the last one seen is used to translate the
    /// following rows as [`ParsedPacket::Summary`]. The buffer is doubled when a fragment does
    /// not fit. The iterator stops after the first error.
    pub fn packets(&mut self, config: ParserConfig) -> ReaderPackets<'_, R> {
        ReaderPackets {
            reader: self,
            structure: None,
            config,
            done: false,
        }
    }
}

impl<R> XmlReaderIterator for PdmlReader<R>
where
    R: Read,
{
    fn next(&mut self) -> BlockResult {
        let found = scan(self.buffer.data());
        match found {
            Scan::Found { start, end, kind } => {
                let data = &self.buffer.data()[start..end];
                Ok((end, kind.wrap(data)))
            }
            Scan::NotStarted(skip) => {
                self.consume(skip);
                if self.reader_exhausted {
                    if self.buffer.available_data() > 0 {
                        log::debug!(
                            "ignoring {} trailing bytes",
                            self.buffer.available_data()
                        );
                    }
                    Err(PdmlError::Eof)
                } else if self.buffer.available_data() >= self.buffer.capacity() {
                    // the buffer is full with the beginning of a start tag
                    Err(PdmlError::BufferTooSmall)
                } else {
                    Err(PdmlError::Incomplete(0))
                }
            }
            Scan::Partial(start) => {
                self.consume(start);
                if self.reader_exhausted {
                    // a fragment started, but reader is EOF: truncated capture?
                    Err(PdmlError::UnexpectedEof)
                } else if self.buffer.available_data() >= self.buffer.capacity() {
                    Err(PdmlError::BufferTooSmall)
                } else {
                    Err(PdmlError::Incomplete(0))
                }
            }
        }
    }
    fn consume(&mut self, offset: usize) {
        self.consumed += offset;
        self.buffer.consume(offset);
    }
    fn consume_noshift(&mut self, offset: usize) {
        self.consumed += offset;
        self.buffer.consume_noshift(offset);
    }
    fn consumed(&self) -> usize {
        self.consumed
    }
    fn refill(&mut self) -> Result<(), PdmlError> {
        self.buffer.shift();
        let space = self.buffer.space();
        // a zero-length read would be taken as end of input
        if space.is_empty() {
            return Ok(());
        }
        let sz = self.reader.read(space).or(Err(PdmlError::ReadError))?;
        log::trace!("refill: read {} bytes", sz);
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
    fn position(&self) -> usize {
        self.buffer.position()
    }
    fn grow(&mut self, new_size: usize) -> bool {
        self.buffer.grow(new_size)
    }
    fn data(&self) -> &[u8] {
        self.buffer.data()
    }
    fn reader_exhausted(&self) -> bool {
        self.reader_exhausted
    }
}

/// Iterator over the packets of a [`PdmlReader`], see [`PdmlReader::packets`]
pub struct ReaderPackets<'r, R>
where
    R: Read,
{
    reader: &'r mut PdmlReader<R>,
    structure: Option<Arc<PsmlStructure>>,
    config: ParserConfig,
    done: bool,
}

impl<'r, R> ReaderPackets<'r, R>
where
    R: Read,
{
    /// The last PSML structure seen, if any
    pub fn psml_structure(&self) -> Option<&Arc<PsmlStructure>> {
        self.structure.as_ref()
    }

    fn next_packet(&mut self) -> Result<Option<ParsedPacket>, PdmlError> {
        loop {
            match self.reader.next() {
                Ok((offset, XmlBlock::Structure(data))) => {
                    let structure = psml_structure_from_xml_with_config(data, &self.config)?;
                    self.structure = Some(Arc::new(structure));
                    self.reader.consume(offset);
                }
                Ok((offset, XmlBlock::Packet(data))) => {
                    let res = packet_from_xml_packet_with_config(
                        data,
                        self.structure.as_ref(),
                        &self.config,
                    )?;
                    self.reader.consume(offset);
                    return Ok(Some(res));
                }
                Err(PdmlError::Eof) => return Ok(None),
                Err(PdmlError::Incomplete(_)) => self.reader.refill()?,
                Err(PdmlError::BufferTooSmall) => {
                    let new_size = self.reader.buffer.capacity() * 2;
                    log::debug!("growing reader buffer to {} bytes", new_size);
                    if !self.reader.grow(new_size) {
                        return Err(PdmlError::BufferTooSmall);
                    }
                    self.reader.refill()?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<'r, R> Iterator for ReaderPackets<'r, R>
where
    R: Read,
{
    type Item = Result<ParsedPacket, PdmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_packet() {
            Ok(Some(p)) => Some(Ok(p)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
