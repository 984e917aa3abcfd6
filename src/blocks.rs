/// A fragment of a PDML or PSML stream
///
/// Fragments borrow the reader buffer, and are valid until `consume` or `refill` is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XmlBlock<'a> {
    /// A PSML `<structure>` element
    Structure(&'a [u8]),
    /// A `<packet>` element (PDML packet or PSML row)
    Packet(&'a [u8]),
}

impl<'a> XmlBlock<'a> {
    /// Raw bytes of the fragment, from the start tag to the end tag included
    pub fn data(&self) -> &'a [u8] {
        match self {
            XmlBlock::Structure(d) | XmlBlock::Packet(d) => d,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Structure,
    Packet,
}

impl BlockKind {
    pub(crate) fn wrap(self, data: &[u8]) -> XmlBlock {
        match self {
            BlockKind::Structure => XmlBlock::Structure(data),
            BlockKind::Packet => XmlBlock::Packet(data),
        }
    }
}
