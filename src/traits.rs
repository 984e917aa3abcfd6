use crate::blocks::XmlBlock;
use crate::error::PdmlError;

pub type BlockResult<'a> = Result<(usize, XmlBlock<'a>), PdmlError>;

/// Streaming iterator over PDML/PSML fragments
///
/// A reader holds a bounded window of its input. Fragments returned by `next` borrow this
/// window, so they must be dropped before the window moves (`consume` or `refill`). This keeps
/// memory bounded for unterminated inputs, such as `tshark` running on a live interface.
///
/// The usual loop is: call `next`, handle the fragment, then `consume` the returned offset.
/// On `PdmlError::Incomplete`, call `refill` and try again.
///
/// Several fragments can be read before moving the window by advancing with
/// `consume_noshift`; the data read so far stays in place until the next `refill`.
pub trait XmlReaderIterator {
    /// Return the next fragment, and the number of bytes to consume to move past it
    ///
    /// The fragment borrows the reader until `consume` or `refill`.
    fn next(&mut self) -> BlockResult;
    /// Move past `offset` bytes. Buffered data may be moved to the front of the window.
    ///
    /// **Fragments previously returned must not be alive when calling this function.**
    fn consume(&mut self, offset: usize);
    /// Move past `offset` bytes, leaving buffered data in place
    fn consume_noshift(&mut self, offset: usize);
    /// Total number of bytes consumed since the reader was created
    fn consumed(&self) -> usize;
    /// Read more input into the window
    ///
    /// **Fragments previously returned must not be alive when calling this function.**
    fn refill(&mut self) -> Result<(), PdmlError>;
    /// Offset of the unconsumed data in the window
    fn position(&self) -> usize;
    /// Enlarge the window to `new_size` bytes. Returns false if the window was not changed.
    fn grow(&mut self, new_size: usize) -> bool;
    /// Unconsumed data of the window
    fn data(&self) -> &[u8];
    /// True once the underlying reader returned end of input
    ///
    /// Data may remain in the window: `next` returns `PdmlError::Eof` only when no fragment
    /// is left.
    fn reader_exhausted(&self) -> bool;
}
