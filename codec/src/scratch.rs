//! Reusable scratch buffers for steady-state encoding.

use bytecoder::ByteWriter;

/// Scratch buffers reused across encode calls.
///
/// A property is serialized into `property` to measure it before it is
/// committed; `values` accumulates a record's value region before framing.
/// Holding one `CodecScratch` per encoding thread avoids per-call
/// allocations once the buffers have warmed up.
#[derive(Debug, Default)]
pub struct CodecScratch {
    pub(crate) property: ByteWriter,
    pub(crate) values: ByteWriter,
}

impl CodecScratch {
    /// Creates empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears both buffers, retaining their capacity.
    pub fn clear(&mut self) {
        self.property.clear();
        self.values.clear();
    }
}
