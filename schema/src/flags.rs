//! Property flag sets with a self-describing wire form.

use bytecoder::{counted_len, ByteReader, ByteWriter};

use crate::error::{SchemaError, SchemaResult};
use crate::property::PropertyId;

const WORD_BITS: usize = 64;

/// An ordered bit set over property identifiers.
///
/// Bits are addressed by raw identifier so a reader can carry flags it does
/// not recognize; typed accessors take [`PropertyId`]. Iteration order is
/// ascending raw identifier, which is also the canonical encode order.
///
/// The wire form is a byte-count coded count of significant bits followed by
/// the packed flag bytes, LSB-first within each byte. The length prefix makes
/// the stream self-describing: a reader with a smaller catalog still parses
/// the region and ignores trailing bits, a reader with a larger catalog
/// treats missing bits as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFlags {
    words: Vec<u64>,
}

impl PropertyFlags {
    /// Creates an empty flag set.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates a flag set with a single property set.
    #[must_use]
    pub fn single(id: PropertyId) -> Self {
        let mut flags = Self::new();
        flags.set(id);
        flags
    }

    /// Creates a flag set from a list of properties.
    #[must_use]
    pub fn from_ids(ids: &[PropertyId]) -> Self {
        let mut flags = Self::new();
        for id in ids {
            flags.set(*id);
        }
        flags
    }

    /// Returns `true` if the property's bit is set.
    #[must_use]
    pub fn test(&self, id: PropertyId) -> bool {
        self.test_raw(id.raw())
    }

    /// Returns `true` if the raw bit index is set.
    #[must_use]
    pub fn test_raw(&self, raw: u16) -> bool {
        let word = raw as usize / WORD_BITS;
        self.words
            .get(word)
            .is_some_and(|w| w & (1u64 << (raw as usize % WORD_BITS)) != 0)
    }

    /// Sets the property's bit.
    pub fn set(&mut self, id: PropertyId) {
        self.set_raw(id.raw());
    }

    /// Sets a raw bit index.
    pub fn set_raw(&mut self, raw: u16) {
        let word = raw as usize / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (raw as usize % WORD_BITS);
    }

    /// Clears the property's bit.
    pub fn clear(&mut self, id: PropertyId) {
        self.clear_raw(id.raw());
    }

    /// Clears a raw bit index.
    pub fn clear_raw(&mut self, raw: u16) {
        let word = raw as usize / WORD_BITS;
        if let Some(w) = self.words.get_mut(word) {
            *w &= !(1u64 << (raw as usize % WORD_BITS));
        }
    }

    /// Returns `true` if no bits are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Adds every bit of `other` to `self`.
    pub fn union_with(&mut self, other: &Self) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (dst, src) in self.words.iter_mut().zip(other.words.iter()) {
            *dst |= src;
        }
    }

    /// Removes every bit of `other` from `self`.
    pub fn difference_with(&mut self, other: &Self) {
        for (dst, src) in self.words.iter_mut().zip(other.words.iter()) {
            *dst &= !src;
        }
    }

    /// Keeps only the bits also present in `other`.
    pub fn intersect_with(&mut self, other: &Self) {
        for (idx, dst) in self.words.iter_mut().enumerate() {
            *dst &= other.words.get(idx).copied().unwrap_or(0);
        }
    }

    /// Iterates the set raw bit indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| (word_idx * WORD_BITS + bit) as u16)
        })
    }

    /// Returns the count of significant bits (highest set bit + 1).
    #[must_use]
    pub fn significant_bits(&self) -> usize {
        for (word_idx, word) in self.words.iter().enumerate().rev() {
            if *word != 0 {
                return word_idx * WORD_BITS + (WORD_BITS - word.leading_zeros() as usize);
            }
        }
        0
    }

    /// Returns the encoded size of this flag set in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let bits = self.significant_bits();
        counted_len(bits as u64) + bits.div_ceil(8)
    }

    /// Appends the wire form to a writer.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        let bits = self.significant_bits();
        writer.write_counted_u64(bits as u64);
        for byte_idx in 0..bits.div_ceil(8) {
            let mut byte = 0u8;
            for bit in 0..8 {
                let raw = byte_idx * 8 + bit;
                if raw < bits && self.test_raw(raw as u16) {
                    byte |= 1 << bit;
                }
            }
            writer.write_u8(byte);
        }
    }

    /// Encodes the flag set to its wire form.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.encoded_len());
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Decodes a flag set from a reader, bounded by `max_bits`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::FlagsTooLarge`] when the declared bit count
    /// exceeds `max_bits`, or a wrapped byte error on truncation.
    pub fn read_from(reader: &mut ByteReader<'_>, max_bits: usize) -> SchemaResult<Self> {
        let bits = reader.read_counted_u64()?;
        if bits > max_bits as u64 {
            return Err(SchemaError::FlagsTooLarge {
                bits,
                max: max_bits,
            });
        }
        let bits = bits as usize;
        let mut flags = Self::new();
        for byte_idx in 0..bits.div_ceil(8) {
            let byte = reader.read_u8()?;
            for bit in 0..8 {
                let raw = byte_idx * 8 + bit;
                if raw < bits && byte & (1 << bit) != 0 {
                    flags.set_raw(raw as u16);
                }
            }
        }
        Ok(flags)
    }

    /// Decodes a flag set from a byte slice.
    ///
    /// Returns the decoded set and the number of bytes consumed.
    pub fn from_bytes(bytes: &[u8], max_bits: usize) -> SchemaResult<(Self, usize)> {
        let mut reader = ByteReader::new(bytes);
        let flags = Self::read_from(&mut reader, max_bits)?;
        Ok((flags, reader.position()))
    }
}

impl FromIterator<PropertyId> for PropertyFlags {
    fn from_iter<I: IntoIterator<Item = PropertyId>>(iter: I) -> Self {
        let mut flags = Self::new();
        for id in iter {
            flags.set(id);
        }
        flags
    }
}
