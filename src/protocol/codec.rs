//! Bit interleave codec
//!
//! # Wire Layout
//! Every payload bit becomes a pair: the bit itself ("even" slot) followed by
//! its complement ("odd" slot). After every 4 pairs a literal `1 0` pair is
//! inserted, so the stream repeats in cycles of 10 bits:
//!
//! ```text
//! slot:  0  1  2  3  4  5  6  7  8  9
//!        d ~d  d ~d  d ~d  d ~d  1  0
//! ```
//!
//! Each cycle carries one payload nibble. Nibbles go out high nibble first,
//! each nibble least significant bit first. Output bytes are filled most
//! significant bit first. The stream is closed with `1 0` pairs up to the next
//! byte boundary, so every output byte holds exactly four ones.
//!
//! Decoding runs the same cycle backwards and rebuilds two byte streams: the
//! payload from the even slots and a check copy from the odd slots.

use heapless::Vec;

/// Largest payload the codec handles
pub const MAX_PAYLOAD: usize = 32;

/// Encoded size of a [`MAX_PAYLOAD`] payload
pub const MAX_ENCODED: usize = MAX_PAYLOAD * 5 / 2;

/// Bits in one encode cycle
const CYCLE_BITS: u8 = 10;

/// Bytes that precede the interleaved data in a received packet: the two
/// prefix bytes following the sync word the radio strips
pub const RX_DATA_OFFSET: usize = 2;

/// The output does not fit the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapacityError;

/// Packs bits into bytes, most significant bit first
struct BitWriter<'a, const N: usize> {
    out: &'a mut Vec<u8, N>,
    /// Bits used in the last byte of `out`, 0 when it is full
    fill: u8,
}

impl<'a, const N: usize> BitWriter<'a, N> {
    fn new(out: &'a mut Vec<u8, N>) -> Self {
        Self { out, fill: 0 }
    }

    fn push(&mut self, bit: bool) -> Result<(), CapacityError> {
        if self.fill == 0 {
            self.out.push(0).map_err(|_| CapacityError)?;
        }
        if bit {
            if let Some(last) = self.out.last_mut() {
                *last |= 0x80 >> self.fill;
            }
        }
        self.fill = (self.fill + 1) % 8;
        Ok(())
    }

    fn push_pair(&mut self, bit: bool) -> Result<(), CapacityError> {
        self.push(bit)?;
        self.push(!bit)
    }

    fn is_aligned(&self) -> bool {
        self.fill == 0
    }
}

/// Encoder state
///
/// `bit_select` is the payload bit position fed next; it starts at 4 and
/// rotates through 0..8 independent of byte boundaries. `pattern` counts
/// the bits emitted since the last `1 0` marker.
pub struct Encoder {
    bit_select: u8,
    pattern: u8,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub const fn new() -> Self {
        Self {
            bit_select: 4,
            pattern: 0,
        }
    }

    /// Appends the encoding of `payload` to `out`, closing it on a byte boundary.
    ///
    /// Returns the number of bytes appended.
    pub fn encode_into<const N: usize>(
        &mut self,
        payload: &[u8],
        out: &mut Vec<u8, N>,
    ) -> Result<usize, CapacityError> {
        let start = out.len();
        let mut writer = BitWriter::new(out);

        for &byte in payload {
            for _ in 0..8 {
                if self.pattern == 8 {
                    writer.push_pair(true)?;
                    self.pattern = 0;
                }

                let bit = byte & (1 << self.bit_select) != 0;
                self.bit_select = (self.bit_select + 1) % 8;
                writer.push_pair(bit)?;
                self.pattern += 2;
            }
        }

        while !writer.is_aligned() {
            writer.push_pair(true)?;
        }

        Ok(out.len() - start)
    }
}

/// Collects bits into bytes nibble-wise, starting at bit 4
///
/// With `invert` set each byte is complemented as soon as it completes.
struct NibblePacker<const N: usize> {
    bytes: Vec<u8, N>,
    current: u8,
    position: u8,
    invert: bool,
}

impl<const N: usize> NibblePacker<N> {
    const fn new(invert: bool) -> Self {
        Self {
            bytes: Vec::new(),
            current: 0,
            position: 4,
            invert,
        }
    }

    fn push(&mut self, bit: bool) -> Result<(), CapacityError> {
        if bit {
            self.current |= 1 << self.position;
        }
        self.position = (self.position + 1) % 8;
        if self.position == 4 {
            let byte = if self.invert { !self.current } else { self.current };
            self.current = 0;
            self.bytes.push(byte).map_err(|_| CapacityError)?;
        }
        Ok(())
    }
}

/// Decoder state
///
/// `slot` is the position inside the current 10 bit cycle.
pub struct Decoder<const N: usize> {
    slot: u8,
    data: NibblePacker<N>,
    check: NibblePacker<N>,
}

/// Result of decoding a wire stream
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decoded {
    /// Payload rebuilt from the even slots
    pub data: Vec<u8, MAX_PAYLOAD>,
    /// Payload rebuilt from the odd slots. Equals `data` for an undamaged stream.
    pub check: Vec<u8, MAX_PAYLOAD>,
}

impl<const N: usize> Default for Decoder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Decoder<N> {
    pub const fn new() -> Self {
        Self {
            slot: 0,
            data: NibblePacker::new(false),
            check: NibblePacker::new(true),
        }
    }

    /// Feeds one wire bit.
    ///
    /// # Errors
    /// * `CapacityError` - The bit completes a byte that does not fit `N`
    pub fn push(&mut self, bit: bool) -> Result<(), CapacityError> {
        match self.slot {
            0 | 2 | 4 | 6 => self.data.push(bit)?,
            1 | 3 | 5 | 7 => self.check.push(bit)?,
            _ => {}
        }
        self.slot = (self.slot + 1) % CYCLE_BITS;
        Ok(())
    }

    /// Feeds whole bytes, most significant bit first.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), CapacityError> {
        for &byte in bytes {
            for j in (0..8).rev() {
                self.push(byte & (1 << j) != 0)?;
            }
        }
        Ok(())
    }

    /// Completed payload and check bytes, each cut to `len`
    pub fn finish(self, len: usize) -> (Vec<u8, N>, Vec<u8, N>) {
        let mut data = self.data.bytes;
        let mut check = self.check.bytes;
        data.truncate(len);
        check.truncate(len);
        (data, check)
    }
}

/// Number of payload bytes carried by `wire_len` encoded bytes
///
/// Every 5 wire bytes carry 2 payload bytes; a tail of 3 or 4 bytes carries one more.
pub const fn decoded_len(wire_len: usize) -> usize {
    let tail = if wire_len % 5 >= 3 { 1 } else { 0 };
    wire_len / 5 * 2 + tail
}

/// Encodes `payload` into its interleaved wire form.
pub fn encode(payload: &[u8]) -> Result<Vec<u8, MAX_ENCODED>, CapacityError> {
    let mut out = Vec::new();
    Encoder::new().encode_into(payload, &mut out)?;
    Ok(out)
}

/// Decodes a received packet.
///
/// The first [`RX_DATA_OFFSET`] bytes are skipped. The payload length follows
/// from the wire length alone.
///
/// # Errors
/// * `CapacityError` - The message carries more than [`MAX_PAYLOAD`] bytes
pub fn decode(message: &[u8]) -> Result<Decoded, CapacityError> {
    let wire = message.get(RX_DATA_OFFSET..).unwrap_or(&[]);

    let mut decoder = Decoder::<MAX_PAYLOAD>::new();
    decoder.push_bytes(wire)?;
    let (data, check) = decoder.finish(decoded_len(wire.len()));
    Ok(Decoded { data, check })
}

/// Checksum byte appended to a payload: the two's complement of the byte sum
pub fn checksum(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
        .wrapping_neg()
}

/// Whether a payload ending in its checksum byte sums to zero
pub fn verify_checksum(payload: &[u8]) -> bool {
    !payload.is_empty() && payload.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte)) == 0
}
