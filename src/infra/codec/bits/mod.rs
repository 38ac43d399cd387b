//! Bit manipulation over small payload buffers. Event payloads pack flags and
//! counters at arbitrary bit offsets (bit 3 of byte 0, a nibble straddling two
//! bytes, ...); bits are numbered LSB-first inside each byte and bytes in
//! ascending order.
use crate::error::{BitReaderError, BitWriterError};

/// Reader extracting bit segments from a `&[u8]` without copies.
pub struct BitReader<'a> {
    buffer: &'a [u8],
    /// Current index expressed as number of bits from the beginning.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the start of the buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::at(buffer, 0)
    }

    /// Create a reader positioned at `bit_cursor`.
    pub fn at(buffer: &'a [u8], bit_cursor: usize) -> Self {
        Self { buffer, bit_cursor }
    }

    /// Current position in bits.
    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    /// Read `num_bits` bits (1..=64) at the cursor and advance it.
    pub fn read_u64(&mut self, num_bits: u8) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitReaderError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        let available = (self.buffer.len() * 8).saturating_sub(self.bit_cursor);
        if num_bits as usize > available {
            return Err(BitReaderError::OutOfBounds {
                asked: num_bits as usize,
                available,
            });
        }

        let mut result: u64 = 0;
        let mut done = 0usize;
        while done < num_bits as usize {
            let position = self.bit_cursor + done;
            let offset = position % 8;
            let chunk = (8 - offset).min(num_bits as usize - done);
            let mask = ((1u16 << chunk) - 1) as u8;
            let bits = (self.buffer[position / 8] >> offset) & mask;
            result |= (bits as u64) << done;
            done += chunk;
        }
        self.bit_cursor += num_bits as usize;
        Ok(result)
    }

    /// Read up to 8 bits.
    pub fn read_u8(&mut self, num_bits: u8) -> Result<u8, BitReaderError> {
        if num_bits > 8 {
            return Err(BitReaderError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|v| v as u8)
    }

    /// Read up to 16 bits.
    pub fn read_u16(&mut self, num_bits: u8) -> Result<u16, BitReaderError> {
        if num_bits > 16 {
            return Err(BitReaderError::TooLongForType {
                max: 16,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|v| v as u16)
    }

    /// Read up to 32 bits.
    pub fn read_u32(&mut self, num_bits: u8) -> Result<u32, BitReaderError> {
        if num_bits > 32 {
            return Err(BitReaderError::TooLongForType {
                max: 32,
                asked: num_bits,
            });
        }
        self.read_u64(num_bits).map(|v| v as u32)
    }
}

//==================================================================================BITWRITER
/// Writer laying bit segments into a `&mut [u8]`. Only the targeted bits are
/// touched; neighbouring fields keep their value.
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::at(buffer, 0)
    }

    /// Create a writer positioned at `bit_cursor`.
    pub fn at(buffer: &'a mut [u8], bit_cursor: usize) -> Self {
        Self { buffer, bit_cursor }
    }

    /// Current position in bits.
    pub fn bit_cursor(&self) -> usize {
        self.bit_cursor
    }

    /// Write the low `num_bits` bits of `value` and advance the cursor.
    pub fn write_u64(&mut self, value: u64, num_bits: u8) -> Result<(), BitWriterError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitWriterError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        let available = (self.buffer.len() * 8).saturating_sub(self.bit_cursor);
        if num_bits as usize > available {
            return Err(BitWriterError::OutOfBounds {
                asked: num_bits as usize,
                available,
            });
        }

        let mut remaining = value;
        let mut done = 0usize;
        while done < num_bits as usize {
            let position = self.bit_cursor + done;
            let offset = position % 8;
            let chunk = (8 - offset).min(num_bits as usize - done);
            let mask = ((1u16 << chunk) - 1) as u8;
            let byte = &mut self.buffer[position / 8];
            *byte &= !(mask << offset);
            *byte |= (remaining as u8 & mask) << offset;
            remaining >>= chunk;
            done += chunk;
        }
        self.bit_cursor += num_bits as usize;
        Ok(())
    }

    /// Write up to 8 bits.
    pub fn write_u8(&mut self, value: u8, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits > 8 {
            return Err(BitWriterError::TooLongForType {
                max: 8,
                asked: num_bits,
            });
        }
        self.write_u64(value as u64, num_bits)
    }

    /// Write up to 16 bits.
    pub fn write_u16(&mut self, value: u16, num_bits: u8) -> Result<(), BitWriterError> {
        if num_bits > 16 {
            return Err(BitWriterError::TooLongForType {
                max: 16,
                asked: num_bits,
            });
        }
        self.write_u64(value as u64, num_bits)
    }
}

//==================================================================================FIELD_HELPERS
/// Read a field of `width` bits at `offset`. Out-of-range layouts read as 0;
/// generated views only use layouts validated at build time.
#[inline]
pub fn read_field(buffer: &[u8], offset: usize, width: u8) -> u64 {
    BitReader::at(buffer, offset)
        .read_u64(width)
        .unwrap_or_default()
}

/// Store `value` in the field of `width` bits at `offset` and report whether the
/// stored bits changed. Bits of `value` above `width` are discarded.
#[inline]
pub fn write_field(buffer: &mut [u8], offset: usize, width: u8, value: u64) -> bool {
    let previous = read_field(buffer, offset, width);
    let masked = if width >= 64 {
        value
    } else {
        value & ((1u64 << width) - 1)
    };
    if previous == masked {
        return false;
    }
    BitWriter::at(buffer, offset).write_u64(masked, width).is_ok()
}
