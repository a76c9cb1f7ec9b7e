// Wire layout of the SFFA payload

use modular_bitfield::prelude::*;
use std::fmt;
use std::ops::RangeInclusive;
use strum_macros::Display;

/// Size of the payload on the wire (10 bytes)
pub const PAYLOAD_SIZE: usize = 10;

/// Total number of bits in a payload
pub const PAYLOAD_BITS: usize = PAYLOAD_SIZE * 8;

/// Version control nibble, byte 0 bits 7-4
pub const VERSION: BitField = BitField::new(0, 7, 4);

/// Battery OK flag, byte 0 bit 3
pub const BATTERY_OK: BitField = BitField::new(0, 3, 1);

/// Undefined bits, byte 0 bits 2-0. No setter writes these.
pub const RESERVED: BitField = BitField::new(0, 2, 3);

/// Temperature, byte 1 bits 7-0 followed by byte 2 bits 7-6
pub const TEMPERATURE: BitField = BitField::new(1, 7, 10);

/// Humidity, byte 2 bits 5-0 followed by byte 3 bit 7
pub const HUMIDITY: BitField = BitField::new(2, 5, 7);

/// Gas level, byte 3 bits 6-0
pub const GAS_LEVEL: BitField = BitField::new(3, 6, 7);

/// Latitude, bytes 4-6 big-endian
pub const LATITUDE: BitField = BitField::new(4, 7, 24);

/// Longitude, bytes 7-9 big-endian
pub const LONGITUDE: BitField = BitField::new(7, 7, 24);

/// A contiguous run of bits inside the payload.
///
/// Bits are numbered MSB-first: bit 0 of the payload is the most significant bit
/// of byte 0. A field may straddle byte boundaries; the bits it covers are read
/// as one big-endian unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitField {
    start: usize,
    width: usize,
}

impl BitField {
    /// Describe a field by the byte holding its most significant bit, the position
    /// of that bit within the byte (7 = MSB, 0 = LSB) and its width in bits.
    pub const fn new(byte: usize, bit: u8, width: u8) -> Self {
        assert!(bit < 8, "bit position must be 0..=7");
        assert!(width >= 1 && width <= 32, "field width must be 1..=32 bits");
        let start = byte * 8 + (7 - bit as usize);
        assert!(start + width as usize <= PAYLOAD_BITS, "field exceeds payload");
        Self {
            start,
            width: width as usize,
        }
    }

    /// Offset of the first (most significant) bit, counted from the MSB of byte 0
    pub const fn start_bit(&self) -> usize {
        self.start
    }

    /// Offset one past the last bit
    pub const fn end_bit(&self) -> usize {
        self.start + self.width
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    /// Largest raw value the field can hold
    pub const fn max_value(&self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    /// Indices of the bytes this field touches
    pub const fn byte_span(&self) -> RangeInclusive<usize> {
        self.start / 8..=(self.end_bit() - 1) / 8
    }

    // Distance from the field's LSB to the LSB of its last byte
    fn shift(&self) -> usize {
        (*self.byte_span().end() + 1) * 8 - self.end_bit()
    }

    fn mask(&self) -> u64 {
        u64::from(self.max_value()) << self.shift()
    }

    /// Extract the raw value of this field.
    pub fn read(&self, buf: &[u8; PAYLOAD_SIZE]) -> u32 {
        let window = load_window(&buf[self.byte_span()]);
        ((window & self.mask()) >> self.shift()) as u32
    }

    /// Store `value` into this field, leaving every bit outside it untouched.
    /// Bits of `value` above the field width are dropped.
    pub fn write(&self, buf: &mut [u8; PAYLOAD_SIZE], value: u32) {
        let mask = self.mask();
        let span = &mut buf[self.byte_span()];
        let window = load_window(span);
        let window = (window & !mask) | ((u64::from(value) << self.shift()) & mask);

        let len = span.len();
        for (i, byte) in span.iter_mut().enumerate() {
            *byte = (window >> ((len - 1 - i) * 8)) as u8;
        }
    }
}

impl fmt::Display for BitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.byte_span();
        let msb = 7 - self.start % 8;
        let lsb = 7 - (self.end_bit() - 1) % 8;
        if span.start() == span.end() {
            write!(f, "byte{}[{}..{}]", span.start(), msb, lsb)
        } else {
            write!(f, "byte{}[{}]..byte{}[{}]", span.start(), msb, span.end(), lsb)
        }
    }
}

fn load_window(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Every field of the payload, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Field {
    #[strum(to_string = "version")]
    Version,
    #[strum(to_string = "battery OK")]
    BatteryOk,
    #[strum(to_string = "reserved")]
    Reserved,
    #[strum(to_string = "temperature")]
    Temperature,
    #[strum(to_string = "humidity")]
    Humidity,
    #[strum(to_string = "gas level")]
    GasLevel,
    #[strum(to_string = "latitude")]
    Latitude,
    #[strum(to_string = "longitude")]
    Longitude,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Version,
        Field::BatteryOk,
        Field::Reserved,
        Field::Temperature,
        Field::Humidity,
        Field::GasLevel,
        Field::Latitude,
        Field::Longitude,
    ];

    pub const fn layout(&self) -> BitField {
        match self {
            Field::Version => VERSION,
            Field::BatteryOk => BATTERY_OK,
            Field::Reserved => RESERVED,
            Field::Temperature => TEMPERATURE,
            Field::Humidity => HUMIDITY,
            Field::GasLevel => GAS_LEVEL,
            Field::Latitude => LATITUDE,
            Field::Longitude => LONGITUDE,
        }
    }

    /// Accepted input range of the strict setter for this field, in engineering
    /// units. `None` for fields that take any value or cannot be set.
    pub fn domain(&self) -> Option<RangeInclusive<f64>> {
        match self {
            Field::Version => Some(0.0..=15.0),
            Field::Temperature => Some(-50.0..=154.7),
            Field::Humidity => Some(0.0..=100.0),
            Field::GasLevel => Some(0.0..=3.0),
            Field::Latitude | Field::Longitude => Some(-180.0..=180.0),
            Field::BatteryOk | Field::Reserved => None,
        }
    }
}

/// Typed view of byte 0 of the payload.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusByte {
    #[skip(setters)]
    pub reserved: B3,
    pub battery_ok: bool,
    pub version: B4,
}
