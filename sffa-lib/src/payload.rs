use crate::error::PayloadError;
use crate::layout::{Field, PAYLOAD_SIZE, StatusByte};
use crate::reading::{GpsCoords, SensorReading};
use bytes::Bytes;
use std::fmt;
use tracing::{debug, trace};

// Encoding transforms. Temperature, humidity and gas are scaled in single
// precision, GPS in double precision; results are truncated, not rounded.
const TEMPERATURE_OFFSET_C: f32 = 50.0;
const TEMPERATURE_STEPS_PER_C: f32 = 5.0;
const HUMIDITY_FULL_SCALE: f32 = 127.0;
const GAS_STEPS_PER_V: f32 = 42.666;
const GPS_OFFSET_DEG: f64 = 180.0;
const GPS_STEPS_PER_DEG: f64 = 10_000.0;

/// A packed SFFA sensor payload.
///
/// The payload owns its 10 wire bytes outright. Equality and hashing compare the
/// raw bytes, never the decoded values.
///
/// ```text
/// byte 0     : version (4) | battery OK (1) | reserved (3)
/// bytes 1-2  : temperature (10) | humidity, high 6 bits
/// byte 3     : humidity, low bit | gas level (7)
/// bytes 4-6  : latitude (24)
/// bytes 7-9  : longitude (24)
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Payload {
    buf: [u8; PAYLOAD_SIZE],
}

impl Payload {
    /// An empty payload with every bit cleared.
    pub const fn new() -> Self {
        Self {
            buf: [0; PAYLOAD_SIZE],
        }
    }

    /// Wrap raw wire bytes. Nothing is validated; reserved bits and out-of-range
    /// encodings are kept as they are.
    pub const fn from_bytes(bytes: [u8; PAYLOAD_SIZE]) -> Self {
        Self { buf: bytes }
    }

    /// Parse a payload from hex text such as `"a0 00 00 6e 33 04 8c 0c 74 dd"`.
    /// An optional `0x` prefix and any whitespace are ignored.
    pub fn from_hex(text: &str) -> Result<Self, PayloadError> {
        let text = text.trim();
        let text = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = hex::decode(digits)?;
        Self::try_from(bytes.as_slice())
    }

    /// Build a payload holding every value of `reading`.
    pub fn try_from_reading(reading: &SensorReading) -> Result<Self, PayloadError> {
        let mut payload = Self::new();
        payload.try_set_version_control(reading.version_control)?;
        payload.set_battery_ok(reading.battery_ok);
        payload.try_set_temperature(reading.temperature_c)?;
        payload.try_set_humidity(reading.humidity_pct)?;
        payload.try_set_gas_level(reading.gas_level_v)?;
        payload.try_set_gps_coordinates(reading.gps)?;
        Ok(payload)
    }

    /// Read-only view of the wire bytes
    pub const fn as_bytes(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.buf
    }

    pub const fn into_bytes(self) -> [u8; PAYLOAD_SIZE] {
        self.buf
    }

    /// Size of the wire representation in bytes (always 10)
    pub const fn size(&self) -> usize {
        PAYLOAD_SIZE
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.buf)
    }

    /// Undecoded integer stored in `field`
    pub fn raw_field(&self, field: Field) -> u32 {
        field.layout().read(&self.buf)
    }

    /// Typed view of byte 0 (version, battery flag and reserved bits)
    pub fn status(&self) -> StatusByte {
        StatusByte::from_bytes([self.buf[0]])
    }

    /// Decode every field into engineering units.
    pub fn reading(&self) -> SensorReading {
        SensorReading {
            version_control: self.version_control(),
            battery_ok: self.battery_ok(),
            temperature_c: self.temperature(),
            humidity_pct: self.humidity(),
            gas_level_v: self.gas_level(),
            gps: self.gps_coordinates(),
        }
    }

    fn write_field(&mut self, field: Field, raw: u32) {
        trace!(%field, raw, "writing field");
        field.layout().write(&mut self.buf, raw);
    }

    // --- version control ---

    pub fn version_control(&self) -> u8 {
        self.raw_field(Field::Version) as u8
    }

    /// Set the version control nibble.
    ///
    /// # Panics
    ///
    /// Panics if `version` is greater than 15.
    #[track_caller]
    pub fn set_version_control(&mut self, version: u8) {
        if let Err(e) = self.try_set_version_control(version) {
            panic!("{e}");
        }
    }

    pub fn try_set_version_control(&mut self, version: u8) -> Result<(), PayloadError> {
        check_domain(Field::Version, f64::from(version))?;
        self.write_field(Field::Version, u32::from(version));
        Ok(())
    }

    // --- battery ---

    pub fn battery_ok(&self) -> bool {
        self.raw_field(Field::BatteryOk) != 0
    }

    pub fn set_battery_ok(&mut self, battery_ok: bool) {
        self.write_field(Field::BatteryOk, u32::from(battery_ok));
    }

    // --- temperature ---

    /// Temperature in degrees Celsius
    pub fn temperature(&self) -> f32 {
        self.raw_field(Field::Temperature) as f32 / TEMPERATURE_STEPS_PER_C - TEMPERATURE_OFFSET_C
    }

    /// Set the temperature in degrees Celsius, 0.2 °C resolution.
    ///
    /// # Panics
    ///
    /// Panics if `temperature` is outside [-50.0, 154.7] or not finite.
    #[track_caller]
    pub fn set_temperature(&mut self, temperature: f32) {
        if let Err(e) = self.try_set_temperature(temperature) {
            panic!("{e}");
        }
    }

    pub fn try_set_temperature(&mut self, temperature: f32) -> Result<(), PayloadError> {
        check_domain(Field::Temperature, f64::from(temperature))?;
        let raw = ((temperature + TEMPERATURE_OFFSET_C) * TEMPERATURE_STEPS_PER_C) as u32;
        self.write_field(Field::Temperature, raw);
        Ok(())
    }

    // --- humidity ---

    /// Relative humidity in percent
    pub fn humidity(&self) -> f32 {
        self.raw_field(Field::Humidity) as f32 / HUMIDITY_FULL_SCALE * 100.0
    }

    /// Set the relative humidity in percent.
    ///
    /// # Panics
    ///
    /// Panics if `humidity` is outside [0.0, 100.0] or not finite.
    #[track_caller]
    pub fn set_humidity(&mut self, humidity: f32) {
        if let Err(e) = self.try_set_humidity(humidity) {
            panic!("{e}");
        }
    }

    pub fn try_set_humidity(&mut self, humidity: f32) -> Result<(), PayloadError> {
        check_domain(Field::Humidity, f64::from(humidity))?;
        let raw = (humidity / 100.0 * HUMIDITY_FULL_SCALE) as u32;
        self.write_field(Field::Humidity, raw);
        Ok(())
    }

    // --- gas level ---

    /// Gas sensor output in volts DC
    pub fn gas_level(&self) -> f32 {
        self.raw_field(Field::GasLevel) as f32 / GAS_STEPS_PER_V
    }

    /// Set the gas sensor output in volts DC.
    ///
    /// # Panics
    ///
    /// Panics if `gas_level` is outside [0.0, 3.0] or not finite.
    #[track_caller]
    pub fn set_gas_level(&mut self, gas_level: f32) {
        if let Err(e) = self.try_set_gas_level(gas_level) {
            panic!("{e}");
        }
    }

    pub fn try_set_gas_level(&mut self, gas_level: f32) -> Result<(), PayloadError> {
        check_domain(Field::GasLevel, f64::from(gas_level))?;
        let raw = (gas_level * GAS_STEPS_PER_V) as u32;
        self.write_field(Field::GasLevel, raw);
        Ok(())
    }

    // --- GPS ---

    pub fn gps_coordinates(&self) -> GpsCoords {
        GpsCoords {
            latitude: decode_degrees(self.raw_field(Field::Latitude)),
            longitude: decode_degrees(self.raw_field(Field::Longitude)),
        }
    }

    /// Set latitude and longitude in degrees, 0.0001° resolution.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside [-180.0, 180.0] or not finite.
    #[track_caller]
    pub fn set_gps_coordinates(&mut self, coords: GpsCoords) {
        if let Err(e) = self.try_set_gps_coordinates(coords) {
            panic!("{e}");
        }
    }

    /// Both axes are checked before either is written.
    pub fn try_set_gps_coordinates(&mut self, coords: GpsCoords) -> Result<(), PayloadError> {
        check_domain(Field::Latitude, coords.latitude)?;
        check_domain(Field::Longitude, coords.longitude)?;
        self.write_field(Field::Latitude, encode_degrees(coords.latitude));
        self.write_field(Field::Longitude, encode_degrees(coords.longitude));
        Ok(())
    }
}

fn encode_degrees(degrees: f64) -> u32 {
    ((degrees + GPS_OFFSET_DEG) * GPS_STEPS_PER_DEG) as u32
}

fn decode_degrees(raw: u32) -> f64 {
    f64::from(raw) / GPS_STEPS_PER_DEG - GPS_OFFSET_DEG
}

// NaN never lies inside a range, so non-finite input is rejected here too.
fn check_domain(field: Field, value: f64) -> Result<(), PayloadError> {
    match field.domain() {
        Some(range) if !range.contains(&value) => {
            debug!(%field, value, "rejecting out-of-range value");
            Err(PayloadError::OutOfRange {
                field,
                value,
                min: *range.start(),
                max: *range.end(),
            })
        }
        _ => Ok(()),
    }
}

impl From<[u8; PAYLOAD_SIZE]> for Payload {
    fn from(bytes: [u8; PAYLOAD_SIZE]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Payload> for [u8; PAYLOAD_SIZE] {
    fn from(payload: Payload) -> Self {
        payload.buf
    }
}

impl TryFrom<&[u8]> for Payload {
    type Error = PayloadError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let buf: [u8; PAYLOAD_SIZE] = bytes.try_into().map_err(|_| PayloadError::InvalidLength {
            expected: PAYLOAD_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { buf })
    }
}

impl TryFrom<Bytes> for Payload {
    type Error = PayloadError;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_ref())
    }
}

impl From<Payload> for Bytes {
    fn from(payload: Payload) -> Self {
        Bytes::copy_from_slice(&payload.buf)
    }
}

impl TryFrom<&SensorReading> for Payload {
    type Error = PayloadError;

    fn try_from(reading: &SensorReading) -> Result<Self, Self::Error> {
        Self::try_from_reading(reading)
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({:02x?})", self.buf)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
