use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GpsCoords {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoords {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<(f64, f64)> for GpsCoords {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for GpsCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Every field of a payload decoded into engineering units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub version_control: u8,
    pub battery_ok: bool,
    pub temperature_c: f32, // °C
    pub humidity_pct: f32,  // percent
    pub gas_level_v: f32,   // V DC
    pub gps: GpsCoords,     // degrees
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Version: {}, Battery: {}, Temp: {:.1} °C, Humidity: {:.2} %, Gas: {:.3} V, GPS: {}",
            self.version_control,
            if self.battery_ok { "OK" } else { "BAD" },
            self.temperature_c,
            self.humidity_pct,
            self.gas_level_v,
            self.gps
        )
    }
}
