//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use sffa_lib::error::PayloadError;
#[allow(unused_imports)]
pub use sffa_lib::layout::{Field, PAYLOAD_SIZE};
#[allow(unused_imports)]
pub use sffa_lib::payload::Payload;
#[allow(unused_imports)]
pub use sffa_lib::reading::{GpsCoords, SensorReading};

use std::panic::{self, UnwindSafe};

/// Bit pattern used by the construction and equality tests
#[allow(dead_code)]
pub const TEST_ARRAY: [u8; PAYLOAD_SIZE] = [255, 127, 63, 31, 16, 8, 4, 2, 0, 0];

/// Payload with every field set through the strict setters
#[allow(dead_code)]
pub fn populated_payload() -> Payload {
    let mut payload = Payload::new();
    payload.set_version_control(2);
    payload.set_battery_ok(true);
    payload.set_temperature(100.0);
    payload.set_humidity(50.0);
    payload.set_gas_level(0.15);
    payload.set_gps_coordinates(GpsCoords::new(155.25, -129.798));
    payload
}

/// Payload holding a single non-zero byte at `index`
#[allow(dead_code)]
pub fn payload_with_byte(index: usize, value: u8) -> Payload {
    let mut bytes = [0u8; PAYLOAD_SIZE];
    bytes[index] = value;
    Payload::from_bytes(bytes)
}

/// Assert that `f` panics, reporting `description` otherwise
#[allow(dead_code)]
pub fn assert_panics<F: FnOnce() + UnwindSafe>(description: &str, f: F) {
    assert!(panic::catch_unwind(f).is_err(), "{}: expected a panic", description);
}

/// Assert that `actual` lies within `tolerance` of `expected`
#[allow(dead_code)]
pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}, difference {}",
        actual,
        tolerance,
        expected,
        (actual - expected).abs()
    );
}
