pub mod error;
pub mod layout;
pub mod payload;
pub mod reading;


// Re-export the core types for easy access
pub use error::PayloadError;
pub use layout::{Field, PAYLOAD_SIZE};
pub use payload::Payload;
pub use reading::{GpsCoords, SensorReading};
