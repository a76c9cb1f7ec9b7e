use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use sffa_lib::{Field, GpsCoords, Payload, SensorReading};
use tracing::{debug, info};

/// Field values for `sffa encode`. Omitted fields stay at their all-zero encoding.
#[derive(Args, Debug, Default)]
pub struct EncodeArgs {
    /// Version control tag (0-15).
    #[arg(long, default_value_t = 0)]
    pub version_control: u8,
    /// Mark the battery as OK.
    #[arg(long)]
    pub battery_ok: bool,
    /// Temperature in °C (-50.0 to 154.7).
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f32>,
    /// Relative humidity in percent (0.0 to 100.0).
    #[arg(long, allow_hyphen_values = true)]
    pub humidity: Option<f32>,
    /// Gas sensor output in volts (0.0 to 3.0).
    #[arg(long, allow_hyphen_values = true)]
    pub gas_level: Option<f32>,
    /// Latitude in degrees (-180.0 to 180.0).
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    pub latitude: Option<f64>,
    /// Longitude in degrees (-180.0 to 180.0).
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    pub longitude: Option<f64>,
    /// Print JSON instead of bare hex.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct EncodedPayload {
    hex: String,
    reading: SensorReading,
}

/// Build a payload from the command-line values. Uses the fallible setters so bad
/// input becomes an error message instead of a panic.
pub fn build_payload(args: &EncodeArgs) -> Result<Payload> {
    let mut payload = Payload::new();
    payload
        .try_set_version_control(args.version_control)
        .context("Invalid --version-control")?;
    payload.set_battery_ok(args.battery_ok);

    if let Some(temperature) = args.temperature {
        payload
            .try_set_temperature(temperature)
            .context("Invalid --temperature")?;
    }
    if let Some(humidity) = args.humidity {
        payload
            .try_set_humidity(humidity)
            .context("Invalid --humidity")?;
    }
    if let Some(gas_level) = args.gas_level {
        payload
            .try_set_gas_level(gas_level)
            .context("Invalid --gas-level")?;
    }
    if let (Some(latitude), Some(longitude)) = (args.latitude, args.longitude) {
        payload
            .try_set_gps_coordinates(GpsCoords::new(latitude, longitude))
            .context("Invalid GPS coordinates")?;
    }

    Ok(payload)
}

pub fn encode(args: &EncodeArgs) -> Result<()> {
    let payload = build_payload(args)?;
    info!(%payload, "Encoded payload");

    if args.json {
        let encoded = EncodedPayload {
            hex: payload.to_hex(),
            reading: payload.reading(),
        };
        println!("{}", serde_json::to_string_pretty(&encoded)?);
    } else {
        println!("{}", payload);
    }
    Ok(())
}

pub fn parse_payload(hex: &str) -> Result<Payload> {
    let payload =
        Payload::from_hex(hex).with_context(|| format!("Failed to parse payload {:?}", hex))?;
    debug!(bytes = ?payload.as_bytes(), "Parsed payload");
    Ok(payload)
}

pub fn decode(hex: &str, json: bool) -> Result<()> {
    let reading = parse_payload(hex)?.reading();

    if json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!("{}", reading);
    }
    Ok(())
}

pub fn inspect(hex: &str) -> Result<()> {
    let payload = parse_payload(hex)?;

    println!("Payload: {}", payload);
    println!("{:<12} {:<22} {:>9}  {}", "FIELD", "BITS", "RAW", "VALUE");
    for field in Field::ALL {
        println!(
            "{:<12} {:<22} {:>9}  {}",
            field.to_string(),
            field.layout().to_string(),
            payload.raw_field(field),
            describe(&payload, field)
        );
    }
    Ok(())
}

/// Decoded value of a single field, formatted for display
pub fn describe(payload: &Payload, field: Field) -> String {
    match field {
        Field::Version => payload.version_control().to_string(),
        Field::BatteryOk => (if payload.battery_ok() { "OK" } else { "BAD" }).to_string(),
        Field::Reserved => format!("{:#05b}", payload.raw_field(Field::Reserved)),
        Field::Temperature => format!("{:.1} °C", payload.temperature()),
        Field::Humidity => format!("{:.2} %", payload.humidity()),
        Field::GasLevel => format!("{:.3} V", payload.gas_level()),
        Field::Latitude => format!("{:.4}°", payload.gps_coordinates().latitude),
        Field::Longitude => format!("{:.4}°", payload.gps_coordinates().longitude),
    }
}
