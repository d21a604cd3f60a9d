//! Synthetic sensor readings.
//!
//! Each reading is four independent uniform draws plus a UTC timestamp.
//! There is deliberately no continuity between consecutive readings for the
//! same location; this is a pipeline exerciser, not a physical model.

use rand::Rng;
use serde::Serialize;
use time::OffsetDateTime;

/// Ice thickness range in centimeters.
pub const ICE_THICKNESS_CM: (f64, f64) = (20.0, 40.0);
/// Ice surface temperature range in degrees Celsius.
pub const SURFACE_TEMP_C: (f64, f64) = (-10.0, 1.0);
/// Snow accumulation range in centimeters.
pub const SNOW_ACCUMULATION_CM: (f64, f64) = (0.0, 10.0);
/// Ambient air temperature range in degrees Celsius.
pub const EXTERNAL_TEMP_C: (f64, f64) = (-20.0, 5.0);

/// One fabricated measurement for a monitoring location.
///
/// Serializes to the exact JSON shape the ingestion side expects:
///
/// ```json
/// {
///   "location": "Dow's Lake",
///   "iceThicknessCm": 27.3,
///   "surfaceTempC": -4.1,
///   "snowAccumulationCm": 2.0,
///   "externalTempC": -12.6,
///   "timestamp": "2026-01-17T14:05:33.201Z"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub location: String,
    pub ice_thickness_cm: f64,
    pub surface_temp_c: f64,
    pub snow_accumulation_cm: f64,
    pub external_temp_c: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl SensorReading {
    /// Generates a random reading for the given location.
    ///
    /// Each field is drawn independently and rounded to one decimal place;
    /// the timestamp is the wall-clock UTC instant of the call. Not seeded
    /// and not cryptographic.
    pub fn generate(location: &str) -> Self {
        let mut rng = rand::rng();

        Self {
            location: location.to_string(),
            ice_thickness_cm: round1(rng.random_range(ICE_THICKNESS_CM.0..=ICE_THICKNESS_CM.1)),
            surface_temp_c: round1(rng.random_range(SURFACE_TEMP_C.0..=SURFACE_TEMP_C.1)),
            snow_accumulation_cm: round1(
                rng.random_range(SNOW_ACCUMULATION_CM.0..=SNOW_ACCUMULATION_CM.1),
            ),
            external_temp_c: round1(rng.random_range(EXTERNAL_TEMP_C.0..=EXTERNAL_TEMP_C.1)),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
