//! Instrument identity and setting limits.

use serde::Deserialize;

/// Bounds and reset value of a numeric setting.
///
/// `min` and `max` are also what the `MIN` and `MAX` keywords select.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl Limits {
    /// Whether `value` lies within `min..=max`.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The simulated instrument served over every connection.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentConfig {
    /// First `*IDN?` field.
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    /// Second `*IDN?` field.
    #[serde(default = "default_model")]
    pub model: String,
    /// Third `*IDN?` field.
    #[serde(default = "default_serial")]
    pub serial: String,
    /// Fourth `*IDN?` field.
    #[serde(default = "default_firmware")]
    pub firmware: String,
    /// Source frequency in Hz.
    #[serde(default = "default_frequency")]
    pub frequency: Limits,
    /// Source voltage in V.
    #[serde(default = "default_voltage")]
    pub voltage: Limits,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            manufacturer: default_manufacturer(),
            model: default_model(),
            serial: default_serial(),
            firmware: default_firmware(),
            frequency: default_frequency(),
            voltage: default_voltage(),
        }
    }
}

impl InstrumentConfig {
    /// The `*IDN?` reply.
    pub fn identity(&self) -> String {
        format!(
            "{},{},{},{}",
            self.manufacturer, self.model, self.serial, self.firmware
        )
    }
}

fn default_manufacturer() -> String {
    "Straylight".to_string()
}

fn default_model() -> String {
    "SCPI Simulator".to_string()
}

fn default_serial() -> String {
    "0".to_string()
}

fn default_firmware() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_frequency() -> Limits {
    Limits {
        min: 1.0,
        max: 20e6,
        default: 1e3,
    }
}

fn default_voltage() -> Limits {
    Limits {
        min: 0.0,
        max: 10.0,
        default: 0.0,
    }
}
