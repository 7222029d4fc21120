//! The simulated instrument and its SCPI command set.
//!
//! One [`Instrument`] is shared by every connection; each connection builds
//! its own interpreter (and so its own error queue) on top of it with
//! [`build_interpreter`]:
//!
//! ```text
//! *IDN?  *RST  *CLS
//! SOURce:FREQuency <n> | SOURce:FREQuency?
//! SOURce:VOLTage <n>   | SOURce:VOLTage?
//! OUTPut <ON|OFF|1|0>  | OUTPut?
//! SYSTem:ERRor[:NEXT]?
//! ```

mod common;
mod output;
mod source;

use std::sync::Arc;

use parking_lot::Mutex;
use scpi_proto::{
    endpoint, Arguments, Context, HandlerRef, Interpreter, InterpreterOptions, Response,
};
use tracing::debug;

use crate::config::{InstrumentConfig, Limits};
use crate::error::{HandlerError, HandlerResult};

/// Instrument state shared across sessions.
pub type SharedInstrument = Arc<Mutex<Instrument>>;

/// Settings of the simulated signal source.
#[derive(Debug)]
pub struct Instrument {
    config: InstrumentConfig,
    frequency: f64,
    voltage: f64,
    output: bool,
}

impl Instrument {
    /// Create an instrument in its reset state.
    pub fn new(config: InstrumentConfig) -> Self {
        Self {
            frequency: config.frequency.default,
            voltage: config.voltage.default,
            output: false,
            config,
        }
    }

    /// Wrap in a shareable handle.
    pub fn shared(self) -> SharedInstrument {
        Arc::new(Mutex::new(self))
    }

    /// Restore every setting to its configured default.
    pub fn reset(&mut self) {
        self.frequency = self.config.frequency.default;
        self.voltage = self.config.voltage.default;
        self.output = false;
    }

    /// The `*IDN?` reply.
    pub fn identity(&self) -> String {
        self.config.identity()
    }

    /// Current source frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Configured frequency bounds.
    pub fn frequency_limits(&self) -> &Limits {
        &self.config.frequency
    }

    /// Current source voltage in V.
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Configured voltage bounds.
    pub fn voltage_limits(&self) -> &Limits {
        &self.config.voltage
    }

    /// Whether the output is switched on.
    pub fn output(&self) -> bool {
        self.output
    }
}

/// Build a session interpreter serving `instrument`.
pub fn build_interpreter(
    instrument: SharedInstrument,
    options: InterpreterOptions,
) -> Interpreter<SharedInstrument> {
    let mut interp = Interpreter::with_options(instrument, options);
    common::register(&mut interp);
    source::register(&mut interp);
    output::register(&mut interp);
    interp
}

/// Wrap an instrument operation as a handler.
///
/// The instrument is locked for the duration of `f`. A rejected command
/// queues its error record and answers with an empty response.
fn command<F>(f: F) -> Option<HandlerRef<SharedInstrument>>
where
    F: Fn(&mut Instrument, &Arguments<'_>) -> HandlerResult<Response> + Send + Sync + 'static,
{
    endpoint(
        move |ctx: &mut Context<SharedInstrument>, args: &Arguments<'_>| {
            let result = f(&mut ctx.state.lock(), args);
            match result {
                Ok(response) => Some(response),
                Err(e) => {
                    debug!(code = e.error_code(), error = %e, "Command rejected");
                    ctx.report(e.to_error_record());
                    Some(Response::empty())
                }
            }
        },
    )
}

/// Require that a command received no arguments.
fn no_arguments(args: &Arguments<'_>) -> HandlerResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(HandlerError::ParameterNotAllowed {
            expected: 0,
            actual: args.len(),
        })
    }
}

/// Require exactly one argument and return it.
fn single_argument<'a>(args: &Arguments<'a>) -> HandlerResult<scpi_proto::Argument<'a>> {
    match args.len() {
        0 => Err(HandlerError::MissingParameter),
        1 => args.get(0).ok_or(HandlerError::MissingParameter),
        actual => Err(HandlerError::ParameterNotAllowed {
            expected: 1,
            actual,
        }),
    }
}

/// Format a numeric setting for a query reply.
fn format_value(value: f64) -> Response {
    Response::text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn session() -> Interpreter<SharedInstrument> {
        let instrument = Instrument::new(InstrumentConfig {
            manufacturer: "ACME".to_string(),
            model: "Sim".to_string(),
            serial: "7".to_string(),
            firmware: "1.0".to_string(),
            ..Default::default()
        })
        .shared();
        build_interpreter(instrument, InterpreterOptions::default())
    }

    pub(super) fn run(interp: &mut Interpreter<SharedInstrument>, line: &str) -> String {
        let mut out = Vec::new();
        interp.execute(line.as_bytes(), |b| out.extend_from_slice(b), b'\n');
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_registered_paths() {
        let interp = session();
        let paths = interp.tree().paths();
        for expected in [
            "*IDN?",
            "*RST",
            "*CLS",
            "SOURCE:FREQUENCY",
            "SOURCE:FREQUENCY?",
            "SOURCE:VOLTAGE",
            "SOURCE:VOLTAGE?",
            "OUTPUT",
            "OUTPUT?",
            "SYSTEM:ERROR?",
            "SYSTEM:ERROR:NEXT?",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_sessions_share_instrument() {
        let instrument = Instrument::new(InstrumentConfig::default()).shared();
        let mut a = build_interpreter(Arc::clone(&instrument), InterpreterOptions::default());
        let mut b = build_interpreter(Arc::clone(&instrument), InterpreterOptions::default());

        assert_eq!(run(&mut a, "SOUR:VOLT 2.5;OUTP ON"), "");
        assert_eq!(run(&mut b, "SOUR:VOLT?;OUTP?"), "2.5;1\n");
        assert_eq!(instrument.lock().voltage(), 2.5);
    }

    #[test]
    fn test_sessions_have_own_error_queues() {
        let instrument = Instrument::new(InstrumentConfig::default()).shared();
        let mut a = build_interpreter(Arc::clone(&instrument), InterpreterOptions::default());
        let mut b = build_interpreter(instrument, InterpreterOptions::default());

        run(&mut a, "SOUR:VOLT 99");
        assert_eq!(run(&mut b, "SYST:ERR?"), "No error\n");
        assert_eq!(run(&mut a, "SYST:ERR?"), "Data out of range\n");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut instrument = Instrument::new(InstrumentConfig::default());
        instrument.frequency = 5.0;
        instrument.voltage = 3.0;
        instrument.output = true;
        instrument.reset();
        assert_eq!(instrument.frequency(), instrument.frequency_limits().default);
        assert_eq!(instrument.voltage(), instrument.voltage_limits().default);
        assert!(!instrument.output());
    }
}
