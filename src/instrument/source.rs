//! `SOURce` subsystem: frequency and voltage settings.

use scpi_proto::{Argument, Interpreter, Placement, Response};

use super::{command, format_value, no_arguments, single_argument, SharedInstrument};
use crate::config::Limits;
use crate::error::{HandlerError, HandlerResult};

pub(super) fn register(interp: &mut Interpreter<SharedInstrument>) {
    let root = interp.tree().root();
    let source = interp.register_keyword(root, Placement::Child, "SOURce", None);

    let frequency = interp.register_keyword(
        source,
        Placement::Child,
        "FREQuency",
        command(|instrument, args| {
            let limits = *instrument.frequency_limits();
            instrument.frequency = setting(single_argument(args)?, &limits, "Hz")?;
            Ok(Response::empty())
        }),
    );
    interp.register_keyword(
        frequency,
        Placement::Sibling,
        "FREQuency?",
        command(|instrument, args| {
            no_arguments(args)?;
            Ok(format_value(instrument.frequency()))
        }),
    );

    let voltage = interp.register_keyword(
        source,
        Placement::Child,
        "VOLTage",
        command(|instrument, args| {
            let limits = *instrument.voltage_limits();
            instrument.voltage = setting(single_argument(args)?, &limits, "V")?;
            Ok(Response::empty())
        }),
    );
    interp.register_keyword(
        voltage,
        Placement::Sibling,
        "VOLTage?",
        command(|instrument, args| {
            no_arguments(args)?;
            Ok(format_value(instrument.voltage()))
        }),
    );
}

/// Decode a numeric setting in `unit`, honouring `MIN`, `MAX` and `DEFAULT`.
fn setting(arg: Argument<'_>, limits: &Limits, unit: &str) -> HandlerResult<f64> {
    let text = arg.trimmed();
    if !is_numeric_data(text) {
        return Err(HandlerError::DataType(
            String::from_utf8_lossy(text).into_owned(),
        ));
    }

    let n = arg.numeric(limits.default, limits.min, limits.max);
    if !n.unit.is_empty() && !n.unit.eq_ignore_ascii_case(unit.as_bytes()) {
        return Err(HandlerError::InvalidSuffix(
            String::from_utf8_lossy(n.unit).into_owned(),
        ));
    }
    if !n.in_range(limits.min, limits.max) {
        return Err(HandlerError::DataOutOfRange {
            value: n.value,
            min: limits.min,
            max: limits.max,
        });
    }
    Ok(n.value)
}

/// Whether `text` opens like a decimal literal or a bound keyword.
fn is_numeric_data(text: &[u8]) -> bool {
    if [&b"MIN"[..], b"MAX", b"DEFAULT"]
        .iter()
        .any(|keyword| text.starts_with(keyword))
    {
        return true;
    }
    matches!(text.first(), Some(b'0'..=b'9' | b'+' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::tests::{run, session};

    #[test]
    fn test_frequency_round_trip() {
        let mut interp = session();
        assert_eq!(run(&mut interp, "SOUR:FREQ 10.5kHz"), "");
        assert_eq!(run(&mut interp, "SOUR:FREQ?"), "10500\n");
        assert_eq!(run(&mut interp, "source:frequency 2 MHZ;sour:freq?"), ";2000000\n");
    }

    #[test]
    fn test_voltage_prefixes() {
        let mut interp = session();
        assert_eq!(run(&mut interp, "SOUR:VOLT 2500mV;SOUR:VOLT?"), ";2.5\n");
        assert_eq!(run(&mut interp, "SOUR:VOLT 1.5;SOUR:VOLT?"), ";1.5\n");
        assert_eq!(run(&mut interp, "SYST:ERR?"), "No error\n");
    }

    #[test]
    fn test_bound_keywords() {
        let mut interp = session();
        assert_eq!(run(&mut interp, "SOUR:VOLT MAX;SOUR:VOLT?"), ";10\n");
        assert_eq!(run(&mut interp, "SOUR:VOLT MIN;SOUR:VOLT?"), ";0\n");
        assert_eq!(run(&mut interp, "SOUR:FREQ DEFAULT;SOUR:FREQ?"), ";1000\n");
    }

    #[test]
    fn test_setter_errors() {
        let mut interp = session();
        run(&mut interp, "SOUR:VOLT 11");
        run(&mut interp, "SOUR:VOLT");
        run(&mut interp, "SOUR:VOLT 1,2");
        run(&mut interp, "SOUR:VOLT high");
        run(&mut interp, "SOUR:VOLT 5 A");
        assert_eq!(
            run(
                &mut interp,
                "SYST:ERR?;SYST:ERR?;SYST:ERR?;SYST:ERR?;SYST:ERR?;SYST:ERR?"
            ),
            "Data out of range;Missing parameter;Parameter not allowed;\
             Data type error;Invalid suffix;No error\n"
        );
        assert_eq!(run(&mut interp, "SOUR:VOLT?"), "0\n");
    }

    #[test]
    fn test_zero_with_large_exponent_accepted() {
        let mut interp = session();
        run(&mut interp, "SOUR:VOLT 1");
        assert_eq!(
            run(&mut interp, "SOUR:VOLT 0e309;SYST:ERR?;SOUR:VOLT?"),
            ";No error;0\n"
        );
    }

    #[test]
    fn test_query_rejects_arguments() {
        let mut interp = session();
        assert_eq!(run(&mut interp, "SOUR:FREQ? 5"), "");
        assert_eq!(run(&mut interp, "SYST:ERR?"), "Parameter not allowed\n");
    }

    #[test]
    fn test_is_numeric_data() {
        assert!(is_numeric_data(b"42"));
        assert!(is_numeric_data(b"-1e3"));
        assert!(is_numeric_data(b"MAX"));
        assert!(is_numeric_data(b"DEFAULT"));
        assert!(!is_numeric_data(b"max"));
        assert!(!is_numeric_data(b"ON"));
        assert!(!is_numeric_data(b""));
    }
}
