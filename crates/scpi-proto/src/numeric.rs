//! Numeric program data decoding.
//!
//! Decodes decimal numeric values with an optional exponent, a single SI
//! magnitude prefix and a unit name, in one forward pass:
//!
//! ```text
//! [ws] [+|-] digits [. digits] [e [+|-] digits] [ws] [prefix] [unit]
//! ```
//!
//! The keywords `DEFAULT`, `MAX` and `MIN` (case-sensitive) select the
//! caller's bounds instead. Decoding never fails: malformed input yields
//! whatever was accumulated before the decoder gave up, so callers should
//! range-check the value against their own limits.
//!
//! # Example
//!
//! ```
//! use scpi_proto::numeric::parse_numeric;
//!
//! let n = parse_numeric(b"10.5kHz", 1.0, 0.0, 1e9);
//! assert_eq!(n.value, 10_500.0);
//! assert_eq!(n.unit, b"Hz");
//! ```

/// Largest exponent magnitude applied; beyond this an `f64` is already
/// infinite or zero.
const MAX_EXPONENT: i32 = 400;

/// A decoded numeric argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric<'a> {
    /// Decoded value, with exponent and magnitude prefix applied.
    pub value: f64,
    /// Unit name following the value; empty when none was given.
    pub unit: &'a [u8],
}

impl<'a> Numeric<'a> {
    /// The unit as text, if it is valid UTF-8.
    pub fn unit_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.unit).ok()
    }

    /// Whether the value lies within `min..=max`.
    pub fn in_range(&self, min: f64, max: f64) -> bool {
        (min..=max).contains(&self.value)
    }
}

/// Decoder states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Leading whitespace, keywords, sign or first digit.
    Start,
    /// A `+` or `-` was seen.
    Sign,
    /// Integer digits.
    Mantissa,
    /// Digits after the decimal point.
    Fraction,
    /// After `e`: optional exponent sign.
    ExponentSign,
    /// Exponent digits.
    ExponentDigits,
    /// Whitespace between the number and its suffix.
    Gap,
    /// Optional SI magnitude prefix.
    Prefix,
    /// Unit letters.
    Unit,
    /// Unit complete; remaining bytes are ignored.
    Done,
    /// Unparseable input; remaining bytes are ignored.
    Invalid,
}

/// Power-of-ten shift for an SI magnitude prefix letter.
///
/// `c`, `d`, `D` and `C` are the centi/deci/deka/hecto exceptions to the
/// power-of-1000 progression.
pub fn si_prefix_exponent(prefix: u8) -> Option<i32> {
    let exponent = match prefix {
        b'y' => -24,
        b'z' => -21,
        b'a' => -18,
        b'f' => -15,
        b'p' => -12,
        b'n' => -9,
        b'u' => -6,
        b'm' => -3,
        b'c' => -2,
        b'd' => -1,
        b'D' => 1,
        b'C' => 2,
        b'k' => 3,
        b'M' => 6,
        b'G' => 9,
        b'T' => 12,
        b'P' => 15,
        b'E' => 18,
        b'Z' => 21,
        b'Y' => 24,
        _ => return None,
    };
    Some(exponent)
}

/// Accumulated parts of a decimal literal.
#[derive(Debug, Default)]
struct Accumulator {
    negative: bool,
    mantissa: f64,
    fraction_digits: i32,
    exponent_negative: bool,
    exponent: i32,
    prefix: i32,
    unit_start: Option<usize>,
    unit_end: Option<usize>,
}

impl Accumulator {
    fn push_mantissa_digit(&mut self, b: u8) {
        self.mantissa = 10.0 * self.mantissa + f64::from(b - b'0');
    }

    fn push_exponent_digit(&mut self, b: u8) {
        self.exponent = self
            .exponent
            .saturating_mul(10)
            .saturating_add(i32::from(b - b'0'));
    }

    /// Combine mantissa and exponents by repeated scaling by ten.
    fn value(&self) -> f64 {
        let exponent = if self.exponent_negative {
            -self.exponent
        } else {
            self.exponent
        };
        let shift = exponent
            .saturating_sub(self.fraction_digits)
            .saturating_add(self.prefix)
            .clamp(-MAX_EXPONENT, MAX_EXPONENT);

        let mut multiplier = 1.0_f64;
        for _ in 0..shift.unsigned_abs() {
            multiplier *= 10.0;
            if multiplier.is_infinite() {
                break;
            }
        }

        // Zero stays zero at any scale; 0 * inf would be NaN.
        let magnitude = if self.mantissa == 0.0 {
            0.0
        } else if shift > 0 {
            self.mantissa * multiplier
        } else {
            self.mantissa / multiplier
        };

        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Match a bound keyword at the start of `rest`.
fn keyword<'a>(rest: &[u8], default: f64, min: f64, max: f64) -> Option<Numeric<'a>> {
    let value = if rest.starts_with(b"DEFAULT") {
        default
    } else if rest.starts_with(b"MAX") {
        max
    } else if rest.starts_with(b"MIN") {
        min
    } else {
        return None;
    };
    Some(Numeric { value, unit: &[] })
}

/// Decode a numeric argument.
///
/// `default`, `min` and `max` are returned for the `DEFAULT`, `MIN` and
/// `MAX` keywords; they are not used to clamp ordinary values.
pub fn parse_numeric(input: &[u8], default: f64, min: f64, max: f64) -> Numeric<'_> {
    let mut state = State::Start;
    let mut acc = Accumulator::default();

    for (i, &b) in input.iter().enumerate() {
        // Each pass either consumes `b` (`continue`) or moves to a state
        // that re-examines it.
        loop {
            match state {
                State::Start => {
                    if b.is_ascii_whitespace() {
                        break;
                    }
                    if let Some(bound) = keyword(&input[i..], default, min, max) {
                        return bound;
                    }
                    state = match b {
                        b'+' | b'-' => State::Sign,
                        b'0'..=b'9' => State::Mantissa,
                        _ => State::Invalid,
                    };
                    if state == State::Invalid {
                        break;
                    }
                }
                State::Sign => {
                    acc.negative = b == b'-';
                    state = State::Mantissa;
                    break;
                }
                State::Mantissa | State::Fraction => match b {
                    b'0'..=b'9' => {
                        acc.push_mantissa_digit(b);
                        if state == State::Fraction {
                            acc.fraction_digits += 1;
                        }
                        break;
                    }
                    b'.' => {
                        state = State::Fraction;
                        break;
                    }
                    b'e' => {
                        state = State::ExponentSign;
                        break;
                    }
                    _ => state = State::Gap,
                },
                State::ExponentSign => match b {
                    b'+' => break,
                    b'-' => {
                        acc.exponent_negative = true;
                        break;
                    }
                    b'0'..=b'9' => state = State::ExponentDigits,
                    _ => {
                        state = State::Invalid;
                        break;
                    }
                },
                State::ExponentDigits => {
                    if b.is_ascii_digit() {
                        acc.push_exponent_digit(b);
                        break;
                    }
                    state = State::Gap;
                }
                State::Gap => {
                    if b.is_ascii_whitespace() {
                        break;
                    }
                    state = State::Prefix;
                }
                State::Prefix => {
                    if let Some(shift) = si_prefix_exponent(b) {
                        acc.prefix = shift;
                        state = State::Unit;
                        break;
                    }
                    if b.is_ascii_uppercase() {
                        state = State::Unit;
                    } else {
                        state = State::Invalid;
                        break;
                    }
                }
                State::Unit => {
                    if b.is_ascii_alphabetic() {
                        acc.unit_start.get_or_insert(i);
                    } else {
                        if acc.unit_start.is_some() {
                            acc.unit_end = Some(i);
                        }
                        state = State::Done;
                    }
                    break;
                }
                State::Done | State::Invalid => break,
            }
        }
    }

    let unit = match acc.unit_start {
        Some(start) => &input[start..acc.unit_end.unwrap_or(input.len())],
        None => &[],
    };

    Numeric {
        value: acc.value(),
        unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> (f64, String) {
        let n = parse_numeric(s.as_bytes(), 5.0, -10.0, 99.0);
        (n.value, String::from_utf8_lossy(n.unit).into_owned())
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(decode("42"), (42.0, String::new()));
        assert_eq!(decode("+7"), (7.0, String::new()));
        assert_eq!(decode("-3"), (-3.0, String::new()));
        assert_eq!(decode("0.25"), (0.25, String::new()));
        assert_eq!(decode("   12"), (12.0, String::new()));
    }

    #[test]
    fn test_prefix_and_unit() {
        assert_eq!(decode("10.5kHz"), (10_500.0, "Hz".to_string()));
        assert_eq!(decode("3 MHz"), (3_000_000.0, "Hz".to_string()));
        assert_eq!(decode("5V"), (5.0, "V".to_string()));
        assert_eq!(decode("250mV"), (0.25, "V".to_string()));
        assert_eq!(decode("2 k"), (2000.0, String::new()));
    }

    #[test]
    fn test_exponent() {
        assert_eq!(decode("-2.5e-3"), (-0.0025, String::new()));
        assert_eq!(decode("1e3"), (1000.0, String::new()));
        assert_eq!(decode("1.5e+2"), (150.0, String::new()));
        assert_eq!(decode("4e"), (4.0, String::new()));
    }

    #[test]
    fn test_exponent_sign_does_not_flip_prefix() {
        // 1e-3 scaled by kilo is 1
        assert_eq!(decode("1e-3k").0, 1.0);
        assert_eq!(decode("2e-6 MHz"), (2.0, "Hz".to_string()));
    }

    #[test]
    fn test_centi_deci_deka_hecto() {
        assert_eq!(decode("5c").0, 0.05);
        assert_eq!(decode("5d").0, 0.5);
        assert_eq!(decode("5D").0, 50.0);
        assert_eq!(decode("5C").0, 500.0);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(decode("MAX"), (99.0, String::new()));
        assert_eq!(decode("MIN"), (-10.0, String::new()));
        assert_eq!(decode("DEFAULT"), (5.0, String::new()));
        assert_eq!(decode("  MAXimum"), (99.0, String::new()));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(decode("max"), (0.0, String::new()));
        assert_eq!(decode("Default"), (0.0, String::new()));
    }

    #[test]
    fn test_unit_stops_at_non_letter() {
        assert_eq!(decode("10 Hz "), (10.0, "Hz".to_string()));
        assert_eq!(decode("10kHz,junk"), (10_000.0, "Hz".to_string()));
    }

    #[test]
    fn test_lowercase_non_prefix_is_invalid() {
        // 's' is not a magnitude prefix and units must start uppercase
        assert_eq!(decode("3s"), (3.0, String::new()));
    }

    #[test]
    fn test_malformed_input_degrades() {
        assert_eq!(decode(""), (0.0, String::new()));
        assert_eq!(decode("abc"), (0.0, String::new()));
        assert_eq!(decode(".5"), (0.0, String::new()));
        assert_eq!(decode("12x34"), (12.0, String::new()));
        assert_eq!(decode("1e?"), (1.0, String::new()));
    }

    #[test]
    fn test_exponent_is_bounded() {
        assert_eq!(decode("1e999999999999").0, f64::INFINITY);
        assert_eq!(decode("1e-999999999999").0, 0.0);
        assert_eq!(decode("1e400").0, f64::INFINITY);
    }

    #[test]
    fn test_zero_with_huge_exponent() {
        assert_eq!(decode("0e309"), (0.0, String::new()));
        assert_eq!(decode("0e400"), (0.0, String::new()));
        assert_eq!(decode("0.0e999"), (0.0, String::new()));
        assert_eq!(decode("0e-999"), (0.0, String::new()));

        let n = parse_numeric(b"0e309", 1.0, 0.0, 10.0);
        assert!(n.in_range(0.0, 10.0));
        assert_eq!(decode("-0e400").0, 0.0);
    }

    #[test]
    fn test_si_prefix_table() {
        assert_eq!(si_prefix_exponent(b'y'), Some(-24));
        assert_eq!(si_prefix_exponent(b'u'), Some(-6));
        assert_eq!(si_prefix_exponent(b'k'), Some(3));
        assert_eq!(si_prefix_exponent(b'Y'), Some(24));
        assert_eq!(si_prefix_exponent(b'K'), None);
        assert_eq!(si_prefix_exponent(b'h'), None);
    }

    #[test]
    fn test_in_range() {
        let n = parse_numeric(b"50", 0.0, 0.0, 100.0);
        assert!(n.in_range(0.0, 100.0));
        assert!(!n.in_range(60.0, 100.0));
        assert_eq!(n.unit_str(), Some(""));
    }
}
