//! Compound duration strings (`90s`, `1m30s`, `1h2m3.5s`, `250ms`).
//!
//! The grammar is a sequence of decimal numbers, each with an optional
//! fraction and a mandatory unit suffix, optionally preceded by a sign:
//! `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m`, `h`. The bare string `0` is
//! also accepted. Values are limited to what fits in an `i64` nanosecond
//! count.

use chrono::Duration;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Errors produced while parsing a duration string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration {input:?}")]
    Invalid { input: String },

    #[error("missing unit in duration {input:?}")]
    MissingUnit { input: String },

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse a compound duration string.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid {
        input: input.to_string(),
    };

    let (negative, mut s) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if s == "0" {
        return Ok(Duration::zero());
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !(s.starts_with('.') || s.as_bytes()[0].is_ascii_digit()) {
            return Err(invalid());
        }

        let int_len = leading_digits(s);
        let (int_digits, rest) = s.split_at(int_len);
        s = rest;

        let mut frac_digits = "";
        if let Some(rest) = s.strip_prefix('.') {
            let frac_len = leading_digits(rest);
            frac_digits = &rest[..frac_len];
            s = &rest[frac_len..];
        }

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        let unit = &s[..unit_len];
        s = &s[unit_len..];

        if unit.is_empty() {
            return Err(DurationError::MissingUnit {
                input: input.to_string(),
            });
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let mut whole: u64 = 0;
        for digit in int_digits.bytes() {
            whole = whole
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit - b'0')))
                .ok_or_else(invalid)?;
        }
        let mut value = whole.checked_mul(scale).ok_or_else(invalid)?;

        if !frac_digits.is_empty() {
            // Digits past what a u64 can hold are below nanosecond precision.
            let mut frac: u64 = 0;
            let mut frac_scale: f64 = 1.0;
            for digit in frac_digits.bytes() {
                if frac > (u64::MAX - 9) / 10 {
                    break;
                }
                frac = frac * 10 + u64::from(digit - b'0');
                frac_scale *= 10.0;
            }
            let frac_nanos = (frac as f64 * (scale as f64 / frac_scale)) as u64;
            value = value.checked_add(frac_nanos).ok_or_else(invalid)?;
        }

        total = total.checked_add(value).ok_or_else(invalid)?;
        if total > 1u64 << 63 {
            return Err(invalid());
        }
    }

    let signed = if negative {
        -i128::from(total)
    } else {
        i128::from(total)
    };
    let nanos = i64::try_from(signed).map_err(|_| invalid())?;
    Ok(Duration::nanoseconds(nanos))
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Render a duration in the compound form accepted by [`parse_duration`].
///
/// Sub-second values use the largest fitting unit (`1.5ms`, `250µs`, `7ns`);
/// everything else is hours/minutes/seconds with a trimmed fraction
/// (`1h0m0s`, `1m30.25s`). Zero is `0s`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.num_nanoseconds().unwrap_or(if duration < Duration::zero() {
        i64::MIN
    } else {
        i64::MAX
    });
    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();

    if abs < NANOS_PER_SEC {
        if abs == 0 {
            return "0s".to_string();
        }
        let (precision, unit) = if abs < 1_000 {
            (0, "ns")
        } else if abs < 1_000_000 {
            (3, "\u{00b5}s")
        } else {
            (6, "ms")
        };
        let (whole, frac) = split_fraction(abs, precision);
        return format!("{sign}{whole}{frac}{unit}");
    }

    let (secs, frac) = split_fraction(abs, 9);
    let mut out = format!("{}{frac}s", secs % 60);
    let mins = secs / 60;
    if mins > 0 {
        out = format!("{}m{out}", mins % 60);
        let hours = mins / 60;
        if hours > 0 {
            out = format!("{hours}h{out}");
        }
    }
    format!("{sign}{out}")
}

/// Split `value` into its integer part and a `.ddd` fraction with
/// `precision` decimal places, trailing zeros removed.
fn split_fraction(value: u64, precision: u32) -> (u64, String) {
    let pow = 10u64.pow(precision);
    let frac = value % pow;
    if frac == 0 {
        return (value / pow, String::new());
    }
    let digits = format!("{frac:0width$}", width = precision as usize);
    (value / pow, format!(".{}", digits.trim_end_matches('0')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(s: i64) -> Duration {
        Duration::seconds(s)
    }

    #[test]
    fn test_parse_simple_units() {
        assert_eq!(parse_duration("90s").unwrap(), secs(90));
        assert_eq!(parse_duration("2m").unwrap(), secs(120));
        assert_eq!(parse_duration("1h").unwrap(), secs(3600));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::milliseconds(250));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::nanoseconds(7));
        assert_eq!(parse_duration("3us").unwrap(), Duration::microseconds(3));
        assert_eq!(parse_duration("3µs").unwrap(), Duration::microseconds(3));
        assert_eq!(parse_duration("3μs").unwrap(), Duration::microseconds(3));
    }

    #[test]
    fn test_parse_compound_and_fraction() {
        assert_eq!(parse_duration("1h2m3s").unwrap(), secs(3723));
        assert_eq!(parse_duration("1m30s").unwrap(), secs(90));
        assert_eq!(
            parse_duration("1.5s").unwrap(),
            Duration::milliseconds(1500)
        );
        assert_eq!(parse_duration(".5m").unwrap(), secs(30));
        assert_eq!(parse_duration("2.s").unwrap(), secs(2));
        assert_eq!(parse_duration("1h0.5m").unwrap(), secs(3630));
    }

    #[test]
    fn test_parse_zero_and_sign() {
        assert_eq!(parse_duration("0").unwrap(), Duration::zero());
        assert_eq!(parse_duration("-0").unwrap(), Duration::zero());
        assert_eq!(parse_duration("0s").unwrap(), Duration::zero());
        assert_eq!(parse_duration("+5s").unwrap(), secs(5));
        assert_eq!(parse_duration("-5s").unwrap(), secs(-5));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_duration(""),
            Err(DurationError::Invalid { .. })
        ));
        assert!(matches!(
            parse_duration("-"),
            Err(DurationError::Invalid { .. })
        ));
        assert!(matches!(
            parse_duration("s"),
            Err(DurationError::Invalid { .. })
        ));
        assert!(matches!(
            parse_duration(".s"),
            Err(DurationError::Invalid { .. })
        ));
        assert!(matches!(
            parse_duration("10"),
            Err(DurationError::MissingUnit { .. })
        ));
        assert!(matches!(
            parse_duration("1m30"),
            Err(DurationError::MissingUnit { .. })
        ));
        assert_eq!(
            parse_duration("3d"),
            Err(DurationError::UnknownUnit {
                unit: "d".into(),
                input: "3d".into()
            })
        );
        assert!(matches!(
            parse_duration("1:30"),
            Err(DurationError::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_duration(" 5s"),
            Err(DurationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_parse_overflow() {
        assert!(parse_duration("9223372036854775807ns").is_ok());
        assert!(parse_duration("9223372036854775808ns").is_err());
        assert!(parse_duration("-9223372036854775808ns").is_ok());
        assert!(parse_duration("3000000h").is_err());
    }

    #[test]
    fn test_format_matches_compound_form() {
        assert_eq!(format_duration(Duration::zero()), "0s");
        assert_eq!(format_duration(secs(70)), "1m10s");
        assert_eq!(format_duration(secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::milliseconds(1500)), "1.5s");
        assert_eq!(format_duration(Duration::milliseconds(1)), "1ms");
        assert_eq!(format_duration(Duration::microseconds(1500)), "1.5ms");
        assert_eq!(format_duration(Duration::nanoseconds(1500)), "1.5µs");
        assert_eq!(format_duration(Duration::nanoseconds(7)), "7ns");
        assert_eq!(format_duration(secs(-90)), "-1m30s");
    }

    #[test]
    fn test_whole_second_truncation() {
        assert_eq!(parse_duration("10.9s").unwrap().num_seconds(), 10);
        assert_eq!(parse_duration("-10.9s").unwrap().num_seconds(), -10);
    }

    proptest! {
        #[test]
        fn prop_format_then_parse_is_identity(nanos in any::<i64>()) {
            let d = Duration::nanoseconds(nanos);
            prop_assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }

        #[test]
        fn prop_whole_seconds_survive_round_trip(s in 0i64..1_000_000) {
            let d = parse_duration(&format!("{s}s")).unwrap();
            prop_assert_eq!(d.num_seconds(), s);
            prop_assert_eq!(parse_duration(&format_duration(d)).unwrap().num_seconds(), s);
        }
    }
}
