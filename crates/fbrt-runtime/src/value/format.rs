//! IEC 61131-3 literal formatting for [`AnyValue`].

use std::fmt::{self, Write as _};

use crate::datetime::{split_date_time, split_time_of_day};

use super::{AnyValue, Duration};

impl fmt::Display for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => f.write_str(if *v { "TRUE" } else { "FALSE" }),
            Self::SInt(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::DInt(v) => write!(f, "{v}"),
            Self::LInt(v) => write!(f, "{v}"),
            Self::USInt(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::UDInt(v) => write!(f, "{v}"),
            Self::ULInt(v) => write!(f, "{v}"),
            Self::Real(v) => write_real(f, &v.to_string()),
            Self::LReal(v) => write_real(f, &v.to_string()),
            Self::Byte(v) => write!(f, "16#{v:X}"),
            Self::Word(v) => write!(f, "16#{v:X}"),
            Self::DWord(v) => write!(f, "16#{v:X}"),
            Self::LWord(v) => write!(f, "16#{v:X}"),
            Self::Time(d) => write_duration(f, "T#", *d),
            Self::LTime(d) => write_duration(f, "LT#", *d),
            Self::Date(v) => write_date(f, "D#", v.nanos()),
            Self::LDate(v) => write_date(f, "LD#", v.nanos()),
            Self::Tod(v) => {
                f.write_str("TOD#")?;
                write_time_of_day(f, v.nanos())
            }
            Self::LTod(v) => {
                f.write_str("LTOD#")?;
                write_time_of_day(f, v.nanos())
            }
            Self::Dt(v) => write_date_time(f, "DT#", v.nanos()),
            Self::Ldt(v) => write_date_time(f, "LDT#", v.nanos()),
            Self::String(s) => write_quoted(f, s.chars(), '\'', false),
            Self::WString(s) => write_quoted(f, s.chars(), '"', true),
            Self::Char(c) => write_quoted(f, std::iter::once(char::from(*c)), '\'', false),
            Self::WChar(c) => match char::from_u32(u32::from(*c)) {
                Some(ch) => write_quoted(f, std::iter::once(ch), '"', true),
                None => write!(f, "\"${c:04X}\""),
            },
            Self::Array(array) => {
                f.write_char('[')?;
                for (idx, element) in array.elements.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_char(']')
            }
            Self::Struct(value) => {
                f.write_char('(')?;
                for (idx, (name, member)) in value.fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{name}:={member}")?;
                }
                f.write_char(')')
            }
        }
    }
}

fn write_real(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str(text)?;
    if text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E' | b'i' | b'N')) {
        Ok(())
    } else {
        f.write_str(".0")
    }
}

fn write_duration(f: &mut fmt::Formatter<'_>, prefix: &str, duration: Duration) -> fmt::Result {
    f.write_str(prefix)?;
    let nanos = i128::from(duration.as_nanos());
    if nanos == 0 {
        return f.write_str("0s");
    }
    if nanos < 0 {
        f.write_char('-')?;
    }
    let mut rest = nanos.abs();
    for (unit, per) in [
        ("d", 86_400_000_000_000i128),
        ("h", 3_600_000_000_000),
        ("m", 60_000_000_000),
        ("s", 1_000_000_000),
        ("ms", 1_000_000),
        ("us", 1_000),
        ("ns", 1),
    ] {
        let count = rest / per;
        rest %= per;
        if count > 0 {
            write!(f, "{count}{unit}")?;
        }
    }
    Ok(())
}

fn write_date(f: &mut fmt::Formatter<'_>, prefix: &str, nanos: i64) -> fmt::Result {
    let ((year, month, day), _) = split_date_time(nanos);
    write!(f, "{prefix}{year:04}-{month:02}-{day:02}")
}

fn write_time_of_day(f: &mut fmt::Formatter<'_>, nanos: i64) -> fmt::Result {
    let (hours, minutes, seconds, frac) = split_time_of_day(nanos);
    write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;
    if frac != 0 {
        let digits = format!("{frac:09}");
        write!(f, ".{}", digits.trim_end_matches('0'))?;
    }
    Ok(())
}

fn write_date_time(f: &mut fmt::Formatter<'_>, prefix: &str, nanos: i64) -> fmt::Result {
    let ((year, month, day), of_day) = split_date_time(nanos);
    write!(f, "{prefix}{year:04}-{month:02}-{day:02}-")?;
    write_time_of_day(f, of_day)
}

fn write_quoted(
    f: &mut fmt::Formatter<'_>,
    chars: impl Iterator<Item = char>,
    quote: char,
    wide: bool,
) -> fmt::Result {
    f.write_char(quote)?;
    for c in chars {
        match c {
            '$' => f.write_str("$$")?,
            '\n' => f.write_str("$N")?,
            '\r' => f.write_str("$R")?,
            '\t' => f.write_str("$T")?,
            '\u{000C}' => f.write_str("$P")?,
            c if c == quote => write!(f, "${c}")?,
            c if c.is_control() && wide => write!(f, "${:04X}", u32::from(c))?,
            c if c.is_control() => write!(f, "${:02X}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

fn quoted_size(chars: impl Iterator<Item = char>, wide: bool) -> usize {
    let escape = if wide { 5 } else { 3 };
    2 + chars.map(|c| c.len_utf8().max(escape)).sum::<usize>()
}

impl AnyValue {
    /// Literal with an explicit type prefix for elementary values whose plain
    /// form is ambiguous (`INT#5`, `BYTE#16#FF`, `STRING#'a'`). Date/time values
    /// already carry their prefix; derived values format plainly.
    #[must_use]
    pub fn to_typed_string(&self) -> String {
        match self {
            Self::Time(_)
            | Self::LTime(_)
            | Self::Date(_)
            | Self::LDate(_)
            | Self::Tod(_)
            | Self::LTod(_)
            | Self::Dt(_)
            | Self::Ldt(_)
            | Self::Array(_)
            | Self::Struct(_) => self.to_string(),
            other => format!("{}#{other}", other.type_name()),
        }
    }

    /// Upper bound on the length of [`Display`](fmt::Display) output, in bytes.
    #[must_use]
    pub fn to_string_buffer_size(&self) -> usize {
        match self {
            Self::Bool(_) => 5,
            Self::SInt(_) => 4,
            Self::Int(_) => 6,
            Self::DInt(_) => 11,
            Self::LInt(_) | Self::ULInt(_) => 20,
            Self::USInt(_) => 3,
            Self::UInt(_) => 5,
            Self::UDInt(_) => 10,
            Self::Real(_) => 50,
            Self::LReal(_) => 330,
            Self::Byte(_) => 5,
            Self::Word(_) => 7,
            Self::DWord(_) => 11,
            Self::LWord(_) => 19,
            Self::Time(_) | Self::LTime(_) => 36,
            Self::Date(_) | Self::LDate(_) => 20,
            Self::Tod(_) | Self::LTod(_) => 24,
            Self::Dt(_) | Self::Ldt(_) => 40,
            Self::String(s) => quoted_size(s.chars(), false),
            Self::WString(s) => quoted_size(s.chars(), true),
            Self::Char(_) => 5,
            Self::WChar(_) => 7,
            Self::Array(array) => {
                2 + array.elements.len().saturating_sub(1)
                    + array
                        .elements
                        .iter()
                        .map(Self::to_string_buffer_size)
                        .sum::<usize>()
            }
            Self::Struct(value) => {
                2 + value.fields.len().saturating_sub(1)
                    + value
                        .fields
                        .iter()
                        .map(|(name, member)| name.len() + 2 + member.to_string_buffer_size())
                        .sum::<usize>()
            }
        }
    }

    /// Writes the literal into `buffer`, returning the number of bytes used or
    /// `None` when the buffer is too small.
    pub fn to_buffer(&self, buffer: &mut [u8]) -> Option<usize> {
        let text = self.to_string();
        let target = buffer.get_mut(..text.len())?;
        target.copy_from_slice(text.as_bytes());
        Some(text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DateTimeValue, TimeOfDayValue};

    #[test]
    fn durations_use_compound_units() {
        let value = AnyValue::Time(Duration::from_nanos(3_723_500_000_000));
        assert_eq!(value.to_string(), "T#1h2m3s500ms");
        assert_eq!(AnyValue::LTime(Duration::ZERO).to_string(), "LT#0s");
        assert_eq!(
            AnyValue::Time(Duration::from_millis(-1500)).to_string(),
            "T#-1s500ms"
        );
    }

    #[test]
    fn time_of_day_trims_fraction() {
        let nanos = (12 * 3_600 + 30 * 60) * 1_000_000_000 + 250_000_000;
        assert_eq!(
            AnyValue::Tod(TimeOfDayValue::new(nanos)).to_string(),
            "TOD#12:30:00.25"
        );
        assert_eq!(
            AnyValue::Dt(DateTimeValue::new(0)).to_string(),
            "DT#1970-01-01-00:00:00"
        );
    }

    #[test]
    fn strings_escape_specials() {
        assert_eq!(AnyValue::from("it's $5\n").to_string(), "'it$'s $$5$N'");
        assert_eq!(AnyValue::Char(0).to_string(), "'$00'");
        assert_eq!(AnyValue::WChar(0).to_string(), "\"$0000\"");
    }

    #[test]
    fn buffer_too_small_is_reported() {
        let value = AnyValue::DInt(-123_456);
        let mut small = [0u8; 4];
        assert_eq!(value.to_buffer(&mut small), None);
        let mut buffer = [0u8; 16];
        assert_eq!(value.to_buffer(&mut buffer), Some(7));
        assert_eq!(&buffer[..7], b"-123456");
    }
}
