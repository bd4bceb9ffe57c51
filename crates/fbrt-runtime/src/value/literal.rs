//! IEC 61131-3 literal parsing for [`AnyValue`].

use fbrt_types::TypeId;
use smol_str::SmolStr;
use thiserror::Error;

use crate::datetime::{
    date_time_to_nanos, date_to_nanos, DateTimeCalcError, NANOS_PER_DAY, NANOS_PER_SEC,
};

use super::coerce::{convert, from_i128};
use super::{
    AnyValue, ArrayValue, DateTimeValue, DateValue, Duration, LDateTimeValue, LDateValue,
    LTimeOfDayValue, StructValue, TimeOfDayValue,
};

/// Errors produced while parsing a literal into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error("invalid {kind} literal '{text}'")]
    Invalid { kind: SmolStr, text: SmolStr },
    #[error("literal '{text}' is out of range for {kind}")]
    OutOfRange { kind: SmolStr, text: SmolStr },
    #[error("cannot store a {found} literal in a {expected} value")]
    TypeMismatch { expected: SmolStr, found: SmolStr },
    #[error("array literal has {found} elements, expected {expected}")]
    ArrayLength { expected: usize, found: usize },
    #[error("unknown struct member '{0}'")]
    UnknownMember(SmolStr),
}

fn kind_name(type_id: TypeId) -> SmolStr {
    SmolStr::new(type_id.builtin_name().unwrap_or("?"))
}

fn invalid(type_id: TypeId, text: &str) -> ValueParseError {
    ValueParseError::Invalid {
        kind: kind_name(type_id),
        text: SmolStr::new(text),
    }
}

fn out_of_range(type_id: TypeId, text: &str) -> ValueParseError {
    ValueParseError::OutOfRange {
        kind: kind_name(type_id),
        text: SmolStr::new(text),
    }
}

impl AnyValue {
    /// Parses `text` into `self`, keeping the active variant.
    ///
    /// A typed prefix (`INT#5`, `T#1s`) is honored when its type converts
    /// implicitly to the active variant. Returns the number of bytes consumed.
    /// On error `self` is unchanged, aggregates included.
    pub fn from_string(&mut self, text: &str) -> Result<usize, ValueParseError> {
        let trimmed = text.trim();
        match self {
            Self::Array(array) => {
                let mut parsed = array.clone();
                parse_array_into(&mut parsed, trimmed)?;
                *array = parsed;
            }
            Self::Struct(value) => {
                let mut parsed = value.clone();
                parse_struct_into(&mut parsed, trimmed)?;
                *value = parsed;
            }
            _ => {
                let target = self.type_id();
                let parsed = match split_type_prefix(trimmed) {
                    Some((type_id, body)) => parse_elementary(type_id, body, trimmed)?,
                    None => parse_elementary(target, trimmed, trimmed)?,
                };
                *self = convert(&parsed, target).ok_or_else(|| ValueParseError::TypeMismatch {
                    expected: kind_name(target),
                    found: parsed.type_name(),
                })?;
            }
        }
        Ok(text.len())
    }

    /// Parses a self-describing literal into a new value of the literal's own
    /// type. Untyped integers become DINT (LINT when they do not fit), untyped
    /// reals LREAL.
    pub fn parse_typed(text: &str) -> Result<AnyValue, ValueParseError> {
        let trimmed = text.trim();
        if let Some((type_id, body)) = split_type_prefix(trimmed) {
            return parse_elementary(type_id, body, trimmed);
        }
        if trimmed.starts_with('\'') {
            return parse_elementary(TypeId::STRING, trimmed, trimmed);
        }
        if trimmed.starts_with('"') {
            return parse_elementary(TypeId::WSTRING, trimmed, trimmed);
        }
        if trimmed.eq_ignore_ascii_case("TRUE") || trimmed.eq_ignore_ascii_case("FALSE") {
            return parse_elementary(TypeId::BOOL, trimmed, trimmed);
        }
        if let Some(int) = parse_int_literal(trimmed) {
            return from_i128(int, TypeId::DINT)
                .or_else(|| from_i128(int, TypeId::LINT))
                .ok_or_else(|| out_of_range(TypeId::LINT, trimmed));
        }
        parse_elementary(TypeId::LREAL, trimmed, trimmed)
    }
}

/// Splits a typed literal prefix (`INT#`, `T#`, `DT#`, ...) from its body.
fn split_type_prefix(text: &str) -> Option<(TypeId, &str)> {
    let (prefix, body) = text.split_once('#')?;
    let type_id = match prefix.to_ascii_uppercase().as_str() {
        "T" | "TIME" => TypeId::TIME,
        "LT" | "LTIME" => TypeId::LTIME,
        "D" | "DATE" => TypeId::DATE,
        "LD" | "LDATE" => TypeId::LDATE,
        "TOD" | "TIME_OF_DAY" => TypeId::TOD,
        "LTOD" | "LTIME_OF_DAY" => TypeId::LTOD,
        "DT" | "DATE_AND_TIME" => TypeId::DT,
        "LDT" | "LDATE_AND_TIME" => TypeId::LDT,
        other => TypeId::from_builtin_name(other).filter(|id| !id.is_generic())?,
    };
    Some((type_id, body))
}

fn parse_elementary(type_id: TypeId, body: &str, text: &str) -> Result<AnyValue, ValueParseError> {
    let body = body.trim();
    match type_id {
        TypeId::BOOL => {
            if body.eq_ignore_ascii_case("TRUE") || body == "1" {
                Ok(AnyValue::Bool(true))
            } else if body.eq_ignore_ascii_case("FALSE") || body == "0" {
                Ok(AnyValue::Bool(false))
            } else {
                Err(invalid(type_id, text))
            }
        }
        TypeId::SINT
        | TypeId::INT
        | TypeId::DINT
        | TypeId::LINT
        | TypeId::USINT
        | TypeId::UINT
        | TypeId::UDINT
        | TypeId::ULINT
        | TypeId::BYTE
        | TypeId::WORD
        | TypeId::DWORD
        | TypeId::LWORD => {
            let int = parse_int_literal(body).ok_or_else(|| invalid(type_id, text))?;
            from_i128(int, type_id).ok_or_else(|| out_of_range(type_id, text))
        }
        TypeId::REAL => {
            let real = parse_real_literal(body).ok_or_else(|| invalid(type_id, text))?;
            let narrowed = real as f32;
            if real.is_finite() && !narrowed.is_finite() {
                return Err(out_of_range(type_id, text));
            }
            Ok(AnyValue::Real(narrowed))
        }
        TypeId::LREAL => parse_real_literal(body)
            .map(AnyValue::LReal)
            .ok_or_else(|| invalid(type_id, text)),
        TypeId::TIME | TypeId::LTIME => {
            let nanos = parse_duration_nanos(body).ok_or_else(|| invalid(type_id, text))?;
            let duration = Duration::from_nanos(nanos);
            Ok(if type_id == TypeId::TIME {
                AnyValue::Time(duration)
            } else {
                AnyValue::LTime(duration)
            })
        }
        TypeId::DATE | TypeId::LDATE => {
            let nanos = parse_date_nanos(body).ok_or_else(|| invalid(type_id, text))?;
            Ok(if type_id == TypeId::DATE {
                AnyValue::Date(DateValue::new(nanos))
            } else {
                AnyValue::LDate(LDateValue::new(nanos))
            })
        }
        TypeId::TOD | TypeId::LTOD => {
            let nanos = parse_time_of_day_nanos(body).ok_or_else(|| invalid(type_id, text))?;
            Ok(if type_id == TypeId::TOD {
                AnyValue::Tod(TimeOfDayValue::new(nanos))
            } else {
                AnyValue::LTod(LTimeOfDayValue::new(nanos))
            })
        }
        TypeId::DT | TypeId::LDT => {
            let (date_part, tod_part) = body.rsplit_once('-').ok_or_else(|| invalid(type_id, text))?;
            let (year, month, day) =
                parse_civil_date(date_part).ok_or_else(|| invalid(type_id, text))?;
            let tod = parse_time_of_day_nanos(tod_part).ok_or_else(|| invalid(type_id, text))?;
            let nanos = date_time_to_nanos(year, month, day, tod).map_err(|err| match err {
                DateTimeCalcError::InvalidDate => invalid(type_id, text),
                DateTimeCalcError::Overflow => out_of_range(type_id, text),
            })?;
            Ok(if type_id == TypeId::DT {
                AnyValue::Dt(DateTimeValue::new(nanos))
            } else {
                AnyValue::Ldt(LDateTimeValue::new(nanos))
            })
        }
        TypeId::STRING => parse_quoted(body, '\'', false)
            .map(|s| AnyValue::String(SmolStr::new(s)))
            .ok_or_else(|| invalid(type_id, text)),
        TypeId::WSTRING => parse_quoted(body, '"', true)
            .map(AnyValue::WString)
            .ok_or_else(|| invalid(type_id, text)),
        TypeId::CHAR => {
            let decoded = parse_quoted(body, '\'', false).ok_or_else(|| invalid(type_id, text))?;
            let mut chars = decoded.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => u8::try_from(u32::from(c))
                    .map(AnyValue::Char)
                    .map_err(|_| out_of_range(type_id, text)),
                _ => Err(invalid(type_id, text)),
            }
        }
        TypeId::WCHAR => {
            let decoded = parse_quoted(body, '"', true).ok_or_else(|| invalid(type_id, text))?;
            let mut chars = decoded.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => u16::try_from(u32::from(c))
                    .map(AnyValue::WChar)
                    .map_err(|_| out_of_range(type_id, text)),
                _ => Err(invalid(type_id, text)),
            }
        }
        _ => Err(invalid(type_id, text)),
    }
}

fn parse_array_into(array: &mut ArrayValue, text: &str) -> Result<(), ValueParseError> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ValueParseError::Invalid {
            kind: array.type_name.clone(),
            text: SmolStr::new(text),
        })?;
    let items = split_top_level(inner);
    if items.len() != array.len() {
        return Err(ValueParseError::ArrayLength {
            expected: array.len(),
            found: items.len(),
        });
    }
    for (element, item) in array.elements.iter_mut().zip(items) {
        element.from_string(item)?;
    }
    Ok(())
}

fn parse_struct_into(value: &mut StructValue, text: &str) -> Result<(), ValueParseError> {
    let inner = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| ValueParseError::Invalid {
            kind: value.type_name.clone(),
            text: SmolStr::new(text),
        })?;
    for item in split_top_level(inner) {
        let (name, literal) = item.split_once(":=").ok_or_else(|| ValueParseError::Invalid {
            kind: value.type_name.clone(),
            text: SmolStr::new(item),
        })?;
        let name = name.trim();
        let member = value
            .member_mut(name)
            .ok_or_else(|| ValueParseError::UnknownMember(SmolStr::new(name)))?;
        member.from_string(literal)?;
    }
    Ok(())
}

/// Splits a comma separated list, ignoring commas nested in brackets,
/// parentheses or quotes.
fn split_top_level(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0usize;
    for (idx, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '$' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    items.push(text[start..].trim());
    items
}

pub(crate) fn parse_int_literal(text: &str) -> Option<i128> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if let Some((base, digits)) = cleaned.split_once('#') {
        let base: u32 = base.parse().ok()?;
        if !matches!(base, 2 | 8 | 16) || digits.is_empty() || digits.starts_with(['+', '-']) {
            return None;
        }
        return i128::from_str_radix(digits, base).ok();
    }
    if cleaned.is_empty() || cleaned == "+" || cleaned == "-" {
        return None;
    }
    cleaned.parse::<i128>().ok()
}

fn parse_real_literal(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn parse_duration_nanos(text: &str) -> Option<i64> {
    let upper = text.trim().to_ascii_uppercase();
    let (negative, rest) = match upper.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, upper.strip_prefix('+').unwrap_or(&upper)),
    };
    if rest.is_empty() {
        return None;
    }

    let bytes = rest.as_bytes();
    let mut idx = 0usize;
    let mut total: i128 = 0;
    while idx < bytes.len() {
        let start = idx;
        while idx < bytes.len()
            && (bytes[idx].is_ascii_digit() || bytes[idx] == b'_' || bytes[idx] == b'.')
        {
            idx += 1;
        }
        if start == idx {
            return None;
        }
        let number = &rest[start..idx];
        let unit_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        let nanos_per: i128 = match &rest[unit_start..idx] {
            "D" => 86_400_000_000_000,
            "H" => 3_600_000_000_000,
            "M" => 60_000_000_000,
            "S" => 1_000_000_000,
            "MS" => 1_000_000,
            "US" => 1_000,
            "NS" => 1,
            _ => return None,
        };
        total = total.checked_add(scale_decimal(number, nanos_per)?)?;
        while idx < bytes.len() && bytes[idx] == b'_' {
            idx += 1;
        }
    }
    i64::try_from(if negative { -total } else { total }).ok()
}

fn scale_decimal(number: &str, scale: i128) -> Option<i128> {
    let cleaned: String = number.chars().filter(|c| *c != '_').collect();
    let (int_part, frac_part) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    let int: i128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let mut value = int.checked_mul(scale)?;
    if !frac_part.is_empty() {
        let digits = frac_part.len().min(18);
        let frac: i128 = frac_part[..digits].parse().ok()?;
        value += frac * scale / 10i128.pow(digits as u32);
    }
    Some(value)
}

fn parse_civil_date(text: &str) -> Option<(i64, i64, i64)> {
    let mut parts = text.trim().split('-');
    let year = parts.next()?.parse::<i64>().ok()?;
    let month = parts.next()?.parse::<i64>().ok()?;
    let day = parts.next()?.parse::<i64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((year, month, day))
}

fn parse_date_nanos(text: &str) -> Option<i64> {
    let (year, month, day) = parse_civil_date(text)?;
    date_to_nanos(year, month, day).ok()
}

fn parse_time_of_day_nanos(text: &str) -> Option<i64> {
    let mut parts = text.trim().split(':');
    let hours = parts.next()?.parse::<i64>().ok()?;
    let minutes = parts.next()?.parse::<i64>().ok()?;
    let (seconds, nanos) = match parts.next() {
        Some(seconds) => parse_seconds_fraction(seconds)?,
        None => (0, 0),
    };
    if parts.next().is_some() || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    let total = (hours * 3_600 + minutes * 60 + seconds)
        .checked_mul(NANOS_PER_SEC)?
        .checked_add(nanos)?;
    (0..NANOS_PER_DAY).contains(&total).then_some(total)
}

fn parse_seconds_fraction(text: &str) -> Option<(i64, i64)> {
    let (secs, frac) = text.split_once('.').unwrap_or((text, ""));
    let secs = secs.parse::<i64>().ok()?;
    let digits: String = frac.chars().filter(|c| *c != '_').take(9).collect();
    if digits.is_empty() {
        return Some((secs, 0));
    }
    let scale = 10i64.pow(9 - digits.len() as u32);
    Some((secs, digits.parse::<i64>().ok()? * scale))
}

fn parse_quoted(text: &str, quote: char, wide: bool) -> Option<String> {
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    let mut result = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == quote {
            return None;
        }
        if c != '$' {
            result.push(c);
            continue;
        }
        let next = chars.next()?;
        let decoded = match next {
            '$' => '$',
            '\'' => '\'',
            '"' => '"',
            'L' | 'l' | 'N' | 'n' => '\n',
            'P' | 'p' => '\u{000C}',
            'R' | 'r' => '\r',
            'T' | 't' => '\t',
            first => {
                let width = if wide { 4 } else { 2 };
                let mut hex = String::with_capacity(width);
                hex.push(first);
                for _ in 1..width {
                    hex.push(chars.next()?);
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
        };
        result.push(decoded);
    }
    Some(result)
}
