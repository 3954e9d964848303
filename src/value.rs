//! Property values and their JSON literal forms.
//!
//! Events carry loosely typed properties. [`PropertyValue`] closes them
//! over the literal kinds Seq understands; anything else is captured as
//! its display text. Before encoding, string values go through
//! [`PropertyValue::literalize`], which tries an exact decimal parse and
//! then a date/time parse so that numbers and timestamps logged as text
//! reach the server with their native JSON type. The order of that
//! chain is part of the wire contract: `"2020"` is a number, never a
//! date.

use std::borrow::Cow;
use std::fmt;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::value::RawValue;

/// Most significant digits a decimal literal may carry.
const MAX_DECIMAL_DIGITS: usize = 29;
/// Most fractional digits a decimal literal may carry.
const MAX_DECIMAL_SCALE: usize = 28;
/// Largest magnitude of a 96-bit decimal mantissa.
const MAX_DECIMAL_INTEGER: &str = "79228162514264337593543950335";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

// Month-first forms are the invariant-culture rendering of a date.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Time-only text is read as that time on the current UTC date.
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p"];

/// A single property value attached to an event or rendered by a
/// parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    UnsignedInteger(u64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    /// Date and time without an offset; encoded as UTC.
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    /// Display text of a value with no literal kind of its own.
    Display(String),
}

impl PropertyValue {
    /// Capture `value` through its [`fmt::Display`] implementation.
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Display(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Upgrade a string to the most specific literal it parses as.
    ///
    /// Only [`PropertyValue::String`] is reinterpreted; every other kind
    /// is returned untouched.
    pub fn literalize(&self) -> Cow<'_, Self> {
        match self {
            Self::String(text) => literal_from_str(text).map_or(Cow::Borrowed(self), Cow::Owned),
            _ => Cow::Borrowed(self),
        }
    }
}

/// Try a decimal parse, then a date/time parse.
pub fn literal_from_str(text: &str) -> Option<PropertyValue> {
    Decimal::parse(text)
        .map(PropertyValue::Decimal)
        .or_else(|| parse_date_time(text))
}

fn parse_date_time(text: &str) -> Option<PropertyValue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(PropertyValue::DateTimeOffset(dt));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
    {
        return Some(PropertyValue::DateTimeOffset(dt));
    }
    if let Some(dt) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(PropertyValue::DateTime(dt));
    }
    if let Some(dt) = NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Some(PropertyValue::DateTime(dt));
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .map(|time| PropertyValue::DateTime(Utc::now().date_naive().and_time(time)))
}

impl Serialize for PropertyValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::UnsignedInteger(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Decimal(v) => v.serialize(serializer),
            Self::String(v) | Self::Display(v) => serializer.serialize_str(v),
            Self::DateTime(v) => serializer.collect_str(&RoundTrip::from_naive(v)),
            Self::DateTimeOffset(v) => serializer.collect_str(&RoundTrip(*v)),
        }
    }
}

/// Exact decimal number kept in its canonical text form.
///
/// Accepts an optional sign, digits with `,` group separators, and an
/// optional fractional part; exponents, `NaN` and infinities are
/// rejected. Trailing fractional zeros are kept, so `"1.50"` stays
/// `1.50` on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    text: String,
}

impl Decimal {
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let (negative, unsigned) = match s.as_bytes().first()? {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.starts_with(',') || int_part.ends_with(',') {
            return None;
        }
        let int_digits: String = int_part.chars().filter(|c| *c != ',').collect();
        if int_digits.is_empty() && frac_part.is_empty() {
            return None;
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(&int_digits) || !all_digits(frac_part) {
            return None;
        }

        let int_digits = match int_digits.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        let significant = if int_digits == "0" { 0 } else { int_digits.len() };
        if significant + frac_part.len() > MAX_DECIMAL_DIGITS
            || frac_part.len() > MAX_DECIMAL_SCALE
        {
            return None;
        }
        if int_digits.len() == MAX_DECIMAL_INTEGER.len() && int_digits > MAX_DECIMAL_INTEGER {
            return None;
        }

        let is_zero = int_digits == "0" && frac_part.bytes().all(|b| b == b'0');
        let mut text = String::with_capacity(int_digits.len() + frac_part.len() + 2);
        if negative && !is_zero {
            text.push('-');
        }
        text.push_str(int_digits);
        if !frac_part.is_empty() {
            text.push('.');
            text.push_str(frac_part);
        }
        Some(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw = RawValue::from_string(self.text.clone()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// ISO-8601 round-trip rendering with seven fractional digits and an
/// explicit offset, e.g. `2020-01-01T00:00:00.0000000+00:00`.
#[derive(Clone, Copy, Debug)]
pub struct RoundTrip(pub DateTime<FixedOffset>);

impl RoundTrip {
    /// Naive date/times carry no offset and are rendered as UTC.
    pub fn from_naive(naive: &NaiveDateTime) -> Self {
        Self(DateTime::<FixedOffset>::from(Utc.from_utc_datetime(naive)))
    }
}

impl fmt::Display for RoundTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ticks = (self.0.nanosecond() % 1_000_000_000) / 100;
        write!(
            f,
            "{}.{:07}{}",
            self.0.format("%Y-%m-%dT%H:%M:%S"),
            ticks,
            self.0.format("%:z")
        )
    }
}

impl Serialize for RoundTrip {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

macro_rules! from_integer {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for PropertyValue {
                fn from(value: $t) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

from_integer!(Integer, i64, i8, i16, i32, i64);
from_integer!(UnsignedInteger, u64, u8, u16, u32, u64);

impl From<isize> for PropertyValue {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::display(value), Self::Integer)
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or_else(|_| Self::display(value), Self::UnsignedInteger)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for PropertyValue {
    // Widen through the shortest text form so 0.1f32 stays 0.1.
    fn from(value: f32) -> Self {
        Self::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<char> for PropertyValue {
    fn from(value: char) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Cow<'_, str>> for PropertyValue {
    fn from(value: Cow<'_, str>) -> Self {
        Self::String(value.into_owned())
    }
}

impl From<Decimal> for PropertyValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<NaiveDateTime> for PropertyValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for PropertyValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTimeOffset(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTimeOffset(value.into())
    }
}

impl<T> From<Option<T>> for PropertyValue
where
    T: Into<PropertyValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
