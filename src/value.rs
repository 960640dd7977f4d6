//! Typed views over key values.
//!
//! A key's value is always stored as text. This module converts between that
//! text and Rust primitives, and holds the alias table that lets a document
//! accept extra literals such as `yes` for `true`.
//!
//! ## Core Types
//!
//! - [`IniValue`]: Parsing and formatting rules for one Rust type
//! - [`ValueKind`]: Target kind selector used by the alias table
//! - [`TypedValue`]: A parsed value of any kind
//! - [`ValueMappings`]: Alias table keyed by kind and case-folded literal
//!
//! Conversion never fails loudly: every parse returns an `Option`.
//!
//! ## Supported Types
//!
//! | Kind | Rust types | Default grammar |
//! |------|------------|-----------------|
//! | `Bool` | `bool` | `true` / `false`, any case |
//! | `Integer` | `i8`..`i128`, `u8`..`u64`, `isize`, `usize` | decimal with optional sign |
//! | `Float` | `f32`, `f64` | decimal or exponent, `inf`, `NaN` |
//! | `Char` | `char` | exactly one character |
//! | `DateTime` | `NaiveDateTime`, `NaiveDate` | ISO 8601 / RFC 3339, or a configured format |
//! | `Duration` | `TimeDelta` | `[-][d.]hh:mm[:ss[.fffffffff]]` |
//! | `Text` | `String` | anything |
//!
//! ## Examples
//!
//! ```rust
//! use ini_doc::{value, ValueMappings};
//!
//! let mut mappings = ValueMappings::default();
//! assert_eq!(value::try_parse::<i64>("9999999", &mappings, None), Some(9999999));
//! assert_eq!(value::try_parse::<bool>("Yes", &mappings, None), None);
//!
//! mappings.add("yes", true).unwrap();
//! assert_eq!(value::try_parse::<bool>("Yes", &mappings, None), Some(true));
//! ```

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::de::{self, Unexpected, Visitor};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Target kind of a typed conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Integer,
    Float,
    Char,
    DateTime,
    Duration,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Char => "char",
            ValueKind::DateTime => "date-time",
            ValueKind::Duration => "duration",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A parsed value of any supported kind.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Integer(i128),
    Float(f64),
    Char(char),
    DateTime(NaiveDateTime),
    Duration(TimeDelta),
    Text(String),
}

impl TypedValue {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Bool(_) => ValueKind::Bool,
            TypedValue::Integer(_) => ValueKind::Integer,
            TypedValue::Float(_) => ValueKind::Float,
            TypedValue::Char(_) => ValueKind::Char,
            TypedValue::DateTime(_) => ValueKind::DateTime,
            TypedValue::Duration(_) => ValueKind::Duration,
            TypedValue::Text(_) => ValueKind::Text,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            TypedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TypedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Parsing and formatting rules for a type stored in a key's value.
///
/// `format` is the document's configured date-time format, if any; types
/// other than dates ignore it.
pub trait IniValue: Sized {
    const KIND: ValueKind;

    /// Parses `text` with this type's default grammar.
    fn parse_text(text: &str, format: Option<&str>) -> Option<Self>;

    /// Extracts this type from an alias target.
    fn from_typed(value: &TypedValue) -> Option<Self>;

    fn into_typed(self) -> TypedValue;

    /// Formats the value so that [`IniValue::parse_text`] reads it back.
    fn to_text(&self, format: Option<&str>) -> String;
}

impl IniValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        value.as_bool()
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::Bool(self)
    }

    fn to_text(&self, _format: Option<&str>) -> String {
        self.to_string()
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl IniValue for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
                    text.trim().parse().ok()
                }

                fn from_typed(value: &TypedValue) -> Option<Self> {
                    value.as_i128().and_then(|i| <$ty>::try_from(i).ok())
                }

                fn into_typed(self) -> TypedValue {
                    TypedValue::Integer(i128::from(self))
                }

                fn to_text(&self, _format: Option<&str>) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

macro_rules! impl_size {
    ($($ty:ty),*) => {
        $(
            impl IniValue for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
                    text.trim().parse().ok()
                }

                fn from_typed(value: &TypedValue) -> Option<Self> {
                    value.as_i128().and_then(|i| <$ty>::try_from(i).ok())
                }

                fn into_typed(self) -> TypedValue {
                    TypedValue::Integer(i128::try_from(self).unwrap_or_default())
                }

                fn to_text(&self, _format: Option<&str>) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_size!(isize, usize);

impl IniValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        value.as_f64()
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::Float(self)
    }

    fn to_text(&self, _format: Option<&str>) -> String {
        self.to_string()
    }
}

impl IniValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
        text.trim().parse().ok()
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        value.as_f64().map(|f| f as f32)
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::Float(f64::from(self))
    }

    fn to_text(&self, _format: Option<&str>) -> String {
        self.to_string()
    }
}

impl IniValue for char {
    const KIND: ValueKind = ValueKind::Char;

    fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::Char(c) => Some(*c),
            _ => None,
        }
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::Char(self)
    }

    fn to_text(&self, _format: Option<&str>) -> String {
        self.to_string()
    }
}

impl IniValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
        Some(text.to_string())
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::Text(self)
    }

    fn to_text(&self, _format: Option<&str>) -> String {
        self.clone()
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_TIME_OUTPUT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses `text` with `format`, which may carry no time of day.
fn parse_with(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .map(|date| date.and_time(NaiveTime::default()))
    })
}

impl IniValue for NaiveDateTime {
    const KIND: ValueKind = ValueKind::DateTime;

    fn parse_text(text: &str, format: Option<&str>) -> Option<Self> {
        let text = text.trim();
        if let Some(parsed) = format.and_then(|f| parse_with(text, f)) {
            return Some(parsed);
        }
        DATE_TIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_utc()))
            .or_else(|| {
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::default()))
            })
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::DateTime(self)
    }

    fn to_text(&self, format: Option<&str>) -> String {
        self.format(format.unwrap_or(DATE_TIME_OUTPUT)).to_string()
    }
}

impl IniValue for NaiveDate {
    const KIND: ValueKind = ValueKind::DateTime;

    fn parse_text(text: &str, format: Option<&str>) -> Option<Self> {
        let text = text.trim();
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .or_else(|| NaiveDateTime::parse_text(text, format).map(|dt| dt.date()))
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        NaiveDateTime::from_typed(value).map(|dt| dt.date())
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::DateTime(self.and_time(NaiveTime::default()))
    }

    fn to_text(&self, _format: Option<&str>) -> String {
        self.format(DATE_FORMAT).to_string()
    }
}

impl IniValue for TimeDelta {
    const KIND: ValueKind = ValueKind::Duration;

    fn parse_text(text: &str, _format: Option<&str>) -> Option<Self> {
        parse_duration(text)
    }

    fn from_typed(value: &TypedValue) -> Option<Self> {
        match value {
            TypedValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    fn into_typed(self) -> TypedValue {
        TypedValue::Duration(self)
    }

    fn to_text(&self, _format: Option<&str>) -> String {
        format_duration(*self)
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Parses `[-][d.]hh:mm[:ss[.fffffffff]]`.
fn parse_duration(text: &str) -> Option<TimeDelta> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (head, clock) = body.split_once(':')?;
    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (parse_digits(days)?, parse_digits(hours)?),
        None => (0, parse_digits(head)?),
    };
    let (minutes, seconds) = match clock.split_once(':') {
        Some((minutes, seconds)) => (minutes, Some(seconds)),
        None => (clock, None),
    };
    let minutes = parse_digits(minutes)?;
    let (seconds, nanos) = match seconds {
        None => (0, 0),
        Some(seconds) => match seconds.split_once('.') {
            Some((whole, fraction)) => (parse_digits(whole)?, parse_fraction(fraction)?),
            None => (parse_digits(seconds)?, 0),
        },
    };
    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let total = days
        .checked_mul(SECONDS_PER_DAY)?
        .checked_add(hours * 3600 + minutes * 60 + seconds)?;
    let delta = TimeDelta::new(total, nanos)?;
    Some(if negative { -delta } else { delta })
}

fn parse_digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_fraction(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 9 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{:0<9}", text);
    padded.parse().ok()
}

fn format_duration(delta: TimeDelta) -> String {
    let negative = delta < TimeDelta::zero();
    let magnitude = delta.abs();
    let total = magnitude.num_seconds();
    let nanos = magnitude.subsec_nanos();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let days = total / SECONDS_PER_DAY;
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    let rest = total % SECONDS_PER_DAY;
    out.push_str(&format!(
        "{:02}:{:02}:{:02}",
        rest / 3600,
        rest % 3600 / 60,
        rest % 60
    ));
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

/// Alias table mapping literal text to a typed value per target kind.
///
/// Literals are matched after trimming and case folding.
///
/// # Examples
///
/// ```rust
/// use ini_doc::{ValueMappings, ValueKind};
///
/// let mut mappings = ValueMappings::default();
/// mappings.add("on", true).unwrap();
/// mappings.add("none", 0i64).unwrap();
///
/// assert!(mappings.contains("ON", ValueKind::Bool));
/// assert!(mappings.add("On", false).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueMappings {
    entries: HashMap<(ValueKind, String), TypedValue>,
}

impl ValueMappings {
    fn fold(text: &str) -> String {
        text.trim().to_lowercase()
    }

    /// Registers `text` as an alias for `value`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateName`] if `text` is already an alias for the same kind.
    pub fn add<T: IniValue>(&mut self, text: &str, value: T) -> Result<()> {
        let key = (T::KIND, Self::fold(text));
        if self.entries.contains_key(&key) {
            return Err(Error::duplicate("value mapping", text));
        }
        self.entries.insert(key, value.into_typed());
        Ok(())
    }

    /// Removes the alias for `text` and `kind`. Returns whether one existed.
    pub fn remove(&mut self, text: &str, kind: ValueKind) -> bool {
        self.entries.remove(&(kind, Self::fold(text))).is_some()
    }

    #[must_use]
    pub fn get(&self, text: &str, kind: ValueKind) -> Option<&TypedValue> {
        self.entries.get(&(kind, Self::fold(text)))
    }

    #[must_use]
    pub fn contains(&self, text: &str, kind: ValueKind) -> bool {
        self.get(text, kind).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Converts `text` to `T`, consulting `mappings` before the default grammar.
#[must_use]
pub fn try_parse<T: IniValue>(
    text: &str,
    mappings: &ValueMappings,
    format: Option<&str>,
) -> Option<T> {
    mappings
        .get(text, T::KIND)
        .and_then(T::from_typed)
        .or_else(|| T::parse_text(text, format))
}

/// Converts `text` to a value of the selected kind.
///
/// # Examples
///
/// ```rust
/// use ini_doc::{value, TypedValue, ValueKind, ValueMappings};
///
/// let mappings = ValueMappings::default();
/// assert_eq!(
///     value::try_parse_kind("1.02:03:04", ValueKind::Duration, &mappings, None)
///         .map(|v| v.kind()),
///     Some(ValueKind::Duration),
/// );
/// assert_eq!(
///     value::try_parse_kind("-12", ValueKind::Integer, &mappings, None),
///     Some(TypedValue::Integer(-12)),
/// );
/// ```
#[must_use]
pub fn try_parse_kind(
    text: &str,
    kind: ValueKind,
    mappings: &ValueMappings,
    format: Option<&str>,
) -> Option<TypedValue> {
    if let Some(alias) = mappings.get(text, kind) {
        return Some(alias.clone());
    }
    match kind {
        ValueKind::Bool => bool::parse_text(text, format).map(IniValue::into_typed),
        ValueKind::Integer => i128::parse_text(text, format).map(IniValue::into_typed),
        ValueKind::Float => f64::parse_text(text, format).map(IniValue::into_typed),
        ValueKind::Char => char::parse_text(text, format).map(IniValue::into_typed),
        ValueKind::DateTime => NaiveDateTime::parse_text(text, format).map(IniValue::into_typed),
        ValueKind::Duration => TimeDelta::parse_text(text, format).map(IniValue::into_typed),
        ValueKind::Text => String::parse_text(text, format).map(IniValue::into_typed),
    }
}

/// Newtype names that mark a field written through [`date_time`] or [`duration`].
pub(crate) const DATE_TIME_TOKEN: &str = "$ini_doc::private::DateTime";
pub(crate) const DURATION_TOKEN: &str = "$ini_doc::private::Duration";

/// Reads a value in its invariant text form.
struct TextVisitor<T>(PhantomData<T>);

impl<'de, T: IniValue> Visitor<'de> for TextVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} value", T::KIND)
    }

    fn visit_str<E: de::Error>(self, text: &str) -> std::result::Result<T, E> {
        T::parse_text(text, None).ok_or_else(|| E::invalid_value(Unexpected::Str(text), &self))
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

/// `#[serde(with = "ini_doc::value::date_time")]` for `NaiveDateTime` fields.
///
/// In a section the value is written in the document's `date_time_format`
/// and read through the alias table and every accepted date-time form, the
/// same as [`Document::set_typed`](crate::Document::set_typed) and
/// [`Document::parse_value`](crate::Document::parse_value). Other formats see
/// `%Y-%m-%d %H:%M:%S%.f` text.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDateTime;
/// use ini_doc::{Document, IniOptions};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Stamp {
///     #[serde(with = "ini_doc::value::date_time")]
///     at: NaiveDateTime,
/// }
///
/// let mut doc = Document::new(IniOptions::new().with_date_time_format("%d/%m/%Y %H:%M"));
/// let at = NaiveDateTime::parse_from_str("2000-01-10 08:30", "%Y-%m-%d %H:%M").unwrap();
/// doc.serialize_section("Log", &Stamp { at }).unwrap();
/// assert_eq!(doc.value("Log", "at"), Some("10/01/2000 08:30"));
///
/// let back: Stamp = doc.deserialize_section("Log").unwrap();
/// assert_eq!(back.at, at);
/// ```
pub mod date_time {
    use super::{IniValue, TextVisitor, DATE_TIME_TOKEN};
    use chrono::NaiveDateTime;
    use serde::{Deserializer, Serializer};
    use std::marker::PhantomData;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DATE_TIME_TOKEN, &value.to_text(None))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        deserializer.deserialize_newtype_struct(DATE_TIME_TOKEN, TextVisitor(PhantomData))
    }
}

/// `#[serde(with = "ini_doc::value::duration")]` for `TimeDelta` fields.
///
/// Values use the `[-][d.]hh:mm[:ss[.f]]` form and, in a section, the
/// document's alias table.
pub mod duration {
    use super::{IniValue, TextVisitor, DURATION_TOKEN};
    use chrono::TimeDelta;
    use serde::{Deserializer, Serializer};
    use std::marker::PhantomData;

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(DURATION_TOKEN, &value.to_text(None))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        deserializer.deserialize_newtype_struct(DURATION_TOKEN, TextVisitor(PhantomData))
    }
}

/// Splits a `{a, b, c}` value into trimmed items. `{}` is an empty list.
#[must_use]
pub fn parse_array(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    Some(inner.split(',').map(|item| item.trim().to_string()).collect())
}

/// Joins items into a `{a,b,c}` value.
#[must_use]
pub fn format_array<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    format!("{{{}}}", joined.join(","))
}
