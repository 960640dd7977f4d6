//! Builds a struct from the keys of a [`Section`].
//!
//! Each struct field is looked up as a key under the section's name policy,
//! so a case-insensitive document matches `name` against a key `Name`. The
//! key name is the field name, or the name given by `#[serde(rename = "...")]`.
//! A missing key leaves the field at its default, which needs
//! `#[serde(default)]` on the struct or the field.
//!
//! Present keys are converted with [`try_parse`](crate::value::try_parse):
//! the alias table first, then the type's default grammar. A key that cannot
//! be converted fails with [`Error::Conversion`] naming the key.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default, Debug, PartialEq)]
//! #[serde(default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     #[serde(rename = "Verbose")]
//!     verbose: bool,
//!     #[serde(skip)]
//!     connections: usize,
//! }
//!
//! let mut doc = ini_doc::from_str("[Server]\nHOST=example.org\nverbose=on\n").unwrap();
//! doc.value_mappings_mut().add("on", true).unwrap();
//!
//! let server: Server = doc.deserialize_section("server").unwrap();
//! assert_eq!(server.host, "example.org");
//! assert_eq!(server.port, 0);
//! assert!(server.verbose);
//! ```

use crate::document::{Key, Section};
use crate::error::{Error, Result};
use crate::value::{self, IniValue, ValueMappings};
use chrono::{NaiveDateTime, TimeDelta};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use std::borrow::Cow;

/// Builds a `T` from the keys of `section`, using `mappings` for aliases.
pub fn deserialize_from<T>(section: &Section, mappings: &ValueMappings) -> Result<T>
where
    T: DeserializeOwned,
{
    deserialize_with_format(section, mappings, None)
}

/// Like [`deserialize_from`], with a date-time format tried before the invariant ones.
pub fn deserialize_with_format<T>(
    section: &Section,
    mappings: &ValueMappings,
    format: Option<&str>,
) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(SectionDeserializer::new(section, mappings, format))
}

/// Conversion settings shared by every value of one section.
#[derive(Clone, Copy)]
struct Context<'a> {
    mappings: &'a ValueMappings,
    format: Option<&'a str>,
}

/// Deserializer over a whole section.
pub struct SectionDeserializer<'a> {
    section: &'a Section,
    context: Context<'a>,
}

impl<'a> SectionDeserializer<'a> {
    pub fn new(section: &'a Section, mappings: &'a ValueMappings, format: Option<&'a str>) -> Self {
        SectionDeserializer {
            section,
            context: Context { mappings, format },
        }
    }
}

impl<'de, 'a> de::Deserializer<'de> for SectionDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let entries: Vec<(&str, &Key)> = self.section.keys().map(|key| (key.name(), key)).collect();
        visitor.visit_map(KeyAccess::new(entries, self.context))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let entries: Vec<(&str, &Key)> = fields
            .iter()
            .filter_map(|field| self.section.key(field).map(|key| (*field, key)))
            .collect();
        visitor.visit_map(KeyAccess::new(entries, self.context))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct enum identifier
        ignored_any
    }
}

/// Walks the matched keys of a section.
struct KeyAccess<'a> {
    entries: std::vec::IntoIter<(&'a str, &'a Key)>,
    current: Option<&'a Key>,
    context: Context<'a>,
}

impl<'a> KeyAccess<'a> {
    fn new(entries: Vec<(&'a str, &'a Key)>, context: Context<'a>) -> Self {
        KeyAccess {
            entries: entries.into_iter(),
            current: None,
            context,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for KeyAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((field, key)) => {
                self.current = Some(key);
                let name: de::value::StrDeserializer<'_, Error> = field.into_deserializer();
                seed.deserialize(name).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let key = self
            .current
            .take()
            .ok_or_else(|| Error::custom("value requested before its key"))?;
        seed.deserialize(ValueDeserializer {
            text: Cow::Borrowed(key.value()),
            key: key.name(),
            context: self.context,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Deserializer over a single key value or array item.
struct ValueDeserializer<'a> {
    text: Cow<'a, str>,
    key: &'a str,
    context: Context<'a>,
}

impl<'a> ValueDeserializer<'a> {
    fn parse<T: IniValue>(&self, expected: &str) -> Result<T> {
        value::try_parse(&self.text, self.context.mappings, self.context.format)
            .ok_or_else(|| Error::conversion(self.key, expected))
    }

    fn items(&self) -> Result<Vec<String>> {
        if self.text.trim().is_empty() {
            return Ok(Vec::new());
        }
        value::parse_array(&self.text).ok_or_else(|| Error::conversion(self.key, "array"))
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for ValueDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(&self.text)
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(&self.text)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.text.into_owned())
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    /// An empty value reads as `None`.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.text.trim().is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    /// Fields written through `value::date_time` or `value::duration` are
    /// converted here and handed on in their invariant form.
    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match name {
            value::DATE_TIME_TOKEN => {
                let date_time = self.parse::<NaiveDateTime>("date-time")?;
                visitor.visit_string(date_time.to_text(None))
            }
            value::DURATION_TOKEN => {
                let duration = self.parse::<TimeDelta>("duration")?;
                visitor.visit_string(duration.to_text(None))
            }
            _ => visitor.visit_newtype_struct(self),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let items = self.items()?;
        visitor.visit_seq(ItemAccess {
            items: items.into_iter(),
            key: self.key,
            context: self.context,
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::unsupported_type(
            "nested structures cannot be read from a single key",
        ))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    /// Unit variants are read from the variant name.
    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let variant: de::value::StrDeserializer<'_, Error> = self.text.trim().into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(&self.text)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Walks the items of an array value.
struct ItemAccess<'a> {
    items: std::vec::IntoIter<String>,
    key: &'a str,
    context: Context<'a>,
}

impl<'de, 'a> de::SeqAccess<'de> for ItemAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(item) => seed
                .deserialize(ValueDeserializer {
                    text: Cow::Owned(item),
                    key: self.key,
                    context: self.context,
                })
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}
