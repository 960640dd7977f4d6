//! Writes the fields of a struct into the keys of a [`Section`].
//!
//! Each field becomes one key. The key name is the field name, or the name
//! given by `#[serde(rename = "...")]`; fields marked `#[serde(skip)]` produce
//! no key. Values are formatted with the same rules as [`IniValue::to_text`],
//! so typed access reads them back.
//!
//! ## Value Mapping
//!
//! | Rust | Key value |
//! |------|-----------|
//! | `bool`, integers, floats, `char` | `true`, `42`, `2.5`, `x` |
//! | `String`, `&str` | the text as is |
//! | `Option<T>` | `T` for `Some`; `None` writes no key |
//! | `Vec<T>`, tuples | `{a,b,c}` |
//! | unit enum variants | the variant name |
//! | nested structs and maps | [`Error::UnsupportedType`] |
//!
//! Existing keys with the same name are updated in place. Keys are written
//! only once every field has been formatted, so a failure leaves the section
//! as it was.
//!
//! `NaiveDateTime` and `TimeDelta` fields written through
//! [`value::date_time`](crate::value::date_time) and
//! [`value::duration`](crate::value::duration) use the document's formats.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use ini_doc::Section;
//!
//! #[derive(Serialize)]
//! struct Player {
//!     #[serde(rename = "Name")]
//!     name: String,
//!     #[serde(rename = "Sword")]
//!     attack: f32,
//!     #[serde(skip)]
//!     health: u32,
//! }
//!
//! let mut section = Section::new("Player");
//! ini_doc::serialize_into(&mut section, &Player { name: "Hero".into(), attack: 5.5, health: 100 })
//!     .unwrap();
//!
//! let keys: Vec<_> = section.keys().map(|k| (k.name(), k.value())).collect();
//! assert_eq!(keys, vec![("Name", "Hero"), ("Sword", "5.5")]);
//! ```
//!
//! [`IniValue::to_text`]: crate::IniValue::to_text

use crate::document::Section;
use crate::error::{Error, Result};
use crate::value::{self, IniValue};
use chrono::NaiveDateTime;
use serde::ser::{self, Impossible, Serialize};

/// Writes the fields of `value` into `section`.
///
/// # Errors
///
/// [`Error::UnsupportedType`] if `value` is not a struct or map, or if a field
/// holds a nested structure.
pub fn serialize_into<T>(section: &mut Section, value: &T) -> Result<()>
where
    T: ?Sized + Serialize,
{
    serialize_with_format(section, value, None)
}

/// Like [`serialize_into`], writing date-times in `format` when one is given.
pub fn serialize_with_format<T>(section: &mut Section, value: &T, format: Option<&str>) -> Result<()>
where
    T: ?Sized + Serialize,
{
    value.serialize(SectionSerializer::with_format(section, format))
}

fn top_level_only() -> Error {
    Error::unsupported_type("only structs and maps can be written into a section")
}

fn nested() -> Error {
    Error::unsupported_type("nested structures cannot be written into a single key")
}

/// Serializer for the top-level struct or map.
pub struct SectionSerializer<'a> {
    section: &'a mut Section,
    value: ValueSerializer<'a>,
}

impl<'a> SectionSerializer<'a> {
    pub fn new(section: &'a mut Section) -> Self {
        Self::with_format(section, None)
    }

    pub fn with_format(section: &'a mut Section, format: Option<&'a str>) -> Self {
        SectionSerializer {
            section,
            value: ValueSerializer { format },
        }
    }
}

macro_rules! reject_scalar {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<()> {
                Err(top_level_only())
            }
        )*
    };
}

impl<'a> ser::Serializer for SectionSerializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = MapWriter<'a>;
    type SerializeStruct = StructWriter<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    reject_scalar! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
    }

    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(top_level_only())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(top_level_only())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(top_level_only())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(top_level_only())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(top_level_only())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(top_level_only())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapWriter {
            section: self.section,
            value: self.value,
            pairs: Vec::new(),
            pending: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructWriter {
            section: self.section,
            value: self.value,
            pairs: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(top_level_only())
    }
}

fn apply(section: &mut Section, pairs: Vec<(String, String)>) {
    for (name, text) in pairs {
        section.set_value(&name, text);
    }
}

/// Writes struct fields as keys.
pub struct StructWriter<'a> {
    section: &'a mut Section,
    value: ValueSerializer<'a>,
    pairs: Vec<(String, String)>,
}

impl<'a> ser::SerializeStruct for StructWriter<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(text) = value.serialize(self.value)? {
            self.pairs.push((key.to_string(), text));
        }
        Ok(())
    }

    fn end(self) -> Result<()> {
        apply(self.section, self.pairs);
        Ok(())
    }
}

/// Writes map entries as keys.
pub struct MapWriter<'a> {
    section: &'a mut Section,
    value: ValueSerializer<'a>,
    pairs: Vec<(String, String)>,
    pending: Option<String>,
}

impl<'a> ser::SerializeMap for MapWriter<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let name = key
            .serialize(self.value)?
            .ok_or_else(|| Error::unsupported_type("map keys must not be empty"))?;
        self.pending = Some(name);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let name = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("map value without a key"))?;
        if let Some(text) = value.serialize(self.value)? {
            self.pairs.push((name, text));
        }
        Ok(())
    }

    fn end(self) -> Result<()> {
        apply(self.section, self.pairs);
        Ok(())
    }
}

/// Formats a single field value. `None` means the field writes no key.
#[derive(Clone, Copy, Default)]
pub struct ValueSerializer<'f> {
    format: Option<&'f str>,
}

fn text<T: IniValue>(v: &T) -> Result<Option<String>> {
    Ok(Some(v.to_text(None)))
}

impl<'f> ser::Serializer for ValueSerializer<'f> {
    type Ok = Option<String>;
    type Error = Error;

    type SerializeSeq = ArrayWriter<'f>;
    type SerializeTuple = ArrayWriter<'f>;
    type SerializeTupleStruct = ArrayWriter<'f>;
    type SerializeTupleVariant = Impossible<Option<String>, Error>;
    type SerializeMap = Impossible<Option<String>, Error>;
    type SerializeStruct = Impossible<Option<String>, Error>;
    type SerializeStructVariant = Impossible<Option<String>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_i8(self, v: i8) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_i16(self, v: i16) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_i32(self, v: i32) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_i64(self, v: i64) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_i128(self, v: i128) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_u8(self, v: u8) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_u16(self, v: u16) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_u32(self, v: u32) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_u64(self, v: u64) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_f32(self, v: f32) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_f64(self, v: f64) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_char(self, v: char) -> Result<Option<String>> {
        text(&v)
    }

    fn serialize_str(self, v: &str) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Option<String>> {
        Ok(Some(value::format_array(v.iter().map(u8::to_string))))
    }

    fn serialize_none(self) -> Result<Option<String>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<String>> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<String>> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<String>> {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        let text = value.serialize(self)?;
        if name != value::DATE_TIME_TOKEN || self.format.is_none() {
            return Ok(text);
        }
        let invariant = text.unwrap_or_default();
        let date_time = NaiveDateTime::parse_text(&invariant, None)
            .ok_or_else(|| Error::custom(format!("'{}' is not a date-time", invariant)))?;
        Ok(Some(date_time.to_text(self.format)))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        Err(nested())
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(ArrayWriter {
            items: Vec::with_capacity(len.unwrap_or(0)),
            value: self,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(nested())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(nested())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(nested())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(nested())
    }
}

/// Collects sequence items into a `{a,b,c}` value.
pub struct ArrayWriter<'f> {
    items: Vec<String>,
    value: ValueSerializer<'f>,
}

impl<'f> ArrayWriter<'f> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let item = value.serialize(self.value)?.unwrap_or_default();
        self.items.push(item);
        Ok(())
    }

    fn finish(self) -> Result<Option<String>> {
        Ok(Some(value::format_array(self.items)))
    }
}

impl<'f> ser::SerializeSeq for ArrayWriter<'f> {
    type Ok = Option<String>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<String>> {
        self.finish()
    }
}

impl<'f> ser::SerializeTuple for ArrayWriter<'f> {
    type Ok = Option<String>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<String>> {
        self.finish()
    }
}

impl<'f> ser::SerializeTupleStruct for ArrayWriter<'f> {
    type Ok = Option<String>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<String>> {
        self.finish()
    }
}
