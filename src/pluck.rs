//! Field projection over collections of records.
//!
//! [`Collection::pluck_with`] takes an accessor closure and keeps full static typing.
//! [`Collection::pluck`] looks a field up by name at runtime. It drives each element
//! through a probing `serde::Serializer`, so anything that implements `Serialize` as a
//! struct, a struct variant, or a string-keyed map can be plucked. Newtype wrappers,
//! `Some(..)`, `Box` and references are looked through.
//!
//! Plucked values are widened into [`Plucked`]:
//!
//! | Field category                        | Result                          |
//! |---------------------------------------|---------------------------------|
//! | `i8`..`i64` (`i128` when it fits)      | [`Plucked::Int`]                |
//! | `u8`..`u64` (`u128` when it fits)      | [`Plucked::Uint`]               |
//! | `f32`, `f64`                          | [`Plucked::Float`]              |
//! | strings, chars, unit enum variants    | [`Plucked::Text`] (raw text)    |
//! | anything else                         | [`Plucked::Text`] (compact JSON)|

use std::fmt;

use serde::ser::{self, Impossible, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::collection::Collection;
use crate::error::{CollectionError, Result};

/// A field value extracted by [`Collection::pluck`], widened by category.
#[derive(Debug, Clone, PartialEq)]
pub enum Plucked {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

impl Plucked {
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Plucked::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Plucked::Uint(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Plucked::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Plucked::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Plucked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plucked::Int(value) => fmt::Display::fmt(value, f),
            Plucked::Uint(value) => fmt::Display::fmt(value, f),
            Plucked::Float(value) => fmt::Display::fmt(value, f),
            Plucked::Text(text) => f.write_str(text),
        }
    }
}

impl PartialEq<i64> for Plucked {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<u64> for Plucked {
    fn eq(&self, other: &u64) -> bool {
        self.as_u64() == Some(*other)
    }
}

impl PartialEq<f64> for Plucked {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl PartialEq<str> for Plucked {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Plucked {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<String> for Plucked {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == Some(other.as_str())
    }
}

impl<T, const N: usize> Collection<T, N> {
    /// Projects every element through `accessor`, keeping order and length.
    ///
    /// ```rust
    /// use fluent_collection::collect;
    ///
    /// struct User { id: u32, name: &'static str }
    ///
    /// let users = collect([User { id: 1, name: "John" }, User { id: 2, name: "Jane" }]);
    /// assert_eq!(users.pluck_with(|u| u.id), [1, 2]);
    /// assert_eq!(users.pluck_with(|u| u.name).last(), Ok(&"Jane"));
    /// ```
    pub fn pluck_with<U, F>(&self, accessor: F) -> Collection<U, N>
    where
        F: FnMut(&T) -> U,
    {
        self.map(accessor)
    }
}

impl<T: Serialize, const N: usize> Collection<T, N> {
    /// Extracts the field called `field` from every element.
    ///
    /// Fails with [`CollectionError::MissingField`] if any element lacks the field and
    /// with [`CollectionError::UnsupportedElementShape`] if any element is not a record.
    /// On failure nothing is returned for the elements that did succeed.
    ///
    /// Fields are seen as serde serializes them. A field that serde skips, whether by
    /// `#[serde(skip)]` or by a `skip_serializing_if` that holds for this element, looks
    /// missing. Composite values whose map keys JSON cannot express, such as tuple keys,
    /// are still rendered as text, with each key written as its own compact JSON.
    ///
    /// ```rust
    /// use fluent_collection::{collect, Plucked};
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User { id: i32, name: String }
    ///
    /// let users = collect([
    ///     User { id: 1, name: "John".into() },
    ///     User { id: 3, name: "Charlie".into() },
    /// ]);
    /// let ids = users.pluck("id").unwrap();
    /// assert_eq!(ids.first(), Ok(&Plucked::Int(1)));
    /// assert_eq!(*users.pluck("name").unwrap().last().unwrap(), "Charlie");
    /// ```
    pub fn pluck(&self, field: &str) -> Result<Collection<Plucked, N>> {
        let mut plucked = Collection::with_capacity(self.count());
        for (index, item) in self.iter().enumerate() {
            let value = item
                .serialize(RecordProbe { field })
                .map_err(|err| err.into_collection_error(index))
                .and_then(|found| {
                    found.ok_or_else(|| CollectionError::MissingField {
                        field: field.to_owned(),
                        index,
                    })
                });
            match value {
                Ok(value) => {
                    plucked.add(value);
                }
                Err(err) => {
                    log::debug!("pluck of `{}` failed: {}", field, err);
                    return Err(err);
                }
            }
        }
        Ok(plucked)
    }
}

// --- Probing Serializers ---

#[derive(Debug)]
enum ProbeError {
    /// The element itself is not a record.
    NotRecord(&'static str),
    /// The field value is not a widened scalar and is rendered as JSON text instead.
    Fallback,
    /// Raised by a `Serialize` impl or by the JSON renderer.
    Custom(String),
}

impl ProbeError {
    fn into_collection_error(self, index: usize) -> CollectionError {
        let shape = match self {
            ProbeError::NotRecord(shape) => shape,
            ProbeError::Fallback | ProbeError::Custom(_) => "unserializable value",
        };
        CollectionError::UnsupportedElementShape { index, shape }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::NotRecord(shape) => write!(f, "not a record: {}", shape),
            ProbeError::Fallback => f.write_str("value is not a scalar"),
            ProbeError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ProbeError {}

impl ser::Error for ProbeError {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        ProbeError::Custom(msg.to_string())
    }
}

fn widen<V>(value: &V) -> core::result::Result<Plucked, ProbeError>
where
    V: ?Sized + Serialize,
{
    match value.serialize(ScalarProbe) {
        Err(ProbeError::Fallback) => match serde_json::to_string(value) {
            Ok(text) => Ok(Plucked::Text(text)),
            // JSON only accepts string map keys; render the rest as text keys.
            Err(_) => value.serialize(TextValue).map(|v| Plucked::Text(v.to_string())),
        },
        other => other,
    }
}

fn not_record<O>(shape: &'static str) -> core::result::Result<O, ProbeError> {
    Err(ProbeError::NotRecord(shape))
}

/// Walks an element looking for a named field. `Ok(None)` means the element is a
/// record without that field.
#[derive(Clone, Copy)]
struct RecordProbe<'f> {
    field: &'f str,
}

struct StructProbe<'f> {
    field: &'f str,
    found: Option<Plucked>,
}

struct MapProbe<'f> {
    field: &'f str,
    matched: bool,
    found: Option<Plucked>,
}

type ProbeResult = core::result::Result<Option<Plucked>, ProbeError>;

impl<'f> Serializer for RecordProbe<'f> {
    type Ok = Option<Plucked>;
    type Error = ProbeError;
    type SerializeSeq = Impossible<Option<Plucked>, ProbeError>;
    type SerializeTuple = Impossible<Option<Plucked>, ProbeError>;
    type SerializeTupleStruct = Impossible<Option<Plucked>, ProbeError>;
    type SerializeTupleVariant = Impossible<Option<Plucked>, ProbeError>;
    type SerializeMap = MapProbe<'f>;
    type SerializeStruct = StructProbe<'f>;
    type SerializeStructVariant = StructProbe<'f>;

    fn serialize_bool(self, _v: bool) -> ProbeResult {
        not_record("bool")
    }

    fn serialize_i8(self, _v: i8) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_i16(self, _v: i16) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_i32(self, _v: i32) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_i64(self, _v: i64) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_i128(self, _v: i128) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_u8(self, _v: u8) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_u16(self, _v: u16) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_u32(self, _v: u32) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_u64(self, _v: u64) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_u128(self, _v: u128) -> ProbeResult {
        not_record("integer")
    }

    fn serialize_f32(self, _v: f32) -> ProbeResult {
        not_record("float")
    }

    fn serialize_f64(self, _v: f64) -> ProbeResult {
        not_record("float")
    }

    fn serialize_char(self, _v: char) -> ProbeResult {
        not_record("char")
    }

    fn serialize_str(self, _v: &str) -> ProbeResult {
        not_record("string")
    }

    fn serialize_bytes(self, _v: &[u8]) -> ProbeResult {
        not_record("bytes")
    }

    fn serialize_none(self) -> ProbeResult {
        not_record("none")
    }

    fn serialize_some<V>(self, value: &V) -> ProbeResult
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ProbeResult {
        not_record("unit")
    }

    fn serialize_unit_struct(self, _name: &'static str) -> ProbeResult {
        not_record("unit struct")
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> ProbeResult {
        not_record("unit variant")
    }

    fn serialize_newtype_struct<V>(self, _name: &'static str, value: &V) -> ProbeResult
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<V>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &V,
    ) -> ProbeResult
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_seq(
        self,
        _len: Option<usize>,
    ) -> core::result::Result<Self::SerializeSeq, ProbeError> {
        not_record("sequence")
    }

    fn serialize_tuple(
        self,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTuple, ProbeError> {
        not_record("tuple")
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTupleStruct, ProbeError> {
        not_record("tuple struct")
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTupleVariant, ProbeError> {
        not_record("tuple variant")
    }

    fn serialize_map(
        self,
        _len: Option<usize>,
    ) -> core::result::Result<Self::SerializeMap, ProbeError> {
        Ok(MapProbe {
            field: self.field,
            matched: false,
            found: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeStruct, ProbeError> {
        Ok(StructProbe {
            field: self.field,
            found: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeStructVariant, ProbeError> {
        Ok(StructProbe {
            field: self.field,
            found: None,
        })
    }
}

impl StructProbe<'_> {
    fn visit<V>(&mut self, key: &str, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        if self.found.is_none() && key == self.field {
            self.found = Some(widen(value)?);
        }
        Ok(())
    }
}

impl ser::SerializeStruct for StructProbe<'_> {
    type Ok = Option<Plucked>;
    type Error = ProbeError;

    fn serialize_field<V>(
        &mut self,
        key: &'static str,
        value: &V,
    ) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.visit(key, value)
    }

    fn end(self) -> core::result::Result<Option<Plucked>, ProbeError> {
        Ok(self.found)
    }
}

impl ser::SerializeStructVariant for StructProbe<'_> {
    type Ok = Option<Plucked>;
    type Error = ProbeError;

    fn serialize_field<V>(
        &mut self,
        key: &'static str,
        value: &V,
    ) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.visit(key, value)
    }

    fn end(self) -> core::result::Result<Option<Plucked>, ProbeError> {
        Ok(self.found)
    }
}

impl ser::SerializeMap for MapProbe<'_> {
    type Ok = Option<Plucked>;
    type Error = ProbeError;

    fn serialize_key<K>(&mut self, key: &K) -> core::result::Result<(), ProbeError>
    where
        K: ?Sized + Serialize,
    {
        // Only string keys can name a field.
        self.matched = self.found.is_none()
            && matches!(
                serde_json::to_value(key),
                Ok(serde_json::Value::String(name)) if name == self.field
            );
        Ok(())
    }

    fn serialize_value<V>(&mut self, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        if self.matched {
            self.found = Some(widen(value)?);
            self.matched = false;
        }
        Ok(())
    }

    fn end(self) -> core::result::Result<Option<Plucked>, ProbeError> {
        Ok(self.found)
    }
}

/// Widens a scalar field value. Anything without a widening rule yields
/// `ProbeError::Fallback`.
struct ScalarProbe;

type ScalarResult = core::result::Result<Plucked, ProbeError>;

impl Serializer for ScalarProbe {
    type Ok = Plucked;
    type Error = ProbeError;
    type SerializeSeq = Impossible<Plucked, ProbeError>;
    type SerializeTuple = Impossible<Plucked, ProbeError>;
    type SerializeTupleStruct = Impossible<Plucked, ProbeError>;
    type SerializeTupleVariant = Impossible<Plucked, ProbeError>;
    type SerializeMap = Impossible<Plucked, ProbeError>;
    type SerializeStruct = Impossible<Plucked, ProbeError>;
    type SerializeStructVariant = Impossible<Plucked, ProbeError>;

    fn serialize_bool(self, _v: bool) -> ScalarResult {
        Err(ProbeError::Fallback)
    }

    fn serialize_i8(self, v: i8) -> ScalarResult {
        Ok(Plucked::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> ScalarResult {
        Ok(Plucked::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> ScalarResult {
        Ok(Plucked::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> ScalarResult {
        Ok(Plucked::Int(v))
    }

    fn serialize_i128(self, v: i128) -> ScalarResult {
        i64::try_from(v)
            .map(Plucked::Int)
            .map_err(|_| ProbeError::Fallback)
    }

    fn serialize_u8(self, v: u8) -> ScalarResult {
        Ok(Plucked::Uint(u64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> ScalarResult {
        Ok(Plucked::Uint(u64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> ScalarResult {
        Ok(Plucked::Uint(u64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> ScalarResult {
        Ok(Plucked::Uint(v))
    }

    fn serialize_u128(self, v: u128) -> ScalarResult {
        u64::try_from(v)
            .map(Plucked::Uint)
            .map_err(|_| ProbeError::Fallback)
    }

    fn serialize_f32(self, v: f32) -> ScalarResult {
        Ok(Plucked::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> ScalarResult {
        Ok(Plucked::Float(v))
    }

    fn serialize_char(self, v: char) -> ScalarResult {
        Ok(Plucked::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> ScalarResult {
        Ok(Plucked::Text(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> ScalarResult {
        Err(ProbeError::Fallback)
    }

    fn serialize_none(self) -> ScalarResult {
        Err(ProbeError::Fallback)
    }

    fn serialize_some<V>(self, value: &V) -> ScalarResult
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ScalarResult {
        Err(ProbeError::Fallback)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> ScalarResult {
        Err(ProbeError::Fallback)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> ScalarResult {
        Ok(Plucked::Text(variant.to_owned()))
    }

    fn serialize_newtype_struct<V>(self, _name: &'static str, value: &V) -> ScalarResult
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<V>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &V,
    ) -> ScalarResult
    where
        V: ?Sized + Serialize,
    {
        Err(ProbeError::Fallback)
    }

    fn serialize_seq(
        self,
        _len: Option<usize>,
    ) -> core::result::Result<Self::SerializeSeq, ProbeError> {
        Err(ProbeError::Fallback)
    }

    fn serialize_tuple(
        self,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTuple, ProbeError> {
        Err(ProbeError::Fallback)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTupleStruct, ProbeError> {
        Err(ProbeError::Fallback)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeTupleVariant, ProbeError> {
        Err(ProbeError::Fallback)
    }

    fn serialize_map(
        self,
        _len: Option<usize>,
    ) -> core::result::Result<Self::SerializeMap, ProbeError> {
        Err(ProbeError::Fallback)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeStruct, ProbeError> {
        Err(ProbeError::Fallback)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> core::result::Result<Self::SerializeStructVariant, ProbeError> {
        Err(ProbeError::Fallback)
    }
}

/// Renders any serializable value as a `serde_json::Value`, turning map keys that are
/// not strings into their compact JSON text.
struct TextValue;

type TextResult = core::result::Result<Value, ProbeError>;

fn text_key(key: Value) -> String {
    match key {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

impl Serializer for TextValue {
    type Ok = Value;
    type Error = ProbeError;
    type SerializeSeq = TextSeq;
    type SerializeTuple = TextSeq;
    type SerializeTupleStruct = TextSeq;
    type SerializeTupleVariant = TextSeq;
    type SerializeMap = TextMap;
    type SerializeStruct = TextMap;
    type SerializeStructVariant = TextMap;

    fn serialize_bool(self, v: bool) -> TextResult {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> TextResult {
        if let Ok(small) = i64::try_from(v) {
            Ok(Value::from(small))
        } else if let Ok(unsigned) = u64::try_from(v) {
            Ok(Value::from(unsigned))
        } else {
            Ok(Value::String(v.to_string()))
        }
    }

    fn serialize_u8(self, v: u8) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> TextResult {
        Ok(u64::try_from(v).map_or_else(|_| Value::String(v.to_string()), Value::from))
    }

    fn serialize_f32(self, v: f32) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> TextResult {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> TextResult {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> TextResult {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> TextResult {
        Ok(Value::Array(v.iter().copied().map(Value::from).collect()))
    }

    fn serialize_none(self) -> TextResult {
        Ok(Value::Null)
    }

    fn serialize_some<V>(self, value: &V) -> TextResult
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> TextResult {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> TextResult {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> TextResult {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<V>(self, _name: &'static str, value: &V) -> TextResult
    where
        V: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<V>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &V,
    ) -> TextResult
    where
        V: ?Sized + Serialize,
    {
        let mut object = Map::new();
        object.insert(variant.to_owned(), value.serialize(TextValue)?);
        Ok(Value::Object(object))
    }

    fn serialize_seq(self, len: Option<usize>) -> core::result::Result<TextSeq, ProbeError> {
        Ok(TextSeq {
            variant: None,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> core::result::Result<TextSeq, ProbeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> core::result::Result<TextSeq, ProbeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> core::result::Result<TextSeq, ProbeError> {
        Ok(TextSeq {
            variant: Some(variant),
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> core::result::Result<TextMap, ProbeError> {
        Ok(TextMap {
            variant: None,
            object: Map::new(),
            key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> core::result::Result<TextMap, ProbeError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> core::result::Result<TextMap, ProbeError> {
        Ok(TextMap {
            variant: Some(variant),
            object: Map::new(),
            key: None,
        })
    }
}

/// Sequences, tuples and tuple variants. A variant wraps the array as `{variant: [..]}`.
struct TextSeq {
    variant: Option<&'static str>,
    items: Vec<Value>,
}

impl TextSeq {
    fn push<V>(&mut self, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.items.push(value.serialize(TextValue)?);
        Ok(())
    }

    fn finish(self) -> TextResult {
        Ok(wrap_variant(self.variant, Value::Array(self.items)))
    }
}

fn wrap_variant(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut object = Map::new();
            object.insert(name.to_owned(), value);
            Value::Object(object)
        }
        None => value,
    }
}

impl ser::SerializeSeq for TextSeq {
    type Ok = Value;
    type Error = ProbeError;

    fn serialize_element<V>(&mut self, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> TextResult {
        self.finish()
    }
}

impl ser::SerializeTuple for TextSeq {
    type Ok = Value;
    type Error = ProbeError;

    fn serialize_element<V>(&mut self, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> TextResult {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for TextSeq {
    type Ok = Value;
    type Error = ProbeError;

    fn serialize_field<V>(&mut self, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> TextResult {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for TextSeq {
    type Ok = Value;
    type Error = ProbeError;

    fn serialize_field<V>(&mut self, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> TextResult {
        self.finish()
    }
}

/// Maps, structs and struct variants.
struct TextMap {
    variant: Option<&'static str>,
    object: Map<String, Value>,
    key: Option<String>,
}

impl TextMap {
    fn entry<V>(&mut self, key: String, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.object.insert(key, value.serialize(TextValue)?);
        Ok(())
    }

    fn finish(self) -> TextResult {
        Ok(wrap_variant(self.variant, Value::Object(self.object)))
    }
}

impl ser::SerializeMap for TextMap {
    type Ok = Value;
    type Error = ProbeError;

    fn serialize_key<K>(&mut self, key: &K) -> core::result::Result<(), ProbeError>
    where
        K: ?Sized + Serialize,
    {
        self.key = Some(text_key(key.serialize(TextValue)?));
        Ok(())
    }

    fn serialize_value<V>(&mut self, value: &V) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| ProbeError::Custom("map value without a key".to_owned()))?;
        self.entry(key, value)
    }

    fn end(self) -> TextResult {
        self.finish()
    }
}

impl ser::SerializeStruct for TextMap {
    type Ok = Value;
    type Error = ProbeError;

    fn serialize_field<V>(
        &mut self,
        key: &'static str,
        value: &V,
    ) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.entry(key.to_owned(), value)
    }

    fn end(self) -> TextResult {
        self.finish()
    }
}

impl ser::SerializeStructVariant for TextMap {
    type Ok = Value;
    type Error = ProbeError;

    fn serialize_field<V>(
        &mut self,
        key: &'static str,
        value: &V,
    ) -> core::result::Result<(), ProbeError>
    where
        V: ?Sized + Serialize,
    {
        self.entry(key.to_owned(), value)
    }

    fn end(self) -> TextResult {
        self.finish()
    }
}

// --- Test Suite ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::collect;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct TestObject {
        id: i32,
        name: String,
    }

    fn people() -> Collection<TestObject> {
        collect([
            TestObject {
                id: 1,
                name: "John".into(),
            },
            TestObject {
                id: 2,
                name: "Jane".into(),
            },
            TestObject {
                id: 3,
                name: "Charlie".into(),
            },
        ])
    }

    #[test]
    fn test_pluck_integer_and_text_fields() {
        let ids = people().pluck("id").unwrap();
        assert_eq!(ids.first(), Ok(&Plucked::Int(1)));
        assert_eq!(ids.last(), Ok(&Plucked::Int(3)));

        let names = people().pluck("name").unwrap();
        assert_eq!(*names.first().unwrap(), "John");
        assert_eq!(*names.last().unwrap(), "Charlie");
    }

    #[test]
    fn test_pluck_widens_by_category() {
        #[derive(Serialize)]
        enum Status {
            Active,
        }

        #[derive(Serialize)]
        struct Wide {
            small: i8,
            big: i128,
            huge: i128,
            byte: u8,
            count: u128,
            ratio: f32,
            initial: char,
            flag: bool,
            status: Status,
            tags: Vec<&'static str>,
            missing: Option<u16>,
            present: Option<u16>,
        }

        let items = collect([Wide {
            small: -8,
            big: 1 << 40,
            huge: i128::MAX,
            byte: 255,
            count: 7,
            ratio: 0.5,
            initial: 'J',
            flag: true,
            status: Status::Active,
            tags: vec!["a", "b"],
            missing: None,
            present: Some(9),
        }]);

        let pluck = |field: &str| items.pluck(field).unwrap().shift().unwrap();

        assert_eq!(pluck("small"), Plucked::Int(-8));
        assert_eq!(pluck("big"), Plucked::Int(1 << 40));
        assert_eq!(pluck("huge"), Plucked::Text(i128::MAX.to_string()));
        assert_eq!(pluck("byte"), Plucked::Uint(255));
        assert_eq!(pluck("count"), Plucked::Uint(7));
        assert_eq!(pluck("ratio"), Plucked::Float(0.5));
        assert_eq!(pluck("initial"), "J");
        assert_eq!(pluck("flag"), "true");
        assert_eq!(pluck("status"), "Active");
        assert_eq!(pluck("tags"), r#"["a","b"]"#);
        assert_eq!(pluck("missing"), "null");
        assert_eq!(pluck("present"), Plucked::Uint(9));
    }

    #[test]
    fn test_pluck_honours_serde_rename_and_newtypes() {
        #[derive(Serialize)]
        struct UserId(u32);

        #[derive(Serialize)]
        struct Record {
            #[serde(rename = "Id")]
            id: UserId,
        }

        let records = collect([Box::new(Record { id: UserId(4) })]);
        assert_eq!(records.pluck("Id").unwrap(), [Plucked::Uint(4)]);
        assert_eq!(
            records.pluck("id"),
            Err(CollectionError::MissingField {
                field: "id".into(),
                index: 0
            })
        );
    }

    #[test]
    fn test_pluck_from_string_keyed_maps_and_struct_variants() {
        let mut first = BTreeMap::new();
        first.insert("score", 10.5);
        let mut second = BTreeMap::new();
        second.insert("score", 2.0);
        let scores = collect([first, second]).pluck("score").unwrap();
        assert_eq!(scores, [Plucked::Float(10.5), Plucked::Float(2.0)]);

        #[derive(Serialize)]
        enum Event {
            Login { user: &'static str },
        }
        let events = collect([Event::Login { user: "jane" }]);
        assert_eq!(events.pluck("user").unwrap(), [Plucked::Text("jane".into())]);
    }

    #[test]
    fn test_pluck_missing_field_reports_index() {
        let mut first = BTreeMap::new();
        first.insert("name", "a");
        let mut second = BTreeMap::new();
        second.insert("other", "b");

        assert_eq!(
            collect([first, second]).pluck("name"),
            Err(CollectionError::MissingField {
                field: "name".into(),
                index: 1
            })
        );
    }

    #[test]
    fn test_pluck_rejects_non_record_elements() {
        assert_eq!(
            collect([1, 2, 3]).pluck("id"),
            Err(CollectionError::UnsupportedElementShape {
                index: 0,
                shape: "integer"
            })
        );
        assert_eq!(
            collect([vec![1]]).pluck("id"),
            Err(CollectionError::UnsupportedElementShape {
                index: 0,
                shape: "sequence"
            })
        );
        assert_eq!(
            collect([None::<TestObject>]).pluck("id"),
            Err(CollectionError::UnsupportedElementShape {
                index: 0,
                shape: "none"
            })
        );
    }

    #[test]
    fn test_pluck_renders_maps_with_composite_keys() {
        #[derive(Serialize)]
        struct Board {
            id: u32,
            grid: BTreeMap<(u8, u8), u8>,
        }

        let mut grid = BTreeMap::new();
        grid.insert((0, 1), 5);
        grid.insert((2, 3), 7);
        let boards = collect([Board { id: 1, grid }]);

        assert_eq!(boards.pluck("id").unwrap(), [Plucked::Uint(1)]);
        assert_eq!(
            boards.pluck("grid").unwrap(),
            [Plucked::Text(r#"{"[0,1]":5,"[2,3]":7}"#.into())]
        );
    }

    #[test]
    fn test_pluck_skipped_fields_look_missing() {
        #[derive(Serialize)]
        struct Profile {
            id: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            nick: Option<String>,
        }

        let profiles = collect([
            Profile {
                id: 1,
                nick: Some("jj".into()),
            },
            Profile { id: 2, nick: None },
        ]);

        assert_eq!(profiles.pluck("id").unwrap(), [Plucked::Uint(1), Plucked::Uint(2)]);
        assert_eq!(
            profiles.pluck("nick"),
            Err(CollectionError::MissingField {
                field: "nick".into(),
                index: 1
            })
        );
    }

    #[test]
    fn test_pluck_empty_collection_is_empty() {
        let empty: Collection<TestObject> = Collection::new();
        assert!(empty.pluck("id").unwrap().is_empty());
    }

    #[test]
    fn test_pluck_with_accessor() {
        let names = people().pluck_with(|person| person.name.clone());
        assert_eq!(names, ["John", "Jane", "Charlie"].map(String::from));

        let ids = people().pluck_with(|person| person.id);
        assert_eq!(ids.reduce(|sum, id| sum + *id, 0), 6);
    }

    #[test]
    fn test_plucked_accessors_and_display() {
        assert_eq!(Plucked::Int(-1).as_i64(), Some(-1));
        assert_eq!(Plucked::Int(-1).as_u64(), None);
        assert_eq!(Plucked::Uint(1).as_u64(), Some(1));
        assert_eq!(Plucked::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Plucked::Text("x".into()).as_str(), Some("x"));

        assert_eq!(Plucked::Int(-1), -1i64);
        assert_eq!(Plucked::Uint(1), 1u64);
        assert_eq!(Plucked::Float(1.5), 1.5f64);
        assert_eq!(Plucked::Text("x".into()), String::from("x"));

        assert_eq!(Plucked::Int(-1).to_string(), "-1");
        assert_eq!(Plucked::Float(2.5).to_string(), "2.5");
        assert_eq!(Plucked::Text("Jane".into()).to_string(), "Jane");
    }
}
