use crate::error::ParseError;
use crate::parser::parse_literal;
use crate::value::{Array, Key, Value};
use indexmap::map;
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    Unexpected, VariantAccess, Visitor,
};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde::{forward_to_deserialize_any, Deserialize, Deserializer};
use std::fmt;

type Result<T> = std::result::Result<T, ParseError>;

/// Parse an array literal into any deserializable type
///
/// ## Example
///
/// ```rust
/// use php_array_parser::from_str;
/// use std::collections::HashMap;
/// # use std::error::Error;
///
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let map: HashMap<String, Vec<u8>> = from_str(r#"["foo" => [1, 2], "bar" => array(3)]"#)?;
///
/// assert_eq!(map["foo"], vec![1, 2]);
/// assert_eq!(map["bar"], vec![3]);
/// # Ok(())
/// # }
/// ```
///
/// Unresolved values deserialize as unit, so they map to `None` in options.
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse_literal(s)?)
}

/// Convert a parsed value into any deserializable type
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

impl Value {
    fn unexpected(&self) -> Unexpected {
        match self {
            Value::Null => Unexpected::Unit,
            Value::Bool(bool) => Unexpected::Bool(*bool),
            Value::Int(int) => Unexpected::Signed(*int),
            Value::Float(float) => Unexpected::Float(*float),
            Value::String(str) => Unexpected::Str(str),
            Value::Array(_) => Unexpected::Map,
            Value::Unresolved => Unexpected::Other("unresolved variable"),
        }
    }

    fn invalid_type<T, E: de::Expected>(&self, expected: &E) -> Result<T> {
        Err(de::Error::invalid_type(self.unexpected(), expected))
    }
}

impl<'de> Deserializer<'de> for Value {
    type Error = ParseError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Null | Value::Unresolved => visitor.visit_unit(),
            Value::Bool(bool) => visitor.visit_bool(bool),
            Value::Int(int) => visitor.visit_i64(int),
            Value::Float(float) => visitor.visit_f64(float),
            Value::String(str) => visitor.visit_string(str),
            Value::Array(array) if is_list(&array) => visitor.visit_seq(SeqDeserializer::new(array)),
            Value::Array(array) => visitor.visit_map(MapDeserializer::new(array)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Null | Value::Unresolved => visitor.visit_none(),
            value => visitor.visit_some(value),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array)),
            value => value.invalid_type(&visitor),
        }
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

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Array(array) => visitor.visit_map(MapDeserializer::new(array)),
            value => value.invalid_type(&visitor),
        }
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

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            Value::Array(array) if array.len() == 1 => {
                let mut entries = array.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                    None => Err(de::Error::invalid_length(0, &"array with a single key")),
                }
            }
            Value::Array(array) => Err(de::Error::invalid_length(
                array.len(),
                &"array with a single key",
            )),
            value => value.invalid_type(&"string or array with a single key"),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct identifier
    }
}

impl<'de> IntoDeserializer<'de, ParseError> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

/// Arrays with keys `0..n` in order
fn is_list(array: &Array) -> bool {
    array
        .keys()
        .zip(0..)
        .all(|(key, index)| *key == Key::Int(index))
}

struct SeqDeserializer {
    iter: map::IntoValues<Key, Value>,
}

impl SeqDeserializer {
    fn new(array: Array) -> Self {
        SeqDeserializer {
            iter: array.into_values(),
        }
    }
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = ParseError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        self.iter
            .next()
            .map(|value| seed.deserialize(value))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: map::IntoIter<Key, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(array: Array) -> Self {
        MapDeserializer {
            iter: array.into_iter(),
            value: None,
        }
    }
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = ParseError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(KeyDeserializer(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(de::Error::custom("value is missing")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Integer keys can also be read as strings, for maps with string keys
struct KeyDeserializer(Key);

impl<'de> Deserializer<'de> for KeyDeserializer {
    type Error = ParseError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            Key::Int(int) => visitor.visit_i64(int),
            Key::String(str) => visitor.visit_string(str),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.0.to_string())
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map struct enum ignored_any
    }
}

struct EnumDeserializer {
    variant: Key,
    value: Value,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = ParseError;
    type Variant = Value;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(KeyDeserializer(self.variant))?;
        Ok((variant, self.value))
    }
}

impl<'de> VariantAccess<'de> for Value {
    type Error = ParseError;

    fn unit_variant(self) -> Result<()> {
        match self {
            Value::Null => Ok(()),
            value => value.invalid_type(&"unit variant"),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Key::Int(int) => serializer.serialize_i64(*int),
            Key::String(str) => serializer.serialize_str(str),
        }
    }
}

/// Arrays with keys `0..n` serialize as sequences, all other arrays as maps.
/// Unresolved values serialize as unit.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Unresolved => serializer.serialize_unit(),
            Value::Bool(bool) => serializer.serialize_bool(*bool),
            Value::Int(int) => serializer.serialize_i64(*int),
            Value::Float(float) => serializer.serialize_f64(*float),
            Value::String(str) => serializer.serialize_str(str),
            Value::Array(array) if is_list(array) => {
                let mut seq = serializer.serialize_seq(Some(array.len()))?;
                for value in array.values() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Array(array) => {
                let mut map = serializer.serialize_map(Some(array.len()))?;
                for (key, value) in array {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = Key;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or string array key")
            }

            fn visit_i64<E: de::Error>(self, int: i64) -> std::result::Result<Key, E> {
                Ok(Key::Int(int))
            }

            fn visit_u64<E: de::Error>(self, int: u64) -> std::result::Result<Key, E> {
                i64::try_from(int)
                    .map(Key::Int)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(int), &self))
            }

            fn visit_str<E: de::Error>(self, str: &str) -> std::result::Result<Key, E> {
                Ok(Key::from_string(str.into()))
            }

            fn visit_string<E: de::Error>(self, str: String) -> std::result::Result<Key, E> {
                Ok(Key::from_string(str))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("any php value")
            }

            fn visit_bool<E: de::Error>(self, bool: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(bool))
            }

            fn visit_i64<E: de::Error>(self, int: i64) -> std::result::Result<Value, E> {
                Ok(Value::Int(int))
            }

            fn visit_u64<E: de::Error>(self, int: u64) -> std::result::Result<Value, E> {
                // php turns integers that don't fit into floats
                Ok(i64::try_from(int).map_or(Value::Float(int as f64), Value::Int))
            }

            fn visit_f64<E: de::Error>(self, float: f64) -> std::result::Result<Value, E> {
                Ok(Value::Float(float))
            }

            fn visit_str<E: de::Error>(self, str: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(str.into()))
            }

            fn visit_string<E: de::Error>(self, str: String) -> std::result::Result<Value, E> {
                Ok(Value::String(str))
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Value::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut array = Array::with_capacity(seq.size_hint().unwrap_or_default());
                let mut index = 0;
                while let Some(value) = seq.next_element()? {
                    array.insert(Key::Int(index), value);
                    index += 1;
                }
                Ok(Value::Array(array))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut array = Array::with_capacity(map.size_hint().unwrap_or_default());
                while let Some((key, value)) = map.next_entry()? {
                    array.insert(key, value);
                }
                Ok(Value::Array(array))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
