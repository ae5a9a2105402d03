use indexmap::IndexMap;
use std::fmt::{self, Display, Formatter, Write};
use std::ops::Index;

/// Ordered php array, iteration follows insertion order
pub type Array = IndexMap<Key, Value>;

/// A statically parsed php value
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Array),
    /// The value depends on a runtime variable and is not statically known
    Unresolved,
}

/// A php array key
#[derive(Debug, Eq, PartialEq, Hash, Clone, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    String(String),
}

impl Key {
    /// Build a key from a string key the way php does, integer-like strings become integer keys
    ///
    /// Only canonical decimal integers are converted, `"05"` or `"+5"` stay string keys.
    pub fn from_string(key: String) -> Key {
        let digits = key.strip_prefix('-').unwrap_or(&key);
        let canonical = match digits.as_bytes() {
            [b'0'] => key.len() == 1,
            [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
            _ => false,
        };
        match key.parse() {
            Ok(int) if canonical => Key::Int(int),
            _ => Key::String(key),
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Key::Int(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Key::String(_))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(int) => Some(*int),
            Key::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::String(str) => Some(str.as_str()),
        }
    }
}

impl From<i64> for Key {
    fn from(int: i64) -> Self {
        Key::Int(int)
    }
}

impl From<&str> for Key {
    fn from(str: &str) -> Self {
        Key::String(str.into())
    }
}

impl From<String> for Key {
    fn from(str: String) -> Self {
        Key::String(str)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(int) => write!(f, "{}", int),
            Key::String(str) => write!(f, "{}", str),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Value::Unresolved)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(bool) => Some(*bool),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(int) => Some(*int),
            _ => None,
        }
    }

    /// Get the value as float, integers are converted
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(int) => Some(*int as f64),
            Value::Float(float) => Some(*float),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(str) => Some(str.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    /// Convert the value into an array key following php's key casting rules
    ///
    /// Bools become `0` or `1`, floats are truncated, null becomes the empty string and
    /// integer-like strings become integer keys. Arrays and unresolved values can't be keys.
    pub fn into_key(self) -> Option<Key> {
        match self {
            Value::Null => Some(Key::String(String::new())),
            Value::Bool(bool) => Some(Key::Int(bool as i64)),
            Value::Int(int) => Some(Key::Int(int)),
            Value::Float(float) if float.is_finite() => Some(Key::Int(float as i64)),
            Value::String(string) => Some(Key::from_string(string)),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Iterate over the keys of an array, empty for any other value
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.as_array().into_iter().flat_map(|array| array.keys())
    }

    /// Iterate over the values of an array, empty for any other value
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.as_array().into_iter().flat_map(|array| array.values())
    }

    /// Get a value from an array, `None` for missing keys or non-array values
    pub fn get<K: Into<Key>>(&self, key: K) -> Option<&Value> {
        self.as_array()?.get(&key.into())
    }
}

static NULL: Value = Value::Null;

impl Index<&Key> for Value {
    type Output = Value;

    /// Missing keys and non-array values index to [`Value::Null`]
    fn index(&self, index: &Key) -> &Self::Output {
        self.as_array()
            .and_then(|array| array.get(index))
            .unwrap_or(&NULL)
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, index: &str) -> &Self::Output {
        &self[&Key::from(index)]
    }
}

impl Index<i64> for Value {
    type Output = Value;

    fn index(&self, index: i64) -> &Self::Output {
        &self[&Key::Int(index)]
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

macro_rules! impl_int_eq {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    self.as_int() == Some(i64::from(*other))
                }
            }
        )*
    };
}

impl_int_eq!(i8, i16, i32, i64, u8, u16, u32);

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(float) if float == other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl From<bool> for Value {
    fn from(bool: bool) -> Self {
        Value::Bool(bool)
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Self {
        Value::Int(int)
    }
}

impl From<f64> for Value {
    fn from(float: f64) -> Self {
        Value::Float(float)
    }
}

impl From<&str> for Value {
    fn from(str: &str) -> Self {
        Value::String(str.into())
    }
}

impl From<String> for Value {
    fn from(str: String) -> Self {
        Value::String(str)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    /// Collect into a list with keys `0..n`
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(
            (0..)
                .map(Key::Int)
                .zip(iter.into_iter().map(Into::into))
                .collect(),
        )
    }
}

/// Formats the value as a short syntax php literal which parses back into an equal value.
///
/// Infinite floats are written as float literals too large to represent. Negative integer
/// keys are written as quoted strings because the grammar only accepts
/// unsigned literals in key position, they are converted back by [`Key::from_string`].
/// Unresolved values are written as a variable reference.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(bool) => write!(f, "{}", bool),
            Value::Int(int) => write!(f, "{}", int),
            Value::Float(float) if float.is_infinite() => {
                f.write_str(if *float < 0.0 { "-1.0e999" } else { "1.0e999" })
            }
            Value::Float(float) => write!(f, "{:?}", float),
            Value::String(str) => write_php_string(f, str),
            Value::Array(array) => {
                f.write_char('[')?;
                for (i, (key, value)) in array.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match key {
                        Key::Int(int) if *int >= 0 => write!(f, "{}", int)?,
                        key => write_php_string(f, &key.to_string())?,
                    }
                    write!(f, " => {}", value)?;
                }
                f.write_char(']')
            }
            Value::Unresolved => f.write_str("$unresolved"),
        }
    }
}

fn write_php_string(f: &mut Formatter<'_>, str: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in str.chars() {
        if matches!(c, '\\' | '\'') {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    #[test]
    fn test_key_from_string() {
        assert_eq!(Key::from_string("5".into()), Key::Int(5));
        assert_eq!(Key::from_string("-3".into()), Key::Int(-3));
        assert_eq!(Key::from_string("0".into()), Key::Int(0));
        assert_eq!(Key::from_string("05".into()), Key::String("05".into()));
        assert_eq!(Key::from_string("-0".into()), Key::String("-0".into()));
        assert_eq!(Key::from_string("+5".into()), Key::String("+5".into()));
        assert_eq!(Key::from_string("1.5".into()), Key::String("1.5".into()));
        assert_eq!(Key::from_string("".into()), Key::String("".into()));
        assert_eq!(
            Key::from_string("99999999999999999999".into()),
            Key::String("99999999999999999999".into())
        );
    }

    #[test]
    fn test_into_key() {
        assert_eq!(Value::Int(3).into_key(), Some(Key::Int(3)));
        assert_eq!(Value::from("3").into_key(), Some(Key::Int(3)));
        assert_eq!(Value::from("foo").into_key(), Some(Key::from("foo")));
        assert_eq!(Value::Bool(true).into_key(), Some(Key::Int(1)));
        assert_eq!(Value::Float(1.7).into_key(), Some(Key::Int(1)));
        assert_eq!(Value::Null.into_key(), Some(Key::from("")));
        assert_eq!(Value::Unresolved.into_key(), None);
        assert_eq!(Value::Array(Array::new()).into_key(), None);
    }

    #[test]
    fn test_index() {
        let value = Value::Array(indexmap! {
            Key::from("foo") => Value::Bool(true),
            Key::Int(3) => Value::from("three"),
        });

        assert_eq!(value["foo"], true);
        assert_eq!(value[3i64], "three");
        assert!(value["missing"].is_null());
        assert!(value["foo"]["nested"].is_null());
        assert_eq!(value.get("foo"), Some(&Value::Bool(true)));
        assert_eq!(value.get(4i64), None);
        assert_eq!(
            value.keys().cloned().collect::<Vec<_>>(),
            vec![Key::from("foo"), Key::Int(3)]
        );
    }

    #[test]
    fn test_collect() {
        let value: Value = vec![1i64, 2].into_iter().collect();
        assert_eq!(
            value,
            Value::Array(indexmap! {
                Key::Int(0) => Value::Int(1),
                Key::Int(1) => Value::Int(2),
            })
        );
    }

    #[test]
    fn test_display() {
        let value = Value::Array(indexmap! {
            Key::from("name") => Value::from("it's"),
            Key::Int(-1) => Value::Float(1.0),
            Key::Int(4) => Value::Array(indexmap! {
                Key::Int(0) => Value::Null,
                Key::Int(1) => Value::Unresolved,
            }),
            Key::from("path") => Value::from("a\\b"),
            Key::from("inf") => Value::Float(f64::NEG_INFINITY),
        });
        assert_eq!(
            value.to_string(),
            r#"['name' => 'it\'s', '-1' => 1.0, 4 => [0 => null, 1 => $unresolved], 'path' => 'a\\b', 'inf' => -1.0e999]"#
        );
    }
}
