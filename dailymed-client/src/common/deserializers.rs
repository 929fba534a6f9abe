//! Lenient serde deserializers for loosely-typed DailyMed payloads
//!
//! DailyMed metadata arrives as numbers in some endpoints, numeric strings in
//! others, and the literal string `"null"` when a page link does not exist.
//! The XML flavour of the same endpoints carries everything as text. These
//! deserializers accept all of those shapes and map anything unusable to
//! `None` instead of failing the whole payload.

use std::fmt;
use std::result;

use serde::Deserializer;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};

fn is_null_like(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("null")
}

/// Collect the `$text` / `$value` content of an XML element presented as a map
fn text_from_map<'de, M>(mut map: M) -> result::Result<String, M::Error>
where
    M: MapAccess<'de>,
{
    let mut text = String::new();
    while let Some(key) = map.next_key::<String>()? {
        if key == "$text" || key == "$value" {
            let value: String = map.next_value()?;
            text.push_str(&value);
        } else {
            let _: IgnoredAny = map.next_value()?;
        }
    }
    Ok(text)
}

/// Deserialize an optional unsigned integer from a number or numeric string
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientU64Visitor;

    impl<'de> Visitor<'de> for LenientU64Visitor {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an unsigned integer, a numeric string or null")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> result::Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> result::Result<Self::Value, E> {
            Ok(u64::try_from(value).ok())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> result::Result<Self::Value, E> {
            if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
                Ok(Some(value as u64))
            } else {
                Ok(None)
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> result::Result<Self::Value, E> {
            if is_null_like(value) {
                return Ok(None);
            }
            Ok(value.trim().parse::<u64>().ok())
        }

        fn visit_string<E: de::Error>(self, value: String) -> result::Result<Self::Value, E> {
            self.visit_str(&value)
        }

        fn visit_none<E: de::Error>(self) -> result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> result::Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_map<M>(self, map: M) -> result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let text = text_from_map(map)?;
            self.visit_str(&text)
        }
    }

    deserializer.deserialize_any(LenientU64Visitor)
}

/// Deserialize an optional string from a string, number or boolean
///
/// Blank strings and `"null"` become `None`; surrounding whitespace is trimmed.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientStringVisitor;

    impl<'de> Visitor<'de> for LenientStringVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> result::Result<Self::Value, E> {
            if is_null_like(value) {
                Ok(None)
            } else {
                Ok(Some(value.trim().to_string()))
            }
        }

        fn visit_string<E: de::Error>(self, value: String) -> result::Result<Self::Value, E> {
            self.visit_str(&value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> result::Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_map<M>(self, map: M) -> result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let text = text_from_map(map)?;
            self.visit_str(&text)
        }
    }

    deserializer.deserialize_any(LenientStringVisitor)
}
