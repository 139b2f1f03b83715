//! Serde adapters for `chrono::TimeDelta`, encoded as whole seconds.
//!
//! Use with `#[serde(with = "verdant_types::serde_duration::seconds")]` or
//! `#[serde(with = "verdant_types::serde_duration::option_seconds")]`.

/// `TimeDelta` <-> `i64` seconds. Sub-second precision is truncated.
pub mod seconds {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialize a `TimeDelta` as whole seconds.
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    /// Deserialize whole seconds into a `TimeDelta`.
    ///
    /// # Errors
    /// Fails when the value is out of `TimeDelta` range.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TimeDelta, D::Error> {
        let secs = i64::deserialize(d)?;
        TimeDelta::try_seconds(secs)
            .ok_or_else(|| D::Error::custom(format!("duration out of range: {secs}s")))
    }
}

/// `Option<TimeDelta>` <-> nullable `i64` seconds.
pub mod option_seconds {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialize an optional `TimeDelta` as whole seconds or `null`.
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(d: &Option<TimeDelta>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.num_seconds()),
            None => s.serialize_none(),
        }
    }

    /// Deserialize nullable whole seconds into an optional `TimeDelta`.
    ///
    /// # Errors
    /// Fails when the value is out of `TimeDelta` range.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TimeDelta>, D::Error> {
        match Option::<i64>::deserialize(d)? {
            Some(secs) => TimeDelta::try_seconds(secs)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("duration out of range: {secs}s"))),
            None => Ok(None),
        }
    }
}
