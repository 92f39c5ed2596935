// Module name shadows the `serde` crate — use `::serde` for the external crate.
use std::str::FromStr;

use ::serde::{Deserialize, Deserializer, Serializer, de};
use sea_orm::prelude::Decimal;

/// Serialize a money amount as a string with exactly two decimal places (`"5.50"`).
pub fn to_decimal_2dp<S>(value: &Decimal, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&format!("{value:.2}"))
}

/// Amounts arrive either as JSON strings (`"4.50"`) or bare numbers (`4.5`).
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Str(String),
    Num(serde_json::Number),
}

impl DecimalRepr {
    fn parse<E: de::Error>(self) -> Result<Decimal, E> {
        let raw = match self {
            Self::Str(s) => s,
            Self::Num(n) => n.to_string(),
        };
        Decimal::from_str(raw.trim()).map_err(|_| E::custom(format!("invalid decimal: {raw}")))
    }
}

/// Deserialize a decimal from a string or a number.
pub fn from_decimal_str<'de, D>(d: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    DecimalRepr::deserialize(d)?.parse()
}

/// Like [`from_decimal_str`] for optional fields; use with `#[serde(default)]`.
pub fn from_optional_decimal_str<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DecimalRepr>::deserialize(d)?
        .map(DecimalRepr::parse)
        .transpose()
}
