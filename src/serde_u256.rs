//! Serde `with`-module storing a `U256` as a decimal string, so Q64.96 prices survive JSON
//! untouched.

use ethnum::U256;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    U256::from_str_radix(s.trim(), 10).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use ethnum::U256;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Wrapper {
        #[serde(with = "crate::serde_u256")]
        price: U256,
    }

    #[test]
    fn should_encode_as_decimal_string() {
        let wrapper = Wrapper {
            price: U256::ONE << 96_u32,
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"price":"79228162514264337593543950336"}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&json).unwrap(), wrapper);
    }

    #[test]
    fn should_reject_non_decimal_input() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"price":"0x10"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"price":12}"#).is_err());
    }
}
