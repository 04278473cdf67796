//! Decimal-string `with`-modules for `u128`/`i128` liquidity values. JSON consumers and
//! `serde_json::Value` only carry 64-bit integers.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse().map_err(serde::de::Error::custom)
}

pub mod signed {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &i128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.trim().parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct TickLiquidity {
        #[serde(with = "crate::serde_u128")]
        gross: u128,
        #[serde(with = "crate::serde_u128::signed")]
        net: i128,
    }

    #[test]
    fn should_keep_full_width_liquidity_in_json_values() {
        let tick = TickLiquidity {
            gross: u128::MAX,
            net: i128::MIN,
        };
        let value = serde_json::to_value(&tick).unwrap();
        assert_eq!(value["gross"], u128::MAX.to_string());
        assert_eq!(value["net"], i128::MIN.to_string());
        assert_eq!(serde_json::from_value::<TickLiquidity>(value).unwrap(), tick);
    }

    #[test]
    fn should_reject_malformed_liquidity() {
        assert!(serde_json::from_str::<TickLiquidity>(r#"{"gross":"-1","net":"0"}"#).is_err());
        assert!(serde_json::from_str::<TickLiquidity>(r#"{"gross":"1","net":"1.5"}"#).is_err());
    }
}
