use ethnum::U256;
use num_bigint::BigUint;

/// Narrows an arbitrary-precision value back into 256 bits.
/// Returns None if the value does not fit.
pub fn big_uint_to_u256(value: &BigUint) -> Option<U256> {
    if value.bits() > 256 {
        return None;
    }
    let value_bytes = value.to_bytes_be();
    let mut buffer = [0u8; 32];
    buffer[32 - value_bytes.len()..].copy_from_slice(&value_bytes);
    Some(U256::from_be_bytes(buffer))
}

pub fn u256_to_big_uint(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes())
}
