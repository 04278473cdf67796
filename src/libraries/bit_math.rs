use ethnum::U256;

// Position of the most significant set bit, None if value == 0
pub fn get_msb_bit_position(value: &U256) -> Option<u8> {
    if value == &U256::ZERO {
        None
    } else {
        Some((255 - value.leading_zeros()) as u8)
    }
}

// Position of the least significant set bit, None if value == 0
pub fn get_lsb_bit_position(value: &U256) -> Option<u8> {
    if value == &U256::ZERO {
        None
    } else {
        Some(value.trailing_zeros() as u8)
    }
}
