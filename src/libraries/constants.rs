use ethnum::U256;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref Q96: U256 = U256::ONE << 96_u32; // 2^96
    pub static ref Q128: U256 = U256::from_words(1, 0); // 2^128
    pub static ref U160_MAX: U256 = (U256::ONE << 160_u32) - U256::ONE;

    // sqrt_price_at(MIN_TICK) and sqrt_price_at(MAX_TICK)
    pub static ref MIN_SQRT_RATIO: U256 = U256::from(4295128739_u64);
    pub static ref MAX_SQRT_RATIO: U256 =
        U256::from_str_radix("1461446703485210103287273052203988822378723970342", 10).unwrap();
}

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;
