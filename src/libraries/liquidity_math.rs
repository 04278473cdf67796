#[derive(Debug, Clone, PartialEq)]
pub enum AddDeltaError {
    Overflow,
    Underflow,
}

/// Applies a signed liquidity delta to an unsigned liquidity amount.
/// Errs instead of wrapping when the result leaves the u128 range.
pub fn add_delta(x: u128, y: i128) -> Result<u128, AddDeltaError> {
    if y >= 0 {
        x.checked_add(y as u128).ok_or(AddDeltaError::Overflow)
    } else {
        x.checked_sub(y.unsigned_abs())
            .ok_or(AddDeltaError::Underflow)
    }
}

/// Converts an unsigned liquidity amount to the signed form stored in `liquidity_net`.
pub fn to_signed(liquidity: u128) -> Result<i128, AddDeltaError> {
    i128::try_from(liquidity).map_err(|_| AddDeltaError::Overflow)
}
