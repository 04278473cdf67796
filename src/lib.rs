pub mod libraries;
pub mod logs;
pub mod pool;
pub mod position;
pub mod scenario;
pub mod serde_u128;
pub mod serde_u256;
pub mod state;
pub mod tick;

#[cfg(test)]
pub mod tests;
