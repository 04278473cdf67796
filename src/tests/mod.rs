pub mod pool_properties;
