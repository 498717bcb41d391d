pub mod product_economics;
pub mod weight_record;

// Re-exports for convenience
pub use product_economics::*;
pub use weight_record::*;
