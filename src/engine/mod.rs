pub mod analyze;
pub mod correlation;
pub mod matrix;
pub mod normalize;
pub mod registry;
pub mod topsis;
