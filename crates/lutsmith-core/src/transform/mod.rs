//! Transform pipeline — settings, evaluation, and LUT generation.

pub mod evaluate;
pub mod lut;
pub mod params;
