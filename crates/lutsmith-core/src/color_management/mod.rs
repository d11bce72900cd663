//! Color management — LUT target color spaces and transfer functions.

pub mod color_space;
pub mod transfer;
