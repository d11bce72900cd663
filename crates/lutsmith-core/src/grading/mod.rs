//! Grading stages — sliders, curves, HSL, split toning, and calibration.

pub mod calibration;
pub mod curves;
pub mod hsl;
pub mod sliders;
pub mod split_toning;
