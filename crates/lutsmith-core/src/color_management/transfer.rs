//! Transfer functions (OETF/EOTF) for the camera log curves and display
//! gammas that LUT targets and preview surfaces are encoded in.
//!
//! Transfer functions convert between non-linear (encoded) and linear light
//! values using the published constants.

/// A transfer function that converts between linear and non-linear encodings.
pub trait TransferFunction: Send + Sync {
    /// Convert from non-linear (encoded) to linear light.
    fn to_linear(&self, encoded: f32) -> f32;

    /// Convert from linear light to non-linear (encoded).
    fn to_encoded(&self, linear: f32) -> f32;
}

// ---------------------------------------------------------------------------
// sRGB (IEC 61966-2-1)
// ---------------------------------------------------------------------------

/// sRGB piecewise gamma.
///
/// ```text
/// to_linear:   V <= 0.04045   → V / 12.92
///              otherwise      → ((V + 0.055) / 1.055) ^ 2.4
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SrgbTransfer;

impl TransferFunction for SrgbTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded <= 0.04045 {
            encoded / 12.92
        } else {
            ((encoded + 0.055) / 1.055).powf(2.4)
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        if linear <= 0.0031308 {
            linear * 12.92
        } else {
            1.055 * linear.powf(1.0 / 2.4) - 0.055
        }
    }
}

// ---------------------------------------------------------------------------
// Rec. 709 (ITU-R BT.709 OETF)
// ---------------------------------------------------------------------------

/// BT.709 camera OETF and its inverse.
///
/// ```text
/// to_encoded: L < 0.018 → 4.5 × L
///             otherwise → 1.099 × L^0.45 − 0.099
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Rec709Transfer;

impl Rec709Transfer {
    const BETA: f32 = 0.018;
    const ALPHA: f32 = 1.099;
    const BETA_ENCODED: f32 = 0.081; // 4.5 × BETA
}

impl TransferFunction for Rec709Transfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded < Self::BETA_ENCODED {
            encoded / 4.5
        } else {
            ((encoded + (Self::ALPHA - 1.0)) / Self::ALPHA).powf(1.0 / 0.45)
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        if linear < Self::BETA {
            4.5 * linear
        } else {
            Self::ALPHA * linear.powf(0.45) - (Self::ALPHA - 1.0)
        }
    }
}

// ---------------------------------------------------------------------------
// ARRI LogC3 (ALEXA classic, EI 800)
// ---------------------------------------------------------------------------

/// ARRI LogC3 at EI 800.
///
/// # Reference
/// ARRI LogC Curve — Usage in VFX (2017)
#[derive(Debug, Clone, Copy)]
pub struct ArriLogC3Transfer;

impl ArriLogC3Transfer {
    const A: f32 = 5.555556;
    const B: f32 = 0.052272;
    const C: f32 = 0.247190;
    const D: f32 = 0.385537;
    const CUT: f32 = 0.010591;
    const E: f32 = 5.367655;
    const F: f32 = 0.092809;
    const E_CUT: f32 = 0.149_651; // E * CUT + F
}

impl TransferFunction for ArriLogC3Transfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded <= Self::E_CUT {
            (encoded - Self::F) / Self::E
        } else {
            (10.0_f32.powf((encoded - Self::D) / Self::C) - Self::B) / Self::A
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        if linear <= Self::CUT {
            Self::E * linear + Self::F
        } else {
            Self::C * (Self::A * linear + Self::B).log10() + Self::D
        }
    }
}

// ---------------------------------------------------------------------------
// Sony S-Log3
// ---------------------------------------------------------------------------

/// Sony S-Log3, code values normalized by 1023.
///
/// # Reference
/// Sony Technical Summary for S-Gamut3.Cine/S-Log3 (2014)
#[derive(Debug, Clone, Copy)]
pub struct SLog3Transfer;

impl SLog3Transfer {
    const THRESHOLD: f32 = 0.011_25;
    const THRESHOLD_E: f32 = 0.167_360; // 171.2102946929 / 1023
}

impl TransferFunction for SLog3Transfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded >= Self::THRESHOLD_E {
            0.19 * 10.0_f32.powf((encoded * 1023.0 - 420.0) / 261.5) - 0.01
        } else {
            (encoded * 1023.0 - 95.0) * 0.011_25 / (171.210_3 - 95.0)
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        if linear >= Self::THRESHOLD {
            (420.0 + 261.5 * ((linear + 0.01) / 0.19).log10()) / 1023.0
        } else {
            (linear * (171.210_3 - 95.0) / 0.011_25 + 95.0) / 1023.0
        }
    }
}

// ---------------------------------------------------------------------------
// Panasonic V-Log
// ---------------------------------------------------------------------------

/// Panasonic V-Log.
///
/// # Reference
/// Panasonic V-Log/V-Gamut Technical Documentation (2014)
#[derive(Debug, Clone, Copy)]
pub struct VLogTransfer;

impl VLogTransfer {
    const B: f32 = 0.00873;
    const C: f32 = 0.241514;
    const D: f32 = 0.598206;
    const CUT: f32 = 0.01;
    const CUT_ENCODED: f32 = 0.181; // 5.6 * CUT + 0.125
}

impl TransferFunction for VLogTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        if encoded < Self::CUT_ENCODED {
            (encoded - 0.125) / 5.6
        } else {
            10.0_f32.powf((encoded - Self::D) / Self::C) - Self::B
        }
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        if linear < Self::CUT {
            5.6 * linear + 0.125
        } else {
            Self::C * (linear + Self::B).log10() + Self::D
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_roundtrip(tf: &dyn TransferFunction, values: &[f32]) {
        for &v in values {
            let encoded = tf.to_encoded(v);
            let back = tf.to_linear(encoded);
            assert!(
                (v - back).abs() < EPSILON,
                "roundtrip failed for {v}: encoded={encoded}, back={back}"
            );
        }
    }

    #[test]
    fn test_srgb_roundtrip_and_mid_gray() {
        let tf = SrgbTransfer;
        assert_roundtrip(&tf, &[0.0, 0.001, 0.01, 0.1, 0.5, 0.9, 1.0]);
        assert!((tf.to_linear(0.5) - 0.214041).abs() < 0.001);
    }

    #[test]
    fn test_rec709_roundtrip_and_endpoints() {
        let tf = Rec709Transfer;
        assert_roundtrip(&tf, &[0.0, 0.005, 0.018, 0.1, 0.5, 1.0]);
        assert!(tf.to_encoded(0.0).abs() < EPSILON);
        assert!((tf.to_encoded(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_logc3_roundtrip() {
        assert_roundtrip(&ArriLogC3Transfer, &[0.0, 0.005, 0.01, 0.1, 0.5, 1.0]);
    }

    #[test]
    fn test_slog3_roundtrip() {
        assert_roundtrip(&SLog3Transfer, &[0.01, 0.1, 0.5, 1.0]);
    }

    #[test]
    fn test_vlog_roundtrip() {
        assert_roundtrip(&VLogTransfer, &[0.01, 0.1, 0.5, 1.0]);
    }

    #[test]
    fn test_log_curves_place_mid_gray_near_published_code_values() {
        // 18% gray: S-Log3 ≈ 0.41, V-Log ≈ 0.42, LogC3 ≈ 0.39
        assert!((SLog3Transfer.to_encoded(0.18) - 0.4106).abs() < 0.002);
        assert!((VLogTransfer.to_encoded(0.18) - 0.4233).abs() < 0.002);
        assert!((ArriLogC3Transfer.to_encoded(0.18) - 0.3910).abs() < 0.002);
    }
}
