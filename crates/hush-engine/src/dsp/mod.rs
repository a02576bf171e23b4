pub mod stage;
pub mod suppressor;

/// Convert decibels to linear gain.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels, floored at -120 dB.
#[inline]
pub fn linear_to_db(lin: f32) -> f32 {
    if lin <= 1e-6 {
        -120.0
    } else {
        20.0 * lin.log10()
    }
}

/// One-pole smoothing coefficient for a time constant in milliseconds.
#[inline]
pub(crate) fn coeff(ms: f32, sr: u32) -> f32 {
    if ms <= 0.0 || sr == 0 {
        return 0.0;
    }
    (-1.0 / (ms * 0.001 * sr as f32)).exp()
}
