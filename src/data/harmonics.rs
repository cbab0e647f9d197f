//! Harmonic, sub-harmonic and side-band expansion of a base marker.
//!
//! The output order is fixed: sub-harmonics (1/2, 1/3, ...), then harmonics
//! (2x, 3x, ...), then side-bands interleaved left/right per step. Overlay
//! keys and CSV round-trips rely on array position, so keep it stable.

use crate::data::marker::{round_half_up, HarmonicMarker, Marker, SideBandSide};

/// Derive every overlay line of `marker`. Pure; calling it twice yields equal output.
pub fn expand_harmonics(marker: &Marker) -> Vec<HarmonicMarker> {
    let base = marker.frequency as f64;
    let bw = marker.band_width;
    let sb = &marker.side_bands;

    let side_band_len = if sb.enabled {
        sb.count as usize * (sb.left_enabled as usize + sb.right_enabled as usize)
    } else {
        0
    };
    let mut out = Vec::with_capacity(
        marker.sub_harmonics as usize + marker.harmonics as usize + side_band_len,
    );

    for i in 0..marker.sub_harmonics {
        let divisor = i as f64 + 2.0;
        out.push(HarmonicMarker {
            frequency: round_half_up(base / divisor),
            band_width: bw,
            is_harmonic: true,
            order: Some(format!("1/{}", i + 2)),
            is_side_band: false,
            side: None,
        });
    }

    for i in 0..marker.harmonics {
        let multiple = i as f64 + 2.0;
        out.push(HarmonicMarker {
            frequency: round_half_up(base * multiple),
            band_width: bw,
            is_harmonic: true,
            order: None,
            is_side_band: false,
            side: None,
        });
    }

    if sb.enabled {
        for i in 1..=sb.count {
            let offset = i as f64 * sb.spacing;
            if sb.left_enabled {
                out.push(side_band(base - offset, bw, SideBandSide::Left));
            }
            if sb.right_enabled {
                out.push(side_band(base + offset, bw, SideBandSide::Right));
            }
        }
    }

    out
}

fn side_band(frequency: f64, band_width: f64, side: SideBandSide) -> HarmonicMarker {
    HarmonicMarker {
        frequency,
        band_width,
        is_harmonic: false,
        order: None,
        is_side_band: true,
        side: Some(side),
    }
}
