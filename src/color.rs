use clap::ValueEnum;
use image::Rgba;
use palette::{Hsv, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Power → color ramps
// ---------------------------------------------------------------------------

/// Hue at the low end of the spectrum ramp, in degrees.
const SPECTRUM_HUE_LOW: f32 = 236.0;

/// The closed set of power-to-color mappings, selected at configuration
/// time. Each ramp is a pure function of the reading and the rendered
/// power range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PowerRamp {
    /// Hue sweep from deep blue (low power) to red (high power),
    /// saturation 1.0, value 0.90.
    #[default]
    Spectrum,
    /// Single black → yellow ramp.
    Yellow,
}

impl PowerRamp {
    /// Map a power reading to a pixel. Readings outside the range clamp to
    /// the ramp endpoints; a degenerate range (max == min) maps everything
    /// to the low end instead of dividing by zero.
    pub fn color(self, power: f64, min_power: f64, max_power: f64) -> Rgba<u8> {
        let span = max_power - min_power;
        let fraction = if span == 0.0 {
            0.0
        } else {
            (((power - min_power) / span) as f32).clamp(0.0, 1.0)
        };

        match self {
            PowerRamp::Spectrum => {
                let hue = SPECTRUM_HUE_LOW - fraction * SPECTRUM_HUE_LOW;
                let rgb: Srgb = Hsv::new(hue, 1.0, 0.90).into_color();
                Rgba([
                    (rgb.red * 255.0) as u8,
                    (rgb.green * 255.0) as u8,
                    (rgb.blue * 255.0) as u8,
                    255,
                ])
            }
            PowerRamp::Yellow => {
                let channel = (fraction * 255.0) as u8;
                Rgba([channel, channel, 0, 255])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_endpoints_hit_the_ramp_endpoints() {
        for ramp in [PowerRamp::Spectrum, PowerRamp::Yellow] {
            // readings beyond the range clamp to the same endpoint colors
            assert_eq!(ramp.color(-70.0, -70.0, -50.0), ramp.color(-120.0, -70.0, -50.0));
            assert_eq!(ramp.color(-50.0, -70.0, -50.0), ramp.color(0.0, -70.0, -50.0));
        }
    }

    #[test]
    fn yellow_ramp_endpoints_are_exact() {
        assert_eq!(PowerRamp::Yellow.color(-70.0, -70.0, -50.0), Rgba([0, 0, 0, 255]));
        assert_eq!(
            PowerRamp::Yellow.color(-50.0, -70.0, -50.0),
            Rgba([255, 255, 0, 255])
        );
    }

    #[test]
    fn spectrum_high_end_is_red() {
        // fraction 1 → hue 0 → HSV(0, 1, 0.90)
        assert_eq!(
            PowerRamp::Spectrum.color(-50.0, -70.0, -50.0),
            Rgba([229, 0, 0, 255])
        );
    }

    #[test]
    fn degenerate_range_maps_to_the_low_end() {
        for ramp in [PowerRamp::Spectrum, PowerRamp::Yellow] {
            let low = ramp.color(-60.0, -60.0, -40.0);
            assert_eq!(ramp.color(-60.0, -60.0, -60.0), low);
            assert_eq!(ramp.color(12.5, -60.0, -60.0), low);
        }
    }
}
