use chrono::Duration;
use image::{Rgba, RgbaImage};
use log::debug;

use crate::data::table::Table;
use crate::render::text::TextRenderer;

// ---------------------------------------------------------------------------
// Scale and info-box overlays
// ---------------------------------------------------------------------------

/// Target pixel spacing between frequency labels.
const PX_PER_FREQ_LABEL: usize = 350;
/// Target row spacing between time labels.
const ROWS_PER_TIME_LABEL: usize = 100;

/// Guideline lengths, in pixels into the canvas.
const FREQ_GUIDELINE: u32 = 50;
const TIME_GUIDELINE: u32 = 75;

const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TEXT_SCALE: u32 = 2;

/// Overlays frequency/time scales and the info box onto a finished canvas.
/// Owns the text-rendering session for the duration of one render pass.
pub struct Annotator<'a> {
    canvas: &'a mut RgbaImage,
    table: &'a Table,
    text: TextRenderer,
}

impl<'a> Annotator<'a> {
    pub fn new(canvas: &'a mut RgbaImage, table: &'a Table) -> Self {
        Self {
            canvas,
            table,
            text: TextRenderer::new(TEXT_SCALE, FOREGROUND),
        }
    }

    /// Draw all overlays.
    pub fn annotate(&mut self) {
        self.draw_freq_scale();
        self.draw_time_scale();
        self.draw_info_box();
    }

    /// Vertical guidelines plus SI-formatted frequency labels along the top.
    fn draw_freq_scale(&mut self) {
        let labels = self.table.bins / PX_PER_FREQ_LABEL;
        debug!(
            "annotate frequency scale: hzLow={} hzHigh={} labels={labels}",
            self.table.hz_low, self.table.hz_high
        );
        if labels == 0 {
            return;
        }

        let hz_per_label = (self.table.hz_high - self.table.hz_low) / labels as f64;
        let px_per_label = self.table.bins / labels;

        for i in 0..labels {
            let hz = self.table.hz_low + i as f64 * hz_per_label;
            let px = (i * px_per_label) as i32;

            for y in 0..FREQ_GUIDELINE {
                self.put(px, y as i32);
            }

            let label = format_hz(hz);
            self.text.draw(self.canvas, px + 10, 12, &label);
        }
    }

    /// Horizontal guidelines plus clock labels down the left edge. The first
    /// label carries the absolute scan start, later ones the clock time.
    fn draw_time_scale(&mut self) {
        let (Some(start), Some(end)) = (self.table.time_start, self.table.time_end) else {
            return;
        };

        let labels = self.table.integrations / ROWS_PER_TIME_LABEL;
        debug!("annotate time scale: start={start} end={end} labels={labels}");
        if labels == 0 {
            return;
        }

        let secs_per_label = (end - start).num_seconds() / labels as i64;
        let px_per_label = self.table.integrations / labels;

        for i in 0..labels {
            let py = (i * px_per_label) as i32;

            let label = if i == 0 {
                start.format("%Y-%m-%d %H:%M:%S").to_string()
            } else {
                let point = start + Duration::seconds(secs_per_label * i as i64);
                point.format("%H:%M:%S").to_string()
            };

            for x in 0..TIME_GUIDELINE {
                self.put(x as i32, py);
            }

            // 3 px margin between the label and its guideline
            let ty = py - 3 - self.text.line_height();
            self.text.draw(self.canvas, 3, ty, &label);
        }
    }

    /// Fixed block in the lower-left corner summarizing the scan.
    fn draw_info_box(&mut self) {
        let time = |t: Option<chrono::NaiveDateTime>| match t {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "unknown".to_string(),
        };

        let bandwidth = self.table.hz_high - self.table.hz_low;
        let hz_per_px = bandwidth / self.table.bins as f64;
        let secs_per_px = match (self.table.time_start, self.table.time_end) {
            (Some(start), Some(end)) => {
                (end - start).num_seconds() as f64 / self.table.integrations as f64
            }
            _ => 0.0,
        };

        let lines = [
            format!("scan start: {}", time(self.table.time_start)),
            format!("scan end: {}", time(self.table.time_end)),
            format!(
                "band: {} - {}",
                format_hz(self.table.hz_low),
                format_hz(self.table.hz_high)
            ),
            format!("bandwidth: {}", format_hz(bandwidth)),
            format!(
                "resolution: {} x {:.2} seconds",
                format_hz(hz_per_px),
                secs_per_px
            ),
        ];

        let line_height = self.text.line_height();
        let top = self.canvas.height() as i32 - 10 - line_height * lines.len() as i32;

        for (i, line) in lines.iter().enumerate() {
            self.text.draw(self.canvas, 10, top + i as i32 * line_height, line);
        }
    }

    fn put(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.canvas.width() && y < self.canvas.height() {
            self.canvas.put_pixel(x, y, FOREGROUND);
        }
    }
}

// ---------------------------------------------------------------------------
// Frequency formatting
// ---------------------------------------------------------------------------

/// Format a frequency with an SI-style unit suffix, e.g. `2.40 MHz`.
pub fn format_hz(hz: f64) -> String {
    let (value, prefix) = si_scale(hz);
    format!("{value:.2} {prefix}Hz")
}

fn si_scale(hz: f64) -> (f64, &'static str) {
    const SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

    for (scale, prefix) in SCALES {
        if hz.abs() >= scale {
            return (hz / scale, prefix);
        }
    }
    (hz, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PowerRamp;
    use crate::data::table::{RenderConfig, Table};
    use crate::render::compose::compose;

    #[test]
    fn si_suffixes() {
        assert_eq!(format_hz(2_400_000.0), "2.40 MHz");
        assert_eq!(format_hz(80_000.0), "80.00 kHz");
        assert_eq!(format_hz(1_000_000_000.0), "1.00 GHz");
        assert_eq!(format_hz(950.0), "950.00 Hz");
        assert_eq!(format_hz(0.0), "0.00 Hz");
    }

    #[test]
    fn freq_label_count_uses_floor_division() {
        assert_eq!(1200 / PX_PER_FREQ_LABEL, 3);
        assert_eq!(349 / PX_PER_FREQ_LABEL, 0);
        assert_eq!(250 / ROWS_PER_TIME_LABEL, 2);
    }

    #[test]
    fn guideline_lands_on_the_label_column() {
        // 400 bins → one frequency label, guideline in column 0
        let mut log = String::from("2024-01-01,10:00:00,1000000,2000000,1000,400");
        for _ in 0..400 {
            log.push_str(",-50");
        }
        log.push('\n');

        let table = Table::from_bytes(log.as_bytes(), &RenderConfig::default()).unwrap();
        let mut canvas = compose(&table, PowerRamp::Yellow);

        Annotator::new(&mut canvas, &table).annotate();

        assert_eq!(*canvas.get_pixel(0, 0), FOREGROUND);
    }

    #[test]
    fn tiny_canvas_annotates_without_panicking() {
        let table = Table::from_bytes(
            b"2024-01-01,10:00:00,1000000,2000000,1000,3,-50,-60,-70\n",
            &RenderConfig::default(),
        )
        .unwrap();
        let mut canvas = compose(&table, PowerRamp::Spectrum);

        // 3x1 canvas: zero labels on both axes, info box fully clipped
        Annotator::new(&mut canvas, &table).annotate();
    }
}
