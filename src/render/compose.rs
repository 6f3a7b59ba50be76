use image::RgbaImage;
use log::debug;

use crate::color::PowerRamp;
use crate::data::table::Table;

// ---------------------------------------------------------------------------
// Canvas composition
// ---------------------------------------------------------------------------

/// Paint the waterfall canvas: one column per frequency bin, one row per
/// integration, each pixel colored through the ramp. The table is not
/// mutated; identical inputs paint identical canvases.
///
/// A row shorter than the table's bin count renders its missing cells at
/// the range minimum; samples beyond the bin count are ignored.
pub fn compose(table: &Table, ramp: PowerRamp) -> RgbaImage {
    debug!("create image: {}x{}", table.bins, table.integrations);

    let mut canvas = RgbaImage::new(table.bins as u32, table.integrations as u32);

    for (y, row) in table.rows.iter().enumerate() {
        for x in 0..table.bins {
            let power = row.samples.get(x).copied().unwrap_or(table.min_power);
            let pixel = ramp.color(power, table.min_power, table.max_power);
            canvas.put_pixel(x as u32, y as u32, pixel);
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::RenderConfig;

    fn table(log: &[u8]) -> Table {
        Table::from_bytes(log, &RenderConfig::default()).unwrap()
    }

    #[test]
    fn canvas_matches_table_geometry() {
        let table = table(b"2024-01-01,10:00:00,1000000,2000000,1000,3,-50,-60,-70\n");

        let canvas = compose(&table, PowerRamp::Spectrum);

        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.height(), 1);
    }

    #[test]
    fn pixels_come_from_the_ramp() {
        let table = table(b"2024-01-01,10:00:00,1000000,2000000,1000,3,-50,-60,-70\n");
        let ramp = PowerRamp::Yellow;

        let canvas = compose(&table, ramp);

        for (x, &power) in table.rows[0].samples.iter().enumerate() {
            assert_eq!(
                *canvas.get_pixel(x as u32, 0),
                ramp.color(power, table.min_power, table.max_power)
            );
        }
    }

    #[test]
    fn short_rows_pad_with_the_range_minimum() {
        let log = b"2024-01-01,10:00:00,1000000,2000000,1000,3,-50,-60,-70\n\
                    2024-01-01,10:00:05,1000000,2000000,1000,2,-50,-60\n";
        let table = table(log);
        let ramp = PowerRamp::Yellow;

        let canvas = compose(&table, ramp);

        assert_eq!(table.bins, 3);
        assert_eq!(
            *canvas.get_pixel(2, 1),
            ramp.color(table.min_power, table.min_power, table.max_power)
        );
    }
}
