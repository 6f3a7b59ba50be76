use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;

// ---------------------------------------------------------------------------
// Canvas encoding
// ---------------------------------------------------------------------------

/// Quality used for jpeg/jpg output.
const JPEG_QUALITY: u8 = 98;

/// Encode the canvas to `path`, dispatching on the requested format name.
/// Anything other than png/jpeg/jpg is reported back to the caller.
pub fn write(canvas: &RgbaImage, path: &Path, format: &str) -> Result<()> {
    debug!("writing {format} output to {}", path.display());

    match format {
        "png" => {
            let mut out = create(path)?;
            canvas
                .write_to(&mut out, ImageFormat::Png)
                .context("encoding png")?;
        }
        "jpeg" | "jpg" => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(canvas.clone()).into_rgb8();
            let mut out = create(path)?;
            let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
            rgb.write_with_encoder(encoder).context("encoding jpeg")?;
        }
        other => bail!("unsupported format: {other}"),
    }

    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}
