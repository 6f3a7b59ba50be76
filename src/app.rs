use std::time::Instant;

use anyhow::{bail, Context, Result};
use image::RgbaImage;
use log::{debug, info};

use crate::cli::RunConfig;
use crate::data::table::Table;
use crate::output;
use crate::render::annotate::Annotator;
use crate::render::compose::compose;

// ---------------------------------------------------------------------------
// Application shell
// ---------------------------------------------------------------------------

/// One render run: build the table, compose and annotate the canvas, then
/// encode it to disk.
pub struct App {
    config: RunConfig,
    canvas: Option<RgbaImage>,
    started: Instant,
}

impl App {
    pub fn new(config: RunConfig) -> Self {
        info!("input: {}", config.input.display());
        info!("output: {}", config.output.display());
        info!("format: {}", config.format);

        Self {
            config,
            canvas: None,
            started: Instant::now(),
        }
    }

    /// Parse, aggregate and paint. The finished canvas is held until
    /// [`App::write`].
    pub fn render(&mut self) -> Result<()> {
        debug!("starting render");

        let table = Table::load(&self.config.input, &self.config.range)
            .with_context(|| format!("loading {}", self.config.input.display()))?;

        let mut canvas = compose(&table, self.config.ramp);

        if self.config.annotations {
            Annotator::new(&mut canvas, &table).annotate();
        }

        self.canvas = Some(canvas);
        Ok(())
    }

    /// Encode the finished canvas to the configured output path.
    pub fn write(&self) -> Result<()> {
        let Some(canvas) = &self.canvas else {
            bail!("nothing rendered yet");
        };

        output::write(canvas, &self.config.output, &self.config.format)?;
        info!("finished in {:.2?}", self.started.elapsed());

        Ok(())
    }
}
