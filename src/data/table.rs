use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use log::debug;
use thiserror::Error;

use super::line::{SweepLine, TimestampError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal conditions of the table pipeline. Tolerated parse failures never
/// show up here; they degrade to 0.0 inside [`SweepLine::from_record`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("reading sweep log")]
    Io(#[from] std::io::Error),
    #[error("malformed sweep log")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    #[error("no sweeps found in input")]
    NoSweeps,
}

// ---------------------------------------------------------------------------
// RenderConfig – caller overrides for the rendered power range
// ---------------------------------------------------------------------------

/// Optional power-range overrides. `None` means "derive from the data".
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub min_power: Option<f64>,
    pub max_power: Option<f64>,
}

// ---------------------------------------------------------------------------
// Table – the aggregated sweep log
// ---------------------------------------------------------------------------

/// A fully aggregated sweep log: merged rows in chronological order plus
/// the derived geometry the renderer needs. Built once per run, read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct Table {
    /// Merged rows, ascending by timestamp. Rows without a timestamp sort
    /// after all timestamped rows, keeping their encounter order.
    pub rows: Vec<SweepLine>,

    /// Horizontal slots (columns): sample count of the first sorted row.
    pub bins: usize,
    /// Vertical slots (rows): one per distinct sweep pass.
    pub integrations: usize,

    /// Frequency span, the union across all rows.
    pub hz_low: f64,
    pub hz_high: f64,

    /// Earliest and latest row timestamps.
    pub time_start: Option<NaiveDateTime>,
    pub time_end: Option<NaiveDateTime>,

    /// Rendered power range: caller overrides, or global sample extrema.
    pub min_power: f64,
    pub max_power: f64,
}

impl Table {
    /// Load and aggregate a sweep log from disk.
    pub fn load(path: &Path, config: &RenderConfig) -> Result<Table, TableError> {
        debug!("loading table from {}", path.display());

        let buffer = std::fs::read(path)?;
        debug!("file loaded: {} bytes", buffer.len());

        Table::from_bytes(&buffer, config)
    }

    /// Aggregate an in-memory sweep log.
    ///
    /// Fragments are grouped by their date+clock key and merged into the
    /// first fragment of each pass, in encounter order. First-encounter
    /// order of keys is kept as the pre-sort order, so the stable sort
    /// below yields deterministic output whatever the grouping map does.
    pub fn from_bytes(buffer: &[u8], config: &RenderConfig) -> Result<Table, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(buffer);

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, SweepLine> = HashMap::new();

        for record in reader.records() {
            let line = SweepLine::from_record(&record?)?;
            if line.hash.is_empty() {
                // sentinel from a malformed record, not a sweep
                continue;
            }
            match groups.entry(line.hash.clone()) {
                Entry::Occupied(mut slot) => slot.get_mut().absorb(line),
                Entry::Vacant(slot) => {
                    order.push(line.hash.clone());
                    slot.insert(line);
                }
            }
        }

        let rows: Vec<SweepLine> = order
            .into_iter()
            .filter_map(|hash| groups.remove(&hash))
            .collect();

        Table::from_rows(rows, config)
    }

    /// Sort merged rows chronologically and derive the table scalars.
    fn from_rows(mut rows: Vec<SweepLine>, config: &RenderConfig) -> Result<Table, TableError> {
        // sort_by is stable: equal keys keep encounter order
        rows.sort_by(|a, b| match (a.time, b.time) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        if rows.is_empty() {
            return Err(TableError::NoSweeps);
        }

        let bins = rows.first().map(|row| row.samples.len()).unwrap_or(0);
        let integrations = rows.len();

        let mut hz_low = f64::INFINITY;
        let mut hz_high = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut time_start: Option<NaiveDateTime> = None;
        let mut time_end: Option<NaiveDateTime> = None;

        for row in &rows {
            hz_low = hz_low.min(row.hz_low);
            hz_high = hz_high.max(row.hz_high);
            min = min.min(row.low_sample());
            max = max.max(row.high_sample());

            if let Some(time) = row.time {
                time_start = Some(time_start.map_or(time, |start| start.min(time)));
                time_end = Some(time_end.map_or(time, |end| end.max(time)));
            }
        }

        let min_power = config.min_power.unwrap_or(min);
        let max_power = config.max_power.unwrap_or(max);

        debug!("integrated rows: pMin={min_power} pMax={max_power}");
        debug!("parsed table: bins={bins} integrations={integrations}");

        Ok(Table {
            rows,
            bins,
            integrations,
            hz_low,
            hz_high,
            time_start,
            time_end,
            min_power,
            max_power,
        })
    }
}
