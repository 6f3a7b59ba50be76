use chrono::NaiveDateTime;
use csv::StringRecord;
use thiserror::Error;

// ---------------------------------------------------------------------------
// SweepLine – one sweep fragment, or a merged full-bandwidth row
// ---------------------------------------------------------------------------

/// Timestamp layout emitted by rtl_power and hackrf_sweep. The date and
/// clock cells are concatenated verbatim before parsing; chrono treats the
/// literal space as "any amount of whitespace, including none", so both
/// `2024-01-01 10:00:00` and `2024-01-0110:00:00` resolve.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A timestamp that does not match [`TIME_FORMAT`]. Fatal for the whole
/// run: row ordering depends on timestamps and cannot be locally recovered.
#[derive(Debug, Error)]
#[error("unparsable timestamp {text:?}")]
pub struct TimestampError {
    pub text: String,
    #[source]
    pub source: chrono::ParseError,
}

/// One record of a sweep log:
///
/// ```text
/// date,clock,hz_low,hz_high,hz_step,sample_count,db,db,db,...
/// ```
///
/// A record carries the power measured over one sub-band at one instant.
/// When a scanner retunes across sub-bands it emits several records per
/// pass; all fragments sharing the same date+clock text belong to one pass
/// and are merged into a single row with [`SweepLine::absorb`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepLine {
    /// Verbatim date+clock concatenation, the grouping key for one pass.
    /// Empty on sentinel fragments from malformed records.
    pub hash: String,
    /// Parsed timestamp; `None` only on sentinel fragments.
    pub time: Option<NaiveDateTime>,

    pub hz_low: f64,
    pub hz_high: f64,
    pub hz_step: f64,
    /// Sample count declared by the scanner; informational only, the actual
    /// sample fields are authoritative.
    pub sample_count: usize,

    /// Power readings in dBm, one per frequency bin, in record order.
    pub samples: Vec<f64>,
}

impl SweepLine {
    /// Parse one CSV record into a fragment.
    ///
    /// Records with fewer than 7 fields yield a sentinel with an empty hash;
    /// callers exclude those from aggregation. Numeric fields that fail to
    /// parse degrade to 0.0; samples keep their position so frequency
    /// alignment survives truncated cells.
    pub fn from_record(record: &StringRecord) -> Result<Self, TimestampError> {
        if record.len() < 7 {
            return Ok(SweepLine::default());
        }

        let date = record.get(0).unwrap_or("");
        let clock = record.get(1).unwrap_or("");
        let hash = format!("{date}{clock}");

        let time = NaiveDateTime::parse_from_str(&hash, TIME_FORMAT).map_err(|source| {
            TimestampError {
                text: hash.clone(),
                source,
            }
        })?;

        let float_field = |i: usize| record.get(i).unwrap_or("").parse::<f64>().unwrap_or(0.0);

        let samples = record
            .iter()
            .skip(6)
            .map(|cell| cell.trim().parse::<f64>().unwrap_or(0.0))
            .collect();

        Ok(SweepLine {
            hash,
            time: Some(time),
            hz_low: float_field(2),
            hz_high: float_field(3),
            hz_step: float_field(4),
            sample_count: record.get(5).unwrap_or("").trim().parse().unwrap_or(0),
            samples,
        })
    }

    /// Fold another fragment of the same pass into this row: the frequency
    /// bounds widen and the samples append in encounter order. Samples are
    /// never re-sorted; fragments are expected in ascending-frequency order
    /// in the source file.
    pub fn absorb(&mut self, fragment: SweepLine) {
        if fragment.hz_high > self.hz_high {
            self.hz_high = fragment.hz_high;
        }
        if fragment.hz_low < self.hz_low {
            self.hz_low = fragment.hz_low;
        }
        self.samples.extend(fragment.samples);
    }

    /// Weakest reading in the row.
    pub fn low_sample(&self) -> f64 {
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Strongest reading in the row.
    pub fn high_sample(&self) -> f64 {
        self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
