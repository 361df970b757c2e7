//! Query inputs shared by the summary and results endpoints.

use std::str::FromStr;

/// Default number of raw results per page.
pub const DEFAULT_RESULTS_LIMIT: u32 = 100;

/// Inclusive time window as UNIX timestamps (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

impl TimeRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }
}

/// Optional knobs for `GET /results/{checkId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsOptions {
    pub limit: u32,
    /// Probe ids to filter on; sent comma-joined.
    pub probes: Option<Vec<String>>,
}

impl Default for ResultsOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RESULTS_LIMIT,
            probes: None,
        }
    }
}

impl ResultsOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_probes<I, S>(mut self, probes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.probes = Some(probes.into_iter().map(Into::into).collect());
        self
    }
}

/// Bucket size for the performance summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Hour,
    Day,
    Week,
}

impl Resolution {
    /// Value of the `resolution` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Hour => "hour",
            Resolution::Day => "day",
            Resolution::Week => "week",
        }
    }

    /// Key of the bucket list inside the `summary` object.
    pub fn summary_key(self) -> &'static str {
        match self {
            Resolution::Hour => "hours",
            Resolution::Day => "days",
            Resolution::Week => "weeks",
        }
    }
}

impl FromStr for Resolution {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hour" | "hours" | "h" => Ok(Resolution::Hour),
            "day" | "days" | "d" => Ok(Resolution::Day),
            "week" | "weeks" | "w" => Ok(Resolution::Week),
            _ => Err(format!(
                "unknown resolution: {} (expected hour, day or week)",
                s
            )),
        }
    }
}
