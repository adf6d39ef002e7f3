//! The fixed reports this client can run.
//!
//! Each report pairs one constant SQL text with a typed row and the line
//! template used to print it.

use crate::db::{Row, Timestamp};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

const TOP_PAGES_SQL: &str =
    "SELECT page, count(*) AS cnt FROM wikipedia GROUP BY page ORDER BY cnt DESC LIMIT 15";

const CHANNEL_ACTIVITY_SQL: &str = "SELECT TIME_BUCKET(time, 'PT1H', 'Etc/UTC') AS Time, \
     channel AS Channel, isNew AS IsNew, SUM(count) AS Count, SUM(added)/100 AS Added \
     FROM wikipedia GROUP BY 1,2,3 ORDER BY Count DESC LIMIT 5";

/// A report variant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Report {
    /// Most edited pages with their edit counts.
    #[default]
    TopPages,
    /// Busiest hourly buckets per channel.
    ChannelActivity,
}

impl Report {
    /// Returns the report name as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TopPages => "top-pages",
            Self::ChannelActivity => "channel-activity",
        }
    }

    /// Returns the SQL text the report executes.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::TopPages => TOP_PAGES_SQL,
            Self::ChannelActivity => CHANNEL_ACTIVITY_SQL,
        }
    }

    /// Extracts this report's fields from `row` and formats them as one line
    /// (without the trailing newline).
    pub fn render(&self, row: &Row) -> Result<String> {
        match self {
            Self::TopPages => PageCount::from_row(row).map(|r| r.to_string()),
            Self::ChannelActivity => ChannelActivity::from_row(row).map(|r| r.to_string()),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed report row: decoded from a result row, printed via `Display`.
pub trait ReportRow: fmt::Display + Sized {
    /// Pulls the fields out of `row`. Any missing or mistyped field is an error.
    fn from_row(row: &Row) -> Result<Self>;
}

/// One row of the top pages report.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCount {
    pub page: String,
    pub count: i64,
}

impl ReportRow for PageCount {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            page: row.get_string("page")?,
            count: row.get_i64("cnt")?,
        })
    }
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page[{}] count[{}]", self.page, self.count)
    }
}

/// One row of the channel activity report. `IsNew` is grouped on but not read.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelActivity {
    pub time: Timestamp,
    pub channel: String,
    pub count: i64,
    pub added: f64,
}

impl ReportRow for ChannelActivity {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            time: row.get_timestamp("Time")?,
            channel: row.get_string("Channel")?,
            count: row.get_i64("Count")?,
            added: row.get_f64("Added")?,
        })
    }
}

impl fmt::Display for ChannelActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time[{}] Channel[{}] Count[{}] Added[{:.6}]",
            self.time, self.channel, self.count, self.added
        )
    }
}
