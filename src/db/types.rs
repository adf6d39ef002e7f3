//! Result row types for db-report.
//!
//! Defines the structures used to represent rows streamed from the database
//! and the typed getters reports use to pull fields out of them.

use crate::error::{ReportError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;

/// Metadata about a column in a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column label as sent by the server.
    pub name: String,

    /// Column data type.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A date and time without zone, rendered as `YYYY-MM-DD hh:mm:ss.f`.
///
/// The fractional part keeps every significant digit and never drops below
/// one digit, so whole seconds render as `.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub NaiveDateTime);

impl Timestamp {
    /// Parses the textual forms servers commonly send for time columns.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
            .map(Self)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(v: NaiveDateTime) -> Self {
        Self(v)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))?;
        // Leap seconds are carried as nanos >= 1e9.
        let nanos = self.0.nanosecond() % 1_000_000_000;
        if nanos == 0 {
            write!(f, ".0")
        } else {
            let digits = format!("{nanos:09}");
            write!(f, ".{}", digits.trim_end_matches('0'))
        }
    }
}

/// Represents a single value from a database row.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Unsigned integer (up to u64).
    UInt(u64),

    /// Floating point number.
    Float(f64),

    /// Exact decimal (MySQL DECIMAL, including SUM over integers).
    Decimal(Decimal),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Calendar date.
    Date(NaiveDate),

    /// Date and time.
    Timestamp(Timestamp),
}

impl Value {
    /// Returns a short name for the kind of value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Converts the value to a string representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Timestamp(ts) => ts.to_string(),
        }
    }

    /// Reads the value as text. NULL reads as `null`.
    pub fn as_text(&self) -> std::result::Result<String, String> {
        match self {
            Value::Null => Ok("null".to_string()),
            Value::Bytes(b) => String::from_utf8(b.clone())
                .map_err(|_| "binary value is not valid UTF-8".to_string()),
            other => Ok(other.to_display_string()),
        }
    }

    /// Reads the value as a 64-bit signed integer without losing information.
    pub fn as_i64(&self) -> std::result::Result<i64, String> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::UInt(u) => i64::try_from(*u).map_err(|_| format!("{u} does not fit in i64")),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Decimal(d) if d.fract().is_zero() => d
                .to_i64()
                .ok_or_else(|| format!("{d} does not fit in i64")),
            Value::Decimal(d) => Err(format!("{d} is not a whole number")),
            Value::Float(f) => whole_float_to_i64(*f),
            Value::String(s) => {
                let text = s.trim();
                match text.parse::<i64>() {
                    Ok(i) => Ok(i),
                    Err(_) => text
                        .parse::<f64>()
                        .map_err(|_| format!("'{s}' is not an integer"))
                        .and_then(whole_float_to_i64),
                }
            }
            other => Err(format!("cannot read {} as integer", other.kind())),
        }
    }

    /// Reads the value as a 64-bit float.
    pub fn as_f64(&self) -> std::result::Result<f64, String> {
        match self {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::UInt(u) => Ok(*u as f64),
            Value::Decimal(d) => d.to_f64().ok_or_else(|| format!("{d} is out of range")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("'{s}' is not a number")),
            other => Err(format!("cannot read {} as float", other.kind())),
        }
    }

    /// Reads the value as a timestamp. Dates read as midnight.
    pub fn as_timestamp(&self) -> std::result::Result<Timestamp, String> {
        match self {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Date(d) => Ok(Timestamp(d.and_time(chrono::NaiveTime::MIN))),
            Value::String(s) => {
                Timestamp::parse(s).ok_or_else(|| format!("'{s}' is not a timestamp"))
            }
            other => Err(format!("cannot read {} as timestamp", other.kind())),
        }
    }
}

/// Numeric gateways send counts as DOUBLE, so whole floats read as integers.
fn whole_float_to_i64(f: f64) -> std::result::Result<i64, String> {
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(format!("{f} is not a whole number"));
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(format!("{f} does not fit in i64"));
    }
    Ok(f as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

// Conversion implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(Timestamp(v))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

/// One decoded row of a result set, with its column labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<ColumnInfo>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from column metadata and the matching values.
    pub fn new(columns: Vec<ColumnInfo>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Creates a row from `(label, value)` pairs. Column types are left blank.
    pub fn from_pairs<I, S, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let (columns, values) = pairs
            .into_iter()
            .map(|(name, value)| (ColumnInfo::new(name, ""), value.into()))
            .unzip();
        Self { columns, values }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Position of the first column whose label matches, ignoring ASCII case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|col| col.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a value by column label.
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.index_of(name)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| ReportError::decode(format!("column '{name}' not found in result row")))
    }

    pub fn get_string(&self, name: &str) -> Result<String> {
        self.get(name)?.as_text().map_err(|e| field_error(name, e))
    }

    /// Reads an integer column. NULL is an error.
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.get(name)?.as_i64().map_err(|e| field_error(name, e))
    }

    /// Reads a floating-point column. NULL is an error.
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.get(name)?.as_f64().map_err(|e| field_error(name, e))
    }

    /// Reads a timestamp column. NULL is an error.
    pub fn get_timestamp(&self, name: &str) -> Result<Timestamp> {
        self.get(name)?
            .as_timestamp()
            .map_err(|e| field_error(name, e))
    }
}

fn field_error(name: &str, reason: String) -> ReportError {
    ReportError::decode(format!("column '{name}': {reason}"))
}
