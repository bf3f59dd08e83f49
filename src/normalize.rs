// src/normalize.rs

use crate::error::{LogsiftError, Result};
use chrono::{Local, NaiveDateTime};
use std::fmt;

/// Accepted bound format once the `T` separator is replaced by a space.
pub const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Which end of a date range an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl Bound {
    pub fn label(&self) -> &'static str {
        match self {
            Bound::Start => "Start",
            Bound::End => "End",
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Start => f.write_str("start"),
            Bound::End => f.write_str("end"),
        }
    }
}

pub type DateRange = (Option<NaiveDateTime>, Option<NaiveDateTime>);

/// Validates raw start/end bounds against the current local time.
pub fn normalize(start: Option<&str>, end: Option<&str>) -> Result<DateRange> {
    normalize_at(start, end, Local::now().naive_local())
}

/// Like [`normalize`], with "now" supplied by the caller.
///
/// Blank strings count as absent. Ordering is checked on the
/// separator-canonical text before parsing, so a reversed range is a
/// `Range` error even when a bound is malformed; the parsed values are
/// compared again afterwards.
pub fn normalize_at(start: Option<&str>, end: Option<&str>, now: NaiveDateTime) -> Result<DateRange> {
    let start = start.map(canonical).filter(|s| !s.is_empty());
    let end = end.map(canonical).filter(|s| !s.is_empty());

    if let (Some(s), Some(e)) = (&start, &end) {
        if s > e {
            return Err(LogsiftError::Range);
        }
    }

    let start = start.map(|s| parse_bound(&s, Bound::Start, now)).transpose()?;
    let end = end.map(|e| parse_bound(&e, Bound::End, now)).transpose()?;

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(LogsiftError::Range);
        }
    }

    Ok((start, end))
}

fn canonical(raw: &str) -> String {
    raw.trim().replacen('T', " ", 1)
}

fn parse_bound(value: &str, bound: Bound, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(value, INPUT_FORMAT).map_err(|_| {
        LogsiftError::Parse {
            bound,
            value: value.to_string(),
        }
    })?;
    if parsed > now {
        return Err(LogsiftError::FutureDate { bound });
    }
    Ok(parsed)
}
