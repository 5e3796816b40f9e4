use std::str::FromStr;

use derive_more::derive::{Display, Error};

/// Year and month of a `YYYY-MM` or `YYYY-MM-DD` label. The day is not needed by any
/// aggregation and is discarded without validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesLabel {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Malformed series label '{label}'")]
pub struct MalformedLabel {
    label: String,
}

impl SeriesLabel {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    //0-based, for indexing month tables
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }
}

impl FromStr for SeriesLabel {
    type Err = MalformedLabel;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedLabel {
            label: label.to_owned(),
        };

        let mut parts = label.trim().split('-');

        let year = parts
            .next()
            .filter(|y| y.len() == 4 && all_digits(y))
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(malformed)?;

        let month = parts
            .next()
            .filter(|m| (1..=2).contains(&m.len()) && all_digits(m))
            .and_then(|m| m.parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(malformed)?;

        Ok(Self { year, month })
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
