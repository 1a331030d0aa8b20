//! Textual labels for marked characters.
//!
//! A marked character is addressed as `char:<range>:<offset>` with a `:last` suffix on
//! the final character of its range. This is the tag the renderer sees in the JSON
//! output, so it parses back losslessly.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^char:(\d+):(\d+)(:last)?$").unwrap());

/// The addressable part of a [`CharMark`](super::CharMark).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkLabel {
    pub range: usize,
    pub offset: usize,
    pub is_last: bool,
}

/// Error returned when a string is not a character label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelError(pub String);

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a character label", self.0)
    }
}

impl std::error::Error for LabelError {}

impl fmt::Display for MarkLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "char:{}:{}", self.range, self.offset)?;
        if self.is_last {
            f.write_str(":last")?;
        }
        Ok(())
    }
}

impl FromStr for MarkLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = LABEL_PATTERN
            .captures(s)
            .ok_or_else(|| LabelError(s.to_string()))?;
        let number = |i: usize| {
            captures[i]
                .parse::<usize>()
                .map_err(|_| LabelError(s.to_string()))
        };
        Ok(MarkLabel {
            range: number(1)?,
            offset: number(2)?,
            is_last: captures.get(3).is_some(),
        })
    }
}
