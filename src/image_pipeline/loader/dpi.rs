//! Batch-wide DPI resolution

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::common::types::Dpi;

/// How one DPI value is chosen for a batch whose pages may disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DpiStrategy {
    /// First page carrying metadata wins
    FirstFound,
    /// Last page carrying metadata wins
    #[default]
    LastFound,
    /// Most frequent value; ties go to the value seen first
    MostCommon,
    /// Always the configured default, metadata is ignored
    Fixed,
}

impl DpiStrategy {
    /// Picks the batch DPI from per-page metadata in load order.
    pub fn resolve<I>(self, found: I, default: Dpi) -> Dpi
    where
        I: IntoIterator<Item = Option<Dpi>>,
    {
        let mut found = found.into_iter().flatten();
        match self {
            DpiStrategy::Fixed => default,
            DpiStrategy::FirstFound => found.next().unwrap_or(default),
            DpiStrategy::LastFound => found.last().unwrap_or(default),
            DpiStrategy::MostCommon => {
                let mut counts: Vec<(Dpi, usize)> = Vec::new();
                for dpi in found {
                    match counts.iter_mut().find(|(d, _)| *d == dpi) {
                        Some((_, n)) => *n += 1,
                        None => counts.push((dpi, 1)),
                    }
                }
                // max_by_key keeps the last maximum, so walk in reverse
                counts
                    .into_iter()
                    .rev()
                    .max_by_key(|&(_, n)| n)
                    .map(|(dpi, _)| dpi)
                    .unwrap_or(default)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DpiStrategy::FirstFound => "first-found",
            DpiStrategy::LastFound => "last-found",
            DpiStrategy::MostCommon => "most-common",
            DpiStrategy::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DpiStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DpiStrategy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "first-found" | "first" => Ok(DpiStrategy::FirstFound),
            "last-found" | "last" => Ok(DpiStrategy::LastFound),
            "most-common" => Ok(DpiStrategy::MostCommon),
            "fixed" | "fixed-default" => Ok(DpiStrategy::Fixed),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "DPI strategy '{other}'"
            ))),
        }
    }
}
