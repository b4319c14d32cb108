//! Slicing the domain list into daily buckets.
//!
//! A nightly run does not have to recheck every domain: `--partial K/N`
//! selects the K-th of N buckets, and membership is the CRC-32 of the
//! domain name modulo N. Hash-based assignment keeps each domain in the
//! same bucket from one run to the next, whatever else was added to or
//! removed from the sources.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::domain::Domain;
use crate::error::{Result, VeilleurError};

/// A 1-based bucket selector, `bucket/of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    bucket: u32,
    of: u32,
}

impl Partition {
    /// The whole list, no slicing.
    pub const FULL: Partition = Partition { bucket: 1, of: 1 };

    pub fn new(bucket: u32, of: u32) -> Result<Self> {
        if bucket == 0 || of == 0 || bucket > of {
            return Err(VeilleurError::InvalidPartition(format!(
                "expected K/N with 1 <= K <= N, got {bucket}/{of}"
            )));
        }
        Ok(Self { bucket, of })
    }

    /// The bucket a date selects when the list is spread over `of` daily
    /// slices: the 1st of the month checks 1/of, the 2nd checks 2/of,
    /// wrapping around for the rest of the month.
    pub fn for_date(date: NaiveDate, of: u32) -> Result<Self> {
        if of == 0 {
            return Err(VeilleurError::InvalidPartition(
                "expected today/N with N >= 1, got today/0".to_string(),
            ));
        }
        Ok(Self {
            bucket: date.day0() % of + 1,
            of,
        })
    }

    pub fn is_full(&self) -> bool {
        self.of == 1
    }

    pub fn contains(&self, name: &str) -> bool {
        if self.is_full() {
            return true;
        }
        crc32fast::hash(name.as_bytes()) % self.of == self.bucket - 1
    }
}

impl FromStr for Partition {
    type Err = VeilleurError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            VeilleurError::InvalidPartition(format!(
                "expected K/N with 1 <= K <= N, got {s:?}"
            ))
        };
        let (bucket, of) = s.split_once('/').ok_or_else(invalid)?;
        let bucket: u32 = bucket.trim().parse().map_err(|_| invalid())?;
        let of: u32 = of.trim().parse().map_err(|_| invalid())?;
        Self::new(bucket, of).map_err(|_| invalid())
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.of)
    }
}

/// Select the names a refresh run should probe: keep domains whose name
/// contains any `grep` substring (when given), keep the partition's bucket,
/// then sort and truncate to `limit` so a capped run is deterministic.
pub fn filter_domains<'a, I>(
    domains: I,
    grep: &[String],
    partition: Partition,
    limit: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a Domain>,
{
    let mut selected: Vec<&Domain> = domains
        .into_iter()
        .filter(|d| grep.is_empty() || grep.iter().any(|g| d.name.contains(g.as_str())))
        .filter(|d| partition.contains(&d.name))
        .collect();
    selected.sort();
    selected.truncate(limit);
    selected.into_iter().map(|d| d.name.clone()).collect()
}
