//! Evidence stamps
//!
//! A stamp records where a task came from: a unique serial number, the time
//! the statement is about, the time the task was created, and the evidential
//! base — the serials of the input tasks it ultimately rests on. Two tasks
//! whose bases overlap must never be combined by a rule, otherwise the same
//! evidence would be counted twice and confidence would inflate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum evidential-base length after a merge. The most recent serials
/// survive truncation.
pub const MAX_EVIDENCE: usize = 10;

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_serial() -> u64 {
    NEXT_SERIAL.fetch_add(1, Ordering::Relaxed)
}

/// Advance the serial counter past `serial`. Used after restoring a
/// snapshot so new stamps never collide with restored ones.
pub fn ensure_serial_above(serial: u64) {
    NEXT_SERIAL.fetch_max(serial + 1, Ordering::Relaxed);
}

/// When a statement holds: at a logical step, or timelessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccurrenceTime {
    Eternal,
    At(i64),
}

impl OccurrenceTime {
    pub fn is_eternal(&self) -> bool {
        matches!(self, OccurrenceTime::Eternal)
    }

    /// Merge rule: eternal defers to a concrete time; two concrete times
    /// keep the later one.
    pub fn merged(self, other: OccurrenceTime) -> OccurrenceTime {
        match (self, other) {
            (OccurrenceTime::Eternal, t) => t,
            (t, OccurrenceTime::Eternal) => t,
            (OccurrenceTime::At(a), OccurrenceTime::At(b)) => OccurrenceTime::At(a.max(b)),
        }
    }
}

/// Evidence trail of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stamp {
    serial: u64,
    occurrence: OccurrenceTime,
    creation_time: i64,
    /// Most recent first, at most [`MAX_EVIDENCE`] entries.
    evidence: Vec<u64>,
}

impl Stamp {
    /// A fresh input stamp whose evidential base is its own serial.
    pub fn input(occurrence: OccurrenceTime, creation_time: i64) -> Self {
        let serial = next_serial();
        Stamp {
            serial,
            occurrence,
            creation_time,
            evidence: vec![serial],
        }
    }

    /// Reconstruct a stamp with explicit fields (snapshot restore).
    pub fn restore(
        serial: u64,
        occurrence: OccurrenceTime,
        creation_time: i64,
        evidence: Vec<u64>,
    ) -> Self {
        ensure_serial_above(serial);
        let mut evidence = evidence;
        evidence.truncate(MAX_EVIDENCE);
        Stamp {
            serial,
            occurrence,
            creation_time,
            evidence,
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn occurrence(&self) -> OccurrenceTime {
        self.occurrence
    }

    pub fn creation_time(&self) -> i64 {
        self.creation_time
    }

    pub fn evidence(&self) -> &[u64] {
        &self.evidence
    }

    /// Whether the evidential bases share any serial.
    pub fn overlaps(&self, other: &Stamp) -> bool {
        self.evidence.iter().any(|id| other.evidence.contains(id))
    }

    /// Merge two stamps for a derived task. Returns `None` when the bases
    /// overlap. The merged base interleaves both bases (most recent first)
    /// and truncates to [`MAX_EVIDENCE`].
    pub fn merge(a: &Stamp, b: &Stamp, creation_time: i64) -> Option<Stamp> {
        if a.overlaps(b) {
            return None;
        }
        let mut evidence = Vec::with_capacity(MAX_EVIDENCE);
        let mut ia = a.evidence.iter();
        let mut ib = b.evidence.iter();
        loop {
            let mut advanced = false;
            if let Some(&id) = ia.next() {
                evidence.push(id);
                advanced = true;
            }
            if let Some(&id) = ib.next() {
                evidence.push(id);
                advanced = true;
            }
            if !advanced || evidence.len() >= MAX_EVIDENCE {
                break;
            }
        }
        evidence.truncate(MAX_EVIDENCE);
        Some(Stamp {
            serial: next_serial(),
            occurrence: a.occurrence.merged(b.occurrence),
            creation_time,
            evidence,
        })
    }

    /// A derived stamp from a single premise.
    pub fn derived_single(parent: &Stamp, creation_time: i64) -> Stamp {
        let mut evidence = parent.evidence.clone();
        evidence.truncate(MAX_EVIDENCE);
        Stamp {
            serial: next_serial(),
            occurrence: parent.occurrence,
            creation_time,
            evidence,
        }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}{{", self.serial)?;
        for (i, id) in self.evidence.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "}}")
    }
}
