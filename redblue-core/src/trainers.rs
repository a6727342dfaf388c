//! Trainer party data.
//!
//! The party region is a run of variable-length records in two shapes:
//!
//! * regular: `00 <level> <species>... 00`, every party member at one level;
//! * special: `[00 FF] <level> <species> <level> <species>... 00`, one level
//!   per member, closed by a zero where the next level would be.
//!
//! A record's closing `00` is also the leading `00` of the record after it,
//! so the scanner resumes on the terminator rather than past it. The very
//! first party of the cartridge has no record before it and therefore no
//! `00` flag; [`TrainerRegion::leading_regular`] marks a region that opens on
//! such a party's level byte.

use std::iter::StepBy;
use std::ops::Range;

use crate::Result;

/// Closes a roster; also the flag byte that opens a regular record.
pub const ROSTER_END: u8 = 0x00;

/// Second header byte of a special record.
pub const SPECIAL_MARKER: u8 = 0xFF;

/// A record opening with `(b0, b1)` is regular when `b0` is the zero flag
/// and `b1` is a level rather than the special marker.
pub fn is_regular_header(b0: u8, b1: u8) -> bool {
    b0 == ROSTER_END && b1 != SPECIAL_MARKER
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TrainerRecord {
    /// `roster` covers the species bytes; it ends on the terminator.
    Regular {
        start: usize,
        level: u8,
        roster: Range<usize>,
    },
    /// `roster` covers the (level, species) pairs; it ends on the zero
    /// level byte.
    Special { start: usize, roster: Range<usize> },
}

impl TrainerRecord {
    pub fn start(&self) -> usize {
        match self {
            TrainerRecord::Regular { start, .. } | TrainerRecord::Special { start, .. } => *start,
        }
    }

    /// Offset of the closing zero, where the next record begins.
    pub fn terminator(&self) -> usize {
        match self {
            TrainerRecord::Regular { roster, .. } | TrainerRecord::Special { roster, .. } => {
                roster.end
            }
        }
    }

    /// Offsets of every species byte in this record.
    pub fn species_offsets(&self) -> StepBy<Range<usize>> {
        match self {
            TrainerRecord::Regular { roster, .. } => roster.clone().step_by(1),
            TrainerRecord::Special { roster, .. } => (roster.start + 1..roster.end).step_by(2),
        }
    }

    /// `(level, species)` for each party member, read from `image`.
    pub fn party(&self, image: &[u8]) -> Vec<(u8, u8)> {
        match self {
            TrainerRecord::Regular { level, .. } => self
                .species_offsets()
                .map(|off| (*level, image[off]))
                .collect(),
            TrainerRecord::Special { .. } => self
                .species_offsets()
                .map(|off| (image[off - 1], image[off]))
                .collect(),
        }
    }
}

/// Decodes the record starting at `cursor`.
///
/// Panics if a roster runs off the end of `image`; the caller owns the
/// guarantee that the region is well formed.
pub fn decode_record(image: &[u8], cursor: usize) -> TrainerRecord {
    let (b0, b1) = (image[cursor], image[cursor + 1]);

    if is_regular_header(b0, b1) {
        let first = cursor + 2;
        let mut end = first;
        while image[end] != ROSTER_END {
            end += 1;
        }
        return TrainerRecord::Regular {
            start: cursor,
            level: b1,
            roster: first..end,
        };
    }

    // A special record either carries the `00 FF` header or starts
    // directly on its first pair.
    let first = if b0 == ROSTER_END { cursor + 2 } else { cursor };
    let mut end = first;
    while image[end] != ROSTER_END {
        end += 2;
    }
    TrainerRecord::Special {
        start: cursor,
        roster: first..end,
    }
}

/// Decodes a regular record whose `00` flag is implied, with `cursor` on
/// its level byte.
pub fn decode_flagless_regular(image: &[u8], cursor: usize) -> TrainerRecord {
    let first = cursor + 1;
    let mut end = first;
    while image[end] != ROSTER_END {
        end += 1;
    }
    TrainerRecord::Regular {
        start: cursor,
        level: image[cursor],
        roster: first..end,
    }
}

/// Bounds of the party data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrainerRegion {
    pub range: Range<usize>,
    /// `range.start` is the level byte of a regular party with no `00` flag.
    pub leading_regular: bool,
}

impl TrainerRegion {
    pub const fn new(range: Range<usize>) -> Self {
        Self {
            range,
            leading_regular: false,
        }
    }

    pub const fn leading_regular(range: Range<usize>) -> Self {
        Self {
            range,
            leading_regular: true,
        }
    }

    fn decode_at(&self, image: &[u8], cursor: usize) -> TrainerRecord {
        if self.leading_regular && cursor == self.range.start {
            decode_flagless_regular(image, cursor)
        } else {
            decode_record(image, cursor)
        }
    }
}

impl From<Range<usize>> for TrainerRegion {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

/// Lists the records in `region` without modifying anything.
pub fn trainer_records(image: &[u8], region: impl Into<TrainerRegion>) -> Vec<TrainerRecord> {
    let region = region.into();
    let mut records = Vec::new();
    let mut cursor = region.range.start;
    while cursor + 1 < region.range.end {
        let record = region.decode_at(image, cursor);
        cursor = record.terminator();
        records.push(record);
    }
    records
}

/// Walks the party region once, handing every species byte to `replace`.
///
/// Headers, markers and terminators are never passed on. The scan stops when
/// the cursor reaches the end of the region or rests on its final byte.
/// Returns the number of species bytes visited.
pub fn scan_trainer_region<F>(
    image: &mut [u8],
    region: impl Into<TrainerRegion>,
    mut replace: F,
) -> Result<usize>
where
    F: FnMut(&mut u8) -> Result<()>,
{
    let region = region.into();
    let mut visited = 0usize;
    let mut cursor = region.range.start;
    while cursor + 1 < region.range.end {
        let record = region.decode_at(image, cursor);
        for off in record.species_offsets() {
            replace(&mut image[off])?;
            visited += 1;
        }
        cursor = record.terminator();
    }
    Ok(visited)
}
