use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::trainers::TrainerRegion;
use crate::{RandomiserError, Result};

/// Cartridge header title field.
const TITLE_RANGE: Range<usize> = 0x134..0x144;

const TITLE_RED: &str = "POKEMON RED";
const TITLE_BLUE: &str = "POKEMON BLUE";

/// Number of (level, species) pairs in one wild encounter table.
pub const WILD_SLOTS: usize = 10;

const BANK_SIZE: usize = 0x4000;
const POINTER_TABLE_END: u16 = 0xFFFF;
/// More map pointers than any Game Boy title has; guards a missing terminator.
const MAX_WILD_MAPS: usize = 0x100;

/// A loaded cartridge image. The length is fixed once loaded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rom {
    bytes: Vec<u8>,
}

impl Rom {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(Self { bytes })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &self.bytes)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Header title, trimmed of padding. `None` if the image is too short.
    pub fn title(&self) -> Option<String> {
        let raw = self.bytes.get(TITLE_RANGE)?;
        let title: String = raw.iter().map(|&b| b as char).collect();
        Some(
            title
                .trim_matches(|c: char| c == '\0' || c.is_ascii_whitespace())
                .to_string(),
        )
    }

    /// Whether the header names Pokémon Red or Pokémon Blue (US).
    pub fn is_red_blue(&self) -> bool {
        matches!(self.title().as_deref(), Some(TITLE_RED) | Some(TITLE_BLUE))
    }
}

/// How to find the wild encounter tables.
#[derive(Clone, Debug)]
pub enum WildAreas<'a> {
    /// Base of each table: `WILD_SLOTS` consecutive (level, species) pairs.
    Fixed(&'a [usize]),
    /// A table of little-endian bank-local pointers at `table`, one per map,
    /// ended by `FF FF`. Each map's data is a grass rate followed by its
    /// pairs, then a water rate followed by its pairs; a zero rate means no
    /// pairs follow. Maps sharing a pointer share one table.
    Pointers { table: usize, bank: usize },
}

/// Where species live in a particular cartridge.
#[derive(Clone, Debug)]
pub struct RomLayout<'a> {
    /// Species shown cycling on the title screen.
    pub title_screen: &'a [usize],
    /// Every byte that names one of the three starters, including rival and
    /// in-script references.
    pub starters: &'a [usize],
    pub wild_areas: WildAreas<'a>,
    pub trainers: TrainerRegion,
}

const RED_BLUE_TITLE_SCREEN: [usize; 16] = [
    0x4588, 0x4589, 0x458A, 0x458B, 0x458C, 0x458D, 0x458E, 0x458F, 0x4590, 0x4591, 0x4592,
    0x4593, 0x4594, 0x4595, 0x4596, 0x4597,
];

const RED_BLUE_STARTERS: [usize; 21] = [
    // Charmander
    0x1D126, 0x1CC84, 0x1D10E, 0x39CF8, 0x50FB3, 0x510DD,
    // Squirtle
    0x1D104, 0x19591, 0x1CC88, 0x1CDC8, 0x1D11F, 0x39CF2, 0x50FB1, 0x510DB,
    // Bulbasaur
    0x1D115, 0x19599, 0x1CDD0, 0x1D130, 0x39CF0, 0x50FB5, 0x510DF,
];

/// `WildDataPointers` in bank 3.
pub const RED_BLUE_WILD_POINTERS: usize = 0xCEEB;

impl RomLayout<'static> {
    pub const RED_BLUE_US: RomLayout<'static> = RomLayout {
        title_screen: &RED_BLUE_TITLE_SCREEN,
        starters: &RED_BLUE_STARTERS,
        wild_areas: WildAreas::Pointers {
            table: RED_BLUE_WILD_POINTERS,
            bank: 3,
        },
        // Opens on the first party's level byte; that party has no flag.
        trainers: TrainerRegion::leading_regular(0x39D99..0x3A52E),
    };
}

impl RomLayout<'_> {
    /// Verifies that every offset falls inside an image of `len` bytes.
    pub fn check(&self, len: usize) -> Result<()> {
        let out_of_range = |what: &str, off: usize| {
            RandomiserError::Config(format!(
                "{} offset 0x{:X} is outside a {} byte image",
                what, off, len
            ))
        };

        if let Some(&off) = self.title_screen.iter().find(|&&off| off >= len) {
            return Err(out_of_range("title screen", off));
        }
        if let Some(&off) = self.starters.iter().find(|&&off| off >= len) {
            return Err(out_of_range("starter", off));
        }
        match &self.wild_areas {
            WildAreas::Fixed(bases) => {
                if let Some(&base) = bases.iter().find(|&&base| base + 2 * WILD_SLOTS > len) {
                    return Err(out_of_range("wild area", base));
                }
            }
            WildAreas::Pointers { table, .. } => {
                if table + 2 > len {
                    return Err(out_of_range("wild pointer table", *table));
                }
            }
        }
        let trainers = &self.trainers.range;
        if trainers.start > trainers.end {
            return Err(RandomiserError::Config(format!(
                "trainer range 0x{:X}..0x{:X} is inverted",
                trainers.start, trainers.end
            )));
        }
        if trainers.end > len {
            return Err(out_of_range("trainer end", trainers.end));
        }
        Ok(())
    }

    /// Base offset of every wild table in `image`, in pointer-table order
    /// with shared tables listed once.
    pub fn wild_area_bases(&self, image: &[u8]) -> Result<Vec<usize>> {
        let len = image.len();
        let (table, bank) = match &self.wild_areas {
            WildAreas::Fixed(bases) => return Ok(bases.to_vec()),
            WildAreas::Pointers { table, bank } => (*table, *bank),
        };

        let byte_at = |off: usize| {
            image.get(off).copied().ok_or_else(|| {
                RandomiserError::Config(format!(
                    "wild data offset 0x{:X} is outside a {} byte image",
                    off, len
                ))
            })
        };

        let mut bases = Vec::new();
        let mut areas: Vec<usize> = Vec::new();
        let mut cursor = table;
        for _ in 0..=MAX_WILD_MAPS {
            let pointer = u16::from_le_bytes([byte_at(cursor)?, byte_at(cursor + 1)?]);
            if pointer == POINTER_TABLE_END {
                return Ok(bases);
            }
            cursor += 2;

            let local = pointer as usize;
            if !(BANK_SIZE..2 * BANK_SIZE).contains(&local) {
                return Err(RandomiserError::Config(format!(
                    "wild pointer 0x{:04X} at 0x{:X} is not a switchable-bank address",
                    pointer,
                    cursor - 2
                )));
            }
            let area = bank * BANK_SIZE + (local - BANK_SIZE);
            if areas.contains(&area) {
                continue;
            }
            areas.push(area);

            // Grass table, then water table.
            let mut off = area;
            for _ in 0..2 {
                let rate = byte_at(off)?;
                off += 1;
                if rate != 0 {
                    byte_at(off + 2 * WILD_SLOTS - 1)?;
                    bases.push(off);
                    off += 2 * WILD_SLOTS;
                }
            }
        }

        Err(RandomiserError::Config(format!(
            "wild pointer table at 0x{:X} has no end marker",
            table
        )))
    }
}
