use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::remap::SpeciesMap;
use crate::rom::{Rom, RomLayout, WildAreas, WILD_SLOTS};
use crate::sampler::SpeciesSampler;
use crate::species::SpeciesCatalog;
use crate::trainers::scan_trainer_region;
use crate::Result;

/// Which regions to touch and how to pick replacements.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizeOptions {
    pub title_screen: bool,
    pub player_starters: bool,
    pub wild_areas: bool,
    pub trainers: bool,
    /// Build one substitution table and use it for every slot.
    pub one_to_one: bool,
    /// Never write a legendary species.
    pub no_legendaries: bool,
}

impl RandomizeOptions {
    pub fn all_regions() -> Self {
        Self {
            title_screen: true,
            player_starters: true,
            wild_areas: true,
            trainers: true,
            ..Self::default()
        }
    }

    /// Reads options from a JSON preset. Missing fields default to off.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// What a run changed.
#[derive(Clone, Debug, Default)]
pub struct RandomizeReport {
    pub species_map: Option<SpeciesMap>,
    pub title_screen_slots: usize,
    pub starter_slots: usize,
    pub wild_slots: usize,
    pub trainer_slots: usize,
    /// Base offset of each wild table that was rewritten.
    pub wild_tables: Vec<usize>,
}

enum Replacement<'m> {
    Random { exclude_reserved: bool },
    OneToOne(&'m SpeciesMap),
}

impl Replacement<'_> {
    fn apply<R: Rng>(&self, sampler: &mut SpeciesSampler<'_, R>, slot: &mut u8) -> Result<()> {
        *slot = match self {
            Replacement::Random { exclude_reserved } => sampler.sample(*exclude_reserved),
            Replacement::OneToOne(map) => map.apply(*slot)?,
        };
        Ok(())
    }
}

/// Rewrites the species slots of a cartridge image.
pub struct Randomizer<'a, R> {
    sampler: SpeciesSampler<'a, R>,
    layout: RomLayout<'a>,
}

impl<'a, R: Rng> Randomizer<'a, R> {
    pub fn new(catalog: SpeciesCatalog<'a>, layout: RomLayout<'a>, rng: R) -> Self {
        Self {
            sampler: SpeciesSampler::new(catalog, rng),
            layout,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.sampler = self.sampler.with_jitter(jitter);
        self
    }

    pub fn layout(&self) -> &RomLayout<'a> {
        &self.layout
    }

    pub fn catalog(&self) -> &SpeciesCatalog<'a> {
        self.sampler.catalog()
    }

    /// Randomises every enabled region of `rom` in place.
    ///
    /// Regions run in a fixed order (title screen, starters, wild areas,
    /// trainers) so a seeded source gives the same image every time. The
    /// layout is checked, and the wild tables located, before the first write.
    pub fn randomize(
        &mut self,
        rom: &mut Rom,
        options: &RandomizeOptions,
    ) -> Result<RandomizeReport> {
        self.layout.check(rom.len())?;
        let wild_tables = if options.wild_areas {
            self.layout.wild_area_bases(rom.as_bytes())?
        } else {
            Vec::new()
        };

        let species_map = if options.one_to_one {
            Some(SpeciesMap::build(&mut self.sampler, options.no_legendaries))
        } else {
            None
        };
        let replacement = match &species_map {
            Some(map) => Replacement::OneToOne(map),
            None => Replacement::Random {
                exclude_reserved: options.no_legendaries,
            },
        };

        let sampler = &mut self.sampler;
        let layout = &self.layout;
        let image = rom.as_bytes_mut();
        let mut report = RandomizeReport::default();

        if options.title_screen {
            for &off in layout.title_screen {
                replacement.apply(sampler, &mut image[off])?;
            }
            report.title_screen_slots = layout.title_screen.len();
        }

        if options.player_starters {
            for &off in layout.starters {
                replacement.apply(sampler, &mut image[off])?;
            }
            report.starter_slots = layout.starters.len();
        }

        if options.wild_areas {
            for &base in &wild_tables {
                for slot in 0..WILD_SLOTS {
                    // Level byte at base + 2k is left alone.
                    replacement.apply(sampler, &mut image[base + 2 * slot + 1])?;
                }
            }
            report.wild_slots = wild_tables.len() * WILD_SLOTS;
            log::debug!("{} wild tables", wild_tables.len());
        }

        if options.trainers {
            report.trainer_slots = scan_trainer_region(image, layout.trainers.clone(), |slot| {
                replacement.apply(sampler, slot)
            })?;
        }

        log::info!(
            "randomised {} title, {} starter, {} wild and {} trainer slots",
            report.title_screen_slots,
            report.starter_slots,
            report.wild_slots,
            report.trainer_slots
        );

        report.species_map = species_map;
        report.wild_tables = wild_tables;
        Ok(report)
    }
}
