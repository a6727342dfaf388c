use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::sampler::SpeciesSampler;
use crate::{RandomiserError, Result};

/// One-to-one species substitution for a single randomisation run.
///
/// Every species in the catalog is a key. Targets are drawn without
/// replacement, so with `exclude_reserved` off the map is a permutation of
/// the catalog.
///
/// With `exclude_reserved` on, each reserved entry of the target pool is
/// first swapped for a random non-reserved species. That draw may repeat a
/// species already in the pool, in which case two sources can share a
/// target. Reserved species still appear as sources; only the targets are
/// restricted.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SpeciesMap {
    table: BTreeMap<u8, u8>,
}

impl SpeciesMap {
    pub fn build<R: Rng>(sampler: &mut SpeciesSampler<'_, R>, exclude_reserved: bool) -> Self {
        let catalog = *sampler.catalog();
        let mut pool: Vec<u8> = catalog.all().to_vec();

        if exclude_reserved {
            for &reserved in catalog.reserved() {
                if let Some(slot) = pool.iter().position(|&id| id == reserved) {
                    pool[slot] = sampler.sample(true);
                }
            }
        }

        let mut table = BTreeMap::new();
        for &source in catalog.all() {
            let pick = sampler.rng_mut().gen_range(0..pool.len());
            let target = pool[pick];
            table.insert(source, target);

            // Remove the first entry with this value, which is not
            // necessarily `pick` when the pool holds duplicates.
            if let Some(first) = pool.iter().position(|&id| id == target) {
                pool.remove(first);
            }
        }

        log::debug!(
            "built species map over {} species (exclude_reserved: {})",
            table.len(),
            exclude_reserved
        );

        Self { table }
    }

    /// Target for `id`; an id outside the catalog means the image and the
    /// catalog disagree.
    pub fn apply(&self, id: u8) -> Result<u8> {
        self.table
            .get(&id)
            .copied()
            .ok_or(RandomiserError::UnknownSpecies(id))
    }

    pub fn get(&self, id: u8) -> Option<u8> {
        self.table.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.table.iter().map(|(&from, &to)| (from, to))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
