use rand::Rng;

use crate::species::SpeciesCatalog;

/// Upper bound (exclusive) on the number of draws thrown away before each sample.
const JITTER_MAX: usize = 10;

/// Draws random species from a catalog.
///
/// The sampler owns its random source, so a run that wants reproducible
/// output seeds one generator and threads it through here. Before every
/// sample the source is advanced a random number of extra times; this does
/// not change the distribution, but it does change which values a seeded
/// stream produces, so fixed-seed output depends on it.
pub struct SpeciesSampler<'a, R> {
    catalog: SpeciesCatalog<'a>,
    rng: R,
    jitter: bool,
}

impl<'a, R: Rng> SpeciesSampler<'a, R> {
    pub fn new(catalog: SpeciesCatalog<'a>, rng: R) -> Self {
        Self {
            catalog,
            rng,
            jitter: true,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn catalog(&self) -> &SpeciesCatalog<'a> {
        &self.catalog
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Advances the source 0..=9 times, discarding each draw.
    pub fn jitter(&mut self) {
        let len = self.catalog.len();
        let skip = self.rng.gen_range(0..JITTER_MAX);
        for _ in 0..skip {
            let _ = self.rng.gen_range(0..len);
        }
    }

    /// Picks a uniformly random species, re-drawing while the pick is
    /// reserved and `exclude_reserved` is set.
    pub fn sample(&mut self, exclude_reserved: bool) -> u8 {
        if self.jitter {
            self.jitter();
        }

        let species = self.catalog.all();
        loop {
            let id = species[self.rng.gen_range(0..species.len())];
            if !exclude_reserved || !self.catalog.is_reserved(id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{SpeciesCatalog, LEGENDARY_SPECIES};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn samples_are_catalog_members() {
        let catalog = SpeciesCatalog::RED_BLUE;
        let mut sampler = SpeciesSampler::new(catalog, StdRng::seed_from_u64(7));
        for _ in 0..2000 {
            assert!(catalog.contains(sampler.sample(false)));
        }
    }

    #[test]
    fn exclusion_never_yields_reserved() {
        let catalog = SpeciesCatalog::RED_BLUE;
        let mut sampler = SpeciesSampler::new(catalog, StdRng::seed_from_u64(42));
        for _ in 0..2000 {
            let id = sampler.sample(true);
            assert!(!LEGENDARY_SPECIES.contains(&id));
        }
    }

    #[test]
    fn exclusion_terminates_with_one_free_species() {
        let catalog = SpeciesCatalog::new(&[1, 2, 3, 4, 5], &[1, 2, 3, 4]).unwrap();
        let mut sampler = SpeciesSampler::new(catalog, StdRng::seed_from_u64(3));
        for _ in 0..100 {
            assert_eq!(sampler.sample(true), 5);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let catalog = SpeciesCatalog::RED_BLUE;
        let mut a = SpeciesSampler::new(catalog, StdRng::seed_from_u64(1234));
        let mut b = SpeciesSampler::new(catalog, StdRng::seed_from_u64(1234));
        let xs: Vec<u8> = (0..64).map(|_| a.sample(true)).collect();
        let ys: Vec<u8> = (0..64).map(|_| b.sample(true)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn jitter_matches_manual_discard_pattern() {
        let catalog = SpeciesCatalog::RED_BLUE;
        let len = catalog.len();
        let mut sampler = SpeciesSampler::new(catalog, StdRng::seed_from_u64(99));
        let mut reference = StdRng::seed_from_u64(99);

        for _ in 0..32 {
            let skip = reference.gen_range(0..JITTER_MAX);
            for _ in 0..skip {
                let _ = reference.gen_range(0..len);
            }
            let expected = catalog.all()[reference.gen_range(0..len)];
            assert_eq!(sampler.sample(false), expected);
        }
    }

    #[test]
    fn jitter_can_be_disabled() {
        let catalog = SpeciesCatalog::RED_BLUE;
        let len = catalog.len();
        let mut sampler =
            SpeciesSampler::new(catalog, StdRng::seed_from_u64(5)).with_jitter(false);
        let mut reference = StdRng::seed_from_u64(5);
        for _ in 0..32 {
            let expected = catalog.all()[reference.gen_range(0..len)];
            assert_eq!(sampler.sample(false), expected);
        }
    }
}
