//! Species catalog for Pokémon Red/Blue.
//!
//! Species are stored in the cartridge by their internal index, not their
//! Pokédex number, and the internal index space has gaps (the "MissingNo."
//! slots). Only indexes listed in [`RED_BLUE_SPECIES`] are ever written.

use crate::{RandomiserError, Result};

/// Every valid internal species index, in index order.
pub const RED_BLUE_SPECIES: [u8; 151] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
    0x0F, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C,
    0x1D, 0x1E, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x2B, 0x2C,
    0x2D, 0x2E, 0x2F, 0x30, 0x31, 0x33, 0x35, 0x36, 0x37, 0x39, 0x3A, 0x3B, 0x3C, 0x40,
    0x41, 0x42, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x52, 0x53, 0x54,
    0x55, 0x58, 0x59, 0x5A, 0x5B, 0x5C, 0x5D, 0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66,
    0x67, 0x68, 0x69, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0x74, 0x75,
    0x76, 0x77, 0x78, 0x7B, 0x7C, 0x7D, 0x7E, 0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x88,
    0x8A, 0x8B, 0x8D, 0x8E, 0x8F, 0x90, 0x91, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99,
    0x9A, 0x9B, 0x9D, 0x9E, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xAB, 0xAD,
    0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB9, 0xBA, 0xBB, 0xBC, 0xBD, 0xBE,
];

/// Moltres, Articuno, Zapdos, Mewtwo and Mew.
pub const LEGENDARY_SPECIES: [u8; 5] = [0x49, 0x4A, 0x4B, 0x83, 0x15];

#[derive(Copy, Clone, Debug)]
pub struct SpeciesCatalog<'a> {
    species: &'a [u8],
    reserved: &'a [u8],
}

impl SpeciesCatalog<'static> {
    pub const RED_BLUE: SpeciesCatalog<'static> = SpeciesCatalog {
        species: &RED_BLUE_SPECIES,
        reserved: &LEGENDARY_SPECIES,
    };
}

impl<'a> SpeciesCatalog<'a> {
    /// Builds a catalog from an ordered id list and its reserved subset.
    ///
    /// The reserved set must be a strict subset of `species`, otherwise
    /// sampling with exclusion could never terminate. 0x00 and 0xFF are
    /// rejected because the trainer data uses them as sentinels.
    pub fn new(species: &'a [u8], reserved: &'a [u8]) -> Result<Self> {
        if species.is_empty() {
            return Err(RandomiserError::Config(
                "species catalog is empty".to_string(),
            ));
        }

        for (i, &id) in species.iter().enumerate() {
            if id == 0x00 || id == 0xFF {
                return Err(RandomiserError::Config(format!(
                    "species catalog contains sentinel byte 0x{:02X}",
                    id
                )));
            }
            if species[..i].contains(&id) {
                return Err(RandomiserError::Config(format!(
                    "species catalog lists 0x{:02X} more than once",
                    id
                )));
            }
        }

        if let Some(&id) = reserved.iter().find(|id| !species.contains(id)) {
            return Err(RandomiserError::Config(format!(
                "reserved species 0x{:02X} is not in the catalog",
                id
            )));
        }

        if species.iter().all(|id| reserved.contains(id)) {
            return Err(RandomiserError::Config(
                "every species in the catalog is reserved".to_string(),
            ));
        }

        Ok(Self { species, reserved })
    }

    pub fn all(&self) -> &'a [u8] {
        self.species
    }

    pub fn reserved(&self) -> &'a [u8] {
        self.reserved
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn contains(&self, id: u8) -> bool {
        self.species.contains(&id)
    }

    pub fn is_reserved(&self, id: u8) -> bool {
        self.reserved.contains(&id)
    }
}

/// Display name for a Red/Blue internal species index.
pub fn species_name(id: u8) -> Option<&'static str> {
    match id {
        0x01 => Some("Rhydon"),
        0x02 => Some("Kangaskhan"),
        0x03 => Some("Nidoran M"),
        0x04 => Some("Clefairy"),
        0x05 => Some("Spearow"),
        0x06 => Some("Voltorb"),
        0x07 => Some("Nidoking"),
        0x08 => Some("Slowbro"),
        0x09 => Some("Ivysaur"),
        0x0A => Some("Exeggutor"),
        0x0B => Some("Lickitung"),
        0x0C => Some("Exeggcute"),
        0x0D => Some("Grimer"),
        0x0E => Some("Gengar"),
        0x0F => Some("Nidoran F"),
        0x10 => Some("Nidoqueen"),
        0x11 => Some("Cubone"),
        0x12 => Some("Rhyhorn"),
        0x13 => Some("Lapras"),
        0x14 => Some("Arcanine"),
        0x15 => Some("Mew"),
        0x16 => Some("Gyarados"),
        0x17 => Some("Shellder"),
        0x18 => Some("Tentacool"),
        0x19 => Some("Gastly"),
        0x1A => Some("Scyther"),
        0x1B => Some("Staryu"),
        0x1C => Some("Blastoise"),
        0x1D => Some("Pinsir"),
        0x1E => Some("Tangela"),
        0x21 => Some("Growlithe"),
        0x22 => Some("Onix"),
        0x23 => Some("Fearow"),
        0x24 => Some("Pidgey"),
        0x25 => Some("Slowpoke"),
        0x26 => Some("Kadabra"),
        0x27 => Some("Graveler"),
        0x28 => Some("Chansey"),
        0x29 => Some("Machoke"),
        0x2A => Some("Mr. Mime"),
        0x2B => Some("Hitmonlee"),
        0x2C => Some("Hitmonchan"),
        0x2D => Some("Arbok"),
        0x2E => Some("Parasect"),
        0x2F => Some("Psyduck"),
        0x30 => Some("Drowzee"),
        0x31 => Some("Golem"),
        0x33 => Some("Magmar"),
        0x35 => Some("Electabuzz"),
        0x36 => Some("Magneton"),
        0x37 => Some("Koffing"),
        0x39 => Some("Mankey"),
        0x3A => Some("Seel"),
        0x3B => Some("Diglett"),
        0x3C => Some("Tauros"),
        0x40 => Some("Farfetch'd"),
        0x41 => Some("Venonat"),
        0x42 => Some("Dragonite"),
        0x46 => Some("Doduo"),
        0x47 => Some("Poliwag"),
        0x48 => Some("Jynx"),
        0x49 => Some("Moltres"),
        0x4A => Some("Articuno"),
        0x4B => Some("Zapdos"),
        0x4C => Some("Ditto"),
        0x4D => Some("Meowth"),
        0x4E => Some("Krabby"),
        0x52 => Some("Vulpix"),
        0x53 => Some("Ninetales"),
        0x54 => Some("Pikachu"),
        0x55 => Some("Raichu"),
        0x58 => Some("Dratini"),
        0x59 => Some("Dragonair"),
        0x5A => Some("Kabuto"),
        0x5B => Some("Kabutops"),
        0x5C => Some("Horsea"),
        0x5D => Some("Seadra"),
        0x60 => Some("Sandshrew"),
        0x61 => Some("Sandslash"),
        0x62 => Some("Omanyte"),
        0x63 => Some("Omastar"),
        0x64 => Some("Jigglypuff"),
        0x65 => Some("Wigglytuff"),
        0x66 => Some("Eevee"),
        0x67 => Some("Flareon"),
        0x68 => Some("Jolteon"),
        0x69 => Some("Vaporeon"),
        0x6A => Some("Machop"),
        0x6B => Some("Zubat"),
        0x6C => Some("Ekans"),
        0x6D => Some("Paras"),
        0x6E => Some("Poliwhirl"),
        0x6F => Some("Poliwrath"),
        0x70 => Some("Weedle"),
        0x71 => Some("Kakuna"),
        0x72 => Some("Beedrill"),
        0x74 => Some("Dodrio"),
        0x75 => Some("Primeape"),
        0x76 => Some("Dugtrio"),
        0x77 => Some("Venomoth"),
        0x78 => Some("Dewgong"),
        0x7B => Some("Caterpie"),
        0x7C => Some("Metapod"),
        0x7D => Some("Butterfree"),
        0x7E => Some("Machamp"),
        0x80 => Some("Golduck"),
        0x81 => Some("Hypno"),
        0x82 => Some("Golbat"),
        0x83 => Some("Mewtwo"),
        0x84 => Some("Snorlax"),
        0x85 => Some("Magikarp"),
        0x88 => Some("Muk"),
        0x8A => Some("Kingler"),
        0x8B => Some("Cloyster"),
        0x8D => Some("Electrode"),
        0x8E => Some("Clefable"),
        0x8F => Some("Weezing"),
        0x90 => Some("Persian"),
        0x91 => Some("Marowak"),
        0x93 => Some("Haunter"),
        0x94 => Some("Abra"),
        0x95 => Some("Alakazam"),
        0x96 => Some("Pidgeotto"),
        0x97 => Some("Pidgeot"),
        0x98 => Some("Starmie"),
        0x99 => Some("Bulbasaur"),
        0x9A => Some("Venusaur"),
        0x9B => Some("Tentacruel"),
        0x9D => Some("Goldeen"),
        0x9E => Some("Seaking"),
        0xA3 => Some("Ponyta"),
        0xA4 => Some("Rapidash"),
        0xA5 => Some("Rattata"),
        0xA6 => Some("Raticate"),
        0xA7 => Some("Nidorino"),
        0xA8 => Some("Nidorina"),
        0xA9 => Some("Geodude"),
        0xAA => Some("Porygon"),
        0xAB => Some("Aerodactyl"),
        0xAD => Some("Magnemite"),
        0xB0 => Some("Charmander"),
        0xB1 => Some("Squirtle"),
        0xB2 => Some("Charmeleon"),
        0xB3 => Some("Wartortle"),
        0xB4 => Some("Charizard"),
        0xB9 => Some("Oddish"),
        0xBA => Some("Gloom"),
        0xBB => Some("Vileplume"),
        0xBC => Some("Bellsprout"),
        0xBD => Some("Weepinbell"),
        0xBE => Some("Victreebel"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_blue_catalog_is_valid() {
        let catalog = SpeciesCatalog::new(&RED_BLUE_SPECIES, &LEGENDARY_SPECIES).unwrap();
        assert_eq!(catalog.len(), 151);
        assert!(catalog.is_reserved(0x83));
        assert!(!catalog.is_reserved(0x54));
    }

    #[test]
    fn every_species_has_a_name() {
        for id in RED_BLUE_SPECIES {
            assert!(species_name(id).is_some(), "missing name for 0x{:02X}", id);
        }
        assert_eq!(species_name(0x54), Some("Pikachu"));
        assert_eq!(species_name(0x1F), None);
    }

    #[test]
    fn rejects_fully_reserved_catalog() {
        assert!(SpeciesCatalog::new(&[1, 2], &[1, 2]).is_err());
    }

    #[test]
    fn rejects_reserved_outside_catalog() {
        assert!(SpeciesCatalog::new(&[1, 2, 3], &[9]).is_err());
    }

    #[test]
    fn rejects_sentinels_and_duplicates() {
        assert!(SpeciesCatalog::new(&[0, 1], &[]).is_err());
        assert!(SpeciesCatalog::new(&[1, 0xFF], &[]).is_err());
        assert!(SpeciesCatalog::new(&[1, 2, 1], &[]).is_err());
        assert!(SpeciesCatalog::new(&[], &[]).is_err());
    }
}
