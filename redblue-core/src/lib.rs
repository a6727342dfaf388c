use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod randomize;
pub mod remap;
pub mod rom;
pub mod sampler;
pub mod species;
pub mod trainers;

pub use randomize::{RandomizeOptions, RandomizeReport, Randomizer};
pub use remap::SpeciesMap;
pub use rom::{Rom, RomLayout, WildAreas};
pub use sampler::SpeciesSampler;
pub use species::{species_name, SpeciesCatalog};
pub use trainers::TrainerRegion;

#[derive(Debug, Clone, Serialize)]
pub struct RandomiserSettings {
    pub seed: u64,
    pub options: RandomizeOptions,
    /// Discard a random number of draws before every sample.
    pub jitter: bool,
    pub debug: bool,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum RandomiserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("species 0x{0:02X} is not in the catalog")]
    UnknownSpecies(u8),
}

pub type Result<T> = std::result::Result<T, RandomiserError>;

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!("{}.{}", stem, suffix))
}

fn describe(id: u8) -> String {
    match species_name(id) {
        Some(name) => name.to_string(),
        None => format!("0x{:02X}", id),
    }
}

fn push_change(log: &mut String, offset: usize, before: u8, after: u8) {
    log.push_str(&format!(
        "  0x{:05X}: {} -> {}\n",
        offset,
        describe(before),
        describe(after)
    ));
}

fn build_spoiler_log(
    settings: &RandomiserSettings,
    layout: &RomLayout<'_>,
    before: &[u8],
    after: &[u8],
    report: &RandomizeReport,
) -> Result<String> {
    let options = &settings.options;
    let mut log = format!("Red/Blue Randomiser seed: {}\n", settings.seed);
    log.push_str(&format!("settings: {}\n", serde_json::to_string(settings)?));

    if options.title_screen {
        log.push_str("\ntitle screen:\n");
        for &off in layout.title_screen {
            push_change(&mut log, off, before[off], after[off]);
        }
    }

    if options.player_starters {
        log.push_str("\nstarters:\n");
        for &off in layout.starters {
            push_change(&mut log, off, before[off], after[off]);
        }
    }

    if options.wild_areas {
        for (i, &base) in report.wild_tables.iter().enumerate() {
            log.push_str(&format!("\nwild area {} (0x{:05X}):\n", i, base));
            for slot in 0..rom::WILD_SLOTS {
                let off = base + 2 * slot + 1;
                log.push_str(&format!("  Lv{:<3}", before[off - 1]));
                push_change(&mut log, off, before[off], after[off]);
            }
        }
    }

    if options.trainers {
        log.push_str("\ntrainers:\n");
        for record in trainers::trainer_records(before, layout.trainers.clone()) {
            log.push_str(&format!("  party at 0x{:05X}:", record.start()));
            let party = record.party(before).into_iter().zip(record.species_offsets());
            for ((level, was), off) in party {
                log.push_str(&format!(
                    " Lv{} {} -> {};",
                    level,
                    describe(was),
                    describe(after[off])
                ));
            }
            log.push('\n');
        }
    }

    if let Some(map) = &report.species_map {
        log.push_str("\nspecies map:\n");
        for (from, to) in map.iter() {
            log.push_str(&format!("  {} -> {}\n", describe(from), describe(to)));
        }
    }

    Ok(log)
}

pub fn run(settings: RandomiserSettings) -> Result<()> {
    let mut rom = Rom::load(&settings.input_path)?;
    if !rom.is_red_blue() {
        return Err(RandomiserError::Config(format!(
            "{} is not a Pokemon Red/Blue (US) ROM (header title: {:?})",
            settings.input_path.display(),
            rom.title().unwrap_or_default()
        )));
    }
    log::info!(
        "loaded {} ({} bytes), seed {}",
        settings.input_path.display(),
        rom.len(),
        settings.seed
    );

    let original = if settings.debug {
        Some(rom.as_bytes().to_vec())
    } else {
        None
    };

    let layout = RomLayout::RED_BLUE_US;
    let mut randomizer = Randomizer::new(
        SpeciesCatalog::RED_BLUE,
        layout.clone(),
        StdRng::seed_from_u64(settings.seed),
    )
    .with_jitter(settings.jitter);
    let report = randomizer.randomize(&mut rom, &settings.options)?;

    rom.save(&settings.output_path)?;
    log::info!("wrote {}", settings.output_path.display());

    if let Some(original) = original {
        let log = build_spoiler_log(&settings, &layout, &original, rom.as_bytes(), &report)?;
        let log_path = sibling_path(&settings.output_path, "spoiler.txt");
        fs::write(&log_path, log)?;
        log::debug!("spoiler log: {}", log_path.display());

        if let Some(map) = &report.species_map {
            let map_path = sibling_path(&settings.output_path, "map.json");
            fs::write(&map_path, serde_json::to_string_pretty(map)?)?;
            log::debug!("species map: {}", map_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainers::TrainerRecord;

    const WILD_AREA: usize = 0xD000;
    const NO_MONS: usize = 0xD100;

    /// A blank 1 MiB image with a Red header and a valid species in every
    /// slot of the shipped layout.
    fn fake_red_rom() -> Vec<u8> {
        let layout = RomLayout::RED_BLUE_US;
        let mut bytes = vec![0u8; 0x100000];
        bytes[0x134..0x134 + 11].copy_from_slice(b"POKEMON RED");
        for &off in layout.title_screen.iter().chain(layout.starters) {
            bytes[off] = 0xB0;
        }

        // Three maps in bank 3: a grass map, an empty one, the grass map again.
        let table = rom::RED_BLUE_WILD_POINTERS;
        bytes[table..table + 8].copy_from_slice(&[0x00, 0x50, 0x00, 0x51, 0x00, 0x50, 0xFF, 0xFF]);
        bytes[WILD_AREA] = 25;
        for slot in 0..rom::WILD_SLOTS {
            bytes[WILD_AREA + 1 + 2 * slot] = 5;
            bytes[WILD_AREA + 2 + 2 * slot] = 0xA5;
        }

        // One flagless regular party filling the region up to its terminator.
        let trainers = layout.trainers.range.clone();
        bytes[trainers.start] = 12;
        for b in &mut bytes[trainers.start + 1..trainers.end - 1] {
            *b = 0x24;
        }
        bytes[trainers.end - 1] = 0x00;
        bytes
    }

    fn settings(dir: &Path, options: RandomizeOptions, debug: bool) -> RandomiserSettings {
        RandomiserSettings {
            seed: 151,
            options,
            jitter: true,
            debug,
            input_path: dir.join("red.gb"),
            output_path: dir.join("out").join("red-random.gb"),
        }
    }

    #[test]
    fn run_writes_randomised_rom_and_debug_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("red.gb"), fake_red_rom()).unwrap();
        let options = RandomizeOptions {
            one_to_one: true,
            no_legendaries: true,
            ..RandomizeOptions::all_regions()
        };
        run(settings(dir.path(), options, true)).unwrap();

        let out_dir = dir.path().join("out");
        let out = fs::read(out_dir.join("red-random.gb")).unwrap();
        assert_eq!(out.len(), 0x100000);
        assert_eq!(&out[0x134..0x134 + 11], b"POKEMON RED");

        let spoiler = fs::read_to_string(out_dir.join("red-random.spoiler.txt")).unwrap();
        assert!(spoiler.starts_with("Red/Blue Randomiser seed: 151"));
        assert!(spoiler.contains("species map:"));
        assert!(spoiler.contains(&format!("wild area 0 (0x{:05X})", WILD_AREA + 1)));
        assert!(!spoiler.contains("wild area 1"));

        let settings_line = spoiler
            .lines()
            .find_map(|line| line.strip_prefix("settings: "))
            .unwrap();
        let recorded: serde_json::Value = serde_json::from_str(settings_line).unwrap();
        assert_eq!(recorded["seed"], 151);
        assert_eq!(recorded["options"]["one_to_one"], true);
        assert_eq!(recorded["jitter"], true);

        let json = fs::read_to_string(out_dir.join("red-random.map.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["table"].as_object().unwrap().len(), 151);
    }

    #[test]
    fn run_rewrites_first_party_and_wild_species_only() {
        let dir = tempfile::tempdir().unwrap();
        let before = fake_red_rom();
        fs::write(dir.path().join("red.gb"), &before).unwrap();
        let options = RandomizeOptions {
            wild_areas: true,
            trainers: true,
            ..RandomizeOptions::default()
        };
        let s = settings(dir.path(), options, false);
        run(s.clone()).unwrap();
        let after = fs::read(&s.output_path).unwrap();

        let layout = RomLayout::RED_BLUE_US;
        let region = layout.trainers.range.clone();
        let records = trainers::trainer_records(&before, layout.trainers.clone());
        assert!(matches!(
            records[0],
            TrainerRecord::Regular { start, level: 12, .. } if start == region.start
        ));
        assert_eq!(after[region.start], 12);
        assert!(after[region.start + 1..region.end - 1].iter().any(|&b| b != 0x24));
        assert_eq!(after[region.end - 1], 0x00);

        for slot in 0..rom::WILD_SLOTS {
            assert_eq!(after[WILD_AREA + 1 + 2 * slot], 5);
        }
        assert_eq!(after[WILD_AREA], 25);
        assert_eq!(&after[NO_MONS..NO_MONS + 2], &[0, 0]);
    }

    #[test]
    fn run_is_deterministic_for_a_seed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("red.gb"), fake_red_rom()).unwrap();
        let s = settings(dir.path(), RandomizeOptions::all_regions(), false);
        run(s.clone()).unwrap();
        let first = fs::read(&s.output_path).unwrap();
        run(s.clone()).unwrap();
        let second = fs::read(&s.output_path).unwrap();
        assert_eq!(first, second);
        assert!(!sibling_path(&s.output_path, "spoiler.txt").exists());
    }

    #[test]
    fn run_rejects_other_cartridges() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = fake_red_rom();
        bytes[0x134..0x134 + 11].copy_from_slice(b"POKEMON YEL");
        fs::write(dir.path().join("red.gb"), bytes).unwrap();
        let err = run(settings(dir.path(), RandomizeOptions::all_regions(), false)).unwrap_err();
        assert!(matches!(err, RandomiserError::Config(_)));
    }

    #[test]
    fn missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(settings(dir.path(), RandomizeOptions::all_regions(), false)).unwrap_err();
        assert!(
            matches!(&err, RandomiserError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
        );
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn sibling_paths_replace_extension() {
        let p = Path::new("/tmp/x/red.gb");
        assert_eq!(sibling_path(p, "map.json"), PathBuf::from("/tmp/x/red.map.json"));
    }
}
