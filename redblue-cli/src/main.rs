use clap::Parser;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use redblue_core::{run, RandomiserSettings, RandomizeOptions};

#[derive(Debug, Parser)]
#[command(name = "redblue-randomiser", version, about = "Pokemon Red/Blue species randomiser")]
struct Args {
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    output: PathBuf,

    /// Defaults to the current Unix time.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with default options. Flags given on the command line
    /// override it; `--trainers=false` switches a preset option off.
    #[arg(long, value_name = "JSON")]
    preset: Option<PathBuf>,

    /// Randomise title screen, starters, wild areas and trainers.
    #[arg(long)]
    all: bool,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    title_screen: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    player_starters: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    wild_areas: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    trainers: Option<bool>,

    /// Replace each species with the same new species everywhere.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    one_to_one: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    no_legendaries: Option<bool>,

    /// Skip the extra discarded draws before each pick.
    #[arg(long)]
    no_jitter: bool,

    /// Write a spoiler log (and the species map in one-to-one mode) next to the output.
    #[arg(long)]
    debug: bool,
}

fn unix_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn options_from(args: &Args) -> redblue_core::Result<RandomizeOptions> {
    let mut options = match &args.preset {
        Some(path) => RandomizeOptions::load(path)?,
        None => RandomizeOptions::default(),
    };

    if args.all {
        options.title_screen = true;
        options.player_starters = true;
        options.wild_areas = true;
        options.trainers = true;
    }

    let overrides = [
        (&mut options.title_screen, args.title_screen),
        (&mut options.player_starters, args.player_starters),
        (&mut options.wild_areas, args.wild_areas),
        (&mut options.trainers, args.trainers),
        (&mut options.one_to_one, args.one_to_one),
        (&mut options.no_legendaries, args.no_legendaries),
    ];
    for (option, flag) in overrides {
        if let Some(value) = flag {
            *option = value;
        }
    }
    Ok(options)
}

fn main() {
    let args = Args::parse();

    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter(Some("redblue_core"), level)
        .filter(Some("RedBlue_CLI"), level)
        .init();

    let options = match options_from(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let seed = args.seed.unwrap_or_else(unix_seed);
    log::info!("seed: {}", seed);

    let settings = RandomiserSettings {
        seed,
        options,
        jitter: !args.no_jitter,
        debug: args.debug,
        input_path: args.input,
        output_path: args.output,
    };

    if let Err(err) = run(settings) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(flags: &[&str]) -> Args {
        let mut argv = vec!["RedBlue-CLI", "--input", "red.gb", "--output", "out.gb"];
        argv.extend_from_slice(flags);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn bare_flags_switch_options_on() {
        let options = options_from(&parse(&["--trainers", "--no-legendaries"])).unwrap();
        assert_eq!(
            options,
            RandomizeOptions {
                trainers: true,
                no_legendaries: true,
                ..RandomizeOptions::default()
            }
        );
    }

    #[test]
    fn explicit_false_overrides_all() {
        let options = options_from(&parse(&["--all", "--wild-areas=false"])).unwrap();
        assert!(options.title_screen && options.player_starters && options.trainers);
        assert!(!options.wild_areas);
    }

    #[test]
    fn command_line_overrides_preset() {
        let dir = tempfile::tempdir().unwrap();
        let preset = dir.path().join("preset.json");
        fs::write(
            &preset,
            r#"{ "trainers": true, "one_to_one": true, "no_legendaries": true }"#,
        )
        .unwrap();
        let preset = preset.to_str().unwrap();

        let options = options_from(&parse(&["--preset", preset])).unwrap();
        assert!(options.trainers && options.one_to_one && options.no_legendaries);

        let options = options_from(&parse(&[
            "--preset",
            preset,
            "--trainers=false",
            "--one-to-one=false",
            "--title-screen",
        ]))
        .unwrap();
        assert_eq!(
            options,
            RandomizeOptions {
                title_screen: true,
                no_legendaries: true,
                ..RandomizeOptions::default()
            }
        );
    }

    #[test]
    fn unreadable_preset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let args = parse(&["--preset", missing.to_str().unwrap()]);
        assert!(options_from(&args).is_err());
    }
}
