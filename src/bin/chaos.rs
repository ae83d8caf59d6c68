extern crate chaosgame;
extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate num_cpus;

use chaosgame::{presets, write_image, Canvas, ChaosRenderer, Color, Rect, Tone};
use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// Splits "a,b,c" into exactly `n` values.
fn parse_list<T: FromStr>(s: &str, n: usize) -> Option<Vec<T>> {
    let values: Vec<T> = s
        .split(',')
        .map(|v| T::from_str(v.trim()).ok())
        .collect::<Option<Vec<T>>>()?;
    if values.len() == n {
        Some(values)
    } else {
        None
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_list<T: FromStr>(s: &str, n: usize, err: &str) -> Result<(), String> {
    match parse_list::<T>(s, n) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const WORLD: &str = "world";
const SAMPLES: &str = "samples";
const ITERATIONS: &str = "iterations";
const SYMMETRY: &str = "symmetry";
const THREADS: &str = "threads";
const SEED: &str = "seed";
const PRESET: &str = "preset";
const TONE: &str = "tone";
const COLOR: &str = "color";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("chaos")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Chaos-game fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the extension picks the format"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x800")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(WORLD)
                .long(WORLD)
                .short("w")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,-2,4,4")
                .validator(|s| {
                    validate_list::<f64>(&s, 4, "World must be x,y,width,height")
                })
                .help("Region of the plane to render: x,y,width,height"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .long(SAMPLES)
                .short("n")
                .takes_value(true)
                .default_value("10000")
                .validator(|s| {
                    validate_range(
                        &s,
                        0u64,
                        std::u64::MAX,
                        "Could not parse sample count",
                        "Sample count out of range",
                    )
                })
                .help("Number of trajectories, split across all threads"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("50")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 0 and 1000000",
                    )
                })
                .help("Steps per trajectory"),
        )
        .arg(
            Arg::with_name(SYMMETRY)
                .long(SYMMETRY)
                .short("y")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        360,
                        "Could not parse symmetry order",
                        "Symmetry order must be between 1 and 360",
                    )
                })
                .help("Rotational copies plotted per step"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver; defaults to one per CPU"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0u64,
                        std::u64::MAX,
                        "Could not parse seed",
                        "Seed out of range",
                    )
                })
                .help("Random seed; defaults to the current time"),
        )
        .arg(
            Arg::with_name(PRESET)
                .long(PRESET)
                .short("p")
                .takes_value(true)
                .default_value("demo")
                .possible_values(presets::NAMES)
                .help("Transformation set"),
        )
        .arg(
            Arg::with_name(TONE)
                .long(TONE)
                .takes_value(true)
                .default_value("density")
                .possible_values(&["mean", "density"])
                .help("How hit counts map to brightness"),
        )
        .arg(
            Arg::with_name(COLOR)
                .long(COLOR)
                .short("c")
                .takes_value(true)
                .default_value("255,255,255")
                .validator(|s| validate_list::<u8>(&s, 3, "Color must be r,g,b"))
                .help("Color contributed by every plotted point"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| err_msg(format!("Could not parse --{}", name)))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<usize>(s, 'x'))
        .ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let world = matches
        .value_of(WORLD)
        .and_then(|s| parse_list::<f64>(s, 4))
        .ok_or_else(|| err_msg("Error parsing world region"))?;
    let color = matches
        .value_of(COLOR)
        .and_then(|s| parse_list::<u8>(s, 3))
        .ok_or_else(|| err_msg("Error parsing color"))?;
    let preset = matches.value_of(PRESET).unwrap_or("demo");
    let transformations =
        presets::by_name(preset).ok_or_else(|| err_msg(format!("Unknown preset {}", preset)))?;

    let threads = match matches.value_of(THREADS) {
        Some(_) => value::<usize>(matches, THREADS)?,
        None => num_cpus::get(),
    };
    let seed = match matches.value_of(SEED) {
        Some(_) => value::<u64>(matches, SEED)?,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };
    let samples = value::<u64>(matches, SAMPLES)?;
    let tone = value::<Tone>(matches, TONE)?;

    let renderer = ChaosRenderer::new(
        Rect::new(world[0], world[1], world[2], world[3])?,
        transformations,
    )?
    .with_iterations(value(matches, ITERATIONS)?)
    .with_symmetry(value(matches, SYMMETRY)?)?
    .with_threads(threads)
    .with_color(Color::new(
        f64::from(color[0]),
        f64::from(color[1]),
        f64::from(color[2]),
    ));

    let canvas = Canvas::new(width, height)?;
    let result = renderer.render(&canvas, samples, seed)?;
    let output = matches.value_of(OUTPUT).ok_or_else(|| err_msg("No output file"))?;
    write_image(output, &result, tone)?;
    println!(
        "Wrote {} ({}x{}, seed {}, {} hits)",
        output,
        width,
        height,
        seed,
        result.total_hits()
    );
    Ok(())
}

fn main() {
    let matches = args();
    let level = match matches.occurrences_of(VERBOSE) {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
