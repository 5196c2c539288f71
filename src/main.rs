use anyhow::{anyhow, Context, Result};
use gelsim::{
    digest::digest,
    dna_sequence::DnaSequence,
    enzymes::Enzymes,
    gel::{GelOptions, DNA_LADDER},
    render::render_to_file,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, process};

#[derive(Serialize)]
struct EnzymeListing {
    enzymes: Vec<EnzymeSummary>,
    default: String,
}

#[derive(Serialize)]
struct EnzymeSummary {
    name: String,
    sequence: String,
}

#[derive(Serialize)]
struct FragmentSummary {
    start: usize,
    end: usize,
    length: usize,
    sequence: String,
}

#[derive(Serialize)]
struct SimulationSummary {
    dna_sequence: String,
    enzymes_used: Vec<String>,
    cut_sites: Vec<gelsim::digest::CutSite>,
    fragments: Vec<FragmentSummary>,
    gel_image: String,
    bands: Vec<gelsim::gel::Band>,
}

struct Args {
    seq: Option<String>,
    enzymes: Option<String>,
    out_dir: PathBuf,
    seed: Option<u64>,
    ladder: bool,
    enzyme_file: Option<String>,
    list_enzymes: bool,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  gelsim --list-enzymes\n  \
  gelsim --seq SEQUENCE [--enzymes NAME[,NAME...]] [--out DIR] [--seed N]\n         \
  [--no-ladder] [--enzyme-file PATH]\n\n  \
  Digests SEQUENCE with the selected enzymes (default: EcoRI), writes a gel\n  \
  PNG under DIR (default: current directory) and prints a JSON summary.\n  \
  Omit --seed for fully deterministic, jitter-free output."
    );
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        seq: None,
        enzymes: None,
        out_dir: PathBuf::from("."),
        seed: None,
        ladder: true,
        enzyme_file: None,
        list_enzymes: false,
    };
    let raw: Vec<String> = env::args().skip(1).collect();
    let mut i = 0;
    while i < raw.len() {
        let value = |i: usize| -> Result<&String> {
            raw.get(i + 1)
                .ok_or_else(|| anyhow!("Missing value for {}", raw[i]))
        };
        match raw[i].as_str() {
            "--seq" => {
                args.seq = Some(value(i)?.clone());
                i += 2;
            }
            "--enzymes" => {
                args.enzymes = Some(value(i)?.clone());
                i += 2;
            }
            "--out" => {
                args.out_dir = PathBuf::from(value(i)?);
                i += 2;
            }
            "--seed" => {
                args.seed = Some(
                    value(i)?
                        .parse()
                        .with_context(|| format!("Bad seed '{}'", raw[i + 1]))?,
                );
                i += 2;
            }
            "--no-ladder" => {
                args.ladder = false;
                i += 1;
            }
            "--enzyme-file" => {
                args.enzyme_file = Some(value(i)?.clone());
                i += 2;
            }
            "--list-enzymes" => {
                args.list_enzymes = true;
                i += 1;
            }
            other => return Err(anyhow!("Unknown argument '{other}'")),
        }
    }
    Ok(args)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Per-request token for artifact naming; uniqueness across concurrent
/// processes comes from the pid, within a process from the clock.
fn request_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{nanos}", process::id())
}

fn run() -> Result<()> {
    let args = parse_args()?;

    let registry = match &args.enzyme_file {
        Some(path) => {
            Enzymes::from_path(path).with_context(|| format!("Could not load enzyme table '{path}'"))?
        }
        None => Enzymes::default(),
    };

    if args.list_enzymes {
        return print_json(&EnzymeListing {
            enzymes: registry
                .all()
                .iter()
                .map(|re| EnzymeSummary {
                    name: re.name.clone(),
                    sequence: re.sequence.clone(),
                })
                .collect(),
            default: registry.default_enzyme().name.clone(),
        });
    }

    let Some(raw_seq) = &args.seq else {
        usage();
        return Err(anyhow!("No sequence given"));
    };
    let dna = DnaSequence::from_sequence(raw_seq)?;

    let enzyme_names: Vec<String> = match &args.enzymes {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![registry.default_enzyme().name.clone()],
    };
    let digestion = digest(&dna, &enzyme_names, &registry)?;

    let options = GelOptions {
        seed: args.seed,
        ladder: args.ladder.then(|| DNA_LADDER.to_vec()),
        ..GelOptions::default()
    };
    let rendered = render_to_file(
        &digestion.fragment_lengths(),
        &options,
        &args.out_dir,
        &request_token(),
    )?;

    print_json(&SimulationSummary {
        dna_sequence: dna.get_forward_string(),
        enzymes_used: enzyme_names,
        cut_sites: digestion.cut_sites.clone(),
        fragments: digestion
            .fragments
            .iter()
            .map(|f| FragmentSummary {
                start: f.start,
                end: f.end,
                length: f.len(),
                sequence: f.substring(&dna),
            })
            .collect(),
        gel_image: rendered.file_name,
        bands: rendered.bands,
    })
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        process::exit(1);
    }
}
