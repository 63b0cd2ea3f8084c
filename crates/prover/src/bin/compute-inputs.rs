//! Compute withdrawal proof inputs from an indexer dump and an encoded note
//!
//! Usage:
//!   cargo run --release --bin compute-inputs -- <commitments.json> <encoded-note>
//!   cargo run --release --bin compute-inputs -- <commitments.json> <encoded-note> --toml circuits/withdraw

use std::path::PathBuf;
use std::time::Instant;

use swirl_engine::PoseidonHasher;
use swirl_prover::{parse_commitments, prepare_withdrawal, write_prover_toml, ProveError};

struct Args {
    commitments: PathBuf,
    note: String,
    toml_dir: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let mut positional = Vec::new();
    let mut toml_dir = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--toml" {
            toml_dir = Some(PathBuf::from(args.next()?));
        } else {
            positional.push(arg);
        }
    }

    if positional.len() != 2 {
        return None;
    }
    let note = positional.pop()?;
    let commitments = PathBuf::from(positional.pop()?);
    Some(Args {
        commitments,
        note,
        toml_dir,
    })
}

fn run(args: Args) -> Result<(), ProveError> {
    let json = std::fs::read_to_string(&args.commitments)?;
    let records = parse_commitments(&json)?;
    eprintln!("Loaded {} commitment(s) from {:?}", records.len(), args.commitments);

    let hasher = PoseidonHasher::new()?;

    let start = Instant::now();
    let inputs = prepare_withdrawal(&hasher, &args.note, &records)?;
    eprintln!("Tree replayed in {:?}", start.elapsed());

    let rendered = serde_json::to_string_pretty(&inputs)
        .map_err(|e| ProveError::Serialization(e.to_string()))?;
    println!("{}", rendered);

    if let Some(dir) = args.toml_dir {
        let path = write_prover_toml(&dir, &inputs.circuit_inputs())?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}

fn main() {
    let Some(args) = parse_args() else {
        eprintln!("usage: compute-inputs <commitments.json> <encoded-note> [--toml <dir>]");
        std::process::exit(2);
    };

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        if let Some(engine) = e.engine() {
            eprintln!("kind:  {}", engine.class().as_str());
        }
        std::process::exit(1);
    }
}
