//! Tree replay utility - prints the root after every deposit
//!
//! Usage:
//!   cargo run --release --bin tree-stats -- <commitments.json>          # Roots only
//!   cargo run --release --bin tree-stats -- <commitments.json> --time   # Include replay timing

use std::time::Instant;

use swirl_engine::field::to_bytes32_hex;
use swirl_engine::tree::{capacity, insert_leaf, FilledSubtrees};
use swirl_engine::{reconstruct, PoseidonHasher, ReplayCache, ZeroTable, TREE_DEPTH};
use swirl_prover::{parse_commitments, ProveError};

fn run(path: &str, include_timing: bool) -> Result<(), ProveError> {
    let records = parse_commitments(&std::fs::read_to_string(path)?)?;
    swirl_engine::validate_order(&records)?;
    let hasher = PoseidonHasher::new()?;

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                 SWIRL COMMITMENT TREE                    ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    println!("Tree Depth:  {}", TREE_DEPTH);
    println!("Capacity:    {}", capacity(TREE_DEPTH));
    println!("Deposits:    {}\n", records.len());

    println!("─────────────────────────────────────────────────────────────");
    println!("ROOTS:");
    println!("─────────────────────────────────────────────────────────────\n");

    let zeros = ZeroTable::build(&hasher, TREE_DEPTH);
    let mut filled = FilledSubtrees::from_zeros(&zeros);
    for record in &records {
        let proof = insert_leaf(&hasher, record.commitment, record.leaf_index, &zeros, &mut filled)?;
        println!("{:>8}  {}", record.leaf_index, to_bytes32_hex(&proof.root()));
    }

    if include_timing && !records.is_empty() {
        println!("\n─────────────────────────────────────────────────────────────");
        println!("REPLAY TIMING (proof for last leaf):");
        println!("─────────────────────────────────────────────────────────────\n");

        let last = records.len() as u64 - 1;

        let start = Instant::now();
        let full = reconstruct(&hasher, &records, last)?;
        println!("Full replay        {:>12?}", start.elapsed());

        let mut cache = ReplayCache::new(&hasher);
        let start = Instant::now();
        cache.sync(&hasher, &records)?;
        println!("Cache sync         {:>12?}", start.elapsed());

        let start = Instant::now();
        let cached = cache.proof_for(&hasher, last)?;
        println!("Cached proof       {:>12?}", start.elapsed());

        if cached != full {
            return Err(ProveError::Prover(
                "cached proof differs from full replay".to_string(),
            ));
        }
    }

    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let include_timing = args.iter().any(|a| a == "--time");

    let Some(path) = args.iter().skip(1).find(|a| !a.starts_with("--")) else {
        eprintln!("usage: tree-stats <commitments.json> [--time]");
        std::process::exit(2);
    };

    if let Err(e) = run(path, include_timing) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
