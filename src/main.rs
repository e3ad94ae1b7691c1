use std::io::{self, Read};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use octopus_pairhmm::cli::{parse_request, run_request};
use octopus_pairhmm::Backend;

#[derive(Parser)]
#[command(name = "pairhmm-score", version, about = "Banded SIMD pair-HMM scoring/alignment demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score (and optionally align) a request. `input` is a JSON file path,
    /// an inline JSON document, or `-` to read the document from stdin.
    Score {
        input: String,
        #[arg(long, value_parser = ["json", "human"], default_value = "human")]
        format: String,
    },
    /// List the SIMD backends available on this CPU.
    Backends,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Score { input, format } => handle_score(&input, &format),
        Command::Backends => handle_backends(),
    }
}

fn handle_score(input: &str, format: &str) -> Result<()> {
    let document = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| anyhow!("failed to read stdin: {e}"))?;
        buf
    } else {
        input.to_string()
    };

    let request = parse_request(&document)?;
    let response = run_request(&request)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&response)?),
        _ => print_human_readable(&response),
    }

    Ok(())
}

fn print_human_readable(response: &octopus_pairhmm::cli::ScoreResponse) {
    println!("backend: {}", response.backend);
    println!("score:   {}", response.score);
    if let Some(first_pos) = response.first_pos {
        println!("first_pos: {first_pos}");
    }
    if let (Some(truth), Some(query)) = (&response.align_truth, &response.align_query) {
        println!("truth:   {truth}");
        println!("query:   {query}");
    }
}

fn handle_backends() -> Result<()> {
    println!("best available: {}", Backend::detect_best());
    for backend in [Backend::Scalar, Backend::Sse2, Backend::Avx2] {
        println!("  {:<9} supported = {}", format!("{backend:?}"), backend.is_supported());
    }
    Ok(())
}
