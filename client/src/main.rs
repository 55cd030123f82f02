//! Player-side verification tool.
//!
//! Re-derives round outcomes offline so a player can check, without
//! trusting the server, that a revealed seed matches the commitment they
//! were shown and that every recorded round follows from it.

use anyhow::Context;
use clap::{Parser, Subcommand};

use fairdie_engine::{commit, derive, is_win, verify};
use fairdie_types::Round;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-derive a recorded round and check it against its stored outcome
    /// (and, optionally, the commitment published before it was played).
    /// Exits nonzero if anything fails to match.
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
        /// Recorded die face (1-6)
        #[arg(long)]
        face: u8,
        /// Recorded bet amount
        #[arg(long)]
        bet: u64,
        /// Recorded result hash (64 lowercase hex characters)
        #[arg(long)]
        hash: String,
        /// Commitment shown before the round was played, if retained
        #[arg(long)]
        commitment: Option<String>,
    },
    /// Compute the outcome for a (server seed, client seed, nonce) triple.
    Derive {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
    },
    /// Compute the commitment for a server seed.
    Commit {
        #[arg(long)]
        seed: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Verify {
            server_seed,
            client_seed,
            nonce,
            face,
            bet,
            hash,
            commitment,
        } => {
            let round = Round {
                face,
                bet,
                won: is_win(face),
                server_seed,
                client_seed,
                nonce,
                result_hash: hash,
            };
            let report =
                verify(&round, commitment.as_deref()).context("round failed shape checks")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to encode report")?
            );
            if !report.matches_outcome || report.matches_commitment == Some(false) {
                std::process::exit(1);
            }
        }
        Command::Derive {
            server_seed,
            client_seed,
            nonce,
        } => {
            let outcome = derive(&server_seed, &client_seed, nonce);
            println!("hash: {}", outcome.hash);
            println!("face: {}", outcome.face);
            println!("won:  {}", outcome.won);
        }
        Command::Commit { seed } => {
            println!("{}", commit(&seed));
        }
    }

    Ok(())
}
