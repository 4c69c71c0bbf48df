//! Fair Roll Verify
//!
//! Offline auditor for revealed rounds.
//!
//! Usage:
//! - `fair-roll-verify [TRANSCRIPT]` - check a transcript file holding one
//!   round or an array of rounds. Without an argument the path comes from
//!   `FAIR_ROLL_TRANSCRIPT`; without either (or with `-`) stdin is read.
//! - `fair-roll-verify check <COMMITMENT> <KEY> <VALUE>` - recompute a single
//!   commitment from hex material.
//!
//! Exit code 0 means everything verified, 1 means a mismatch was found and
//! 2 means the input could not be read.

use fair_roll_core::{verify_hex, RoundResult};
use serde::Deserialize;
use std::io::Read;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TRANSCRIPT_ENV: &str = "FAIR_ROLL_TRANSCRIPT";

#[derive(Debug, Error)]
enum VerifyError {
    #[error("failed to read transcript: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed transcript: {0}")]
    Json(#[from] serde_json::Error),

    #[error("usage: fair-roll-verify check <COMMITMENT> <KEY> <VALUE>")]
    Usage,

    #[error("invalid committed value: {0:?}")]
    Value(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Transcript {
    Many(Vec<RoundResult>),
    One(Box<RoundResult>),
}

impl Transcript {
    fn into_rounds(self) -> Vec<RoundResult> {
        match self {
            Transcript::Many(rounds) => rounds,
            Transcript::One(round) => vec![*round],
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Audit(Option<String>),
    Check {
        commitment: String,
        key: String,
        value: u32,
    },
}

fn parse_args(args: &[String]) -> Result<Command, VerifyError> {
    match args {
        [cmd, rest @ ..] if cmd == "check" => match rest {
            [commitment, key, value] => Ok(Command::Check {
                commitment: commitment.clone(),
                key: key.clone(),
                value: value
                    .parse()
                    .map_err(|_| VerifyError::Value(value.clone()))?,
            }),
            _ => Err(VerifyError::Usage),
        },
        [] => Ok(Command::Audit(None)),
        [path] => Ok(Command::Audit(Some(path.clone()))),
        _ => Err(VerifyError::Usage),
    }
}

fn read_transcript(path: Option<String>) -> Result<String, VerifyError> {
    match path.or_else(|| std::env::var(TRANSCRIPT_ENV).ok()) {
        Some(path) if path != "-" => {
            info!("Reading transcript from {}", path);
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            info!("Reading transcript from stdin");
            let mut json = String::new();
            std::io::stdin().read_to_string(&mut json)?;
            Ok(json)
        }
    }
}

/// Check every round in the transcript; returns the number that failed
fn audit(json: &str) -> Result<usize, VerifyError> {
    let rounds = serde_json::from_str::<Transcript>(json)?.into_rounds();

    let mut failures = 0;
    for round in &rounds {
        match round.check() {
            Ok(()) => info!(
                round_id = %round.round_id,
                modulus = round.modulus,
                result = round.result,
                "round verified"
            ),
            Err(e) => {
                warn!(round_id = %round.round_id, error = %e, "round failed verification");
                failures += 1;
            }
        }
    }

    info!(rounds = rounds.len(), failures, "audit finished");
    Ok(failures)
}

fn run(args: &[String]) -> Result<bool, VerifyError> {
    match parse_args(args)? {
        Command::Audit(path) => {
            let json = read_transcript(path)?;
            Ok(audit(&json)? == 0)
        }
        Command::Check {
            commitment,
            key,
            value,
        } => {
            let ok = verify_hex(&commitment, &key, value);
            if ok {
                info!("Commitment matches value {}", value);
            } else {
                warn!("Commitment does NOT match value {}", value);
            }
            Ok(ok)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}
