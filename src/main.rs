mod args;
mod logger;

use args::{Cli, Commands, OperationArgs};
use clap::Parser;

use std::process::ExitCode;
use std::time::Instant;

use aes_steps::export::{ExportError, export_trace};
use aes_steps::response::{self, Request, Response};
use aes_steps::{Cipher, Operation};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Aes(#[from] aes_steps::Error),
}

fn main() -> ExitCode {
    match aes_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn aes_cli() -> Result<(), CliError> {
    let args = Cli::parse();
    logger::init(args.log_level.into());

    match args.command {
        Commands::Encrypt(op) => run(Operation::Encrypt, op),
        Commands::Decrypt(op) => run(Operation::Decrypt, op),
        Commands::Demo => demo(),
    }
}

fn run(action: Operation, args: OperationArgs) -> Result<(), CliError> {
    let mode: aes_steps::Mode = args.mode.into();
    let request = Request {
        action,
        text: args.text,
        key: args.key,
        mode: mode.to_string(),
        iv: args.iv,
    };

    let start = Instant::now();
    let response = response::process(&request);
    let duration = start.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    match response {
        Response::Success { result, steps } => {
            if let Some(path) = args.export {
                let written = export_trace(&steps, action, path, args.format.into())?;
                if !args.quiet && !args.json {
                    println!("Trace exported to {}", written.display());
                }
            }
            if args.json {
                return Ok(());
            }
            if args.quiet {
                println!("{result}");
                return Ok(());
            }

            for step in &steps {
                println!("{}\n{}\n", step.title, step.detail);
            }
            println!("Result: {result}");
            println!(
                "{} {} steps in {} ms",
                action.root_title(),
                steps.len(),
                duration.as_millis()
            );
            Ok(())
        }
        Response::Failure { error, error_ar } => {
            if let Some(ar) = error_ar.filter(|_| !args.json) {
                eprintln!("{ar}");
            }
            Err(CliError::Failed(error))
        }
    }
}

/// Encrypts one 16-byte block in ECB mode and shows the steps where the real bytes change.
fn demo() -> Result<(), CliError> {
    // exactly 16 bytes, a single block with no padding
    let plaintext = "Hello World!!!!!";
    let key = "MySecretKey123456789012345678901";

    println!("AES Block Transformation Demo");
    println!("{}", "=".repeat(50));
    println!("Plaintext: {plaintext}");
    println!("Key: {key}");
    println!("Mode: ECB (shows the bare AES transformation)\n");

    let mut cipher = Cipher::from_parts(key.as_bytes(), "ecb", None)?;
    let ciphertext = cipher.encrypt(plaintext)?;

    let shown = [
        ("INPUT PREPARATION", "Input Preparation"),
        ("PADDING", "Block Mode Processing"),
        ("BLOCK START", "Block 1 Processing Start"),
        ("INITIAL STATE", "Initial State"),
        ("BLOCK RESULT", "Block 1 Processing Complete"),
    ];
    for (label, needle) in shown {
        if let Some(step) = cipher.steps().iter().find(|s| s.title.contains(needle)) {
            println!("{label}:");
            println!("{}\n", step.detail);
        }
    }
    println!("Ciphertext (Base64): {ciphertext}\n");

    // a fresh instance, as a receiver would have
    let mut receiver = Cipher::from_parts(key.as_bytes(), "ecb", None)?;
    let decrypted = receiver.decrypt(&ciphertext)?;
    println!("Decrypted: {decrypted}");
    if decrypted == plaintext {
        println!("Round trip matched");
        Ok(())
    } else {
        Err(CliError::Failed("round trip did not match".into()))
    }
}
