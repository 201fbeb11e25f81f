//! Builds the human-readable steps of an operation. Every byte quoted here is taken from the
//! values the cipher actually produced: the mode records and the round traces.

use crate::engine::config::CipherConfig;
use crate::engine::core::{BLOCK_SIZE, ROUNDS, RoundKeys, RoundOp, RoundTrace};
use crate::engine::key::Key;
use crate::engine::mode::Mode;
use crate::engine::modes::{BlockRecord, Feed, Source};
use crate::engine::util::Unpadding;
use crate::trace::{Operation, Trace, compare_blocks, state_grid, to_hex};

pub(crate) fn input_preparation(trace: &mut Trace, plaintext: &str, bytes: &[u8]) {
    trace.push(
        "1. Input Preparation",
        [
            format!("Plaintext: {plaintext}"),
            format!("Plaintext bytes: {}", to_hex(bytes)),
            format!("Length: {} bytes", bytes.len()),
        ]
        .join("\n"),
    );
}

pub(crate) fn ciphertext_preparation(trace: &mut Trace, encoded: &str, decoded: &[u8]) {
    trace.push(
        "1. Input Preparation",
        [
            format!("Base64 input: {encoded}"),
            format!("Decoded bytes: {}", to_hex(decoded)),
            format!("Length: {} bytes", decoded.len()),
        ]
        .join("\n"),
    );
}

pub(crate) fn key_preparation(trace: &mut Trace, key: &Key, round_keys: &RoundKeys) {
    let mut lines = vec![
        format!("Key: {}", String::from_utf8_lossy(key.as_bytes())),
        format!("Key bytes: {}", to_hex(key.as_bytes())),
        format!("Key length: {} bytes (256-bit)", key.as_bytes().len()),
        format!("Key expansion: {} round keys ({} bytes)", ROUNDS + 1, (ROUNDS + 1) * BLOCK_SIZE),
    ];
    lines.extend(
        round_keys
            .iter()
            .enumerate()
            .map(|(i, rk)| format!("RoundKey[{i}]: {}", to_hex(rk))),
    );
    trace.push("2. Key Preparation", lines.join("\n"));
}

/// Step 3 of encryption: padding decision for block modes, exact length for stream modes.
pub(crate) fn input_processing(trace: &mut Trace, mode: Mode, data: &[u8], padded: &[u8]) {
    let pad_len = padded.len() - data.len();
    if mode.is_stream_mode() {
        trace.push(
            "3. Stream Mode Processing",
            [
                format!("Input length: {} bytes", data.len()),
                format!("Data: {}", to_hex(data)),
                format!("Mode: {mode} is a stream mode, the exact input length is processed"),
            ]
            .join("\n"),
        );
    } else if pad_len > 0 {
        trace.push(
            "3. Block Mode Processing with Padding",
            [
                format!("Input length: {} bytes", data.len()),
                format!("Block size: {BLOCK_SIZE} bytes"),
                format!("Original data: {}", to_hex(data)),
                format!("Padding needed: {pad_len} bytes"),
                format!("Padding bytes: {}", to_hex(&padded[data.len()..])),
                format!("Padded data: {}", to_hex(padded)),
                format!("Final length: {} bytes", padded.len()),
                format!("Mode: {mode} with PKCS#7 padding"),
            ]
            .join("\n"),
        );
    } else {
        trace.push(
            "3. Block Mode Processing",
            [
                format!("Input length: {} bytes (block aligned)", data.len()),
                format!("Block size: {BLOCK_SIZE} bytes"),
                format!("Data: {}", to_hex(data)),
                "No padding required, already a multiple of the block size".to_string(),
                format!("Mode: {mode}"),
            ]
            .join("\n"),
        );
    }
}

pub(crate) fn mode_setup(trace: &mut Trace, config: &CipherConfig) {
    let mode = config.mode();
    let mut lines = vec![format!("Mode: {} ({mode})", mode.full_name())];
    if mode.needs_iv() {
        let label = mode.iv_label();
        lines.push(format!("{label}: {}", to_hex(config.iv().as_bytes())));
        lines.push(format!("{label} length: {} bytes", config.iv().as_bytes().len()));
        lines.push(if config.iv_generated() {
            format!("{label} generated from the OS random number generator")
        } else {
            format!("{label} supplied by the caller")
        });
    } else {
        lines.push("No IV required".into());
    }
    lines.push(
        match mode {
            Mode::Ecb => "Each block encrypted independently\nWARNING: identical plaintext blocks produce identical ciphertext blocks",
            Mode::Cbc => "Each block XOR'd with the previous ciphertext block (the IV for block 1) before encryption",
            Mode::Cfb => "Stream mode: keystream block = AES(IV or previous ciphertext block), no padding",
            Mode::Ofb => "Stream mode: keystream block = AES(IV or previous keystream block), no padding",
            Mode::Ctr => "Stream mode: keystream block = AES(nonce + block index) with a 128-bit big-endian counter, no padding",
        }
        .into(),
    );
    trace.push(format!("4. {mode} Mode Setup"), lines.join("\n"));
}

/// Step 5 of encryption.
pub(crate) fn division(trace: &mut Trace, mode: Mode, len: usize) {
    if mode.is_block_mode() {
        trace.push(
            "5. Block Division",
            [
                format!("Total data length: {len} bytes"),
                format!("Block size: {BLOCK_SIZE} bytes"),
                format!("Number of blocks: {}", len / BLOCK_SIZE),
                format!("Mode: {mode} processes data in {BLOCK_SIZE}-byte blocks"),
            ]
            .join("\n"),
        );
    } else {
        trace.push(
            "5. Stream Processing",
            [
                format!("Data length: {len} bytes"),
                format!("Keystream blocks: {}", len.div_ceil(BLOCK_SIZE)),
                format!("Mode: {mode} processes data as a continuous stream"),
                "The last keystream block is truncated to the remaining data".to_string(),
            ]
            .join("\n"),
        );
    }
}

/// Step 3 of decryption: split the IV or nonce off the payload.
pub(crate) fn extraction(trace: &mut Trace, mode: Mode, iv: Option<&[u8]>, ciphertext: &[u8]) {
    match iv {
        Some(iv) => {
            let label = mode.iv_label();
            trace.push(
                format!("3. {mode} {label} Extraction"),
                [
                    format!("Mode: {} ({mode})", mode.full_name()),
                    format!("{label}: {}", to_hex(iv)),
                    format!("Ciphertext: {}", to_hex(ciphertext)),
                    format!("Ciphertext length: {} bytes", ciphertext.len()),
                ]
                .join("\n"),
            );
        }
        None => trace.push(
            "3. ECB Mode Setup",
            [
                format!("Mode: {} ({mode})", mode.full_name()),
                format!("Ciphertext: {}", to_hex(ciphertext)),
                format!("Length: {} bytes", ciphertext.len()),
                "No IV required".to_string(),
            ]
            .join("\n"),
        ),
    }
}

/// Step 4 of decryption.
pub(crate) fn analysis(trace: &mut Trace, mode: Mode, len: usize) {
    if mode.is_block_mode() {
        trace.push(
            "4. Block Analysis",
            [
                format!("Ciphertext length: {len} bytes"),
                format!("Block size: {BLOCK_SIZE} bytes"),
                format!("Number of blocks: {}", len / BLOCK_SIZE),
                format!("Mode: {mode} decrypts with the inverse cipher"),
            ]
            .join("\n"),
        );
    } else {
        trace.push(
            "4. Stream Analysis",
            [
                format!("Ciphertext length: {len} bytes"),
                format!("Keystream blocks: {}", len.div_ceil(BLOCK_SIZE)),
                format!("Mode: {mode} regenerates the keystream with the forward cipher"),
            ]
            .join("\n"),
        );
    }
}

/// Per-unit narration: start, mode preprocessing, initial state, key schedule, one step per
/// round, completion.
pub(crate) fn units(
    trace: &mut Trace,
    operation: Operation,
    mode: Mode,
    round_keys: &RoundKeys,
    blocks: &[BlockRecord],
) {
    let prefix = match operation {
        Operation::Encrypt => 6,
        Operation::Decrypt => 5,
    };
    // stream modes only ever run the cipher forwards
    let inverse = operation == Operation::Decrypt && mode.is_block_mode();
    let total = blocks.len();

    for record in blocks {
        let n = record.index + 1;
        let p = format!("{prefix}.{n}");

        trace.push(
            format!("{p}. Block {n} Processing Start"),
            [
                format!("Block {n} of {total}"),
                format!("Input: {}", to_hex(&record.input)),
                format!("Size: {} bytes", record.input.len()),
                format!("Mode: {mode}"),
            ]
            .join("\n"),
        );

        if let Some(detail) = preprocessing(mode, record) {
            trace.push(format!("{p}.0. {mode} Preprocessing"), detail);
        }

        trace.push(
            format!("{p}.1. Initial State"),
            [
                format!("AES input: {}", to_hex(&record.cipher_input)),
                "State matrix (column-major order):".to_string(),
                state_grid(&record.cipher_input),
                format!(
                    "Ready for {}",
                    if inverse { "decryption (inverse cipher)" } else { "encryption (forward cipher)" }
                ),
            ]
            .join("\n"),
        );

        trace.push(format!("{p}.2. Key Schedule"), key_schedule_detail(inverse));

        for (i, round) in record.rounds.iter().enumerate() {
            trace.push(
                format!("{p}.{}. {}", i + 3, round_title(round.stage, inverse)),
                round_detail(round, round_keys, inverse),
            );
        }

        trace.push(
            format!("{p}.{}. Block {n} Processing Complete", record.rounds.len() + 3),
            completion_detail(mode, record),
        );
    }
}

fn source_label(mode: Mode, source: Source) -> String {
    match source {
        Source::Iv => mode.iv_label().to_string(),
        Source::PreviousCiphertext => "previous ciphertext block".into(),
        Source::PreviousKeystream => "previous keystream block".into(),
        Source::Counter { offset } => format!("nonce + {offset}"),
    }
}

fn preprocessing(mode: Mode, record: &BlockRecord) -> Option<String> {
    let n = record.index + 1;
    let lines = match record.feed {
        Feed::Direct => return None,
        Feed::ChainBefore { chain, source } => {
            let label = source_label(mode, source);
            vec![
                format!("Block {n} XOR {label}"),
                format!("Block: {}", to_hex(&record.input)),
                format!("{label}: {}", to_hex(&chain)),
                format!("AES input (block XOR {label}): {}", to_hex(&record.cipher_input)),
            ]
        }
        Feed::ChainAfter { chain, source } => {
            let label = source_label(mode, source);
            vec![
                format!("Block {n} is decrypted first, then XOR'd with the {label}"),
                format!("Ciphertext block: {}", to_hex(&record.input)),
                format!("{label}: {}", to_hex(&chain)),
            ]
        }
        Feed::Keystream { register, source } => {
            let label = source_label(mode, source);
            vec![
                format!("Feedback register = {label}"),
                format!("Register: {}", to_hex(&register)),
                format!("AES encrypts the register to produce keystream block {n}"),
                format!(
                    "Data ({} bytes) XOR keystream gives the output",
                    record.input.len()
                ),
            ]
        }
    };
    Some(lines.join("\n"))
}

fn key_schedule_detail(inverse: bool) -> String {
    let mut lines = vec![
        format!("AES-256 uses {ROUNDS} rounds plus an initial AddRoundKey"),
        format!("Key expansion generated {} round keys ({} bytes)", ROUNDS + 1, (ROUNDS + 1) * BLOCK_SIZE),
    ];
    if inverse {
        lines.push(format!("Round keys applied in reverse: RoundKey[{ROUNDS}] down to RoundKey[0]"));
        lines.push(format!(
            "Inverse rounds 1-{}: InvShiftRows, InvSubBytes, AddRoundKey, InvMixColumns",
            ROUNDS - 1
        ));
        lines.push("Final step: InvShiftRows, InvSubBytes, AddRoundKey (no InvMixColumns)".into());
    } else {
        lines.push("Initial round: AddRoundKey only".into());
        lines.push(format!(
            "Rounds 1-{}: SubBytes, ShiftRows, MixColumns, AddRoundKey",
            ROUNDS - 1
        ));
        lines.push(format!("Round {ROUNDS}: SubBytes, ShiftRows, AddRoundKey (no MixColumns)"));
    }
    lines.join("\n")
}

fn round_title(stage: usize, inverse: bool) -> String {
    match (inverse, stage) {
        (false, 0) => "Initial Round (Round 0)".into(),
        (false, ROUNDS) => format!("Final Round (Round {ROUNDS})"),
        (false, s) => format!("Round {s}"),
        (true, 0) => format!("Initial Decryption Step (RoundKey[{ROUNDS}])"),
        (true, ROUNDS) => "Final Decryption Step (RoundKey[0])".into(),
        (true, s) => format!("Inverse Round {s}"),
    }
}

fn round_detail(round: &RoundTrace, round_keys: &RoundKeys, inverse: bool) -> String {
    let mut lines = vec![format!("Input: {}", to_hex(&round.input))];
    for (i, (op, state)) in round.ops.iter().enumerate() {
        lines.push(format!("Step {}: {op} - {}", i + 1, op.describe()));
        if let RoundOp::AddRoundKey(k) = op {
            lines.push(format!("  RoundKey[{k}]: {}", to_hex(&round_keys[*k])));
        }
        lines.push(format!("  Result: {}", to_hex(state)));
    }
    if round.stage == ROUNDS && !round.mixes_columns() {
        lines.push(format!(
            "Note: {} is skipped in the final round",
            if inverse { "InvMixColumns" } else { "MixColumns" }
        ));
    }
    lines.push("State matrix:".into());
    lines.push(state_grid(&round.output()));
    lines.join("\n")
}

fn completion_detail(mode: Mode, record: &BlockRecord) -> String {
    let n = record.index + 1;
    let mut lines = vec![format!("Input block: {}", to_hex(&record.input))];

    match record.feed {
        Feed::Direct => {}
        Feed::ChainBefore { .. } | Feed::ChainAfter { .. } => {
            lines.push(format!("AES input: {}", to_hex(&record.cipher_input)));
            lines.push(format!("AES output: {}", to_hex(&record.cipher_output)));
        }
        Feed::Keystream { .. } => {
            let used = &record.cipher_output[..record.input.len()];
            lines.push(format!("Keystream: {}", to_hex(used)));
            if used.len() < BLOCK_SIZE {
                lines.push(format!(
                    "Keystream truncated to {} of {BLOCK_SIZE} bytes",
                    used.len()
                ));
            }
        }
    }
    lines.push(format!("Output block: {}", to_hex(&record.output)));

    if mode.is_block_mode() {
        lines.push("Input matrix:".into());
        lines.push(state_grid(&record.cipher_input));
        lines.push("Output matrix:".into());
        lines.push(state_grid(&record.cipher_output));
    } else {
        lines.push("Keystream matrix:".into());
        lines.push(state_grid(&record.cipher_output));
    }

    lines.push(compare_blocks(&record.input, &record.output));
    lines.push(format!("Block {n} processing finished"));
    lines.join("\n")
}

/// Step 7 of encryption.
pub(crate) fn all_encrypted(trace: &mut Trace, mode: Mode, input: &[u8], output: &[u8], units: usize) {
    if mode.is_block_mode() {
        trace.push(
            "7. All Blocks Encrypted",
            [
                format!("Total encrypted data: {}", to_hex(output)),
                format!("Length: {} bytes", output.len()),
                format!("All {units} blocks processed"),
            ]
            .join("\n"),
        );
    } else {
        trace.push(
            "7. Stream Encryption Complete",
            [
                format!("Input data: {}", to_hex(input)),
                format!("Ciphertext: {}", to_hex(output)),
                format!("Length: {} bytes (same as input)", output.len()),
            ]
            .join("\n"),
        );
    }
}

/// Step 8 of encryption: framing and Base64 encoding of the returned text.
pub(crate) fn final_output(trace: &mut Trace, mode: Mode, ciphertext: &[u8], framed: &[u8], encoded: &str) {
    let layout = if mode.needs_iv() {
        format!("{} + Ciphertext", mode.iv_label())
    } else {
        "Ciphertext only (no IV)".to_string()
    };
    trace.push(
        "8. Final Output",
        [
            format!("Raw ciphertext: {}", to_hex(ciphertext)),
            format!("Final result: {layout}"),
            format!("Combined data: {}", to_hex(framed)),
            format!("Base64 encoded: {encoded}"),
        ]
        .join("\n"),
    );
}

/// Step 6 of decryption.
pub(crate) fn all_decrypted(trace: &mut Trace, mode: Mode, input: &[u8], output: &[u8], units: usize) {
    if mode.is_block_mode() {
        trace.push(
            "6. All Blocks Decrypted",
            [
                format!("Total decrypted data: {}", to_hex(output)),
                format!("Length: {} bytes", output.len()),
                format!("All {units} blocks processed"),
            ]
            .join("\n"),
        );
    } else {
        trace.push(
            "6. Stream Decryption Complete",
            [
                format!("Ciphertext input: {}", to_hex(input)),
                format!("Decrypted stream: {}", to_hex(output)),
                format!("Length: {} bytes (same as input)", output.len()),
            ]
            .join("\n"),
        );
    }
}

/// Step 7 of decryption for block modes.
pub(crate) fn padding_removal(trace: &mut Trace, decrypted: &[u8], plain: &[u8], outcome: Unpadding) {
    match outcome {
        Unpadding::Stripped(n) => trace.push(
            "7. Padding Removal",
            [
                format!("Decrypted data: {}", to_hex(decrypted)),
                format!("Padding detected: {n} bytes"),
                format!("Padding bytes: {}", to_hex(&decrypted[plain.len()..])),
                format!("Data after padding removal: {}", to_hex(plain)),
                format!("Final length: {} bytes", plain.len()),
            ]
            .join("\n"),
        ),
        Unpadding::Aligned(last) => trace.push(
            "7. Block Mode Final Processing",
            [
                format!("Decrypted data: {}", to_hex(plain)),
                format!("Last byte {last:02X} is not a padding length, no padding to remove"),
                format!("Length: {} bytes", plain.len()),
            ]
            .join("\n"),
        ),
        Unpadding::Inconsistent(last) => trace.push(
            "7. Block Mode Final Processing",
            [
                format!("Decrypted data: {}", to_hex(plain)),
                format!("Last byte {last:02X} does not end a valid PKCS#7 padding, data kept as is"),
                format!("Length: {} bytes", plain.len()),
            ]
            .join("\n"),
        ),
    }
}

/// Step 7 of decryption for stream modes.
pub(crate) fn stream_final(trace: &mut Trace, plain: &[u8]) {
    trace.push(
        "7. Stream Mode Final Processing",
        [
            "Stream mode, no padding to remove".to_string(),
            format!("Final data: {}", to_hex(plain)),
            format!("Length: {} bytes", plain.len()),
        ]
        .join("\n"),
    );
}

pub(crate) fn final_result(trace: &mut Trace, plaintext: &str) {
    trace.push(
        "8. Final Result",
        [
            format!("Plaintext: {plaintext}"),
            format!("Length: {} characters", plaintext.chars().count()),
            "Decryption successful".to_string(),
        ]
        .join("\n"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_titles() {
        assert_eq!(round_title(0, false), "Initial Round (Round 0)");
        assert_eq!(round_title(7, false), "Round 7");
        assert_eq!(round_title(14, false), "Final Round (Round 14)");
        assert_eq!(round_title(0, true), "Initial Decryption Step (RoundKey[14])");
        assert_eq!(round_title(13, true), "Inverse Round 13");
        assert_eq!(round_title(14, true), "Final Decryption Step (RoundKey[0])");
    }

    #[test]
    fn source_labels_follow_mode() {
        assert_eq!(source_label(Mode::Ctr, Source::Iv), "Nonce");
        assert_eq!(source_label(Mode::Cbc, Source::Iv), "IV");
        assert_eq!(source_label(Mode::Ctr, Source::Counter { offset: 3 }), "nonce + 3");
    }
}
