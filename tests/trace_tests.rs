use std::error::Error;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use aes_steps::trace::to_hex;
use aes_steps::{Cipher, Mode, Operation, Trace, encrypt_block, expand_key};

const KEY: &[u8; 32] = b"MySecretKey123456789012345678901";
const IV: &[u8; 16] = b"1234567890123456";

fn titles(trace: &Trace) -> Vec<String> {
    trace.titles().map(str::to_string).collect()
}

fn detail<'a>(trace: &'a Trace, title: &str) -> &'a str {
    trace
        .find(title)
        .map(|s| s.detail.as_str())
        .unwrap_or_else(|| panic!("missing step {title:?}"))
}

fn unit_titles(prefix: &str, n: usize, inverse: bool, preprocessing: Option<&str>) -> Vec<String> {
    let p = format!("{prefix}.{n}");
    let mut out = vec![format!("{p}. Block {n} Processing Start")];
    if let Some(mode) = preprocessing {
        out.push(format!("{p}.0. {mode} Preprocessing"));
    }
    out.push(format!("{p}.1. Initial State"));
    out.push(format!("{p}.2. Key Schedule"));
    for stage in 0..=14 {
        let title = match (inverse, stage) {
            (false, 0) => "Initial Round (Round 0)".to_string(),
            (false, 14) => "Final Round (Round 14)".to_string(),
            (false, s) => format!("Round {s}"),
            (true, 0) => "Initial Decryption Step (RoundKey[14])".to_string(),
            (true, 14) => "Final Decryption Step (RoundKey[0])".to_string(),
            (true, s) => format!("Inverse Round {s}"),
        };
        out.push(format!("{p}.{}. {title}", stage + 3));
    }
    out.push(format!("{p}.18. Block {n} Processing Complete"));
    out
}

#[test]
fn ecb_encrypt_phase_order() -> Result<(), Box<dyn Error>> {
    let mut c = Cipher::from_parts(KEY, "ecb", None)?;
    c.encrypt("Hello World!!!!!")?;

    let mut expected: Vec<String> = [
        "1. Input Preparation",
        "2. Key Preparation",
        "3. Block Mode Processing",
        "4. ECB Mode Setup",
        "5. Block Division",
    ]
    .map(String::from)
    .to_vec();
    expected.extend(unit_titles("6", 1, false, None));
    expected.push("7. All Blocks Encrypted".into());
    expected.push("8. Final Output".into());

    assert_eq!(titles(c.steps()), expected);
    Ok(())
}

#[test]
fn ecb_decrypt_phase_order() -> Result<(), Box<dyn Error>> {
    let mut c = Cipher::from_parts(KEY, "ecb", None)?;
    c.decrypt("a/81PRbCptq94NGt4gWv9Q==")?;

    let mut expected: Vec<String> = [
        "1. Input Preparation",
        "2. Key Preparation",
        "3. ECB Mode Setup",
        "4. Block Analysis",
    ]
    .map(String::from)
    .to_vec();
    expected.extend(unit_titles("5", 1, true, None));
    expected.push("6. All Blocks Decrypted".into());
    expected.push("7. Block Mode Final Processing".into());
    expected.push("8. Final Result".into());

    assert_eq!(titles(c.steps()), expected);
    assert!(detail(c.steps(), "8. Final Result").contains("Plaintext: Hello World!!!!!"));
    Ok(())
}

#[test]
fn cbc_padding_and_chaining_steps() -> Result<(), Box<dyn Error>> {
    let mut c = Cipher::from_parts(KEY, "cbc", Some(IV))?;
    let encrypted = c.encrypt("seventeen bytes!!")?;
    let trace = c.steps().clone();

    let padding = detail(&trace, "3. Block Mode Processing with Padding");
    assert!(padding.contains("Padding needed: 15 bytes"));
    assert!(padding.contains(&format!("Padding bytes: {}", "0F".repeat(15))));

    let first = detail(&trace, "6.1.0. CBC Preprocessing");
    assert!(first.contains(&format!("IV: {}", to_hex(IV))));

    let ct = STANDARD.decode(&encrypted)?;
    let second = detail(&trace, "6.2.0. CBC Preprocessing");
    assert!(second.contains(&format!("previous ciphertext block: {}", to_hex(&ct[16..32]))));

    assert!(detail(&trace, "6.2.18. Block 2 Processing Complete")
        .contains(&format!("Output block: {}", to_hex(&ct[32..48]))));

    // decryption strips the padding it finds
    c.decrypt(&encrypted)?;
    let removal = detail(c.steps(), "7. Padding Removal");
    assert!(removal.contains("Padding detected: 15 bytes"));
    assert_eq!(
        c.steps().find("3. CBC IV Extraction").map(|s| s.detail.contains(&to_hex(IV))),
        Some(true)
    );
    Ok(())
}

#[test]
fn stream_trace_layout() -> Result<(), Box<dyn Error>> {
    let text = "twenty bytes of text";
    let mut c = Cipher::from_parts(KEY, "ctr", Some(IV))?;
    let encrypted = c.encrypt(text)?;
    let enc = c.steps().clone();

    assert!(enc.find("3. Stream Mode Processing").is_some());
    assert!(enc.find("5. Stream Processing").is_some());
    assert!(enc.find("7. Stream Encryption Complete").is_some());
    // two keystream blocks, the second one used for 4 bytes
    assert!(detail(&enc, "6.2.0. CTR Preprocessing").contains("nonce + 1"));
    assert!(detail(&enc, "6.2.18. Block 2 Processing Complete").contains("Keystream truncated to 4 of 16 bytes"));

    c.decrypt(&encrypted)?;
    let dec = c.steps();
    assert!(dec.find("3. CTR Nonce Extraction").is_some());
    assert!(dec.find("4. Stream Analysis").is_some());
    // keystream is regenerated with the forward cipher
    assert!(dec.find("5.1.17. Final Round (Round 14)").is_some());
    assert!(dec.find("6. Stream Decryption Complete").is_some());
    assert!(dec.find("7. Stream Mode Final Processing").is_some());
    Ok(())
}

#[test]
fn round_steps_quote_real_states() -> Result<(), Box<dyn Error>> {
    let mut c = Cipher::from_parts(KEY, "ecb", None)?;
    c.encrypt("Hello World!!!!!")?;
    let trace = c.steps();

    let round_keys = expand_key(&aes_steps::Key::try_from_slice(KEY)?);
    let block: [u8; 16] = *b"Hello World!!!!!";

    let mut after_ark = block;
    for (b, k) in after_ark.iter_mut().zip(&round_keys[0]) {
        *b ^= k;
    }
    assert!(detail(trace, "6.1.3. Initial Round (Round 0)")
        .contains(&format!("Result: {}", to_hex(&after_ark))));

    let final_round = detail(trace, "6.1.17. Final Round (Round 14)");
    assert!(final_round.contains(&format!("Result: {}", to_hex(&encrypt_block(&block, &round_keys)))));
    assert!(final_round.contains("Step 3: AddRoundKey"));
    assert!(!final_round.contains("Step 3: MixColumns"));
    assert!(final_round.contains("MixColumns is skipped"));

    for round in 1..=13 {
        let d = detail(trace, &format!("6.1.{}. Round {round}", round + 3));
        assert!(d.contains("Step 3: MixColumns"), "round {round}");
        assert!(d.contains(&format!("RoundKey[{round}]: {}", to_hex(&round_keys[round]))));
    }
    Ok(())
}

#[test]
fn key_preparation_lists_round_keys() -> Result<(), Box<dyn Error>> {
    let mut c = Cipher::from_parts(KEY, "ofb", Some(IV))?;
    c.encrypt("Hello World!!!!!")?;
    let key_step = detail(c.steps(), "2. Key Preparation");

    assert!(key_step.contains("Key: MySecretKey123456789012345678901"));
    for (i, rk) in c.get_round_keys().iter().enumerate() {
        assert!(key_step.contains(&format!("RoundKey[{i}]: {}", to_hex(rk))));
    }
    Ok(())
}

#[test]
fn final_output_quotes_returned_text() -> Result<(), Box<dyn Error>> {
    for mode in Mode::ALL {
        let mut c = Cipher::from_parts(KEY, mode.as_str(), Some(IV))?;
        let encrypted = c.encrypt("The quick brown fox jumps over the lazy dog")?;
        let out = detail(c.steps(), "8. Final Output");
        assert!(out.contains(&format!("Base64 encoded: {encrypted}")), "{mode}");
        assert_eq!(c.steps().steps().last().map(|s| s.title.as_str()), Some("8. Final Output"));
    }
    Ok(())
}

#[test]
fn failures_end_with_error_step() -> Result<(), Box<dyn Error>> {
    let mut c = Cipher::from_parts(KEY, "cbc", Some(IV))?;

    assert!(c.decrypt("not-base64!!").is_err());
    assert_eq!(titles(c.steps()), ["Error"]);
    assert!(detail(c.steps(), "Error").starts_with("Decryption failed: invalid Base64"));

    assert!(c.encrypt("short").is_err());
    let last = c.steps().steps().last().map(|s| s.title.as_str());
    assert_eq!(last, Some("Error"));
    Ok(())
}

#[test]
fn traced_matches_stored_trace() -> Result<(), Box<dyn Error>> {
    let mut c = Cipher::from_parts(KEY, "cfb", Some(IV))?;
    let traced = c.encrypt_traced("The quick brown fox jumps over the lazy dog");
    assert_eq!(traced.operation, Operation::Encrypt);

    let result = c.encrypt("The quick brown fox jumps over the lazy dog")?;
    assert_eq!(traced.result?, result);
    assert_eq!(&traced.trace, c.steps());
    Ok(())
}
