use std::fmt::Write;

/// Uppercase hex, two digits per byte, no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Renders a 16-byte state as a 4x4 grid. The block is loaded column by column, so row `r`
/// holds bytes `r, r+4, r+8, r+12`.
pub fn state_grid(block: &[u8; 16]) -> String {
    let mut out = String::with_capacity(4 * 12);
    for row in 0..4 {
        if row > 0 {
            out.push('\n');
        }
        for col in 0..4 {
            if col > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{:02X}", block[col * 4 + row]);
        }
    }
    out
}

/// Number of positions where `a` and `b` differ, and the number of positions compared.
pub fn changed_bytes(a: &[u8], b: &[u8]) -> (usize, usize) {
    let total = a.len().min(b.len());
    let changed = a.iter().zip(b).filter(|(x, y)| x != y).count();
    (changed, total)
}

/// One-line summary of how much a block changed, e.g. `Changed bytes: 16/16 (100.0%)`.
pub fn compare_blocks(input: &[u8], output: &[u8]) -> String {
    let (changed, total) = changed_bytes(input, output);
    if total == 0 {
        return "Changed bytes: 0/0".into();
    }
    if changed == 0 {
        return format!("WARNING: no change detected (0/{total} bytes)");
    }
    let pct = changed as f64 * 100.0 / total as f64;
    format!("Changed bytes: {changed}/{total} ({pct:.1}%)")
}
