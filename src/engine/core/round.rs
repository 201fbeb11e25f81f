//! Observable round structure of the block cipher. The block functions report every primitive
//! they apply, together with the state right after it, so callers can narrate the real
//! computation instead of a description of it.

use std::fmt;

use super::Block;

/// One primitive transformation of the AES state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundOp {
    SubBytes,
    ShiftRows,
    MixColumns,
    /// XOR with the round key at this index of the key schedule.
    AddRoundKey(usize),
    InvSubBytes,
    InvShiftRows,
    InvMixColumns,
}

impl RoundOp {
    pub fn name(self) -> &'static str {
        match self {
            RoundOp::SubBytes => "SubBytes",
            RoundOp::ShiftRows => "ShiftRows",
            RoundOp::MixColumns => "MixColumns",
            RoundOp::AddRoundKey(_) => "AddRoundKey",
            RoundOp::InvSubBytes => "InvSubBytes",
            RoundOp::InvShiftRows => "InvShiftRows",
            RoundOp::InvMixColumns => "InvMixColumns",
        }
    }

    /// Short explanation of what the primitive does to the state.
    pub fn describe(self) -> String {
        match self {
            RoundOp::SubBytes => "each byte replaced using the AES S-box".into(),
            RoundOp::ShiftRows => "row r rotated left by r positions (0, 1, 2, 3)".into(),
            RoundOp::MixColumns => {
                "each column multiplied by the fixed matrix [2 3 1 1] in GF(2^8)".into()
            }
            RoundOp::AddRoundKey(k) => format!("state XOR RoundKey[{k}]"),
            RoundOp::InvSubBytes => "each byte replaced using the inverse S-box".into(),
            RoundOp::InvShiftRows => "row r rotated right by r positions (0, 1, 2, 3)".into(),
            RoundOp::InvMixColumns => {
                "each column multiplied by the inverse matrix [14 11 13 9] in GF(2^8)".into()
            }
        }
    }
}

impl fmt::Display for RoundOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that happened to the state in one round (stage 0 is the initial AddRoundKey).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundTrace {
    pub stage: usize,
    pub input: Block,
    /// Primitives in execution order, each with the state after it.
    pub ops: Vec<(RoundOp, Block)>,
}

impl RoundTrace {
    /// State at the end of the round.
    pub fn output(&self) -> Block {
        self.ops.last().map_or(self.input, |(_, state)| *state)
    }

    pub fn applies(&self, op: RoundOp) -> bool {
        self.ops.iter().any(|(o, _)| *o == op)
    }

    /// True if this round carries a MixColumns or InvMixColumns step.
    pub fn mixes_columns(&self) -> bool {
        self.applies(RoundOp::MixColumns) || self.applies(RoundOp::InvMixColumns)
    }
}

/// Collects the observer callbacks of a block function into [RoundTrace]s.
pub(crate) struct RoundRecorder {
    rounds: Vec<RoundTrace>,
    last: Block,
}

impl RoundRecorder {
    pub(crate) fn new(input: Block) -> Self {
        Self {
            rounds: Vec::with_capacity(super::ROUNDS + 1),
            last: input,
        }
    }

    pub(crate) fn record(&mut self, stage: usize, op: RoundOp, state: &Block) {
        match self.rounds.last_mut() {
            Some(round) if round.stage == stage => round.ops.push((op, *state)),
            _ => self.rounds.push(RoundTrace {
                stage,
                input: self.last,
                ops: vec![(op, *state)],
            }),
        }
        self.last = *state;
    }

    pub(crate) fn into_rounds(self) -> Vec<RoundTrace> {
        self.rounds
    }
}
