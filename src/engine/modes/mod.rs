//! Modes of operation. Every mode returns its output together with a [BlockRecord] per
//! 16-byte unit, holding the bytes actually seen at each stage.

mod cbc;
mod cfb;
mod ctr;
mod ecb;
mod ofb;
mod record;
mod util;

pub use cbc::{cbc_decrypt, cbc_encrypt};
pub use cfb::{cfb_decrypt, cfb_encrypt};
pub use ctr::ctr_core;
pub use ecb::{ecb_decrypt, ecb_encrypt};
pub use ofb::ofb_core;
pub use record::{BlockRecord, Feed, Source, Transformed};
pub use util::PARALLEL_THRESHOLD;
