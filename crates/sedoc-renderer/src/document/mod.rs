//! Document model synthesis: parsed blocks in, editor components out.

mod synthesize;
mod types;

pub use synthesize::{DocumentSynthesizer, SynthesisOptions};
pub use types::*;
