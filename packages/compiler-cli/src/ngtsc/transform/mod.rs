//! Component transform
//!
//! Turns component functions written with the TSX shorthand into functions
//! carrying an Angular component definition.

pub mod src;

pub use src::extractor::{extract_components, ComponentCandidate, InputDeclaration};
pub use src::preprocess::{preprocess, shield_blocks};
pub use src::synthesizer::{synthesize, HelperRequests, SynthesisContext, SynthesisStrategy, SynthesizedComponent};
