// Transform passes, in the order the driver runs them: block shielding and
// extraction over the parsed file, then per component template compilation,
// translation, rewriting and splicing.

pub mod direct;
pub mod extractor;
pub mod lazy;
pub mod preprocess;
pub mod rewriter;
pub mod synthesizer;

pub use extractor::{extract_components, ComponentCandidate, InputDeclaration};
pub use lazy::LazyPhase;
pub use rewriter::{selector_tag_helper, ContextQualifierStripper, SelectorTagRewriter, SELECTOR_TAG_HELPER};
pub use synthesizer::{compile_definition, synthesize, CompiledDefinition, SynthesisStrategy};
