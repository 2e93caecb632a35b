//! Template Pipeline IR
//!
//! Operations produced by ingestion and rewritten by the phases before they
//! are reified into output statements. Each view owns a creation list and an
//! update list.

pub mod ops;

pub use ops::create::*;
pub use ops::update::*;

/// Identifies a view (compilation unit) within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct XrefId(usize);

impl XrefId {
    pub fn new(id: usize) -> Self {
        XrefId(id)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Index into the component-level `consts` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstIndex(usize);

impl ConstIndex {
    pub fn new(index: usize) -> Self {
        ConstIndex(index)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}
