//! Core module: linear-algebra seam traits and their faer/slice impls.

pub mod traits;
pub mod wrappers;

pub use traits::{InnerProduct, MatShape, MatVec};
