//! PPTX (Office Open XML) slide extraction.
//!
//! Opens a .pptx package (a ZIP archive of XML parts), locates its slide
//! parts, and turns each into a normalized [`slides_core::Slide`] with title,
//! styled paragraphs and image references.

pub mod archive;
pub mod assembler;
pub mod parser;
pub mod parts;
pub mod relationships;
pub mod shapes;

#[cfg(test)]
mod test_support;

pub use archive::Package;
pub use assembler::{SlideAssembler, SlideOutcome};
pub use parser::PptxParser;
pub use parts::{locate_slides, SlidePart, SlideParts};
pub use relationships::{resolve_image_targets, resolve_target, RelationshipMap};
pub use shapes::{extract_slide_text, ShapeTree, SlideText};
