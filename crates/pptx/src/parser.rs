//! PPTX package parser: turns package bytes into an ordered slide list.

use crate::archive::Package;
use crate::assembler::{SlideAssembler, SlideOutcome};
use crate::parts::locate_slides;
use slides_core::{ExtractOptions, Extraction, Result};
use std::io::{Cursor, Read, Seek};

/// Parser for PPTX (Office Open XML) packages.
#[derive(Debug, Clone, Default)]
pub struct PptxParser {
    options: ExtractOptions,
}

impl PptxParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// The options this parser runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Parse a PPTX package from a reader.
    ///
    /// Only a package that cannot be opened at all is an error; slides that
    /// fail are reported in [`Extraction::warnings`].
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Extraction> {
        let mut package = Package::open(reader)?;
        Ok(self.parse_package(&mut package))
    }

    /// Parse a PPTX package held in memory.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Extraction> {
        self.parse(Cursor::new(bytes))
    }

    /// Extract every slide of an already opened package, in ordinal order.
    pub fn parse_package<R: Read + Seek>(&self, package: &mut Package<R>) -> Extraction {
        let located = locate_slides(package.entry_names());
        let parts = located.slides;
        let mut extraction = Extraction {
            slides: Vec::with_capacity(parts.len()),
            warnings: located.warnings,
        };

        let assembler = SlideAssembler::new(self.options.clone());

        // Parse each slide in order
        for part in &parts {
            match assembler.assemble(package, part) {
                SlideOutcome::Assembled { slide, warnings } => {
                    extraction.slides.push(slide);
                    extraction.warnings.extend(warnings);
                }
                SlideOutcome::Skipped(warning) => extraction.warnings.push(warning),
            }
        }

        log::debug!(
            "Extracted {} of {} slides ({} warnings)",
            extraction.slides.len(),
            parts.len(),
            extraction.warnings.len()
        );

        extraction
    }
}
