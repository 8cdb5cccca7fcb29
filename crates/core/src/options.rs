//! Extraction options shared by the parser, the CLI and the wasm surface.

use serde::{Deserialize, Serialize};

/// How the title of a slide is chosen.
///
/// One strategy is applied to every slide of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleStrategy {
    /// The shape whose placeholder type is `title` or `ctrTitle`.
    #[default]
    Placeholder,
    /// The first shape that yields any text.
    FirstText,
}

/// Options controlling how slides are extracted and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Title detection strategy.
    pub title_strategy: TitleStrategy,

    /// Uppercase the first character of every paragraph.
    pub capitalize_lead: bool,

    /// Merge consecutive paragraphs of the same list state into one block.
    pub merge_paragraphs: bool,

    /// Drop image references whose target entry is absent from the package.
    pub verify_images: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            title_strategy: TitleStrategy::default(),
            capitalize_lead: true,
            merge_paragraphs: true,
            verify_images: true,
        }
    }
}

impl ExtractOptions {
    /// Create options with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title detection strategy.
    pub fn with_title_strategy(mut self, strategy: TitleStrategy) -> Self {
        self.title_strategy = strategy;
        self
    }

    /// Set whether paragraph leads are capitalized.
    pub fn with_capitalize_lead(mut self, capitalize: bool) -> Self {
        self.capitalize_lead = capitalize;
        self
    }

    /// Set whether adjacent paragraphs are merged into blocks.
    pub fn with_merge_paragraphs(mut self, merge: bool) -> Self {
        self.merge_paragraphs = merge;
        self
    }

    /// Set whether image targets are checked against the package.
    pub fn with_verify_images(mut self, verify: bool) -> Self {
        self.verify_images = verify;
        self
    }
}
