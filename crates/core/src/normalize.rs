//! Text normalization for extracted slide paragraphs.
//!
//! Two transforms are applied after extraction: the lead character of each
//! paragraph is capitalized, and runs of paragraphs sharing the same list
//! state are merged into a single renderable block.

use crate::options::ExtractOptions;
use crate::types::{Paragraph, Run};

/// Uppercase the first character of `text`, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalize the first character of every paragraph's first run.
///
/// Paragraphs without runs, or whose first run is empty, are left as is.
pub fn capitalize_lead(mut paragraphs: Vec<Paragraph>) -> Vec<Paragraph> {
    for paragraph in &mut paragraphs {
        if let Some(first) = paragraph.runs.first_mut() {
            if !first.text.is_empty() {
                first.text = capitalize_first(&first.text);
            }
        }
    }
    paragraphs
}

/// Merge consecutive paragraphs that share the same `is_list` value.
///
/// The merged block keeps every run, with a line-break run between the
/// source paragraphs, and takes the level of its first paragraph. Applying
/// this to its own output returns the output unchanged.
pub fn merge_adjacent(paragraphs: &[Paragraph]) -> Vec<Paragraph> {
    let mut blocks: Vec<Paragraph> = Vec::with_capacity(paragraphs.len());

    for paragraph in paragraphs {
        match blocks.last_mut() {
            Some(block) if block.is_list == paragraph.is_list => {
                block.runs.push(Run::line_break());
                block.runs.extend(paragraph.runs.iter().cloned());
            }
            _ => blocks.push(paragraph.clone()),
        }
    }

    log::trace!(
        "Merged {} paragraphs into {} blocks",
        paragraphs.len(),
        blocks.len()
    );

    blocks
}

/// Text normalizer for slide paragraphs.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to capitalize the lead character of each paragraph.
    capitalize_lead: bool,

    /// Whether to merge same-kind neighbours into blocks.
    merge_adjacent: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a normalizer with both transforms enabled.
    pub fn new() -> Self {
        Self {
            capitalize_lead: true,
            merge_adjacent: true,
        }
    }

    /// Build a normalizer matching the given extraction options.
    pub fn from_options(options: &ExtractOptions) -> Self {
        Self {
            capitalize_lead: options.capitalize_lead,
            merge_adjacent: options.merge_paragraphs,
        }
    }

    /// Set whether to capitalize paragraph leads.
    pub fn with_capitalize_lead(mut self, capitalize: bool) -> Self {
        self.capitalize_lead = capitalize;
        self
    }

    /// Set whether to merge adjacent paragraphs.
    pub fn with_merge_adjacent(mut self, merge: bool) -> Self {
        self.merge_adjacent = merge;
        self
    }

    /// Apply the enabled transforms: capitalization first, then merging.
    pub fn normalize(&self, paragraphs: Vec<Paragraph>) -> Vec<Paragraph> {
        let paragraphs = if self.capitalize_lead {
            capitalize_lead(paragraphs)
        } else {
            paragraphs
        };

        if self.merge_adjacent {
            merge_adjacent(&paragraphs)
        } else {
            paragraphs
        }
    }
}
