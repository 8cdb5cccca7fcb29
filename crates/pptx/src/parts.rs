//! Locating slide parts and their relationship parts inside a package.

use regex::Regex;
use slides_core::{Error, ExtractionWarning, WarningKind};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Directory holding slide parts; relationship targets resolve against it.
pub const SLIDES_DIR: &str = "ppt/slides";

/// Regex matching a slide part path and capturing its number.
static SLIDE_PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap());

/// Regex matching a slide relationship part path and capturing its number.
static SLIDE_RELS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/_rels/slide(\d+)\.xml\.rels$").unwrap());

/// A slide part together with its (optional) relationship part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePart {
    /// 1-based slide number parsed from the part name.
    pub ordinal: u32,

    /// Path of the slide XML part.
    pub path: String,

    /// Path of the matching relationship part, if the package has one.
    pub rels_path: Option<String>,
}

/// Slide parts in ordinal order plus the parts that had to be left out.
#[derive(Debug, Default)]
pub struct SlideParts {
    pub slides: Vec<SlidePart>,
    pub warnings: Vec<ExtractionWarning>,
}

/// Find every slide part among `entries` and pair it with its rels part.
///
/// The result is sorted by the number in the part name, so `slide10.xml`
/// comes after `slide2.xml`.
pub fn locate_slides<'a>(entries: impl IntoIterator<Item = &'a str>) -> SlideParts {
    let mut slide_paths: Vec<(&'a str, &'a str)> = Vec::new();
    let mut rels_by_digits: HashMap<&'a str, &'a str> = HashMap::new();

    for entry in entries {
        if let Some(digits) = capture_digits(&SLIDE_PART_REGEX, entry) {
            slide_paths.push((entry, digits));
        } else if let Some(digits) = capture_digits(&SLIDE_RELS_REGEX, entry) {
            rels_by_digits.insert(digits, entry);
        }
    }

    let mut parts = SlideParts::default();
    let mut candidates: Vec<SlidePart> = Vec::with_capacity(slide_paths.len());

    for (path, digits) in &slide_paths {
        let ordinal = match parse_ordinal(digits) {
            Ok(ordinal) => ordinal,
            Err(e) => {
                log::warn!("Skipping slide part '{}': {}", path, e);
                parts
                    .warnings
                    .push(ExtractionWarning::from_error(*path, None, &e));
                continue;
            }
        };

        candidates.push(SlidePart {
            ordinal,
            path: path.to_string(),
            rels_path: rels_by_digits.get(digits).map(|r| r.to_string()),
        });
    }

    for (digits, rels) in &rels_by_digits {
        if !slide_paths.iter().any(|(_, d)| d == digits) {
            log::debug!("Ignoring relationship part without a slide: {}", rels);
        }
    }

    candidates.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.path.cmp(&b.path)));

    for part in candidates {
        match parts.slides.last() {
            Some(prev) if prev.ordinal == part.ordinal => {
                log::warn!(
                    "Skipping slide part '{}': ordinal {} already taken by '{}'",
                    part.path,
                    part.ordinal,
                    prev.path
                );
                parts.warnings.push(ExtractionWarning::new(
                    &part.path,
                    Some(part.ordinal),
                    WarningKind::DuplicateOrdinal,
                    format!("ordinal {} already taken by '{}'", part.ordinal, prev.path),
                ));
            }
            _ => parts.slides.push(part),
        }
    }

    log::debug!("Located {} slide parts", parts.slides.len());
    parts
}

/// Parse the number of a slide part, e.g. `"12"` from `slide12.xml`.
pub fn parse_ordinal(digits: &str) -> Result<u32, Error> {
    digits
        .parse::<u32>()
        .map_err(|e| Error::InvalidPartName(format!("slide number '{}': {}", digits, e)))
}

fn capture_digits<'a>(regex: &Regex, entry: &'a str) -> Option<&'a str> {
    regex
        .captures(entry)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
