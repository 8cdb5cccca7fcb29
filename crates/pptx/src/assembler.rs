//! Building one [`Slide`] from its slide part and relationship part.

use crate::archive::Package;
use crate::parts::{SlidePart, SLIDES_DIR};
use crate::relationships::resolve_image_targets;
use crate::shapes::extract_slide_text;
use slides_core::{
    Error, ExtractOptions, ExtractionWarning, ImageFormat, Result, Slide, TextNormalizer,
    WarningKind,
};
use std::io::{Read, Seek};

/// What happened to one slide part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideOutcome {
    /// The slide was built; `warnings` lists images that were dropped.
    Assembled {
        slide: Slide,
        warnings: Vec<ExtractionWarning>,
    },
    /// The slide could not be built and is left out of the result.
    Skipped(ExtractionWarning),
}

/// Combines text extraction, normalization and image resolution per slide.
#[derive(Debug, Clone)]
pub struct SlideAssembler {
    options: ExtractOptions,
    normalizer: TextNormalizer,
}

impl Default for SlideAssembler {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

impl SlideAssembler {
    /// Create an assembler for the given options.
    pub fn new(options: ExtractOptions) -> Self {
        let normalizer = TextNormalizer::from_options(&options);
        Self {
            options,
            normalizer,
        }
    }

    /// Assemble one slide. Failures never escape; they become a skip.
    pub fn assemble<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        part: &SlidePart,
    ) -> SlideOutcome {
        match self.build_slide(package, part) {
            Ok((slide, warnings)) => SlideOutcome::Assembled { slide, warnings },
            Err(e) => {
                log::warn!("Skipping slide {} ({}): {}", part.ordinal, part.path, e);
                SlideOutcome::Skipped(ExtractionWarning::from_error(
                    &part.path,
                    Some(part.ordinal),
                    &e,
                ))
            }
        }
    }

    fn build_slide<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        part: &SlidePart,
    ) -> Result<(Slide, Vec<ExtractionWarning>)> {
        let content = package.read_text(&part.path)?;
        let text = extract_slide_text(&content, self.options.title_strategy)?;

        let mut warnings = Vec::new();
        let images = self.collect_images(package, part, &mut warnings);

        let slide = Slide {
            ordinal: part.ordinal,
            title: text.title,
            paragraphs: self.normalizer.normalize(text.paragraphs),
            images,
        };

        log::debug!(
            "Slide {}: title {:?}, {} paragraphs, {} images",
            slide.ordinal,
            slide.title,
            slide.paragraphs.len(),
            slide.images.len()
        );

        Ok((slide, warnings))
    }

    /// Resolve the image paths of a slide. Problems drop single images or,
    /// for an unreadable rels part, all of them; the slide itself survives.
    fn collect_images<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        part: &SlidePart,
        warnings: &mut Vec<ExtractionWarning>,
    ) -> Vec<String> {
        let Some(rels_path) = &part.rels_path else {
            return Vec::new();
        };

        let targets = match package
            .read_text(rels_path)
            .and_then(|xml| resolve_image_targets(&xml, SLIDES_DIR))
        {
            Ok(targets) => targets,
            Err(e) => {
                log::warn!("Ignoring images of slide {}: {}", part.ordinal, e);
                warnings.push(ExtractionWarning::from_error(
                    rels_path,
                    Some(part.ordinal),
                    &e,
                ));
                return Vec::new();
            }
        };

        let mut images: Vec<String> = Vec::with_capacity(targets.len());
        for path in targets.paths() {
            if images.iter().any(|existing| existing == path) {
                continue;
            }

            if ImageFormat::from_path(path).is_none() {
                let e = Error::UnsupportedImageType(path.to_string());
                log::warn!("Dropping image on slide {}: {}", part.ordinal, e);
                warnings.push(ExtractionWarning::from_error(path, Some(part.ordinal), &e));
                continue;
            }

            if self.options.verify_images && !package.contains(path) {
                log::warn!(
                    "Dropping image on slide {}: {} is not in the package",
                    part.ordinal,
                    path
                );
                warnings.push(ExtractionWarning::new(
                    path,
                    Some(part.ordinal),
                    WarningKind::EntryMissing,
                    format!("Entry not found in package: {}", path),
                ));
                continue;
            }

            images.push(path.to_string());
        }

        images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        para_xml, plain_para_xml, rels_xml, shape_xml, slide_xml, text_package, IMAGE_REL,
        LAYOUT_REL,
    };
    use slides_core::{Paragraph, TitleStrategy};

    fn part(ordinal: u32, rels: bool) -> SlidePart {
        SlidePart {
            ordinal,
            path: format!("ppt/slides/slide{}.xml", ordinal),
            rels_path: rels.then(|| format!("ppt/slides/_rels/slide{}.xml.rels", ordinal)),
        }
    }

    fn assembled(outcome: SlideOutcome) -> (Slide, Vec<ExtractionWarning>) {
        match outcome {
            SlideOutcome::Assembled { slide, warnings } => (slide, warnings),
            SlideOutcome::Skipped(w) => panic!("slide skipped: {:?}", w),
        }
    }

    #[test]
    fn test_assemble_normalizes_and_resolves_images() {
        let slide = slide_xml(&format!(
            "{}{}",
            shape_xml(Some("title"), &para_xml("Agenda")),
            shape_xml(
                Some("body"),
                &format!("{}{}", plain_para_xml("first"), plain_para_xml("second"))
            )
        ));
        let rels = rels_xml(&[
            ("rId1", LAYOUT_REL, "../slideLayouts/slideLayout2.xml"),
            ("rId2", IMAGE_REL, "../media/image1.png"),
        ]);
        let bytes = text_package(&[
            ("ppt/slides/slide2.xml", slide.as_str()),
            ("ppt/slides/_rels/slide2.xml.rels", rels.as_str()),
            ("ppt/media/image1.png", "png"),
        ]);
        let mut package = Package::from_bytes(bytes).unwrap();

        let (slide, warnings) =
            assembled(SlideAssembler::default().assemble(&mut package, &part(2, true)));

        assert_eq!(slide.ordinal, 2);
        assert_eq!(slide.title, "Agenda");
        assert_eq!(slide.paragraphs.len(), 1);
        assert_eq!(slide.paragraphs[0].text(), "First\nSecond");
        assert!(!slide.paragraphs[0].is_list);
        assert_eq!(slide.images, vec!["ppt/media/image1.png"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_rels_part_yields_text_without_images() {
        let slide = slide_xml(&shape_xml(None, &para_xml("hello")));
        let bytes = text_package(&[("ppt/slides/slide1.xml", slide.as_str())]);
        let mut package = Package::from_bytes(bytes).unwrap();

        let (slide, warnings) =
            assembled(SlideAssembler::default().assemble(&mut package, &part(1, false)));
        assert_eq!(slide.paragraph_texts(), vec!["Hello"]);
        assert!(slide.images.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_slide_part_is_skipped() {
        let bytes = text_package(&[("ppt/presentation.xml", "<p:presentation/>")]);
        let mut package = Package::from_bytes(bytes).unwrap();

        match SlideAssembler::default().assemble(&mut package, &part(3, false)) {
            SlideOutcome::Skipped(w) => {
                assert_eq!(w.kind, WarningKind::EntryMissing);
                assert_eq!(w.ordinal, Some(3));
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_slide_is_skipped() {
        let bytes = text_package(&[("ppt/slides/slide1.xml", "<p:sld><p:cSld>")]);
        let mut package = Package::from_bytes(bytes).unwrap();

        match SlideAssembler::default().assemble(&mut package, &part(1, false)) {
            SlideOutcome::Skipped(w) => assert_eq!(w.kind, WarningKind::SlideParse),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_and_missing_images_are_dropped() {
        let slide = slide_xml(&shape_xml(None, &para_xml("pics")));
        let rels = rels_xml(&[
            ("rId1", IMAGE_REL, "../media/anim.gif"),
            ("rId2", IMAGE_REL, "../media/photo.jpg"),
            ("rId3", IMAGE_REL, "../media/gone.png"),
            ("rId4", IMAGE_REL, "../media/photo.jpg"),
        ]);
        let bytes = text_package(&[
            ("ppt/slides/slide1.xml", slide.as_str()),
            ("ppt/slides/_rels/slide1.xml.rels", rels.as_str()),
            ("ppt/media/anim.gif", "gif"),
            ("ppt/media/photo.jpg", "jpg"),
        ]);
        let mut package = Package::from_bytes(bytes).unwrap();

        let (slide, warnings) =
            assembled(SlideAssembler::default().assemble(&mut package, &part(1, true)));
        assert_eq!(slide.images, vec!["ppt/media/photo.jpg"]);
        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::UnsupportedImageType, WarningKind::EntryMissing]
        );
    }

    #[test]
    fn test_unverified_images_are_kept() {
        let slide = slide_xml(&shape_xml(None, &para_xml("pics")));
        let rels = rels_xml(&[("rId1", IMAGE_REL, "../media/gone.png")]);
        let bytes = text_package(&[
            ("ppt/slides/slide1.xml", slide.as_str()),
            ("ppt/slides/_rels/slide1.xml.rels", rels.as_str()),
        ]);
        let mut package = Package::from_bytes(bytes).unwrap();

        let assembler = SlideAssembler::new(ExtractOptions::new().with_verify_images(false));
        let (slide, _) = assembled(assembler.assemble(&mut package, &part(1, true)));
        assert_eq!(slide.images, vec!["ppt/media/gone.png"]);
    }

    #[test]
    fn test_broken_rels_keeps_slide() {
        let slide = slide_xml(&shape_xml(None, &para_xml("text survives")));
        let bytes = text_package(&[
            ("ppt/slides/slide1.xml", slide.as_str()),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships><Oops></Relationships>"),
        ]);
        let mut package = Package::from_bytes(bytes).unwrap();

        let (slide, warnings) =
            assembled(SlideAssembler::default().assemble(&mut package, &part(1, true)));
        assert_eq!(slide.paragraph_texts(), vec!["Text survives"]);
        assert!(slide.images.is_empty());
        assert_eq!(warnings[0].kind, WarningKind::RelationshipParse);
    }

    #[test]
    fn test_options_flow_through() {
        let slide = slide_xml(&format!(
            "{}{}",
            shape_xml(None, &para_xml("lead in")),
            shape_xml(Some("title"), &para_xml("Real title"))
        ));
        let bytes = text_package(&[("ppt/slides/slide1.xml", slide.as_str())]);
        let mut package = Package::from_bytes(bytes).unwrap();

        let options = ExtractOptions::new()
            .with_title_strategy(TitleStrategy::FirstText)
            .with_capitalize_lead(false);
        let (slide, _) =
            assembled(SlideAssembler::new(options).assemble(&mut package, &part(1, false)));
        assert_eq!(slide.title, "lead in");
        assert_eq!(
            slide.paragraphs,
            vec![Paragraph::new(vec![slides_core::Run::new("Real title")], true)]
        );
    }
}
