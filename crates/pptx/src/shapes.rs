//! Slide shape tree parsing and text extraction.
//!
//! A slide part is first parsed into a small typed model ([`ShapeTree`],
//! [`Shape`], [`TextBody`], [`RawParagraph`]) that keeps only what text
//! extraction needs. Title detection and paragraph cleanup then work on that
//! model instead of on raw XML.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slides_core::{Error, Paragraph, Result, Run, TitleStrategy};

/// Semantic role declared by a shape's `<p:ph type="...">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    /// A placeholder without a type attribute (`obj` in the schema).
    Object,
    Other(String),
}

impl PlaceholderKind {
    /// Map a placeholder `type` attribute value.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("obj") => Self::Object,
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenterTitle,
            Some("subTitle") => Self::Subtitle,
            Some("body") => Self::Body,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Whether this placeholder holds the slide title.
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }
}

/// A paragraph as found in the XML, before cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParagraph {
    pub runs: Vec<Run>,
    /// `<a:buNone/>` was present in the paragraph properties.
    pub no_bullet: bool,
    /// Value of `<a:pPr lvl="...">`, if any.
    pub level: Option<u32>,
}

impl RawParagraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// The `<p:txBody>` of a shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBody {
    pub paragraphs: Vec<RawParagraph>,
}

/// A `<p:sp>` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shape {
    /// `name` attribute of `<p:cNvPr>`.
    pub name: Option<String>,
    pub placeholder: Option<PlaceholderKind>,
    pub body: Option<TextBody>,
}

impl Shape {
    /// Whether the shape is a title placeholder.
    pub fn is_title(&self) -> bool {
        self.placeholder.as_ref().is_some_and(PlaceholderKind::is_title)
    }

    /// Non-empty paragraph texts joined by a space.
    pub fn plain_text(&self) -> String {
        let Some(body) = &self.body else {
            return String::new();
        };
        body.paragraphs
            .iter()
            .map(|p| collapse_whitespace(&p.text()))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// All text-capable shapes of a slide, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeTree {
    pub shapes: Vec<Shape>,
}

/// Title and body paragraphs of one slide, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideText {
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
}

impl ShapeTree {
    /// Parse the shape tree of a slide part.
    ///
    /// Only `<p:sp>` elements below `<p:spTree>` are collected, including
    /// those nested in group shapes. Pictures, connectors and graphic frames
    /// (tables, charts, diagrams) are skipped.
    pub fn parse(xml_content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(false);

        let mut builder = TreeBuilder::default();

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::SlideParseError(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) => builder.start(e)?,
                Event::Empty(ref e) => builder.empty(e)?,
                Event::End(ref e) => builder.end(e.local_name().as_ref())?,
                Event::Text(ref e) => {
                    if builder.in_run_text() {
                        let text = e.unescape().map_err(|e| {
                            Error::SlideParseError(format!("bad text content: {}", e))
                        })?;
                        builder.text(&text);
                    }
                }
                Event::CData(ref e) => {
                    if builder.in_run_text() {
                        builder.text(&String::from_utf8_lossy(e));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        builder.finish()
    }

    /// Split the tree into a title and body paragraphs.
    pub fn into_slide_text(self, strategy: TitleStrategy) -> SlideText {
        let title_index = match strategy {
            TitleStrategy::Placeholder => self.shapes.iter().position(Shape::is_title),
            TitleStrategy::FirstText => self
                .shapes
                .iter()
                .position(|s| !s.plain_text().is_empty()),
        };

        let title = title_index
            .map(|i| self.shapes[i].plain_text())
            .unwrap_or_default();

        // Placeholder titles are also removed where they are repeated verbatim.
        let exclude = match strategy {
            TitleStrategy::Placeholder if !title.is_empty() => Some(title.as_str()),
            _ => None,
        };

        let mut paragraphs = Vec::new();
        for (index, shape) in self.shapes.iter().enumerate() {
            if Some(index) == title_index {
                continue;
            }
            let Some(body) = &shape.body else {
                continue;
            };
            for raw in &body.paragraphs {
                if let Some(paragraph) = clean_paragraph(raw, exclude) {
                    paragraphs.push(paragraph);
                }
            }
        }

        SlideText { title, paragraphs }
    }
}

/// Parse a slide part and extract its title and paragraphs.
pub fn extract_slide_text(xml_content: &str, strategy: TitleStrategy) -> Result<SlideText> {
    Ok(ShapeTree::parse(xml_content)?.into_slide_text(strategy))
}

/// Join the words of `text` with single spaces; line breaks count as spaces.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn a raw paragraph into a cleaned one, or `None` if nothing is left.
///
/// Leading whitespace of the first run and trailing whitespace of the last
/// run are trimmed; runs left empty are dropped. When `exclude` is given,
/// a paragraph or run whose text equals it once whitespace is collapsed is
/// dropped as well.
fn clean_paragraph(raw: &RawParagraph, exclude: Option<&str>) -> Option<Paragraph> {
    if let Some(title) = exclude {
        if collapse_whitespace(&raw.text()) == title {
            return None;
        }
    }

    let mut runs: Vec<Run> = raw
        .runs
        .iter()
        .filter(|r| !r.text.is_empty())
        .filter(|r| exclude.map_or(true, |title| collapse_whitespace(&r.text) != title))
        .cloned()
        .collect();

    while let Some(first) = runs.first_mut() {
        let trimmed = first.text.trim_start();
        if trimmed.is_empty() {
            runs.remove(0);
        } else {
            if trimmed.len() != first.text.len() {
                first.text = trimmed.to_string();
            }
            break;
        }
    }

    while let Some(last) = runs.last_mut() {
        let trimmed = last.text.trim_end();
        if trimmed.is_empty() {
            runs.pop();
        } else {
            if trimmed.len() != last.text.len() {
                last.text = trimmed.to_string();
            }
            break;
        }
    }

    if runs.is_empty() {
        return None;
    }

    Some(Paragraph::new(runs, !raw.no_bullet).with_level(raw.level.unwrap_or(0)))
}

/// Streaming state for [`ShapeTree::parse`].
#[derive(Default)]
struct TreeBuilder {
    /// Local names of the currently open elements.
    stack: Vec<Vec<u8>>,
    shapes: Vec<Shape>,
    shape: Option<Shape>,
    paragraph: Option<RawParagraph>,
    run: Option<Run>,
}

impl TreeBuilder {
    fn start(&mut self, e: &BytesStart) -> Result<()> {
        self.open(e)?;
        self.stack.push(e.local_name().as_ref().to_vec());
        Ok(())
    }

    fn empty(&mut self, e: &BytesStart) -> Result<()> {
        self.open(e)?;
        self.close(e.local_name().as_ref());
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<()> {
        match self.stack.pop() {
            Some(open) if open == name => {}
            Some(open) => {
                return Err(Error::SlideParseError(format!(
                    "expected </{}>, found </{}>",
                    String::from_utf8_lossy(&open),
                    String::from_utf8_lossy(name)
                )));
            }
            None => {
                return Err(Error::SlideParseError(format!(
                    "unexpected </{}>",
                    String::from_utf8_lossy(name)
                )));
            }
        }
        self.close(name);
        Ok(())
    }

    fn finish(self) -> Result<ShapeTree> {
        if let Some(open) = self.stack.last() {
            return Err(Error::SlideParseError(format!(
                "document ended inside <{}>",
                String::from_utf8_lossy(open)
            )));
        }
        Ok(ShapeTree {
            shapes: self.shapes,
        })
    }

    fn parent(&self) -> Option<&[u8]> {
        self.stack.last().map(Vec::as_slice)
    }

    fn within(&self, name: &[u8]) -> bool {
        self.stack.iter().any(|open| open == name)
    }

    fn in_run_text(&self) -> bool {
        self.run.is_some() && self.parent() == Some(b"t".as_slice())
    }

    fn text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }

    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let local = e.local_name();
        match local.as_ref() {
            b"sp" if self.within(b"spTree") => {
                self.shape = Some(Shape::default());
            }
            b"cNvPr" => {
                if let Some(shape) = self.shape.as_mut() {
                    if shape.name.is_none() {
                        shape.name = attr_value(e, b"name")?;
                    }
                }
            }
            b"ph" => {
                if let Some(shape) = self.shape.as_mut() {
                    let kind = attr_value(e, b"type")?;
                    shape.placeholder = Some(PlaceholderKind::from_attr(kind.as_deref()));
                }
            }
            b"txBody" => {
                if let Some(shape) = self.shape.as_mut() {
                    shape.body = Some(TextBody::default());
                }
            }
            b"p" if self.parent() == Some(b"txBody".as_slice()) => {
                if self.shape.as_ref().is_some_and(|s| s.body.is_some()) {
                    self.paragraph = Some(RawParagraph::default());
                }
            }
            b"pPr" if self.parent() == Some(b"p".as_slice()) => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    if let Some(lvl) = attr_value(e, b"lvl")? {
                        paragraph.level = lvl.trim().parse().ok();
                    }
                }
            }
            b"buNone" if self.parent() == Some(b"pPr".as_slice()) => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.no_bullet = true;
                }
            }
            b"r" | b"fld" if self.parent() == Some(b"p".as_slice()) => {
                if self.paragraph.is_some() {
                    self.run = Some(Run::new(String::new()));
                }
            }
            b"rPr" => {
                if let Some(run) = self.run.as_mut() {
                    if let Some(b) = attr_value(e, b"b")? {
                        run.is_bold = matches!(b.as_str(), "1" | "true");
                    }
                }
            }
            b"br" if self.parent() == Some(b"p".as_slice()) => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.runs.push(Run::line_break());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"r" | b"fld" => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    if !run.text.is_empty() {
                        paragraph.runs.push(run);
                    }
                }
            }
            b"p" if self.parent() == Some(b"txBody".as_slice()) => {
                if let Some(paragraph) = self.paragraph.take() {
                    if let Some(body) = self.shape.as_mut().and_then(|s| s.body.as_mut()) {
                        body.paragraphs.push(paragraph);
                    }
                }
            }
            b"sp" => {
                if let Some(shape) = self.shape.take() {
                    self.shapes.push(shape);
                }
            }
            _ => {}
        }
    }
}

/// Read and unescape one attribute of an element.
fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::SlideParseError(format!("bad attribute: {}", e)))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::SlideParseError(format!("bad attribute value: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
