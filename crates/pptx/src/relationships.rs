//! Parsing relationship parts and resolving image targets.

use quick_xml::events::Event;
use quick_xml::Reader;
use slides_core::{Error, Relationship, Result};

/// Suffix shared by the transitional and strict image relationship types.
const IMAGE_RELATIONSHIP_SUFFIX: &str = "/relationships/image";

/// The standard (transitional) OOXML image relationship type.
pub const IMAGE_RELATIONSHIP_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Whether a relationship type URI denotes an image.
pub fn is_image_relationship(rel_type: &str) -> bool {
    rel_type.ends_with(IMAGE_RELATIONSHIP_SUFFIX)
}

/// Ordered mapping from relationship id to resolved package path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipMap {
    entries: Vec<Relationship>,
}

impl RelationshipMap {
    /// Resolved target for a relationship id.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.target.as_str())
    }

    /// Resolved targets in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.target.as_str())
    }

    /// Relationships in declaration order, targets resolved.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse every package-internal relationship declared in a rels part.
///
/// Relationships with `TargetMode="External"` point outside the package
/// and are left out.
pub fn parse_relationships(xml_content: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut relationships = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();
                let mut external = false;

                for attr in e.attributes() {
                    let attr = attr.map_err(|e| {
                        Error::XmlError(format!("Bad relationship attribute: {}", e))
                    })?;
                    let value = attr
                        .unescape_value()
                        .map_err(|e| Error::XmlError(format!("Bad attribute value: {}", e)))?;

                    match attr.key.as_ref() {
                        b"Type" => rel_type = value.into_owned(),
                        b"Target" => target = value.into_owned(),
                        b"Id" => id = value.into_owned(),
                        b"TargetMode" => external = value.eq_ignore_ascii_case("external"),
                        _ => {}
                    }
                }

                if external {
                    log::debug!("Skipping external relationship {} -> {}", id, target);
                    continue;
                }
                if id.is_empty() || target.is_empty() {
                    log::debug!("Skipping relationship without id or target");
                    continue;
                }

                relationships.push(Relationship {
                    id,
                    rel_type,
                    target,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Parse a rels part and keep only image relationships, with targets
/// resolved against `source_dir` (the directory of the owning part).
pub fn resolve_image_targets(xml_content: &str, source_dir: &str) -> Result<RelationshipMap> {
    let entries = parse_relationships(xml_content)?
        .into_iter()
        .filter(|rel| is_image_relationship(&rel.rel_type))
        .map(|rel| Relationship {
            target: resolve_target(source_dir, &rel.target),
            ..rel
        })
        .collect();

    Ok(RelationshipMap { entries })
}

/// Resolve a relationship target to a package path.
///
/// Absolute targets (`/ppt/media/a.png`) are taken from the package root;
/// relative ones are applied to `source_dir`, with `..` stepping up one
/// directory. `../media/image1.png` from `ppt/slides` gives
/// `ppt/media/image1.png`.
pub fn resolve_target(source_dir: &str, target: &str) -> String {
    let (mut segments, relative) = match target.strip_prefix('/') {
        Some(absolute) => (Vec::new(), absolute),
        None => (
            source_dir
                .split('/')
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            target,
        ),
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}
