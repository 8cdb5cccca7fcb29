//! In-memory package builders for unit tests.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

pub const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const LAYOUT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const HYPERLINK_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Zip up the given entries.
pub fn build_package(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Zip up text entries, then make the central directory declare a zip64
/// uncompressed size of `declared` for the entry `name`.
pub fn package_with_declared_size(entries: &[(&str, &str)], name: &str, declared: u64) -> Vec<u8> {
    // Placeholder extra field, rewritten to a zip64 field below.
    const PLACEHOLDER_ID: u16 = 0xCAFE;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (entry, content) in entries {
        if *entry == name {
            writer
                .start_file_with_extra_data(*entry, FileOptions::default())
                .unwrap();
            writer.write_all(&PLACEHOLDER_ID.to_le_bytes()).unwrap();
            writer.write_all(&8u16.to_le_bytes()).unwrap();
            writer.write_all(&[0; 8]).unwrap();
            writer.end_extra_data().unwrap();
        } else {
            writer.start_file(*entry, FileOptions::default()).unwrap();
        }
        writer.write_all(content.as_bytes()).unwrap();
    }
    let mut bytes = writer.finish().unwrap().into_inner();

    // Central directory header: uncompressed size at +24, name length at +28,
    // name at +46, extra field right after the name.
    let mut pos = 0;
    while pos + 46 <= bytes.len() {
        if bytes[pos..pos + 4] == [0x50, 0x4b, 0x01, 0x02] {
            let name_len = u16::from_le_bytes([bytes[pos + 28], bytes[pos + 29]]) as usize;
            let name_start = pos + 46;
            if &bytes[name_start..name_start + name_len] == name.as_bytes() {
                bytes[pos + 24..pos + 28].copy_from_slice(&u32::MAX.to_le_bytes());
                let extra = name_start + name_len;
                bytes[extra..extra + 2].copy_from_slice(&1u16.to_le_bytes());
                bytes[extra + 4..extra + 12].copy_from_slice(&declared.to_le_bytes());
                return bytes;
            }
        }
        pos += 1;
    }
    panic!("no central directory entry for {}", name);
}

/// Zip up text entries.
pub fn text_package(entries: &[(&str, &str)]) -> Vec<u8> {
    let entries: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, content)| (*name, content.as_bytes()))
        .collect();
    build_package(&entries)
}

/// Wrap shape XML in a slide document.
pub fn slide_xml(shapes: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
            r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
            r#"<p:cSld><p:spTree>"#,
            r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            r#"<p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#
        ),
        shapes
    )
}

/// A text shape. `ph` is the placeholder type attribute, if any;
/// `paragraphs` is raw `<a:p>` XML.
pub fn shape_xml(ph: Option<&str>, paragraphs: &str) -> String {
    let nv_pr = match ph {
        Some(kind) => format!(r#"<p:nvPr><p:ph type="{}"/></p:nvPr>"#, kind),
        None => "<p:nvPr/>".to_string(),
    };
    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Shape"/><p:cNvSpPr/>{}</p:nvSpPr>"#,
            r#"<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#
        ),
        nv_pr, paragraphs
    )
}

/// A paragraph with one plain run.
pub fn para_xml(text: &str) -> String {
    format!(r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p>"#, text)
}

/// A paragraph with one plain run and bullets suppressed.
pub fn plain_para_xml(text: &str) -> String {
    format!(
        r#"<a:p><a:pPr marL="0" indent="0"><a:buNone/></a:pPr><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p>"#,
        text
    )
}

/// A relationship part from `(id, type, target)` triples.
pub fn rels_xml(rels: &[(&str, &str, &str)]) -> String {
    let body: String = rels
        .iter()
        .map(|(id, rel_type, target)| {
            format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id, rel_type, target
            )
        })
        .collect();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#
        ),
        body
    )
}
