//! PowerPoint (PPTX) text extraction.
//!
//! A PPTX file is a zip of XML parts. Slides are visited in presentation
//! order (`ppt/presentation.xml` resolved through its relationships part),
//! falling back to the `slideN.xml` numbering when that metadata is absent.
//! Within a slide every `<p:sp>` shape yields one fragment: its paragraphs
//! joined with newlines, trimmed, skipped when empty. Pictures, tables and
//! other non-shape frames carry no text of their own and are ignored.

use super::{push_fragment, ExtractError, Extractor, Result};
use crate::types::ExtractMode;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Maximum decompressed bytes to read from a single zip entry (zip-bomb protection)
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Extract shape text from every slide of a PPTX file.
///
/// Fragments are always trimmed and empty shapes dropped, whatever the mode.
pub fn extract_shapes(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| ExtractError::Pptx(e.to_string()))?;

    let slides = slide_parts(&mut archive)?;
    let mut fragments = Vec::new();
    for name in &slides {
        let xml = read_entry(&mut archive, name)?;
        for shape in shape_texts(&xml)? {
            push_fragment(&mut fragments, &shape, ExtractMode::Prompt);
        }
    }

    tracing::debug!(slides = slides.len(), shapes = fragments.len(), "read slide deck");
    Ok(fragments)
}

/// Slide part names in the order they are presented
fn slide_parts<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    if let Some(ordered) = presentation_order(archive)? {
        return Ok(ordered);
    }

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| is_slide_part(n))
        .map(|n| n.to_string())
        .collect();
    names.sort_by_key(|n| slide_number(n));
    Ok(names)
}

fn is_slide_part(name: &str) -> bool {
    name.starts_with(SLIDE_PREFIX) && name.ends_with(".xml")
}

fn slide_number(name: &str) -> u32 {
    name.trim_start_matches(SLIDE_PREFIX)
        .trim_end_matches(".xml")
        .parse::<u32>()
        .unwrap_or(u32::MAX)
}

/// Slide order from `sldIdLst`, or None when the deck lacks that metadata
fn presentation_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<Vec<String>>> {
    let names: HashSet<String> = archive.file_names().map(|n| n.to_string()).collect();
    if !names.contains(PRESENTATION_PART) || !names.contains(PRESENTATION_RELS) {
        return Ok(None);
    }

    let rels = read_entry(archive, PRESENTATION_RELS)?;
    let targets = slide_relationships(&rels)?;
    let presentation = read_entry(archive, PRESENTATION_PART)?;
    let ids = slide_ids(&presentation)?;

    let ordered = ids
        .iter()
        .filter_map(|id| targets.get(id))
        .filter(|part| names.contains(part.as_str()))
        .cloned()
        .collect();
    Ok(Some(ordered))
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ExtractError::Pptx(format!("{}: {}", name, e)))?;
    let mut out = Vec::new();
    entry.take(MAX_XML_ENTRY_BYTES).read_to_end(&mut out)?;
    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ExtractError::Pptx(format!(
            "zip entry {} exceeds size limit ({} bytes)",
            name, MAX_XML_ENTRY_BYTES
        )));
    }
    Ok(out)
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Relationship id -> slide part name
fn slide_relationships(xml: &[u8]) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"Relationship" => {
                let is_slide = attr(&e, b"Type").is_some_and(|t| t.ends_with("/slide"));
                if let (true, Some(id), Some(target)) = (is_slide, attr(&e, b"Id"), attr(&e, b"Target")) {
                    targets.insert(id, resolve_target(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Pptx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

/// Relationship targets are relative to `ppt/` unless absolute
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

/// `r:id` values of `<p:sldId>` entries, in document order
fn slide_ids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sldId" => {
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.local_name().as_ref() == b"id" && a.key.prefix().is_some())
                    .map(|a| String::from_utf8_lossy(&a.value).into_owned());
                if let Some(id) = rel_id {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Pptx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

#[derive(Default)]
struct ShapeText {
    text: String,
    paragraphs: usize,
}

impl ShapeText {
    fn start_paragraph(&mut self) {
        if self.paragraphs > 0 {
            self.text.push('\n');
        }
        self.paragraphs += 1;
    }
}

/// Raw text of each `<p:sp>` shape in one slide part, in stored order
fn shape_texts(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut shapes = Vec::new();
    let mut current: Option<ShapeText> = None;
    let mut in_run_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => current = Some(ShapeText::default()),
                b"p" => {
                    if let Some(shape) = current.as_mut() {
                        shape.start_paragraph();
                    }
                }
                b"br" => {
                    if let Some(shape) = current.as_mut() {
                        shape.text.push('\n');
                    }
                }
                b"t" => in_run_text = current.is_some(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(shape) = current.as_mut() {
                        shape.start_paragraph();
                    }
                }
                b"br" => {
                    if let Some(shape) = current.as_mut() {
                        shape.text.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(te)) if in_run_text => {
                let text = te.unescape().map_err(|e| ExtractError::Pptx(e.to_string()))?;
                if let Some(shape) = current.as_mut() {
                    shape.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"sp" => {
                    if let Some(shape) = current.take() {
                        shapes.push(shape.text);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Pptx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(shapes)
}

/// PowerPoint extractor
pub struct PptxExtractor;

impl PptxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PptxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PptxExtractor {
    fn fragments(&self, path: &Path, _mode: ExtractMode) -> Result<Vec<String>> {
        extract_shapes(path)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pptx"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use zip::write::SimpleFileOptions;

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn shape(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            "<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Text\"/></p:nvSpPr><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>",
            body
        )
    }

    fn slide(shapes: &[String]) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><p:sld {}><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>",
            NS,
            shapes.concat()
        )
    }

    fn presentation(rel_ids: &[&str]) -> String {
        let ids: String = rel_ids
            .iter()
            .enumerate()
            .map(|(i, r)| format!("<p:sldId id=\"{}\" r:id=\"{}\"/>", 256 + i, r))
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><p:presentation {}><p:sldIdLst>{}</p:sldIdLst></p:presentation>",
            NS, ids
        )
    }

    fn relationships(targets: &[(&str, &str)]) -> String {
        let rels: String = targets
            .iter()
            .map(|(id, target)| {
                format!(
                    "<Relationship Id=\"{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"{}\"/>",
                    id, target
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"><Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>{}</Relationships>",
            rels
        )
    }

    fn write_deck(dir: &Path, parts: &[(&str, String)]) -> PathBuf {
        let path = dir.join("deck.pptx");
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, body) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_follows_presentation_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(
            dir.path(),
            &[
                ("ppt/slides/slide1.xml", slide(&[shape(&["Second slide"])])),
                ("ppt/slides/slide2.xml", slide(&[shape(&["First slide"])])),
                (PRESENTATION_PART, presentation(&["rId3", "rId2"])),
                (
                    PRESENTATION_RELS,
                    relationships(&[("rId2", "slides/slide1.xml"), ("rId3", "slides/slide2.xml")]),
                ),
            ],
        );

        let fragments = extract_shapes(&path).unwrap();
        assert_eq!(fragments, vec!["First slide", "Second slide"]);
    }

    #[test]
    fn test_falls_back_to_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(
            dir.path(),
            &[
                ("ppt/slides/slide10.xml", slide(&[shape(&["ten"])])),
                ("ppt/slides/slide2.xml", slide(&[shape(&["two"])])),
                ("ppt/slides/slide1.xml", slide(&[shape(&["one"])])),
            ],
        );

        let fragments = extract_shapes(&path).unwrap();
        assert_eq!(fragments, vec!["one", "two", "ten"]);
    }

    #[test]
    fn test_shape_paragraphs_trimmed_and_empty_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(
            dir.path(),
            &[(
                "ppt/slides/slide1.xml",
                slide(&[
                    shape(&["  Photosynthesis  "]),
                    shape(&["   "]),
                    shape(&["Light reactions", "Calvin cycle"]),
                ]),
            )],
        );

        let fragments = extract_shapes(&path).unwrap();
        assert_eq!(fragments, vec!["Photosynthesis", "Light reactions\nCalvin cycle"]);
    }

    #[test]
    fn test_runs_and_entities() {
        let xml = format!(
            "<p:sld {}><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>Q&amp;A </a:t></a:r><a:r><a:t>session</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>",
            NS
        );
        let shapes = shape_texts(xml.as_bytes()).unwrap();
        assert_eq!(shapes, vec!["Q&A session"]);
    }

    #[test]
    fn test_non_shape_frames_ignored() {
        let xml = format!(
            "<p:sld {}><p:cSld><p:spTree><p:pic><p:nvPicPr><p:cNvPr id=\"4\" name=\"Picture\"/></p:nvPicPr></p:pic><p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tr><a:tc><a:txBody><a:p><a:r><a:t>cell</a:t></a:r></a:p></a:txBody></a:tc></a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>{}</p:spTree></p:cSld></p:sld>",
            NS,
            shape(&["Title"])
        );
        let shapes = shape_texts(xml.as_bytes()).unwrap();
        assert_eq!(shapes, vec!["Title"]);
    }

    #[test]
    fn test_empty_deck_yields_no_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(
            dir.path(),
            &[
                (PRESENTATION_PART, presentation(&[])),
                (PRESENTATION_RELS, relationships(&[])),
            ],
        );

        assert!(extract_shapes(&path).unwrap().is_empty());
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        assert!(matches!(extract_shapes(&path), Err(ExtractError::Pptx(_))));
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("slides/slide3.xml"), "ppt/slides/slide3.xml");
        assert_eq!(resolve_target("/ppt/slides/slide3.xml"), "ppt/slides/slide3.xml");
    }
}
