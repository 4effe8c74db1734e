//! DOCX text extraction.
//!
//! A DOCX file is a ZIP archive whose body lives in `word/document.xml`.
//! We read paragraphs (`w:p`) in document order and keep run text, tabs
//! and line breaks, dropping all formatting.

use super::ExtractError;
use roxmltree::{Document, Node};
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_XML: &str = "word/document.xml";

pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(format!("not a valid ZIP archive: {}", e)))?;

    let mut document_xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|_| ExtractError::Docx(format!("missing {}", DOCUMENT_XML)))?
        .read_to_string(&mut document_xml)?;

    let doc = Document::parse(&document_xml)
        .map_err(|e| ExtractError::Docx(format!("invalid XML: {}", e)))?;

    let paragraphs: Vec<String> = doc
        .descendants()
        .filter(|node| is_element(node, "p"))
        .map(paragraph_text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n\n"))
}

fn is_element(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn paragraph_text(paragraph: Node) -> String {
    let mut text = String::new();

    for node in paragraph.descendants().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or("")),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }

    text
}
