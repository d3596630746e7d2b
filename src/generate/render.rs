//! Document rendering: substitute `{{ placeholder }}` markers in a .docx
//! template with values from one data row.
//!
//! A .docx file is a ZIP container of XML parts. Substitution is applied to
//! the main document body plus any headers and footers; every other entry is
//! copied through untouched. Word processors routinely split a placeholder
//! across several text runs, so the matcher tolerates XML tags between the
//! braces and strips them before resolving the key.

use std::io::{Cursor, Read, Write};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::models::DataRow;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{\{(?:[^{}<>]|<[^>]*>)*?\}\}").unwrap();
    static ref XML_TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template is not a valid .docx container: {0}")]
    Container(#[from] zip::result::ZipError),
    #[error("template is missing word/document.xml")]
    MissingDocumentPart,
    #[error("unresolved placeholder {{{{{0}}}}}: no matching column in the data row")]
    UnresolvedPlaceholder(String),
    #[error("failed to rebuild document: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the template against one row. A template without placeholders
/// produces identical output for every row.
pub fn render_docx(template: &[u8], row: &DataRow) -> Result<Vec<u8>, RenderError> {
    let mut archive = ZipArchive::new(Cursor::new(template))?;
    if archive.index_for_name("word/document.xml").is_none() {
        return Err(RenderError::MissingDocumentPart);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;

        writer.start_file(name.as_str(), options)?;
        if is_merge_part(&name) {
            let xml = String::from_utf8_lossy(&bytes);
            let rendered = substitute_part(&xml, row)?;
            writer.write_all(rendered.as_bytes())?;
        } else {
            writer.write_all(&bytes)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

fn is_merge_part(name: &str) -> bool {
    name == "word/document.xml"
        || ((name.starts_with("word/header") || name.starts_with("word/footer"))
            && name.ends_with(".xml"))
}

fn substitute_part(xml: &str, row: &DataRow) -> Result<String, RenderError> {
    let mut out = String::with_capacity(xml.len());
    let mut last = 0;
    for found in PLACEHOLDER_RE.find_iter(xml) {
        out.push_str(&xml[last..found.start()]);
        let flattened = XML_TAG_RE.replace_all(found.as_str(), "");
        let key = flattened
            .trim_start_matches("{{")
            .trim_end_matches("}}")
            .trim();
        let value = row
            .get(key)
            .ok_or_else(|| RenderError::UnresolvedPlaceholder(key.to_string()))?;
        out.push_str(&escape_value(value));
        last = found.end();
    }
    out.push_str(&xml[last..]);
    Ok(out)
}

/// XML-escape a value and translate literal newlines into line breaks.
fn escape_value(value: &str) -> String {
    let escaped = value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", "\n");
    escaped.replace('\n', "</w:t><w:br/><w:t xml:space=\"preserve\">")
}
