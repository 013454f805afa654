use serde_json::Value;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::template;
use crate::errors::AppError;

/// Word's in-paragraph line break, closing and reopening the current text run.
const LINE_BREAK: &str = "</w:t><w:br/><w:t xml:space=\"preserve\">";

/// Parts of the package that may carry placeholders.
fn is_renderable(name: &str) -> bool {
    name == "word/document.xml"
        || (name.starts_with("word/header") && name.ends_with(".xml"))
        || (name.starts_with("word/footer") && name.ends_with(".xml"))
}

/// Render a `.docx` template held in memory. Every part is copied across; the
/// document body, headers and footers get their placeholders substituted.
pub fn fill_bytes(template_bytes: &[u8], context: &Value) -> Result<Vec<u8>, AppError> {
    let mut archive = ZipArchive::new(Cursor::new(template_bytes))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut rendered_body = false;

    for i in 0..archive.len() {
        let mut part = archive.by_index(i)?;
        let name = part.name().to_string();
        if part.is_dir() {
            writer.add_directory(name, options)?;
            continue;
        }

        let mut content = Vec::with_capacity(part.size() as usize);
        part.read_to_end(&mut content)?;

        if is_renderable(&name) {
            let xml = String::from_utf8(content)
                .map_err(|_| AppError::Export(format!("Template part {name} is not valid UTF-8")))?;
            let xml = template::merge_split_placeholders(&xml);
            content = template::render(&xml, context, LINE_BREAK)?.into_bytes();
            rendered_body |= name == "word/document.xml";
        }

        writer.start_file(name, options)?;
        writer.write_all(&content)?;
    }

    if !rendered_body {
        return Err(AppError::Export("Template has no word/document.xml".to_string()));
    }
    Ok(writer.finish()?.into_inner())
}

/// Load the template file from disk and render it.
pub fn fill_template(path: &Path, context: &Value) -> Result<Vec<u8>, AppError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            AppError::Export(format!("Template file not found: {}", path.display()))
        }
        _ => AppError::Io(e),
    })?;
    fill_bytes(&bytes, context)
}
