//! Bundle the generated files into a single ZIP at maximal compression,
//! preserving insertion order. The archive is fully assembled in memory
//! before the response starts, so a failure here yields a clean server
//! error instead of a torn response stream.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::models::GeneratedFile;

pub fn build_archive(files: &[GeneratedFile]) -> Result<Vec<u8>, zip::result::ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    for file in files {
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(&file.bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}
