use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Download name for the individual export archive
pub const ARCHIVE_FILE_NAME: &str = "sentences_voice.zip";

/// Bundle named files into an in-memory zip archive (DEFLATE)
pub fn build_archive<'a, I>(entries: I) -> zip::result::ZipResult<Vec<u8>>
where
    I: IntoIterator<Item = (String, &'a [u8])>,
{
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in entries {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
