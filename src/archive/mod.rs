use std::fs::File;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Compress a raw download into a sibling `.zip` and delete the
/// uncompressed original. The archive stores the bare filename, not the
/// directory path. Returns the archive path.
pub fn compress_and_remove(raw_path: &Path) -> Result<PathBuf> {
    let zip_path = raw_path.with_extension("zip");
    let archive_name = raw_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = File::create(&zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file(archive_name, options)?;
    let mut source = File::open(raw_path)?;
    std::io::copy(&mut source, &mut writer)?;
    writer.finish()?;

    std::fs::remove_file(raw_path)?;

    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    #[test]
    fn test_compress_and_remove() {
        let dir = TempDir::new().unwrap();
        let raw_path = dir.path().join("raw_1min_Kupang_clear.csv");
        std::fs::write(&raw_path, "time;GHI\n2024-01-01T00:00:00.0;1.0\n").unwrap();

        let zip_path = compress_and_remove(&raw_path).unwrap();

        assert!(!raw_path.exists());
        assert_eq!(zip_path, dir.path().join("raw_1min_Kupang_clear.zip"));

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut entry = archive.by_name("raw_1min_Kupang_clear.csv").unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        assert!(contents.contains("2024-01-01T00:00:00.0;1.0"));
    }
}
