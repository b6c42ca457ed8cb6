use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::errors::{RegionSetError, Result};

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)
        .map_err(|e| RegionSetError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Get a writer that gzip-compresses when the path ends in `.gz`.
///
/// Parent directories are created as needed. The returned writer must be
/// flushed (or dropped) to finish the gzip stream.
///
pub fn get_dynamic_writer(path: &Path) -> Result<BufWriter<Box<dyn Write + Send>>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let file: Box<dyn Write + Send> = match is_gzipped(path) {
        true => Box::new(GzEncoder::new(file, Compression::default())),
        false => Box::new(file),
    };

    Ok(BufWriter::new(file))
}

///
/// File name of `path` with every extension removed,
/// e.g. `data/S1.permeth.bed.gz` -> `S1`.
///
pub fn remove_all_extensions(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("data/S1.permeth.bed.gz", "S1")]
    #[case("S2.bed", "S2")]
    #[case("plain", "plain")]
    #[case(".hidden", ".hidden")]
    fn test_remove_all_extensions(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(remove_all_extensions(Path::new(path)), expected);
    }

    #[rstest]
    fn test_gz_round_trip_through_dynamic_io() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("nested/out.tsv.gz");

        let mut writer = get_dynamic_writer(&path).unwrap();
        writeln!(writer, "chr1\t1\t2").unwrap();
        drop(writer);

        let lines: Vec<String> = get_dynamic_reader(&path)
            .unwrap()
            .lines()
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["chr1\t1\t2".to_string()]);
    }

    #[rstest]
    fn test_reader_on_missing_file() {
        let result = get_dynamic_reader(Path::new("/definitely/not/here.bed"));
        assert!(matches!(result, Err(RegionSetError::FileReadError(_))));
    }
}
