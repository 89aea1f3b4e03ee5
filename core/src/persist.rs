//! Single-file model artifact.
//!
//! Layout: the 8-byte magic `PRICEMDL`, a bincode [`ArtifactHeader`], then the
//! bincode [`Pipeline`]. The header is decoded first so an incompatible format
//! version is reported as such instead of as a garbled payload.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::pipeline::Pipeline;

pub const MAGIC: &[u8; 8] = b"PRICEMDL";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub format_version: u32,
    pub vocab_size: u64,
    pub n_features: u64,
    pub alpha: f64,
    pub created_at: String,
}

impl ArtifactHeader {
    pub fn for_pipeline(pipeline: &Pipeline, created_at: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            vocab_size: pipeline.vectorizer.vocab_size() as u64,
            n_features: pipeline.regressor.dim() as u64,
            alpha: pipeline.regressor.alpha,
            created_at: created_at.into(),
        }
    }
}

/// Write the artifact via a sibling temp file and rename, so readers never see a partial file.
pub fn save_pipeline(path: &Path, pipeline: &Pipeline, header: &ArtifactHeader) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = tmp_path(path);
    let written = (|| -> Result<()> {
        let mut f = BufWriter::new(File::create(&tmp)?);
        f.write_all(MAGIC)?;
        bincode::serialize_into(&mut f, header)?;
        bincode::serialize_into(&mut f, pipeline)?;
        f.flush()?;
        Ok(())
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;
    tracing::info!(path = %path.display(), vocab_size = header.vocab_size, "artifact written");
    Ok(())
}

/// Read only the header, e.g. for inspection.
pub fn load_header(path: &Path) -> Result<ArtifactHeader> {
    let buf = read_artifact(path)?;
    let mut body = check_magic(path, &buf)?;
    decode_header(path, &mut body)
}

pub fn load_pipeline(path: &Path) -> Result<(ArtifactHeader, Pipeline)> {
    let buf = read_artifact(path)?;
    let mut body = check_magic(path, &buf)?;
    let header = decode_header(path, &mut body)?;
    let pipeline: Pipeline = bincode::deserialize_from(&mut body)
        .map_err(|e| PriceError::corrupt(path, format!("pipeline payload: {e}")))?;

    if pipeline.vectorizer.vocab_size() as u64 != header.vocab_size
        || pipeline.regressor.dim() as u64 != header.n_features
        || pipeline.vectorizer.idf.len() != pipeline.vectorizer.vocab_size()
        || pipeline.regressor.dim() != pipeline.vectorizer.vocab_size()
    {
        return Err(PriceError::corrupt(path, "header dimensions do not match the pipeline"));
    }
    let mut seen = vec![false; pipeline.vectorizer.idf.len()];
    for (term, &tid) in &pipeline.vectorizer.dictionary {
        match seen.get_mut(tid as usize) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => return Err(PriceError::corrupt(path, format!("term id {tid} is used twice (at {term:?})"))),
            None => return Err(PriceError::corrupt(path, format!("term {term:?} has out-of-range id {tid}"))),
        }
    }
    Ok((header, pipeline))
}

fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(PriceError::ArtifactNotFound { path: path.to_path_buf() });
    }
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

fn check_magic<'a>(path: &Path, buf: &'a [u8]) -> Result<&'a [u8]> {
    match buf.strip_prefix(MAGIC.as_slice()) {
        Some(rest) => Ok(rest),
        None => Err(PriceError::corrupt(path, "not a price model artifact (bad magic)")),
    }
}

fn decode_header(path: &Path, body: &mut &[u8]) -> Result<ArtifactHeader> {
    let header: ArtifactHeader = bincode::deserialize_from(&mut *body)
        .map_err(|e| PriceError::corrupt(path, format!("header: {e}")))?;
    if header.format_version != FORMAT_VERSION {
        return Err(PriceError::UnsupportedArtifactVersion {
            path: path.to_path_buf(),
            found: header.format_version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(header)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use tempfile::tempdir;

    fn tiny() -> Pipeline {
        Pipeline::fit(&["red hat", "blue hat", "red scarf"], &[1.0, 2.0, 3.0], &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn round_trip_preserves_predictions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models/model.bin");
        let p = tiny();
        save_pipeline(&path, &p, &ArtifactHeader::for_pipeline(&p, "now")).unwrap();
        assert!(!tmp_path(&path).exists());

        let (header, loaded) = load_pipeline(&path).unwrap();
        assert_eq!(header.format_version, FORMAT_VERSION);
        assert_eq!(header.vocab_size, p.vectorizer.vocab_size() as u64);
        for text in ["red hat", "green scarf", "nothing known"] {
            assert!((loaded.predict(text) - p.predict(text)).abs() < 1e-9);
        }
        assert_eq!(load_header(&path).unwrap(), header);
    }

    #[test]
    fn missing_file_is_artifact_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        match load_pipeline(&path) {
            Err(PriceError::ArtifactNotFound { path: p }) => assert_eq!(p, path),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bad_magic_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.bin");
        fs::write(&path, b"not a model at all").unwrap();
        assert!(matches!(load_pipeline(&path), Err(PriceError::ArtifactCorrupt { .. })));
    }

    #[test]
    fn newer_version_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.bin");
        let p = tiny();
        let mut header = ArtifactHeader::for_pipeline(&p, "now");
        header.format_version = FORMAT_VERSION + 1;
        save_pipeline(&path, &p, &header).unwrap();
        match load_pipeline(&path) {
            Err(PriceError::UnsupportedArtifactVersion { found, expected, .. }) => {
                assert_eq!(found, FORMAT_VERSION + 1);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_term_id_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad_ids.bin");
        let mut p = Pipeline::fit(&["red hat", "blue hat"], &[1.0, 2.0], &PipelineConfig::default()).unwrap();
        p.vectorizer.dictionary.insert("red".into(), 9999);
        save_pipeline(&path, &p, &ArtifactHeader::for_pipeline(&p, "now")).unwrap();
        match load_pipeline(&path) {
            Err(PriceError::ArtifactCorrupt { reason, .. }) => assert!(reason.contains("9999")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicate_term_id_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup_ids.bin");
        let mut p = Pipeline::fit(&["red hat", "blue hat"], &[1.0, 2.0], &PipelineConfig::default()).unwrap();
        let hat = p.vectorizer.term_id("hat").unwrap();
        p.vectorizer.dictionary.insert("red".into(), hat);
        save_pipeline(&path, &p, &ArtifactHeader::for_pipeline(&p, "now")).unwrap();
        assert!(matches!(load_pipeline(&path), Err(PriceError::ArtifactCorrupt { .. })));
    }

    #[test]
    fn truncated_payload_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cut.bin");
        let p = tiny();
        save_pipeline(&path, &p, &ArtifactHeader::for_pipeline(&p, "now")).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 16]).unwrap();
        assert!(matches!(load_pipeline(&path), Err(PriceError::ArtifactCorrupt { .. })));
    }
}
