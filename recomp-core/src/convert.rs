//! Single-file conversion: decode to memory, encode to a sibling temp file,
//! rename over the original.

use crate::codec::Codec;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub(crate) const TEMP_PREFIX: &str = ".recomp-";

/// One file paired with the codecs it is converted between.
pub struct ConversionJob<'a> {
    pub path: &'a Path,
    pub source: &'a dyn Codec,
    pub target: &'a dyn Codec,
}

#[derive(Clone, Debug)]
pub struct ConvertOutcome {
    pub path: PathBuf,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

impl ConversionJob<'_> {
    pub fn run(&self) -> Result<ConvertOutcome> {
        convert(self.path, self.source, self.target)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Re-encode `path` from `source` to `target`.
///
/// The original is only replaced once the new content is fully written and
/// synced; on any error it is left as it was and the temp file is removed.
///
/// The replacement is a new inode owned by the running user. Only the
/// permission bits are copied over; extended attributes are lost, and other
/// hard links keep pointing at the old content.
pub fn convert(path: &Path, source: &dyn Codec, target: &dyn Codec) -> Result<ConvertOutcome> {
    let meta = fs::metadata(path)?;

    let raw = {
        let mut reader = BufReader::new(File::open(path)?);
        source.decode(&mut reader)?
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent_dir(path))?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        target.encode(&raw, &mut w)?;
        w.flush()?;
    }
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), meta.permissions())?;
    let bytes_after = tmp.as_file().metadata()?.len();

    tmp.persist(path).map_err(|e| e.error)?;
    // Make the rename itself durable.
    #[cfg(unix)]
    File::open(parent_dir(path))?.sync_all()?;

    tracing::debug!(
        "{}: {} -> {} ({} -> {} bytes)",
        path.display(),
        source.format(),
        target.format(),
        meta.len(),
        bytes_after
    );

    Ok(ConvertOutcome {
        path: path.to_path_buf(),
        bytes_before: meta.len(),
        bytes_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecRegistry;
    use crate::error::RecompError;
    use crate::format::Format;

    fn leftovers(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
            .count()
    }

    #[test]
    fn identity_to_identity_keeps_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("r.0.0.mca");
        let data: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        fs::write(&p, &data).unwrap();

        let reg = CodecRegistry::new();
        let out = convert(&p, reg.get(Format::Identity), reg.get(Format::Identity)).unwrap();

        assert_eq!(fs::read(&p).unwrap(), data);
        assert_eq!(out.bytes_before, 5000);
        assert_eq!(out.bytes_after, 5000);
        assert_eq!(leftovers(tmp.path()), 0);
    }

    #[test]
    fn gzip_to_zstd_preserves_content() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("chunk");
        let reg = CodecRegistry::new();
        let payload = b"0123456789".repeat(100);

        let mut gz = Vec::new();
        reg.get(Format::GZip).encode(&payload, &mut gz).unwrap();
        fs::write(&p, &gz).unwrap();

        let job = ConversionJob {
            path: &p,
            source: reg.get(Format::GZip),
            target: reg.get(Format::ZStd),
        };
        job.run().unwrap();

        let on_disk = fs::read(&p).unwrap();
        let back = reg.get(Format::ZStd).decode(&mut &on_disk[..]).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn decode_failure_leaves_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("corrupt");
        fs::write(&p, b"this is not a zlib stream").unwrap();

        let reg = CodecRegistry::new();
        let err = convert(&p, reg.get(Format::ZLib), reg.get(Format::Brotli)).unwrap_err();

        assert!(matches!(err, RecompError::Decode { format: Format::ZLib, .. }));
        assert_eq!(fs::read(&p).unwrap(), b"this is not a zlib stream");
        assert_eq!(leftovers(tmp.path()), 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let reg = CodecRegistry::new();
        let err = convert(
            &tmp.path().join("gone"),
            reg.get(Format::Identity),
            reg.get(Format::GZip),
        )
        .unwrap_err();
        assert!(matches!(err, RecompError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn permissions_survive_replacement() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("perm");
        fs::write(&p, b"plain").unwrap();
        fs::set_permissions(&p, fs::Permissions::from_mode(0o640)).unwrap();

        let reg = CodecRegistry::new();
        convert(&p, reg.get(Format::Identity), reg.get(Format::GZip)).unwrap();

        let mode = fs::metadata(&p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn replacement_is_a_new_inode() {
        use std::os::unix::fs::MetadataExt;

        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("linked");
        let other = tmp.path().join("other-name");
        fs::write(&p, b"plain").unwrap();
        fs::hard_link(&p, &other).unwrap();
        let ino = fs::metadata(&p).unwrap().ino();

        let reg = CodecRegistry::new();
        convert(&p, reg.get(Format::Identity), reg.get(Format::ZLib)).unwrap();

        assert_ne!(fs::metadata(&p).unwrap().ino(), ino);
        assert_eq!(fs::read(&other).unwrap(), b"plain");
        let on_disk = fs::read(&p).unwrap();
        assert_eq!(reg.get(Format::ZLib).decode(&mut &on_disk[..]).unwrap(), b"plain");
    }

    #[test]
    fn relative_path_in_current_directory_has_a_parent() {
        assert_eq!(parent_dir(Path::new("r.0.0.mca")), Path::new("."));
        assert_eq!(parent_dir(Path::new("world/r.0.0.mca")), Path::new("world"));
    }
}
