//! Streamed SHA-256 digests for canonical payload files.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Hash a file's raw bytes, returning `sha256:<lowercase hex>`.
///
/// Reads in fixed-size chunks so arbitrarily large payloads never have to be
/// resident in memory alongside their parsed form.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut buf)
            .with_context(|| format!("reading {}", path.display()))?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn streamed_digest_matches_one_shot() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        // Larger than one chunk so the loop takes more than one pass.
        let payload = vec![0xabu8; CHUNK_SIZE * 2 + 17];
        file.write_all(&payload)?;
        file.flush()?;

        let expected = format!("sha256:{}", hex::encode(Sha256::digest(&payload)));
        assert_eq!(sha256_file(file.path())?, expected);
        Ok(())
    }

    #[test]
    fn digest_has_prefix_and_lowercase_hex() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"{\"x\": 1}")?;
        file.flush()?;

        let digest = sha256_file(file.path())?;
        let hex_part = digest.strip_prefix("sha256:").expect("sha256: prefix");
        assert_eq!(hex_part.len(), 64);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(sha256_file(Path::new("/nonexistent/payload.json")).is_err());
    }
}
