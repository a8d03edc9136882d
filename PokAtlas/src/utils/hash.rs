//! Content digests for sprite files

use std::fmt::Write;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// MD5 of a file as lowercase hex (streaming for large atlases).
pub fn file_digest<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = md5::Context::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.consume(&buffer[..bytes_read]);
    }

    Ok(to_hex(&hasher.compute().0))
}

fn to_hex(digest: &[u8; 16]) -> String {
    // MD5 = 16 bytes = 32 hex chars
    let mut hex = String::with_capacity(32);
    for b in digest {
        let _ = write!(hex, "{b:02x}");
    }
    hex
}
