//! Stream copy join through the concat demuxer

use std::ffi::OsString;
use std::path::Path;

use crate::domain::errors::DomainError;
use crate::engine::{path_bytes, EngineConfig};

/// Contents of a concat demuxer list, one `file '...'` line per input.
///
/// Relative paths are resolved against `base_dir` since the demuxer resolves
/// them against the list file's own directory. Path bytes are written as-is.
pub fn concat_list(paths: &[&Path], base_dir: &Path) -> Result<Vec<u8>, DomainError> {
    let mut list = Vec::new();
    for path in paths {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        };
        let bytes = path_bytes(&absolute).ok_or_else(|| {
            DomainError::BadArgs(format!(
                "{} cannot be written to a concat list",
                absolute.display()
            ))
        })?;

        list.extend_from_slice(b"file '");
        for byte in bytes {
            if byte == b'\'' {
                list.extend_from_slice(br"'\''");
            } else {
                list.push(byte);
            }
        }
        list.extend_from_slice(b"'\n");
    }
    Ok(list)
}

/// Arguments joining the files listed in `list_path` without re-encoding
pub fn build_args(config: &EngineConfig, list_path: &Path, output: &Path) -> Vec<OsString> {
    let mut args = config.base_args();
    args.args(["-f", "concat", "-safe", "0", "-i"])
        .arg(list_path)
        .args(["-c", "copy"])
        .arg(output);
    args.into_vec()
}
