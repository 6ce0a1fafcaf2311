//! Native library loading and export resolution.

use crate::HostError;
use libloading::Library;
use log::{debug, error};
use std::path::Path;

/// Load a native library, logging and typing the failure.
pub(crate) fn load_library(path: &Path) -> Result<Library, HostError> {
    match unsafe { Library::new(path) } {
        Ok(lib) => {
            debug!("Loaded library {:?}", path);
            Ok(lib)
        }
        Err(e) => {
            error!("Failed to load library {:?}: {}", path, e);
            Err(HostError::LoadFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

/// Quiet load attempt for candidate probing; a miss is expected.
pub(crate) fn probe(path: &Path) -> Option<Library> {
    match unsafe { Library::new(path) } {
        Ok(lib) => {
            debug!("Loaded library {:?}", path);
            Some(lib)
        }
        Err(e) => {
            debug!("Library probe missed {:?}: {}", path, e);
            None
        }
    }
}

/// Copy a named export out of `lib` as a bare value.
///
/// `symbol` must be nul-terminated; `library_name` is only used for
/// reporting.
///
/// # Safety
/// `T` must be the actual type of the export.
pub(crate) unsafe fn resolve<T: Copy>(
    lib: &Library,
    library_name: &str,
    symbol: &[u8],
) -> Result<T, HostError> {
    match lib.get::<T>(symbol) {
        Ok(found) => Ok(*found),
        Err(e) => {
            let name = String::from_utf8_lossy(symbol.strip_suffix(b"\0").unwrap_or(symbol));
            error!("Export '{}' not found in {}: {}", name, library_name, e);
            Err(HostError::MissingExport {
                library: library_name.to_string(),
                symbol: name.into_owned(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_library_is_a_typed_failure() {
        let path = PathBuf::from("/nonexistent/libdoesnotexist.so.0");
        let err = load_library(&path).unwrap_err();
        match err {
            HostError::LoadFailure { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_probe_miss_is_quiet() {
        assert!(probe(Path::new("/nonexistent/libdoesnotexist.so.0")).is_none());
    }
}
