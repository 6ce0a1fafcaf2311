//! Platform string handling for the hosting ABI.

use crate::ffi::HostChar;
use crate::HostError;
use std::path::{Path, PathBuf};

/// Owned nul-terminated string in the hosting API's native encoding.
#[cfg(windows)]
#[derive(Debug)]
pub(crate) struct HostString(widestring::U16CString);

#[cfg(windows)]
impl HostString {
    pub(crate) fn from_str(s: &str) -> Result<Self, HostError> {
        widestring::U16CString::from_str(s)
            .map(Self)
            .map_err(|_| HostError::InteriorNul)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, HostError> {
        widestring::U16CString::from_os_str(path.as_os_str())
            .map(Self)
            .map_err(|_| HostError::InteriorNul)
    }

    pub(crate) fn as_ptr(&self) -> *const HostChar {
        self.0.as_ptr()
    }
}

/// Owned nul-terminated string in the hosting API's native encoding.
#[cfg(not(windows))]
#[derive(Debug)]
pub(crate) struct HostString(std::ffi::CString);

#[cfg(not(windows))]
impl HostString {
    pub(crate) fn from_str(s: &str) -> Result<Self, HostError> {
        std::ffi::CString::new(s)
            .map(Self)
            .map_err(|_| HostError::InteriorNul)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, HostError> {
        use std::os::unix::ffi::OsStrExt;
        std::ffi::CString::new(path.as_os_str().as_bytes())
            .map(Self)
            .map_err(|_| HostError::InteriorNul)
    }

    pub(crate) fn as_ptr(&self) -> *const HostChar {
        self.0.as_ptr()
    }
}

/// Read a nul-terminated path out of a `get_hostfxr_path` style buffer.
#[cfg(windows)]
pub(crate) fn path_from_buffer(buffer: &[HostChar]) -> PathBuf {
    use std::os::windows::ffi::OsStringExt;
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    PathBuf::from(std::ffi::OsString::from_wide(&buffer[..len]))
}

/// Read a nul-terminated path out of a `get_hostfxr_path` style buffer.
#[cfg(not(windows))]
pub(crate) fn path_from_buffer(buffer: &[HostChar]) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    let bytes = buffer[..len].iter().map(|&c| c as u8).collect::<Vec<u8>>();
    PathBuf::from(std::ffi::OsString::from_vec(bytes))
}
