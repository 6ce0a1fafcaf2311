//! String-call dispatch into the managed runtime.

use crate::ffi::{ManagedEntryFn, UNMANAGED_CALLERS_ONLY_METHOD};
use crate::hosting::HostContext;
use crate::marshal::HostString;
use crate::HostError;
use api::{calls, MethodResult, MethodReturnValue};
use log::{debug, error};
use std::collections::HashMap;
use std::mem;
use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::ptr;

/// Dispatches encoded calls through the managed `RunMethod` entry point.
///
/// Resolved entry points are cached per `(assembly path, type name)`; the
/// managed side cannot observe the difference from re-resolving every call.
pub struct MethodDispatcher {
    context: HostContext,
    assembly_path: PathBuf,
    entry_points: HashMap<(String, String), ManagedEntryFn>,
}

impl MethodDispatcher {
    pub fn new(context: HostContext, assembly_path: PathBuf) -> Self {
        Self {
            context,
            assembly_path,
            entry_points: HashMap::new(),
        }
    }

    /// Run one encoded call and marshal the fixed-shape result back.
    ///
    /// A fault unwinding out of the managed side is caught here and reported
    /// as [`HostError::ManagedFault`]; nothing foreign crosses this frame.
    pub fn run(&mut self, call: &str) -> Result<MethodResult, HostError> {
        let type_name = calls::dispatcher_type_name(&assembly_stem(&self.assembly_path));
        let entry = self.resolve_entry(&type_name)?;

        let request = HostString::from_str(call)?;
        let mut raw = MethodReturnValue::default();
        let invoked = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
            entry(
                request.as_ptr() as *const c_void,
                &mut raw as *mut MethodReturnValue as *mut c_void,
            )
        }));
        if invoked.is_err() {
            error!("Managed call faulted: {}", call);
            return Err(HostError::ManagedFault);
        }

        // SAFETY: The managed side fills the slot according to the shared
        // layout; any string payload is copied out before the call returns.
        Ok(unsafe { MethodResult::from_raw(&raw) })
    }

    fn resolve_entry(&mut self, type_name: &str) -> Result<ManagedEntryFn, HostError> {
        let key = (
            self.assembly_path.to_string_lossy().into_owned(),
            type_name.to_string(),
        );
        if let Some(entry) = self.entry_points.get(&key) {
            return Ok(*entry);
        }

        let assembly = HostString::from_path(&self.assembly_path)?;
        let type_name_host = HostString::from_str(type_name)?;
        let method = HostString::from_str(calls::ENTRY_POINT)?;

        let mut entry: *mut c_void = ptr::null_mut();
        let rc = unsafe {
            (self.context.load_assembly)(
                assembly.as_ptr(),
                type_name_host.as_ptr(),
                method.as_ptr(),
                UNMANAGED_CALLERS_ONLY_METHOD,
                ptr::null_mut(),
                &mut entry,
            )
        };
        if rc != 0 || entry.is_null() {
            error!(
                "Failed to resolve managed entry point '{}' (status {:#010x})",
                type_name, rc as u32
            );
            return Err(HostError::EntryPointResolution {
                type_name: type_name.to_string(),
                status: rc as u32,
            });
        }

        let entry = unsafe { mem::transmute::<*mut c_void, ManagedEntryFn>(entry) };
        debug!("Resolved managed entry point '{}'", type_name);
        self.entry_points.insert(key, entry);
        Ok(entry)
    }
}

/// Logical assembly name: the file name minus directory and extension.
fn assembly_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
