use serde::{Deserialize, Serialize};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

/// Discriminant values carried in the last field of [`MethodReturnValue`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnKind {
    None = 0,
    String = 1,
    Float = 2,
    UInt = 3,
    Int = 4,
}

/// Fixed-shape return slot filled by the managed dispatcher.
///
/// The field order matches the managed struct byte for byte, with the
/// discriminant last. Only the field selected by `kind` carries a value; the
/// rest are left zeroed.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MethodReturnValue {
    pub string_result: *const c_char,
    pub float_result: f32,
    pub uint_result: u32,
    pub int_result: i32,
    // Raw i32, written by foreign code; validated in MethodResult::from_raw.
    pub kind: i32,
}

impl Default for MethodReturnValue {
    fn default() -> Self {
        Self {
            string_result: ptr::null(),
            float_result: 0.0,
            uint_result: 0,
            int_result: 0,
            kind: ReturnKind::None as i32,
        }
    }
}

/// Owned, validated result of a managed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodResult {
    None,
    String(String),
    Float(f32),
    UInt(u32),
    Int(i32),
}

impl MethodResult {
    /// Copy the raw return slot into an owned value.
    ///
    /// An out-of-range discriminant, or a string discriminant with a null
    /// pointer, yields [`MethodResult::None`].
    ///
    /// # Safety
    /// When `raw.kind` selects the string variant, `raw.string_result` must
    /// be null or point to a nul-terminated C string that stays valid for
    /// the duration of the call.
    pub unsafe fn from_raw(raw: &MethodReturnValue) -> Self {
        match raw.kind {
            k if k == ReturnKind::String as i32 => {
                if raw.string_result.is_null() {
                    MethodResult::None
                } else {
                    let text = CStr::from_ptr(raw.string_result).to_string_lossy();
                    MethodResult::String(text.into_owned())
                }
            }
            k if k == ReturnKind::Float as i32 => MethodResult::Float(raw.float_result),
            k if k == ReturnKind::UInt as i32 => MethodResult::UInt(raw.uint_result),
            k if k == ReturnKind::Int as i32 => MethodResult::Int(raw.int_result),
            _ => MethodResult::None,
        }
    }

    pub fn kind(&self) -> ReturnKind {
        match self {
            MethodResult::None => ReturnKind::None,
            MethodResult::String(_) => ReturnKind::String,
            MethodResult::Float(_) => ReturnKind::Float,
            MethodResult::UInt(_) => ReturnKind::UInt,
            MethodResult::Int(_) => ReturnKind::Int,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, MethodResult::None)
    }

    /// Unsigned payload, or 0 for every other variant.
    ///
    /// Mirrors reading the raw `uint_result` field without checking the
    /// discriminant; instance-handle creation relies on this.
    pub fn uint_result(&self) -> u32 {
        match self {
            MethodResult::UInt(value) => *value,
            _ => 0,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MethodResult::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            MethodResult::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            MethodResult::UInt(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            MethodResult::Int(value) => Some(*value),
            _ => None,
        }
    }
}
