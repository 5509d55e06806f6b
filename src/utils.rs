use core::ffi::{c_char, CStr};

#[inline]
pub(crate) fn convert_c_str(ptr: *const c_char) -> Option<&'static str> {
    if ptr.is_null() {
        return None;
    }

    let text = unsafe {
        CStr::from_ptr(ptr)
    };
    text.to_str().ok()
}
