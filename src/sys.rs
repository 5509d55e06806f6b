//!Raw bindings to the linked compression engine.
//!
//!`deflateInit2` is a function-like macro in the C headers, so the sys crates only
//!carry its real entry point `deflateInit2_`. Each backend module re-exports its sys
//!crate and defines the callable counterpart of the macro with the exact expansion:
//!the five tuning parameters are forwarded untouched, the version string and stream
//!size of the linked engine are appended, and the status code comes back as is.
//!
//!Legal parameter ranges and status code values are owned by the linked engine;
//!nothing here validates, clamps or translates.

#[cfg(any(feature = "zlib", feature = "zlib-static"))]
///`zlib` bindings
pub mod zlib {
    pub use libz_sys::*;

    use core::ffi::c_int;

    #[inline(always)]
    #[allow(non_snake_case)]
    ///Callable counterpart of the `deflateInit2` macro.
    ///
    ///On success the stream handle is mutated in place into a fully initialized
    ///state and must eventually be torn down with `deflateEnd`. On failure the
    ///engine's status code is returned unmodified and the handle stays unusable.
    ///
    ///The handle must be freshly allocated or fully reset, with its allocation
    ///callbacks and `opaque` already set up.
    pub unsafe fn deflateInit2(strm: z_streamp, level: c_int, method: c_int, window_bits: c_int, mem_level: c_int, strategy: c_int) -> c_int {
        deflateInit2_(strm, level, method, window_bits, mem_level, strategy, zlibVersion(), core::mem::size_of::<z_stream>() as c_int)
    }
}

#[cfg(feature = "zlib-ng")]
///`zlib-ng` bindings
pub mod zlib_ng {
    pub use libz_ng_sys::*;

    use core::ffi::c_int;

    #[inline(always)]
    #[allow(non_snake_case)]
    ///Callable counterpart of the `deflateInit2` macro.
    ///
    ///On success the stream handle is mutated in place into a fully initialized
    ///state and must eventually be torn down with `deflateEnd`. On failure the
    ///engine's status code is returned unmodified and the handle stays unusable.
    ///
    ///The handle must be freshly allocated or fully reset, with its allocation
    ///callbacks and `opaque` already set up.
    pub unsafe fn deflateInit2(strm: z_streamp, level: c_int, method: c_int, window_bits: c_int, mem_level: c_int, strategy: c_int) -> c_int {
        deflateInit2_(strm, level, method, window_bits, mem_level, strategy, zlibVersion(), core::mem::size_of::<z_stream>() as c_int)
    }
}
