//! `zlib-ng` backend

extern crate alloc;

use crate::sys::zlib_ng as sys;

use core::ffi::{c_char, c_int};
use core::ptr;
use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{Backend, DeflateStream, Flush, Outcome, StreamError};
use crate::mem::{zdeflate_alloc, zdeflate_free_with_state};
use crate::options::{DeflateOptions, Strategy};

extern "C" {
    #[link_name = "zng_zError"]
    fn zError(code: c_int) -> *const c_char;
}

///`zlib-ng` backend
static ZLIB_NG: Backend = Backend {
    drop_fn,
    reset_fn,
    deflate_fn,
    describe_error_fn,
};

struct State {
    inner: sys::z_stream,
    header: Option<HeaderState>,
}

struct HeaderState {
    raw: sys::gz_header,
    //Backing storage for raw.name/raw.comment, never touched after creation.
    name: Option<Vec<u8>>,
    comment: Option<Vec<u8>>,
}

impl State {
    fn apply_header(&mut self) -> c_int {
        match self.header.as_mut() {
            Some(header) => {
                //Pointers are refreshed on every application, the backing storage
                //never moves while boxed.
                header.raw.name = match header.name.as_ref() {
                    Some(name) => name.as_ptr() as *mut _,
                    None => ptr::null_mut(),
                };
                header.raw.comment = match header.comment.as_ref() {
                    Some(comment) => comment.as_ptr() as *mut _,
                    None => ptr::null_mut(),
                };
                unsafe {
                    sys::deflateSetHeader(&mut self.inner, &mut header.raw)
                }
            },
            None => sys::Z_OK,
        }
    }

    fn reset(&mut self) -> bool {
        let result = unsafe {
            sys::deflateReset(&mut self.inner)
        };
        //The engine forgets the member metadata on reset, so it has to be re-applied.
        result == sys::Z_OK && self.apply_header() == sys::Z_OK
    }
}

impl Drop for State {
    #[inline(always)]
    fn drop(&mut self) {
        unsafe {
            sys::deflateEnd(&mut self.inner);
        }
    }
}

impl Backend {
    ///Creates deflate stream with `zlib-ng` backend.
    ///
    ///Every tuning parameter is handed to the engine as is; when the engine rejects
    ///a value or cannot allocate its working buffers, the error carries its status
    ///code verbatim.
    pub fn zlib_ng(opts: DeflateOptions) -> Result<DeflateStream, StreamError> {
        let DeflateOptions { format, strategy, window_bits, mem_level, level, header } = opts;
        let mut instance = Box::new(State {
            inner: sys::z_stream {
                next_in: ptr::null_mut(),
                avail_in: 0,
                total_in: 0,
                next_out: ptr::null_mut(),
                avail_out: 0,
                total_out: 0,
                msg: ptr::null_mut(),
                state: ptr::null_mut(),
                zalloc: zdeflate_alloc,
                zfree: zdeflate_free_with_state,
                opaque: ptr::null_mut(),
                data_type: 0,
                adler: 0,
                reserved: 0,
            },
            header: header.map(|header| HeaderState {
                raw: sys::gz_header {
                    text: 0,
                    time: header.mtime as _,
                    xflags: 0,
                    os: header.os as _,
                    extra: ptr::null_mut(),
                    extra_len: 0,
                    extra_max: 0,
                    name: ptr::null_mut(),
                    name_max: 0,
                    comment: ptr::null_mut(),
                    comm_max: 0,
                    hcrc: 0,
                    done: 0,
                },
                name: header.name,
                comment: header.comment,
            }),
        });

        let strategy = match strategy {
            Strategy::Default => sys::Z_DEFAULT_STRATEGY,
            Strategy::Filtered => sys::Z_FILTERED,
            Strategy::HuffmanOnly => sys::Z_HUFFMAN_ONLY,
            Strategy::Rle => sys::Z_RLE,
            Strategy::Fixed => sys::Z_FIXED,
        };

        let result = unsafe {
            sys::deflateInit2(&mut instance.inner, level as _, sys::Z_DEFLATED, format.window_bits(window_bits), mem_level as _, strategy)
        };
        if result != sys::Z_OK {
            return Err(StreamError(result));
        }

        let result = instance.apply_header();
        if result != sys::Z_OK {
            return Err(StreamError(result));
        }

        let instance = unsafe {
            ptr::NonNull::new_unchecked(Box::into_raw(instance)).cast()
        };
        Ok(ZLIB_NG.inner_stream(instance))
    }
}

unsafe fn deflate_fn(state: ptr::NonNull<u8>, input: *const u8, input_remain: usize, output: *mut u8, output_remain: usize, flush: Flush) -> Outcome {
    internal_deflate_impl!(state, input, input_remain, output, output_remain, flush)
}

#[inline]
fn reset_fn(state: ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>> {
    let result = unsafe {
        (*(state.as_ptr() as *mut State)).reset()
    };
    if result {
        Some(state)
    } else {
        None
    }
}

#[inline]
fn drop_fn(state: ptr::NonNull<u8>) {
    unsafe {
        drop(Box::from_raw(state.as_ptr() as *mut State));
    }
}

#[inline]
fn describe_error_fn(code: i32) -> Option<&'static str> {
    let result = unsafe {
        zError(code)
    };
    crate::utils::convert_c_str(result)
}
