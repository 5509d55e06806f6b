//!Deflate stream lifecycle.
//!
//!Creating a [DeflateStream] performs the engine handle's uninitialized to
//!initialized transition, drop tears it down. Initialization failures and
//!in-flight errors carry the engine's status code verbatim through [StreamError].

extern crate alloc;

use core::{mem, ptr};

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
///Engine status code, relayed without translation.
pub struct StreamError(pub(crate) i32);

impl StreamError {
    #[inline(always)]
    ///Returns raw integer
    pub const fn as_raw(&self) -> i32 {
        self.0
    }
}

#[derive(Copy, Clone, PartialEq)]
///Flush parameter of a single deflate call.
pub enum Flush {
    ///Compress as usual, letting the engine buffer.
    None,
    ///Emits everything consumed so far, byte aligned.
    ///
    ///Potentially may incur overhead.
    Sync,
    ///Finish the stream.
    ///
    ///After issuing Finish, no new data should be added.
    Finish,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Stream state after a deflate call.
pub enum DeflateStatus {
    ///Processed, carry on.
    Continue,
    ///Processed at least partially, but needs more space to write.
    NeedOutput,
    ///Stream is complete.
    ///
    ///Only possible after [Flush::Finish] is issued.
    Finished,
}

#[derive(Debug)]
///Deflate call output
pub struct Outcome {
    ///Number of bytes left unprocessed in `input`
    pub input_remain: usize,
    ///Number of bytes left unprocessed in `output`
    pub output_remain: usize,
    ///Stream state, or the engine's verbatim error code.
    pub status: Result<DeflateStatus, StreamError>,
}

///Stream backend interface
pub struct Backend {
    deflate_fn: unsafe fn(ptr::NonNull<u8>, *const u8, usize, *mut u8, usize, Flush) -> Outcome,
    //returns new/updated instance, MUST be replaced
    reset_fn: fn(ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>>,
    drop_fn: fn(ptr::NonNull<u8>),
    describe_error_fn: fn(i32) -> Option<&'static str>,
}

impl Backend {
    ///Creates new `Backend` with provided functions to build vtable.
    ///
    ///First argument of every function is state as pointer.
    ///
    ///It is user responsibility to pass correct function pointers
    pub const fn new(
        deflate_fn: unsafe fn(ptr::NonNull<u8>, *const u8, usize, *mut u8, usize, Flush) -> Outcome,
        reset_fn: fn(ptr::NonNull<u8>) -> Option<ptr::NonNull<u8>>,
        drop_fn: fn(ptr::NonNull<u8>),
        describe_error_fn: fn(i32) -> Option<&'static str>,
    ) -> Self {
        Self {
            deflate_fn,
            reset_fn,
            drop_fn,
            describe_error_fn,
        }
    }

    #[inline(always)]
    pub(crate) fn inner_stream(&'static self, instance: ptr::NonNull<u8>) -> DeflateStream {
        DeflateStream {
            instance,
            backend: self,
        }
    }

    #[inline(always)]
    ///Creates new stream out of already initialized state.
    ///
    ///This function is unsafe as it is up to user to ensure correctness of `Backend`
    ///
    ///`state` - Stream state, passed as first argument to every function in vtable
    pub unsafe fn stream(&'static self, state: ptr::NonNull<u8>) -> DeflateStream {
        self.inner_stream(state)
    }
}

///Deflate stream
///
///Use [Backend] constructors to instantiate it.
///
///Under hood, in order to avoid generics, implemented as vtable with series of function pointers.
///
///The handle is exclusively owned: a single stream must not be driven from multiple
///threads at once, while distinct streams are fully independent of each other.
///
///## Example
///
///Brief example for chunked compression.
///
///```rust
///use zdeflate::{DeflateStatus, Flush};
///use zdeflate::stream::Backend;
///
///let mut output = Vec::with_capacity(100);
///let mut stream = Backend::zlib(Default::default()).expect("to create zlib stream");
///
///for chunk in [&[1u8, 2, 3, 4][..], &[5, 6, 7, 8], &[9, 10]] {
///    let result = stream.deflate_vec(chunk, &mut output, Flush::None);
///    assert_eq!(result.input_remain, 0);
///    assert_eq!(result.status, Ok(DeflateStatus::Continue));
///}
///
///let result = stream.deflate_vec(&[], &mut output, Flush::Finish);
///assert_eq!(result.status, Ok(DeflateStatus::Finished));
///assert!(output.len() > 0);
///
/////Make sure to reset state, if you want to re-use the stream.
///assert!(stream.reset());
///```
pub struct DeflateStream {
    instance: ptr::NonNull<u8>,
    backend: &'static Backend,
}

const _: () = {
    assert!(mem::size_of::<DeflateStream>() == mem::size_of::<usize>() * 2);
};

impl DeflateStream {
    #[inline(always)]
    ///Raw deflate function, with no checks.
    ///
    ///Intended to be used as building block of higher level interfaces
    ///
    ///Arguments
    ///
    ///- `input` - Pointer to start of input to process. MUST NOT be null.
    ///- `input_len` - Size of data to process in `input`
    ///- `output` - Pointer to start of buffer where to write result. MUST NOT be null
    ///- `output_len` - Size of buffer pointed by `output`
    ///- `flush` - Flush behavior of this call.
    pub unsafe fn raw_deflate(&mut self, input: *const u8, input_len: usize, output: *mut u8, output_len: usize, flush: Flush) -> Outcome {
        (self.backend.deflate_fn)(self.instance, input, input_len, output, output_len, flush)
    }

    #[inline(always)]
    ///Deflates `input` into uninit `output`.
    ///
    ///`Outcome` will contain number of bytes written into `output`. This number always
    ///indicates number of bytes written hence which can be assumed initialized.
    pub fn deflate_uninit(&mut self, input: &[u8], output: &mut [mem::MaybeUninit<u8>], flush: Flush) -> Outcome {
        let input_len = input.len();
        let output_len = output.len();
        unsafe {
            self.raw_deflate(input.as_ptr(), input_len, output.as_mut_ptr() as _, output_len, flush)
        }
    }

    #[inline(always)]
    ///Deflates `input` into `output`.
    pub fn deflate(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Outcome {
        let input_len = input.len();
        let output_len = output.len();
        unsafe {
            self.raw_deflate(input.as_ptr(), input_len, output.as_mut_ptr() as _, output_len, flush)
        }
    }

    #[inline(always)]
    ///Deflates `input` into spare space in `output`.
    ///
    ///Function require user to alloc spare capacity himself.
    ///
    ///`Outcome::output_remain` will be relative to spare capacity length.
    pub fn deflate_vec(&mut self, input: &[u8], output: &mut Vec<u8>, flush: Flush) -> Outcome {
        let spare_capacity = output.spare_capacity_mut();
        let spare_capacity_len = spare_capacity.len();
        let result = self.deflate_uninit(input, spare_capacity, flush);

        let new_len = output.len() + spare_capacity_len - result.output_remain;
        unsafe {
            output.set_len(new_len);
        }
        result
    }

    ///Deflates `input` into `output` Vec, performing allocation when necessary
    ///
    ///This function will continue compressing as long as input requires more output.
    ///
    ///## Allocation
    ///
    ///Strategy depends on input size.
    ///- Less than 1024:
    ///   - Allocates `input.len()`
    ///   - Re-alloc size `input.len() / 3`, at least 32 to cover framing overhead
    ///- From 1024 to 65536:
    ///   - Allocates `input.len() / 2`
    ///   - Re-alloc size `1024`
    ///- From 65536:
    ///   - Allocates `input.len() / 3`
    ///   - Re-alloc size `8 * 1024`
    ///
    ///Note that the best strategy is always to re-use buffer
    ///
    ///## Result
    ///
    ///- `Outcome::output_remain` will be relative to spare capacity of the `output`.
    pub fn deflate_vec_full(&mut self, mut input: &[u8], output: &mut Vec<u8>, flush: Flush) -> Result<Outcome, TryReserveError> {
        const RESERVE_DEFAULT: usize = 1024;
        const RESERVE_MIN: usize = 32;
        let input_len = input.len();
        let reserve_size = if input_len < RESERVE_DEFAULT {
            output.try_reserve_exact(input_len)?;
            (input_len / 3).max(RESERVE_MIN)
        } else if input_len < (RESERVE_DEFAULT * 16) {
            output.try_reserve_exact(input_len / 2)?;
            RESERVE_DEFAULT
        } else {
            output.try_reserve_exact(input.len() / 3)?;
            RESERVE_DEFAULT * 8
        };

        loop {
            let result = self.deflate_vec(input, output, flush);
            match result.status {
                Ok(DeflateStatus::NeedOutput) => {
                    input = &input[input.len() - result.input_remain..];
                    output.try_reserve_exact(reserve_size)?;
                    continue;
                },
                Ok(DeflateStatus::Continue) if flush == Flush::Finish => {
                    input = &input[input.len() - result.input_remain..];
                    continue;
                },
                _ => break Ok(result),
            }
        }
    }

    #[cfg(feature = "bytes")]
    ///Deflates `input` into `output` buffer, iterating through all spare capacity chunks if
    ///necessary
    ///
    ///Requires `bytes` feature
    ///
    ///`Outcome::output_remain` will be relative to spare capacity length.
    pub fn deflate_buf(&mut self, mut input: &[u8], output: &mut impl bytes::BufMut, flush: Flush) -> Outcome {
        let mut result = Outcome {
            input_remain: input.len(),
            output_remain: output.remaining_mut(),
            status: Ok(DeflateStatus::NeedOutput),
        };

        loop {
            let spare_capacity = output.chunk_mut();
            let spare_capacity_len = spare_capacity.len();

            let (advanced_len, outcome) = unsafe {
                let outcome = self.deflate_uninit(input, spare_capacity.as_uninit_slice_mut(), flush);
                debug_assert!(spare_capacity_len > outcome.output_remain);
                let advanced_len = spare_capacity_len.saturating_sub(outcome.output_remain);
                output.advance_mut(advanced_len);
                (advanced_len, outcome)
            };
            input = &input[result.input_remain - outcome.input_remain..];
            result.input_remain = outcome.input_remain;
            result.output_remain = result.output_remain.saturating_sub(advanced_len);
            result.status = outcome.status;

            match result.status {
                Err(_) | Ok(DeflateStatus::Finished) | Ok(DeflateStatus::Continue) => break result,
                Ok(DeflateStatus::NeedOutput) => if result.output_remain == 0 {
                    break result;
                },
            }
        }
    }

    #[inline(always)]
    ///Resets stream state to initial, as it was right after creation.
    ///
    ///Gzip member metadata supplied on creation is carried over to the fresh stream.
    ///
    ///Returns `true` if successfully reset, otherwise `false`
    pub fn reset(&mut self) -> bool {
        match (self.backend.reset_fn)(self.instance) {
            Some(ptr) => {
                self.instance = ptr;
                true
            },
            None => false,
        }
    }

    #[inline(always)]
    ///Returns the engine's descriptive text for error.
    pub fn describe_error(&self, error: StreamError) -> Option<&'static str> {
        (self.backend.describe_error_fn)(error.as_raw())
    }
}

//The boxed state is owned exclusively and the engine touches nothing beyond it,
//given the allocation callbacks from `mem`.
unsafe impl Send for DeflateStream {}

impl Drop for DeflateStream {
    #[inline]
    fn drop(&mut self) {
        (self.backend.drop_fn)(self.instance);
    }
}

//deflate macro has to be defined before declaring modules
#[cfg(any(feature = "zlib", feature = "zlib-static", feature = "zlib-ng"))]
macro_rules! internal_deflate_impl {
    ($state:ident, $input:ident, $input_remain:ident, $output:ident, $output_remain:ident, $flush:ident) => {{
        use $crate::stream::DeflateStatus;

        let flush = match $flush {
            $crate::stream::Flush::None => sys::Z_NO_FLUSH,
            $crate::stream::Flush::Sync => sys::Z_SYNC_FLUSH,
            $crate::stream::Flush::Finish => sys::Z_FINISH,
        };

        let state = unsafe {
            &mut *($state.as_ptr() as *mut State)
        };

        state.inner.avail_out = $output_remain as _;
        state.inner.next_out = $output;

        state.inner.avail_in = $input_remain as _;
        state.inner.next_in = $input as *mut _;

        let result = unsafe {
            sys::deflate(&mut state.inner, flush)
        };

        $crate::stream::Outcome {
            input_remain: state.inner.avail_in as usize,
            output_remain: state.inner.avail_out as usize,
            status: match result {
                sys::Z_STREAM_END => Ok(DeflateStatus::Finished),
                //On final chunk the engine may report OK while it still has trailer to write (specifically in case of GZIP)
                sys::Z_OK => {
                    if flush == sys::Z_FINISH {
                        Ok(DeflateStatus::NeedOutput)
                    } else {
                        Ok(DeflateStatus::Continue)
                    }
                },
                sys::Z_BUF_ERROR => Ok(DeflateStatus::NeedOutput),
                other => Err($crate::stream::StreamError(other)),
            },
        }
    }}
}

#[cfg(any(feature = "zlib", feature = "zlib-static"))]
mod zlib;
#[cfg(feature = "zlib-ng")]
mod zlib_ng;
