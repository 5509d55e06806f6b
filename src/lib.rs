//!Deflate stream initialization and encoding on top of system zlib
//!
//!`deflateInit2`, the full parameter initializer of a deflate stream, is a
//!function-like macro in the C headers, hence callers that import symbols rather
//!than preprocessor text cannot reach it. [sys] re-exposes it as an ordinary
//!function with the macro's exact expansion, while [stream] wraps the resulting
//!handle into a safe lifecycle.
//!
//!## Features
//!
//!This crate requires `alloc` to be available with system allocator set.
//!
//!- `zlib` - Enables `zlib` backend. Default on.
//!- `zlib-static` - Enables `zlib` backend with `static` feature.
//!- `zlib-ng` - Enables `zlib-ng` backend.
//!- `bytes` - Enables encoding into `bytes` buffers.
//!- `std` - Enables `io::Write` adapter. Default on.

#![no_std]
#![warn(missing_docs)]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::style))]

#[cfg(feature = "std")]
extern crate std;

#[cfg(any(feature = "zlib", feature = "zlib-static", feature = "zlib-ng"))]
pub(crate) mod utils;
pub mod mem;
#[cfg(any(feature = "zlib", feature = "zlib-static", feature = "zlib-ng"))]
pub mod sys;
pub mod options;
pub use options::{DeflateOptions, Format, GzipHeader, Strategy};
pub mod stream;
pub use stream::{DeflateStatus, DeflateStream, Flush, Outcome, StreamError};
#[cfg(feature = "std")]
pub mod writer;
#[cfg(feature = "std")]
pub use writer::DeflateWriter;
