//!Deflate tuning parameters.
//!
//!None of the knobs are validated here: every value is handed to the engine as is
//!and out of range values surface as the engine's own stream error on creation.

extern crate alloc;

use alloc::vec::Vec;

const MAX_MEM_LEVEL: u8 = 8;

#[derive(Copy, Clone)]
///Output container framing.
///
///The engine encodes the framing in the sign and offset of its window bits
///parameter; this enum carries the framing while [DeflateOptions::window_bits]
///carries the magnitude.
pub enum Format {
    ///Raw deflate stream without framing.
    Raw,
    ///zlib header with adler32 trailer.
    Zlib,
    ///gzip header and trailer.
    ///
    ///Default.
    Gzip,
}

impl Format {
    #[inline(always)]
    pub(crate) const fn window_bits(self, magnitude: u8) -> i32 {
        match self {
            Format::Raw => -(magnitude as i32),
            Format::Zlib => magnitude as i32,
            Format::Gzip => magnitude as i32 + 16,
        }
    }
}

impl Default for Format {
    #[inline(always)]
    fn default() -> Self {
        Format::Gzip
    }
}

#[derive(Copy, Clone)]
///Compression strategy
pub enum Strategy {
    ///Default strategy.
    Default,
    ///Filtered strategy for data produced from filter.
    Filtered,
    ///Forces using Huffman encoding only, ignoring string matching.
    HuffmanOnly,
    ///Strategy optimized for PNG image.
    Rle,
    ///Prevents using dynamic Huffman codes.
    Fixed,
}

impl Default for Strategy {
    #[inline(always)]
    fn default() -> Self {
        Strategy::Default
    }
}

///Gzip member metadata, written by the engine in front of the compressed stream.
///
///Applied through the engine's `deflateSetHeader`, which accepts it only on
///streams with [Format::Gzip] framing; on any other framing creation relays the
///engine's stream error.
pub struct GzipHeader {
    pub(crate) name: Option<Vec<u8>>,
    pub(crate) comment: Option<Vec<u8>>,
    pub(crate) mtime: u32,
    pub(crate) os: u8,
}

impl GzipHeader {
    #[inline(always)]
    ///Creates new empty header with modification time 0 and unknown OS (255)
    pub const fn new() -> Self {
        Self {
            name: None,
            comment: None,
            mtime: 0,
            os: 255,
        }
    }

    #[inline]
    ///Sets original file name.
    ///
    ///Must not contain NUL bytes, the engine stops at the first one.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(to_c_bytes(name));
        self
    }

    #[inline]
    ///Sets comment.
    ///
    ///Must not contain NUL bytes, the engine stops at the first one.
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(to_c_bytes(comment));
        self
    }

    #[inline]
    ///Sets modification time as unix timestamp
    pub fn mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    #[inline]
    ///Sets OS code
    pub fn os(mut self, os: u8) -> Self {
        self.os = os;
        self
    }
}

impl Default for GzipHeader {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

fn to_c_bytes(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    bytes
}

///Deflate configuration.
pub struct DeflateOptions {
    ///Output framing
    pub format: Format,
    ///Strategy
    pub strategy: Strategy,
    pub(crate) window_bits: u8,
    pub(crate) mem_level: u8,
    pub(crate) level: i8,
    pub(crate) header: Option<GzipHeader>,
}

impl DeflateOptions {
    #[inline(always)]
    ///Creates new default options
    pub const fn new() -> Self {
        Self {
            format: Format::Gzip,
            strategy: Strategy::Default,
            window_bits: 15,
            mem_level: MAX_MEM_LEVEL,
            level: 9,
            header: None,
        }
    }

    #[inline]
    ///Sets output framing
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    #[inline]
    ///Sets strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    ///Sets window bits magnitude.
    ///
    ///Defaults to maximum (15). The engine accepts 8 to 15, with the 8 bit window
    ///limited to [Format::Zlib] framing.
    pub fn window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = window_bits;
        self
    }

    #[inline]
    ///Sets memory level.
    ///
    ///Defaults to maximum (8). The engine accepts 1 to 9.
    pub fn mem_level(mut self, mem_level: u8) -> Self {
        self.mem_level = mem_level;
        self
    }

    #[inline]
    ///Sets compression level in range from 0 to 9.
    ///
    ///Defaults to 9.
    ///
    ///Use `-1` for the engine's default.
    pub fn level(mut self, level: i8) -> Self {
        self.level = level;
        self
    }

    #[inline]
    ///Sets gzip member metadata
    pub fn gzip_header(mut self, header: GzipHeader) -> Self {
        self.header = Some(header);
        self
    }
}

impl Default for DeflateOptions {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
