use zdeflate::{DeflateStatus, DeflateStream, Flush};

const DATA: [&[u8]; 2] = [
    include_bytes!("data/10x10y"),
    include_bytes!("data/lorem.txt"),
];

fn compress_with(stream: &mut DeflateStream, data: &[u8]) -> Vec<u8> {
    let mut output = Vec::new();
    let result = stream.deflate_vec_full(data, &mut output, Flush::Finish).expect("to reserve output");
    assert_eq!(result.status, Ok(DeflateStatus::Finished));
    assert_eq!(result.input_remain, 0);
    output
}

#[test]
fn should_allow_moving_stream_between_threads() {
    fn assert_send<T: Send>() {}
    assert_send::<DeflateStream>();
}

#[cfg(any(feature = "zlib", feature = "zlib-static"))]
mod zlib {
    use super::{compress_with, DATA};

    use zdeflate::stream::Backend;
    use zdeflate::sys::zlib as sys;
    use zdeflate::{DeflateOptions, DeflateStatus, Flush, Format, GzipHeader};

    fn compress(options: DeflateOptions, data: &[u8]) -> Vec<u8> {
        let mut stream = Backend::zlib(options).expect("to create zlib stream");
        compress_with(&mut stream, data)
    }

    //Framing is the only difference between the three formats, the compressed body
    //is the same whenever the tuning parameters are the same.
    #[test]
    fn should_emit_expected_framing_overhead() {
        for idx in 0..DATA.len() {
            let data = DATA[idx];
            println!("{}: data.len()={}", idx, data.len());
            let raw = compress(DeflateOptions::new().format(Format::Raw), data);
            let zlib = compress(DeflateOptions::new().format(Format::Zlib), data);
            let gzip = compress(DeflateOptions::new().format(Format::Gzip), data);

            //zlib is 2 byte header + 4 byte checksum, gzip is 10 byte header + 8 byte trailer
            assert_eq!(zlib.len(), raw.len() + 6);
            assert_eq!(gzip.len(), raw.len() + 18);
            assert_eq!(zlib[0], 0x78);
            assert_eq!(&gzip[..3], &[0x1f, 0x8b, 8]);
            assert_eq!(&zlib[2..zlib.len() - 4], &raw[..]);
            assert_eq!(&gzip[10..gzip.len() - 8], &raw[..]);
        }
    }

    #[test]
    fn should_produce_headerless_output_for_raw_format() {
        let raw = compress(DeflateOptions::new().format(Format::Raw), DATA[0]);
        assert!(raw.len() > 0);
        assert_ne!(raw[0], 0x78);
        assert_ne!(raw[0], 0x1f);
    }

    //CMF carries the window size and FLG carries the level class, so the signature
    //bytes show the parameters exactly as the engine received them.
    #[test]
    fn should_encode_tuning_in_zlib_signature() {
        let output = compress(DeflateOptions::new().format(Format::Zlib).window_bits(9).level(1), DATA[0]);
        assert_eq!(output[0], 0x18);
        assert_eq!(output[1] >> 6, 0);

        let output = compress(DeflateOptions::new().format(Format::Zlib).level(6), DATA[0]);
        assert_eq!(output[0], 0x78);
        assert_eq!(output[1] >> 6, 2);

        let output = compress(DeflateOptions::new().format(Format::Zlib).level(9), DATA[0]);
        assert_eq!(output[0], 0x78);
        assert_eq!(output[1] >> 6, 3);
    }

    #[test]
    fn should_defer_default_level_to_engine() {
        let defaulted = compress(DeflateOptions::new().format(Format::Zlib).level(-1), DATA[1]);
        let six = compress(DeflateOptions::new().format(Format::Zlib).level(6), DATA[1]);
        assert_eq!(defaulted, six);
    }

    #[test]
    fn should_match_gzip_member_layout() {
        let header = GzipHeader::new().name("Foo.txt").mtime(42);
        let output = compress(DeflateOptions::new().gzip_header(header), b"Hello, World! Hello, World!");

        //Magic number
        assert_eq!(&output[..2], &[0x1f, 0x8b]);
        //Compression Method (Deflate)
        assert_eq!(output[2], 8);
        //Flags (has file name)
        assert_eq!(output[3], 0b1000);
        //Timestamp
        assert_eq!(&output[4..8], &42u32.to_le_bytes()[..]);
        //OS defaults to unknown
        assert_eq!(output[9], 255);
        //Filename
        let name_end = 10 + output[10..].iter().position(|byte| *byte == 0).expect("to find name terminator");
        assert_eq!(&output[10..name_end], b"Foo.txt");
    }

    #[test]
    fn should_write_gzip_comment_after_name() {
        let header = GzipHeader::new().name("Foo.txt").comment("example").os(3);
        let output = compress(DeflateOptions::new().gzip_header(header), DATA[0]);

        //Flags (has file name and comment)
        assert_eq!(output[3], 0b11000);
        assert_eq!(output[9], 3);
        let name_end = 10 + output[10..].iter().position(|byte| *byte == 0).expect("to find name terminator");
        assert_eq!(&output[10..name_end], b"Foo.txt");
        let comment_start = name_end + 1;
        let comment_end = comment_start + output[comment_start..].iter().position(|byte| *byte == 0).expect("to find comment terminator");
        assert_eq!(&output[comment_start..comment_end], b"example");
    }

    #[test]
    fn should_finish_across_small_buffers() {
        let mut stream = Backend::zlib(Default::default()).expect("to create zlib stream");
        let mut compressed = Vec::with_capacity(64);
        let mut data = DATA[1];
        let mut seen_need_output = false;
        loop {
            let result = stream.deflate_vec(data, &mut compressed, Flush::Finish);
            data = &data[data.len() - result.input_remain..];
            match result.status.expect("to deflate") {
                DeflateStatus::NeedOutput => {
                    seen_need_output = true;
                    compressed.reserve(64);
                },
                DeflateStatus::Finished => break,
                DeflateStatus::Continue => (),
            }
        }
        assert!(seen_need_output);

        let expected = compress(Default::default(), DATA[1]);
        assert_eq!(compressed, expected);
    }

    #[test]
    fn should_chunk_with_flush_points() {
        let data = DATA[1];
        let mut stream = Backend::zlib(DeflateOptions::new().format(Format::Raw)).expect("to create zlib stream");
        let mut compressed = Vec::with_capacity(data.len() + 100);

        let result = stream.deflate_vec(&data[..data.len() / 2], &mut compressed, Flush::None);
        assert_eq!(result.input_remain, 0);
        assert_eq!(result.status, Ok(DeflateStatus::Continue));

        let result = stream.deflate_vec(&data[data.len() / 2..], &mut compressed, Flush::Sync);
        assert_eq!(result.input_remain, 0);
        assert_eq!(result.status, Ok(DeflateStatus::Continue));
        //sync flush is byte aligned with the empty stored block marker
        assert_eq!(&compressed[compressed.len() - 4..], &[0x00, 0x00, 0xff, 0xff]);

        let result = stream.deflate_vec(&[], &mut compressed, Flush::Finish);
        assert_eq!(result.status, Ok(DeflateStatus::Finished));
    }

    #[test]
    fn should_match_one_shot_output_when_chunked() {
        let data = DATA[1];
        let options = DeflateOptions::new().format(Format::Zlib);
        let mut stream = Backend::zlib(options).expect("to create zlib stream");
        let mut chunked = Vec::with_capacity(data.len() + 100);
        for chunk in data.chunks(data.len() / 4) {
            let result = stream.deflate_vec(chunk, &mut chunked, Flush::None);
            assert_eq!(result.input_remain, 0);
            assert_eq!(result.status, Ok(DeflateStatus::Continue));
        }
        let result = stream.deflate_vec(&[], &mut chunked, Flush::Finish);
        assert_eq!(result.status, Ok(DeflateStatus::Finished));

        let one_shot = compress(DeflateOptions::new().format(Format::Zlib), data);
        assert_eq!(chunked, one_shot);
    }

    #[test]
    fn should_reset_and_reproduce_identical_output() {
        let options = DeflateOptions::new().gzip_header(GzipHeader::new().name("Foo.txt").mtime(42));
        let mut stream = Backend::zlib(options).expect("to create zlib stream");

        let first = compress_with(&mut stream, DATA[0]);
        assert!(stream.reset());
        let second = compress_with(&mut stream, DATA[0]);

        assert_eq!(first, second);
        //metadata survives the reset
        assert_eq!(first[3], 0b1000);
    }

    #[test]
    fn should_produce_identical_output_on_independent_streams() {
        let first = compress(Default::default(), DATA[1]);
        let second = compress(Default::default(), DATA[1]);
        assert_eq!(first, second);
    }

    #[test]
    fn should_relay_engine_rejection() {
        let error = Backend::zlib(DeflateOptions::new().mem_level(0)).err().expect("to reject mem_level");
        assert_eq!(error.as_raw(), sys::Z_STREAM_ERROR);

        let error = Backend::zlib(DeflateOptions::new().window_bits(20)).err().expect("to reject window_bits");
        assert_eq!(error.as_raw(), sys::Z_STREAM_ERROR);

        //metadata is only accepted on gzip framing
        let options = DeflateOptions::new().format(Format::Zlib).gzip_header(GzipHeader::new().name("Foo.txt"));
        let error = Backend::zlib(options).err().expect("to reject metadata");
        assert_eq!(error.as_raw(), sys::Z_STREAM_ERROR);

        let stream = Backend::zlib(Default::default()).expect("to create zlib stream");
        assert_eq!(stream.describe_error(error), Some("stream error"));
    }
}

#[cfg(feature = "zlib-ng")]
mod zlib_ng {
    use super::{compress_with, DATA};

    use zdeflate::stream::Backend;
    use zdeflate::sys::zlib_ng as sys;
    use zdeflate::{DeflateOptions, DeflateStatus, Flush, Format, GzipHeader};

    fn compress(options: DeflateOptions, data: &[u8]) -> Vec<u8> {
        let mut stream = Backend::zlib_ng(options).expect("to create zlib-ng stream");
        compress_with(&mut stream, data)
    }

    #[test]
    fn should_emit_expected_framing_overhead() {
        for idx in 0..DATA.len() {
            let data = DATA[idx];
            println!("{}: data.len()={}", idx, data.len());
            let raw = compress(DeflateOptions::new().format(Format::Raw), data);
            let zlib = compress(DeflateOptions::new().format(Format::Zlib), data);
            let gzip = compress(DeflateOptions::new().format(Format::Gzip), data);

            assert_eq!(zlib.len(), raw.len() + 6);
            assert_eq!(gzip.len(), raw.len() + 18);
            assert_eq!(zlib[0], 0x78);
            assert_eq!(&gzip[..3], &[0x1f, 0x8b, 8]);
            assert_eq!(&zlib[2..zlib.len() - 4], &raw[..]);
            assert_eq!(&gzip[10..gzip.len() - 8], &raw[..]);
        }
    }

    #[test]
    fn should_match_gzip_member_layout() {
        let header = GzipHeader::new().name("Foo.txt").mtime(42);
        let output = compress(DeflateOptions::new().gzip_header(header), b"Hello, World! Hello, World!");

        assert_eq!(&output[..2], &[0x1f, 0x8b]);
        assert_eq!(output[2], 8);
        assert_eq!(output[3], 0b1000);
        assert_eq!(&output[4..8], &42u32.to_le_bytes()[..]);
        assert_eq!(output[9], 255);
        let name_end = 10 + output[10..].iter().position(|byte| *byte == 0).expect("to find name terminator");
        assert_eq!(&output[10..name_end], b"Foo.txt");
    }

    #[test]
    fn should_chunk_with_flush_points() {
        let data = DATA[1];
        let mut stream = Backend::zlib_ng(DeflateOptions::new().format(Format::Raw)).expect("to create zlib-ng stream");
        let mut compressed = Vec::with_capacity(data.len() + 100);

        let result = stream.deflate_vec(&data[..data.len() / 2], &mut compressed, Flush::None);
        assert_eq!(result.input_remain, 0);
        assert_eq!(result.status, Ok(DeflateStatus::Continue));

        let result = stream.deflate_vec(&data[data.len() / 2..], &mut compressed, Flush::Sync);
        assert_eq!(result.input_remain, 0);
        assert_eq!(result.status, Ok(DeflateStatus::Continue));
        assert_eq!(&compressed[compressed.len() - 4..], &[0x00, 0x00, 0xff, 0xff]);

        let result = stream.deflate_vec(&[], &mut compressed, Flush::Finish);
        assert_eq!(result.status, Ok(DeflateStatus::Finished));
    }

    #[test]
    fn should_relay_engine_rejection() {
        let error = Backend::zlib_ng(DeflateOptions::new().mem_level(0)).err().expect("to reject mem_level");
        assert_eq!(error.as_raw(), sys::Z_STREAM_ERROR);
    }
}

#[cfg(all(feature = "bytes", any(feature = "zlib", feature = "zlib-static")))]
mod buf {
    use super::{compress_with, DATA};

    use zdeflate::stream::Backend;
    use zdeflate::{DeflateOptions, DeflateStatus, Flush, Format};

    #[test]
    fn should_deflate_into_bytes_buf() {
        let options = DeflateOptions::new().format(Format::Zlib);
        let mut stream = Backend::zlib(options).expect("to create zlib stream");
        let mut buf = bytes::BytesMut::with_capacity(DATA[1].len());

        let result = stream.deflate_buf(DATA[1], &mut buf, Flush::Finish);
        assert_eq!(result.input_remain, 0);
        assert_eq!(result.status, Ok(DeflateStatus::Finished));

        let mut stream = Backend::zlib(DeflateOptions::new().format(Format::Zlib)).expect("to create zlib stream");
        let expected = compress_with(&mut stream, DATA[1]);
        assert_eq!(&buf[..], &expected[..]);
    }
}

#[cfg(all(feature = "std", any(feature = "zlib", feature = "zlib-static")))]
mod writer {
    use super::{compress_with, DATA};

    use zdeflate::stream::Backend;
    use zdeflate::DeflateWriter;

    #[test]
    fn should_stream_through_writer() {
        let stream = Backend::zlib(Default::default()).expect("to create zlib stream");
        let mut writer = DeflateWriter::new(stream, Vec::new());
        writer.push(&DATA[1][..DATA[1].len() / 2]).expect("to push first half");
        writer.push(&DATA[1][DATA[1].len() / 2..]).expect("to push second half");
        let output = writer.finish().expect("to finish stream");

        let mut stream = Backend::zlib(Default::default()).expect("to create zlib stream");
        let expected = compress_with(&mut stream, DATA[1]);
        assert_eq!(output, expected);
    }
}
