// Safe buffer codec: round trips, level/typesize validation, stored
// fallback, size bound, thread-count independence and malformed frames.
// Tests that check exact frame bytes pin the block engine.

#[cfg(test)]
mod tests {
    use blosc_core::codec::{self, CompressOptions};
    use blosc_core::compression::CompressionCodec;
    use blosc_core::config::EngineConfig;
    use blosc_core::constants::{MAX_OVERHEAD, MAX_TYPESIZE};
    use blosc_core::engine::{BlockEngine, Engine};
    use blosc_core::headers::{FrameHeader, Shuffle};
    use blosc_core::prelude::Blosc;
    use blosc_core::types::{BloscError, ErrorKind};
    use proptest::prelude::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn counting_bytes(n: u64) -> Vec<u8> {
        (0..n).flat_map(|v| v.to_le_bytes()).collect()
    }

    fn cfg(nthreads: usize) -> EngineConfig {
        EngineConfig { nthreads, ..EngineConfig::default() }
    }

    fn block_blosc() -> Blosc<BlockEngine> {
        Blosc::with_engine(BlockEngine::new(), EngineConfig::default()).unwrap()
    }

    /// Header of a compressed (not stored) LZ4 frame with the given sizes.
    fn raw_header(nbytes: u32, blocksize: u32, cbytes: u32) -> Vec<u8> {
        let mut frame = vec![2, 1, 0x20, 1];
        frame.extend_from_slice(&nbytes.to_le_bytes());
        frame.extend_from_slice(&blocksize.to_le_bytes());
        frame.extend_from_slice(&cbytes.to_le_bytes());
        frame
    }

    #[test]
    fn short_text_round_trip() {
        init_logger();
        let blosc = Blosc::new();
        let frame = blosc.compress(b"0123456789", 1, &CompressOptions::default()).unwrap();
        assert!(frame.len() <= 10 + blosc.engine().max_overhead());
        assert_eq!(blosc.decompress(&frame).unwrap(), b"0123456789");
    }

    #[test]
    fn every_codec_round_trips_and_compresses() {
        init_logger();
        let engine = BlockEngine::new();
        let data = counting_bytes(100_000);

        for codec in CompressionCodec::ALL {
            let opts = CompressOptions::default().with_compressor(codec);
            let frame = codec::compress(&engine, &cfg(4), &data, 8, &opts).unwrap();
            assert!(frame.len() < data.len() / 2, "{codec} did not compress");

            let header = engine.frame_header(&frame).unwrap();
            assert_eq!(header.codec().unwrap(), codec);
            assert_eq!(header.nbytes(), data.len());
            assert!(!header.is_memcpyed());

            assert_eq!(codec::decompress(&engine, &cfg(4), &frame).unwrap(), data);
        }
    }

    #[test]
    fn noshuffle_round_trips() {
        let engine = BlockEngine::new();
        let data = counting_bytes(20_000);
        let opts = CompressOptions::default().with_shuffle(Shuffle::NoShuffle);
        let frame = codec::compress(&engine, &cfg(2), &data, 8, &opts).unwrap();
        assert_eq!(engine.frame_header(&frame).unwrap().shuffle(), Shuffle::NoShuffle);
        assert_eq!(codec::decompress(&engine, &cfg(2), &frame).unwrap(), data);
    }

    #[test]
    fn output_does_not_depend_on_thread_count() {
        init_logger();
        let engine = BlockEngine::new();
        let data = counting_bytes(300_000);
        let opts = CompressOptions::default().with_clevel(5).with_compressor(CompressionCodec::Zstd);

        let single = codec::compress(&engine, &cfg(1), &data, 8, &opts).unwrap();
        for n in [2, 3, 8] {
            assert_eq!(codec::compress(&engine, &cfg(n), &data, 8, &opts).unwrap(), single);
        }
        assert_eq!(codec::decompress(&engine, &cfg(8), &single).unwrap(), data);
    }

    #[test]
    fn level_zero_stores() {
        let data = counting_bytes(1000);
        let opts = CompressOptions::default().with_clevel(0);

        let blosc = block_blosc();
        let frame = blosc.compress(&data, 8, &opts).unwrap();
        assert_eq!(frame.len(), data.len() + FrameHeader::LEN);
        assert!(blosc.frame_header(&frame).unwrap().is_memcpyed());
        assert_eq!(blosc.decompress(&frame).unwrap(), data);

        let blosc = Blosc::new();
        let frame = blosc.compress(&data, 8, &opts).unwrap();
        assert_eq!(frame.len(), data.len() + blosc.engine().max_overhead());
        assert!(blosc.frame_header(&frame).unwrap().is_memcpyed());
        assert_eq!(blosc.decompress(&frame).unwrap(), data);
    }

    #[test]
    fn empty_input_round_trips() {
        let blosc = block_blosc();
        let frame = blosc.compress(&[], 4, &CompressOptions::default()).unwrap();
        assert_eq!(frame.len(), FrameHeader::LEN);
        assert!(blosc.decompress(&frame).unwrap().is_empty());

        let blosc = Blosc::new();
        let frame = blosc.compress(&[], 4, &CompressOptions::default()).unwrap();
        assert!(frame.len() <= blosc.engine().max_overhead());
        assert!(blosc.decompress(&frame).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_levels_are_rejected() {
        let blosc = Blosc::new();
        for level in [-1, 10] {
            let err = blosc.compress(b"abc", 1, &CompressOptions::default().with_clevel(level)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range);
        }
    }

    #[test]
    fn out_of_range_typesizes_are_rejected() {
        let blosc = Blosc::new();
        for typesize in [0, MAX_TYPESIZE + 1] {
            let err = blosc.compress(b"abc", typesize, &CompressOptions::default()).unwrap_err();
            assert!(matches!(err, BloscError::Range { what: "typesize", .. }));
        }
    }

    #[test]
    fn decompress_into_requires_room() {
        let blosc = Blosc::new();
        let data = counting_bytes(1000);
        let frame = blosc.compress(&data, 8, &CompressOptions::default()).unwrap();

        let mut small = vec![0u8; data.len() - 1];
        assert_eq!(blosc.decompress_into(&frame, &mut small).unwrap_err().kind(), ErrorKind::Range);

        let mut exact = vec![0u8; data.len()];
        assert_eq!(blosc.decompress_into(&frame, &mut exact).unwrap(), data.len());
        assert_eq!(exact, data);
    }

    #[test]
    fn truncated_and_garbage_frames_are_format_errors() {
        let blosc = Blosc::new();
        let data = counting_bytes(10_000);
        let frame = blosc.compress(&data, 8, &CompressOptions::default()).unwrap();

        for bad in [&frame[..frame.len() - 1], &frame[..10], &b""[..], &b"not a blosc frame at all"[..]] {
            assert_eq!(blosc.decompress(bad).unwrap_err().kind(), ErrorKind::Format);
        }
    }

    #[test]
    fn corrupted_block_table_is_format_error() {
        let blosc = block_blosc();
        let data = counting_bytes(10_000);
        let mut frame = blosc.compress(&data, 8, &CompressOptions::default()).unwrap();
        assert!(!blosc.frame_header(&frame).unwrap().is_memcpyed());

        frame[FrameHeader::LEN..FrameHeader::LEN + 4].copy_from_slice(&0u32.to_le_bytes());
        assert_eq!(blosc.decompress(&frame).unwrap_err().kind(), ErrorKind::Format);
        assert!(!blosc.cbuffer_validate(&frame));
    }

    #[test]
    fn empty_compressed_frame_without_blocksize_is_rejected() {
        init_logger();
        let blosc = block_blosc();
        let frame = raw_header(0, 0, 16);

        assert!(!blosc.cbuffer_validate(&frame));
        assert_eq!(blosc.frame_header(&frame).unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(blosc.decompress(&frame).unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(blosc.decompress_into(&frame, &mut []).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn validation_agrees_with_decompression() {
        let blosc = block_blosc();
        for frame in [raw_header(0, 0, 16), raw_header(64, 0, 16), raw_header(64, 16, 15), raw_header(0, 16, 16)] {
            let valid = blosc.cbuffer_validate(&frame);
            assert_eq!(valid, blosc.decompress(&frame).is_ok(), "{frame:?}");
        }
    }
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn round_trip_and_size_bound(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            typesize in 1usize..=16,
            clevel in 0i32..=9,
            codec_index in 0usize..3,
        ) {
            let engine = BlockEngine::new();
            let opts = CompressOptions::default()
                .with_clevel(clevel)
                .with_compressor(CompressionCodec::ALL[codec_index]);
            let frame = codec::compress(&engine, &cfg(2), &data, typesize, &opts).unwrap();
            prop_assert!(frame.len() <= data.len() + MAX_OVERHEAD);
            prop_assert_eq!(codec::decompress(&engine, &cfg(2), &frame).unwrap(), data);
        }
    }
}
