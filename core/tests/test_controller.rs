// Thread/resource controller: setters, lifecycle, resource release and
// concurrent use of one facade.

#[cfg(test)]
mod tests {
    use std::thread;

    use blosc_core::codec::CompressOptions;
    use blosc_core::compression::CompressionCodec;
    use blosc_core::config::EngineConfig;
    use blosc_core::constants::MAX_THREADS;
    use blosc_core::controller::{Controller, Lifecycle};
    use blosc_core::engine::BlockEngine;
    use blosc_core::prelude::Blosc;
    use blosc_core::types::ErrorKind;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn counting_bytes(n: u64) -> Vec<u8> {
        (0..n).flat_map(|v| v.to_le_bytes()).collect()
    }

    fn block_blosc() -> Blosc<BlockEngine> {
        Blosc::with_engine(BlockEngine::new(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn set_nthreads_returns_previous() {
        let blosc = Blosc::new();
        blosc.set_nthreads(1).unwrap();
        assert_eq!(blosc.set_nthreads(2).unwrap(), 1);
        assert_eq!(blosc.nthreads(), 2);
    }

    #[test]
    fn set_nthreads_out_of_range() {
        let blosc = Blosc::new();
        let before = blosc.nthreads();
        for n in [0, MAX_THREADS + 1] {
            assert_eq!(blosc.set_nthreads(n).unwrap_err().kind(), ErrorKind::Range);
        }
        assert_eq!(blosc.nthreads(), before);
        assert_eq!(blosc.set_nthreads(MAX_THREADS).unwrap(), before);
    }

    #[test]
    fn lifecycle_transitions() {
        init_logger();
        let blosc = Blosc::new();
        assert_eq!(blosc.lifecycle(), Lifecycle::Uninitialized);

        blosc.compress(b"abc", 1, &CompressOptions::default()).unwrap();
        assert_eq!(blosc.lifecycle(), Lifecycle::Initialized);

        assert!(blosc.destroy());
        assert!(!blosc.destroy());
        assert_eq!(blosc.lifecycle(), Lifecycle::Destroyed);

        // Any call after destroy re-initializes.
        let frame = blosc.compress(b"abc", 1, &CompressOptions::default()).unwrap();
        assert_eq!(blosc.lifecycle(), Lifecycle::Initialized);
        assert_eq!(blosc.decompress(&frame).unwrap(), b"abc");

        assert!(!blosc.init());
        assert!(blosc.destroy());
        assert!(blosc.init());
    }

    #[test]
    fn free_resources_releases_scratch_and_is_idempotent() {
        let blosc = block_blosc();
        let data = counting_bytes(50_000);
        blosc.compress(&data, 8, &CompressOptions::default()).unwrap();
        assert!(blosc.engine().scratch().pooled() > 0);

        blosc.free_resources();
        assert_eq!(blosc.engine().scratch().pooled(), 0);
        blosc.free_resources();
        assert_eq!(blosc.engine().scratch().pooled(), 0);
    }

    #[test]
    fn default_engine_survives_free_resources() {
        let blosc = Blosc::new();
        let data = counting_bytes(50_000);
        let frame = blosc.compress(&data, 8, &CompressOptions::default()).unwrap();
        blosc.free_resources();
        blosc.free_resources();
        assert_eq!(blosc.decompress(&frame).unwrap(), data);
    }

    #[test]
    fn releasegil_returns_previous_policy() {
        let blosc = Blosc::new();
        assert!(!blosc.set_releasegil(true));
        assert!(blosc.set_releasegil(false));
        assert!(!blosc.releasegil());
    }

    #[test]
    fn default_compressor_is_configurable() {
        let blosc = Blosc::new();
        assert_eq!(blosc.controller().compressor(), CompressionCodec::Lz4);
        blosc.set_compressor("zstd").unwrap();
        assert_eq!(blosc.controller().compressor(), CompressionCodec::Zstd);
        let frame = blosc.compress(&counting_bytes(10_000), 8, &CompressOptions::default()).unwrap();
        assert_eq!(blosc.frame_header(&frame).unwrap().codec().unwrap(), CompressionCodec::Zstd);

        assert_eq!(blosc.set_compressor("snappy").unwrap_err().kind(), ErrorKind::Engine);
        assert_eq!(blosc.controller().compressor(), CompressionCodec::Zstd);
    }

    #[test]
    fn forced_blocksize_is_used() {
        let blosc = block_blosc();
        assert_eq!(blosc.set_blocksize(4096).unwrap(), 0);
        let data = counting_bytes(20_000);
        let frame = blosc.compress(&data, 8, &CompressOptions::default()).unwrap();
        let header = blosc.frame_header(&frame).unwrap();
        assert_eq!(header.blocksize(), 4096);
        assert_eq!(header.nblocks(), data.len().div_ceil(4096));
        assert_eq!(blosc.decompress(&frame).unwrap(), data);

        blosc.set_blocksize(0).unwrap();
        assert_eq!(blosc.blocksize(), 0);
    }

    #[test]
    fn controller_rejects_invalid_config() {
        let cfg = EngineConfig { nthreads: 0, ..EngineConfig::default() };
        assert_eq!(Controller::new(cfg).unwrap_err().kind(), ErrorKind::Range);
        assert!(Blosc::with_engine(BlockEngine::new(), EngineConfig { nthreads: MAX_THREADS + 1, ..EngineConfig::default() }).is_err());
    }

    #[test]
    fn concurrent_calls_see_consistent_results() {
        init_logger();
        let blosc = block_blosc();
        let data = counting_bytes(200_000);
        let expected = blosc.compress(&data, 8, &CompressOptions::default()).unwrap();

        thread::scope(|scope| {
            for i in 0..4 {
                let (blosc, data, expected) = (&blosc, &data, &expected);
                scope.spawn(move || {
                    blosc.set_nthreads(i + 1).unwrap();
                    let frame = blosc.compress(data, 8, &CompressOptions::default()).unwrap();
                    assert_eq!(&frame, expected);
                    assert_eq!(&blosc.decompress(&frame).unwrap(), data);
                });
            }
        });
    }

    #[test]
    fn concurrent_calls_on_default_engine_round_trip() {
        let blosc = Blosc::new();
        let data = counting_bytes(200_000);

        thread::scope(|scope| {
            for i in 0..4 {
                let (blosc, data) = (&blosc, &data);
                scope.spawn(move || {
                    blosc.set_nthreads(i + 1).unwrap();
                    let frame = blosc.compress(data, 8, &CompressOptions::default()).unwrap();
                    assert_eq!(&blosc.decompress(&frame).unwrap(), data);
                });
            }
        });
    }
}
