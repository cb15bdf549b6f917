// Engine configuration: defaults, environment overrides and serde.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use blosc_core::compression::CompressionCodec;
    use blosc_core::config::EngineConfig;
    use blosc_core::constants::MAX_THREADS;
    use blosc_core::prelude::Blosc;
    use blosc_core::types::ErrorKind;
    use blosc_core::utils::detect_number_of_cores;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.nthreads, detect_number_of_cores());
        assert!(cfg.nthreads >= 1 && cfg.nthreads <= MAX_THREADS);
        assert_eq!(cfg.blocksize, 0);
        assert_eq!(cfg.compressor, CompressionCodec::Lz4);
        assert!(!cfg.release_gil);
        cfg.validate().unwrap();
    }

    #[test]
    fn environment_overrides() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            ("BLOSC_NTHREADS", "3"),
            ("BLOSC_BLOCKSIZE", "65536"),
            ("BLOSC_COMPRESSOR", "zlib"),
            ("BLOSC_RELEASEGIL", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(cfg.nthreads, 3);
        assert_eq!(cfg.blocksize, 65536);
        assert_eq!(cfg.compressor, CompressionCodec::Zlib);
        assert!(cfg.release_gil);
    }

    #[test]
    fn invalid_environment_values() {
        let range = EngineConfig::from_lookup(lookup(&[("BLOSC_NTHREADS", "0")])).unwrap_err();
        assert_eq!(range.kind(), ErrorKind::Range);

        let too_many = EngineConfig::from_lookup(lookup(&[("BLOSC_NTHREADS", "100000")])).unwrap_err();
        assert_eq!(too_many.kind(), ErrorKind::Range);

        let not_int = EngineConfig::from_lookup(lookup(&[("BLOSC_NTHREADS", "four")])).unwrap_err();
        assert_eq!(not_int.kind(), ErrorKind::TypeMismatch);

        let codec = EngineConfig::from_lookup(lookup(&[("BLOSC_COMPRESSOR", "blosclz")])).unwrap_err();
        assert_eq!(codec.kind(), ErrorKind::Engine);

        let flag = EngineConfig::from_lookup(lookup(&[("BLOSC_RELEASEGIL", "maybe")])).unwrap_err();
        assert_eq!(flag.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn serde_fills_missing_fields() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"compressor":"zstd"}"#).unwrap();
        assert_eq!(cfg.compressor, CompressionCodec::Zstd);
        assert_eq!(cfg.nthreads, detect_number_of_cores());

        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn facade_starts_from_given_config() {
        let cfg = EngineConfig {
            nthreads: 2,
            blocksize: 65536,
            compressor: CompressionCodec::Zstd,
            release_gil: true,
        };
        let blosc = Blosc::with_config(cfg.clone()).unwrap();
        assert_eq!(blosc.config(), cfg);
        assert_eq!(blosc.nthreads(), 2);
        assert!(blosc.releasegil());

        let bad = EngineConfig { nthreads: MAX_THREADS + 1, ..EngineConfig::default() };
        assert_eq!(Blosc::with_config(bad).unwrap_err().kind(), ErrorKind::Range);
    }
}
