// Frame header: wire layout, validation and header-only introspection.

#[cfg(test)]
mod tests {
    use blosc_core::codec::CompressOptions;
    use blosc_core::compression::CompressionCodec;
    use blosc_core::config::EngineConfig;
    use blosc_core::constants::{flags, CODEC_FORMAT_VERSION, FORMAT_VERSION};
    use blosc_core::engine::{BlockEngine, Engine};
    use blosc_core::headers::{decode_header_le, encode_header_le, read_header_le, FrameHeader, HeaderError, Shuffle};
    use blosc_core::prelude::Blosc;

    fn sample() -> FrameHeader {
        let mut h = FrameHeader::new(CompressionCodec::Zstd, Shuffle::Byte, 8, 1000, 1000);
        h.cbytes = 200;
        h
    }

    #[test]
    fn wire_layout_is_stable() {
        let bytes = encode_header_le(&sample());
        assert_eq!(bytes[0], FORMAT_VERSION);
        assert_eq!(bytes[1], CODEC_FORMAT_VERSION);
        assert_eq!(bytes[2], (5 << flags::CODEC_SHIFT) | flags::BYTE_SHUFFLE);
        assert_eq!(bytes[3], 8);
        assert_eq!(&bytes[4..8], &1000u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &1000u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &200u32.to_le_bytes());

        assert_eq!(read_header_le(&bytes).unwrap(), sample());
    }

    #[test]
    fn flag_accessors() {
        let mut h = sample();
        assert_eq!(h.shuffle(), Shuffle::Byte);
        assert_eq!(h.codec().unwrap(), CompressionCodec::Zstd);
        assert!(!h.is_memcpyed());
        h.set_memcpyed();
        assert!(h.is_memcpyed());
        assert_eq!(h.codec().unwrap(), CompressionCodec::Zstd);
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let mut h = sample();
        h.version = 0;
        assert!(matches!(h.validate(), Err(HeaderError::UnsupportedVersion { .. })));

        let mut h = sample();
        h.version = FORMAT_VERSION + 1;
        assert!(matches!(h.validate(), Err(HeaderError::UnsupportedVersion { .. })));

        let mut h = sample();
        h.flags |= 0x04;
        assert!(matches!(h.validate(), Err(HeaderError::ReservedFlags { .. })));

        let mut h = sample();
        h.typesize = 0;
        assert!(matches!(h.validate(), Err(HeaderError::TypesizeZero)));

        let mut h = sample();
        h.blocksize = 0;
        assert!(matches!(h.validate(), Err(HeaderError::BlocksizeZero)));

        let mut h = FrameHeader::new(CompressionCodec::Lz4, Shuffle::NoShuffle, 1, 0, 0);
        h.cbytes = FrameHeader::LEN as u32;
        assert!(matches!(h.validate(), Err(HeaderError::BlocksizeZero)));
        h.set_memcpyed();
        assert!(h.validate().is_ok());

        let mut h = sample();
        h.flags = (7 << flags::CODEC_SHIFT) | flags::BYTE_SHUFFLE;
        assert!(matches!(h.validate(), Err(HeaderError::UnknownCompression { raw: 7 })));

        let mut h = sample();
        h.set_memcpyed();
        assert!(matches!(h.validate(), Err(HeaderError::StoredSizeMismatch { .. })));
    }

    #[test]
    fn decode_checks_buffer_length() {
        let bytes = encode_header_le(&sample());
        assert!(matches!(decode_header_le(&bytes[..8]), Err(HeaderError::BufferTooShort { have: 8, .. })));
        assert!(matches!(decode_header_le(&bytes), Err(HeaderError::CbytesMismatch { header: 200, actual: 16 })));
    }

    #[test]
    fn shuffle_verify() {
        assert_eq!(Shuffle::verify(0).unwrap(), Shuffle::NoShuffle);
        assert_eq!(Shuffle::verify(1).unwrap(), Shuffle::Byte);
        assert!(Shuffle::verify(2).is_err());
    }

    fn check_introspection<E: Engine>(blosc: &Blosc<E>) {
        let data: Vec<u8> = (0..20_000u32).flat_map(|v| v.to_le_bytes()).collect();
        let frame = blosc.compress(&data, 4, &CompressOptions::default().with_compressor(CompressionCodec::Zlib)).unwrap();

        let (nbytes, cbytes, blocksize) = blosc.cbuffer_sizes(&frame).unwrap();
        assert_eq!(nbytes, data.len());
        assert_eq!(cbytes, frame.len());
        assert!(blocksize > 0 && blocksize <= nbytes);

        let header_only = &frame[..blosc.engine().max_overhead()];
        assert_eq!(blosc.cbuffer_sizes(header_only).unwrap(), (nbytes, cbytes, blocksize));

        assert_eq!(blosc.cbuffer_metainfo(&frame).unwrap(), (4, Shuffle::Byte, CompressionCodec::Zlib));
        assert_eq!(blosc.clib(&frame).unwrap(), "Zlib");

        let plain = blosc.compress(&data, 4, &CompressOptions::default().with_shuffle(Shuffle::NoShuffle)).unwrap();
        assert_eq!(blosc.cbuffer_metainfo(&plain).unwrap().1, Shuffle::NoShuffle);

        assert!(blosc.cbuffer_validate(&frame));
        assert!(!blosc.cbuffer_validate(&frame[..frame.len() - 1]));
        assert!(!blosc.cbuffer_validate(b"short"));
        assert!(blosc.cbuffer_sizes(b"short").is_err());
    }

    #[test]
    fn introspection_of_block_frames() {
        let blosc = Blosc::with_engine(BlockEngine::new(), EngineConfig::default()).unwrap();
        check_introspection(&blosc);

        let data: Vec<u8> = (0..20_000u32).flat_map(|v| v.to_le_bytes()).collect();
        let frame = blosc.compress(&data, 4, &CompressOptions::default()).unwrap();
        assert_eq!(blosc.cbuffer_sizes(&frame).unwrap().2 % 4, 0);
    }

    #[test]
    fn introspection_of_default_engine_frames() {
        check_introspection(&Blosc::new());
    }

    #[test]
    fn error_messages_name_unknown_codes() {
        let err = HeaderError::UnknownCompression { raw: 7 };
        assert!(err.to_string().contains("0x7"));
        let known = HeaderError::UnknownCompression { raw: 1 };
        assert!(known.to_string().contains("Lz4"));
    }
}
