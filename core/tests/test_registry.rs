// Compressor registry: names, codes, library info and level mapping.

#[cfg(test)]
mod tests {
    use blosc_core::compression::codecs::zstd::ZstdCompressor;
    use blosc_core::compression::{
        clib_info, code_to_name, compressor_list, create_compressor, create_decompressor, name_to_code,
        resolve, CompressionCodec, CompressionError, Compressor, Decompressor,
    };

    #[test]
    fn compressor_list_is_stable() {
        assert_eq!(compressor_list(), "lz4,zlib,zstd");
    }

    #[test]
    fn names_and_codes() {
        assert_eq!(name_to_code("lz4").unwrap(), 1);
        assert_eq!(name_to_code("zlib").unwrap(), 4);
        assert_eq!(name_to_code("zstd").unwrap(), 5);
        assert!(matches!(name_to_code("blosclz"), Err(CompressionError::UnknownName { .. })));

        assert_eq!(code_to_name(5).unwrap(), "zstd");
        assert!(matches!(code_to_name(99), Err(CompressionError::UnknownCode { code: 99 })));
        assert!(code_to_name(-1).is_err());

        for codec in CompressionCodec::ALL {
            assert_eq!(CompressionCodec::verify(codec.code()).unwrap(), codec);
            assert_eq!(CompressionCodec::from_name(codec.name()).unwrap(), codec);
        }
    }

    #[test]
    fn library_info() {
        assert_eq!(clib_info("lz4").unwrap().0, "LZ4");
        assert_eq!(clib_info("zlib").unwrap().0, "Zlib");
        let (lib, version) = clib_info("zstd").unwrap();
        assert_eq!(lib, "Zstd");
        assert!(!version.is_empty());
        assert!(!resolve(CompressionCodec::Lz4).supports_levels);
    }

    #[test]
    fn zstd_level_mapping() {
        assert_eq!(ZstdCompressor::new(0).level(), 1);
        assert_eq!(ZstdCompressor::new(1).level(), 1);
        assert_eq!(ZstdCompressor::new(5).level(), 9);
        assert_eq!(ZstdCompressor::new(9).level(), 19);
    }

    #[test]
    fn factories_round_trip_a_block() {
        let block: Vec<u8> = b"abcabcabc".iter().copied().cycle().take(4096).collect();
        for codec in CompressionCodec::ALL {
            let mut packed = Vec::new();
            create_compressor(codec, 5).compress_chunk(&block, &mut packed).unwrap();
            assert!(packed.len() < block.len());

            let mut out = vec![0u8; block.len()];
            let n = create_decompressor(codec).decompress_chunk(&packed, &mut out).unwrap();
            assert_eq!(n, block.len());
            assert_eq!(out, block);
        }
    }

    #[test]
    fn short_destination_is_an_error() {
        let block = vec![42u8; 1024];
        for codec in CompressionCodec::ALL {
            let mut packed = Vec::new();
            create_compressor(codec, 5).compress_chunk(&block, &mut packed).unwrap();
            let mut out = vec![0u8; block.len() - 1];
            assert!(create_decompressor(codec).decompress_chunk(&packed, &mut out).is_err(), "{codec}");
        }
    }
}
