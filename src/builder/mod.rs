mod qr;

pub(crate) use qr::Module;
pub use qr::QR;

use crate::common::codec::{encode, encode_with_version};
use crate::common::ec::ecc;
use crate::common::error::{QRError, QRResult};
use crate::common::mask::{apply_best_mask, MaskPattern};
use crate::common::metadata::{ECLevel, Version};
use crate::common::BitStream;

// A run of data codewords and the error correction codewords computed over
// it.
struct Block<'a> {
    data: &'a [u8],
    ecc: Vec<u8>,
}

// Builder
//------------------------------------------------------------------------------

pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::H, mask: None }
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        let version = match self.version {
            Some(v) => (*v).to_string(),
            None => "auto".to_string(),
        };
        format!("version: {version}, ec level: {:?}", self.ec_level)
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_metadata() {
        let data = "Hello, world!".as_bytes();
        let mut builder = QRBuilder::new(data);
        builder.version(Version(1)).ec_level(ECLevel::L);
        assert_eq!(builder.metadata(), "version: 1, ec level: L");
        assert_eq!(QRBuilder::new(data).metadata(), "version: auto, ec level: H");
    }
}

// Build pipeline
//------------------------------------------------------------------------------

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        let mut qr = self.build_unmasked()?;
        match self.mask {
            Some(pattern) => qr.apply_mask(pattern),
            None => {
                apply_best_mask(&mut qr);
            }
        }
        Ok(qr)
    }

    // Everything up to mask selection: encode, split into protected
    // blocks, interleave and place the payload on the grid.
    pub(crate) fn build_unmasked(&self) -> QRResult<QR> {
        if let Some(v) = self.version {
            if !(1..=40).contains(&*v) {
                return Err(QRError::InvalidVersion);
            }
        }

        let (encoded, version) = match self.version {
            Some(v) => (encode_with_version(self.data, self.ec_level, v)?, v),
            None => encode(self.data, self.ec_level)?,
        };

        let blocks = Self::protect(encoded.data(), version, self.ec_level);
        let payload = Self::interleave(&blocks, version);

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);
        Ok(qr)
    }

    // Splits the data codewords into blocks and computes the ecc of each.
    fn protect(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<Block> {
        let ec_len = version.ecc_per_block(ec_level);
        Self::split_blocks(data, version, ec_level)
            .into_iter()
            .map(|d| Block { data: d, ecc: ecc(d, ec_len) })
            .collect()
    }

    // Block layout: the shorter blocks come first, the rest hold one byte
    // more, together covering the data capacity exactly.
    pub(crate) fn split_blocks(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
        let count = version.block_count(ec_level);
        let capacity = version.data_codewords(ec_level);

        debug_assert!(
            capacity == data.len(),
            "Data len doesn't match data capacity: Data len {}, Capacity {capacity}",
            data.len(),
        );

        let short_size = capacity / count;
        if capacity % count == 0 {
            return data.chunks(short_size).collect();
        }

        let short_count = count * (short_size + 1) - capacity;
        let split = short_count * short_size;
        let mut blocks = Vec::with_capacity(count);
        blocks.extend(data[..split].chunks(short_size));
        blocks.extend(data[split..].chunks(short_size + 1));
        blocks
    }

    // Data codewords column-major across blocks, then ecc codewords the
    // same way. Short blocks simply run out before the long ones.
    fn interleave(blocks: &[Block], version: Version) -> BitStream {
        let mut payload = BitStream::new(version.total_codewords() << 3);

        let longest = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
        for i in 0..longest {
            for block in blocks {
                if let Some(&byte) = block.data.get(i) {
                    payload.push_bits(byte, 8);
                }
            }
        }

        let ec_len = blocks.first().map_or(0, |b| b.ecc.len());
        debug_assert!(
            blocks.iter().all(|b| b.ecc.len() == ec_len),
            "All blocks must share one ecc length"
        );
        for i in 0..ec_len {
            for block in blocks {
                payload.push_bits(block.ecc[i], 8);
            }
        }

        debug_assert!(
            payload.len() == payload.capacity(),
            "Interleaved payload must fill the symbol: {} of {} bits",
            payload.len(),
            payload.capacity()
        );
        payload
    }

    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        let p = version.misdecode_protection(ec_level);
        let ec_bytes = version.block_count(ec_level) * version.ecc_per_block(ec_level);
        debug_assert!(ec_bytes >= p, "Protection codewords exceed ecc bytes: {ec_bytes} < {p}");
        (ec_bytes - p) / 2
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::QRBuilder;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_ecc_single_block() {
        // "HELLO WORLD" encoded at version 1, level M
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let blocks = QRBuilder::protect(msg, Version(1), ECLevel::M);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].data, msg);
        assert_eq!(blocks[0].ecc, b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17");
    }

    #[test]
    fn test_ecc_four_blocks() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let expected: [&[u8]; 4] = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let blocks = QRBuilder::protect(msg, Version(5), ECLevel::Q);
        assert_eq!(blocks.len(), 4);
        for (block, exp) in blocks.iter().zip(expected) {
            assert_eq!(block.ecc, exp);
        }
    }

    #[test]
    fn test_interleave_order() {
        // Version 5 level Q splits 62 data codewords into 15+15+16+16
        let version = Version(5);
        let data = (0u8..62).collect::<Vec<_>>();
        let blocks = QRBuilder::protect(&data, version, ECLevel::Q);
        let payload = QRBuilder::interleave(&blocks, version);
        assert_eq!(payload.len(), version.total_codewords() << 3);
        // One codeword from each block in turn
        assert_eq!(payload.data()[..8], [0, 15, 30, 46, 1, 16, 31, 47]);
        // The short blocks run out and the long blocks finish alone
        assert_eq!(payload.data()[60..62], [45, 61]);
        // Then the ecc phase starts with the first ecc byte of each block
        let ecc_heads = [blocks[0].ecc[0], blocks[1].ecc[0], blocks[2].ecc[0], blocks[3].ecc[0]];
        assert_eq!(payload.data()[62..66], ecc_heads);
    }

    #[test_case(Version(1), ECLevel::H, &[9])]
    #[test_case(Version(3), ECLevel::Q, &[17, 17])]
    #[test_case(Version(5), ECLevel::Q, &[15, 15, 16, 16])]
    #[test_case(Version(8), ECLevel::M, &[38, 38, 39, 39])]
    #[test_case(Version(11), ECLevel::M, &[50, 51, 51, 51, 51])]
    #[test_case(Version(40), ECLevel::H, &[15; 20])]
    fn test_split_blocks(version: Version, ec_level: ECLevel, exp_heads: &[usize]) {
        let capacity = version.data_codewords(ec_level);
        let data = vec![0u8; capacity];
        let blocks = QRBuilder::split_blocks(&data, version, ec_level);
        assert_eq!(blocks.len(), version.block_count(ec_level));
        assert_eq!(blocks.iter().map(|b| b.len()).sum::<usize>(), capacity);
        let heads = blocks.iter().take(exp_heads.len()).map(|b| b.len()).collect::<Vec<_>>();
        assert_eq!(heads, exp_heads);
    }

    #[test]
    fn test_split_blocks_all_versions() {
        for v in 1..=40 {
            let version = Version(v);
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let capacity = version.data_codewords(ecl);
                let data = vec![0u8; capacity];
                let blocks = QRBuilder::split_blocks(&data, version, ecl);
                let short = capacity / version.block_count(ecl);
                assert!(blocks.iter().all(|b| b.len() == short || b.len() == short + 1));
                assert!(blocks.windows(2).all(|w| w[0].len() <= w[1].len()));
            }
        }
    }

    #[test]
    fn test_ec_capacity() {
        assert_eq!(QRBuilder::ec_capacity(Version(1), ECLevel::L), 2);
        assert_eq!(QRBuilder::ec_capacity(Version(1), ECLevel::M), 4);
        assert_eq!(QRBuilder::ec_capacity(Version(1), ECLevel::H), 8);
        assert_eq!(QRBuilder::ec_capacity(Version(3), ECLevel::L), 7);
        assert_eq!(QRBuilder::ec_capacity(Version(40), ECLevel::H), 1215);
    }
}
