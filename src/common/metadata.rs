use std::ops::{Deref, Not};

use crate::common::codec::Mode;
use crate::common::mask::MaskPattern;

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Version(pub usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub const fn width(self) -> usize {
        debug_assert!(1 <= self.0 && self.0 <= 40, "Invalid version");
        self.0 * 4 + 17
    }

    pub fn alignment_pattern(self) -> &'static [usize] {
        debug_assert!(1 <= self.0 && self.0 <= 40, "Invalid version");
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    // Codeword capacity of the symbol, data and ecc together. Counts the
    // modules left over once finders, separators, timing, alignment and the
    // info areas are taken out of the grid.
    pub fn total_codewords(self) -> usize {
        let w = self.width();
        let mut fixed = 225 + 8 * self.0;
        if self.0 >= 7 {
            fixed += 36;
        }
        let a = self.alignment_pattern().len();
        if a > 0 {
            fixed += (a - 1) * (a - 1) * 25 + (a - 2) * 40;
        }
        (w * w - fixed) >> 3
    }

    pub fn data_codewords(self, ec_level: ECLevel) -> usize {
        debug_assert!(1 <= self.0 && self.0 <= 40, "Invalid version");
        DATA_CODEWORDS[self.0 - 1][ec_level as usize]
    }

    pub fn data_bit_capacity(self, ec_level: ECLevel) -> usize {
        self.data_codewords(ec_level) << 3
    }

    pub fn block_count(self, ec_level: ECLevel) -> usize {
        debug_assert!(1 <= self.0 && self.0 <= 40, "Invalid version");
        BLOCK_COUNTS[self.0 - 1][ec_level as usize]
    }

    pub fn ecc_per_block(self, ec_level: ECLevel) -> usize {
        (self.total_codewords() - self.data_codewords(ec_level)) / self.block_count(ec_level)
    }

    // Misdecode protection codewords p: ecc codewords beyond the pairs that
    // correct errors, present only in the small low-ecc symbols.
    pub fn misdecode_protection(self, ec_level: ECLevel) -> usize {
        match (self.0, ec_level) {
            (1, ECLevel::L) => 3,
            (1, ECLevel::M) | (2, ECLevel::L) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        }
    }

    pub fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        debug_assert!(1 <= self.0 && self.0 <= 40, "Invalid version");
        match self.0 {
            1..=9 => match mode {
                Mode::Numeric => 10,
                Mode::Alphanumeric => 9,
                Mode::Byte => 8,
            },
            10..=26 => match mode {
                Mode::Numeric => 12,
                Mode::Alphanumeric => 11,
                Mode::Byte => 16,
            },
            _ => match mode {
                Mode::Numeric => 14,
                Mode::Alphanumeric => 13,
                Mode::Byte => 16,
            },
        }
    }
}


// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

// Format & version information
//------------------------------------------------------------------------------

pub fn format_info(ec_level: ECLevel, mask_pattern: MaskPattern) -> u32 {
    let format_data = ((ec_level as usize) ^ 1) << 3 | (*mask_pattern as usize);
    FORMAT_INFOS[format_data]
}

pub fn version_info(version: Version) -> u32 {
    debug_assert!(matches!(*version, 7..=40), "Invalid version");
    VERSION_INFOS[*version - 7]
}

// Module positions of format info bit `bit` (0 = least significant), for
// the copy around the top left finder and the copy split across the other
// two. The module at (width - 8, 8) between the two halves of the second
// copy is the fixed dark module.
pub fn format_info_coords(bit: usize, width: usize) -> [(usize, usize); 2] {
    debug_assert!(bit < FORMAT_INFO_BIT_LEN, "Invalid format info bit {bit}");
    let main = match bit {
        0..=5 => (bit, 8),
        6 => (7, 8),
        7 => (8, 8),
        8 => (8, 7),
        _ => (8, 14 - bit),
    };
    let split = if bit < 8 { (8, width - 1 - bit) } else { (width - 15 + bit, 8) };
    [main, split]
}

// Module positions of version info bit `bit` (0 = least significant) in
// the two mirrored 3x6 blocks beside the top right and bottom left
// finders.
pub fn version_info_coords(bit: usize, width: usize) -> [(usize, usize); 2] {
    debug_assert!(bit < VERSION_INFO_BIT_LEN, "Invalid version info bit {bit}");
    let (r, c) = (bit / 3, width - 11 + bit % 3);
    [(r, c), (c, r)]
}


// Global constants
//------------------------------------------------------------------------------

pub static FORMAT_INFO_BIT_LEN: usize = 15;

pub static VERSION_INFO_BIT_LEN: usize = 18;

static ALIGNMENT_PATTERN_POSITIONS: [&[usize]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

static VERSION_INFOS: [u32; 34] = [
    0x07c94, 0x085bc, 0x09a99, 0x0a4d3, 0x0bbf6, 0x0c762, 0x0d847, 0x0e60d, 0x0f928, 0x10b78,
    0x1145d, 0x12a17, 0x13532, 0x149a6, 0x15683, 0x168c9, 0x177ec, 0x18ec4, 0x191e1, 0x1afab,
    0x1b08e, 0x1cc1a, 0x1d33f, 0x1ed75, 0x1f250, 0x209d5, 0x216f0, 0x228ba, 0x2379f, 0x24b0b,
    0x2542e, 0x26a64, 0x27541, 0x28c69,
];

static FORMAT_INFOS: [u32; 32] = [
    0x5412, 0x5125, 0x5e7c, 0x5b4b, 0x45f9, 0x40ce, 0x4f97, 0x4aa0, 0x77c4, 0x72f3, 0x7daa, 0x789d,
    0x662f, 0x6318, 0x6c41, 0x6976, 0x1689, 0x13be, 0x1ce7, 0x19d0, 0x0762, 0x0255, 0x0d0c, 0x083b,
    0x355f, 0x3068, 0x3f31, 0x3a06, 0x24b4, 0x2183, 0x2eda, 0x2bed,
];

// Data codewords per error level per version
static DATA_CODEWORDS: [[usize; 4]; 40] = [
    [19, 16, 13, 9],
    [34, 28, 22, 16],
    [55, 44, 34, 26],
    [80, 64, 48, 36],
    [108, 86, 62, 46],
    [136, 108, 76, 60],
    [156, 124, 88, 66],
    [194, 154, 110, 86],
    [232, 182, 132, 100],
    [274, 216, 154, 122],
    [324, 254, 180, 140],
    [370, 290, 206, 158],
    [428, 334, 244, 180],
    [461, 365, 261, 197],
    [523, 415, 295, 223],
    [589, 453, 325, 253],
    [647, 507, 367, 283],
    [721, 563, 397, 313],
    [795, 627, 445, 341],
    [861, 669, 485, 385],
    [932, 714, 512, 406],
    [1006, 782, 568, 442],
    [1094, 860, 614, 464],
    [1174, 914, 664, 514],
    [1276, 1000, 718, 538],
    [1370, 1062, 754, 596],
    [1468, 1128, 808, 628],
    [1531, 1193, 871, 661],
    [1631, 1267, 911, 701],
    [1735, 1373, 985, 745],
    [1843, 1455, 1033, 793],
    [1955, 1541, 1115, 845],
    [2071, 1631, 1171, 901],
    [2191, 1725, 1231, 961],
    [2306, 1812, 1286, 986],
    [2434, 1914, 1354, 1054],
    [2566, 1992, 1426, 1096],
    [2702, 2102, 1502, 1142],
    [2812, 2216, 1582, 1222],
    [2956, 2334, 1666, 1276],
];

// Error correction block count per error level per version
static BLOCK_COUNTS: [[usize; 4]; 40] = [
    [1, 1, 1, 1],
    [1, 1, 1, 1],
    [1, 1, 2, 2],
    [1, 2, 2, 4],
    [1, 2, 4, 4],
    [2, 4, 4, 4],
    [2, 4, 6, 5],
    [2, 4, 6, 6],
    [2, 5, 8, 8],
    [4, 5, 8, 8],
    [4, 5, 8, 11],
    [4, 8, 10, 11],
    [4, 9, 12, 16],
    [4, 9, 16, 16],
    [6, 10, 12, 18],
    [6, 10, 17, 16],
    [6, 11, 16, 19],
    [6, 13, 18, 21],
    [7, 14, 21, 25],
    [8, 16, 20, 25],
    [8, 17, 23, 25],
    [9, 17, 23, 34],
    [9, 18, 25, 30],
    [10, 20, 27, 32],
    [12, 21, 29, 35],
    [12, 23, 34, 37],
    [12, 25, 34, 40],
    [13, 26, 35, 42],
    [14, 28, 38, 45],
    [15, 29, 40, 48],
    [16, 31, 43, 51],
    [17, 33, 45, 54],
    [18, 35, 48, 57],
    [19, 37, 51, 60],
    [19, 38, 53, 63],
    [20, 40, 56, 66],
    [21, 43, 59, 70],
    [22, 45, 62, 74],
    [24, 47, 65, 77],
    [25, 49, 68, 81],
];
