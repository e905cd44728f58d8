mod galois;

pub(crate) use galois::G;

// Error correction codeword generator
//------------------------------------------------------------------------------

// Polynomial long division of the data by the generator polynomial; the
// remainder is the ecc codewords.
pub fn ecc(data: &[u8], ec_len: usize) -> Vec<u8> {
    let gen = gen_poly(ec_len);
    let mut msg = vec![0u8; data.len() + ec_len];
    msg[..data.len()].copy_from_slice(data);
    for i in 0..data.len() {
        if msg[i] == 0 {
            continue;
        }
        let lead = G(msg[i]).log();
        for (j, &alpha) in gen.iter().enumerate() {
            msg[i + 1 + j] ^= G::gen_pow(alpha as usize + lead).0;
        }
    }
    msg.split_off(data.len())
}

// Generator polynomial coefficients as alpha exponents, leading term
// excluded, highest power first. Only the lengths version 1-40 symbols use.
fn gen_poly(ec_len: usize) -> &'static [u8] {
    match ec_len {
        7 => &GEN_POLY_7,
        10 => &GEN_POLY_10,
        13 => &GEN_POLY_13,
        15 => &GEN_POLY_15,
        16 => &GEN_POLY_16,
        17 => &GEN_POLY_17,
        18 => &GEN_POLY_18,
        20 => &GEN_POLY_20,
        22 => &GEN_POLY_22,
        24 => &GEN_POLY_24,
        26 => &GEN_POLY_26,
        28 => &GEN_POLY_28,
        30 => &GEN_POLY_30,
        _ => unreachable!("No generator polynomial of degree {ec_len}"),
    }
}


// Global constants
//------------------------------------------------------------------------------

static GEN_POLY_7: [u8; 7] = [87, 229, 146, 149, 238, 102, 21];

static GEN_POLY_10: [u8; 10] = [251, 67, 46, 61, 118, 70, 64, 94, 32, 45];

static GEN_POLY_13: [u8; 13] = [74, 152, 176, 100, 86, 100, 106, 104, 130, 218, 206, 140, 78];

static GEN_POLY_15: [u8; 15] = [8, 183, 61, 91, 202, 37, 51, 58, 58, 237, 140, 124, 5, 99, 105];

static GEN_POLY_16: [u8; 16] =
    [120, 104, 107, 109, 102, 161, 76, 3, 91, 191, 147, 169, 182, 194, 225, 120];

static GEN_POLY_17: [u8; 17] =
    [43, 139, 206, 78, 43, 239, 123, 206, 214, 147, 24, 99, 150, 39, 243, 163, 136];

static GEN_POLY_18: [u8; 18] =
    [215, 234, 158, 94, 184, 97, 118, 170, 79, 187, 152, 148, 252, 179, 5, 98, 96, 153];

static GEN_POLY_20: [u8; 20] = [
    17, 60, 79, 50, 61, 163, 26, 187, 202, 180, 221, 225, 83, 239, 156, 164, 212, 212, 188, 190,
];

static GEN_POLY_22: [u8; 22] = [
    210, 171, 247, 242, 93, 230, 14, 109, 221, 53, 200, 74, 8, 172, 98, 80, 219, 134, 160, 105,
    165, 231,
];

static GEN_POLY_24: [u8; 24] = [
    229, 121, 135, 48, 211, 117, 251, 126, 159, 180, 169, 152, 192, 226, 228, 218, 111, 0, 117,
    232, 87, 96, 227, 21,
];

static GEN_POLY_26: [u8; 26] = [
    173, 125, 158, 2, 103, 182, 118, 17, 145, 201, 111, 28, 165, 53, 161, 21, 245, 142, 13, 102,
    48, 227, 153, 145, 218, 70,
];

static GEN_POLY_28: [u8; 28] = [
    168, 223, 200, 104, 224, 234, 108, 180, 110, 190, 195, 147, 205, 27, 232, 201, 21, 43, 245,
    87, 42, 195, 212, 119, 242, 37, 9, 123,
];

static GEN_POLY_30: [u8; 30] = [
    41, 173, 145, 152, 216, 31, 179, 182, 50, 48, 110, 86, 239, 96, 222, 125, 42, 173, 226, 193,
    224, 130, 156, 37, 251, 216, 238, 40, 192, 180,
];
