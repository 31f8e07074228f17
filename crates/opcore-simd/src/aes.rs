//! AES round primitives over a 16-byte state held in a `u128`, byte i
//! holding state row `i % 4` of column `i / 4`. The S-boxes are derived
//! at compile time from the GF(2^8) inverse and affine transform.

use crate::{bytes_to_u128, u128_to_bytes, u128_to_u32x4, u32x4_to_u128};

const fn xtime(a: u8) -> u8 {
    (a << 1) ^ (((a >> 7) & 1) * 0x1B)
}

const fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut out = 0;
    while b != 0 {
        if b & 1 != 0 {
            out ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    out
}

// a^254 = a^-1 in GF(2^8); maps 0 to 0.
const fn gf_inv(a: u8) -> u8 {
    let mut out = 1;
    let mut i = 0;
    while i < 254 {
        out = gmul(out, a);
        i += 1;
    }
    out
}

const SBOX: [u8; 256] = {
    let mut t = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let x = gf_inv(i as u8);
        t[i] = x ^ x.rotate_left(1) ^ x.rotate_left(2) ^ x.rotate_left(3) ^ x.rotate_left(4) ^ 0x63;
        i += 1;
    }
    t
};

const INV_SBOX: [u8; 256] = {
    let mut t = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        t[SBOX[i] as usize] = i as u8;
        i += 1;
    }
    t
};

pub fn sub_bytes(state: u128) -> u128 {
    let mut b = u128_to_bytes(state);
    for x in b.iter_mut() {
        *x = SBOX[*x as usize];
    }
    bytes_to_u128(b)
}

pub fn inv_sub_bytes(state: u128) -> u128 {
    let mut b = u128_to_bytes(state);
    for x in b.iter_mut() {
        *x = INV_SBOX[*x as usize];
    }
    bytes_to_u128(b)
}

/// Row r rotates left by r columns.
pub fn shift_rows(state: u128) -> u128 {
    let b = u128_to_bytes(state);
    let mut out = [0u8; 16];
    for c in 0..4 {
        for r in 0..4 {
            out[c * 4 + r] = b[(c + r) % 4 * 4 + r];
        }
    }
    bytes_to_u128(out)
}

pub fn inv_shift_rows(state: u128) -> u128 {
    let b = u128_to_bytes(state);
    let mut out = [0u8; 16];
    for c in 0..4 {
        for r in 0..4 {
            out[(c + r) % 4 * 4 + r] = b[c * 4 + r];
        }
    }
    bytes_to_u128(out)
}

fn mix_column(col: [u8; 4], matrix: [u8; 4]) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (r, o) in out.iter_mut().enumerate() {
        for c in 0..4 {
            *o ^= gmul(matrix[(c + 4 - r) % 4], col[c]);
        }
    }
    out
}

fn mix_columns_with(state: u128, matrix: [u8; 4]) -> u128 {
    let b = u128_to_bytes(state);
    let mut out = [0u8; 16];
    for c in 0..4 {
        let mut col = [0u8; 4];
        col.copy_from_slice(&b[c * 4..c * 4 + 4]);
        out[c * 4..c * 4 + 4].copy_from_slice(&mix_column(col, matrix));
    }
    bytes_to_u128(out)
}

pub fn mix_columns(state: u128) -> u128 {
    mix_columns_with(state, [2, 3, 1, 1])
}

pub fn inv_mix_columns(state: u128) -> u128 {
    mix_columns_with(state, [0x0E, 0x0B, 0x0D, 0x09])
}

pub fn aesenc(dst: &mut u128, round_key: u128) {
    *dst = mix_columns(sub_bytes(shift_rows(*dst))) ^ round_key;
}

pub fn aesenclast(dst: &mut u128, round_key: u128) {
    *dst = sub_bytes(shift_rows(*dst)) ^ round_key;
}

pub fn aesdec(dst: &mut u128, round_key: u128) {
    *dst = inv_mix_columns(inv_sub_bytes(inv_shift_rows(*dst))) ^ round_key;
}

pub fn aesdeclast(dst: &mut u128, round_key: u128) {
    *dst = inv_sub_bytes(inv_shift_rows(*dst)) ^ round_key;
}

/// AESIMC: transforms an encryption round key for the equivalent
/// inverse cipher.
pub fn aesimc(src: u128) -> u128 {
    inv_mix_columns(src)
}

fn sub_word(w: u32) -> u32 {
    u32::from_le_bytes(w.to_le_bytes().map(|b| SBOX[b as usize]))
}

fn rot_word(w: u32) -> u32 {
    w.rotate_right(8)
}

/// AESKEYGENASSIST: S-box pass and rotate over dwords 1 and 3, with the
/// round constant folded into the rotated copies.
pub fn aeskeygenassist(src: u128, rcon: u8) -> u128 {
    let w = u128_to_u32x4(src);
    let s1 = sub_word(w[1]);
    let s3 = sub_word(w[3]);
    u32x4_to_u128([
        s1,
        rot_word(s1) ^ rcon as u32,
        s3,
        rot_word(s3) ^ rcon as u32,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1B, 0x36];

    fn expand_key(key: u128) -> [u128; 11] {
        let mut keys = [0u128; 11];
        keys[0] = key;
        for i in 0..10 {
            let assist = u128_to_u32x4(aeskeygenassist(keys[i], RCON[i]));
            let prev = u128_to_u32x4(keys[i]);
            let mut next = [0u32; 4];
            next[0] = prev[0] ^ assist[3];
            next[1] = prev[1] ^ next[0];
            next[2] = prev[2] ^ next[1];
            next[3] = prev[3] ^ next[2];
            keys[i + 1] = u32x4_to_u128(next);
        }
        keys
    }

    #[test]
    fn sbox_spot_values() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x01], 0x7C);
        assert_eq!(SBOX[0x53], 0xED);
        assert_eq!(SBOX[0xFF], 0x16);
        for i in 0..=255u8 {
            assert_eq!(INV_SBOX[SBOX[i as usize] as usize], i);
        }
    }

    #[test]
    fn mix_columns_inverts() {
        let v = 0x0123_4567_89AB_CDEF_0011_2233_4455_6677u128;
        assert_eq!(inv_mix_columns(mix_columns(v)), v);
        assert_eq!(inv_shift_rows(shift_rows(v)), v);
        assert_eq!(inv_sub_bytes(sub_bytes(v)), v);
    }

    #[test]
    fn fips197_appendix_b_vector() {
        let key = u128::from_le_bytes([
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F,
        ]);
        let plaintext = u128::from_le_bytes([
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ]);
        let expected = u128::from_le_bytes([
            0x69, 0xC4, 0xE0, 0xD8, 0x6A, 0x7B, 0x04, 0x30, 0xD8, 0xCD, 0xB7, 0x80, 0x70, 0xB4,
            0xC5, 0x5A,
        ]);

        let keys = expand_key(key);
        let mut state = plaintext ^ keys[0];
        for k in &keys[1..10] {
            aesenc(&mut state, *k);
        }
        aesenclast(&mut state, keys[10]);
        assert_eq!(state, expected);
    }

    #[test]
    fn equivalent_inverse_cipher_round_trips() {
        let key = 0x0F0E_0D0C_0B0A_0908_0706_0504_0302_0100u128;
        let block = 0xDEAD_BEEF_CAFE_F00D_0123_4567_89AB_CDEFu128;

        let keys = expand_key(key);
        let mut state = block ^ keys[0];
        for k in &keys[1..10] {
            aesenc(&mut state, *k);
        }
        aesenclast(&mut state, keys[10]);

        // Decrypt with round keys reversed and the middle ones passed
        // through AESIMC.
        let mut back = state ^ keys[10];
        for k in keys[1..10].iter().rev() {
            aesdec(&mut back, aesimc(*k));
        }
        aesdeclast(&mut back, keys[0]);
        assert_eq!(back, block);
    }

    #[test]
    fn keygenassist_dword_layout() {
        let src = u32x4_to_u128([0, 0x0000_0001, 0, 0x1000_0000]);
        let out = u128_to_u32x4(aeskeygenassist(src, 0x01));
        assert_eq!(out[0], sub_word(0x0000_0001));
        assert_eq!(out[1], sub_word(0x0000_0001).rotate_right(8) ^ 1);
        assert_eq!(out[2], sub_word(0x1000_0000));
        assert_eq!(out[3], sub_word(0x1000_0000).rotate_right(8) ^ 1);
    }
}
