//! # CRC-16/MCRF4XX
//!
//! The checksum folded into every frame: `CRC.calculate(header_without_stx || payload)`, then
//! `CRC.accumulate(schema.crc_extra(), crc)` — see [MAVLink's checksum
//! definition](https://mavlink.io/en/guide/serialization.html#checksum).

const SEED: u16 = 0xFFFF;

/// Single-byte update primitive. Seed a running CRC with [`SEED`], then fold bytes one at a time.
pub fn accumulate(byte: u8, crc: u16) -> u16 {
    let table_index = (byte ^ (crc as u8)) as usize;
    (crc >> 8) ^ table()[table_index]
}

/// CRC-16/MCRF4XX over a full byte sequence, seeded with [`SEED`].
///
/// # Examples
///
/// ```
/// use mavlib_core::crc;
///
/// assert_eq!(crc::calculate(b"123456789"), 0x6F91);
/// assert_eq!(crc::calculate(&[]), 0xFFFF);
/// ```
pub fn calculate(data: &[u8]) -> u16 {
    data.iter().fold(SEED, |crc, &byte| accumulate(byte, crc))
}

/// Lazily built 256-entry table: `table[k]` is the contribution of the post-XOR nibble-expanded
/// byte `k`, independent of which byte or CRC state produced it. Computed once per process; bulk
/// [`calculate`] and incremental [`accumulate`] both route through it, so they are guaranteed to
/// agree.
fn table() -> &'static [u16; 256] {
    static TABLE: std::sync::OnceLock<[u16; 256]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u16; 256];
        let mut k = 0usize;
        while k < 256 {
            let mut ch = k as u8;
            ch ^= ch << 4;
            let ch = ch as u16;
            table[k] = (ch << 8) ^ (ch << 3) ^ (ch >> 4);
            k += 1;
        }
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate_naive(byte: u8, crc: u16) -> u16 {
        let mut ch = byte ^ (crc as u8);
        ch ^= ch << 4;
        let ch = ch as u16;
        (crc >> 8) ^ (ch << 8) ^ (ch << 3) ^ (ch >> 4)
    }

    #[test]
    fn known_answers() {
        assert_eq!(calculate(b"123456789"), 0x6F91);
        assert_eq!(calculate(b"Hello, MAVLink!"), 0xE07D);
        assert_eq!(calculate(&[]), 0xFFFF);
    }

    #[test]
    fn table_driven_matches_bitwise_reference() {
        let data = [124, 12, 22, 34, 2, 148, 82, 201, 72, 0, 18, 215, 37, 63u8];

        let mut bitwise = SEED;
        for &byte in &data {
            bitwise = accumulate_naive(byte, bitwise);
        }

        assert_eq!(calculate(&data), bitwise);
    }

    #[test]
    fn calculate_equals_fold_of_accumulate() {
        let data = b"arbitrary payload bytes, including \x00\xff edge values";
        let folded = data.iter().fold(SEED, |crc, &b| accumulate(b, crc));
        assert_eq!(calculate(data), folded);
    }

    #[test]
    fn split_digests_agree_with_bulk() {
        let data = [124, 12, 22, 34, 2, 148, 82, 201, 72, 0, 18, 215, 37, 63u8];
        let split_at = data.len() / 2;

        let bulk = calculate(&data);
        let mut seq = SEED;
        for &b in &data[..split_at] {
            seq = accumulate(b, seq);
        }
        for &b in &data[split_at..] {
            seq = accumulate(b, seq);
        }

        assert_eq!(bulk, seq);
    }
}
