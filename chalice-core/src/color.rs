//! Color derivation for the watchface.
//!
//! The companion app sends the face color as a packed 24-bit hex integer.
//! Every other color on the face is derived from it: the accent is drawn
//! at random from a small high-saturation palette (and re-drawn until it
//! differs from the face), and hand/label colors are whichever of black or
//! white is legible over their background.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};
use rand_core::RngCore;

/// Decode a packed `0xRRGGBB` integer, the wire and persisted format.
pub fn from_hex(hex: u32) -> Rgb565 {
    Rgb888::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8).into()
}

/// Black or white, whichever contrasts with `bg`.
pub fn legible_over(bg: Rgb565) -> Rgb565 {
    let rgb = Rgb888::from(bg);
    // ITU-R BT.601 luma, integer arithmetic.
    let luma = (299 * rgb.r() as u32 + 587 * rgb.g() as u32 + 114 * rgb.b() as u32) / 1000;
    if luma >= 128 {
        Rgb565::BLACK
    } else {
        Rgb565::WHITE
    }
}

/// One of the 64 colors with 2 bits per channel, drawn uniformly.
pub fn random_accent(rng: &mut impl RngCore) -> Rgb565 {
    fn level(bits: u32) -> u8 {
        (bits as u8 & 0b11) * 85
    }
    let bits = rng.next_u32();
    Rgb888::new(level(bits >> 4), level(bits >> 2), level(bits)).into()
}

/// Sample accent colors until one differs from the face color.
pub fn pick_accent(face: Rgb565, rng: &mut impl RngCore) -> Rgb565 {
    loop {
        let accent = random_accent(rng);
        if accent != face {
            return accent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_xoshiro::rand_core::SeedableRng;
    use rand_xoshiro::Xoroshiro128StarStar;

    #[test]
    fn hex_decode_hits_the_primaries() {
        assert_eq!(from_hex(0x000000), Rgb565::BLACK);
        assert_eq!(from_hex(0xFF0000), Rgb565::RED);
        assert_eq!(from_hex(0x00FF00), Rgb565::GREEN);
        assert_eq!(from_hex(0x0000FF), Rgb565::BLUE);
        assert_eq!(from_hex(0xFFFFFF), Rgb565::WHITE);
    }

    #[test]
    fn legible_over_flips_between_black_and_white() {
        assert_eq!(legible_over(Rgb565::BLACK), Rgb565::WHITE);
        assert_eq!(legible_over(Rgb565::WHITE), Rgb565::BLACK);
        assert_eq!(legible_over(from_hex(0x000080)), Rgb565::WHITE);
        assert_eq!(legible_over(from_hex(0xFFFF00)), Rgb565::BLACK);
    }

    #[test]
    fn accent_never_equals_face() {
        let mut rng = Xoroshiro128StarStar::seed_from_u64(0x1234);
        // Every palette color as the face color, many resamples each.
        for r in 0..4u32 {
            for g in 0..4u32 {
                for b in 0..4u32 {
                    let face = from_hex(r * 85 << 16 | g * 85 << 8 | b * 85);
                    for _ in 0..100 {
                        assert_ne!(pick_accent(face, &mut rng), face);
                    }
                }
            }
        }
    }

    #[test]
    fn random_accent_stays_in_the_palette() {
        let mut palette = [Rgb565::BLACK; 64];
        for i in 0..64u32 {
            let level = |bits: u32| (bits as u8 & 0b11) * 85;
            palette[i as usize] = Rgb888::new(level(i >> 4), level(i >> 2), level(i)).into();
        }

        let mut rng = Xoroshiro128StarStar::seed_from_u64(7);
        for _ in 0..1000 {
            let c = random_accent(&mut rng);
            assert!(palette.contains(&c));
        }
    }
}
