//! End-to-end decoding through the factory, one test per photometric
//! behavior the decoders guarantee.

use approx::assert_abs_diff_eq;
use half::f16;
use phototiff::decoders::PaletteDecoder;
use phototiff::{
    create, create_for_frame, create_planar, BitsPerSample, ByteOrder, ColorMap, DecoderOptions,
    ExtraSamples, FrameDecoder, FrameTags, Photometric, PlanarConfiguration, Rational,
    TiffColorDecoder, TiffColorType,
};
use phototiff_core::{Image, Luma, Rgb, Rgba};

fn tags(photometric: Photometric, bits: &[u16]) -> FrameTags {
    FrameTags::new(photometric, BitsPerSample::new(bits).expect("bits per sample"))
}

fn chunky(tags: &FrameTags) -> TiffColorDecoder {
    match create_for_frame(tags, &DecoderOptions::default()).expect("create decoder") {
        FrameDecoder::Chunky(decoder) => decoder,
        FrameDecoder::Planar(d) => panic!("expected chunky decoder, got {:?}", d.color_type()),
    }
}

/// Packs one `bits`-wide sample MSB-first into a padded single-pixel row.
fn one_sample_row(value: u32, bits: u32) -> Vec<u8> {
    let bytes = bits.div_ceil(8);
    let aligned = (value as u64) << (bytes * 8 - bits);
    (0..bytes).rev().map(|i| (aligned >> (i * 8)) as u8).collect()
}

#[test]
fn gray_intensity_for_every_depth() {
    for bits in [1u16, 2, 3, 4, 6, 8, 10, 12, 16, 24, 32] {
        let max = ((1u64 << bits) - 1) as u32;
        let values = [0, max / 3, max / 2, max];
        let data: Vec<u8> = values
            .iter()
            .flat_map(|&v| one_sample_row(v, bits as u32))
            .collect();

        for photometric in [Photometric::BlackIsZero, Photometric::WhiteIsZero] {
            let frame = tags(photometric, &[bits]).with_byte_order(ByteOrder::BigEndian);
            let decoder = chunky(&frame);
            let mut image: Image<Luma<f32>> = Image::new(1, values.len() as u32);
            decoder.decode(&data, &mut image.view_mut(), 0, 0, 1, values.len() as u32);

            for (row, &v) in values.iter().enumerate() {
                let intensity = (v as f64 / max as f64) as f32;
                let expected = match photometric {
                    Photometric::WhiteIsZero => 1.0 - intensity,
                    _ => intensity,
                };
                let got = image.pixel(0, row as u32).0;
                assert!(
                    (got - expected).abs() < 1e-5,
                    "{photometric:?} {bits}-bit value {v}: got {got}, expected {expected}"
                );
            }
        }
    }
}

#[test]
fn gray_fast_paths_are_exact() {
    let frame = tags(Photometric::BlackIsZero, &[16]).with_byte_order(ByteOrder::BigEndian);
    let mut image: Image<Luma<u16>> = Image::new(3, 1);
    chunky(&frame).decode(&[0, 0, 0x12, 0x34, 0xFF, 0xFF], &mut image.view_mut(), 0, 0, 3, 1);
    assert_eq!(image.row(0), &[Luma(0), Luma(0x1234), Luma(0xFFFF)]);

    let frame = tags(Photometric::BlackIsZero, &[4]);
    let mut image: Image<Luma<u8>> = Image::new(2, 1);
    chunky(&frame).decode(&[0xF0], &mut image.view_mut(), 0, 0, 2, 1);
    assert_eq!(image.row(0), &[Luma(255), Luma(0)]);
}

#[test]
fn rgb888_is_lossless() {
    let (width, height) = (5u32, 3u32);
    let source: Vec<[u8; 3]> = (0..width * height)
        .map(|i| [(i * 17) as u8, (255 - i * 11) as u8, (i * i) as u8])
        .collect();
    let data: Vec<u8> = source.iter().flatten().copied().collect();

    let decoder = chunky(&tags(Photometric::Rgb, &[8, 8, 8]));
    assert_eq!(decoder.color_type(), TiffColorType::Rgb888);
    let mut image: Image<Rgb<u8>> = Image::new(width, height);
    decoder.decode(&data, &mut image.view_mut(), 0, 0, width, height);

    let decoded: Vec<[u8; 3]> = image.data().iter().map(|p| [p.r, p.g, p.b]).collect();
    assert_eq!(decoded, source);
}

#[test]
fn palette_four_entries() {
    let map = ColorMap::new(
        vec![0, 65535, 0, 65535],
        vec![0, 0, 65535, 65535],
        vec![0, 0, 0, 65535],
    )
    .expect("color map");
    let frame = tags(Photometric::PaletteColor, &[2]).with_color_map(map.clone());
    let decoder = chunky(&frame);
    assert_eq!(decoder.color_type(), TiffColorType::PaletteColor);

    let mut image: Image<Rgba<u8>> = Image::new(4, 1);
    decoder.decode(&[0b00_01_10_11], &mut image.view_mut(), 0, 0, 4, 1);
    assert_eq!(
        image.row(0),
        &[
            Rgba::new(0, 0, 0, 255),
            Rgba::new(255, 0, 0, 255),
            Rgba::new(0, 255, 0, 255),
            Rgba::new(255, 255, 255, 255),
        ]
    );

    // A 3-bit stream against the same 4-entry table: index 5 falls back to entry 0.
    let corrupt = PaletteDecoder::new(3, None, &map);
    let mut image: Image<Rgba<u8>> = Image::new(2, 1);
    corrupt.decode(&[0b101_011_00], &mut image.view_mut(), 0, 0, 2, 1);
    assert_eq!(image.pixel(0, 0), Rgba::new(0, 0, 0, 255));
    assert_eq!(image.pixel(1, 0), Rgba::new(255, 255, 255, 255));
}

#[test]
fn associated_alpha_is_unpremultiplied() {
    let frame = tags(Photometric::Rgb, &[8, 8, 8, 8]).with_extra_samples(ExtraSamples::AssociatedAlpha);
    let decoder = chunky(&frame);
    assert_eq!(decoder.color_type(), TiffColorType::Rgba8888);

    let mut image: Image<Rgba<u8>> = Image::new(2, 1);
    decoder.decode(&[128, 0, 0, 128, 40, 40, 40, 0], &mut image.view_mut(), 0, 0, 2, 1);
    assert_eq!(image.pixel(0, 0), Rgba::new(255, 0, 0, 128));
    assert_eq!(image.pixel(1, 0), Rgba::new(0, 0, 0, 0));

    let straight = tags(Photometric::Rgb, &[8, 8, 8, 8]).with_extra_samples(ExtraSamples::UnassociatedAlpha);
    let mut image: Image<Rgba<u8>> = Image::new(1, 1);
    chunky(&straight).decode(&[128, 0, 0, 128], &mut image.view_mut(), 0, 0, 1, 1);
    assert_eq!(image.pixel(0, 0), Rgba::new(128, 0, 0, 128));
}

#[test]
fn ycbcr_reference_ranges() {
    let studio = [16, 235, 128, 240, 128, 240].map(Rational::from_int).to_vec();
    let frame = tags(Photometric::YCbCr, &[8, 8, 8]).with_reference_black_white(studio);
    let mut image: Image<Rgb<u8>> = Image::new(2, 1);
    chunky(&frame).decode(&[235, 128, 128, 16, 128, 128], &mut image.view_mut(), 0, 0, 2, 1);
    let [white, black] = [image.pixel(0, 0), image.pixel(1, 0)];
    for c in [white.r, white.g, white.b] {
        assert!(c >= 254, "white channel {c}");
    }
    for c in [black.r, black.g, black.b] {
        assert!(c <= 1, "black channel {c}");
    }

    // Full range (the default) keeps 235 as light gray.
    let frame = tags(Photometric::YCbCr, &[8, 8, 8]);
    let mut image: Image<Rgb<u8>> = Image::new(1, 1);
    chunky(&frame).decode(&[235, 128, 128], &mut image.view_mut(), 0, 0, 1, 1);
    assert_eq!(image.pixel(0, 0), Rgb::new(235, 235, 235));
}

#[test]
fn ycbcr_subsampled_blocks_share_chroma() {
    // 4x4 with 2x2 blocks: flat luma, distinct chroma per block.
    let chroma = [(90u8, 200u8), (200, 90), (60, 60), (180, 180)];
    let data: Vec<u8> = chroma
        .iter()
        .flat_map(|&(cb, cr)| [128, 128, 128, 128, cb, cr])
        .collect();
    let frame = tags(Photometric::YCbCr, &[8, 8, 8]).with_ycbcr_subsampling(2, 2);
    let mut image: Image<Rgb<u8>> = Image::new(4, 4);
    chunky(&frame).decode(&data, &mut image.view_mut(), 0, 0, 4, 4);

    for y in 0..4 {
        for x in 0..4 {
            let corner = image.pixel(x / 2 * 2, y / 2 * 2);
            assert_eq!(image.pixel(x, y), corner, "pixel ({x}, {y})");
        }
    }
    assert_ne!(image.pixel(0, 0), image.pixel(2, 0));
    assert_ne!(image.pixel(0, 0), image.pixel(0, 2));
}

#[test]
fn ycbcr_subsampled_non_multiple_size() {
    // 3x3 with 2x2 blocks pads to 4x4: exactly four 6-byte blocks.
    let frame = tags(Photometric::YCbCr, &[8, 8, 8]).with_ycbcr_subsampling(2, 2);
    assert_eq!(frame.chunky_block_bytes(3, 3), 24);
    let data: Vec<u8> = (0..4u8)
        .flat_map(|b| [b * 60, b * 60, b * 60, b * 60, 128, 128])
        .collect();

    let mut image: Image<Luma<u8>> = Image::new(3, 3);
    chunky(&frame).decode(&data, &mut image.view_mut(), 0, 0, 3, 3);
    let values: Vec<u8> = image.data().iter().map(|p| p.0).collect();
    assert_eq!(values, [0, 0, 60, 0, 0, 60, 120, 120, 180]);
}

#[test]
fn planar_and_chunky_agree() {
    let (width, height) = (3u32, 2u32);
    let r = [10u8, 20, 30, 40, 50, 60];
    let g = [1u8, 2, 3, 4, 5, 6];
    let b = [255u8, 128, 0, 64, 32, 16];
    let interleaved: Vec<u8> = (0..6).flat_map(|i| [r[i], g[i], b[i]]).collect();

    let chunky_tags = tags(Photometric::Rgb, &[8, 8, 8]);
    let planar_tags = chunky_tags.clone().with_planar(PlanarConfiguration::Planar);
    let planar_type = planar_tags.resolve_color_type().expect("planar color type");
    assert_eq!(planar_type, TiffColorType::Rgb888Planar);

    let options = DecoderOptions::default();
    let chunky_decoder = create(TiffColorType::Rgb888, &chunky_tags, &options).expect("chunky");
    let planar_decoder = create_planar(planar_type, &planar_tags, &options).expect("planar");

    let mut a: Image<Rgba<u16>> = Image::new(width, height);
    let mut b_img: Image<Rgba<u16>> = Image::new(width, height);
    chunky_decoder.decode(&interleaved, &mut a.view_mut(), 0, 0, width, height);
    planar_decoder.decode(&[&r, &g, &b], &mut b_img.view_mut(), 0, 0, width, height);
    assert_eq!(a.data(), b_img.data());
}

#[test]
fn one_bit_rows_skip_padding() {
    // Width 10: each row is 2 bytes with 6 padding bits set to 1.
    let frame = tags(Photometric::BlackIsZero, &[1]);
    let data = [0b1000_0000, 0b01_111111, 0b0100_0000, 0b00_111111];
    let mut image: Image<Luma<u8>> = Image::new(10, 2);
    chunky(&frame).decode(&data, &mut image.view_mut(), 0, 0, 10, 2);

    let row0: Vec<u8> = image.row(0).iter().map(|p| p.0).collect();
    let row1: Vec<u8> = image.row(1).iter().map(|p| p.0).collect();
    assert_eq!(row0, [255, 0, 0, 0, 0, 0, 0, 0, 0, 255]);
    assert_eq!(row1, [0, 255, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn sixteen_bit_byte_order() {
    let mut image: Image<Luma<u16>> = Image::new(1, 1);
    let big = tags(Photometric::BlackIsZero, &[16]).with_byte_order(ByteOrder::BigEndian);
    chunky(&big).decode(&[0x00, 0xFF], &mut image.view_mut(), 0, 0, 1, 1);
    assert_eq!(image.pixel(0, 0), Luma(255));

    let little = tags(Photometric::BlackIsZero, &[16]).with_byte_order(ByteOrder::LittleEndian);
    chunky(&little).decode(&[0x00, 0xFF], &mut image.view_mut(), 0, 0, 1, 1);
    assert_eq!(image.pixel(0, 0), Luma(65280));
}

#[test]
fn float_destination() {
    let decoder = chunky(&tags(Photometric::Rgb, &[8, 8, 8]));
    let mut image: Image<Rgba<f16>> = Image::new(1, 1);
    decoder.decode(&[255, 0, 51], &mut image.view_mut(), 0, 0, 1, 1);
    let px = image.pixel(0, 0);
    assert_eq!(px.r, f16::ONE);
    assert_eq!(px.g, f16::ZERO);
    assert_abs_diff_eq!(px.b.to_f32(), 0.2, epsilon = 1e-3);
    assert_eq!(px.a, f16::ONE);
}

#[test]
fn cmyk_formula() {
    let decoder = chunky(&tags(Photometric::Separated, &[8, 8, 8, 8]));
    assert_eq!(decoder.color_type(), TiffColorType::Cmyk);
    let mut image: Image<Rgb<u8>> = Image::new(2, 1);
    decoder.decode(&[0, 255, 255, 0, 0, 0, 0, 255], &mut image.view_mut(), 0, 0, 2, 1);
    assert_eq!(image.pixel(0, 0), Rgb::new(255, 0, 0));
    assert_eq!(image.pixel(1, 0), Rgb::new(0, 0, 0));
}

#[test]
fn cielab_sixteen_bit() {
    let frame = tags(Photometric::CieLab, &[16, 16, 16]).with_byte_order(ByteOrder::LittleEndian);
    let decoder = chunky(&frame);
    assert_eq!(decoder.color_type(), TiffColorType::CieLab16);

    let mut data = Vec::new();
    for (l, a, b) in [(u16::MAX, 0i16, 0i16), (0, 0, 0)] {
        data.extend_from_slice(&l.to_le_bytes());
        data.extend_from_slice(&a.to_le_bytes());
        data.extend_from_slice(&b.to_le_bytes());
    }
    let mut image: Image<Rgb<f32>> = Image::new(2, 1);
    decoder.decode(&data, &mut image.view_mut(), 0, 0, 2, 1);
    let white = image.pixel(0, 0);
    let black = image.pixel(1, 0);
    for (w, k) in [(white.r, black.r), (white.g, black.g), (white.b, black.b)] {
        assert_abs_diff_eq!(w, 1.0, epsilon = 0.01);
        assert_abs_diff_eq!(k, 0.0, epsilon = 0.01);
    }
}
