//! Chroma subsampling expansion for YCbCr.
//!
//! Subsampled streams carry one Cb/Cr pair per `h` x `v` block of luma
//! samples. Image dimensions that aren't multiples of the factors are
//! padded to whole blocks. Both expanders walk blocks last to first so the
//! planar variant can work in place.

/// Samples needed to round `value` up to a multiple of `factor`.
#[inline]
pub fn padding(value: u32, factor: u32) -> u32 {
    match value % factor {
        0 => 0,
        rem => factor - rem,
    }
}

/// `value` rounded up to a multiple of `factor`.
#[inline]
pub fn padded(value: u32, factor: u32) -> u32 {
    value + padding(value, factor)
}

/// Expands a chunky subsampled stream into interleaved `[Y, Cb, Cr]`
/// triplets with a row stride of the padded width.
///
/// Each source block holds `h * v` luma samples (row-major within the
/// block) followed by Cb then Cr; blocks are row-major.
///
/// # Panics
///
/// Panics if `source` holds fewer bytes than the padded block grid needs,
/// or `dest` is smaller than `padded_width * padded_height * 3`.
pub fn expand_chunky(width: u32, height: u32, h: u32, v: u32, source: &[u8], dest: &mut [u8]) {
    let width = padded(width, h) as usize;
    let height = padded(height, v) as usize;
    let (h, v) = (h as usize, v as usize);

    let block_width = width / h;
    let block_height = height / v;
    let cbcr_offset = h * v;
    let block_bytes = cbcr_offset + 2;

    assert!(
        source.len() >= block_width * block_height * block_bytes,
        "subsampled block data too short: {} < {}",
        source.len(),
        block_width * block_height * block_bytes
    );
    assert!(dest.len() >= width * height * 3, "expansion buffer too small");

    for block_row in (0..block_height).rev() {
        for block_col in (0..block_width).rev() {
            let start = (block_row * block_width + block_col) * block_bytes;
            let block = &source[start..start + block_bytes];
            let cb = block[cbcr_offset];
            let cr = block[cbcr_offset + 1];

            for row in (0..v).rev() {
                for col in (0..h).rev() {
                    let offset = 3 * ((block_row * v + row) * width + block_col * h + col);
                    dest[offset] = block[row * h + col];
                    dest[offset + 1] = cb;
                    dest[offset + 2] = cr;
                }
            }
        }
    }
}

/// Expands subsampled Cb and Cr planes in place to one value per padded
/// pixel.
///
/// On entry each plane starts with `(pw / h) * (ph / v)` samples; on exit
/// it holds `pw * ph`, where `pw`/`ph` are the padded dimensions.
///
/// # Panics
///
/// Panics if either plane is shorter than `pw * ph`.
pub fn expand_planar(width: u32, height: u32, h: u32, v: u32, cb: &mut [u8], cr: &mut [u8]) {
    let width = padded(width, h) as usize;
    let height = padded(height, v) as usize;
    let (h, v) = (h as usize, v as usize);
    assert!(
        cb.len() >= width * height && cr.len() >= width * height,
        "chroma planes too small for in-place expansion"
    );

    let block_width = width / h;
    for row in (0..height).rev() {
        for col in (0..width).rev() {
            let offset = row * width + col;
            let sub = (row / v) * block_width + col / h;
            cb[offset] = cb[sub];
            cr[offset] = cr[sub];
        }
    }
}
