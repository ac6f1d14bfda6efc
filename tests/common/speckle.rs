//! Binary i.i.d. masks for exercising the comparator without the pipeline.
use retina_match::compare::GridCell;
use retina_match::image::Image;

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Half the pixels black, half white, independently.
pub fn speckle_mask(w: usize, h: usize, seed: u64) -> Image {
    let mut state = seed;
    let data = (0..w * h)
        .map(|_| if splitmix64(&mut state) & 1 == 1 { 255 } else { 0 })
        .collect();
    Image::from_raw(w, h, 1, data).expect("buffer matches dimensions")
}

/// Copy the pixels of `cell` from `src` into `dst` at the same place.
pub fn copy_cell(src: &Image, dst: &mut Image, cell: &GridCell) {
    for y in cell.y0..cell.y1 {
        for x in cell.x0..cell.x1 {
            dst.set(x, y, 0, src.get(x, y, 0));
        }
    }
}

/// Move the content by `(dx, dy)`; uncovered pixels come from `fill`.
pub fn shift_mask(src: &Image, dx: usize, dy: usize, fill: &Image) -> Image {
    let mut out = fill.clone();
    for y in dy..src.h {
        for x in dx..src.w {
            out.set(x, y, 0, src.get(x - dx, y - dy, 0));
        }
    }
    out
}
