use crate::software::Raster;

/// Place the Mandelbrot and Julia rasters side by side as one RGBA8 image.
///
/// Returns the packed pixels with the combined width and height. Both
/// rasters must share a height.
pub fn side_by_side(left: &Raster, right: &Raster) -> (Vec<u8>, usize, usize) {
    let l = left.extent();
    let r = right.extent();
    debug_assert_eq!(l.height, r.height);

    let width = l.width + r.width;
    let height = l.height.min(r.height);
    let mut frame = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for raster in [left, right] {
            let w = raster.extent().width;
            for color in &raster.pixels()[y * w..(y + 1) * w] {
                frame.extend_from_slice(&color.to_rgba8());
            }
        }
    }
    (frame, width, height)
}

// Fast png encoding using the rust `png` crate.
pub fn png(output: &str, frame: &[u8], width: usize, height: usize) -> std::io::Result<()> {
    let file = std::fs::File::create(output)?;
    let output = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(output, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(std::io::Error::other)?;
    writer
        .write_image_data(frame)
        .map_err(std::io::Error::other)?;
    writer.finish().map_err(std::io::Error::other)
}
