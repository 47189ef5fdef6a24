// Conversions between binarized frames and in-memory grayscale images. Nothing
// here touches the filesystem: PNG output is encoded into a byte vector so a host
// can attach it to an audit record of a rejected frame.

pub mod image_helper {
    use crate::core_modules::grid::grid::Grid;
    use image::{GrayImage, ImageEncoder, Luma};

    const LIT: u8 = 255;
    const DARK: u8 = 0;

    /// Binarizes a grayscale image: a pixel at or above `threshold` becomes a lit cell.
    /// Image rows map to grid rows.
    pub fn binarize(image: &GrayImage, threshold: u8) -> Grid {
        Grid::from_fn(image.height() as usize, image.width() as usize, |r, c| {
            image.get_pixel(c as u32, r as u32).0[0] >= threshold
        })
    }

    /// Renders a grid as a black and white image.
    pub fn render(grid: &Grid) -> GrayImage {
        GrayImage::from_fn(grid.cols() as u32, grid.rows() as u32, |x, y| {
            match grid.get(y as usize, x as usize) {
                Some(true) => Luma([LIT]),
                _ => Luma([DARK]),
            }
        })
    }

    /// Encodes a grid as an 8-bit grayscale PNG held in memory.
    pub fn encode_png(grid: &Grid) -> Result<Vec<u8>, image::error::ImageError> {
        let rendered = render(grid);
        let mut buffer = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buffer);

        encoder.write_image(
            rendered.as_raw(),
            rendered.width(),
            rendered.height(),
            image::ExtendedColorType::L8,
        )?;

        Ok(buffer)
    }
}
