use image::DynamicImage;

/// Brightness factor applied to a bright wallpaper to make its dark variant.
pub const DARKEN_FACTOR: f32 = 0.6;
/// Brightness factor applied to a dark wallpaper to make its light variant.
pub const LIGHTEN_FACTOR: f32 = 1.4;

/// Multiply every color channel by `factor`, clamping to [0, 255].
/// Alpha is left untouched.
pub fn change_brightness(img: &DynamicImage, factor: f32) -> DynamicImage {
    let factor = factor.max(0.0);
    let mut rgba = img.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = (*channel as f32 * factor).round().min(255.0) as u8;
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of(pixels: &[[u8; 4]]) -> DynamicImage {
        let width = pixels.len() as u32;
        DynamicImage::ImageRgba8(image::RgbaImage::from_fn(width, 1, |x, _| {
            image::Rgba(pixels[x as usize])
        }))
    }

    #[test]
    fn darken_scales_channels_down() {
        let img = image_of(&[[200, 100, 10, 255]]);
        let out = change_brightness(&img, DARKEN_FACTOR).to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0, [120, 60, 6, 255]);
    }

    #[test]
    fn lighten_clamps_at_white() {
        let img = image_of(&[[200, 100, 0, 255]]);
        let out = change_brightness(&img, LIGHTEN_FACTOR).to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0, [255, 140, 0, 255]);
    }

    #[test]
    fn alpha_is_preserved() {
        let img = image_of(&[[100, 100, 100, 7]]);
        let out = change_brightness(&img, 0.5).to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0[3], 7);
    }

    #[test]
    fn factor_one_is_identity() {
        let img = image_of(&[[1, 2, 3, 4], [250, 128, 0, 255]]);
        assert_eq!(change_brightness(&img, 1.0).to_rgba8(), img.to_rgba8());
    }
}
