use posebridge_base::Vec2;

/// Converts packed YUYV (YUV 4:2:2) into RGB8 using BT.601 coefficients.
///
/// Each 4-byte group `[Y0, U, Y1, V]` yields two RGB pixels sharing U and V.
/// Returns `None` if `data` is shorter than `width * height * 2` bytes.
pub fn yuyv_to_rgb(data: &[u8], size: Vec2<usize>) -> Option<Vec<u8>> {
    let pixel_count = size.area();
    let expected_len = pixel_count * 2;
    if data.len() < expected_len {
        return None;
    }

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in data[..expected_len].chunks_exact(4) {
        let u = chunk[1] as f32 - 128.0;
        let v = chunk[3] as f32 - 128.0;
        for y in [chunk[0] as f32, chunk[2] as f32] {
            rgb.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
            rgb.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
        }
    }

    Some(rgb)
}
