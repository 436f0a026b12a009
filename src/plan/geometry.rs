/// Placement of a scaled source inside an exact `target_width x target_height` box.
///
/// The source keeps its aspect ratio, is scaled to touch the box on one axis and is centered
/// with black bars on the other (letterbox or pillarbox).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ScaleGeometry {
    /// Box width (the rendition's exact output width).
    pub target_width: u32,
    /// Box height (the rendition's exact output height).
    pub target_height: u32,
    /// Width of the scaled picture inside the box.
    pub scaled_width: u32,
    /// Height of the scaled picture inside the box.
    pub scaled_height: u32,
    /// Left padding in pixels.
    pub pad_x: u32,
    /// Top padding in pixels.
    pub pad_y: u32,
}

impl ScaleGeometry {
    /// Fit a `src_width x src_height` picture into an even-sized box.
    ///
    /// Scaled dimensions and offsets are even so chroma planes stay aligned for yuv420p.
    pub fn fit(src_width: u32, src_height: u32, box_width: u32, box_height: u32) -> Self {
        let (scaled_width, scaled_height) = if src_width == 0 || src_height == 0 {
            (box_width, box_height)
        } else {
            let (sw, sh) = (u64::from(src_width), u64::from(src_height));
            let (bw, bh) = (u64::from(box_width), u64::from(box_height));
            if sw * bh >= sh * bw {
                // Source is at least as wide as the box: full width, bars top/bottom.
                (box_width, nearest_even(sh * bw, sw, box_height))
            } else {
                (nearest_even(sw * bh, sh, box_width), box_height)
            }
        };

        Self {
            target_width: box_width,
            target_height: box_height,
            scaled_width,
            scaled_height,
            pad_x: ((box_width - scaled_width) / 2) & !1,
            pad_y: ((box_height - scaled_height) / 2) & !1,
        }
    }

    /// Whether the scaled picture fills the box with no bars.
    pub fn is_exact(&self) -> bool {
        self.scaled_width == self.target_width && self.scaled_height == self.target_height
    }

    /// `ffmpeg` filter chain producing this geometry from one input pad.
    pub fn filter(&self) -> String {
        format!(
            "scale={}:{},setsar=1,pad={}:{}:{}:{}:color=black",
            self.scaled_width,
            self.scaled_height,
            self.target_width,
            self.target_height,
            self.pad_x,
            self.pad_y
        )
    }
}

/// `num / den` rounded to the nearest even integer, within `2..=max`.
fn nearest_even(num: u64, den: u64, max: u32) -> u32 {
    let halves = (num + den) / (den * 2);
    let v = (halves * 2).min(u64::from(max)) as u32;
    v.max(2).min(max)
}

#[cfg(test)]
#[path = "../../tests/unit/plan/geometry.rs"]
mod tests;
