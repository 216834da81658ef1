//! Pixel-accurate collision masks
//!
//! Each tile row is packed into a `u64`, leftmost pixel in the most
//! significant bit. Shifting a row right by `k` therefore moves every column
//! `j` to `j + k`, which is how the other mask is positioned relative to this
//! one before the rows are ANDed together.
//!
//! Masks of different widths are aligned on their left edges: column 0 of
//! both sits in bit 63, so a zero offset lines up the tiles' left columns
//! regardless of how wide each one is.

use glam::{UVec2, Vec2};

use super::sprite::{PixelFormat, Pixmap};
use crate::consts::ALPHA_THRESHOLD;
use crate::error::SpriteError;

/// Widest tile a mask row can hold
pub const MASK_BITS: u32 = u64::BITS;

/// Per-row opacity bitmask of one tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    rows: Vec<u64>,
}

impl CollisionMask {
    /// Build a mask from a region of an RGBA pixmap.
    ///
    /// A pixel is opaque when its alpha (top byte of the little-endian 32-bit
    /// pixel) exceeds [`ALPHA_THRESHOLD`].
    pub fn from_region(pixmap: &Pixmap, origin: UVec2, size: UVec2) -> Result<Self, SpriteError> {
        if pixmap.format != PixelFormat::Rgba {
            return Err(SpriteError::UnsupportedPixelFormat(pixmap.format));
        }
        if size.x > MASK_BITS {
            return Err(SpriteError::TileTooWide {
                width: size.x,
                max: MASK_BITS,
            });
        }

        let out_of_bounds = || SpriteError::RegionOutOfBounds {
            x: origin.x,
            y: origin.y,
            width: size.x,
            height: size.y,
            image_width: pixmap.width,
            image_height: pixmap.height,
        };
        if u64::from(origin.x) + u64::from(size.x) > u64::from(pixmap.width)
            || u64::from(origin.y) + u64::from(size.y) > u64::from(pixmap.height)
        {
            return Err(out_of_bounds());
        }

        let bpp = PixelFormat::Rgba.bytes_per_pixel();
        let mut rows = Vec::with_capacity(size.y as usize);
        for i in 0..size.y {
            let start = ((origin.y + i) as usize * pixmap.width as usize + origin.x as usize) * bpp;
            let end = start + size.x as usize * bpp;
            let row = pixmap.pixels.get(start..end).ok_or_else(out_of_bounds)?;

            let mask = row
                .chunks_exact(bpp)
                .enumerate()
                .fold(0u64, |mask, (j, px)| {
                    let pixel = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
                    if pixel >> 24 > ALPHA_THRESHOLD {
                        mask | (1 << (MASK_BITS as usize - 1 - j))
                    } else {
                        mask
                    }
                });
            rows.push(mask);
        }

        Ok(Self {
            width: size.x,
            rows,
        })
    }

    /// Build a mask directly from packed rows (leftmost pixel in bit 63).
    ///
    /// Bits past column `width - 1` are rejected rather than ignored.
    pub fn from_rows(width: u32, rows: Vec<u64>) -> Result<Self, SpriteError> {
        if width > MASK_BITS {
            return Err(SpriteError::TileTooWide {
                width,
                max: MASK_BITS,
            });
        }
        let columns = u64::MAX.checked_shl(MASK_BITS - width).unwrap_or(0);
        if let Some(row) = rows.iter().position(|&bits| bits & !columns != 0) {
            return Err(SpriteError::BitsOutsideWidth { row, width });
        }
        Ok(Self { width, rows })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }

    /// Check whether `other`, placed at `offset` from this mask's origin,
    /// shares an opaque pixel with this mask.
    ///
    /// The offset is truncated toward zero. `offset.x` counts columns,
    /// `offset.y` counts rows: row `r` of this mask is tested against row
    /// `r + offset.y` of `other`. Callers pass `other.position - self.position`.
    pub fn collides_with(&self, other: &CollisionMask, offset: Vec2) -> bool {
        let col_offset = offset.x as i32;
        let row_offset = offset.y as i32;

        if col_offset >= self.width as i32 || col_offset < -(other.width as i32) {
            return false;
        }

        self.rows.iter().enumerate().any(|(row, &mask)| {
            let other_row = row as i32 + row_offset;
            if other_row < 0 {
                return false;
            }
            let Some(&other_mask) = other.rows.get(other_row as usize) else {
                return false;
            };

            let shifted = if col_offset > 0 {
                other_mask.checked_shr(col_offset as u32)
            } else {
                other_mask.checked_shl(col_offset.unsigned_abs())
            };
            mask & shifted.unwrap_or(0) != 0
        })
    }

    /// Render the mask as `*` (opaque) and `.` rows
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * (self.width as usize + 1));
        for &row in &self.rows {
            for j in 0..self.width {
                let bit = 1u64 << (MASK_BITS - 1 - j);
                out.push(if row & bit != 0 { '*' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}
