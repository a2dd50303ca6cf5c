//! Crop boxes in page space and their mapping onto rendered page pixels.
//!
//! Within a level of `k` regions, the page's horizontal extent is cut into
//! `k` equal slices in left-to-right order. Slice edges are then pulled in
//! to the captions' own edges so a crop does not run into its neighbour
//! when the charts are narrower than their slices.

use crate::geometry::{BBox, PageSize};
use crate::label::Label;
use crate::levels::{Level, group_levels};
use crate::region::ChartRegion;
use crate::scan::PageLayout;

/// Default margin added around each crop, in page units.
pub const DEFAULT_MARGIN: f64 = 10.0;

/// Final page-space crop box for one region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropPlacement {
    /// Label of the region's caption.
    pub label: Label,
    /// Crop box before margin, page space.
    pub bbox: BBox,
    /// Level the region belongs to.
    pub level: usize,
    /// Index of the region in the sorted region list.
    pub region: usize,
}

/// Compute crop boxes for every region, level by level.
///
/// `left` and `right` are the page's horizontal extents. Output order is
/// level order, then member order within each level.
pub fn place_regions(
    regions: &[ChartRegion],
    levels: &[Level],
    left: f64,
    right: f64,
) -> Vec<CropPlacement> {
    let width = (right - left).abs();
    let mut placements = Vec::with_capacity(regions.len());

    for level in levels {
        let count = level.members.len();
        let slice = width / count as f64;

        for (order, &member) in level.members.iter().enumerate() {
            let region = &regions[member];
            let caption = &region.caption.bbox;

            let mut x0 = left + order as f64 * slice;
            if order > 0 {
                x0 = x0.min(caption.x0).min(caption.x1);
            }

            let mut x1 = left + (order + 1) as f64 * slice;
            if count > 1 && order + 1 < count {
                let next = &regions[level.members[order + 1]].caption.bbox;
                x1 = x1.min(next.x0).min(next.x1);
            }

            placements.push(CropPlacement {
                label: region.label().clone(),
                bbox: BBox::new(x0, region.bottom(), x1, region.top()),
                level: level.index,
                region: member,
            });
        }
    }

    placements
}

/// Regions, levels and placements for one finalized page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagePlan {
    pub page: usize,
    pub regions: Vec<ChartRegion>,
    pub levels: Vec<Level>,
    pub placements: Vec<CropPlacement>,
}

impl PagePlan {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Pair, group and place the regions of a finalized page.
pub fn plan_page(page: &PageLayout) -> PagePlan {
    let regions = page.regions();
    let levels = group_levels(&regions);
    let placements = place_regions(&regions, &levels, page.left_extent, page.right_extent);
    PagePlan {
        page: page.index,
        regions,
        levels,
        placements,
    }
}

/// Rectangle on a rendered page image, top-left origin, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    /// Map a page-space box, grown by `margin` on every side, onto an image
    /// of `image_width` × `image_height` pixels, clamped to the image.
    ///
    /// Page y grows upward and image y downward, so the box's top edge
    /// becomes the rectangle's upper (smaller) row.
    pub fn from_page_box(
        bbox: &BBox,
        page: PageSize,
        image_width: u32,
        image_height: u32,
        margin: f64,
    ) -> Self {
        let wp = f64::from(image_width);
        let hp = f64::from(image_height);
        if page.width <= 0.0 || page.height <= 0.0 {
            return Self {
                x0: 0.0,
                y0: 0.0,
                x1: 0.0,
                y1: 0.0,
            };
        }

        Self {
            x0: (wp * (bbox.x0 - margin) / page.width).clamp(0.0, wp),
            x1: (wp * (bbox.x1 + margin) / page.width).clamp(0.0, wp),
            y0: (hp * (1.0 - (bbox.y1 + margin) / page.height)).clamp(0.0, hp),
            y1: (hp * (1.0 - (bbox.y0 - margin) / page.height)).clamp(0.0, hp),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Integer `(x, y, width, height)` after rounding each edge, or `None`
    /// when the rounded rectangle is empty.
    pub fn to_crop(&self) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x0.round();
        let y0 = self.y0.round();
        let x1 = self.x1.round();
        let y1 = self.y1.round();
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}
