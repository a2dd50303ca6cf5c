//! Horizontal band ("level") grouping of chart regions.
//!
//! Charts that sit side by side on a page share a level. Two regions share a
//! level when one's vertical span contains the other's, or when they overlap
//! and their closest edges are offset by less than the span of the flatter
//! of the two.
//!
//! The grouping is greedy and depends on input order: each unvisited region,
//! in order, opens a level and absorbs every later unvisited region that
//! shares its band. Callers pass regions sorted by caption left edge.

use std::fmt;

use crate::region::ChartRegion;

/// One horizontal band of regions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    /// Position in opening order (0 = first level opened).
    pub index: usize,
    /// Indices into the region slice, in ascending order.
    pub members: Vec<usize>,
}

impl Level {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level_{}", self.index)
    }
}

/// Decide whether `b` sits on the same horizontal band as `a`.
pub fn same_level(a: &ChartRegion, b: &ChartRegion) -> bool {
    let flatness = a.span().min(b.span());

    let a_inside_b = a.top() <= b.top() && a.bottom() >= b.bottom();
    let b_inside_a = a.top() >= b.top() && a.bottom() <= b.bottom();
    if a_inside_b || b_inside_a {
        return true;
    }

    let offset = (a.top() - b.top()).abs().min((a.bottom() - b.bottom()).abs());
    offset < flatness
}

/// Partition `regions` into levels.
///
/// Every index appears in exactly one level. Levels are returned in the
/// order they were opened.
pub fn group_levels(regions: &[ChartRegion]) -> Vec<Level> {
    let mut visited = vec![false; regions.len()];
    let mut levels = Vec::new();

    for i in 0..regions.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut members = vec![i];

        for j in (i + 1)..regions.len() {
            if visited[j] {
                continue;
            }
            if same_level(&regions[i], &regions[j]) {
                visited[j] = true;
                members.push(j);
            }
        }

        levels.push(Level {
            index: levels.len(),
            members,
        });
    }

    levels
}
