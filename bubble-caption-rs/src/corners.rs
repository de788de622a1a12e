//! Corner adjacency resolution for stacked caption lines.
//!
//! Adjacent line boxes are compared pairwise from top to bottom. When one
//! line is clearly narrower than its neighbour, the narrower box gets square
//! corners with an outward flare so the two boxes read as one shape. When the
//! widths are within tolerance, both boxes are forced to the wider width and
//! the shared seam loses its rounding. Alignment adds a static rule on top:
//! the flush edge of a left or right aligned block is only rounded at the very
//! top and bottom of the stack.

use crate::error::CaptionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Horizontal alignment of the caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl FromStr for Alignment {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            _ => Err(CaptionError::InvalidOption(format!(
                "Unsupported alignment: {s}. Expected one of: left, center, right"
            ))),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        };
        f.write_str(s)
    }
}

/// One of the four corners of a line box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// All corners in clockwise order starting at the top left.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }
}

/// How a single corner is drawn.
///
/// Variants are ordered; a corner can only move to a later variant, which
/// keeps resolution monotonic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CornerShape {
    /// Rounded with the line's corner radius.
    #[default]
    Rounded,
    /// Square because it lies on the flush edge of an aligned block.
    Flush,
    /// Square because it sits on a seam with an equal-width neighbour.
    Connected,
    /// Square with an outward flare that blends into a wider neighbour.
    Squared,
}

impl CornerShape {
    pub fn is_rounded(self) -> bool {
        self == CornerShape::Rounded
    }
}

/// Legacy per-line flag names, derivable from corner shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineFlag {
    #[serde(rename = "corner-tl")]
    CornerTopLeft,
    #[serde(rename = "corner-tr")]
    CornerTopRight,
    #[serde(rename = "corner-bl")]
    CornerBottomLeft,
    #[serde(rename = "corner-br")]
    CornerBottomRight,
    #[serde(rename = "connect-top")]
    ConnectTop,
    #[serde(rename = "connect-bottom")]
    ConnectBottom,
}

impl fmt::Display for LineFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineFlag::CornerTopLeft => "corner-tl",
            LineFlag::CornerTopRight => "corner-tr",
            LineFlag::CornerBottomLeft => "corner-bl",
            LineFlag::CornerBottomRight => "corner-br",
            LineFlag::ConnectTop => "connect-top",
            LineFlag::ConnectBottom => "connect-bottom",
        };
        f.write_str(s)
    }
}

/// Shapes of all four corners of a line box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CornerShapes([CornerShape; 4]);

impl CornerShapes {
    pub fn get(&self, corner: Corner) -> CornerShape {
        self.0[corner.index()]
    }

    /// Move `corner` to `shape` unless it already has a later shape.
    pub fn raise(&mut self, corner: Corner, shape: CornerShape) {
        let slot = &mut self.0[corner.index()];
        *slot = (*slot).max(shape);
    }

    /// Whether every corner of `self` is at least as far along as in `other`.
    pub fn dominates(&self, other: &CornerShapes) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a >= b)
    }

    pub fn all_rounded(&self) -> bool {
        self.0.iter().all(|shape| shape.is_rounded())
    }

    /// The legacy flags implied by these shapes.
    pub fn flags(&self) -> Vec<LineFlag> {
        let mut flags = Vec::new();
        let squared = |corner| self.get(corner) == CornerShape::Squared;
        let connected = |corner| self.get(corner) == CornerShape::Connected;

        if squared(Corner::TopLeft) {
            flags.push(LineFlag::CornerTopLeft);
        }
        if squared(Corner::TopRight) {
            flags.push(LineFlag::CornerTopRight);
        }
        if squared(Corner::BottomLeft) {
            flags.push(LineFlag::CornerBottomLeft);
        }
        if squared(Corner::BottomRight) {
            flags.push(LineFlag::CornerBottomRight);
        }
        if connected(Corner::TopLeft) || connected(Corner::TopRight) {
            flags.push(LineFlag::ConnectTop);
        }
        if connected(Corner::BottomLeft) || connected(Corner::BottomRight) {
            flags.push(LineFlag::ConnectBottom);
        }
        flags
    }
}

/// A measured line box as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBox {
    pub text: String,
    pub scale: f32,
    /// Laid-out width in pixels, or `None` when the line could not be measured.
    pub measured_width: Option<f32>,
    /// Corner radius in pixels.
    pub corner_radius: f32,
    /// Width imposed by an equal-width neighbour.
    pub forced_width: Option<f32>,
    pub corners: CornerShapes,
}

impl LineBox {
    pub fn new(
        text: impl Into<String>,
        scale: f32,
        measured_width: Option<f32>,
        corner_radius: f32,
    ) -> Self {
        Self {
            text: text.into(),
            scale,
            measured_width: measured_width.filter(|w| w.is_finite()),
            corner_radius,
            forced_width: None,
            corners: CornerShapes::default(),
        }
    }

    /// The width the box currently lays out at.
    pub fn effective_width(&self) -> Option<f32> {
        self.measured_width.map(|w| self.forced_width.unwrap_or(w))
    }

    pub fn flags(&self) -> Vec<LineFlag> {
        self.corners.flags()
    }
}

/// How the lower line of an adjacent pair compares to the upper one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthRelation {
    /// The lower line is narrower by more than the tolerance.
    Narrower,
    /// The lower line is wider by more than the tolerance.
    Wider,
    /// Neither; the lines are treated as one block.
    Equal,
}

/// Applies pairwise and alignment corner rules to a stack of line boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CornerResolver {
    pub alignment: Alignment,
}

impl CornerResolver {
    pub fn new(alignment: Alignment) -> Self {
        Self { alignment }
    }

    /// Width band within which a line with `corner_radius` counts as equal.
    pub fn tolerance(&self, corner_radius: f32) -> f32 {
        match self.alignment {
            Alignment::Center => corner_radius * 2.0,
            Alignment::Left | Alignment::Right => corner_radius,
        }
    }

    /// Compare two widths. Equal is the fallthrough case.
    pub fn classify(
        &self,
        prev_width: f32,
        prev_radius: f32,
        cur_width: f32,
        cur_radius: f32,
    ) -> WidthRelation {
        let prev_tolerance = self.tolerance(prev_radius);
        let cur_tolerance = self.tolerance(cur_radius);

        if prev_width - prev_tolerance >= cur_width + cur_tolerance {
            WidthRelation::Narrower
        } else if prev_width + prev_tolerance <= cur_width - cur_tolerance {
            WidthRelation::Wider
        } else {
            WidthRelation::Equal
        }
    }

    /// Apply the pairwise rule to one adjacent pair.
    ///
    /// Returns `None` and leaves both boxes untouched when either width is
    /// unknown.
    pub fn apply_pair(&self, prev: &mut LineBox, cur: &mut LineBox) -> Option<WidthRelation> {
        let (Some(prev_width), Some(cur_width)) = (prev.effective_width(), cur.effective_width())
        else {
            log::debug!(
                "Skipping corner resolution between {:?} and {:?}: width unavailable",
                prev.text,
                cur.text
            );
            return None;
        };

        let relation = self.classify(prev_width, prev.corner_radius, cur_width, cur.corner_radius);
        match relation {
            WidthRelation::Narrower => {
                if self.alignment != Alignment::Left {
                    cur.corners.raise(Corner::TopLeft, CornerShape::Squared);
                }
                if self.alignment != Alignment::Right {
                    cur.corners.raise(Corner::TopRight, CornerShape::Squared);
                }
            }
            WidthRelation::Wider => {
                if self.alignment != Alignment::Left {
                    prev.corners.raise(Corner::BottomLeft, CornerShape::Squared);
                }
                if self.alignment != Alignment::Right {
                    prev.corners.raise(Corner::BottomRight, CornerShape::Squared);
                }
            }
            WidthRelation::Equal => {
                let width = prev_width.max(cur_width);
                prev.forced_width = Some(width);
                prev.corners.raise(Corner::BottomLeft, CornerShape::Connected);
                prev.corners.raise(Corner::BottomRight, CornerShape::Connected);
                cur.forced_width = Some(width);
                cur.corners.raise(Corner::TopLeft, CornerShape::Connected);
                cur.corners.raise(Corner::TopRight, CornerShape::Connected);
            }
        }
        Some(relation)
    }

    /// Square the flush edge of a left or right aligned block everywhere
    /// except the top of the first line and the bottom of the last one.
    pub fn apply_alignment_rule(&self, lines: &mut [LineBox]) {
        let (top, bottom) = match self.alignment {
            Alignment::Left => (Corner::TopLeft, Corner::BottomLeft),
            Alignment::Right => (Corner::TopRight, Corner::BottomRight),
            Alignment::Center => return,
        };

        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter_mut().enumerate() {
            if line.measured_width.is_none() {
                continue;
            }
            if i > 0 {
                line.corners.raise(top, CornerShape::Flush);
            }
            if i < last {
                line.corners.raise(bottom, CornerShape::Flush);
            }
        }
    }

    /// Resolve all corners in a single top-to-bottom pass.
    pub fn resolve(&self, lines: &mut [LineBox]) {
        for i in 1..lines.len() {
            let (head, tail) = lines.split_at_mut(i);
            self.apply_pair(&mut head[i - 1], &mut tail[0]);
        }
        self.apply_alignment_rule(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(width: f32, radius: f32) -> LineBox {
        LineBox::new("x", 1.0, Some(width), radius)
    }

    #[test]
    fn test_scenario_equal_widths_connect() {
        let mut lines = vec![line(100.0, 5.0), line(100.0, 5.0)];
        CornerResolver::new(Alignment::Center).resolve(&mut lines);

        assert_eq!(lines[0].flags(), vec![LineFlag::ConnectBottom]);
        assert_eq!(lines[1].flags(), vec![LineFlag::ConnectTop]);
        assert_eq!(lines[0].forced_width, Some(100.0));
        assert_eq!(lines[1].forced_width, Some(100.0));
    }

    #[test]
    fn test_scenario_wider_line_squares_previous_bottom() {
        let mut lines = vec![
            LineBox::new("Short", 2.0, Some(60.0), 10.0),
            LineBox::new("A very long line of text", 1.0, Some(300.0), 5.0),
        ];
        CornerResolver::new(Alignment::Center).resolve(&mut lines);

        assert_eq!(
            lines[0].flags(),
            vec![LineFlag::CornerBottomLeft, LineFlag::CornerBottomRight]
        );
        assert!(lines[1].flags().is_empty());
        assert_eq!(lines[0].forced_width, None);
    }

    #[test]
    fn test_single_line_untouched() {
        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            let mut lines = vec![line(120.0, 5.6)];
            CornerResolver::new(alignment).resolve(&mut lines);
            assert!(lines[0].corners.all_rounded());
            assert!(lines[0].flags().is_empty());
        }
    }

    #[rstest]
    #[case(Alignment::Left)]
    #[case(Alignment::Center)]
    #[case(Alignment::Right)]
    fn test_equal_widths_always_equal(#[case] alignment: Alignment) {
        let resolver = CornerResolver::new(alignment);
        for width in [0.0, 1.0, 57.5, 300.0] {
            for radius in [0.0, 5.6, 20.0] {
                assert_eq!(
                    resolver.classify(width, radius, width, radius),
                    WidthRelation::Equal
                );
            }
        }
    }

    #[rstest]
    #[case::left(Alignment::Left, vec![], vec![LineFlag::CornerTopRight])]
    #[case::center(
        Alignment::Center,
        vec![],
        vec![LineFlag::CornerTopLeft, LineFlag::CornerTopRight]
    )]
    #[case::right(Alignment::Right, vec![], vec![LineFlag::CornerTopLeft])]
    fn test_narrower_line_squares_open_side(
        #[case] alignment: Alignment,
        #[case] expected_prev: Vec<LineFlag>,
        #[case] expected_cur: Vec<LineFlag>,
    ) {
        let mut lines = vec![line(300.0, 5.0), line(100.0, 5.0)];
        CornerResolver::new(alignment).resolve(&mut lines);
        assert_eq!(lines[0].flags(), expected_prev);
        assert_eq!(lines[1].flags(), expected_cur);
    }

    #[rstest]
    #[case::left(Alignment::Left, vec![LineFlag::CornerBottomRight], vec![])]
    #[case::center(
        Alignment::Center,
        vec![LineFlag::CornerBottomLeft, LineFlag::CornerBottomRight],
        vec![]
    )]
    #[case::right(Alignment::Right, vec![LineFlag::CornerBottomLeft], vec![])]
    fn test_wider_line_squares_previous_open_side(
        #[case] alignment: Alignment,
        #[case] expected_prev: Vec<LineFlag>,
        #[case] expected_cur: Vec<LineFlag>,
    ) {
        let mut lines = vec![line(100.0, 5.0), line(300.0, 5.0)];
        CornerResolver::new(alignment).resolve(&mut lines);
        assert_eq!(lines[0].flags(), expected_prev);
        assert_eq!(lines[1].flags(), expected_cur);
        assert!(lines.iter().all(|l| l.forced_width.is_none()));
    }

    #[test]
    fn test_tolerance_doubles_for_center() {
        // 10px apart with radius 3: outside 2 * 3 for left, inside 2 * 6 for center
        let left = CornerResolver::new(Alignment::Left);
        let center = CornerResolver::new(Alignment::Center);
        assert_eq!(left.classify(110.0, 3.0, 100.0, 3.0), WidthRelation::Narrower);
        assert_eq!(center.classify(110.0, 3.0, 100.0, 3.0), WidthRelation::Equal);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let resolver = CornerResolver::new(Alignment::Left);
        // prev - 5 >= cur + 5 exactly
        assert_eq!(resolver.classify(110.0, 5.0, 100.0, 5.0), WidthRelation::Narrower);
        assert_eq!(resolver.classify(100.0, 5.0, 110.0, 5.0), WidthRelation::Wider);
        assert_eq!(resolver.classify(109.9, 5.0, 100.0, 5.0), WidthRelation::Equal);
    }

    #[test]
    fn test_equal_uses_max_width() {
        let mut prev = line(104.0, 5.0);
        let mut cur = line(100.0, 5.0);
        let relation = CornerResolver::new(Alignment::Center).apply_pair(&mut prev, &mut cur);
        assert_eq!(relation, Some(WidthRelation::Equal));
        assert_eq!(prev.forced_width, Some(104.0));
        assert_eq!(cur.forced_width, Some(104.0));
        assert_eq!(cur.effective_width(), Some(104.0));
    }

    #[test]
    fn test_forced_width_feeds_next_comparison() {
        // Line 1 is forced to 104 by line 0, then compared against line 2 at 112.
        // Measured 100 vs 112 would be wider for left alignment (radius 5);
        // the forced 104 vs 112 is within tolerance.
        let mut lines = vec![line(104.0, 5.0), line(100.0, 5.0), line(112.0, 5.0)];
        CornerResolver::new(Alignment::Left).resolve(&mut lines);
        assert_eq!(lines[1].flags(), vec![LineFlag::ConnectTop, LineFlag::ConnectBottom]);
        assert_eq!(lines[1].forced_width, Some(112.0));
        assert_eq!(lines[0].forced_width, Some(104.0));
    }

    #[rstest]
    #[case(Alignment::Left)]
    #[case(Alignment::Center)]
    #[case(Alignment::Right)]
    fn test_monotonic_accumulation(#[case] alignment: Alignment) {
        let widths = [80.0, 300.0, 290.0, 40.0, 40.0, 500.0, 10.0];
        let mut lines: Vec<LineBox> = widths.iter().map(|w| line(*w, 5.6)).collect();
        let resolver = CornerResolver::new(alignment);

        for i in 1..lines.len() {
            let before = lines.clone();
            let (head, tail) = lines.split_at_mut(i);
            resolver.apply_pair(&mut head[i - 1], &mut tail[0]);
            for (after, before) in lines.iter().zip(before.iter()) {
                assert!(after.corners.dominates(&before.corners));
                for flag in before.flags() {
                    assert!(after.flags().contains(&flag));
                }
            }
        }
    }

    #[test]
    fn test_alignment_rule_left() {
        let mut lines = vec![line(100.0, 5.0), line(100.0, 5.0), line(100.0, 5.0)];
        CornerResolver::new(Alignment::Left).apply_alignment_rule(&mut lines);

        assert_eq!(lines[0].corners.get(Corner::TopLeft), CornerShape::Rounded);
        assert_eq!(lines[0].corners.get(Corner::BottomLeft), CornerShape::Flush);
        assert_eq!(lines[1].corners.get(Corner::TopLeft), CornerShape::Flush);
        assert_eq!(lines[1].corners.get(Corner::BottomLeft), CornerShape::Flush);
        assert_eq!(lines[2].corners.get(Corner::TopLeft), CornerShape::Flush);
        assert_eq!(lines[2].corners.get(Corner::BottomLeft), CornerShape::Rounded);
        for l in &lines {
            assert_eq!(l.corners.get(Corner::TopRight), CornerShape::Rounded);
            assert_eq!(l.corners.get(Corner::BottomRight), CornerShape::Rounded);
        }
    }

    #[test]
    fn test_alignment_rule_right_mirrors_left() {
        let mut lines = vec![line(100.0, 5.0), line(50.0, 5.0)];
        CornerResolver::new(Alignment::Right).apply_alignment_rule(&mut lines);

        assert_eq!(lines[0].corners.get(Corner::BottomRight), CornerShape::Flush);
        assert_eq!(lines[1].corners.get(Corner::TopRight), CornerShape::Flush);
        for l in &lines {
            assert_eq!(l.corners.get(Corner::TopLeft), CornerShape::Rounded);
            assert_eq!(l.corners.get(Corner::BottomLeft), CornerShape::Rounded);
        }
    }

    #[test]
    fn test_alignment_rule_center_adds_nothing() {
        let mut lines = vec![line(100.0, 5.0), line(50.0, 5.0), line(70.0, 5.0)];
        CornerResolver::new(Alignment::Center).apply_alignment_rule(&mut lines);
        assert!(lines.iter().all(|l| l.corners.all_rounded()));
    }

    #[test]
    fn test_pair_rule_outranks_flush() {
        // Left aligned, second line narrower: its top-left is flush, top-right flares.
        let mut lines = vec![line(300.0, 5.0), line(100.0, 5.0)];
        CornerResolver::new(Alignment::Left).resolve(&mut lines);
        assert_eq!(lines[1].corners.get(Corner::TopLeft), CornerShape::Flush);
        assert_eq!(lines[1].corners.get(Corner::TopRight), CornerShape::Squared);
        assert_eq!(lines[0].corners.get(Corner::BottomLeft), CornerShape::Flush);
    }

    #[test]
    fn test_unmeasured_line_keeps_rounded_corners() {
        let mut lines = vec![
            line(100.0, 5.0),
            LineBox::new("lost", 1.0, None, 5.0),
            line(100.0, 5.0),
        ];
        CornerResolver::new(Alignment::Left).resolve(&mut lines);

        assert!(lines[1].corners.all_rounded());
        assert_eq!(lines[1].forced_width, None);
        // Neighbours still get the static rule
        assert_eq!(lines[0].corners.get(Corner::BottomLeft), CornerShape::Flush);
        assert_eq!(lines[2].corners.get(Corner::TopLeft), CornerShape::Flush);
        assert_eq!(lines[0].forced_width, None);
    }

    #[test]
    fn test_nan_width_treated_as_unmeasured() {
        let l = LineBox::new("x", 1.0, Some(f32::NAN), 5.0);
        assert_eq!(l.measured_width, None);
        assert_eq!(l.effective_width(), None);
    }

    #[test]
    fn test_alignment_from_str() {
        assert_eq!("left".parse::<Alignment>().unwrap(), Alignment::Left);
        assert_eq!(Alignment::Right.to_string(), "right");
        assert!(matches!(
            "middle".parse::<Alignment>(),
            Err(CaptionError::InvalidOption(_))
        ));
    }
}
