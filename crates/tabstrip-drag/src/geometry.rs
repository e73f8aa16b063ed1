//! Geometry snapshot
//!
//! Tab positions are read once when a drag activates and never again for
//! that drag. Re-reading layout on every move would thrash it.

use crate::host::HostSurface;

/// An axis-aligned rectangle in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Half-open containment, matching how adjacent tabs share an edge.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Rectangle grown by `amount` on every side
    pub fn expanded(&self, amount: f64) -> Self {
        Self {
            left: self.left - amount,
            top: self.top - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }
}

/// Position of one tab relative to the strip's content region.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TabLayout {
    pub left: f64,
    pub width: f64,
    pub margin_left: f64,
}

impl TabLayout {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Horizontal midpoint, the crossing threshold for reordering
    pub fn midpoint(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Read the layout of the first `count` tabs from the host.
pub fn snapshot(host: &dyn HostSurface, count: usize) -> Vec<TabLayout> {
    (0..count)
        .map(|index| TabLayout {
            left: host.tab_offset_left(index),
            width: host.tab_offset_width(index),
            margin_left: parse_px(&host.tab_margin_left(index)),
        })
        .collect()
}

/// Parse a CSS pixel length the way `parseInt` would.
///
/// Leading whitespace and sign are accepted, parsing stops at the first
/// non-digit, and anything without a leading integer is 0.
pub fn parse_px(value: &str) -> f64 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -(n as f64),
        Ok(n) => n as f64,
        Err(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayList;
    use tabstrip_items::Title;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("12px"), 12.0);
        assert_eq!(parse_px(" -4px"), -4.0);
        assert_eq!(parse_px("3.75px"), 3.0);
        assert_eq!(parse_px("auto"), 0.0);
        assert_eq!(parse_px(""), 0.0);
        assert_eq!(parse_px("-"), 0.0);
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 0.0, 100.0, 30.0);
        assert!(rect.contains(10.0, 0.0));
        assert!(!rect.contains(110.0, 10.0));
        assert!(!rect.contains(50.0, 30.0));

        let grown = rect.expanded(20.0);
        assert_eq!(grown, Rect::new(-10.0, -20.0, 140.0, 70.0));
    }

    #[test]
    fn test_snapshot_reads_margins() {
        let mut display = DisplayList::new(Rect::new(0.0, 0.0, 400.0, 30.0));
        display.push_tab(&Title::new("A"), 100.0, "0px");
        display.push_tab(&Title::new("B"), 80.0, "4px");
        display.push_tab(&Title::new("C"), 80.0, "bogus");

        let layout = snapshot(&display, 3);
        assert_eq!(
            layout,
            vec![
                TabLayout {
                    left: 0.0,
                    width: 100.0,
                    margin_left: 0.0,
                },
                TabLayout {
                    left: 104.0,
                    width: 80.0,
                    margin_left: 4.0,
                },
                TabLayout {
                    left: 184.0,
                    width: 80.0,
                    margin_left: 0.0,
                },
            ]
        );
        assert_eq!(layout[1].midpoint(), 144.0);
    }
}
