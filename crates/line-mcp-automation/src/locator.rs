//! Element locator
//!
//! Resolves a [`UiRegion`] to the screen point that should be clicked.
//! On macOS the rectangle comes from a live System Events query of a known
//! element path; on Windows LINE's accessibility tree is not reliable, so the
//! point is a fixed offset from the window bounds. All pixel heuristics live
//! here as named constants so a LINE layout change is a one-line fix.

use line_mcp_protocol::{Point, Rect, UiRegion};

/// Where inside a queried rectangle to click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Rectangle center shifted by a pixel bias
    Center { dx: i32, dy: i32 },
    /// Inset from the bottom-right corner
    BottomRightInset { dx: i32, dy: i32 },
    /// A quarter of the width in from the left edge, `rise` pixels above the top edge
    AboveLeftQuarter { rise: i32 },
}

impl Anchor {
    pub const CENTER: Anchor = Anchor::Center { dx: 0, dy: 0 };

    pub fn apply(&self, rect: Rect) -> Point {
        match *self {
            Anchor::Center { dx, dy } => rect.center().offset(dx, dy),
            Anchor::BottomRightInset { dx, dy } => Point::new(rect.right() - dx, rect.bottom() - dy),
            Anchor::AboveLeftQuarter { rise } => Point::new(rect.x + rect.width / 4, rect.y - rise),
        }
    }
}

/// A System Events element path plus the anchor to click within it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpec {
    pub path: &'static str,
    pub anchor: Anchor,
}

/// Chat search box
pub const MACOS_SEARCH_FIELD: ElementSpec = ElementSpec {
    path: "text field 1 of splitter group 1 of window 1",
    anchor: Anchor::CENTER,
};

/// First result row; its lower part is covered by the next row, so click 15 px above center
pub const MACOS_RESULT_ROW: ElementSpec = ElementSpec {
    path: "row 2 of list 1 of splitter group 1 of window 1",
    anchor: Anchor::Center { dx: 0, dy: -15 },
};

/// Message list; clicked near the bottom-right corner to stay clear of message bubbles
pub const MACOS_MESSAGE_LIST: ElementSpec = ElementSpec {
    path: "list 1 of splitter group 1 of splitter group 1 of window 1",
    anchor: Anchor::BottomRightInset { dx: 20, dy: 15 },
};

/// Message composer
pub const MACOS_INPUT_BOX: ElementSpec = ElementSpec {
    path: "text area 1 of splitter group 1 of splitter group 1 of window 1",
    anchor: Anchor::CENTER,
};

/// Mention popup, which opens just above the composer
pub const MACOS_MENTION_POPUP: ElementSpec = ElementSpec {
    path: MACOS_INPUT_BOX.path,
    anchor: Anchor::AboveLeftQuarter { rise: 10 },
};

/// Element to query for a region on macOS
pub fn macos_element(region: UiRegion) -> ElementSpec {
    match region {
        UiRegion::SearchField => MACOS_SEARCH_FIELD,
        UiRegion::ResultRow => MACOS_RESULT_ROW,
        UiRegion::MessageList | UiRegion::MessagePane => MACOS_MESSAGE_LIST,
        UiRegion::InputBox => MACOS_INPUT_BOX,
        UiRegion::MentionPopup => MACOS_MENTION_POPUP,
    }
}

/// One axis of a window-relative offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Pixels from the left/top edge
    Start(i32),
    /// Pixels back from the right/bottom edge
    End(i32),
    /// `num / den` of the window extent
    Fraction(i32, i32),
}

impl Edge {
    fn resolve(&self, origin: i32, extent: i32) -> i32 {
        match *self {
            Edge::Start(px) => origin + px,
            Edge::End(px) => origin + extent - px,
            Edge::Fraction(num, den) if den != 0 => origin + extent * num / den,
            Edge::Fraction(..) => origin,
        }
    }
}

/// A click point expressed relative to the window bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOffset {
    pub x: Edge,
    pub y: Edge,
}

impl WindowOffset {
    pub fn resolve(&self, window: Rect) -> Point {
        Point::new(
            self.x.resolve(window.x, window.width),
            self.y.resolve(window.y, window.height),
        )
    }
}

/// Chat list tab; the search box is focused with a shortcut afterwards
pub const WINDOWS_SEARCH_FIELD: WindowOffset = WindowOffset {
    x: Edge::Start(30),
    y: Edge::Start(110),
};

/// First row under the search box
pub const WINDOWS_RESULT_ROW: WindowOffset = WindowOffset {
    x: Edge::Start(200),
    y: Edge::Start(140),
};

/// Lower part of the message list, used to focus it before paging
pub const WINDOWS_MESSAGE_LIST: WindowOffset = WindowOffset {
    x: Edge::Start(400),
    y: Edge::End(100),
};

/// Right edge of the message pane, clear of bubbles, used before select-all
pub const WINDOWS_MESSAGE_PANE: WindowOffset = WindowOffset {
    x: Edge::End(20),
    y: Edge::Fraction(1, 2),
};

/// Message composer
pub const WINDOWS_INPUT_BOX: WindowOffset = WindowOffset {
    x: Edge::Fraction(3, 4),
    y: Edge::End(100),
};

/// Mention popup row above the composer
pub const WINDOWS_MENTION_POPUP: WindowOffset = WindowOffset {
    x: Edge::Fraction(3, 4),
    y: Edge::End(130),
};

/// Window-relative offset for a region on Windows
pub fn windows_offset(region: UiRegion) -> WindowOffset {
    match region {
        UiRegion::SearchField => WINDOWS_SEARCH_FIELD,
        UiRegion::ResultRow => WINDOWS_RESULT_ROW,
        UiRegion::MessageList => WINDOWS_MESSAGE_LIST,
        UiRegion::MessagePane => WINDOWS_MESSAGE_PANE,
        UiRegion::InputBox => WINDOWS_INPUT_BOX,
        UiRegion::MentionPopup => WINDOWS_MENTION_POPUP,
    }
}

/// Parse `x, y, width, height` as printed by the bounds scripts.
///
/// AppleScript may print reals (`12.0`), so each field is parsed as a float
/// and rounded.
pub fn parse_bounds(output: &str) -> Option<Rect> {
    let values: Vec<i32> = output
        .trim()
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok().map(|v| v.round() as i32))
        .collect::<Option<Vec<_>>>()?;

    match values.as_slice() {
        [x, y, w, h] if *w >= 0 && *h >= 0 => Some(Rect::new(*x, *y, *w, *h)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_anchor() {
        let rect = Rect::new(100, 50, 200, 30);
        assert_eq!(Anchor::CENTER.apply(rect), Point::new(200, 65));
    }

    #[test]
    fn test_result_row_is_biased_upwards() {
        let rect = Rect::new(0, 100, 300, 60);
        let point = MACOS_RESULT_ROW.anchor.apply(rect);
        assert_eq!(point, Point::new(150, 115));
    }

    #[test]
    fn test_message_list_bottom_right_inset() {
        let rect = Rect::new(300, 40, 700, 600);
        let point = MACOS_MESSAGE_LIST.anchor.apply(rect);
        assert_eq!(point, Point::new(980, 625));
    }

    #[test]
    fn test_mention_popup_above_input_box() {
        let rect = Rect::new(300, 700, 800, 80);
        let point = MACOS_MENTION_POPUP.anchor.apply(rect);
        assert_eq!(point, Point::new(500, 690));
        assert_eq!(MACOS_MENTION_POPUP.path, MACOS_INPUT_BOX.path);
    }

    #[test]
    fn test_macos_message_pane_shares_list_element() {
        assert_eq!(
            macos_element(UiRegion::MessagePane),
            macos_element(UiRegion::MessageList)
        );
    }

    #[test]
    fn test_windows_offsets() {
        let window = Rect::new(100, 50, 1000, 800);
        assert_eq!(
            windows_offset(UiRegion::SearchField).resolve(window),
            Point::new(130, 160)
        );
        assert_eq!(
            windows_offset(UiRegion::ResultRow).resolve(window),
            Point::new(300, 190)
        );
        assert_eq!(
            windows_offset(UiRegion::MessageList).resolve(window),
            Point::new(500, 750)
        );
        assert_eq!(
            windows_offset(UiRegion::MessagePane).resolve(window),
            Point::new(1080, 450)
        );
        assert_eq!(
            windows_offset(UiRegion::InputBox).resolve(window),
            Point::new(850, 750)
        );
        assert_eq!(
            windows_offset(UiRegion::MentionPopup).resolve(window),
            Point::new(850, 720)
        );
    }

    #[test]
    fn test_zero_denominator_falls_back_to_origin() {
        let offset = WindowOffset {
            x: Edge::Fraction(1, 0),
            y: Edge::Start(0),
        };
        assert_eq!(offset.resolve(Rect::new(7, 9, 10, 10)), Point::new(7, 9));
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(parse_bounds("10, 20, 300, 40\n"), Some(Rect::new(10, 20, 300, 40)));
        assert_eq!(parse_bounds("-1280,0,1280,800"), Some(Rect::new(-1280, 0, 1280, 800)));
        assert_eq!(parse_bounds("12.0, 7.6, 100.0, 20.0"), Some(Rect::new(12, 8, 100, 20)));
    }

    #[test]
    fn test_parse_bounds_rejects_garbage() {
        // 事前条件違反: 要素数・数値・サイズが不正
        assert_eq!(parse_bounds(""), None);
        assert_eq!(parse_bounds("1, 2, 3"), None);
        assert_eq!(parse_bounds("a, b, c, d"), None);
        assert_eq!(parse_bounds("0, 0, -5, 10"), None);
    }
}
