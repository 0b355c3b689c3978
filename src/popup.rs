/// Gap between a target and a popup placed next to it.
pub const NEAR_GAP: i32 = 5;

/// Where a popup goes relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Above,
    Over,
    #[default]
    Below,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Absolute bounds of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Top-left corner for a popup of size `popup` shown at `pos` relative to
/// `target`.
///
/// A popup that would run off the right edge of the viewport is shifted left,
/// but never past the left edge. Coordinates saturate at the `i32` bounds.
pub fn place(popup: Size, pos: Position, target: Rect, viewport: Size) -> (i32, i32) {
    let mut left = match pos {
        Position::Right => target
            .left
            .saturating_add(target.width)
            .saturating_add(NEAR_GAP),
        _ => target.left,
    };
    if left.saturating_add(popup.width) > viewport.width {
        left = viewport.width.saturating_sub(popup.width).max(0);
    }

    let top = match pos {
        Position::Above => target
            .top
            .saturating_sub(popup.height)
            .saturating_sub(NEAR_GAP),
        Position::Over => target.top,
        Position::Right => target
            .top
            .saturating_add(target.height.saturating_sub(popup.height) / 2),
        Position::Below => target
            .top
            .saturating_add(target.height)
            .saturating_add(NEAR_GAP),
    };

    (left, top)
}

/// Top-left corner for a popup centred horizontally in the viewport and
/// vertically on `ypos`. The popup is kept inside the viewport when it fits.
pub fn center_on(popup: Size, ypos: i32, viewport: Size) -> (i32, i32) {
    let left = viewport.width.saturating_sub(popup.width) >> 1;
    let mut top = ypos.saturating_sub(popup.height / 2);
    if popup.height < viewport.height {
        top = top.max(0).min(viewport.height.saturating_sub(popup.height));
    }
    (left, top)
}

/// [`center_on`] the vertical middle of `target`.
pub fn center_on_target(popup: Size, target: Rect, viewport: Size) -> (i32, i32) {
    center_on(popup, target.top.saturating_add(target.height / 2), viewport)
}
