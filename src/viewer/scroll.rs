//! Scrollbar geometry and thumb-drag state.
//!
//! Thumb length is proportional to the visible fraction of the content and
//! floored so it stays grabbable on very large datasets; the thumb offset is
//! linear in `scroll / max_scroll` over the track minus the thumb length.

/// Smallest thumb length in logical pixels
pub const MIN_THUMB_LENGTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Position and size of one scrollbar thumb along its track
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThumbGeometry {
    pub track: f64,
    pub length: f64,
    pub offset: f64,
    /// `false` when the content fits the viewport
    pub visible: bool,
}

impl ThumbGeometry {
    /// Geometry for `scroll` along an axis whose track equals the viewport extent.
    pub fn compute(viewport_extent: f64, content_extent: f64, scroll: f64) -> Self {
        let track = viewport_extent.max(0.0);
        if content_extent <= viewport_extent || track <= 0.0 {
            return Self {
                track,
                length: track,
                offset: 0.0,
                visible: false,
            };
        }
        let length = (viewport_extent / content_extent * track)
            .max(MIN_THUMB_LENGTH)
            .min(track);
        let max_scroll = content_extent - viewport_extent;
        let offset = (scroll / max_scroll).clamp(0.0, 1.0) * (track - length);
        Self {
            track,
            length,
            offset,
            visible: true,
        }
    }

    /// Travel available to the thumb
    pub fn max_offset(&self) -> f64 {
        (self.track - self.length).max(0.0)
    }

    /// CSS opacity for the scrollbar
    pub fn opacity(&self) -> f64 {
        if self.visible {
            1.0
        } else {
            0.0
        }
    }

    /// Scroll offset that puts the thumb at `offset` along the track
    pub fn scroll_for_offset(&self, offset: f64, max_scroll: f64) -> f64 {
        let travel = self.max_offset();
        if travel <= 0.0 || !offset.is_finite() {
            return 0.0;
        }
        offset.clamp(0.0, travel) / travel * max_scroll.max(0.0)
    }

    /// Scroll offset for a click at `pos` on the track: the thumb center
    /// moves to the click point.
    pub fn scroll_for_track_click(&self, pos: f64, max_scroll: f64) -> f64 {
        self.scroll_for_offset(pos - self.length / 2.0, max_scroll)
    }
}

/// An active thumb drag: pointer and thumb offset at the moment it started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbDrag {
    pub start_pointer: f64,
    pub start_offset: f64,
}

impl ThumbDrag {
    /// Thumb offset for the current pointer position
    pub fn offset_at(&self, pointer: f64) -> f64 {
        self.start_offset + (pointer - self.start_pointer)
    }
}

/// Per-axis drag flags; each axis drags independently
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub horizontal: Option<ThumbDrag>,
    pub vertical: Option<ThumbDrag>,
}

impl DragState {
    pub fn get(&self, axis: Axis) -> Option<ThumbDrag> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn set(&mut self, axis: Axis, drag: Option<ThumbDrag>) {
        match axis {
            Axis::Horizontal => self.horizontal = drag,
            Axis::Vertical => self.vertical = drag,
        }
    }
}

/// Both scrollbars
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scrollbars {
    pub horizontal: ThumbGeometry,
    pub vertical: ThumbGeometry,
}

impl Scrollbars {
    pub fn get(&self, axis: Axis) -> ThumbGeometry {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}
