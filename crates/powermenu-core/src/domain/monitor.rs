//! Display monitors as reported by the platform.

use super::grid::Rect;

/// One platform-reported display.  Read-only to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    /// Position in the platform's monitor list.
    pub index: usize,
    /// Monitor area in root-window coordinates.
    pub geometry: Rect,
}

impl Monitor {
    pub fn new(index: usize, geometry: Rect) -> Self {
        Self { index, geometry }
    }
}

/// Returns the index of the first monitor containing the point.
pub fn monitor_at(monitors: &[Monitor], x: i32, y: i32) -> Option<usize> {
    monitors
        .iter()
        .find(|monitor| monitor.geometry.contains(x, y))
        .map(|monitor| monitor.index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_side_by_side() -> Vec<Monitor> {
        (0..3)
            .map(|i| Monitor::new(i, Rect::new(1920 * i as i32, 0, 1920, 1080)))
            .collect()
    }

    #[test]
    fn test_monitor_at_finds_hosting_monitor() {
        let monitors = three_side_by_side();
        assert_eq!(monitor_at(&monitors, 100, 100), Some(0));
        assert_eq!(monitor_at(&monitors, 1920 + 960, 540), Some(1));
        assert_eq!(monitor_at(&monitors, 5000, 10), Some(2));
    }

    #[test]
    fn test_monitor_at_outside_every_monitor() {
        assert_eq!(monitor_at(&three_side_by_side(), 100, 2000), None);
    }
}
