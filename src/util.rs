use crate::consts;
use ratatui::layout::{Flex, Layout, Rect, Size};

/// Return the area in the middle of the terminal in which the game is drawn
pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of the given size centered within `area`, clipped to
/// `area` if it doesn't fit
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rect::new(0, 0, 80, 24), Size::new(32, 4), Rect::new(24, 10, 32, 4))]
    #[case(Rect::new(5, 7, 20, 10), Size::new(20, 10), Rect::new(5, 7, 20, 10))]
    #[case(Rect::new(0, 0, 10, 3), Size::new(32, 4), Rect::new(0, 0, 10, 3))]
    fn test_center_rect(#[case] area: Rect, #[case] size: Size, #[case] centered: Rect) {
        assert_eq!(center_rect(area, size), centered);
    }

    #[test]
    fn display_area_fills_exact_fit() {
        let area = Rect::new(0, 0, 62, 35);
        assert_eq!(get_display_area(area), area);
    }

    #[test]
    fn display_area_is_centered() {
        assert_eq!(
            get_display_area(Rect::new(0, 0, 100, 45)),
            Rect::new(19, 5, 62, 35)
        );
    }
}
