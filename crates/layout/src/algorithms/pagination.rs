pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Centralized logic to check if a band fits in the remaining space of a page.
///
/// * `cursor_y`: The current Y position relative to the top of the page body.
/// * `band_height`: The required height for the band.
/// * `reserved`: Space that must stay free below the band (repeated footers).
/// * `page_height`: The height of the page body.
pub fn check_band_fit(
    cursor_y: f32,
    band_height: f32,
    reserved: f32,
    page_height: f32,
) -> BreakAnalysis {
    let available = (page_height - cursor_y).max(0.0);
    // Use a small epsilon to handle floating point inaccuracies
    const EPSILON: f32 = 0.01;
    BreakAnalysis {
        should_break: band_height + reserved > available + EPSILON,
        remaining_height: available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_does_not_break() {
        let fit = check_band_fit(260.0, 20.0, 20.0, 300.0);
        assert!(!fit.should_break);
        assert_eq!(fit.remaining_height, 40.0);
    }

    #[test]
    fn reserve_forces_break() {
        let fit = check_band_fit(260.0, 20.0, 40.0, 300.0);
        assert!(fit.should_break);
    }

    #[test]
    fn overfull_cursor_has_no_remaining_height() {
        let fit = check_band_fit(320.0, 0.0, 0.0, 300.0);
        assert_eq!(fit.remaining_height, 0.0);
    }
}
