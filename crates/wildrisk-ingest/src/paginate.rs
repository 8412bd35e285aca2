//! Bounded accumulation of paginated feature pages.
//!
//! Government WFS feeds page their responses and will happily serve
//! hundreds of thousands of features for a broad query. The accumulator
//! enforces a hard record cap by checking remaining capacity before each
//! append and taking only the slice that fits.

/// Hard cap on accumulated features per fetch.
pub const FEATURE_CAP: usize = 50_000;

/// Result of appending one page to an accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    /// How many records from the page were actually kept.
    pub appended: usize,
    /// Whether the accumulator is now at the cap.
    pub cap_reached: bool,
}

/// Append a page of records, keeping only what fits under [`FEATURE_CAP`].
///
/// Capacity is checked before anything is moved; the buffer never holds
/// more than the cap at any point.
pub fn append_page<T>(buffer: &mut Vec<T>, page: Vec<T>) -> PageOutcome {
    let remaining = FEATURE_CAP.saturating_sub(buffer.len());
    let take = page.len().min(remaining);
    buffer.extend(page.into_iter().take(take));
    PageOutcome {
        appended: take,
        cap_reached: buffer.len() >= FEATURE_CAP,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn small_pages_append_whole() {
        let mut buffer: Vec<u32> = Vec::new();
        let outcome = append_page(&mut buffer, vec![1, 2, 3]);
        assert_eq!(outcome.appended, 3);
        assert!(!outcome.cap_reached);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn cap_is_enforced_before_append() {
        // 50,500 cumulative records must yield exactly 50,000.
        let mut buffer: Vec<u32> = Vec::new();
        for _ in 0..50 {
            append_page(&mut buffer, vec![0; 1_000]);
        }
        assert_eq!(buffer.len(), 50_000);

        let outcome = append_page(&mut buffer, vec![0; 500]);
        assert_eq!(outcome.appended, 0);
        assert!(outcome.cap_reached);
        assert_eq!(buffer.len(), 50_000);
    }

    #[test]
    fn partial_page_fills_exactly_to_cap() {
        let mut buffer: Vec<u32> = vec![0; 49_800];
        let outcome = append_page(&mut buffer, vec![0; 500]);
        assert_eq!(outcome.appended, 200);
        assert!(outcome.cap_reached);
        assert_eq!(buffer.len(), FEATURE_CAP);
    }

    #[test]
    fn empty_page_is_a_noop() {
        let mut buffer: Vec<u32> = vec![1, 2];
        let outcome = append_page(&mut buffer, Vec::new());
        assert_eq!(outcome.appended, 0);
        assert!(!outcome.cap_reached);
        assert_eq!(buffer, vec![1, 2]);
    }
}
