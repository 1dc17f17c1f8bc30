use super::errors::DomainError;

/// Offset/limit window for one page of a listing, computed per request and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
    pub skip: i64,
    pub total_pages: i64,
}

/// Compute the window for `requested_page` over `total_count` records.
///
/// The page defaults to 1 when absent or non-positive. There is no upper
/// clamp: a page past the end yields an empty result set, since the total
/// count can change between a listing call and a page jump.
pub fn paginate(
    requested_page: Option<i64>,
    page_size: i64,
    total_count: i64,
) -> Result<PageWindow, DomainError> {
    if page_size <= 0 {
        return Err(DomainError::InvalidPageSize);
    }
    let page = requested_page.filter(|p| *p >= 1).unwrap_or(1);
    let total_pages = if total_count == 0 {
        0
    } else {
        (total_count + page_size - 1) / page_size
    };
    Ok(PageWindow {
        page,
        page_size,
        skip: (page - 1) * page_size,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_page_of_25_items() {
        let w = paginate(Some(3), 10, 25).expect("valid window");
        assert_eq!(w.page, 3);
        assert_eq!(w.skip, 20);
        assert_eq!(w.total_pages, 3);
    }

    #[test]
    fn page_defaults_to_one_when_absent_or_non_positive() {
        for requested in [None, Some(0), Some(-5)] {
            let w = paginate(requested, 10, 25).expect("valid window");
            assert_eq!(w.page, 1);
            assert_eq!(w.skip, 0);
        }
    }

    #[test]
    fn empty_set_has_zero_pages() {
        let w = paginate(None, 20, 0).expect("valid window");
        assert_eq!(w.total_pages, 0);
        assert_eq!(w.skip, 0);
    }

    #[test]
    fn exact_multiple_does_not_round_up() {
        assert_eq!(paginate(None, 10, 30).unwrap().total_pages, 3);
        assert_eq!(paginate(None, 10, 31).unwrap().total_pages, 4);
    }

    #[test]
    fn page_beyond_the_end_is_not_an_error() {
        let w = paginate(Some(9), 10, 25).expect("valid window");
        assert_eq!(w.skip, 80);
        assert_eq!(w.total_pages, 3);
    }

    #[test]
    fn non_positive_page_size_is_rejected() {
        assert_eq!(paginate(None, 0, 10), Err(DomainError::InvalidPageSize));
        assert_eq!(paginate(None, -1, 10), Err(DomainError::InvalidPageSize));
    }
}
