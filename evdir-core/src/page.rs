//! Paginator: bounded slices of an ordered result set.

use serde::Serialize;

use crate::constants::MAX_LIMIT;

/// A validated page request. `page >= 1` and `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Clamp an already-numeric request into range.
    pub fn new(page: i64, limit: i64) -> Self {
        PageRequest {
            page: clamp(page, 1, i64::MAX),
            limit: clamp(limit, 1, MAX_LIMIT as i64),
        }
    }

    /// Parse raw wire values. A non-numeric page means page 1; a
    /// non-numeric or zero limit means `default_limit`, so `limit=0` asks for
    /// a normal page rather than a single item.
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: usize) -> Self {
        let page = page.and_then(parse_leading_int).unwrap_or(1);
        let limit = limit
            .and_then(parse_leading_int)
            .filter(|&n| n != 0)
            .unwrap_or(default_limit as i64);
        Self::new(page, limit)
    }

    fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of results plus the metadata needed to fetch the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `items` down to the requested page. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(request.limit).max(1);
    let items = items
        .into_iter()
        .skip(request.start())
        .take(request.limit)
        .collect();

    Page {
        items,
        page: request.page,
        limit: request.limit,
        total,
        total_pages,
    }
}

/// Integer prefix of `s`, the way browsers' `parseInt` reads it: optional
/// sign, then digits, trailing junk ignored. Saturates instead of overflowing.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    seen.then_some(if negative { -value } else { value })
}

fn clamp(value: i64, min: i64, max: i64) -> usize {
    value.clamp(min, max) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int(" 7abc"), Some(7));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_limit_always_clamped() {
        for (raw, expected) in [
            (Some("0"), 12),
            (Some("0abc"), 12),
            (Some("-20"), 1),
            (Some("5"), 5),
            (Some("100"), 100),
            (Some("101"), 100),
            (Some("1000000000000000000000"), 100),
            (Some("lots"), 12),
            (None, 12),
        ] {
            let req = PageRequest::parse(None, raw, 12);
            assert_eq!(req.limit, expected, "limit {:?}", raw);
            assert!((1..=MAX_LIMIT).contains(&req.limit));
        }
    }

    #[test]
    fn test_page_coerces_to_one() {
        assert_eq!(PageRequest::parse(Some("0"), None, 12).page, 1);
        assert_eq!(PageRequest::parse(Some("-3"), None, 12).page, 1);
        assert_eq!(PageRequest::parse(Some("two"), None, 12).page, 1);
        assert_eq!(PageRequest::parse(Some("3"), None, 12).page, 3);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(Vec::<u32>::new(), PageRequest::new(1, 10));
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_single_page_when_total_fits() {
        let page = paginate(vec![1, 2, 3], PageRequest::new(1, 3));
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_past_the_end_is_empty() {
        let page = paginate(vec![1, 2], PageRequest::new(5, 10));
        assert_eq!(page.items, Vec::<i32>::new());
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 5);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = paginate(vec![1, 2], PageRequest::new(i64::MAX, 100));
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let items: Vec<u32> = (0..23).collect();
        for limit in [1, 4, 5, 22, 23, 100] {
            let total_pages = paginate(items.clone(), PageRequest::new(1, limit)).total_pages;
            let rebuilt: Vec<u32> = (1..=total_pages as i64)
                .flat_map(|p| paginate(items.clone(), PageRequest::new(p, limit)).items)
                .collect();
            assert_eq!(rebuilt, items, "limit {}", limit);
        }
    }
}
