use crate::Page;

/// Slices out one page of `items`.
///
/// Pages are 1-based. A page past the end shows the last page and page `0`
/// shows the first. An empty list still has one (empty) page. A `per_page` of
/// zero puts everything on a single page.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let total_items = items.len();
    let per_page = if per_page == 0 {
        total_items.max(1)
    } else {
        per_page
    };
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=10).collect();

        let first = paginate(&items, 1, 4);
        assert_eq!(first.items, vec![1, 2, 3, 4]);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 10);

        let last = paginate(&items, 3, 4);
        assert_eq!(last.items, vec![9, 10]);
    }

    #[test]
    fn test_paginate_clamps_page() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(paginate(&items, 99, 4).page, 3);
        assert_eq!(paginate(&items, 0, 4).items, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_paginate_edges() {
        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 5, 24);
        assert!(page.items.is_empty());
        assert_eq!((page.page, page.total_pages), (1, 1));

        let items = vec![1, 2, 3];
        assert_eq!(paginate(&items, 1, 0).items, vec![1, 2, 3]);
    }
}
