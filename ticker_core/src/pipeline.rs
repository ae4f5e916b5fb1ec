//! Search and sort applied to the fetched ticker list.
//!
//! `filter_sort` is the single place that derives the visible list; it is called
//! after every fetch and after every search or sort change, so the visible list is
//! always a function of `(tickers, query, sort)` and nothing else.

use std::cmp::Ordering;
use ticker_common::{SortOption, ViewTicker};

/// Filters `tickers` by `query` and orders the result by `sort`.
///
/// The query matches case-insensitively anywhere in the display name; an empty
/// query keeps every ticker. Sorting is stable, so tickers with equal keys keep
/// the order the source delivered them in.
pub fn filter_sort(tickers: &[ViewTicker], query: &str, sort: SortOption) -> Vec<ViewTicker> {
    let needle = query.to_lowercase();
    let mut filtered: Vec<ViewTicker> = tickers
        .iter()
        .filter(|t| needle.is_empty() || t.display_name().to_lowercase().contains(&needle))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| compare(a, b, sort));
    filtered
}

fn compare(a: &ViewTicker, b: &ViewTicker, sort: SortOption) -> Ordering {
    match sort {
        SortOption::PriceAsc => a.last_price().total_cmp(&b.last_price()),
        SortOption::PriceDesc => b.last_price().total_cmp(&a.last_price()),
        SortOption::ChangeAsc => a
            .daily_change_percent()
            .total_cmp(&b.daily_change_percent()),
        SortOption::ChangeDesc => b
            .daily_change_percent()
            .total_cmp(&a.daily_change_percent()),
    }
}
