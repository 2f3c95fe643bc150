use std::collections::BTreeSet;

use super::catalog::authors_cell;
use super::result::ResultTable;
use super::stats::{top_k_by_count, Groups};
use super::QueryParams;
use crate::data::filter::FilteredView;

pub(super) fn top_authors(view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
    let mut counts: Groups<&str, usize> = Groups::new();
    for book in view.iter() {
        for author in book.distinct_authors() {
            *counts.entry(author) += 1;
        }
    }

    let mut table = ResultTable::new(["Author", "Books"]).with_chart(0, 1);
    for (author, n) in top_k_by_count(counts.into_vec(), params.top_authors) {
        table.push(vec![author.into(), n.into()]);
    }
    table
}

pub(super) fn multi_author_books(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let books = view.iter().filter(|b| b.authors.len() > 3);
    ResultTable::listing(books, ["Authors Count", "Authors"], |b| {
        [b.authors.len().into(), authors_cell(b)]
    })
}

/// (author, year) pairs shared by two or more books.
pub(super) fn author_year_duplicates(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let mut counts: Groups<(&str, i32), usize> = Groups::new();
    for book in view.iter() {
        let Some(year) = book.year else { continue };
        for author in book.distinct_authors() {
            *counts.entry((author, year)) += 1;
        }
    }

    let mut table = ResultTable::new(["Author", "Year", "Books"]).with_chart(0, 2);
    for ((author, year), n) in counts.into_vec() {
        if n >= 2 {
            table.push(vec![author.into(), year.into(), n.into()]);
        }
    }
    table
}

/// Longest run of consecutive years as `(first_year, length)`; earliest run wins ties.
fn longest_run(years: &BTreeSet<i32>) -> Option<(i32, usize)> {
    let mut best: Option<(i32, usize)> = None;
    let mut current: Option<(i32, usize)> = None;
    let mut prev: Option<i32> = None;

    for &y in years {
        current = match (current, prev) {
            (Some((start, len)), Some(p)) if p.checked_add(1) == Some(y) => Some((start, len + 1)),
            _ => Some((y, 1)),
        };
        if let Some(run) = current {
            if best.map_or(true, |b| run.1 > b.1) {
                best = Some(run);
            }
        }
        prev = Some(y);
    }
    best
}

pub(super) fn consecutive_year_authors(
    view: &FilteredView<'_>,
    params: &QueryParams,
) -> ResultTable {
    let mut years: Groups<&str, BTreeSet<i32>> = Groups::new();
    for book in view.iter() {
        let Some(year) = book.year else { continue };
        for author in book.distinct_authors() {
            years.entry(author).insert(year);
        }
    }

    let mut table = ResultTable::new(["Author", "Longest Streak", "From", "To"]).with_chart(0, 1);
    for (author, set) in years.iter() {
        let Some((start, len)) = longest_run(set) else { continue };
        if len >= params.consecutive_years {
            let end = start + (len as i32 - 1);
            table.push(vec![(*author).into(), len.into(), start.into(), end.into()]);
        }
    }
    table
}

/// Authors who appear under two or more distinct publishers within one year.
pub(super) fn multi_publisher_authors(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let mut publishers: Groups<(&str, i32), Vec<&str>> = Groups::new();
    for book in view.iter() {
        let (Some(year), Some(publisher)) = (book.year, book.publisher.as_deref()) else {
            continue;
        };
        for author in book.distinct_authors() {
            let seen = publishers.entry((author, year));
            if !seen.contains(&publisher) {
                seen.push(publisher);
            }
        }
    }

    let mut table =
        ResultTable::new(["Author", "Year", "Publishers", "Publisher Names"]).with_chart(0, 2);
    for ((author, year), names) in publishers.into_vec() {
        if names.len() >= 2 {
            table.push(vec![
                author.into(),
                year.into(),
                names.len().into(),
                names.join(", ").into(),
            ]);
        }
    }
    table
}
