use super::result::ResultTable;
use super::stats::{first_max_by, Groups, MeanAcc};
use super::QueryParams;
use crate::data::filter::FilteredView;

#[derive(Debug, Default)]
struct PublisherStats {
    books: usize,
    rating: MeanAcc,
}

/// Book count and rating mean per publisher, in first-seen order.
/// Books without a publisher are not grouped.
fn publisher_stats<'a>(view: &FilteredView<'a>) -> Groups<&'a str, PublisherStats> {
    let mut groups = Groups::new();
    for book in view.iter() {
        if let Some(publisher) = book.publisher.as_deref() {
            let stats: &mut PublisherStats = groups.entry(publisher);
            stats.books += 1;
            stats.rating.add_opt(book.average_rating);
        }
    }
    groups
}

pub(super) fn top_publisher(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let groups = publisher_stats(view);
    let mut table = ResultTable::new(["Publisher", "Books Published"]).with_chart(0, 1);
    if let Some((name, stats)) = first_max_by(groups.iter(), |(_, s)| s.books as f64) {
        table.push(vec![(*name).into(), stats.books.into()]);
    }
    table
}

/// Highest mean rating among publishers with more than `min_books` books and at least
/// one rated book.
fn best_rated(view: &FilteredView<'_>, min_books: Option<usize>) -> ResultTable {
    let groups = publisher_stats(view);
    let candidates = groups
        .iter()
        .filter(|(_, s)| min_books.map_or(true, |min| s.books > min))
        .filter_map(|(name, s)| s.rating.mean().map(|m| (*name, m, s)));

    let mut table =
        ResultTable::new(["Publisher", "Average Rating", "Rated Books", "Books Published"])
            .with_chart(0, 1);
    if let Some((name, mean, stats)) = first_max_by(candidates, |c| c.1) {
        table.push(vec![
            name.into(),
            mean.into(),
            stats.rating.count().into(),
            stats.books.into(),
        ]);
    }
    table
}

pub(super) fn top_rated_publisher(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    best_rated(view, None)
}

pub(super) fn top_rated_large_publisher(
    view: &FilteredView<'_>,
    params: &QueryParams,
) -> ResultTable {
    best_rated(view, Some(params.large_publisher_books))
}

pub(super) fn large_publishers(view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
    let mut table = ResultTable::new(["Publisher", "Books Published"]).with_chart(0, 1);
    for (name, stats) in publisher_stats(view).iter() {
        if stats.books > params.large_publisher_books {
            table.push(vec![(*name).into(), stats.books.into()]);
        }
    }
    table
}
