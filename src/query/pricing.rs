use std::cmp::Ordering;

use super::catalog::mean_by_format;
use super::result::ResultTable;
use super::stats::{first_max_by, Groups, MeanAcc};
use super::QueryParams;
use crate::data::filter::FilteredView;
use crate::data::model::BookRecord;

/// Descending by price, books without a price last.
fn by_price_desc(a: &BookRecord, b: &BookRecord) -> Ordering {
    match (a.retail_price, b.retail_price) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(super) fn most_expensive(view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
    let mut books: Vec<&BookRecord> = view.iter().collect();
    // stable: equal prices keep view order
    books.sort_by(|a, b| by_price_desc(a, b));
    books.truncate(params.top_n);
    ResultTable::listing(books, ["Retail Price"], |b| [b.retail_price.into()])
}

/// Discount in percent, defined only when the list price is above the retail price.
fn discount_pct(book: &BookRecord) -> Option<f64> {
    let (list, retail) = (book.list_price?, book.retail_price?);
    (list > retail).then(|| (list - retail) / list * 100.0)
}

pub(super) fn discounted_books(view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
    let books = view
        .iter()
        .filter(|b| discount_pct(b).is_some_and(|d| d > params.min_discount_pct));
    ResultTable::listing(
        books,
        ["List Price", "Retail Price", "Discount %"],
        |b| [b.list_price.into(), b.retail_price.into(), discount_pct(b).into()],
    )
    .with_chart(0, 3)
}

/// The year whose priced books have the highest mean retail price.
pub(super) fn priciest_year(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let mut years: Groups<i32, MeanAcc> = Groups::new();
    for book in view.iter() {
        if let (Some(year), Some(price)) = (book.year, book.retail_price) {
            years.entry(year).add(price);
        }
    }

    let mut table = ResultTable::new(["Year", "Average Price", "Priced Books"]).with_chart(0, 1);
    let candidates = years
        .iter()
        .filter_map(|(y, acc)| acc.mean().map(|m| (*y, m, acc.count())));
    if let Some((year, mean, n)) = first_max_by(candidates, |c| c.1) {
        table.push(vec![year.into(), mean.into(), n.into()]);
    }
    table
}

pub(super) fn avg_price_by_format(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    mean_by_format(view, "Average Price", |b| b.retail_price)
}
