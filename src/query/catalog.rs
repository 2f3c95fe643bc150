use super::result::{ResultTable, Value};
use super::stats::{mean, sample_std_dev, Groups, MeanAcc};
use super::QueryParams;
use crate::data::filter::FilteredView;
use crate::data::model::BookRecord;
use crate::data::search::search;

pub(super) const EBOOKS: &str = "eBooks";
pub(super) const PHYSICAL: &str = "Physical Books";

pub(super) fn format_label(book: &BookRecord) -> &'static str {
    if book.is_ebook() {
        EBOOKS
    } else {
        PHYSICAL
    }
}

pub(super) fn authors_cell(book: &BookRecord) -> Value {
    if book.authors.is_empty() {
        Value::Null
    } else {
        Value::from(book.authors.join(", "))
    }
}

/// Mean of `value` per format. A format with books but no values reports `Null`.
pub(super) fn mean_by_format(
    view: &FilteredView<'_>,
    column: &str,
    value: impl Fn(&BookRecord) -> Option<f64>,
) -> ResultTable {
    let mut groups: Groups<&'static str, MeanAcc> = Groups::new();
    for book in view.iter() {
        groups.entry(format_label(book)).add_opt(value(book));
    }

    let mut table = ResultTable::new(["Type", column]).with_chart(0, 1);
    for label in [EBOOKS, PHYSICAL] {
        if let Some(acc) = groups.get(&label) {
            table.push(vec![label.into(), acc.mean().into()]);
        }
    }
    table
}

pub(super) fn format_split(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let mut table = ResultTable::new(["Type", "Count"]).with_chart(0, 1);
    if view.is_empty() {
        return table;
    }
    let ebooks = view.iter().filter(|b| b.is_ebook()).count();
    table.push(vec![EBOOKS.into(), ebooks.into()]);
    table.push(vec![PHYSICAL.into(), (view.len() - ebooks).into()]);
    table
}

pub(super) fn long_recent_books(view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
    let books = view.iter().filter(|b| {
        b.year.is_some_and(|y| y > params.recent_after_year)
            && b.page_count.is_some_and(|p| p >= params.min_pages)
    });
    ResultTable::listing(books, ["Pages", "Year"], |b| {
        [b.page_count.into(), b.year.into()]
    })
}

pub(super) fn avg_pages_by_format(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    mean_by_format(view, "Average Page Count", |b| b.page_count.map(f64::from))
}

pub(super) fn avg_pages_by_category(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let mut groups: Groups<&str, MeanAcc> = Groups::new();
    for book in view.iter() {
        if let Some(cat) = book.categories.as_deref() {
            groups
                .entry(cat)
                .add_opt(book.page_count.map(f64::from));
        }
    }

    let mut table = ResultTable::new(["Category", "Average Page Count"]).with_chart(0, 1);
    for (cat, acc) in groups.iter() {
        table.push(vec![(*cat).into(), acc.mean().into()]);
    }
    table
}

/// Books whose ratings count is strictly above the mean over books that have one.
pub(super) fn popular_books(view: &FilteredView<'_>, _: &QueryParams) -> ResultTable {
    let avg = mean(view.iter().filter_map(|b| b.ratings_count).map(|c| c as f64));
    let books = view.iter().filter(|b| match (b.ratings_count, avg) {
        (Some(c), Some(avg)) => c as f64 > avg,
        _ => false,
    });
    ResultTable::listing(books, ["Ratings Count"], |b| [b.ratings_count.into()])
}

pub(super) fn title_keyword(view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
    let hits = search(view, &params.keyword);
    ResultTable::listing(hits.iter(), ["Authors", "Year"], |b| {
        [authors_cell(b), b.year.into()]
    })
}

/// Ratings further than `outlier_sigmas` sample standard deviations from the mean.
pub(super) fn rating_outliers(view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
    let ratings: Vec<f64> = view.iter().filter_map(|b| b.average_rating).collect();
    let limits = mean(ratings.iter().copied()).zip(sample_std_dev(&ratings));

    let books = view.iter().filter(|b| match (b.average_rating, limits) {
        (Some(r), Some((m, sd))) => (r - m).abs() > params.outlier_sigmas * sd,
        _ => false,
    });
    let m = limits.map(|(m, _)| m);
    ResultTable::listing(books, ["Average Rating", "Deviation"], |b| {
        let deviation = b.average_rating.zip(m).map(|(r, m)| r - m);
        [b.average_rating.into(), deviation.into()]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::BookTable;

    fn run(
        books: Vec<BookRecord>,
        f: fn(&FilteredView<'_>, &QueryParams) -> ResultTable,
    ) -> ResultTable {
        let table = BookTable::from_records(books);
        let view = FilteredView::all(&table);
        f(&view, &QueryParams::default())
    }

    fn ebook(id: &str, flag: Option<bool>, pages: Option<u32>) -> BookRecord {
        BookRecord {
            is_ebook: flag,
            page_count: pages,
            ..BookRecord::new(id)
        }
    }

    #[test]
    fn format_split_counts_missing_as_physical() {
        let t = run(
            vec![
                ebook("a", Some(true), None),
                ebook("b", Some(false), None),
                ebook("c", None, None),
                ebook("d", Some(true), None),
            ],
            format_split,
        );
        assert_eq!(t.column_values("Count"), vec![&Value::Integer(2), &Value::Integer(2)]);
    }

    #[test]
    fn long_recent_threshold() {
        let t = run(
            vec![
                BookRecord {
                    year: Some(2012),
                    page_count: Some(600),
                    ..BookRecord::new("a")
                },
                BookRecord {
                    year: Some(2009),
                    page_count: Some(700),
                    ..BookRecord::new("b")
                },
                BookRecord {
                    year: Some(2010),
                    page_count: Some(900),
                    ..BookRecord::new("c")
                },
                BookRecord {
                    year: Some(2020),
                    page_count: Some(500),
                    ..BookRecord::new("d")
                },
                BookRecord {
                    year: Some(2020),
                    page_count: None,
                    ..BookRecord::new("e")
                },
            ],
            long_recent_books,
        );
        assert_eq!(t.column_values("Year"), vec![&Value::Integer(2012), &Value::Integer(2020)]);
    }

    #[test]
    fn avg_pages_null_when_group_has_no_counts() {
        let t = run(
            vec![
                ebook("a", Some(true), None),
                ebook("b", Some(false), Some(300)),
                ebook("c", None, Some(500)),
            ],
            avg_pages_by_format,
        );
        assert_eq!(t.rows[0], vec![Value::from(EBOOKS), Value::Null]);
        assert_eq!(t.rows[1], vec![Value::from(PHYSICAL), Value::Float(400.0)]);
    }

    #[test]
    fn avg_pages_by_category_skips_uncategorised() {
        let cat = |id: &str, c: Option<&str>, p: Option<u32>| BookRecord {
            categories: c.map(str::to_string),
            page_count: p,
            ..BookRecord::new(id)
        };
        let t = run(
            vec![
                cat("a", Some("Art"), Some(100)),
                cat("b", None, Some(999)),
                cat("c", Some("Law"), None),
                cat("d", Some("Art"), Some(200)),
            ],
            avg_pages_by_category,
        );
        assert_eq!(
            t.rows,
            vec![
                vec![Value::from("Art"), Value::Float(150.0)],
                vec![Value::from("Law"), Value::Null],
            ]
        );
    }

    #[test]
    fn popular_books_strictly_above_mean() {
        let rated = |id: &str, c: Option<u64>| BookRecord {
            title: Some(id.to_string()),
            ratings_count: c,
            ..BookRecord::new(id)
        };
        // mean over present counts = (10 + 20 + 30) / 3 = 20
        let t = run(
            vec![rated("a", Some(10)), rated("b", Some(20)), rated("c", Some(30)), rated("d", None)],
            popular_books,
        );
        assert_eq!(t.column_values("Title"), vec![&Value::from("c")]);
    }

    #[test]
    fn outliers_use_two_sample_sigmas() {
        let mut books: Vec<BookRecord> = (0..9)
            .map(|i| BookRecord {
                average_rating: Some(4.0),
                ..BookRecord::new(format!("n{i}"))
            })
            .collect();
        books.push(BookRecord {
            title: Some("Odd One".into()),
            average_rating: Some(1.0),
            ..BookRecord::new("odd")
        });
        books.push(BookRecord::new("unrated"));

        let t = run(books, rating_outliers);
        assert_eq!(t.column_values("Title"), vec![&Value::from("Odd One")]);
    }

    #[test]
    fn outliers_need_two_ratings() {
        let t = run(
            vec![BookRecord {
                average_rating: Some(5.0),
                ..BookRecord::new("a")
            }],
            rating_outliers,
        );
        assert!(t.is_empty());
    }

    #[test]
    fn keyword_query_matches_titles() {
        let table = BookTable::from_records(vec![
            BookRecord {
                title: Some("Python Programming".into()),
                authors: vec!["A".into()],
                ..BookRecord::new("a")
            },
            BookRecord {
                title: Some("Rust in Action".into()),
                ..BookRecord::new("b")
            },
        ]);
        let view = FilteredView::all(&table);
        let params = QueryParams {
            keyword: "PYTHON".into(),
            ..QueryParams::default()
        };
        let t = title_keyword(&view, &params);
        assert_eq!(t.rows, vec![vec![Value::from("Python Programming"), Value::from("A"), Value::Null]]);

        assert!(title_keyword(&view, &QueryParams::default()).is_empty());
    }
}
