use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{BookRecord, BookTable};
use super::volumes::VolumesResponse;
use crate::error::LoadError;

/// Separator for author lists stored in a single text cell.
const AUTHOR_SEPARATOR: char = ';';

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a catalog snapshot from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "book_id": ..., "title": ..., ... }, ...]` or a saved
///                book-search API `volumes` response
/// * `.csv`     – one record per row, `authors` semicolon-separated
/// * `.parquet` – one record per row, `authors` as `List<Utf8>` or semicolon-separated text
pub fn load_file(path: &Path) -> Result<BookTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "json" => parse_json(&read_text(path)?)?,
        "csv" => parse_csv(open(path)?)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} books ({} categories) from {}",
        table.len(),
        table.categories.len(),
        path.display()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Parse a JSON snapshot.
///
/// Two shapes are accepted: a records-oriented array of flat book objects, or the
/// object returned by the book-search API (`{"kind": "books#volumes", "items": [...]}`).
pub fn parse_json(text: &str) -> Result<BookTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;

    let records = match root {
        JsonValue::Array(rows) => rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::from_value::<BookRecord>(row)
                    .map(BookRecord::normalize)
                    .map_err(|e| LoadError::record(i, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?,
        JsonValue::Object(obj) => {
            if !obj.contains_key("items") && !obj.contains_key("kind") {
                return Err(LoadError::Malformed(
                    "expected an array of books or a volumes response".into(),
                ));
            }
            let response: VolumesResponse = serde_json::from_value(JsonValue::Object(obj))?;
            response
                .items
                .into_iter()
                .map(|v| BookRecord::from(v).normalize())
                .collect()
        }
        _ => {
            return Err(LoadError::Malformed(
                "expected an array of books or a volumes response".into(),
            ))
        }
    };

    Ok(BookTable::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV row. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    book_id: String,
    #[serde(default, alias = "book_title")]
    title: Option<String>,
    #[serde(default, alias = "book_subtitle")]
    subtitle: Option<String>,
    #[serde(default)]
    authors: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default, rename = "isEbook")]
    is_ebook: Option<bool>,
    #[serde(default, rename = "pageCount")]
    page_count: Option<u32>,
    #[serde(default, rename = "averageRating")]
    average_rating: Option<f64>,
    #[serde(default, rename = "ratingsCount")]
    ratings_count: Option<u64>,
    #[serde(default, rename = "listPrice")]
    list_price: Option<f64>,
    #[serde(default, rename = "retailPrice")]
    retail_price: Option<f64>,
}

impl From<CsvRow> for BookRecord {
    fn from(row: CsvRow) -> Self {
        BookRecord {
            book_id: row.book_id,
            title: row.title,
            subtitle: row.subtitle,
            authors: row.authors.as_deref().map(split_authors).unwrap_or_default(),
            publisher: row.publisher,
            categories: row.categories,
            year: row.year,
            is_ebook: row.is_ebook,
            page_count: row.page_count,
            average_rating: row.average_rating,
            ratings_count: row.ratings_count,
            list_price: row.list_price,
            retail_price: row.retail_price,
        }
        .normalize()
    }
}

/// CSV layout: header row with the record field names, one book per row.
pub fn parse_csv<R: Read>(input: R) -> Result<BookTable, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let records = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(i, row)| ensure_finite(i, BookRecord::from(row?)))
        .collect::<Result<Vec<_>, LoadError>>()?;
    Ok(BookTable::from_records(records))
}

/// Text formats can spell out `NaN` and `inf`; neither is a usable rating or price.
fn ensure_finite(row: usize, book: BookRecord) -> Result<BookRecord, LoadError> {
    for (name, value) in [
        ("averageRating", book.average_rating),
        ("listPrice", book.list_price),
        ("retailPrice", book.retail_price),
    ] {
        if let Some(v) = value.filter(|v| !v.is_finite()) {
            return Err(LoadError::record(row, format!("{name} is not a finite number: {v}")));
        }
    }
    Ok(book)
}

fn split_authors(s: &str) -> Vec<String> {
    s.split(AUTHOR_SEPARATOR)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one book per row.
///
/// Expected schema (only `book_id` is required):
/// - `book_id`, `title`, `subtitle`, `publisher`, `categories`: Utf8 / LargeUtf8
/// - `authors`: List<Utf8>, LargeList<Utf8>, or semicolon-separated Utf8
/// - `year`, `pageCount`, `ratingsCount`: any integer type
/// - `averageRating`, `listPrice`, `retailPrice`: any numeric type
/// - `isEbook`: Boolean
fn load_parquet(path: &Path) -> Result<BookTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let offset = records.len();
        records.extend(batch_records(&batch, offset)?);
    }

    Ok(BookTable::from_records(records))
}

fn batch_records(batch: &RecordBatch, offset: usize) -> Result<Vec<BookRecord>, LoadError> {
    let ids = column(batch, offset, &["book_id"], &DataType::Utf8)?
        .ok_or_else(|| LoadError::Malformed("Parquet file missing 'book_id' column".into()))?;
    let ids = ids.as_string::<i32>();

    let title = column(batch, offset, &["title", "book_title"], &DataType::Utf8)?;
    let subtitle = column(batch, offset, &["subtitle", "book_subtitle"], &DataType::Utf8)?;
    let publisher = column(batch, offset, &["publisher"], &DataType::Utf8)?;
    let categories = column(batch, offset, &["categories"], &DataType::Utf8)?;
    let year = column(batch, offset, &["year"], &DataType::Int64)?;
    let is_ebook = column(batch, offset, &["isEbook"], &DataType::Boolean)?;
    let page_count = column(batch, offset, &["pageCount"], &DataType::Int64)?;
    let average_rating = column(batch, offset, &["averageRating"], &DataType::Float64)?;
    let ratings_count = column(batch, offset, &["ratingsCount"], &DataType::Int64)?;
    let list_price = column(batch, offset, &["listPrice"], &DataType::Float64)?;
    let retail_price = column(batch, offset, &["retailPrice"], &DataType::Float64)?;
    let authors = authors_column(batch)?;

    (0..batch.num_rows())
        .map(|row| {
            if ids.is_null(row) {
                return Err(LoadError::record(offset + row, "missing book_id"));
            }
            let book = BookRecord {
                book_id: ids.value(row).to_string(),
                title: text_at(title.as_ref(), row),
                subtitle: text_at(subtitle.as_ref(), row),
                authors: authors_at(authors.as_ref(), row),
                publisher: text_at(publisher.as_ref(), row),
                categories: text_at(categories.as_ref(), row),
                year: narrow(int_at(year.as_ref(), row), offset + row, "year")?,
                is_ebook: bool_at(is_ebook.as_ref(), row),
                page_count: narrow(int_at(page_count.as_ref(), row), offset + row, "pageCount")?,
                average_rating: float_at(average_rating.as_ref(), row),
                ratings_count: narrow(
                    int_at(ratings_count.as_ref(), row),
                    offset + row,
                    "ratingsCount",
                )?,
                list_price: float_at(list_price.as_ref(), row),
                retail_price: float_at(retail_price.as_ref(), row),
            }
            .normalize();
            ensure_finite(offset + row, book)
        })
        .collect()
}

// -- Parquet / Arrow helpers --

/// First present column among `names`, cast to `to`.
///
/// A value the cast could not convert comes back null; that is reported against its row
/// rather than read as a missing field.
fn column(
    batch: &RecordBatch,
    offset: usize,
    names: &[&str],
    to: &DataType,
) -> Result<Option<ArrayRef>, LoadError> {
    let Some((name, col)) = names
        .iter()
        .find_map(|n| batch.column_by_name(n).map(|c| (*n, c)))
    else {
        return Ok(None);
    };
    let converted = cast(col.as_ref(), to)?;
    if converted.null_count() != col.null_count() {
        if let Some(row) = (0..col.len()).find(|&i| col.is_valid(i) && converted.is_null(i)) {
            return Err(LoadError::record(
                offset + row,
                format!("column '{name}' has a value that is not {to}"),
            ));
        }
    }
    Ok(Some(converted))
}

/// Integer cell narrowed to the record's field type.
fn narrow<T: TryFrom<i64>>(
    value: Option<i64>,
    row: usize,
    name: &str,
) -> Result<Option<T>, LoadError> {
    value
        .map(|v| {
            T::try_from(v).map_err(|_| LoadError::record(row, format!("{name} out of range: {v}")))
        })
        .transpose()
}

/// Author lists come either as a list column or as delimited text.
enum AuthorsColumn {
    List(ArrayRef),
    Text(ArrayRef),
}

fn authors_column(batch: &RecordBatch) -> Result<Option<AuthorsColumn>, LoadError> {
    let Some(col) = batch.column_by_name("authors") else {
        return Ok(None);
    };
    let authors = match col.data_type() {
        DataType::List(_) | DataType::LargeList(_) => {
            let item = Arc::new(Field::new("item", DataType::Utf8, true));
            AuthorsColumn::List(cast(col.as_ref(), &DataType::List(item))?)
        }
        _ => AuthorsColumn::Text(cast(col.as_ref(), &DataType::Utf8)?),
    };
    Ok(Some(authors))
}

fn authors_at(col: Option<&AuthorsColumn>, row: usize) -> Vec<String> {
    match col {
        Some(AuthorsColumn::List(arr)) => {
            let list = arr.as_list::<i32>();
            if list.is_null(row) {
                return Vec::new();
            }
            let names = list.value(row);
            names
                .as_string::<i32>()
                .iter()
                .flatten()
                .map(str::to_string)
                .collect()
        }
        Some(AuthorsColumn::Text(arr)) => text_at(Some(arr), row)
            .map(|s| split_authors(&s))
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

fn text_at(col: Option<&ArrayRef>, row: usize) -> Option<String> {
    let arr = col?.as_string::<i32>();
    (!arr.is_null(row)).then(|| arr.value(row).to_string())
}

fn int_at(col: Option<&ArrayRef>, row: usize) -> Option<i64> {
    let arr = col?.as_primitive::<Int64Type>();
    (!arr.is_null(row)).then(|| arr.value(row))
}

fn float_at(col: Option<&ArrayRef>, row: usize) -> Option<f64> {
    let arr = col?.as_primitive::<Float64Type>();
    (!arr.is_null(row)).then(|| arr.value(row))
}

fn bool_at(col: Option<&ArrayRef>, row: usize) -> Option<bool> {
    let arr = col?.as_boolean();
    (!arr.is_null(row)).then(|| arr.value(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    use arrow::array::{
        BooleanArray, Float64Array, Int32Array, Int64Array, ListBuilder, StringArray, StringBuilder,
    };
    use parquet::arrow::ArrowWriter;

    fn write_parquet(batch: &RecordBatch, name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("bookscape-{name}-{}.parquet", std::process::id()));
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn record_row(result: Result<BookTable, LoadError>) -> usize {
        match result {
            Err(LoadError::Record { row, .. }) => row,
            other => panic!("expected record error, got {other:?}"),
        }
    }

    #[test]
    fn json_records_keep_missing_fields_absent() {
        let json = r#"[
            {"book_id": "a", "title": "Dune", "authors": ["Frank Herbert"], "year": 1965,
             "isEbook": false, "pageCount": 412, "averageRating": 4.5, "ratingsCount": 10,
             "listPrice": 12.0, "retailPrice": 9.0},
            {"book_id": "b", "book_title": "N/A"}
        ]"#;
        let table = parse_json(json).unwrap();

        assert_eq!(table.len(), 2);
        let dune = &table.records[0];
        assert_eq!(dune.title.as_deref(), Some("Dune"));
        assert_eq!(dune.page_count, Some(412));

        let bare = &table.records[1];
        assert_eq!(bare.title, None);
        assert_eq!(bare.page_count, None);
        assert_eq!(bare.average_rating, None);
        assert!(bare.authors.is_empty());
    }

    #[test]
    fn json_bad_record_names_its_row() {
        let json = r#"[{"book_id": "a"}, {"book_id": "b", "year": "soon"}]"#;
        match parse_json(json) {
            Err(LoadError::Record { row, .. }) => assert_eq!(row, 1),
            other => panic!("expected record error, got {other:?}"),
        }
    }

    #[test]
    fn json_volumes_response() {
        let json = r#"{
            "kind": "books#volumes",
            "totalItems": 1,
            "items": [{
                "id": "v1",
                "volumeInfo": {"title": "Rust", "publishedDate": "2018-08", "categories": ["Computers"]},
                "saleInfo": {"isEbook": true}
            }]
        }"#;
        let table = parse_json(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].year, Some(2018));
        assert_eq!(table.records[0].is_ebook, Some(true));
        assert!(table.categories.contains("Computers"));
    }

    #[test]
    fn json_scalar_root_is_malformed() {
        assert!(matches!(parse_json("42"), Err(LoadError::Malformed(_))));
        assert!(matches!(parse_json("{\"foo\": 1}"), Err(LoadError::Malformed(_))));
        assert!(matches!(parse_json("not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn csv_splits_authors_and_blank_cells() {
        let csv = "\
book_id,title,authors,publisher,year,isEbook,pageCount,retailPrice
a,Good Omens,Terry Pratchett; Neil Gaiman,Gollancz,1990,false,288,8.99
b,,,,,,,
";
        let table = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.records[0].authors,
            vec!["Terry Pratchett".to_string(), "Neil Gaiman".to_string()]
        );
        assert_eq!(table.records[0].retail_price, Some(8.99));
        let blank = &table.records[1];
        assert_eq!(blank.title, None);
        assert_eq!(blank.year, None);
        assert_eq!(blank.is_ebook, None);
        assert!(blank.authors.is_empty());
    }

    #[test]
    fn csv_bad_number_fails() {
        let csv = "book_id,pageCount\na,many\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("books.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn parquet_with_list_authors_and_narrow_ints() {
        let mut authors = ListBuilder::new(StringBuilder::new());
        authors.values().append_value("Ann");
        authors.values().append_value("Bob");
        authors.append(true);
        authors.append(false);

        let batch = RecordBatch::try_from_iter(vec![
            ("book_id", Arc::new(StringArray::from(vec!["p1", "p2"])) as ArrayRef),
            ("title", Arc::new(StringArray::from(vec![Some("One"), None])) as ArrayRef),
            ("authors", Arc::new(authors.finish()) as ArrayRef),
            ("year", Arc::new(Int32Array::from(vec![Some(2001), None])) as ArrayRef),
            ("isEbook", Arc::new(BooleanArray::from(vec![Some(true), None])) as ArrayRef),
            ("retailPrice", Arc::new(Float64Array::from(vec![Some(4.5), None])) as ArrayRef),
        ])
        .unwrap();

        let path = write_parquet(&batch, "loader");
        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 2);
        let first = &table.records[0];
        assert_eq!(first.authors, vec!["Ann".to_string(), "Bob".to_string()]);
        assert_eq!(first.year, Some(2001));
        assert_eq!(first.is_ebook, Some(true));
        assert_eq!(first.retail_price, Some(4.5));

        let second = &table.records[1];
        assert_eq!(second.title, None);
        assert!(second.authors.is_empty());
        assert_eq!(second.year, None);
        assert_eq!(table.year_bounds, Some((2001, 2001)));
    }

    #[test]
    fn parquet_unreadable_year_is_a_record_error() {
        let batch = RecordBatch::try_from_iter(vec![
            ("book_id", Arc::new(StringArray::from(vec!["p1", "p2"])) as ArrayRef),
            ("year", Arc::new(StringArray::from(vec![Some("soon"), Some("2001")])) as ArrayRef),
        ])
        .unwrap();
        let path = write_parquet(&batch, "bad-year");
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(record_row(result), 0);
    }

    #[test]
    fn parquet_negative_page_count_is_a_record_error() {
        let batch = RecordBatch::try_from_iter(vec![
            ("book_id", Arc::new(StringArray::from(vec!["p1", "p2"])) as ArrayRef),
            ("pageCount", Arc::new(Int64Array::from(vec![Some(300), Some(-5)])) as ArrayRef),
        ])
        .unwrap();
        let path = write_parquet(&batch, "bad-pages");
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(record_row(result), 1);
    }

    #[test]
    fn parquet_nan_price_is_a_record_error() {
        let batch = RecordBatch::try_from_iter(vec![
            ("book_id", Arc::new(StringArray::from(vec!["p1", "p2"])) as ArrayRef),
            ("retailPrice", Arc::new(Float64Array::from(vec![Some(9.5), Some(f64::NAN)])) as ArrayRef),
        ])
        .unwrap();
        let path = write_parquet(&batch, "nan-price");
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(record_row(result), 1);
    }

    #[test]
    fn csv_non_finite_numbers_are_rejected() {
        let csv = "\
book_id,publisher,averageRating
a,Good,5.0
b,Good,4.9
c,Bad,NaN
";
        assert_eq!(record_row(parse_csv(csv.as_bytes())), 2);

        let csv = "book_id,retailPrice\na,-inf\n";
        assert_eq!(record_row(parse_csv(csv.as_bytes())), 0);
    }
}
