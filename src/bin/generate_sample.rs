use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListBuilder, StringArray, StringBuilder,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use bookscape::data::model::BookRecord;

const BOOKS: usize = 400;

const PUBLISHERS: &[&str] = &[
    "Penguin Random House",
    "HarperCollins",
    "Macmillan",
    "Simon & Schuster",
    "Hachette",
    "O'Reilly Media",
    "No Starch Press",
    "Small Beer Press",
];

const CATEGORIES: &[&str] = &[
    "Fiction",
    "Computers",
    "History",
    "Science",
    "Biography & Autobiography",
    "Cooking",
];

const AUTHORS: &[&str] = &[
    "Ada Byron",
    "Grace Hopper",
    "Alan Turing",
    "Mary Shelley",
    "Ursula K. Le Guin",
    "Terry Pratchett",
    "Octavia Butler",
    "Donald Knuth",
    "Barbara Liskov",
    "Edsger Dijkstra",
    "Iain Banks",
    "Jane Austen",
];

const TITLE_WORDS: &[&str] = &[
    "Python", "Rust", "Garden", "Empire", "Algorithms", "Night", "River", "Kitchen", "Machine",
    "Stars", "Letters", "Programming", "Secret", "History", "Winter",
];

/// Small deterministic PRNG (splitmix64) so the sample is reproducible.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

fn generate_book(i: usize, rng: &mut SampleRng) -> BookRecord {
    let words = 1 + rng.below(3);
    let title = (0..words)
        .map(|_| rng.pick(TITLE_WORDS))
        .collect::<Vec<_>>()
        .join(" ");

    // mostly one or two authors, occasionally a large collective
    let n_authors = match rng.below(20) {
        0 => 4 + rng.below(3),
        1..=6 => 2,
        _ => 1,
    };
    let mut authors: Vec<String> = Vec::with_capacity(n_authors);
    while authors.len() < n_authors {
        let name = rng.pick(AUTHORS).to_string();
        if !authors.contains(&name) {
            authors.push(name);
        }
    }

    let list_price = ((5.0 + rng.unit() * 60.0) * 100.0).round() / 100.0;
    let retail_price = if rng.chance(0.05) {
        // the odd markup
        (list_price * 1.1 * 100.0).round() / 100.0
    } else {
        (list_price * (1.0 - rng.unit() * 0.4) * 100.0).round() / 100.0
    };

    BookRecord {
        book_id: format!("sample-{i:04}"),
        title: Some(title),
        subtitle: rng.chance(0.3).then(|| "A Novel".to_string()),
        authors,
        publisher: rng.chance(0.95).then(|| rng.pick(PUBLISHERS).to_string()),
        categories: rng.chance(0.9).then(|| rng.pick(CATEGORIES).to_string()),
        year: rng.chance(0.97).then(|| 1995 + rng.below(30) as i32),
        is_ebook: rng.chance(0.9).then(|| rng.chance(0.45)),
        page_count: rng.chance(0.9).then(|| 80 + rng.below(1100) as u32),
        average_rating: rng
            .chance(0.7)
            .then(|| ((1.0 + rng.unit() * 4.0) * 10.0).round() / 10.0),
        ratings_count: rng.chance(0.7).then(|| rng.below(5000) as u64),
        list_price: rng.chance(0.85).then_some(list_price),
        retail_price: rng.chance(0.9).then_some(retail_price),
    }
}

fn write_json(path: &Path, books: &[BookRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, books).context("writing JSON")?;
    Ok(())
}

fn write_parquet(path: &Path, books: &[BookRecord]) -> Result<()> {
    let mut authors = ListBuilder::new(StringBuilder::new());
    for book in books {
        for name in &book.authors {
            authors.values().append_value(name);
        }
        authors.append(true);
    }

    let text = |f: fn(&BookRecord) -> Option<&str>| -> ArrayRef {
        Arc::new(books.iter().map(f).collect::<StringArray>())
    };

    let batch = RecordBatch::try_from_iter(vec![
        (
            "book_id",
            Arc::new(books.iter().map(|b| Some(b.book_id.as_str())).collect::<StringArray>())
                as ArrayRef,
        ),
        ("title", text(|b| b.title.as_deref())),
        ("subtitle", text(|b| b.subtitle.as_deref())),
        ("authors", Arc::new(authors.finish()) as ArrayRef),
        ("publisher", text(|b| b.publisher.as_deref())),
        ("categories", text(|b| b.categories.as_deref())),
        (
            "year",
            Arc::new(books.iter().map(|b| b.year.map(i64::from)).collect::<Int64Array>()) as ArrayRef,
        ),
        (
            "isEbook",
            Arc::new(books.iter().map(|b| b.is_ebook).collect::<BooleanArray>()) as ArrayRef,
        ),
        (
            "pageCount",
            Arc::new(books.iter().map(|b| b.page_count.map(i64::from)).collect::<Int64Array>()) as ArrayRef,
        ),
        (
            "averageRating",
            Arc::new(books.iter().map(|b| b.average_rating).collect::<Float64Array>()) as ArrayRef,
        ),
        (
            "ratingsCount",
            Arc::new(
                books
                    .iter()
                    .map(|b| b.ratings_count.and_then(|c| i64::try_from(c).ok()))
                    .collect::<Int64Array>(),
            ) as ArrayRef,
        ),
        (
            "listPrice",
            Arc::new(books.iter().map(|b| b.list_price).collect::<Float64Array>()) as ArrayRef,
        ),
        (
            "retailPrice",
            Arc::new(books.iter().map(|b| b.retail_price).collect::<Float64Array>()) as ArrayRef,
        ),
    ])
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("finishing parquet file")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng(42);
    let books: Vec<BookRecord> = (0..BOOKS).map(|i| generate_book(i, &mut rng)).collect();

    let json_path = out_dir.join("sample_books.json");
    write_json(&json_path, &books)?;
    log::info!("Wrote {} books to {}", books.len(), json_path.display());

    let parquet_path = out_dir.join("sample_books.parquet");
    write_parquet(&parquet_path, &books)?;
    log::info!("Wrote {} books to {}", books.len(), parquet_path.display());

    Ok(())
}
