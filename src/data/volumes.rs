//! Saved responses of the book-search API `volumes?q=…` endpoint.

use serde::Deserialize;

use super::model::BookRecord;

#[derive(Debug, Deserialize)]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Volume {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
    #[serde(default)]
    pub sale_info: SaleInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaleInfo {
    pub is_ebook: Option<bool>,
    pub list_price: Option<Price>,
    pub retail_price: Option<Price>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Price {
    pub amount: Option<f64>,
}

impl From<Volume> for BookRecord {
    fn from(v: Volume) -> Self {
        let info = v.volume_info;
        let sale = v.sale_info;
        BookRecord {
            book_id: v.id,
            title: info.title,
            subtitle: info.subtitle,
            authors: info.authors,
            publisher: info.publisher,
            categories: info.categories.into_iter().next(),
            year: info.published_date.as_deref().and_then(leading_year),
            is_ebook: sale.is_ebook,
            page_count: info.page_count,
            average_rating: info.average_rating,
            ratings_count: info.ratings_count,
            list_price: sale.list_price.and_then(|p| p.amount),
            retail_price: sale.retail_price.and_then(|p| p.amount),
        }
    }
}

/// `"2019-05-02"`, `"2019-05"` and `"2019"` all give 2019.
fn leading_year(date: &str) -> Option<i32> {
    let digits = date.get(..4)?;
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_year_handles_partial_dates() {
        assert_eq!(leading_year("2019-05-02"), Some(2019));
        assert_eq!(leading_year("2019"), Some(2019));
        assert_eq!(leading_year("19"), None);
        assert_eq!(leading_year("circa 1900"), None);
    }

    #[test]
    fn volume_maps_sale_info() {
        let json = r#"{
            "id": "zyTCAlFPjgYC",
            "volumeInfo": {
                "title": "The Google Story",
                "authors": ["David A. Vise", "Mark Malseed"],
                "publisher": "Random House",
                "publishedDate": "2005-11-15",
                "pageCount": 207,
                "categories": ["Browsers (Computer programs)", "Other"],
                "averageRating": 3.5,
                "ratingsCount": 136
            },
            "saleInfo": {
                "isEbook": true,
                "listPrice": { "amount": 11.99, "currencyCode": "USD" },
                "retailPrice": { "amount": 9.59, "currencyCode": "USD" }
            }
        }"#;
        let volume: Volume = serde_json::from_str(json).unwrap();
        let rec = BookRecord::from(volume);

        assert_eq!(rec.book_id, "zyTCAlFPjgYC");
        assert_eq!(rec.year, Some(2005));
        assert_eq!(rec.categories.as_deref(), Some("Browsers (Computer programs)"));
        assert_eq!(rec.is_ebook, Some(true));
        assert_eq!(rec.list_price, Some(11.99));
        assert_eq!(rec.retail_price, Some(9.59));
        assert_eq!(rec.authors.len(), 2);
    }

    #[test]
    fn volume_without_sale_info_has_no_prices() {
        let volume: Volume = serde_json::from_str(r#"{ "id": "x", "volumeInfo": {} }"#).unwrap();
        let rec = BookRecord::from(volume);
        assert_eq!(rec.retail_price, None);
        assert_eq!(rec.is_ebook, None);
        assert_eq!(rec.title, None);
    }
}
