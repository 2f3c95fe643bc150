use super::filter::FilteredView;

/// Records of `view` whose title contains `text`, ignoring case.
///
/// Blank search text matches nothing rather than everything.
pub fn search<'a>(view: &FilteredView<'a>, text: &str) -> FilteredView<'a> {
    if text.trim().is_empty() {
        return view.empty();
    }
    let needle = text.to_lowercase();

    let hits = view.retain_where(|b| {
        b.title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(&needle))
    });
    log::debug!("search {needle:?}: {} of {} titles", hits.len(), view.len());
    hits
}
