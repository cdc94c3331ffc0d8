//! Search links for a vehicle's service manual.

use url::Url;
use vinlookup_core::VehicleRecord;

/// Returned when there is nothing specific to search for.
pub const FALLBACK_SEARCH_URL: &str = "https://google.com";

const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

/// Build a web search URL for PDF service manuals of `record`.
///
/// The query is `<make> <model> <year> service manual filetype:pdf`, leaving
/// out unknown parts. Without a record or a known make this returns
/// [`FALLBACK_SEARCH_URL`].
pub fn manual_search_url(record: Option<&VehicleRecord>) -> String {
    let Some(record) = record else {
        return FALLBACK_SEARCH_URL.to_string();
    };
    let Some(make) = record.make.as_deref() else {
        return FALLBACK_SEARCH_URL.to_string();
    };

    let mut terms = vec![make];
    terms.extend(record.model.as_deref());
    terms.extend(record.year_produced.as_deref());
    let query = format!("{} service manual filetype:pdf", terms.join(" "));

    match Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query.as_str())]) {
        Ok(url) => url.into(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to build manual search url");
            FALLBACK_SEARCH_URL.to_string()
        }
    }
}
