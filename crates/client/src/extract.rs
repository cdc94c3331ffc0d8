//! Label/value extraction from decoder pages.
//!
//! The decoder page lists vehicle attributes as table rows inside a marked
//! container. Each row holds a label cell and a value cell:
//!
//! ```html
//! <div class="table-info">
//!   <table>
//!     <tr><td class="info-left">Face</td><td class="info-right">Toyota</td></tr>
//!   </table>
//! </div>
//! ```
//!
//! The selectors for the container, rows and cells come from `TableMarkers`.

use scraper::{ElementRef, Html, Selector};
use vinlookup_core::{Error, ExtractedFields, TableMarkers};

/// Extracts label/value pairs using compiled structural markers.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    container: Selector,
    row: Selector,
    label: Selector,
    value: Selector,
}

fn compile(name: &str, css: &str) -> Result<Selector, Error> {
    Selector::parse(css).map_err(|e| Error::ExtractFailed(format!("invalid {name} selector {css:?}: {e}")))
}

/// Element text with whitespace runs collapsed to single spaces.
fn cell_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl FieldExtractor {
    /// Compile the selectors in `markers`.
    pub fn new(markers: &TableMarkers) -> Result<Self, Error> {
        Ok(Self {
            container: compile("container", &markers.container)?,
            row: compile("row", &markers.row)?,
            label: compile("label", &markers.label)?,
            value: compile("value", &markers.value)?,
        })
    }

    /// Extract label/value pairs, or an empty map when the container is absent.
    pub fn parse(&self, html: &str) -> ExtractedFields {
        self.parse_table(html).unwrap_or_default()
    }

    /// Extract label/value pairs from the first matching container.
    ///
    /// Returns `None` when the document has no container. Rows missing either
    /// cell are skipped. Labels are kept verbatim, and a repeated label keeps
    /// its last value.
    pub fn parse_table(&self, html: &str) -> Option<ExtractedFields> {
        let document = Html::parse_document(html);
        let container = document.select(&self.container).next()?;

        let mut fields = ExtractedFields::new();
        for row in container.select(&self.row) {
            let label = row.select(&self.label).next();
            let value = row.select(&self.value).next();

            if let (Some(label), Some(value)) = (label, value) {
                fields.insert(cell_text(label), cell_text(value));
            }
        }

        Some(fields)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(&TableMarkers::default()).expect("default table markers are valid selectors")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECODER_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Decodor VIN</title></head>
        <body>
            <div class="header">
                <table><tr><td class="info-left">Face</td><td class="info-right">Decoy</td></tr></table>
            </div>
            <div class="table-info">
                <table>
                    <tr><td class="info-left">Face</td><td class="info-right">Toyota</td></tr>
                    <tr><td class="info-left">Model</td><td class="info-right">Corolla</td></tr>
                    <tr><td class="info-left">Modelul anului</td><td class="info-right">2019</td></tr>
                    <tr>
                        <td class="info-left">
                            Tipul   motorului
                        </td>
                        <td class="info-right">  1.8
                            Hybrid </td>
                    </tr>
                    <tr><td class="info-left">Tipul combustibilului</td><td class="info-right">Ben<b>zina</b></td></tr>
                </table>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_decoder_page() {
        let fields = FieldExtractor::default().parse(DECODER_PAGE);

        assert_eq!(fields.len(), 5);
        assert_eq!(fields["Face"], "Toyota");
        assert_eq!(fields["Model"], "Corolla");
        assert_eq!(fields["Modelul anului"], "2019");
        assert_eq!(fields["Tipul motorului"], "1.8 Hybrid");
        assert_eq!(fields["Tipul combustibilului"], "Benzina");
    }

    #[test]
    fn test_parse_skips_malformed_rows() {
        let html = r#"
            <div class="table-info"><table>
                <tr><td class="info-left">Face</td><td class="info-right">Ford</td></tr>
                <tr><td class="info-left">Model</td><td class="info-right">Focus</td></tr>
                <tr><td class="info-left">Orphan label</td></tr>
                <tr><td class="info-right">Orphan value</td></tr>
                <tr><td>no markers</td><td>at all</td></tr>
                <tr><th>Header row</th></tr>
            </table></div>
        "#;

        let fields = FieldExtractor::default().parse(html);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["Face"], "Ford");
        assert_eq!(fields["Model"], "Focus");
    }

    #[test]
    fn test_parse_missing_container() {
        let html = r#"
            <html><body>
                <table><tr><td class="info-left">Face</td><td class="info-right">Ford</td></tr></table>
            </body></html>
        "#;

        let extractor = FieldExtractor::default();
        assert!(extractor.parse_table(html).is_none());
        assert!(extractor.parse(html).is_empty());
    }

    #[test]
    fn test_parse_container_without_rows() {
        let html = r#"<div class="table-info"><p>Nu am gasit date pentru acest VIN.</p></div>"#;

        let fields = FieldExtractor::default().parse_table(html);
        assert_eq!(fields, Some(ExtractedFields::new()));
    }

    #[test]
    fn test_parse_repeated_label_last_wins() {
        let html = r#"
            <div class="table-info"><table>
                <tr><td class="info-left">Model</td><td class="info-right">Golf</td></tr>
                <tr><td class="info-left">Model</td><td class="info-right">Golf Variant</td></tr>
            </table></div>
        "#;

        let fields = FieldExtractor::default().parse(html);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Model"], "Golf Variant");
    }

    #[test]
    fn test_parse_labels_are_verbatim() {
        let html = r#"
            <div class="table-info"><table>
                <tr><td class="info-left">Face:</td><td class="info-right">Dacia</td></tr>
                <tr><td class="info-left">model</td><td class="info-right">Logan</td></tr>
            </table></div>
        "#;

        let fields = FieldExtractor::default().parse(html);
        assert_eq!(fields["Face:"], "Dacia");
        assert_eq!(fields["model"], "Logan");
        assert!(!fields.contains_key("Face"));
        assert!(!fields.contains_key("Model"));
    }

    #[test]
    fn test_parse_empty_document() {
        let extractor = FieldExtractor::default();
        assert!(extractor.parse_table("").is_none());
        assert!(extractor.parse_table("not really html").is_none());
    }

    #[test]
    fn test_custom_markers() {
        let markers = TableMarkers {
            container: "table#specs".into(),
            row: "tr".into(),
            label: "th".into(),
            value: "td".into(),
        };
        let html = r#"
            <table id="specs">
                <tr><th>Make</th><td>Volvo</td></tr>
                <tr><th>Model</th><td>V70</td></tr>
            </table>
        "#;

        let fields = FieldExtractor::new(&markers).unwrap().parse(html);
        assert_eq!(fields["Make"], "Volvo");
        assert_eq!(fields["Model"], "V70");
    }

    #[test]
    fn test_invalid_marker_is_rejected() {
        let markers = TableMarkers { container: "div[".into(), ..Default::default() };
        let result = FieldExtractor::new(&markers);
        assert!(matches!(result, Err(Error::ExtractFailed(msg)) if msg.contains("container")));
    }
}
