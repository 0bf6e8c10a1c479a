pub mod extract;
pub mod node;

use scraper::Html;

use crate::model::AmendmentRecord;

/// Parse a bill page and extract its amendments.
pub fn parse_page(html: &str) -> Vec<AmendmentRecord> {
    let doc = Html::parse_document(html);
    extract::extract(&doc.root_element())
}
