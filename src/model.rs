use serde::{Deserialize, Serialize};

/// One amendment ("emenda") scraped from a bill page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendmentRecord {
    pub id: String,
    pub author: String,
    pub date: String,
    pub description: String,
    pub legislative_action: String,
    pub pdf_link: Option<String>,
    /// Set only after the PDF was written to disk.
    pub pdf_filename: Option<String>,
}

/// Local filename for an amendment's PDF: first `/` becomes `_`, spaces
/// become `_`, lowercased, `.pdf` appended.
pub fn pdf_filename(id: &str) -> String {
    let mut name = id.replacen('/', "_", 1).replace(' ', "_").to_lowercase();
    name.push_str(".pdf");
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_from_id() {
        assert_eq!(pdf_filename("123/45 ABC"), "123_45_abc.pdf");
    }

    #[test]
    fn filename_only_first_slash() {
        assert_eq!(pdf_filename("EMENDA 1/2/3"), "emenda_1_2/3.pdf");
    }

    #[test]
    fn json_keys_are_camel_case_and_never_omitted() {
        let record = AmendmentRecord {
            id: "1".into(),
            author: "A".into(),
            date: "D".into(),
            description: String::new(),
            legislative_action: String::new(),
            pdf_link: None,
            pdf_filename: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        assert!(obj["legislativeAction"].as_str().unwrap().is_empty());
        assert!(obj["pdfLink"].is_null());
        assert!(obj["pdfFilename"].is_null());
    }
}
