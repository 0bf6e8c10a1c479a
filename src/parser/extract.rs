use tracing::debug;

use super::node::Node;
use crate::model::AmendmentRecord;

const CONTAINER: &str = "div#materia_documentos_emendas";
const SECTION: &str = "div.sf-texto-materia";
const PDF_ANCHOR: &str = ".sf-texto-materia--link";

const ID_LABELS: &[&str] = &["Identificação:", "Identificacao:"];
const AUTHOR_LABELS: &[&str] = &["Autor:", "Autora:"];
const DATE_LABELS: &[&str] = &["Data:", "Data da Apresentação:"];
const DESCRIPTION_LABELS: &[&str] = &["Descrição:", "Descricao:", "Ementa:"];
const ACTION_LABELS: &[&str] = &["Ação Legislativa:", "Acao Legislativa:"];

/// Extract every complete amendment from a bill page, in document order.
pub fn extract<N: Node>(root: &N) -> Vec<AmendmentRecord> {
    let Some(container) = root.find_first(CONTAINER) else {
        debug!("no amendments container on page");
        return Vec::new();
    };

    container
        .find_all(SECTION)
        .iter()
        .enumerate()
        .filter_map(|(i, section)| {
            let record = extract_section(section);
            if record.is_none() {
                debug!(section = i, "skipping incomplete amendment section");
            }
            record
        })
        .collect()
}

fn extract_section<N: Node>(section: &N) -> Option<AmendmentRecord> {
    let fields = LabeledFields::new(section);

    let id = fields.required(ID_LABELS)?;
    let author = fields.required(AUTHOR_LABELS)?;
    let date = fields.required(DATE_LABELS)?;

    let pdf_link = section
        .find_first(PDF_ANCHOR)
        .and_then(|a| a.attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty());

    Some(AmendmentRecord {
        id,
        author,
        date,
        description: fields.optional(DESCRIPTION_LABELS),
        legislative_action: fields.optional(ACTION_LABELS),
        pdf_link,
        pdf_filename: None,
    })
}

/// `dt` labels and `dd` values of one section, paired by position.
struct LabeledFields {
    labels: Vec<String>,
    values: Vec<String>,
}

impl LabeledFields {
    fn new<N: Node>(section: &N) -> Self {
        let trimmed = |n: &N| n.text().trim().to_string();
        Self {
            labels: section.find_all("dt").iter().map(trimmed).collect(),
            values: section.find_all("dd").iter().map(trimmed).collect(),
        }
    }

    fn lookup(&self, synonyms: &[&str]) -> Option<&str> {
        let idx = self
            .labels
            .iter()
            .position(|l| synonyms.contains(&l.as_str()))?;
        self.values.get(idx).map(String::as_str)
    }

    fn required(&self, synonyms: &[&str]) -> Option<String> {
        self.lookup(synonyms)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn optional(&self, synonyms: &[&str]) -> String {
        self.lookup(synonyms).unwrap_or_default().to_string()
    }
}
