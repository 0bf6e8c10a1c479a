use scraper::{ElementRef, Selector};
use tracing::warn;

/// The slice of a DOM the extractor needs.
pub trait Node: Sized {
    /// Descendants matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Vec<Self>;

    /// Concatenated text of all descendants, untrimmed.
    fn text(&self) -> String;

    fn attr(&self, name: &str) -> Option<String>;

    fn find_first(&self, selector: &str) -> Option<Self> {
        self.find_all(selector).into_iter().next()
    }
}

impl<'a> Node for ElementRef<'a> {
    fn find_all(&self, selector: &str) -> Vec<Self> {
        match Selector::parse(selector) {
            Ok(sel) => self.select(&sel).collect(),
            Err(e) => {
                warn!(selector, error = ?e, "invalid selector");
                Vec::new()
            }
        }
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn find_all_is_descendants_in_order() {
        let html = Html::parse_document("<div id='a'><p>one</p><span><p>two</p></span></div><p>three</p>");
        let root = html.root_element();
        let div = root.find_first("div#a").unwrap();
        let texts: Vec<String> = div.find_all("p").iter().map(Node::text).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn text_joins_nested_nodes() {
        let html = Html::parse_fragment("<dd> <b>Senador</b> Fulano </dd>");
        let dd = html.root_element().find_first("dd").unwrap();
        assert_eq!(Node::text(&dd), " Senador Fulano ");
    }

    #[test]
    fn attr_and_missing_attr() {
        let html = Html::parse_fragment("<a class='x' href='/doc.pdf'>pdf</a>");
        let a = html.root_element().find_first("a.x").unwrap();
        assert_eq!(Node::attr(&a, "href").as_deref(), Some("/doc.pdf"));
        assert_eq!(Node::attr(&a, "title"), None);
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let html = Html::parse_fragment("<p>x</p>");
        assert!(html.root_element().find_all("p[").is_empty());
    }
}
