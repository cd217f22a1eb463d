use std::sync::LazyLock;
use scraper::{Html, Selector};

static GULESIDER_PHONE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"[data-gmp-click="ps_hl_hit_phone_number_show_click"]"#).unwrap());
static PHONE_1881_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".button-call__number").unwrap());

/// Person search result page. Only the first listed phone number is of interest.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchResultPage {
    phone: Option<String>,
}

impl SearchResultPage {
    /// i.e. https://www.gulesider.no/ola+nordmann+0123/personer
    pub fn parse_gulesider(html: &str) -> Self {
        Self::parse_html(html, &GULESIDER_PHONE_SELECTOR)
    }

    /// i.e. https://www.1881.no/?query=ola+nordmann+0123
    pub fn parse_1881(html: &str) -> Self {
        Self::parse_html(html, &PHONE_1881_SELECTOR)
    }

    fn parse_html(html: &str, selector: &Selector) -> Self {
        let document = Html::parse_document(html);
        let phone = document.select(selector).next()
            .map(|element| element.text().collect::<String>())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Self { phone }
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn into_phone(self) -> Option<String> {
        self.phone
    }
}
