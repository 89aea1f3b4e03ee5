//! Canonical model input text from product fields.

use serde::{Deserialize, Serialize};

/// Optional structured product fields. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ProductFields {
    fn labeled(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("Title", self.title.as_deref()),
            ("Category", self.category.as_deref()),
            ("Brand", self.brand.as_deref()),
            ("Description", self.description.as_deref()),
            ("Details", self.details.as_deref()),
        ]
    }
}

/// What a caller hands to the predictor: either free text or structured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductInput {
    RawText(String),
    Structured(ProductFields),
}

impl ProductInput {
    /// Non-blank `raw_text` wins over every structured field.
    pub fn new(fields: ProductFields, raw_text: Option<&str>) -> Self {
        match raw_text.map(str::trim) {
            Some(text) if !text.is_empty() => ProductInput::RawText(text.to_string()),
            _ => ProductInput::Structured(fields),
        }
    }

    pub fn canonical_text(&self) -> String {
        match self {
            ProductInput::RawText(text) => text.trim().to_string(),
            ProductInput::Structured(fields) => {
                let lines: Vec<String> = fields
                    .labeled()
                    .iter()
                    .filter_map(|(label, value)| match value {
                        Some(v) if !v.is_empty() => Some(format!("{label}: {v}")),
                        _ => None,
                    })
                    .collect();
                lines.join("\n").trim().to_string()
            }
        }
    }
}

impl From<ProductFields> for ProductInput {
    fn from(fields: ProductFields) -> Self { ProductInput::Structured(fields) }
}

/// Build the canonical text for `fields`, unless `raw_text` overrides them.
pub fn assemble(fields: &ProductFields, raw_text: Option<&str>) -> String {
    ProductInput::new(fields.clone(), raw_text).canonical_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, category: &str) -> ProductFields {
        ProductFields {
            title: Some(title.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    #[test]
    fn fixed_field_order() {
        assert_eq!(assemble(&fields("A", "B"), None), "Title: A\nCategory: B");
    }

    #[test]
    fn all_fields_in_order() {
        let f = ProductFields {
            details: Some("5".into()),
            brand: Some("3".into()),
            title: Some("1".into()),
            description: Some("4".into()),
            category: Some("2".into()),
        };
        assert_eq!(
            assemble(&f, None),
            "Title: 1\nCategory: 2\nBrand: 3\nDescription: 4\nDetails: 5"
        );
    }

    #[test]
    fn raw_text_overrides_fields() {
        let text = assemble(&fields("A", "B"), Some("  just text \n"));
        assert_eq!(text, "just text");
        assert_eq!(
            ProductInput::new(fields("A", "B"), Some(" x ")),
            ProductInput::RawText("x".into())
        );
    }

    #[test]
    fn blank_raw_text_falls_back_to_fields() {
        assert_eq!(assemble(&fields("A", "B"), Some("   \t")), "Title: A\nCategory: B");
    }

    #[test]
    fn empty_values_are_skipped() {
        let f = ProductFields {
            title: Some(String::new()),
            brand: Some("Acme".into()),
            ..Default::default()
        };
        assert_eq!(assemble(&f, None), "Brand: Acme");
    }

    #[test]
    fn nothing_present_is_empty() {
        assert_eq!(assemble(&ProductFields::default(), None), "");
        assert_eq!(assemble(&ProductFields::default(), Some("")), "");
    }

    #[test]
    fn outer_whitespace_trimmed() {
        let f = ProductFields { title: Some(" padded ".into()), ..Default::default() };
        assert_eq!(assemble(&f, None), "Title:  padded");
    }
}
