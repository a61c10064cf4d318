use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repo_types::{ProductRow, ProductStatus};

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400.png";
pub const ALL_CATEGORIES: &str = "All";
const UNCATEGORIZED: &str = "Uncategorized";

/// Product as served to shoppers and stored in cart snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    #[serde(default)]
    pub category_id: i32,
    pub stock: i32,
    #[serde(default = "default_status")]
    pub status: ProductStatus,
    pub data_ai_hint: String,
}

fn default_status() -> ProductStatus {
    ProductStatus::Active
}

/// First two words of the name, lowercased; used as an image search hint.
pub fn default_ai_hint(name: &str) -> Option<String> {
    let hint = name
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (!hint.is_empty()).then_some(hint)
}

impl From<ProductRow> for ProductView {
    fn from(r: ProductRow) -> Self {
        let data_ai_hint = r
            .data_ai_hint
            .filter(|h| !h.is_empty())
            .or_else(|| default_ai_hint(&r.name))
            .unwrap_or_else(|| "vegetable".into());
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
            image_url: r
                .image_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.into()),
            category: r.category_name.unwrap_or_else(|| UNCATEGORIZED.into()),
            category_id: r.category_id,
            stock: r.stock,
            status: r.status,
            data_ai_hint,
        }
    }
}

/// Query string of the public product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Normalized listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub include_archived: bool,
}

impl ProductFilter {
    /// Blank values and the `All` pseudo-category mean "no filter".
    pub fn from_query(q: ProductQuery) -> Self {
        // the term is matched as typed; only a blank one is dropped
        let search = q.search.filter(|s| !s.trim().is_empty());
        let category = q
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != ALL_CATEGORIES);
        Self {
            search,
            category,
            include_archived: false,
        }
    }

    pub fn inventory() -> Self {
        Self {
            include_archived: true,
            ..Self::default()
        }
    }

    /// In-process equivalent of the SQL filter.
    pub fn matches(&self, p: &ProductView) -> bool {
        if !self.include_archived && p.status == ProductStatus::Archived {
            return false;
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let in_name = p.name.to_lowercase().contains(&term);
            let in_desc = p
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            if !in_name && !in_desc {
                return false;
            }
        }
        match &self.category {
            Some(c) => &p.category == c,
            None => true,
        }
    }
}

/// `%term%` with LIKE metacharacters escaped by `\`.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
