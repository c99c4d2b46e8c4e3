//! Common types and data structures

use serde::{Deserialize, Serialize};

/// A server-persisted product category. The id is assigned by the remote API
/// and immutable; extra fields returned by the service (slug, timestamps) are
/// ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub image: String,
}

/// Unsaved category fields collected in the add/edit modal. Also the request
/// body for create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub image: String,
}

impl CategoryDraft {
    /// Both fields are required; whitespace-only counts as empty.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.image.trim().is_empty()
    }
}

impl From<&Category> for CategoryDraft {
    fn from(cat: &Category) -> Self {
        Self {
            name: cat.name.clone(),
            image: cat.image.clone(),
        }
    }
}

/// Which modal surface is active. At most one at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    Add,
    Edit,
}

/// Remote operation kind, for logging failed requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOp {
    List,
    Create,
    Update,
    Delete,
}

impl ApiOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiOp::List => "list",
            ApiOp::Create => "create",
            ApiOp::Update => "update",
            ApiOp::Delete => "delete",
        }
    }
}

/// Result of a background API call, handed from the worker thread to the
/// update loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    Listed(Vec<Category>),
    Created(Category),
    Updated(Category),
    Deleted(i64),
    Failed(ApiOp, String),
}

/// Shared slot between the UI thread and the single in-flight worker
#[derive(Default)]
pub struct SyncState {
    pub in_flight: bool,
    pub outcome: Option<ApiOutcome>,
}

/// Column to sort by in list view
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
}

/// Sort direction for list view
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ignores_extra_remote_fields() {
        let json = r#"{
            "id": 1,
            "name": "Clothes",
            "slug": "clothes",
            "image": "https://i.imgur.com/QkIa5tT.jpeg",
            "creationAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        }"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert_eq!(cat.id, 1);
        assert_eq!(cat.name, "Clothes");
        assert_eq!(cat.image, "https://i.imgur.com/QkIa5tT.jpeg");
    }

    #[test]
    fn draft_serializes_to_name_and_image_only() {
        let draft = CategoryDraft {
            name: "Ropa".into(),
            image: "https://example.com/ropa.png".into(),
        };
        let value = serde_json::to_value(&draft).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, ["image", "name"]);
    }

    #[test]
    fn draft_validation_requires_both_fields() {
        assert!(!CategoryDraft::default().is_valid());
        assert!(!CategoryDraft { name: "Ropa".into(), image: String::new() }.is_valid());
        assert!(!CategoryDraft { name: "   ".into(), image: "x".into() }.is_valid());
        assert!(CategoryDraft { name: "Ropa".into(), image: "x".into() }.is_valid());
    }

    #[test]
    fn draft_from_category_copies_editable_fields() {
        let cat = Category {
            id: 7,
            name: "Shoes".into(),
            image: "https://example.com/shoes.png".into(),
        };
        let draft = CategoryDraft::from(&cat);
        assert_eq!(draft.name, cat.name);
        assert_eq!(draft.image, cat.image);
    }
}
