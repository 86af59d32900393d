use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Top level of the catalog hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubCategory {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "category")]
    pub category_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(rename = "subcategory")]
    pub subcategory_id: Uuid,
    pub thumbnail: Option<String>,
    pub additional_images: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_keys_serialize_under_relation_name() {
        let sub = SubCategory {
            id: Uuid::new_v4(),
            name: "Kettles".into(),
            category_id: Uuid::new_v4(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert!(json.get("category").is_some());
        assert!(json.get("category_id").is_none());

        let product = Product {
            id: Uuid::new_v4(),
            name: "Electric kettle".into(),
            description: "1.7L".into(),
            price: 39.99,
            quantity: 12,
            subcategory_id: sub.id,
            thumbnail: None,
            additional_images: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("subcategory").is_some());
        assert!(json.get("subcategory_id").is_none());
    }
}
