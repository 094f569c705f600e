use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Days a product keeps its "new" badge after creation.
pub const NEW_BADGE_DAYS: i64 = 7;

/// Freshness rule: false iff the product has aged past the badge window,
/// otherwise the stored value. Only ever flips true -> false.
pub fn new_badge(stored: bool, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    if now - created_at > Duration::days(NEW_BADGE_DAYS) {
        false
    } else {
        stored
    }
}

/// Stock status, serialized with the storefront's wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Coming Soon")]
    ComingSoon,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::ComingSoon => "Coming Soon",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "In Stock" => Some(StockStatus::InStock),
            "Coming Soon" => Some(StockStatus::ComingSoon),
            "Out of Stock" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }
}

/// The catalog's sole entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub sub_category: Option<String>,
    /// Ordered public image paths; the first is the primary thumbnail.
    pub images: Vec<String>,
    pub stock: StockStatus,
    pub quantity: i64,
    pub contact_number: String,
    pub views: i64,
    pub is_new_product: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product from a validated draft. Assigns the id and
    /// timestamps; the new badge starts active.
    pub fn create(draft: ProductDraft, images: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            sub_category: draft.sub_category,
            images,
            stock: draft.stock,
            quantity: draft.quantity,
            contact_number: draft.contact_number,
            views: 0,
            is_new_product: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update, append any new images, refresh `updated_at`
    /// and re-run the freshness rule. This is the single pre-write hook both
    /// stores call before persisting an update.
    pub fn apply_update(&mut self, patch: ProductPatch, new_images: Vec<String>, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(sub_category) = patch.sub_category {
            self.sub_category = sub_category;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(contact_number) = patch.contact_number {
            self.contact_number = contact_number;
        }
        self.images.extend(new_images);
        self.updated_at = now;
        self.is_new_product = new_badge(self.is_new_product, self.created_at, now);
    }

    /// Effective badge value at read time. Derived from `created_at` so an
    /// aged record never reports a stale `true` between writes.
    pub fn badge_at(&self, now: DateTime<Utc>) -> bool {
        new_badge(self.is_new_product, self.created_at, now)
    }

    /// API representation: serde output with the badge derived at read time
    /// and an `imageUrl` convenience field for the primary thumbnail.
    pub fn to_api(&self, now: DateTime<Utc>) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(ref mut map) = value {
            map.insert("isNewProduct".to_string(), json!(self.badge_at(now)));
            map.insert("imageUrl".to_string(), json!(self.images.first()));
        }
        value
    }
}

/// Validated input for product creation. All required fields present.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub sub_category: Option<String>,
    pub stock: StockStatus,
    pub quantity: i64,
    pub contact_number: String,
}

impl ProductDraft {
    /// Build a draft from multipart form fields, collecting per-field errors.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let name = fields.get("name").map(|s| s.trim()).unwrap_or_default();
        if name.is_empty() {
            errors.insert("name".to_string(), "This field is required".to_string());
        }

        let description = fields.get("description").map(String::as_str).unwrap_or_default();
        if description.is_empty() {
            errors.insert("description".to_string(), "This field is required".to_string());
        }

        let price = match fields.get("price") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => p,
                Ok(_) => {
                    errors.insert("price".to_string(), "Price must be non-negative".to_string());
                    0.0
                }
                Err(_) => {
                    errors.insert("price".to_string(), format!("Invalid number: {}", raw));
                    0.0
                }
            },
            None => {
                errors.insert("price".to_string(), "This field is required".to_string());
                0.0
            }
        };

        let category = fields.get("category").map(|s| s.trim()).unwrap_or_default();
        if category.is_empty() {
            errors.insert("category".to_string(), "This field is required".to_string());
        }

        let sub_category = fields
            .get("subCategory")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let stock = match fields.get("stock") {
            Some(raw) => match StockStatus::from_wire(raw) {
                Some(stock) => stock,
                None => {
                    errors.insert("stock".to_string(), format!("Unknown stock status: {}", raw));
                    StockStatus::default()
                }
            },
            None => StockStatus::default(),
        };

        let quantity = match fields.get("quantity") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(q) if q >= 0 => q,
                _ => {
                    errors.insert("quantity".to_string(), "Quantity must be a non-negative integer".to_string());
                    0
                }
            },
            None => 0,
        };

        let contact_number = fields.get("contactNumber").map(|s| s.trim()).unwrap_or_default();
        if contact_number.is_empty() {
            errors.insert("contactNumber".to_string(), "This field is required".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
            sub_category,
            stock,
            quantity,
            contact_number: contact_number.to_string(),
        })
    }
}

/// Partial update for an existing product. Absent fields are left
/// unchanged; `subCategory` submitted as an empty string clears it.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    /// Outer `None` = unchanged, `Some(None)` = clear the sub-category.
    pub sub_category: Option<Option<String>>,
    pub stock: Option<StockStatus>,
    pub quantity: Option<i64>,
    pub contact_number: Option<String>,
}

impl ProductPatch {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, HashMap<String, String>> {
        let mut errors = HashMap::new();
        let mut patch = Self::default();

        if let Some(raw) = fields.get("name") {
            let name = raw.trim();
            if name.is_empty() {
                errors.insert("name".to_string(), "Name cannot be empty".to_string());
            } else {
                patch.name = Some(name.to_string());
            }
        }
        if let Some(raw) = fields.get("description") {
            if raw.is_empty() {
                errors.insert("description".to_string(), "Description cannot be empty".to_string());
            } else {
                patch.description = Some(raw.clone());
            }
        }
        if let Some(raw) = fields.get("price") {
            match raw.trim().parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => patch.price = Some(p),
                _ => {
                    errors.insert("price".to_string(), "Price must be a non-negative number".to_string());
                }
            }
        }
        if let Some(raw) = fields.get("category") {
            let category = raw.trim();
            if category.is_empty() {
                errors.insert("category".to_string(), "Category cannot be empty".to_string());
            } else {
                patch.category = Some(category.to_string());
            }
        }
        if let Some(raw) = fields.get("subCategory") {
            let sub = raw.trim();
            patch.sub_category = if sub.is_empty() {
                Some(None)
            } else {
                Some(Some(sub.to_string()))
            };
        }
        if let Some(raw) = fields.get("stock") {
            match StockStatus::from_wire(raw) {
                Some(stock) => patch.stock = Some(stock),
                None => {
                    errors.insert("stock".to_string(), format!("Unknown stock status: {}", raw));
                }
            }
        }
        if let Some(raw) = fields.get("quantity") {
            match raw.trim().parse::<i64>() {
                Ok(q) if q >= 0 => patch.quantity = Some(q),
                _ => {
                    errors.insert("quantity".to_string(), "Quantity must be a non-negative integer".to_string());
                }
            }
        }
        if let Some(raw) = fields.get("contactNumber") {
            let contact = raw.trim();
            if contact.is_empty() {
                errors.insert("contactNumber".to_string(), "Contact number cannot be empty".to_string());
            } else {
                patch.contact_number = Some(contact.to_string());
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(patch)
    }
}
