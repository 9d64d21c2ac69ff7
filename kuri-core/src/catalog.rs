use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// A purchasable menu item. Deletion is a soft flag flip so historical
/// reservations keep a valid name/price reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeOption {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCoffeeOption {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
}

impl NewCoffeeOption {
    /// Build from admin input; the stable id slug is derived from the name.
    pub fn from_input(name: &str, price: i64, description: Option<String>) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError(
                "Name and price are required".to_string(),
            ));
        }
        if price <= 0 {
            return Err(CoreError::ValidationError(
                "Price must be positive".to_string(),
            ));
        }
        Ok(Self {
            id: slug_from_name(name),
            name: name.to_string(),
            price,
            description,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CoffeeOptionUpdate {
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub is_active: bool,
}

impl CoffeeOptionUpdate {
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Name and price are required".to_string(),
            ));
        }
        if self.price <= 0 {
            return Err(CoreError::ValidationError(
                "Price must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lowercase, alphanumeric, hyphen-separated id slug.
pub fn slug_from_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
