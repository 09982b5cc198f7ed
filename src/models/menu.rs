//! Menu item record. Ingredient references point into the inventory
//! collection but are not kept in sync with it; dangling ids are tolerated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub item_id: String,
    /// Amount of the inventory unit used per serving
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub bar_id: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Form input for a new menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub bar_id: String,
    pub available: bool,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewMenuItem {
    #[must_use]
    pub fn into_item(self, id: String) -> MenuItem {
        MenuItem {
            id,
            name: self.name.trim().to_string(),
            category: self.category,
            price: self.price,
            ingredients: self.ingredients,
            bar_id: self.bar_id,
            available: self.available,
            image: self.image,
        }
    }
}
