//! Products and the product collection.

use serde::{Deserialize, Serialize};

use super::category::CategoryList;
use crate::types::{Price, ProductId, Rating};
use crate::validation::ValidationErrors;

/// Image used when a product is saved without one.
pub const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1505740420928-5e560c06d30e";

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image: String,
    pub featured: bool,
    pub rating: Rating,
    pub stock: u32,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.category = fields.category;
        self.image = fields.image;
        self.featured = fields.featured;
        self.rating = fields.rating;
        self.stock = fields.stock;
    }
}

/// Raw admin form input for creating or editing a product.
///
/// Every field arrives as text; [`ProductInput::validate`] turns it into
/// [`ProductFields`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    /// Checkbox value; present means checked.
    #[serde(default)]
    pub featured: Option<String>,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub stock: String,
}

/// Validated product fields, without an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub image: String,
    pub featured: bool,
    pub rating: Rating,
    pub stock: u32,
}

impl ProductInput {
    /// Pre-fill the form from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.input_value(),
            category: product.category.clone(),
            image: product.image.clone(),
            featured: product.featured.then(|| "on".to_string()),
            rating: product.rating.to_string(),
            stock: product.stock.to_string(),
        }
    }

    /// Whether the featured checkbox was ticked.
    #[must_use]
    pub fn is_featured(&self) -> bool {
        self.featured
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != "false")
    }

    /// Validate every field against the current category list.
    ///
    /// # Errors
    ///
    /// Returns all field failures at once.
    pub fn validate(&self, categories: &CategoryList) -> Result<ProductFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.require("name", "Product name", &self.name);
        errors.require("description", "Description", &self.description);

        let price = Price::parse(&self.price)
            .map_err(|e| errors.add("price", capitalize(&e.to_string())))
            .ok();

        let category = self.category.trim();
        if category.is_empty() {
            errors.add("category", "Category is required");
        } else if !categories.is_assignable(category) {
            errors.add("category", format!("Unknown category: {category}"));
        }

        let rating = Rating::parse(&self.rating)
            .map_err(|e| errors.add("rating", capitalize(&e.to_string())))
            .ok();

        let stock = parse_stock(&self.stock)
            .map_err(|message| errors.add("stock", message))
            .ok();

        let image = match self.image.trim() {
            "" => DEFAULT_IMAGE_URL.to_string(),
            url => url.to_string(),
        };

        match (price, rating, stock) {
            (Some(price), Some(rating), Some(stock)) if errors.is_empty() => Ok(ProductFields {
                name: self.name.trim().to_string(),
                description: self.description.trim().to_string(),
                price,
                category: category.to_string(),
                image,
                featured: self.is_featured(),
                rating,
                stock,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_stock(raw: &str) -> Result<u32, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if trimmed.starts_with('-') {
        return Err("Stock cannot be negative");
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| "Stock must be a whole number")
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Errors from catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("only {available} of product {id} in stock, {requested} requested")]
    InsufficientStock {
        id: ProductId,
        requested: u32,
        available: u32,
    },
}

/// The product collection, persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wrap an existing product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Featured products, in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Products filed under `category`; the `All` sentinel matches everything.
    pub fn in_category<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| category == super::ALL_CATEGORY || p.category == category)
    }

    /// Admin table search: case-insensitive match on name, description or category.
    #[must_use]
    pub fn admin_search(&self, term: &str) -> Vec<&Product> {
        let needle = term.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// The id the next created product will get.
    #[must_use]
    pub fn next_id(&self) -> ProductId {
        self.products
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(ProductId::new(1), |max| max.next())
    }

    /// Append a new product and return it.
    pub fn create(&mut self, fields: ProductFields) -> Product {
        let mut product = Product {
            id: self.next_id(),
            name: String::new(),
            description: String::new(),
            price: Price::ZERO,
            category: String::new(),
            image: String::new(),
            featured: false,
            rating: Rating::default(),
            stock: 0,
        };
        product.apply(fields);
        self.products.push(product.clone());
        product
    }

    /// Replace the fields of an existing product, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` for an unknown id.
    pub fn update(&mut self, id: ProductId, fields: ProductFields) -> Result<&Product, CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.apply(fields);
        Ok(product)
    }

    /// Remove a product and return it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` for an unknown id.
    pub fn delete(&mut self, id: ProductId) -> Result<Product, CatalogError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        Ok(self.products.remove(index))
    }

    /// Move every product filed under `old` to `new`. Returns how many moved.
    pub fn relabel(&mut self, old: &str, new: &str) -> usize {
        let mut moved = 0;
        for product in self.products.iter_mut().filter(|p| p.category == old) {
            product.category = new.to_string();
            moved += 1;
        }
        moved
    }

    /// Take `quantity` units out of stock.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id or when stock is short; stock is
    /// left unchanged on error.
    pub fn take_stock(&mut self, id: ProductId, quantity: u32) -> Result<u32, CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.stock = product
            .stock
            .checked_sub(quantity)
            .ok_or(CatalogError::InsufficientStock {
                id,
                requested: quantity,
                available: product.stock,
            })?;
        Ok(product.stock)
    }

    /// Return `quantity` units to stock. Unknown ids are ignored and report `None`.
    pub fn return_stock(&mut self, id: ProductId, quantity: u32) -> Option<u32> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        product.stock = product.stock.saturating_add(quantity);
        Some(product.stock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn input(name: &str, price: &str, category: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: "A thing".to_string(),
            price: price.to_string(),
            category: category.to_string(),
            stock: "3".to_string(),
            ..ProductInput::default()
        }
    }

    #[test]
    fn test_validate_fills_defaults() {
        let fields = input("Lamp", "19.50", "Home & Kitchen")
            .validate(&seed::categories())
            .unwrap();
        assert_eq!(fields.image, DEFAULT_IMAGE_URL);
        assert_eq!(fields.rating, Rating::default());
        assert!(!fields.featured);
        assert_eq!(fields.stock, 3);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let bad = ProductInput {
            price: "-4".to_string(),
            category: "All".to_string(),
            rating: "9".to_string(),
            stock: "-1".to_string(),
            ..ProductInput::default()
        };
        let errors = bad.validate(&seed::categories()).unwrap_err();
        for field in ["name", "description", "price", "category", "rating", "stock"] {
            assert!(errors.has(field), "expected error for {field}");
        }
        assert_eq!(errors.message_for("price"), Some("Price cannot be negative"));
    }

    #[test]
    fn test_validate_rejects_price_above_limit() {
        let errors = input("Lamp", "79228162514264337593543950335", "Home & Kitchen")
            .validate(&seed::categories())
            .unwrap_err();
        assert_eq!(
            errors.message_for("price"),
            Some("Price cannot exceed $1,000,000,000.00")
        );
    }

    #[test]
    fn test_validate_rejects_unknown_category() {
        let errors = input("Lamp", "1", "Garden")
            .validate(&seed::categories())
            .unwrap_err();
        assert_eq!(errors.message_for("category"), Some("Unknown category: Garden"));
    }

    #[test]
    fn test_featured_checkbox() {
        let mut form = input("Lamp", "1", "Clothing");
        assert!(!form.is_featured());
        form.featured = Some("on".to_string());
        assert!(form.is_featured());
    }

    #[test]
    fn test_create_assigns_next_id() {
        let mut catalog = seed::catalog();
        let fields = input("Lamp", "19.50", "Home & Kitchen")
            .validate(&seed::categories())
            .unwrap();
        let created = catalog.create(fields);
        assert_eq!(created.id, ProductId::new(9));
        assert_eq!(catalog.len(), 9);
        assert_eq!(Catalog::default().next_id(), ProductId::new(1));
    }

    #[test]
    fn test_update_keeps_id() {
        let mut catalog = seed::catalog();
        let fields = input("Renamed", "5", "Clothing")
            .validate(&seed::categories())
            .unwrap();
        let updated = catalog.update(ProductId::new(2), fields).unwrap();
        assert_eq!(updated.id, ProductId::new(2));
        assert_eq!(updated.name, "Renamed");
    }

    #[test]
    fn test_update_and_delete_unknown() {
        let mut catalog = seed::catalog();
        let fields = input("X", "5", "Clothing")
            .validate(&seed::categories())
            .unwrap();
        assert_eq!(
            catalog.update(ProductId::new(99), fields).unwrap_err(),
            CatalogError::ProductNotFound(ProductId::new(99))
        );
        assert!(catalog.delete(ProductId::new(99)).is_err());
        assert_eq!(catalog.delete(ProductId::new(1)).unwrap().id, ProductId::new(1));
        assert!(catalog.get(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_form_round_trip_from_product() {
        let catalog = seed::catalog();
        let product = catalog.get(ProductId::new(1)).unwrap();
        let fields = ProductInput::from_product(product)
            .validate(&seed::categories())
            .unwrap();
        assert_eq!(fields.price, product.price);
        assert_eq!(fields.rating, product.rating);
        assert!(fields.featured);
    }

    #[test]
    fn test_in_category_all_matches_everything() {
        let catalog = seed::catalog();
        assert_eq!(catalog.in_category("All").count(), catalog.len());
        assert!(catalog.in_category("Clothing").all(|p| p.category == "Clothing"));
    }

    #[test]
    fn test_admin_search_matches_category() {
        let catalog = seed::catalog();
        let hits = catalog.admin_search("KITCHEN");
        assert_eq!(hits.len(), 2);
        assert_eq!(catalog.admin_search("  ").len(), catalog.len());
    }

    #[test]
    fn test_relabel() {
        let mut catalog = seed::catalog();
        assert_eq!(catalog.relabel("Electronics", "Gadgets"), 3);
        assert_eq!(catalog.in_category("Gadgets").count(), 3);
    }

    #[test]
    fn test_take_and_return_stock() {
        let mut catalog = seed::catalog();
        let id = ProductId::new(3);
        assert_eq!(catalog.take_stock(id, 5).unwrap(), 3);
        assert_eq!(
            catalog.take_stock(id, 4).unwrap_err(),
            CatalogError::InsufficientStock {
                id,
                requested: 4,
                available: 3
            }
        );
        assert_eq!(catalog.return_stock(id, 2), Some(5));
        assert_eq!(catalog.return_stock(ProductId::new(99), 2), None);
    }
}
