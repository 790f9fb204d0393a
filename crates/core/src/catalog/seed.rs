//! First-run catalog data.
//!
//! Loaded when the local store has never held a product or category list.

use super::category::CategoryList;
use super::product::{Catalog, Product};
use crate::types::{Price, ProductId, Rating};

/// Category tile shown when a category has no dedicated image.
pub const FALLBACK_CATEGORY_IMAGE: &str =
    "https://images.unsplash.com/photo-1472851294608-062f824d29cc";

/// Initial category list.
#[must_use]
pub fn categories() -> CategoryList {
    CategoryList::new(["Clothing", "Electronics", "Accessories", "Home & Kitchen"])
}

/// Home page tile image for a category.
#[must_use]
pub fn category_image(category: &str) -> &'static str {
    match category {
        "Clothing" => "https://images.unsplash.com/photo-1523381210434-271e8be1f52b",
        "Electronics" => "https://images.unsplash.com/photo-1550009158-9ebf69173e03",
        "Accessories" => "https://images.unsplash.com/photo-1606760227091-3dd870d97f1d",
        "Home & Kitchen" => "https://images.unsplash.com/photo-1556911220-bff31c812dba",
        _ => FALLBACK_CATEGORY_IMAGE,
    }
}

struct SeedProduct {
    id: u64,
    name: &'static str,
    description: &'static str,
    cents: u64,
    category: &'static str,
    image: &'static str,
    featured: bool,
    rating_tenths: u8,
    stock: u32,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        id: 1,
        name: "Wireless Bluetooth Headphones",
        description: "High-quality sound with noise cancellation and long battery life. Perfect for music lovers and professionals alike.",
        cents: 12999,
        category: "Electronics",
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e",
        featured: true,
        rating_tenths: 45,
        stock: 15,
    },
    SeedProduct {
        id: 2,
        name: "Premium Cotton T-Shirt",
        description: "Soft, comfortable cotton t-shirt with a modern fit. Available in various colors and sizes.",
        cents: 2499,
        category: "Clothing",
        image: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab",
        featured: true,
        rating_tenths: 42,
        stock: 50,
    },
    SeedProduct {
        id: 3,
        name: "Smart Watch",
        description: "Track your fitness, receive notifications, and more with this advanced smartwatch. Water-resistant and long battery life.",
        cents: 19999,
        category: "Electronics",
        image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30",
        featured: true,
        rating_tenths: 47,
        stock: 8,
    },
    SeedProduct {
        id: 4,
        name: "Leather Wallet",
        description: "Genuine leather wallet with multiple card slots and compartments. Slim design fits perfectly in your pocket.",
        cents: 3999,
        category: "Accessories",
        image: "https://images.unsplash.com/photo-1627123424574-724758594e93",
        featured: false,
        rating_tenths: 40,
        stock: 25,
    },
    SeedProduct {
        id: 5,
        name: "Stainless Steel Water Bottle",
        description: "Keep your drinks hot or cold for hours with this insulated water bottle. Eco-friendly and durable.",
        cents: 2999,
        category: "Home & Kitchen",
        image: "https://images.unsplash.com/photo-1589365278144-c9e705f843ba",
        featured: true,
        rating_tenths: 43,
        stock: 30,
    },
    SeedProduct {
        id: 6,
        name: "Wireless Charging Pad",
        description: "Fast wireless charging for compatible devices. Sleek, modern design complements any desk or nightstand.",
        cents: 3499,
        category: "Electronics",
        image: "https://images.unsplash.com/photo-1582568742002-499ac333642c",
        featured: false,
        rating_tenths: 41,
        stock: 20,
    },
    SeedProduct {
        id: 7,
        name: "Denim Jeans",
        description: "Classic denim jeans with a comfortable fit. Durable and stylish for everyday wear.",
        cents: 5999,
        category: "Clothing",
        image: "https://images.unsplash.com/photo-1541099649105-f69ad21f3246",
        featured: false,
        rating_tenths: 44,
        stock: 40,
    },
    SeedProduct {
        id: 8,
        name: "Coffee Maker",
        description: "Programmable coffee maker with timer and auto shut-off. Makes up to 12 cups of delicious coffee.",
        cents: 4999,
        category: "Home & Kitchen",
        image: "https://images.unsplash.com/photo-1520970519539-8156e9ac1de6",
        featured: true,
        rating_tenths: 46,
        stock: 12,
    },
];

/// Initial product catalog (ids 1 through 8).
#[must_use]
pub fn catalog() -> Catalog {
    Catalog::new(
        PRODUCTS
            .iter()
            .map(|seed| Product {
                id: ProductId::new(seed.id),
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                price: Price::from_cents(seed.cents),
                category: seed.category.to_string(),
                image: seed.image.to_string(),
                featured: seed.featured,
                rating: Rating::new(rust_decimal::Decimal::new(i64::from(seed.rating_tenths), 1))
                    .unwrap_or_default(),
                stock: seed.stock,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_products_use_seed_categories() {
        let categories = categories();
        let catalog = catalog();
        assert_eq!(catalog.len(), 8);
        assert!(
            catalog
                .products()
                .iter()
                .all(|p| categories.is_assignable(&p.category))
        );
    }

    #[test]
    fn test_category_image_fallback() {
        assert_eq!(category_image("Garden"), FALLBACK_CATEGORY_IMAGE);
        assert_ne!(category_image("Clothing"), FALLBACK_CATEGORY_IMAGE);
    }
}
