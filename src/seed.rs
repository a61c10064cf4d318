//! Idempotent demo data: the standard categories plus a starter catalog.
//!
//! Safe to run on every boot; rows are matched by name and refreshed.

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::catalog::dto::{default_ai_hint, DEFAULT_PLACEHOLDER_IMAGE};

const CATEGORY_IMAGE: &str = "https://placehold.co/200x150.png";

pub const CATEGORIES: [&str; 4] = ["Fresh Veggies", "Leafy Greens", "Root Vegetables", "Fruits"];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    cents: i64,
    stock: i32,
    category: &'static str,
}

const PRODUCTS: [SeedProduct; 10] = [
    SeedProduct { name: "Organic Potato", description: "Earthy organic potatoes, perfect for roasting, mashing or frying.", cents: 299, stock: 150, category: "Fresh Veggies" },
    SeedProduct { name: "Red Onion", description: "Sweet and sharp red onions for salads, salsas and stir-fries.", cents: 175, stock: 200, category: "Fresh Veggies" },
    SeedProduct { name: "Sweet Carrots", description: "Crunchy sweet carrots, great raw or cooked.", cents: 220, stock: 120, category: "Root Vegetables" },
    SeedProduct { name: "Fresh Spinach", description: "Tender spinach leaves packed with iron and vitamins.", cents: 350, stock: 80, category: "Leafy Greens" },
    SeedProduct { name: "Vine Tomatoes", description: "Juicy vine-ripened tomatoes bursting with flavor.", cents: 310, stock: 90, category: "Fruits" },
    SeedProduct { name: "Broccoli Florets", description: "Ready-to-cook broccoli florets, steamed in minutes.", cents: 280, stock: 110, category: "Fresh Veggies" },
    SeedProduct { name: "Romaine Lettuce", description: "Crisp romaine hearts for salads and wraps.", cents: 290, stock: 70, category: "Leafy Greens" },
    SeedProduct { name: "Bell Pepper Trio", description: "Red, yellow and green bell peppers in one pack.", cents: 450, stock: 60, category: "Fresh Veggies" },
    SeedProduct { name: "Cucumber", description: "Cool, refreshing cucumbers for salads and snacks.", cents: 120, stock: 130, category: "Fresh Veggies" },
    SeedProduct { name: "Zucchini", description: "Versatile zucchini for grilling, baking or spiralizing.", cents: 190, stock: 100, category: "Fresh Veggies" },
];

#[instrument(skip(db))]
pub async fn run(db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin seed transaction")?;

    for name in CATEGORIES {
        sqlx::query(
            r#"
            INSERT INTO categories (name, image_url)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET image_url = EXCLUDED.image_url
            "#,
        )
        .bind(name)
        .bind(CATEGORY_IMAGE)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("seed category {name}"))?;
    }

    for p in &PRODUCTS {
        let image_url = format!("{DEFAULT_PLACEHOLDER_IMAGE}?text={}", p.name.replace(' ', "+"));
        sqlx::query(
            r#"
            INSERT INTO products
                (name, description, price, stock, image_url, data_ai_hint, category_id)
            SELECT $1, $2, $3, $4, $5, $6, c.id
              FROM categories c
             WHERE c.name = $7
            ON CONFLICT (name) DO UPDATE
               SET description = EXCLUDED.description,
                   price = EXCLUDED.price,
                   stock = EXCLUDED.stock,
                   image_url = EXCLUDED.image_url,
                   data_ai_hint = EXCLUDED.data_ai_hint,
                   category_id = EXCLUDED.category_id,
                   updated_at = now()
            "#,
        )
        .bind(p.name)
        .bind(p.description)
        .bind(Decimal::new(p.cents, 2))
        .bind(p.stock)
        .bind(image_url)
        .bind(default_ai_hint(p.name))
        .bind(p.category)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("seed product {}", p.name))?;
    }

    tx.commit().await.context("commit seed transaction")?;
    info!(
        categories = CATEGORIES.len(),
        products = PRODUCTS.len(),
        "database seeded"
    );
    Ok(())
}
