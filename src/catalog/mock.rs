//! In-memory catalog, served when `USE_MOCK_DATA=true` and in tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::dto::{default_ai_hint, ProductFilter, ProductView, DEFAULT_PLACEHOLDER_IMAGE};
use super::repo::{Catalog, CatalogError, CatalogResult};
use super::repo_types::{Category, ProductInput, ProductStatus};

struct Inner {
    categories: Vec<Category>,
    products: Vec<ProductView>,
    next_id: i32,
}

pub struct MockCatalog {
    inner: RwLock<Inner>,
}

const MOCK_CATEGORIES: [&str; 4] = ["Fresh Veggies", "Leafy Greens", "Root Vegetables", "Fruits"];

// (name, description, price in cents, category index, stock)
const MOCK_PRODUCTS: [(&str, &str, i64, usize, i32); 6] = [
    ("Mock Carrot", "Crunchy mock carrots from local farms. Rich in Vitamin A.", 199, 2, 100),
    ("Mock Spinach", "Fresh mock spinach leaves, perfect for salads or cooking.", 249, 1, 50),
    ("Mock Tomato", "Juicy mock tomatoes, great for sauces or fresh eating.", 300, 3, 75),
    ("Mock Broccoli", "Fresh mock broccoli florets, packed with nutrients.", 279, 0, 0),
    ("Mock Potato", "Versatile mock potatoes, ideal for mashing or roasting.", 99, 2, 120),
    ("Mock Lettuce", "Crisp mock lettuce, perfect for sandwiches and salads.", 150, 1, 60),
];

impl MockCatalog {
    /// Empty catalog with the standard categories.
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(Inner::with_categories()),
        }
    }

    pub fn seeded() -> Self {
        let mut inner = Inner::with_categories();
        for (name, description, cents, category, stock) in MOCK_PRODUCTS {
            let input = ProductInput {
                name: name.into(),
                description: Some(description.into()),
                price: Decimal::new(cents, 2),
                stock,
                image_url: Some(format!(
                    "{DEFAULT_PLACEHOLDER_IMAGE}?text={}",
                    name.replace(' ', "+")
                )),
                category_id: category as i32 + 1,
                data_ai_hint: None,
            };
            if let Err(e) = inner.insert(input) {
                tracing::warn!(error = %e, name, "skipping mock product");
            }
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

impl Inner {
    fn with_categories() -> Self {
        let categories = MOCK_CATEGORIES
            .iter()
            .zip(1..)
            .map(|(name, id)| Category {
                id,
                name: (*name).to_string(),
                image_url: Some("https://placehold.co/200x150.png".into()),
            })
            .collect();
        Self {
            categories,
            products: Vec::new(),
            next_id: 1,
        }
    }

    fn category_name(&self, id: i32) -> Option<String> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }

    fn build_view(
        &self,
        id: i32,
        input: ProductInput,
        status: ProductStatus,
    ) -> CatalogResult<ProductView> {
        let category = self
            .category_name(input.category_id)
            .ok_or(CatalogError::UnknownCategory(input.category_id))?;
        let data_ai_hint = input
            .data_ai_hint
            .or_else(|| default_ai_hint(&input.name))
            .unwrap_or_else(|| "vegetable".into());
        Ok(ProductView {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            image_url: input
                .image_url
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.into()),
            category,
            category_id: input.category_id,
            stock: input.stock,
            status,
            data_ai_hint,
        })
    }

    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.products
            .iter()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn insert(&mut self, input: ProductInput) -> CatalogResult<ProductView> {
        if self.name_taken(&input.name, None) {
            return Err(CatalogError::DuplicateName);
        }
        let view = self.build_view(self.next_id, input, ProductStatus::Active)?;
        self.next_id += 1;
        self.products.push(view.clone());
        Ok(view)
    }

    fn position(&self, id: i32) -> CatalogResult<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn list_products(&self, filter: &ProductFilter) -> CatalogResult<Vec<ProductView>> {
        let inner = self.inner.read().await;
        let mut out: Vec<ProductView> = inner
            .products
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn get_product(&self, id: i32) -> CatalogResult<Option<ProductView>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let mut categories = self.inner.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_product(
        &self,
        input: ProductInput,
        _vendor_id: Option<Uuid>,
    ) -> CatalogResult<ProductView> {
        self.inner.write().await.insert(input)
    }

    async fn update_product(&self, id: i32, input: ProductInput) -> CatalogResult<ProductView> {
        let mut inner = self.inner.write().await;
        let idx = inner.position(id)?;
        if inner.name_taken(&input.name, Some(id)) {
            return Err(CatalogError::DuplicateName);
        }
        let status = inner.products[idx].status;
        let view = inner.build_view(id, input, status)?;
        inner.products[idx] = view.clone();
        Ok(view)
    }

    async fn delete_product(&self, id: i32) -> CatalogResult<ProductView> {
        let mut inner = self.inner.write().await;
        let idx = inner.position(id)?;
        Ok(inner.products.remove(idx))
    }

    async fn set_status(&self, id: i32, status: ProductStatus) -> CatalogResult<ProductView> {
        let mut inner = self.inner.write().await;
        let idx = inner.position(id)?;
        inner.products[idx].status = status;
        Ok(inner.products[idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, category_id: i32) -> ProductInput {
        ProductInput {
            name: name.into(),
            description: None,
            price: Decimal::new(250, 2),
            stock: 5,
            image_url: None,
            category_id,
            data_ai_hint: None,
        }
    }

    #[tokio::test]
    async fn search_matches_name_or_description_case_insensitively() {
        let catalog = MockCatalog::seeded();
        let filter = ProductFilter {
            search: Some("SALAD".into()),
            ..ProductFilter::default()
        };
        let names: Vec<_> = catalog
            .list_products(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Mock Lettuce", "Mock Spinach"]);
    }

    #[tokio::test]
    async fn category_filter_returns_only_linked_products() {
        let catalog = MockCatalog::seeded();
        let filter = ProductFilter {
            category: Some("Root Vegetables".into()),
            ..ProductFilter::default()
        };
        let products = catalog.list_products(&filter).await.unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| p.category == "Root Vegetables"));
    }

    #[tokio::test]
    async fn listing_is_sorted_by_name() {
        let catalog = MockCatalog::seeded();
        let products = catalog.list_products(&ProductFilter::default()).await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(products.len(), MOCK_PRODUCTS.len());
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let catalog = MockCatalog::seeded();
        let err = catalog
            .create_product(input("Mock Carrot", 1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName));

        let kale = catalog.create_product(input("Kale", 2), None).await.unwrap();
        let err = catalog
            .update_product(kale.id, input("Mock Potato", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName));
        // Renaming to its own name is fine.
        catalog.update_product(kale.id, input("Kale", 2)).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let catalog = MockCatalog::empty();
        let err = catalog
            .create_product(input("Kale", 99), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCategory(99)));
    }

    #[tokio::test]
    async fn archive_hides_from_public_listing() {
        let catalog = MockCatalog::seeded();
        let carrot = catalog
            .list_products(&ProductFilter::default())
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.name == "Mock Carrot")
            .unwrap();
        catalog.set_status(carrot.id, ProductStatus::Archived).await.unwrap();

        let public = catalog.list_products(&ProductFilter::default()).await.unwrap();
        assert!(public.iter().all(|p| p.id != carrot.id));
        let inventory = catalog.list_products(&ProductFilter::inventory()).await.unwrap();
        assert!(inventory.iter().any(|p| p.id == carrot.id));
    }

    #[tokio::test]
    async fn delete_missing_product_is_not_found() {
        let catalog = MockCatalog::empty();
        assert!(matches!(
            catalog.delete_product(4).await.unwrap_err(),
            CatalogError::NotFound(4)
        ));
    }
}
