use async_trait::async_trait;

use super::categories_model::{Category, NewCategory};
use crate::errors::Result;

#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    async fn create(&self, new_category: NewCategory) -> Result<Category>;
    async fn delete(&self, category_id: &str) -> Result<()>;
    fn get_by_id(&self, category_id: &str) -> Result<Category>;
    fn get_by_name(&self, name: &str) -> Result<Option<Category>>;
    fn list(&self) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;
    async fn delete_category(&self, category_id: &str) -> Result<()>;
    fn get_category(&self, category_id: &str) -> Result<Category>;
    fn get_category_by_name(&self, name: &str) -> Result<Option<Category>>;
    fn get_all_categories(&self) -> Result<Vec<Category>>;
}
