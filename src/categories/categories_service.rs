use std::sync::Arc;

use super::categories_model::{Category, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::Result;

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl CategoryServiceTrait for CategoryService {
    async fn create_category(&self, new_category: NewCategory) -> Result<Category> {
        self.repository.create(new_category).await
    }

    async fn delete_category(&self, category_id: &str) -> Result<()> {
        self.repository.delete(category_id).await
    }

    fn get_category(&self, category_id: &str) -> Result<Category> {
        self.repository.get_by_id(category_id)
    }

    fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.repository.get_by_name(name)
    }

    fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.repository.list()
    }
}
