use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::categories::categories_errors::CategoryError;
use crate::categories::categories_model::{Category, CategoryDB, NewCategory};
use crate::categories::categories_traits::CategoryRepositoryTrait;
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::schema::{categories, transactions};

pub struct CategoryRepository {
    pool: Arc<DbPool>,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn create(&self, new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;

        self.pool.execute(|conn| -> Result<Category> {
            let existing = categories::table
                .filter(categories::name.eq(&new_category.name))
                .first::<CategoryDB>(conn)
                .optional()
                .map_err(CategoryError::from)?;

            if existing.is_some() {
                return Err(CategoryError::DuplicateName(new_category.name.clone()).into());
            }

            let mut category_db: CategoryDB = new_category.into();
            category_db.id = Uuid::new_v4().to_string();

            diesel::insert_into(categories::table)
                .values(&category_db)
                .execute(conn)
                .map_err(CategoryError::from)?;

            Ok(category_db.into())
        })
    }

    async fn delete(&self, category_id: &str) -> Result<()> {
        let id_owned = category_id.to_string();
        self.pool.execute(move |conn| -> Result<()> {
            let category = categories::table
                .find(&id_owned)
                .first::<CategoryDB>(conn)
                .map_err(CategoryError::from)?;

            let txn_count: i64 = transactions::table
                .filter(transactions::category_name.eq(&category.name))
                .count()
                .get_result(conn)
                .map_err(CategoryError::from)?;

            if txn_count > 0 {
                return Err(CategoryError::HasDependents(category.name).into());
            }

            diesel::delete(categories::table.find(&id_owned))
                .execute(conn)
                .map_err(CategoryError::from)?;

            Ok(())
        })
    }

    fn get_by_id(&self, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        let category = categories::table
            .find(category_id)
            .first::<CategoryDB>(&mut conn)
            .map_err(CategoryError::from)?;
        Ok(category.into())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let category = categories::table
            .filter(categories::name.eq(name))
            .first::<CategoryDB>(&mut conn)
            .optional()
            .map_err(CategoryError::from)?;
        Ok(category.map(Category::from))
    }

    fn list(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .order(categories::name.asc())
            .load::<CategoryDB>(&mut conn)
            .map_err(CategoryError::from)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }
}
