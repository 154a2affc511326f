//! Category lifecycle: create, list, read, update, re-read, delete, and
//! confirm the category is gone.

use async_trait::async_trait;

use crate::api::NewCategory;
use crate::common::Result;
use crate::testing::checks::{ensure_ok, Checks};
use crate::testing::context::{ScenarioContext, Teardown};

use super::{id_of, Scenario};

pub struct CategoryLifecycle;

#[async_trait]
impl Scenario for CategoryLifecycle {
    fn name(&self) -> &'static str {
        "category-lifecycle"
    }

    fn description(&self) -> &'static str {
        "Create, list, read, update, delete a book category and verify it is gone"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "create category",
            "list categories",
            "get category by id",
            "update category",
            "get updated category",
            "delete category",
            "get deleted category",
        ]
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let title = ctx.fixtures().category_title();
        let updated_title = ctx.fixtures().updated_category_title();

        // Create
        let response = ctx
            .client()
            .post("category", &NewCategory { title: title.clone() })
            .await?;
        ensure_ok(&response)?;

        let created = response.json()?;
        let mut checks = Checks::new();
        let id = id_of(&created);
        checks.check(id.is_some(), "Category ID should not be null or empty");
        checks.field_eq(&created, "title", &title, "Expected the category title to match");
        checks.finish()?;
        let id = id.unwrap_or_default();
        ctx.on_teardown(Teardown::DeleteCategory(id.clone()));
        ctx.pass("create category", format!("id {}", id));

        // List
        let response = ctx.client().get("category").await?;
        let mut checks = Checks::new();
        checks.status_ok(&response);
        checks.not_empty(&response);
        if let Some(categories) = checks.non_empty_array(&response, "category") {
            checks.check(
                categories.iter().any(|c| id_of(c).as_deref() == Some(id.as_str())),
                format!("Expected category '{}' in the list", id),
            );
        }
        checks.finish()?;
        ctx.pass("list categories", "");

        // Get by id
        let path = format!("category/{}", id);
        let response = ctx.client().get(&path).await?;
        let mut checks = Checks::new();
        if let Some(category) = checks.object(&response) {
            checks.field_eq(&category, "_id", &id, "Expected the category ID to match");
            checks.field_eq(&category, "title", &title, "Expected the category title to match");
        }
        checks.finish()?;
        ctx.pass("get category by id", "");

        // Update
        let response = ctx
            .client()
            .put(
                &path,
                &NewCategory {
                    title: updated_title.clone(),
                },
            )
            .await?;
        ensure_ok(&response)?;
        ctx.pass("update category", format!("title '{}'", updated_title));

        // Get updated
        let response = ctx.client().get(&path).await?;
        let mut checks = Checks::new();
        checks.status_ok(&response);
        checks.not_empty(&response);
        if let Some(category) = checks.object(&response) {
            checks.field_eq(
                &category,
                "title",
                &updated_title,
                "Expected the updated category name to match",
            );
            checks.field_eq(&category, "_id", &id, "Update should keep the category ID");
        }
        checks.finish()?;
        ctx.pass("get updated category", "");

        // Delete
        let response = ctx.client().delete(&path).await?;
        ensure_ok(&response)?;
        ctx.forget(&Teardown::DeleteCategory(id.clone()));
        ctx.pass("delete category", "");

        // Get deleted
        let response = ctx.client().get(&path).await?;
        let mut checks = Checks::new();
        checks.check(
            response.is_absent(),
            format!(
                "Deleted category should not be found (got '{}')",
                response.body.trim()
            ),
        );
        checks.finish()?;
        ctx.pass("get deleted category", "");

        Ok(())
    }
}
