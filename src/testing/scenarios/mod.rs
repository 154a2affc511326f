//! The scenarios of the suite and the helpers they share
//!
//! Each scenario is a fixed, ordered list of dependent HTTP calls. Steps are
//! awaited one after another; a failed step ends the scenario.

mod book;
mod category;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{NewBook, NewCategory};
use crate::common::{Error, Result};

use super::checks::{field_text, Checks};
use super::context::{ScenarioContext, Teardown};

pub use book::{AddBookWithCategory, DeleteBookByLookup, FindBookByTitle, ListAllBooks, UpdateBookByLookup};
pub use category::CategoryLifecycle;

/// A named lifecycle run against the catalog service
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Stable name used on the command line
    fn name(&self) -> &'static str;

    /// One-line summary
    fn description(&self) -> &'static str;

    /// Labels of the steps, in execution order
    fn steps(&self) -> &'static [&'static str];

    /// Execute the steps, calling `ctx.pass` after each
    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()>;
}

/// Every scenario, in suite order
pub fn all() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(CategoryLifecycle),
        Box::new(ListAllBooks),
        Box::new(FindBookByTitle),
        Box::new(AddBookWithCategory),
        Box::new(UpdateBookByLookup),
        Box::new(DeleteBookByLookup),
    ]
}

/// Scenarios matching `names`, in suite order; all of them when empty
pub fn select(names: &[String]) -> Result<Vec<Box<dyn Scenario>>> {
    let known = all();
    let available: Vec<&str> = known.iter().map(|s| s.name()).collect();
    if let Some(unknown) = names.iter().find(|n| !available.contains(&n.as_str())) {
        return Err(Error::unknown_scenario(unknown, &available));
    }

    Ok(known
        .into_iter()
        .filter(|s| names.is_empty() || names.iter().any(|n| n == s.name()))
        .collect())
}

/// Non-empty `_id` of a JSON object
pub(crate) fn id_of(value: &Value) -> Option<String> {
    field_text(value, "_id").filter(|id| !id.is_empty())
}

/// Create a category and register its deletion
pub(crate) async fn provision_category(ctx: &mut ScenarioContext, title: &str) -> Result<String> {
    let response = ctx
        .client()
        .post(
            "category",
            &NewCategory {
                title: title.to_string(),
            },
        )
        .await?;

    let mut checks = Checks::new();
    checks.status_ok(&response);
    let id = checks.object(&response).as_ref().and_then(id_of);
    checks.check(id.is_some(), "Category ID should not be null or empty");
    checks.finish()?;

    let id = id.unwrap_or_default();
    ctx.on_teardown(Teardown::DeleteCategory(id.clone()));
    Ok(id)
}

/// Create a book and register its deletion
pub(crate) async fn provision_book(ctx: &mut ScenarioContext, book: &NewBook) -> Result<String> {
    let response = ctx.client().post("book", book).await?;

    let mut checks = Checks::new();
    checks.status_ok(&response);
    let id = checks.object(&response).as_ref().and_then(id_of);
    checks.check(id.is_some(), "Created book didn't have an Id.");
    checks.finish()?;

    let id = id.unwrap_or_default();
    ctx.on_teardown(Teardown::DeleteBook(id.clone()));
    Ok(id)
}

/// GET every book, expecting 200 and a JSON array
pub(crate) async fn list_books(ctx: &ScenarioContext) -> Result<Vec<Value>> {
    let response = ctx.client().get("book").await?;

    let mut checks = Checks::new();
    checks.check(
        response.is_ok(),
        format!("Failed to retrieve books (status {})", response.status),
    );
    checks.check(!response.is_empty(), "Get books response content is empty");
    checks.finish()?;

    match response.json()? {
        Value::Array(books) => Ok(books),
        _ => Err(Error::assertion("Expected response content to be a JSON array")),
    }
}

/// First element whose `title` equals `title` exactly
pub(crate) fn find_by_title<'a>(items: &'a [Value], kind: &str, title: &str) -> Result<&'a Value> {
    items
        .iter()
        .find(|item| item.get("title").and_then(Value::as_str) == Some(title))
        .ok_or_else(|| Error::fixture_not_found(kind, title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scenario_names_unique() {
        let scenarios = all();
        let mut names: Vec<&str> = scenarios.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
        assert!(scenarios.iter().all(|s| !s.steps().is_empty()));
    }

    #[test]
    fn test_select_keeps_suite_order() {
        let picked = select(&["book-delete-by-lookup".to_string(), "category-lifecycle".to_string()])
            .unwrap();
        let names: Vec<&str> = picked.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["category-lifecycle", "book-delete-by-lookup"]);

        assert_eq!(select(&[]).unwrap().len(), all().len());
    }

    #[test]
    fn test_select_unknown_name() {
        let err = select(&["book-nope".to_string()]).err().unwrap();
        assert!(matches!(err, Error::UnknownScenario { .. }));
        assert!(err.to_string().contains("category-lifecycle"));
    }

    #[test]
    fn test_find_by_title_is_exact() {
        let books = vec![
            json!({ "_id": "1", "title": "The Great Gatsby 2" }),
            json!({ "_id": "2", "title": "The Great Gatsby" }),
        ];
        let found = find_by_title(&books, "Book", "The Great Gatsby").unwrap();
        assert_eq!(id_of(found).as_deref(), Some("2"));

        let err = find_by_title(&books, "Book", "the great gatsby").unwrap_err();
        assert_eq!(err.to_string(), "Book with title 'the great gatsby' not found");
    }

    #[test]
    fn test_id_of_rejects_empty() {
        assert_eq!(id_of(&json!({ "_id": "" })), None);
        assert_eq!(id_of(&json!({ "title": "x" })), None);
        assert_eq!(id_of(&json!({ "_id": "abc" })).as_deref(), Some("abc"));
    }
}
