//! Book scenarios: listing, lookup by title, creation with a category
//! reference, partial update, and deletion.
//!
//! Every scenario provisions the category and book it works on, so exact
//! title lookups only match this run's data.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiResponse, BookCategory, NewBook};
use crate::common::{Error, Result};
use crate::testing::checks::{ensure_ok, field_text, Checks};
use crate::testing::context::{ScenarioContext, Teardown};

use super::{find_by_title, id_of, list_books, provision_book, provision_category, Scenario};

const REQUIRED_FIELDS: [&str; 6] = ["title", "author", "description", "price", "pages", "category"];

/// Fields a title and author update must not touch
const UNTOUCHED_FIELDS: [&str; 3] = ["description", "price", "pages"];

/// Category id of a book, whether embedded as an object or sent back bare
fn category_id(book: &Value) -> Option<String> {
    let category = book.get("category")?.clone();
    serde_json::from_value::<BookCategory>(category)
        .ok()
        .map(|c| c.id().to_string())
        .filter(|id| !id.is_empty())
}

/// Id of a book found by lookup
fn book_id(book: &Value) -> Result<String> {
    id_of(book).ok_or_else(|| Error::assertion("Book ID should not be null or empty"))
}

/// Id of the first category in a category list
fn first_category_id(response: &ApiResponse) -> Result<String> {
    let mut checks = Checks::new();
    let id = checks
        .non_empty_array(response, "category")
        .and_then(|categories| categories.first().and_then(id_of));
    checks.check(id.is_some(), "First category should have an ID");
    checks.finish()?;
    Ok(id.unwrap_or_default())
}

/// Compare every field of a stored book against what was sent
fn check_book_fields(checks: &mut Checks, book: &Value, expected: &NewBook) {
    checks.field_eq(book, "title", &expected.title, "Book title should match the input.");
    checks.field_eq(book, "author", &expected.author, "Book author should match the input.");
    checks.field_eq(
        book,
        "description",
        &expected.description,
        "Book description should match the input.",
    );
    checks.equal(
        book.get("price").and_then(Value::as_f64),
        Some(expected.price),
        "Book price should match the input.",
    );
    checks.equal(
        book.get("pages").and_then(Value::as_i64),
        Some(expected.pages),
        "Book pages should match the input.",
    );
}

/// Provision a shelf category and one book on it
async fn provision_shelf_with(
    ctx: &mut ScenarioContext,
    book: impl FnOnce(&ScenarioContext, &str) -> NewBook,
) -> Result<(String, NewBook)> {
    let shelf = ctx.fixtures().shelf_title();
    let category = provision_category(ctx, &shelf).await?;
    let book = book(&*ctx, &category);
    let id = provision_book(ctx, &book).await?;
    ctx.pass("provision fixtures", format!("category {}, book {}", category, id));
    Ok((category, book))
}

pub struct ListAllBooks;

#[async_trait]
impl Scenario for ListAllBooks {
    fn name(&self) -> &'static str {
        "book-list-all"
    }

    fn description(&self) -> &'static str {
        "List every book and require all catalog fields on each"
    }

    fn steps(&self) -> &'static [&'static str] {
        &["provision fixtures", "list all books"]
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        provision_shelf_with(ctx, |ctx, category| ctx.fixtures().new_book(category)).await?;

        let response = ctx.client().get("book").await?;
        let mut checks = Checks::new();
        checks.status_ok(&response);
        checks.not_empty(&response);
        if let Some(books) = checks.non_empty_array(&response, "book") {
            for (index, book) in books.iter().enumerate() {
                let label = field_text(book, "_id").unwrap_or_else(|| format!("#{}", index));
                for field in REQUIRED_FIELDS {
                    checks.field_present(
                        book,
                        field,
                        &format!("Book {} {} should not be null or empty", label, field),
                    );
                }
            }
        }
        checks.finish()?;
        ctx.pass("list all books", "");

        Ok(())
    }
}

pub struct FindBookByTitle;

#[async_trait]
impl Scenario for FindBookByTitle {
    fn name(&self) -> &'static str {
        "book-find-by-title"
    }

    fn description(&self) -> &'static str {
        "Find a book by exact title in the full list and check its author"
    }

    fn steps(&self) -> &'static [&'static str] {
        &["provision fixtures", "list books", "find book by title"]
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let (_, expected) =
            provision_shelf_with(ctx, |ctx, category| ctx.fixtures().lookup_book(category)).await?;

        let books = list_books(ctx).await?;
        ctx.pass("list books", format!("{} books", books.len()));

        let book = find_by_title(&books, "Book", &expected.title)?;
        let mut checks = Checks::new();
        checks.field_eq(book, "author", &expected.author, "Book author should be different");
        checks.finish()?;
        ctx.pass("find book by title", &expected.title);

        Ok(())
    }
}

pub struct AddBookWithCategory;

#[async_trait]
impl Scenario for AddBookWithCategory {
    fn name(&self) -> &'static str {
        "book-add-with-category"
    }

    fn description(&self) -> &'static str {
        "Create a book in the first listed category and read every field back"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "provision category",
            "pick first category",
            "create book",
            "get created book",
        ]
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let shelf = ctx.fixtures().shelf_title();
        let provisioned = provision_category(ctx, &shelf).await?;
        ctx.pass("provision category", format!("id {}", provisioned));

        let response = ctx.client().get("category").await?;
        ensure_ok(&response)?;
        let category = first_category_id(&response)?;
        ctx.pass("pick first category", format!("id {}", category));

        let input = ctx.fixtures().new_book(&category);
        let response = ctx.client().post("book", &input).await?;
        let mut checks = Checks::new();
        checks.status_ok(&response);
        checks.not_empty(&response);
        let id = checks.object(&response).as_ref().and_then(id_of);
        checks.check(id.is_some(), "Created book didn't have an Id.");
        checks.finish()?;
        let id = id.unwrap_or_default();
        ctx.on_teardown(Teardown::DeleteBook(id.clone()));
        ctx.pass("create book", format!("id {}", id));

        let response = ctx.client().get(&format!("book/{}", id)).await?;
        let mut checks = Checks::new();
        checks.status_ok(&response);
        checks.not_empty(&response);
        if let Some(book) = checks.object(&response) {
            check_book_fields(&mut checks, &book, &input);
            if checks.field_present(&book, "category", "Book category should not be null or empty") {
                checks.equal(
                    category_id(&book),
                    Some(category.clone()),
                    &format!("Book category should be '{}'", category),
                );
            }
        }
        checks.finish()?;
        ctx.pass("get created book", "");

        Ok(())
    }
}

pub struct UpdateBookByLookup;

#[async_trait]
impl Scenario for UpdateBookByLookup {
    fn name(&self) -> &'static str {
        "book-update-by-lookup"
    }

    fn description(&self) -> &'static str {
        "Find a book by title, change its title and author, and verify nothing else moved"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "provision fixtures",
            "find book by title",
            "update title and author",
            "verify untouched fields",
        ]
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let (_, target) =
            provision_shelf_with(ctx, |ctx, category| ctx.fixtures().update_target(category))
                .await?;

        // the first title match may predate this run; its stored fields are the baseline
        let books = list_books(ctx).await?;
        let found = find_by_title(&books, "Book", &target.title)?.clone();
        let id = book_id(&found)?;
        ctx.pass("find book by title", format!("id {}", id));

        let patch = ctx.fixtures().update_patch();
        let new_title = patch.title.clone().unwrap_or_default();
        let new_author = patch.author.clone().unwrap_or_default();
        let path = format!("book/{}", id);

        let response = ctx.client().put(&path, &patch).await?;
        let mut checks = Checks::new();
        checks.status_ok(&response);
        checks.check(
            !response.is_empty(),
            "Update response content should not be empty",
        );
        if let Some(book) = checks.object(&response) {
            checks.field_eq(&book, "title", &new_title, "Book name should match the updated value");
            checks.field_eq(&book, "author", &new_author, "Book author should match the updated value");
        }
        checks.finish()?;
        ctx.pass("update title and author", format!("'{}' by {}", new_title, new_author));

        let response = ctx.client().get(&path).await?;
        let mut checks = Checks::new();
        checks.status_ok(&response);
        if let Some(book) = checks.object(&response) {
            checks.field_eq(&book, "_id", &id, "Update should keep the book ID");
            checks.field_eq(&book, "title", &new_title, "Book name should match the updated value");
            checks.field_eq(&book, "author", &new_author, "Book author should match the updated value");
            for field in UNTOUCHED_FIELDS {
                checks.equal(
                    book.get(field),
                    found.get(field),
                    &format!("Update should keep the book {}", field),
                );
            }
            checks.equal(
                category_id(&book),
                category_id(&found),
                "Update should keep the book category",
            );
        }
        checks.finish()?;
        ctx.pass("verify untouched fields", "");

        Ok(())
    }
}

pub struct DeleteBookByLookup;

#[async_trait]
impl Scenario for DeleteBookByLookup {
    fn name(&self) -> &'static str {
        "book-delete-by-lookup"
    }

    fn description(&self) -> &'static str {
        "Find a book by title, delete it, and verify it is gone"
    }

    fn steps(&self) -> &'static [&'static str] {
        &[
            "provision fixtures",
            "find book by title",
            "delete book",
            "get deleted book",
        ]
    }

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let (_, target) =
            provision_shelf_with(ctx, |ctx, category| ctx.fixtures().delete_target(category))
                .await?;

        let books = list_books(ctx).await?;
        let id = find_by_title(&books, "Book", &target.title).and_then(book_id)?;
        ctx.pass("find book by title", format!("id {}", id));

        let path = format!("book/{}", id);
        let response = ctx.client().delete(&path).await?;
        ensure_ok(&response)?;
        ctx.forget(&Teardown::DeleteBook(id.clone()));
        ctx.pass("delete book", "");

        let response = ctx.client().get(&path).await?;
        let mut checks = Checks::new();
        checks.check(
            response.is_absent(),
            format!(
                "Verify get response content should be empty (got '{}')",
                response.body.trim()
            ),
        );
        checks.finish()?;
        ctx.pass("get deleted book", "");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input() -> NewBook {
        NewBook {
            title: "Pride and Prejudice".to_string(),
            author: "Jane Austen".to_string(),
            description: "A beautiful book".to_string(),
            price: 12.8,
            pages: 500,
            category: "c1".to_string(),
        }
    }

    fn response(body: &str) -> ApiResponse {
        ApiResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_first_category_id_accepts_numeric_ids() {
        let listed = response(r#"[{ "_id": 42, "title": "Legacy" }, { "_id": "c2", "title": "x" }]"#);
        assert_eq!(first_category_id(&listed).unwrap(), "42");

        let listed = response(r#"[{ "_id": "c1" }, { "_id": 7 }]"#);
        assert_eq!(first_category_id(&listed).unwrap(), "c1");
    }

    #[test]
    fn test_first_category_id_empty_list() {
        let err = first_category_id(&response("[]")).unwrap_err().to_string();
        assert!(err.contains("Expected at least one category in the response"), "{}", err);
    }

    #[test]
    fn test_category_id_forms() {
        assert_eq!(
            category_id(&json!({ "category": { "_id": "c1", "title": "x" } })).as_deref(),
            Some("c1")
        );
        assert_eq!(category_id(&json!({ "category": "c2" })).as_deref(), Some("c2"));
        assert_eq!(category_id(&json!({ "category": null })), None);
        assert_eq!(category_id(&json!({})), None);
    }

    #[test]
    fn test_round_trip_fields_match() {
        let stored = json!({
            "_id": "b1",
            "title": "Pride and Prejudice",
            "author": "Jane Austen",
            "description": "A beautiful book",
            "price": 12.8,
            "pages": 500,
            "category": { "_id": "c1" }
        });
        let mut checks = Checks::new();
        check_book_fields(&mut checks, &stored, &input());
        assert!(checks.finish().is_ok());
    }

    #[test]
    fn test_round_trip_reports_each_mismatch() {
        let stored = json!({
            "title": "Pride and Prejudice",
            "author": "J. Austen",
            "description": "A beautiful book",
            "price": "12.8",
            "pages": 499
        });
        let mut checks = Checks::new();
        check_book_fields(&mut checks, &stored, &input());
        let message = checks.finish().unwrap_err().to_string();
        assert!(message.contains("Book author should match the input."));
        assert!(message.contains("Book price should match the input."));
        assert!(message.contains("Book pages should match the input."));
        assert!(!message.contains("Book title"));
    }
}
