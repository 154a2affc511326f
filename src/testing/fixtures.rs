//! Test data for the scenarios
//!
//! Scenarios never hard-code titles: they ask the factory, which appends a
//! per-run tag so lookups by exact title only ever match data this run
//! created. The defaults can be overridden from a YAML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{BookPatch, NewBook};
use crate::common::paths::fixtures_path;
use crate::common::{Error, Result};

/// Raw fixture values, all overridable
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FixtureData {
    pub category: CategoryFixture,
    /// Book created, looked up by title, and checked by author
    pub lookup: BookFixture,
    /// Book created with a category reference and read back
    pub new_book: BookFixture,
    /// Book looked up by title and then renamed
    pub update: UpdateFixture,
    /// Book looked up by title and then deleted
    pub delete: BookFixture,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryFixture {
    pub title: String,
    pub updated_title: String,
    /// Category provisioned for book scenarios
    pub shelf_title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BookFixture {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: f64,
    pub pages: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdateFixture {
    pub book: BookFixture,
    pub new_title: String,
    pub new_author: String,
}

impl Default for FixtureData {
    fn default() -> Self {
        Self {
            category: CategoryFixture::default(),
            lookup: BookFixture {
                title: "The Great Gatsby".to_string(),
                author: "F. Scott Fitzgerald".to_string(),
                ..BookFixture::default()
            },
            new_book: BookFixture {
                title: "Pride and Prejudice".to_string(),
                author: "Jane Austen".to_string(),
                description: "A beautiful book".to_string(),
                price: 12.80,
                pages: 500,
            },
            update: UpdateFixture::default(),
            delete: BookFixture {
                title: "To Kill a Mockingbird".to_string(),
                author: "Harper Lee".to_string(),
                ..BookFixture::default()
            },
        }
    }
}

impl Default for CategoryFixture {
    fn default() -> Self {
        Self {
            title: "Fictional Literature".to_string(),
            updated_title: "Updated Fictional Literature".to_string(),
            shelf_title: "Classics".to_string(),
        }
    }
}

impl Default for BookFixture {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            author: "Anonymous".to_string(),
            description: "A book provisioned by the catalog test suite".to_string(),
            price: 9.99,
            pages: 250,
        }
    }
}

impl Default for UpdateFixture {
    fn default() -> Self {
        Self {
            book: BookFixture {
                title: "The Catcher in the Rye".to_string(),
                author: "J. D. Salinger".to_string(),
                ..BookFixture::default()
            },
            new_title: "The Catcher in the Rye 2".to_string(),
            new_author: "J. David Salinger".to_string(),
        }
    }
}

impl FixtureData {
    /// Load overrides from a YAML file
    ///
    /// An explicit path must exist. Without one, the default fixtures file is
    /// used when present, otherwise built-in values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match fixtures_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse fixtures: {}", e)))
    }
}

/// Hands out the concrete values a scenario sends
#[derive(Debug, Clone)]
pub struct FixtureFactory {
    data: FixtureData,
    run_tag: Option<String>,
}

impl FixtureFactory {
    /// Factory with a fresh random run tag
    pub fn new(data: FixtureData) -> Self {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        Self::with_tag(data, Some(tag[..8].to_string()))
    }

    /// Factory with a fixed tag, or none for literal titles
    pub fn with_tag(data: FixtureData, run_tag: Option<String>) -> Self {
        Self { data, run_tag }
    }

    pub fn run_tag(&self) -> Option<&str> {
        self.run_tag.as_deref()
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    /// Append the run tag to a title
    pub fn tagged(&self, title: &str) -> String {
        match &self.run_tag {
            Some(tag) => format!("{} [{}]", title, tag),
            None => title.to_string(),
        }
    }

    pub fn category_title(&self) -> String {
        self.tagged(&self.data.category.title)
    }

    pub fn updated_category_title(&self) -> String {
        self.tagged(&self.data.category.updated_title)
    }

    pub fn shelf_title(&self) -> String {
        self.tagged(&self.data.category.shelf_title)
    }

    pub fn lookup_book(&self, category: &str) -> NewBook {
        self.book(&self.data.lookup, category)
    }

    pub fn new_book(&self, category: &str) -> NewBook {
        self.book(&self.data.new_book, category)
    }

    pub fn update_target(&self, category: &str) -> NewBook {
        self.book(&self.data.update.book, category)
    }

    /// Title and author replacement for the update target
    pub fn update_patch(&self) -> BookPatch {
        BookPatch {
            title: Some(self.tagged(&self.data.update.new_title)),
            author: Some(self.data.update.new_author.clone()),
            ..BookPatch::default()
        }
    }

    pub fn delete_target(&self, category: &str) -> NewBook {
        self.book(&self.data.delete, category)
    }

    fn book(&self, fixture: &BookFixture, category: &str) -> NewBook {
        NewBook {
            title: self.tagged(&fixture.title),
            author: fixture.author.clone(),
            description: fixture.description.clone(),
            price: fixture.price,
            pages: fixture.pages,
            category: category.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_factory_uses_literal_titles() {
        let factory = FixtureFactory::with_tag(FixtureData::default(), None);
        assert_eq!(factory.category_title(), "Fictional Literature");
        assert_eq!(factory.updated_category_title(), "Updated Fictional Literature");

        let book = factory.new_book("c1");
        assert_eq!(book.title, "Pride and Prejudice");
        assert_eq!(book.author, "Jane Austen");
        assert_eq!(book.description, "A beautiful book");
        assert_eq!(book.price, 12.80);
        assert_eq!(book.pages, 500);
        assert_eq!(book.category, "c1");

        assert_eq!(factory.lookup_book("c1").author, "F. Scott Fitzgerald");
    }

    #[test]
    fn test_run_tag_applied_to_every_title() {
        let factory = FixtureFactory::with_tag(FixtureData::default(), Some("ab12cd34".to_string()));
        assert_eq!(factory.category_title(), "Fictional Literature [ab12cd34]");
        assert_eq!(factory.delete_target("c").title, "To Kill a Mockingbird [ab12cd34]");

        let patch = factory.update_patch();
        assert_eq!(patch.title.as_deref(), Some("The Catcher in the Rye 2 [ab12cd34]"));
        assert_eq!(patch.author.as_deref(), Some("J. David Salinger"));
        assert!(patch.description.is_none());
    }

    #[test]
    fn test_random_tags_differ() {
        let a = FixtureFactory::new(FixtureData::default());
        let b = FixtureFactory::new(FixtureData::default());
        assert_eq!(a.run_tag().map(str::len), Some(8));
        assert_ne!(a.run_tag(), b.run_tag());
    }

    #[test]
    fn test_yaml_overrides_merge_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.yaml");
        std::fs::write(
            &path,
            "category:\n  title: Poetry\nupdate:\n  book:\n    title: Dune\n  new_title: Dune Messiah\n",
        )
        .unwrap();

        let data = FixtureData::load(Some(&path)).unwrap();
        assert_eq!(data.category.title, "Poetry");
        assert_eq!(data.category.updated_title, "Updated Fictional Literature");
        assert_eq!(data.update.book.title, "Dune");
        assert_eq!(data.update.new_title, "Dune Messiah");
        assert_eq!(data.update.new_author, "J. David Salinger");
        assert_eq!(data.new_book.author, "Jane Austen");
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.yaml");
        std::fs::write(&path, "category: [unterminated").unwrap();
        assert!(matches!(FixtureData::from_file(&path), Err(Error::Config(_))));
    }
}
