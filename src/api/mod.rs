//! Catalog service access: HTTP client, authentication and wire types

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{authenticate, provider_for, AuthProvider, LoginAuth, StaticToken};
pub use client::{ApiResponse, CatalogClient};
pub use types::{BookCategory, BookPatch, Category, NewBook, NewCategory};
