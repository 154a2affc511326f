//! In-memory stand-in for the catalog service
//!
//! `FakeCatalog` is a stateful wiremock responder implementing the category
//! and book endpoints under `/api`. Behavior switches simulate a broken
//! service so failing scenarios can be exercised.

use std::sync::{Arc, Mutex, MutexGuard};

use catalog_e2e::api::CatalogClient;
use catalog_e2e::common::config::ServiceConfig;
use serde_json::{json, Map, Value};
use wiremock::matchers::{any, body_json, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const EMAIL: &str = "john.doe@example.com";
pub const PASSWORD: &str = "password123";

#[derive(Debug, Default)]
pub struct State {
    pub categories: Vec<Value>,
    pub books: Vec<Value>,
    pub next_id: u64,
    /// "METHOD /path" of every catalog request, in arrival order
    pub history: Vec<String>,
}

/// Switches for simulated service defects
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    /// DELETE answers 200 but keeps the entity
    pub ignore_deletes: bool,
    /// PUT answers 200 with the unchanged entity
    pub ignore_updates: bool,
    /// PUT on a book replaces the whole document with the request body
    pub replace_on_update: bool,
    /// Stored titles get a suffix, so exact-title lookups miss
    pub mangle_titles: bool,
    /// DELETE answers 500 and keeps the entity
    pub fail_deletes: bool,
}

#[derive(Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<State>>,
    faults: Faults,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self {
            state: Arc::default(),
            faults,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Insert a book directly, bypassing validation
    pub fn seed_book(&self, book: Value) {
        let mut state = self.state();
        let id = state.fresh_id("b");
        let mut book = book;
        book["_id"] = json!(id);
        state.books.push(book);
    }

    /// Start a server with this catalog mounted and a login endpoint issuing [`TOKEN`]
    pub async fn serve(&self) -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .and(body_json(json!({ "email": EMAIL, "password": PASSWORD })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": TOKEN })))
            .mount(&server)
            .await;

        Mock::given(path_regex(r"^/api/(book|category)(/[^/]+)?$"))
            .respond_with(self.clone())
            .mount(&server)
            .await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        server
    }
}

/// Client pointed at the fake server's `/api` root
pub fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&ServiceConfig {
        base_url: format!("{}/api", server.uri()),
        request_timeout_secs: Some(10),
    })
    .unwrap()
}

impl State {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{:04}", prefix, self.next_id)
    }

    fn category(&self, id: &str) -> Option<&Value> {
        self.categories.iter().find(|c| c["_id"] == id)
    }

    /// Book as served: category id resolved to the embedded category
    fn resolve(&self, book: &Value) -> Value {
        let mut book = book.clone();
        if let Some(id) = book.get("category").and_then(Value::as_str) {
            book["category"] = self.category(id).cloned().unwrap_or(Value::Null);
        }
        book
    }
}

fn json(status: u16, body: &Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body.clone())
}

fn null() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string("null")
}

impl Respond for FakeCatalog {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let verb = request.method.as_str().to_string();
        let url_path = request.url.path().to_string();
        let mut state = self.state();
        state.history.push(format!("{} {}", verb, url_path));

        if verb != "GET" {
            let authorized = request
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some(format!("Bearer {}", TOKEN).as_str());
            if !authorized {
                return json(401, &json!({ "message": "Unauthorized" }));
            }
        }

        let body: Map<String, Value> = serde_json::from_slice(&request.body).unwrap_or_default();
        let segments: Vec<&str> = url_path
            .trim_start_matches("/api/")
            .split('/')
            .collect();

        match (verb.as_str(), segments.as_slice()) {
            ("GET", ["category"]) => json(200, &Value::Array(state.categories.clone())),
            ("POST", ["category"]) => {
                let id = state.fresh_id("c");
                let category = json!({ "_id": id, "title": self.stored_title(&body) });
                state.categories.push(category.clone());
                json(200, &category)
            }
            ("GET", ["category", id]) => match state.category(id) {
                Some(category) => json(200, category),
                None => null(),
            },
            ("PUT", ["category", id]) => {
                let ignore = self.faults.ignore_updates;
                match state.categories.iter_mut().find(|c| c["_id"] == *id) {
                    Some(category) => {
                        if !ignore {
                            category["title"] = body.get("title").cloned().unwrap_or(Value::Null);
                        }
                        json(200, category)
                    }
                    None => null(),
                }
            }
            ("DELETE", ["category", id]) => self.delete(&mut state.categories, id),

            ("GET", ["book"]) => {
                let books: Vec<Value> = state.books.iter().map(|b| state.resolve(b)).collect();
                json(200, &Value::Array(books))
            }
            ("POST", ["book"]) => {
                let id = state.fresh_id("b");
                let mut book = Value::Object(body.clone());
                book["_id"] = json!(id);
                book["title"] = self.stored_title(&body);
                state.books.push(book.clone());
                json(200, &book)
            }
            ("GET", ["book", id]) => match state.books.iter().find(|b| b["_id"] == *id) {
                Some(book) => json(200, &state.resolve(book)),
                None => null(),
            },
            ("PUT", ["book", id]) => {
                let faults = self.faults;
                let Some(index) = state.books.iter().position(|b| b["_id"] == *id) else {
                    return null();
                };
                if faults.replace_on_update {
                    let mut replaced = Value::Object(body.clone());
                    replaced["_id"] = json!(id);
                    state.books[index] = replaced;
                } else if !faults.ignore_updates {
                    for (key, value) in &body {
                        state.books[index][key] = value.clone();
                    }
                }
                let book = state.books[index].clone();
                json(200, &state.resolve(&book))
            }
            ("DELETE", ["book", id]) => self.delete(&mut state.books, id),

            _ => ResponseTemplate::new(404),
        }
    }
}

impl FakeCatalog {
    fn stored_title(&self, body: &Map<String, Value>) -> Value {
        let title = body.get("title").and_then(Value::as_str).unwrap_or_default();
        if self.faults.mangle_titles {
            json!(format!("{} (copy)", title))
        } else {
            json!(title)
        }
    }

    fn delete(&self, items: &mut Vec<Value>, id: &str) -> ResponseTemplate {
        match items.iter().position(|item| item["_id"] == id) {
            Some(_) if self.faults.fail_deletes => {
                json(500, &json!({ "message": "Internal Server Error" }))
            }
            Some(index) if self.faults.ignore_deletes => json(200, &items[index]),
            Some(index) => json(200, &items.remove(index)),
            None => null(),
        }
    }
}
