//! Async client for the mobierp ERP REST backend.
//!
//! Every resource lives under `/api/<resource>` and supports the same five
//! verbs: list, get, create, update, delete. Collection reads accept
//! relation expansion (`include`), ordering (`orderBy`) and equality
//! filters (`where`) as JSON-encoded query parameters; see [`ListQuery`].
//!
//! Responses arrive either bare or wrapped in `{ "data": ... }`. The
//! [`envelope`] module is the single place that shape difference is
//! resolved, so callers always see a plain collection or object.

pub mod client;
pub mod envelope;
pub mod error;
pub mod query;
pub mod transport;

pub use client::ApiClient;
pub use envelope::{normalize_collection, normalize_object};
pub use error::Error;
pub use query::{Include, ListQuery, SortOrder};
pub use transport::{TlsMode, TransportConfig};
