//! In-memory document store.
//!
//! # Overview
//! A `Store` holds named `Collection`s, each an unindexed set of JSON
//! entities identified by a generated `key`. Nothing is persisted; a store
//! lives as long as the last handle to it.
//!
//! # Design
//! - `create()` returns an empty store; `Store::collection` creates
//!   collections lazily and hands out shared handles.
//! - Collections serialize their own mutations, so handles can be cloned
//!   into concurrent request handlers.
//! - No operation fails: missing keys surface as `None` / `false`, and
//!   validation of field contents belongs to the caller.

pub mod collection;
pub mod entity;
pub mod store;

pub use collection::Collection;
pub use entity::{Document, Entity, FindResult, KEY_FIELD};
pub use store::{create, Store};
