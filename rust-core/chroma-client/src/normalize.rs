// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Normalization of remote response shapes.
//!
//! Different server versions answer listing and record requests with
//! different JSON layouts. Every shape-sniffing decision lives in this module,
//! one function per entity kind:
//!
//! - names (tenants, databases): a bare array of strings, an array of
//!   `{name}` / `{id}` objects, or an object wrapping either under a named key.
//! - collections: the same three shapes, producing [`CollectionSummary`].
//! - records: parallel `ids` / `documents` / `metadatas` / `embeddings`
//!   arrays, either at the root or under a `data` wrapper, zipped by index.

use serde_json::Value;

use crate::types::{embedding_or_placeholder, CollectionSummary, Metadata, Record};

/// Render a scalar JSON value as a string (strings verbatim, numbers printed).
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Items of a listing: the array itself, or the array under `wrapper`.
fn listing_items<'a>(value: &'a Value, wrapper: &str) -> &'a [Value] {
    if let Some(items) = value.as_array() {
        return items;
    }
    value
        .get(wrapper)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Normalize a tenant or database listing into names.
///
/// `wrapper` is the key the array may be nested under (`"tenants"`,
/// `"databases"`). Items without a usable name are skipped.
pub fn names(value: &Value, wrapper: &str) -> Vec<String> {
    listing_items(value, wrapper)
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => obj
                .get("name")
                .and_then(scalar_string)
                .or_else(|| obj.get("id").and_then(scalar_string)),
            other => scalar_string(other),
        })
        .collect()
}

/// Normalize a collection listing into summaries.
///
/// A bare string item becomes both id and name. Objects use `id` falling back
/// to `name` and vice versa; `count` defaults to 0.
pub fn collections(value: &Value) -> Vec<CollectionSummary> {
    listing_items(value, "collections")
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => {
                let id = obj.get("id").and_then(scalar_string);
                let name = obj.get("name").and_then(scalar_string);
                let (id, name) = match (id, name) {
                    (Some(id), Some(name)) => (id, name),
                    (Some(id), None) => (id.clone(), id),
                    (None, Some(name)) => (name.clone(), name),
                    (None, None) => return None,
                };
                let count = obj.get("count").and_then(Value::as_u64).unwrap_or(0);
                Some(CollectionSummary { id, name, count })
            }
            other => scalar_string(other).map(|s| CollectionSummary {
                id: s.clone(),
                name: s,
                count: 0,
            }),
        })
        .collect()
}

/// Find the server id for `wanted` among `listing`.
///
/// Case-sensitive. An id match anywhere in the listing wins over a name
/// match, so resolving an already-resolved id returns it unchanged.
pub fn find_collection_id(listing: &[CollectionSummary], wanted: &str) -> Option<String> {
    listing
        .iter()
        .find(|c| c.id == wanted)
        .or_else(|| listing.iter().find(|c| c.name == wanted))
        .map(|c| c.id.clone())
}

/// A parallel array of a record response, at the root or under `data`.
fn record_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .or_else(|| value.get("data").and_then(|d| d.get(key)).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn embedding_from(value: Option<&Value>) -> Vec<f32> {
    let values = value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_f64)
            .map(|v| v as f32)
            .collect::<Vec<f32>>()
    });
    embedding_or_placeholder(values)
}

/// Normalize a record response into records, one per entry of `ids`.
///
/// Missing documents become `None`, missing metadata an empty map, and
/// missing embeddings the single-zero placeholder.
pub fn records(value: &Value) -> Vec<Record> {
    let ids = record_field(value, "ids");
    let documents = record_field(value, "documents");
    let metadatas = record_field(value, "metadatas");
    let embeddings = record_field(value, "embeddings");

    ids.iter()
        .enumerate()
        .filter_map(|(i, id)| {
            let id = scalar_string(id)?;
            let document = documents.get(i).and_then(Value::as_str).map(str::to_owned);
            let metadata = metadatas
                .get(i)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_else(Metadata::new);
            let embedding = embedding_from(embeddings.get(i));
            Some(Record {
                id,
                document,
                metadata,
                embedding,
            })
        })
        .collect()
}

/// The first record of a record response, if any.
pub fn first_record(value: &Value) -> Option<Record> {
    records(value).into_iter().next()
}
