//! Generic create/update/delete/fetch adapter shared by every stack resource.
//!
//! Each resource travels in a singular (`{"webhook": {...}}`) or plural
//! (`{"webhooks": [...]}`) envelope. A [`Resource`] names those keys; a
//! [`ResourceApi`] binds a resource to a stack session and a collection path.

use std::fmt::{self, Display};
use std::marker::PhantomData;

use contentstack_core::query::QueryParams;
use contentstack_core::uid::validate_segment;
use contentstack_core::{Error, RequestDescriptor, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::stack::StackSession;

/// A resource addressable under a stack.
pub trait Resource: DeserializeOwned {
    /// Identifier used in item paths.
    type Id: Display;

    /// Payload sent on create and update.
    type Input: Serialize;

    /// Envelope key for a single item.
    const SINGULAR: &'static str;

    /// Envelope key for a list of items.
    const PLURAL: &'static str;

    /// Extra query parameters derived from an input payload.
    fn input_query(_input: &Self::Input) -> QueryParams {
        QueryParams::new()
    }
}

/// CRUD operations for one resource kind within a stack.
pub struct ResourceApi<'s, R> {
    session: &'s StackSession,
    collection: String,
    query: QueryParams,
    _resource: PhantomData<fn() -> R>,
}

impl<R> fmt::Debug for ResourceApi<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceApi")
            .field("collection", &self.collection)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl<'s, R> ResourceApi<'s, R>
where
    R: Resource,
{
    pub(crate) fn new(session: &'s StackSession, collection: impl Into<String>) -> Self {
        Self {
            session,
            collection: collection.into(),
            query: QueryParams::new(),
            _resource: PhantomData,
        }
    }

    /// Add a query parameter sent with every call made through this adapter.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl Display) -> Self {
        self.query.push(key, value);
        self
    }

    /// Path of the collection, relative to the base address.
    #[must_use]
    pub fn collection_path(&self) -> &str {
        &self.collection
    }

    /// Path of a single item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `id` is empty or contains a reserved
    /// path character.
    pub fn item_path(&self, id: &R::Id) -> Result<String> {
        let id = id.to_string();
        validate_segment(&id)?;
        Ok(format!("{}/{id}", self.collection))
    }

    /// Create a new item (`POST` to the collection).
    ///
    /// # Errors
    ///
    /// Returns the first pipeline error: encoding, transport, or classification.
    pub async fn create(&self, input: &R::Input) -> Result<R> {
        let descriptor = RequestDescriptor::post(self.collection.as_str())
            .with_query(self.query_for(input))
            .with_json(&wrap::<R::Input>(R::SINGULAR, input)?)?;
        self.fetch_single(descriptor).await
    }

    /// Replace an existing item (`PUT` to the item path).
    ///
    /// # Errors
    ///
    /// Returns the first pipeline error: encoding, transport, or classification.
    pub async fn update(&self, id: &R::Id, input: &R::Input) -> Result<R> {
        let descriptor = RequestDescriptor::put(self.item_path(id)?)
            .with_query(self.query_for(input))
            .with_json(&wrap::<R::Input>(R::SINGULAR, input)?)?;
        self.fetch_single(descriptor).await
    }

    /// Delete an item. The response body is checked for errors and discarded.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline error: transport or classification.
    pub async fn delete(&self, id: &R::Id) -> Result<()> {
        let descriptor =
            RequestDescriptor::delete(self.item_path(id)?).with_query(self.query.clone());
        let _ack: Map<String, Value> = self.session.execute(descriptor).await?;
        Ok(())
    }

    /// Fetch a single item.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline error, or [`Error::Decode`] if the response
    /// lacks the singular envelope.
    pub async fn fetch(&self, id: &R::Id) -> Result<R> {
        let descriptor =
            RequestDescriptor::get(self.item_path(id)?).with_query(self.query.clone());
        self.fetch_single(descriptor).await
    }

    /// Fetch every item in the collection, in server order.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline error, or [`Error::Decode`] if the response
    /// lacks the plural envelope.
    pub async fn fetch_all(&self) -> Result<Vec<R>> {
        let descriptor =
            RequestDescriptor::get(self.collection.as_str()).with_query(self.query.clone());
        let body: Map<String, Value> = self.session.execute(descriptor).await?;
        unwrap_envelope(body, R::PLURAL)
    }

    async fn fetch_single(&self, descriptor: RequestDescriptor) -> Result<R> {
        let body: Map<String, Value> = self.session.execute(descriptor).await?;
        unwrap_envelope(body, R::SINGULAR)
    }

    fn query_for(&self, input: &R::Input) -> QueryParams {
        let mut query = self.query.clone();
        query.merge(&R::input_query(input));
        query
    }
}

/// Wrap `payload` in a single-key envelope.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the payload cannot be serialized.
pub fn wrap<T>(key: &str, payload: &T) -> Result<Map<String, Value>>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(payload).map_err(|err| Error::Encode(err.to_string()))?;
    let mut envelope = Map::new();
    envelope.insert(key.to_string(), value);
    Ok(envelope)
}

/// Take `key` out of a decoded envelope and decode it into `T`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the key is absent or its value has the wrong shape.
pub fn unwrap_envelope<T>(mut body: Map<String, Value>, key: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = body
        .remove(key)
        .ok_or_else(|| Error::Decode(format!("response is missing the `{key}` envelope")))?;
    serde_json::from_value(value)
        .map_err(|err| Error::Decode(format!("Failed to decode `{key}`: {err}")))
}
