//! Object-typed read facade for callers that only know an entity at runtime.

use crate::model::entity::Entity;
use crate::model::search::{PagingInfo, SearchObject};
use crate::model::traits::{EntityTraits, KeyOf};
use crate::repo::contract::EntityReadService;
use crate::repo::error::{RepoError, RepoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

/// A concrete, serializable search object behind a trait object.
pub trait TypedSearch: Any {
    fn as_any(&self) -> &dyn Any;

    fn to_json_value(&self) -> serde_json::Result<JsonValue>;

    fn search_type_name(&self) -> &'static str;
}

impl<S: Any + Serialize> TypedSearch for S {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_json_value(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self)
    }

    fn search_type_name(&self) -> &'static str {
        type_name::<S>()
    }
}

/// Search criteria handed over without a static type.
pub enum SearchInput<'a> {
    /// A concrete search object, used as is when it is the bundle's own type
    /// and coerced field by field otherwise.
    Typed(&'a dyn TypedSearch),
    /// A JSON document deserialized into the bundle's search object.
    Json(JsonValue),
}

impl fmt::Debug for SearchInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(value) => f
                .debug_tuple("Typed")
                .field(&value.search_type_name())
                .finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

/// Converts untyped criteria into the search object `S`.
///
/// A typed value of another type goes through its JSON form, so shared
/// fields such as the base id criteria carry over. JSON `null` means "no
/// criteria". Anything not convertible to `S` fails with
/// [`RepoError::TypeMismatch`].
pub fn convert_search_object<S>(
    entity: &'static str,
    input: SearchInput<'_>,
) -> RepoResult<Option<S>>
where
    S: SearchObject + DeserializeOwned,
{
    match input {
        SearchInput::Typed(value) => {
            if let Some(so) = value.as_any().downcast_ref::<S>() {
                return Ok(Some(so.clone()));
            }
            let json = value
                .to_json_value()
                .map_err(|err| mismatch::<S>(entity, value.search_type_name(), err))?;
            serde_json::from_value(json)
                .map(Some)
                .map_err(|err| mismatch::<S>(entity, value.search_type_name(), err))
        }
        SearchInput::Json(JsonValue::Null) => Ok(None),
        SearchInput::Json(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|err| RepoError::TypeMismatch {
                entity,
                message: err.to_string(),
            }),
    }
}

fn mismatch<S>(entity: &'static str, source: &str, err: serde_json::Error) -> RepoError {
    RepoError::TypeMismatch {
        entity,
        message: format!("cannot convert `{source}` into `{}`: {err}", type_name::<S>()),
    }
}

/// Entity-agnostic read contract; entities travel as JSON values.
pub trait ErasedReadService {
    fn entity_name(&self) -> &'static str;

    fn details_value(&self, id: &JsonValue) -> RepoResult<Option<JsonValue>>;

    fn list_value(
        &self,
        so: Option<SearchInput<'_>>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<JsonValue>>;

    fn count_value(&self, so: Option<SearchInput<'_>>) -> RepoResult<u64>;
}

/// Adapter exposing a typed read service through [`ErasedReadService`].
pub struct ErasedRead<T, R> {
    inner: R,
    _bundle: PhantomData<fn() -> T>,
}

impl<T, R> ErasedRead<T, R>
where
    T: EntityTraits,
    R: EntityReadService<T>,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            _bundle: PhantomData,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn search_object(&self, so: Option<SearchInput<'_>>) -> RepoResult<Option<T::SearchObject>>
    where
        T::SearchObject: DeserializeOwned,
    {
        match so {
            Some(input) => convert_search_object(T::Entity::TABLE, input),
            None => Ok(None),
        }
    }
}

impl<T, R> ErasedReadService for ErasedRead<T, R>
where
    T: EntityTraits,
    T::Entity: Serialize,
    T::SearchObject: DeserializeOwned,
    R: EntityReadService<T>,
{
    fn entity_name(&self) -> &'static str {
        T::Entity::TABLE
    }

    fn details_value(&self, id: &JsonValue) -> RepoResult<Option<JsonValue>> {
        let key: KeyOf<T> =
            serde_json::from_value(id.clone()).map_err(|err| RepoError::TypeMismatch {
                entity: T::Entity::TABLE,
                message: format!("invalid key: {err}"),
            })?;
        self.inner.details(key)?.as_ref().map(to_json).transpose()
    }

    fn list_value(
        &self,
        so: Option<SearchInput<'_>>,
        paging: Option<&PagingInfo>,
    ) -> RepoResult<Vec<JsonValue>> {
        let so = self.search_object(so)?;
        self.inner
            .list(so.as_ref(), paging)?
            .iter()
            .map(to_json)
            .collect()
    }

    fn count_value(&self, so: Option<SearchInput<'_>>) -> RepoResult<u64> {
        let so = self.search_object(so)?;
        self.inner.count(so.as_ref())
    }
}

fn to_json<E: Serialize>(entity: &E) -> RepoResult<JsonValue> {
    serde_json::to_value(entity).map_err(|err| RepoError::InvalidData(err.to_string()))
}
