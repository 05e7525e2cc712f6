//! Request extractors that run schema validation before handlers.
//!
//! Every rejection becomes `ApiError::InvalidData` carrying the first failed
//! constraint's message, so handlers only ever see well-formed input.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::ApiError;

/// Declared field order of a request schema, used to pick the "first" failure
pub trait FieldOrder {
    const FIELDS: &'static [&'static str];
}

/// JSON body that has been deserialized and validated
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + FieldOrder,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        validate(&value)?;
        Ok(ValidatedJson(value))
    }
}

/// Run `Validate` and convert failures into the API's 400 envelope
pub fn validate<T: Validate + FieldOrder>(value: &T) -> Result<(), ApiError> {
    value
        .validate()
        .map_err(|errors| ApiError::InvalidData(first_message(&errors, T::FIELDS).unwrap_or_default()))
}

/// Message of the first failing field in `order`, then of any other failing field
pub fn first_message(errors: &ValidationErrors, order: &[&str]) -> Option<String> {
    let by_order = order
        .iter()
        .filter_map(|field| errors.errors().get(*field))
        .find_map(kind_message);

    by_order.or_else(|| {
        let mut remaining: Vec<_> = errors.errors().iter().collect();
        remaining.sort_by(|a, b| a.0.cmp(b.0));
        remaining.into_iter().find_map(|(_, kind)| kind_message(kind))
    })
}

fn kind_message(kind: &ValidationErrorsKind) -> Option<String> {
    match kind {
        ValidationErrorsKind::Field(errors) => errors.iter().find_map(|error| {
            error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .or_else(|| Some(error.code.to_string()))
        }),
        ValidationErrorsKind::Struct(nested) => first_message(nested, &[]),
        ValidationErrorsKind::List(items) => items
            .values()
            .find_map(|nested| first_message(nested, &[])),
    }
}
