//! Per-request state handed to providers.

use super::Error;
use crate::render::locale_from_request;
use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{header::CONTENT_TYPE, request::Parts, Request},
};
use std::collections::HashMap;

/// Largest form body accepted by [`Context::parse_form`].
pub const MAX_FORM_BYTES: usize = 10 << 20;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const FORM_MULTIPART: &str = "multipart/form-data";

/// Parsed form values. Missing keys read as an empty string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Form(HashMap<String, Vec<String>>);

impl Form {
    /// First value for `key`, or `""`.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.0.get(key).map_or(&[], Vec::as_slice)
    }

    fn push(&mut self, key: String, value: String) {
        self.0.entry(key).or_default().push(value);
    }

    fn extend_urlencoded(&mut self, input: &[u8]) {
        for (key, value) in url::form_urlencoded::parse(input) {
            self.push(key.into_owned(), value.into_owned());
        }
    }
}

#[derive(Debug)]
pub struct Context {
    parts: Parts,
    body: Option<Body>,
    form: Option<Form>,
}

impl Context {
    #[must_use]
    pub fn new(request: Request<Body>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            body: Some(body),
            form: None,
        }
    }

    #[must_use]
    pub const fn parts(&self) -> &Parts {
        &self.parts
    }

    #[must_use]
    pub fn locale(&self) -> String {
        locale_from_request(&self.parts)
    }

    /// Parse and cache the request form.
    ///
    /// URL-encoded or multipart body values come first, followed by query
    /// string values. Multipart file parts are skipped. Other content types
    /// only contribute the query string.
    ///
    /// # Errors
    /// Returns [`Error::Body`] if the body cannot be read and
    /// [`Error::InvalidForm`] if a multipart body is malformed.
    pub async fn parse_form(&mut self) -> Result<&Form, Error> {
        if self.form.is_none() {
            let mut form = Form::default();

            if let Some(body) = self.body.take() {
                match content_type(&self.parts).as_deref() {
                    Some(FORM_URLENCODED) => {
                        let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
                            .await
                            .map_err(Error::Body)?;
                        form.extend_urlencoded(&bytes);
                    }
                    Some(FORM_MULTIPART) => {
                        let request = self.multipart_request(body);
                        read_multipart(request, &mut form).await?;
                    }
                    _ => {}
                }
            }

            if let Some(query) = self.parts.uri.query() {
                form.extend_urlencoded(query.as_bytes());
            }

            self.form = Some(form);
        }

        Ok(self.form.get_or_insert_with(Form::default))
    }

    fn multipart_request(&self, body: Body) -> Request<Body> {
        let mut request = Request::new(body);
        if let Some(value) = self.parts.headers.get(CONTENT_TYPE) {
            request.headers_mut().insert(CONTENT_TYPE, value.clone());
        }
        *request.extensions_mut() = self.parts.extensions.clone();
        request
    }
}

async fn read_multipart(request: Request<Body>, form: &mut Form) -> Result<(), Error> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| Error::InvalidForm(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidForm(e.body_text()))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| Error::InvalidForm(e.body_text()))?;
        form.push(name, value);
    }

    Ok(())
}

/// Lowercased media type of the request, without parameters.
fn content_type(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
}
