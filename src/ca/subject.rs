//! Distinguished names for generated authorities.

use std::fmt;

use openssl::error::ErrorStack;
use openssl::x509::{X509Name, X509NameRef};

use crate::errors::{Error, Result};

/// Ordered `(field, value)` pairs of a certificate subject.
///
/// Field names are OpenSSL short names (`C`, `ST`, `L`, `O`, `OU`, `CN`) or
/// anything else `X509NameBuilder::append_entry_by_text` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaSubject {
    entries: Vec<(String, String)>,
}

impl CaSubject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((field.into(), value.into()));
        self
    }

    /// Parse the OpenSSL one-line form, e.g. `/C=US/O=Example/CN=Root CA`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty subject or a component without
    /// `=` or with an empty field name.
    pub fn parse(input: &str) -> Result<Self> {
        let mut subject = Self::new();
        for component in input.trim().split('/').filter(|c| !c.trim().is_empty()) {
            let (field, value) = component.split_once('=').ok_or_else(|| {
                Error::config(format!("Subject component '{}' is not FIELD=VALUE", component))
            })?;
            let field = field.trim();
            if field.is_empty() {
                return Err(Error::config(format!(
                    "Subject component '{}' has an empty field name",
                    component
                )));
            }
            subject.entries.push((field.to_string(), value.trim().to_string()));
        }

        if subject.entries.is_empty() {
            return Err(Error::config("Subject must contain at least one component"));
        }
        Ok(subject)
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of the first entry named `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.iter().find(|(f, _)| f == field).map(|(_, v)| v.as_str())
    }

    pub(crate) fn to_x509_name(&self) -> std::result::Result<X509Name, ErrorStack> {
        let mut builder = X509Name::builder()?;
        for (field, value) in &self.entries {
            builder.append_entry_by_text(field, value)?;
        }
        Ok(builder.build())
    }
}

impl fmt::Display for CaSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in &self.entries {
            write!(f, "/{}={}", field, value)?;
        }
        Ok(())
    }
}

/// Render an X.509 name in the same one-line form as [`CaSubject`].
pub(crate) fn format_name(name: &X509NameRef) -> String {
    let mut out = String::new();
    for entry in name.entries() {
        let field = entry.object().nid().short_name().unwrap_or("UNKNOWN");
        let value = entry
            .data()
            .as_utf8()
            .map(|v| v.to_string())
            .unwrap_or_else(|_| String::from("<binary>"));
        out.push('/');
        out.push_str(field);
        out.push('=');
        out.push_str(&value);
    }
    out
}
