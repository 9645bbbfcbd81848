//! Jar manifest model: ordered `Key: Value` attributes.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a jar build gets its caller-supplied manifest attributes from.
///
/// A jar built with no directive at all still gets a synthesized minimal
/// manifest;
/// a jar without *some* manifest is never produced.
#[derive(Debug, Clone)]
pub enum ManifestSpec {
    /// An externally supplied manifest file, parsed as `Key: Value` lines.
    File(PathBuf),
    /// A flat attribute map.
    Attributes(BTreeMap<String, String>),
}

/// Build-time identity stamped into every manifest.
///
/// These always win over caller-supplied values for their keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JarIdentity {
    pub implementation_version: String,
    pub implementation_vendor: String,
}

/// An ordered attribute block. Attribute order is observable in the rendered
/// manifest, so upserts keep the first-written position.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    /// Replace an existing attribute's value in place, or append it.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// `Key: Value` lines with the terminating blank line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.attributes {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out
    }

    fn parse(text: &str, origin: &std::path::Path) -> Result<Self> {
        let mut manifest = Manifest::default();
        for line in text.lines() {
            if line.trim().is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                return Err(Error::config(format!(
                    "manifest '{}' has a malformed line: '{}'",
                    origin.display(),
                    line
                )));
            };
            manifest.set(name.trim(), value.trim());
        }
        Ok(manifest)
    }
}

/// Merge the caller-supplied attributes (if any) under the builder's own
/// identity attributes.
///
/// The result always starts with `Manifest-Version`, and
/// `Implementation-Version`/`Implementation-Vendor` are written last so they
/// overwrite caller-supplied values for those keys.
pub(crate) fn build_manifest(
    spec: Option<&ManifestSpec>,
    identity: &JarIdentity,
) -> Result<Manifest> {
    let mut manifest = Manifest::default();
    manifest.set("Manifest-Version", "1.0");

    match spec {
        Some(ManifestSpec::File(path)) => {
            let text = fs::read_to_string(path).map_err(Error::io(path))?;
            for (name, value) in Manifest::parse(&text, path)?.attributes {
                manifest.set(name, value);
            }
        }
        Some(ManifestSpec::Attributes(attrs)) => {
            for (name, value) in attrs {
                manifest.set(name.clone(), value.clone());
            }
        }
        None => {}
    }

    manifest.set("Manifest-Version", "1.0");
    manifest.set(
        "Implementation-Version",
        identity.implementation_version.clone(),
    );
    manifest.set(
        "Implementation-Vendor",
        identity.implementation_vendor.clone(),
    );
    Ok(manifest)
}
