//! Fingerprint Engine
//!
//! A fingerprint identifies a dependency set, not a manifest file: only the
//! `dependencies` and `devDependencies` mappings contribute, serialized with
//! sorted keys so formatting, key order and unrelated fields never matter.
//! The result doubles as a git tag name.

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::manifest::Manifest;

/// Characters git forbids (or treats specially) in ref names.
const UNSAFE_REF_CHARS: &[char] = &['/', '\\', ' ', '~', '^', ':', '?', '*', '['];

/// Content-addressed identifier of a manifest's dependency sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of `manifest`.
    pub fn compute(manifest: &Manifest) -> Self {
        let canonical = canonical_dependencies(manifest);
        let digest = Sha256::digest(canonical.as_bytes());
        Self(sanitize_ref_name(&STANDARD.encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical JSON of `[dependencies, devDependencies]`, keys sorted.
pub fn canonical_dependencies(manifest: &Manifest) -> String {
    Value::Array(vec![
        to_object(&manifest.dependencies),
        to_object(&manifest.dev_dependencies),
    ])
    .to_string()
}

/// Keys are inserted in sorted order, so the output is canonical whether or
/// not `serde_json` preserves insertion order.
fn to_object(deps: &BTreeMap<String, String>) -> Value {
    let map: Map<String, Value> = deps
        .iter()
        .map(|(name, range)| (name.clone(), Value::String(range.clone())))
        .collect();
    Value::Object(map)
}

/// Replace characters that are illegal in a git tag name with `_`.
pub fn sanitize_ref_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if UNSAFE_REF_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
