//! Scan-origin metadata: flat class entries produced by an external
//! static scanner over compiled artifacts.
//!
//! Type occurrences arrive as JVM signature descriptor strings (see
//! [`super::descriptor`]) and stay unresolved until a model asks for
//! them. Entries are serde-deserializable so a scanner's JSON dump can be
//! loaded wholesale with [`ScanUniverse::from_json`]. Scan input is
//! untrusted; names are validated on the way in.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{PrismError, PrismResult};

use super::{ClassKind, Modifiers};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

static QUALIFIED_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap()
});

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A scanned class entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanClass {
    /// Fully-qualified name.
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    /// Superclass descriptor, absent for interfaces and platform roots.
    pub superclass: Option<String>,
    /// Interface descriptors.
    pub interfaces: Vec<String>,
    pub type_parameters: Vec<ScanTypeParameter>,
    pub fields: Vec<ScanField>,
    pub methods: Vec<ScanMethod>,
    /// Fully-qualified names of directly nested classes.
    pub inner_classes: Vec<String>,
    pub annotations: Vec<ScanAnnotation>,
}

/// A scanned field entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanField {
    pub name: String,
    /// JVM signature descriptor of the field type.
    pub descriptor: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<ScanAnnotation>,
}

/// A scanned method entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanMethod {
    pub name: String,
    /// JVM signature descriptor of the return type.
    pub returns: String,
    pub parameters: Vec<ScanParameter>,
    pub type_parameters: Vec<ScanTypeParameter>,
    pub modifiers: Modifiers,
    pub annotations: Vec<ScanAnnotation>,
}

/// A scanned method parameter entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParameter {
    pub name: String,
    /// JVM signature descriptor of the parameter type.
    pub descriptor: String,
    pub annotations: Vec<ScanAnnotation>,
}

/// A scanned generic-parameter declaration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanTypeParameter {
    pub name: String,
    /// Bound descriptors, class bound first when present.
    pub bounds: Vec<String>,
    pub annotations: Vec<ScanAnnotation>,
}

/// A scanned annotation occurrence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanAnnotation {
    pub name: String,
    pub parameters: BTreeMap<String, ScanAnnotationValue>,
}

impl ScanAnnotation {
    /// Annotation with no parameters.
    pub fn marker(name: &str) -> Self {
        ScanAnnotation {
            name: name.to_string(),
            parameters: BTreeMap::new(),
        }
    }
}

/// A scanned annotation parameter value.
///
/// Untagged: an object with a `class` key is a class literal, an object
/// with `enum_class`/`constant` keys is an enum constant, anything else
/// is carried as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanAnnotationValue {
    Class {
        class: String,
    },
    EnumConstant {
        enum_class: String,
        constant: String,
    },
    Literal(serde_json::Value),
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// Name-keyed registry of scanned class entries.
#[derive(Debug, Default)]
pub struct ScanUniverse {
    classes: RwLock<HashMap<String, Arc<ScanClass>>>,
}

impl ScanUniverse {
    pub fn new() -> Arc<Self> {
        Arc::new(ScanUniverse::default())
    }

    /// Add a scanned entry after validating its qualified name.
    pub fn add(&self, class: ScanClass) -> PrismResult<Arc<ScanClass>> {
        if !QUALIFIED_NAME_RE.is_match(&class.name) {
            return Err(PrismError::ScanInput(format!(
                "invalid qualified name: `{}`",
                class.name
            )));
        }
        let entry = Arc::new(class);
        let previous = self
            .classes
            .write()
            .insert(entry.name.clone(), Arc::clone(&entry));
        if previous.is_some() {
            warn!("duplicate scan entry for `{}`, replacing", entry.name);
        }
        Ok(entry)
    }

    /// Load a scanner dump: a JSON array of class entries.
    pub fn from_json(json: &str) -> PrismResult<Arc<Self>> {
        let entries: Vec<ScanClass> = serde_json::from_str(json)?;
        let universe = ScanUniverse::new();
        for entry in entries {
            universe.add(entry)?;
        }
        Ok(universe)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<ScanClass>> {
        self.classes.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// All registered class names, sorted for deterministic iteration.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.read().keys().cloned().collect();
        names.sort();
        names
    }
}
