//! Metadata origins and the shared origin-level vocabulary.
//!
//! Two metadata sources feed the model layer: the runtime universe (live
//! introspection hands out fully-linked type trees) and the scan universe
//! (a static scan of compiled artifacts hands out flat entries whose type
//! occurrences are descriptor strings). Models built from either origin
//! are interchangeable; everything in this module is the raw material
//! those models wrap.

pub mod descriptor;
pub mod runtime;
pub mod scan;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{PrismError, PrismResult};
use self::descriptor::TypeDescriptor;
use self::runtime::{
    RuntimeAnnotation, RuntimeClass, RuntimeField, RuntimeMethod, RuntimeParameter, RuntimeType,
    RuntimeUniverse,
};
use self::scan::{ScanAnnotation, ScanClass, ScanField, ScanMethod, ScanParameter, ScanUniverse};

// ---------------------------------------------------------------------------
// Origin tagging
// ---------------------------------------------------------------------------

/// Which metadata source produced a model. Closed two-variant set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OriginKind {
    /// Live runtime introspection ("reflection").
    Runtime,
    /// Static scan of compiled artifacts ("source").
    Scan,
}

impl std::fmt::Display for OriginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OriginKind::Runtime => write!(f, "runtime"),
            OriginKind::Scan => write!(f, "scan"),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared vocabulary
// ---------------------------------------------------------------------------

/// Declaration kind of a class-like entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// Declaration visibility. `Package` is the no-modifier default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

/// Declaration modifiers shared by both origins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_static: bool,
    pub is_synthetic: bool,
    pub is_transient: bool,
}

/// Primitive type kinds, `void` included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    /// Source-language spelling.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int | PrimitiveKind::Long
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }
}

// ---------------------------------------------------------------------------
// Universe dispatch
// ---------------------------------------------------------------------------

/// Handle to whichever metadata universe an origin token came from.
///
/// Dispatch over the two universes is a plain match; no runtime type
/// inspection anywhere.
#[derive(Clone)]
pub enum Universe {
    Runtime(Arc<RuntimeUniverse>),
    Scan(Arc<ScanUniverse>),
}

impl Universe {
    pub fn kind(&self) -> OriginKind {
        match self {
            Universe::Runtime(_) => OriginKind::Runtime,
            Universe::Scan(_) => OriginKind::Scan,
        }
    }

    /// Look up a class entry by fully-qualified name.
    pub fn find_class(&self, name: &str) -> PrismResult<ClassOrigin> {
        match self {
            Universe::Runtime(universe) => universe
                .lookup(name)
                .map(|class| ClassOrigin::Runtime(class, Arc::clone(universe))),
            Universe::Scan(universe) => universe
                .lookup(name)
                .map(|class| ClassOrigin::Scan(class, Arc::clone(universe))),
        }
        .ok_or_else(|| PrismError::Resolution(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            Universe::Runtime(universe) => universe.contains(name),
            Universe::Scan(universe) => universe.contains(name),
        }
    }

    /// All registered class names, sorted for deterministic iteration.
    pub fn class_names(&self) -> Vec<String> {
        match self {
            Universe::Runtime(universe) => universe.class_names(),
            Universe::Scan(universe) => universe.class_names(),
        }
    }
}

impl std::fmt::Debug for Universe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Universe({})", self.kind())
    }
}

// ---------------------------------------------------------------------------
// Origin tokens
// ---------------------------------------------------------------------------

/// Origin token for a class declaration.
#[derive(Clone)]
pub enum ClassOrigin {
    Runtime(Arc<RuntimeClass>, Arc<RuntimeUniverse>),
    Scan(Arc<ScanClass>, Arc<ScanUniverse>),
}

impl ClassOrigin {
    pub fn kind(&self) -> OriginKind {
        match self {
            ClassOrigin::Runtime(..) => OriginKind::Runtime,
            ClassOrigin::Scan(..) => OriginKind::Scan,
        }
    }

    /// Fully-qualified name of the underlying declaration.
    pub fn name(&self) -> &str {
        match self {
            ClassOrigin::Runtime(class, _) => &class.name,
            ClassOrigin::Scan(class, _) => &class.name,
        }
    }

    pub fn universe(&self) -> Universe {
        match self {
            ClassOrigin::Runtime(_, universe) => Universe::Runtime(Arc::clone(universe)),
            ClassOrigin::Scan(_, universe) => Universe::Scan(Arc::clone(universe)),
        }
    }
}

impl std::fmt::Debug for ClassOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassOrigin({}, `{}`)", self.kind(), self.name())
    }
}

/// Origin token for a single type occurrence (a field type, a parameter
/// type, a return type, a bound).
#[derive(Clone, Debug)]
pub enum TypeOccurrence {
    Runtime(RuntimeType, Arc<RuntimeUniverse>),
    Scan(TypeDescriptor, Arc<ScanUniverse>),
}

impl TypeOccurrence {
    pub fn kind(&self) -> OriginKind {
        match self {
            TypeOccurrence::Runtime(..) => OriginKind::Runtime,
            TypeOccurrence::Scan(..) => OriginKind::Scan,
        }
    }
}

/// Origin token for an annotation occurrence.
#[derive(Clone, Debug)]
pub enum AnnotationOrigin {
    Runtime(RuntimeAnnotation, Arc<RuntimeUniverse>),
    Scan(ScanAnnotation, Arc<ScanUniverse>),
}

impl AnnotationOrigin {
    pub fn kind(&self) -> OriginKind {
        match self {
            AnnotationOrigin::Runtime(..) => OriginKind::Runtime,
            AnnotationOrigin::Scan(..) => OriginKind::Scan,
        }
    }
}

/// Origin token for a field declaration.
#[derive(Clone, Debug)]
pub enum FieldOrigin {
    Runtime(RuntimeField, Arc<RuntimeUniverse>),
    Scan(ScanField, Arc<ScanUniverse>),
}

impl FieldOrigin {
    pub fn kind(&self) -> OriginKind {
        match self {
            FieldOrigin::Runtime(..) => OriginKind::Runtime,
            FieldOrigin::Scan(..) => OriginKind::Scan,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldOrigin::Runtime(field, _) => &field.name,
            FieldOrigin::Scan(field, _) => &field.name,
        }
    }
}

/// Origin token for a method declaration.
#[derive(Clone, Debug)]
pub enum MethodOrigin {
    Runtime(RuntimeMethod, Arc<RuntimeUniverse>),
    Scan(ScanMethod, Arc<ScanUniverse>),
}

impl MethodOrigin {
    pub fn kind(&self) -> OriginKind {
        match self {
            MethodOrigin::Runtime(..) => OriginKind::Runtime,
            MethodOrigin::Scan(..) => OriginKind::Scan,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MethodOrigin::Runtime(method, _) => &method.name,
            MethodOrigin::Scan(method, _) => &method.name,
        }
    }
}

/// Origin token for a method parameter declaration.
#[derive(Clone, Debug)]
pub enum ParameterOrigin {
    Runtime(RuntimeParameter, Arc<RuntimeUniverse>),
    Scan(ScanParameter, Arc<ScanUniverse>),
}

impl ParameterOrigin {
    pub fn kind(&self) -> OriginKind {
        match self {
            ParameterOrigin::Runtime(..) => OriginKind::Runtime,
            ParameterOrigin::Scan(..) => OriginKind::Scan,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ParameterOrigin::Runtime(parameter, _) => &parameter.name,
            ParameterOrigin::Scan(parameter, _) => &parameter.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_kind_display() {
        assert_eq!(OriginKind::Runtime.to_string(), "runtime");
        assert_eq!(OriginKind::Scan.to_string(), "scan");
    }

    #[test]
    fn test_find_class_missing_is_resolution_error() {
        let universe = Universe::Runtime(RuntimeUniverse::new());
        let err = universe.find_class("com.acme.Missing").unwrap_err();
        assert!(matches!(err, PrismError::Resolution(name) if name == "com.acme.Missing"));
    }

    #[test]
    fn test_modifiers_default_is_package_visibility() {
        let modifiers = Modifiers::default();
        assert_eq!(modifiers.visibility, Visibility::Package);
        assert!(!modifiers.is_static);
    }
}
