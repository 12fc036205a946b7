//! Runtime-origin metadata: the structured universe a live collaborator
//! registers after loading the program under introspection.
//!
//! Everything here is already shaped — type occurrences are trees, not
//! strings — because the producing side had live type objects in hand.
//! Registration completes before any model is built; afterwards the
//! registry is only read.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{ClassKind, Modifiers, PrimitiveKind};

// ---------------------------------------------------------------------------
// Type occurrences
// ---------------------------------------------------------------------------

/// A runtime type occurrence, mirroring what live introspection hands out.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeType {
    /// Primitive or `void`.
    Primitive(PrimitiveKind),
    /// Reference to a (possibly parameterized) class.
    Class(RuntimeClassRef),
    /// Array with a component type.
    Array(Box<RuntimeType>),
    /// Reference to a type parameter declared in the enclosing scope.
    Variable(String),
    /// Wildcard argument slot (`?`, `? extends X`, `? super X`). Only
    /// valid inside a type-argument position.
    Wildcard {
        upper: Vec<RuntimeType>,
        lower: Vec<RuntimeType>,
    },
}

impl RuntimeType {
    /// Shorthand for a plain, unparameterized class occurrence.
    pub fn class(name: &str) -> Self {
        RuntimeType::Class(RuntimeClassRef::plain(name))
    }
}

/// A (possibly parameterized, possibly nested) class reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeClassRef {
    /// Fully-qualified name of the referenced class.
    pub name: String,
    pub type_arguments: Vec<RuntimeType>,
    /// Enclosing reference for nested parameterized types
    /// (`Outer<X>.Inner<Y>`).
    pub owner: Option<Box<RuntimeType>>,
    /// Type-use annotations on this reference.
    pub annotations: Vec<RuntimeAnnotation>,
}

impl RuntimeClassRef {
    pub fn plain(name: &str) -> Self {
        RuntimeClassRef {
            name: name.to_string(),
            ..RuntimeClassRef::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

/// A class declaration registered with the runtime universe.
#[derive(Clone, Debug, Default)]
pub struct RuntimeClass {
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    /// Absent for interfaces and for classes extending only the platform
    /// root.
    pub superclass: Option<RuntimeType>,
    pub interfaces: Vec<RuntimeType>,
    pub type_parameters: Vec<RuntimeTypeParameter>,
    pub fields: Vec<RuntimeField>,
    pub methods: Vec<RuntimeMethod>,
    /// Fully-qualified names of directly nested classes.
    pub inner_classes: Vec<String>,
    pub annotations: Vec<RuntimeAnnotation>,
}

/// A field declaration.
#[derive(Clone, Debug)]
pub struct RuntimeField {
    pub name: String,
    pub ty: RuntimeType,
    pub modifiers: Modifiers,
    pub annotations: Vec<RuntimeAnnotation>,
}

/// A method declaration.
#[derive(Clone, Debug)]
pub struct RuntimeMethod {
    pub name: String,
    pub return_type: RuntimeType,
    pub parameters: Vec<RuntimeParameter>,
    pub type_parameters: Vec<RuntimeTypeParameter>,
    pub modifiers: Modifiers,
    pub annotations: Vec<RuntimeAnnotation>,
}

/// A single method parameter.
#[derive(Clone, Debug)]
pub struct RuntimeParameter {
    pub name: String,
    pub ty: RuntimeType,
    pub annotations: Vec<RuntimeAnnotation>,
}

/// Declaration of a generic parameter on a class or method.
#[derive(Clone, Debug, Default)]
pub struct RuntimeTypeParameter {
    pub name: String,
    pub bounds: Vec<RuntimeType>,
    pub annotations: Vec<RuntimeAnnotation>,
}

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

/// An annotation occurrence as seen by live introspection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeAnnotation {
    pub name: String,
    pub parameters: Vec<(String, RuntimeAnnotationValue)>,
}

impl RuntimeAnnotation {
    /// Annotation with no parameters.
    pub fn marker(name: &str) -> Self {
        RuntimeAnnotation {
            name: name.to_string(),
            parameters: Vec::new(),
        }
    }
}

/// A single named annotation parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeAnnotationValue {
    /// Class literal (`Foo.class`), by fully-qualified name.
    ClassLiteral(String),
    /// Enum constant reference.
    EnumConstant { class_name: String, constant: String },
    /// Any other value, carried as-is.
    Literal(serde_json::Value),
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// Name-keyed registry of runtime class declarations.
///
/// The lock only serializes registration; model construction happens
/// after the loading collaborator is done.
#[derive(Debug, Default)]
pub struct RuntimeUniverse {
    classes: RwLock<HashMap<String, Arc<RuntimeClass>>>,
}

impl RuntimeUniverse {
    pub fn new() -> Arc<Self> {
        Arc::new(RuntimeUniverse::default())
    }

    /// Register a class declaration. Re-registering a name replaces the
    /// previous entry.
    pub fn register(&self, class: RuntimeClass) -> Arc<RuntimeClass> {
        assert!(!class.name.is_empty(), "runtime class with empty name");
        let entry = Arc::new(class);
        self.classes
            .write()
            .insert(entry.name.clone(), Arc::clone(&entry));
        entry
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<RuntimeClass>> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let universe = RuntimeUniverse::new();
        universe.register(RuntimeClass {
            name: "com.acme.Pet".to_string(),
            ..RuntimeClass::default()
        });
        assert!(universe.contains("com.acme.Pet"));
        assert_eq!(universe.lookup("com.acme.Pet").unwrap().name, "com.acme.Pet");
        assert!(universe.lookup("com.acme.Other").is_none());
    }

    #[test]
    fn test_class_names_sorted() {
        let universe = RuntimeUniverse::new();
        for name in ["b.B", "a.A", "c.C"] {
            universe.register(RuntimeClass {
                name: name.to_string(),
                ..RuntimeClass::default()
            });
        }
        assert_eq!(universe.class_names(), vec!["a.A", "b.B", "c.C"]);
    }

    #[test]
    #[should_panic(expected = "empty name")]
    fn test_register_empty_name_panics() {
        RuntimeUniverse::new().register(RuntimeClass::default());
    }
}
