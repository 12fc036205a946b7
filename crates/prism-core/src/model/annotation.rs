//! Uniform annotation access regardless of origin.
//!
//! Both origins converge on one name + parameter-map contract. Parameter
//! values are normalized at construction: a class-literal value becomes a
//! late-resolving class value, an enum-constant value becomes a
//! (class, constant) pair, and everything else is carried as-is.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use indexmap::IndexSet;

use crate::errors::PrismResult;
use crate::origin::runtime::RuntimeAnnotationValue;
use crate::origin::scan::ScanAnnotationValue;
use crate::origin::{AnnotationOrigin, OriginKind, Universe};

use super::class_info::ClassInfoModel;
use super::Model;

// ---------------------------------------------------------------------------
// Parameter values
// ---------------------------------------------------------------------------

/// Late-resolving class-literal parameter value.
///
/// Normalization cannot materialize the class eagerly (a platform literal
/// such as `String.class` has no scan entry), so the value keeps the name
/// and resolves on demand, write-once.
#[derive(Clone)]
pub struct ClassLiteralValue {
    name: String,
    universe: Universe,
    reference: OnceLock<Arc<ClassInfoModel>>,
}

impl ClassLiteralValue {
    pub(crate) fn new(name: String, universe: Universe) -> Self {
        ClassLiteralValue {
            name,
            universe,
            reference: OnceLock::new(),
        }
    }

    /// Fully-qualified name of the referenced class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Materialize the referenced class model.
    pub fn resolve(&self) -> PrismResult<Arc<ClassInfoModel>> {
        if let Some(model) = self.reference.get() {
            return Ok(Arc::clone(model));
        }
        let model = ClassInfoModel::of(self.universe.find_class(&self.name)?);
        Ok(Arc::clone(self.reference.get_or_init(|| model)))
    }
}

impl PartialEq for ClassLiteralValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for ClassLiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassLiteralValue(`{}`)", self.name)
    }
}

/// A normalized annotation parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValueModel {
    /// Class-literal parameter (`Foo.class`).
    ClassLiteral(ClassLiteralValue),
    /// Enum-constant parameter.
    EnumConstant { class_name: String, constant: String },
    /// Everything else, carried as-is.
    Literal(serde_json::Value),
}

/// A single named annotation parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationParameterModel {
    name: String,
    value: AnnotationValueModel,
}

impl AnnotationParameterModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &AnnotationValueModel {
        &self.value
    }
}

// ---------------------------------------------------------------------------
// Annotation model
// ---------------------------------------------------------------------------

/// Uniform wrapper over an annotation occurrence from either origin.
#[derive(Clone, Debug)]
pub struct AnnotationInfoModel {
    origin_kind: OriginKind,
    name: String,
    parameters: BTreeMap<String, AnnotationParameterModel>,
}

impl AnnotationInfoModel {
    /// Normalize an annotation occurrence into the uniform model.
    pub fn of(origin: AnnotationOrigin) -> Self {
        match origin {
            AnnotationOrigin::Runtime(annotation, universe) => {
                let universe = Universe::Runtime(universe);
                let parameters = annotation
                    .parameters
                    .into_iter()
                    .map(|(name, value)| {
                        let value = match value {
                            RuntimeAnnotationValue::ClassLiteral(class) => {
                                AnnotationValueModel::ClassLiteral(ClassLiteralValue::new(
                                    class,
                                    universe.clone(),
                                ))
                            }
                            RuntimeAnnotationValue::EnumConstant {
                                class_name,
                                constant,
                            } => AnnotationValueModel::EnumConstant {
                                class_name,
                                constant,
                            },
                            RuntimeAnnotationValue::Literal(literal) => {
                                AnnotationValueModel::Literal(literal)
                            }
                        };
                        (name.clone(), AnnotationParameterModel { name, value })
                    })
                    .collect();
                AnnotationInfoModel {
                    origin_kind: OriginKind::Runtime,
                    name: annotation.name,
                    parameters,
                }
            }
            AnnotationOrigin::Scan(annotation, universe) => {
                let universe = Universe::Scan(universe);
                let parameters = annotation
                    .parameters
                    .into_iter()
                    .map(|(name, value)| {
                        let value = match value {
                            ScanAnnotationValue::Class { class } => {
                                AnnotationValueModel::ClassLiteral(ClassLiteralValue::new(
                                    class,
                                    universe.clone(),
                                ))
                            }
                            ScanAnnotationValue::EnumConstant {
                                enum_class,
                                constant,
                            } => AnnotationValueModel::EnumConstant {
                                class_name: enum_class,
                                constant,
                            },
                            ScanAnnotationValue::Literal(literal) => {
                                AnnotationValueModel::Literal(literal)
                            }
                        };
                        (name.clone(), AnnotationParameterModel { name, value })
                    })
                    .collect();
                AnnotationInfoModel {
                    origin_kind: OriginKind::Scan,
                    name: annotation.name,
                    parameters,
                }
            }
        }
    }

    /// Fully-qualified annotation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &BTreeMap<String, AnnotationParameterModel> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&AnnotationParameterModel> {
        self.parameters.get(name)
    }
}

/// Structural equality: name + normalized parameter map, never origin.
impl PartialEq for AnnotationInfoModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parameters == other.parameters
    }
}

impl Eq for AnnotationInfoModel {}

impl Hash for AnnotationInfoModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        for name in self.parameters.keys() {
            name.hash(state);
        }
    }
}

impl Model for AnnotationInfoModel {
    fn origin_kind(&self) -> OriginKind {
        self.origin_kind
    }

    /// Annotations never feed the closure; values resolve on demand.
    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
        Ok(IndexSet::new())
    }
}
