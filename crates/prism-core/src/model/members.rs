//! Structural member models: fields, methods, method parameters, and
//! bean-style properties.
//!
//! Members keep a weak, navigational back-reference to their declaring
//! model. Identity is owner + name, never the origin token, so members
//! of the same declaration from both origins are interchangeable.

use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexSet;

use crate::errors::PrismResult;
use crate::origin::descriptor::parse_descriptor;
use crate::origin::{
    AnnotationOrigin, FieldOrigin, MethodOrigin, Modifiers, OriginKind, ParameterOrigin,
    TypeOccurrence, Visibility,
};

use super::annotation::AnnotationInfoModel;
use super::class_info::ClassInfoModel;
use super::signature::{SignatureModel, TypeParameterModel};
use super::{try_cache, upgrade, Model, SignatureParent};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Origin-agnostic model of a field declaration.
pub struct FieldInfoModel {
    origin: FieldOrigin,
    name: String,
    owner_name: String,
    owner: Weak<ClassInfoModel>,
    signature: OnceLock<SignatureModel>,
    annotations: OnceLock<Vec<AnnotationInfoModel>>,
}

impl FieldInfoModel {
    pub(crate) fn new(
        origin: FieldOrigin,
        owner: Weak<ClassInfoModel>,
        owner_name: String,
    ) -> Arc<Self> {
        let name = origin.name().to_string();
        assert!(!name.is_empty(), "field origin with empty name");
        Arc::new(FieldInfoModel {
            origin,
            name,
            owner_name,
            owner,
            signature: OnceLock::new(),
            annotations: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaring class model.
    pub fn owner(&self) -> PrismResult<Arc<ClassInfoModel>> {
        upgrade(&self.owner, &self.name)
    }

    /// The underlying origin token.
    pub fn origin(&self) -> &FieldOrigin {
        &self.origin
    }

    pub fn modifiers(&self) -> Modifiers {
        match &self.origin {
            FieldOrigin::Runtime(field, _) => field.modifiers,
            FieldOrigin::Scan(field, _) => field.modifiers,
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers().is_static
    }

    pub fn is_transient(&self) -> bool {
        self.modifiers().is_transient
    }

    pub fn is_public(&self) -> bool {
        self.modifiers().visibility == Visibility::Public
    }

    /// The field's declared type.
    pub fn ty(&self) -> PrismResult<&SignatureModel> {
        try_cache(&self.signature, || {
            let parent = SignatureParent::Class(self.owner.clone());
            match &self.origin {
                FieldOrigin::Runtime(field, universe) => SignatureModel::of(
                    TypeOccurrence::Runtime(field.ty.clone(), Arc::clone(universe)),
                    parent,
                ),
                FieldOrigin::Scan(field, universe) => SignatureModel::of(
                    TypeOccurrence::Scan(
                        parse_descriptor(&field.descriptor)?,
                        Arc::clone(universe),
                    ),
                    parent,
                ),
            }
        })
    }

    pub fn annotations(&self) -> &[AnnotationInfoModel] {
        self.annotations.get_or_init(|| match &self.origin {
            FieldOrigin::Runtime(field, universe) => field
                .annotations
                .iter()
                .map(|annotation| {
                    AnnotationInfoModel::of(AnnotationOrigin::Runtime(
                        annotation.clone(),
                        Arc::clone(universe),
                    ))
                })
                .collect(),
            FieldOrigin::Scan(field, universe) => field
                .annotations
                .iter()
                .map(|annotation| {
                    AnnotationInfoModel::of(AnnotationOrigin::Scan(
                        annotation.clone(),
                        Arc::clone(universe),
                    ))
                })
                .collect(),
        })
    }
}

/// Identity: declaring class name + field name.
impl PartialEq for FieldInfoModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.owner_name == other.owner_name
    }
}

impl Eq for FieldInfoModel {}

impl Hash for FieldInfoModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner_name.hash(state);
        self.name.hash(state);
    }
}

impl std::fmt::Debug for FieldInfoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldInfoModel(`{}.{}`)", self.owner_name, self.name)
    }
}

impl Model for FieldInfoModel {
    fn origin_kind(&self) -> OriginKind {
        self.origin.kind()
    }

    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
        let mut dependencies = IndexSet::new();
        self.ty()?.collect_dependencies(&mut dependencies)?;
        Ok(dependencies)
    }
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

/// Origin-agnostic model of a method declaration.
pub struct MethodInfoModel {
    origin: MethodOrigin,
    name: String,
    owner_name: String,
    owner: Weak<ClassInfoModel>,
    self_weak: Weak<MethodInfoModel>,
    return_type: OnceLock<SignatureModel>,
    parameters: OnceLock<Vec<Arc<MethodParameterInfoModel>>>,
    type_parameters: OnceLock<Vec<TypeParameterModel>>,
    annotations: OnceLock<Vec<AnnotationInfoModel>>,
}

impl MethodInfoModel {
    pub(crate) fn new(
        origin: MethodOrigin,
        owner: Weak<ClassInfoModel>,
        owner_name: String,
    ) -> Arc<Self> {
        let name = origin.name().to_string();
        assert!(!name.is_empty(), "method origin with empty name");
        Arc::new_cyclic(|self_weak| MethodInfoModel {
            origin,
            name,
            owner_name,
            owner,
            self_weak: self_weak.clone(),
            return_type: OnceLock::new(),
            parameters: OnceLock::new(),
            type_parameters: OnceLock::new(),
            annotations: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaring class model.
    pub fn owner(&self) -> PrismResult<Arc<ClassInfoModel>> {
        upgrade(&self.owner, &self.name)
    }

    /// The underlying origin token.
    pub fn origin(&self) -> &MethodOrigin {
        &self.origin
    }

    pub fn modifiers(&self) -> Modifiers {
        match &self.origin {
            MethodOrigin::Runtime(method, _) => method.modifiers,
            MethodOrigin::Scan(method, _) => method.modifiers,
        }
    }

    pub fn is_public(&self) -> bool {
        self.modifiers().visibility == Visibility::Public
    }

    pub fn is_static(&self) -> bool {
        self.modifiers().is_static
    }

    /// Number of declared parameters, without building their models.
    pub fn parameter_count(&self) -> usize {
        match &self.origin {
            MethodOrigin::Runtime(method, _) => method.parameters.len(),
            MethodOrigin::Scan(method, _) => method.parameters.len(),
        }
    }

    pub fn return_type(&self) -> PrismResult<&SignatureModel> {
        try_cache(&self.return_type, || {
            let parent = SignatureParent::Method(self.self_weak.clone());
            match &self.origin {
                MethodOrigin::Runtime(method, universe) => SignatureModel::of(
                    TypeOccurrence::Runtime(method.return_type.clone(), Arc::clone(universe)),
                    parent,
                ),
                MethodOrigin::Scan(method, universe) => SignatureModel::of(
                    TypeOccurrence::Scan(
                        parse_descriptor(&method.returns)?,
                        Arc::clone(universe),
                    ),
                    parent,
                ),
            }
        })
    }

    /// Declared parameters, in declaration order.
    pub fn parameters(&self) -> PrismResult<&[Arc<MethodParameterInfoModel>]> {
        try_cache(&self.parameters, || {
            let models = match &self.origin {
                MethodOrigin::Runtime(method, universe) => method
                    .parameters
                    .iter()
                    .enumerate()
                    .map(|(index, parameter)| {
                        MethodParameterInfoModel::new(
                            ParameterOrigin::Runtime(parameter.clone(), Arc::clone(universe)),
                            index,
                            self.self_weak.clone(),
                            self.owner_name.clone(),
                            self.name.clone(),
                        )
                    })
                    .collect(),
                MethodOrigin::Scan(method, universe) => method
                    .parameters
                    .iter()
                    .enumerate()
                    .map(|(index, parameter)| {
                        MethodParameterInfoModel::new(
                            ParameterOrigin::Scan(parameter.clone(), Arc::clone(universe)),
                            index,
                            self.self_weak.clone(),
                            self.owner_name.clone(),
                            self.name.clone(),
                        )
                    })
                    .collect(),
            };
            Ok(models)
        })
        .map(Vec::as_slice)
    }

    /// Generic parameters declared on the method itself.
    pub fn type_parameters(&self) -> PrismResult<&[TypeParameterModel]> {
        try_cache(&self.type_parameters, || {
            let parent = SignatureParent::Method(self.self_weak.clone());
            match &self.origin {
                MethodOrigin::Runtime(method, universe) => method
                    .type_parameters
                    .iter()
                    .map(|declaration| {
                        TypeParameterModel::of_runtime(declaration, universe, &parent)
                    })
                    .collect(),
                MethodOrigin::Scan(method, universe) => method
                    .type_parameters
                    .iter()
                    .map(|declaration| TypeParameterModel::of_scan(declaration, universe, &parent))
                    .collect(),
            }
        })
        .map(Vec::as_slice)
    }

    pub fn annotations(&self) -> &[AnnotationInfoModel] {
        self.annotations.get_or_init(|| match &self.origin {
            MethodOrigin::Runtime(method, universe) => method
                .annotations
                .iter()
                .map(|annotation| {
                    AnnotationInfoModel::of(AnnotationOrigin::Runtime(
                        annotation.clone(),
                        Arc::clone(universe),
                    ))
                })
                .collect(),
            MethodOrigin::Scan(method, universe) => method
                .annotations
                .iter()
                .map(|annotation| {
                    AnnotationInfoModel::of(AnnotationOrigin::Scan(
                        annotation.clone(),
                        Arc::clone(universe),
                    ))
                })
                .collect(),
        })
    }
}

/// Identity: declaring class name + method name.
impl PartialEq for MethodInfoModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.owner_name == other.owner_name
    }
}

impl Eq for MethodInfoModel {}

impl Hash for MethodInfoModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner_name.hash(state);
        self.name.hash(state);
    }
}

impl std::fmt::Debug for MethodInfoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MethodInfoModel(`{}.{}`)", self.owner_name, self.name)
    }
}

impl Model for MethodInfoModel {
    fn origin_kind(&self) -> OriginKind {
        self.origin.kind()
    }

    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
        let mut dependencies = IndexSet::new();
        self.return_type()?.collect_dependencies(&mut dependencies)?;
        for parameter in self.parameters()? {
            parameter.ty()?.collect_dependencies(&mut dependencies)?;
        }
        Ok(dependencies)
    }
}

// ---------------------------------------------------------------------------
// Method parameters
// ---------------------------------------------------------------------------

/// Origin-agnostic model of a single method parameter.
pub struct MethodParameterInfoModel {
    origin: ParameterOrigin,
    name: String,
    index: usize,
    owner_class_name: String,
    owner_method_name: String,
    owner: Weak<MethodInfoModel>,
    signature: OnceLock<SignatureModel>,
    annotations: OnceLock<Vec<AnnotationInfoModel>>,
}

impl MethodParameterInfoModel {
    pub(crate) fn new(
        origin: ParameterOrigin,
        index: usize,
        owner: Weak<MethodInfoModel>,
        owner_class_name: String,
        owner_method_name: String,
    ) -> Arc<Self> {
        let name = origin.name().to_string();
        Arc::new(MethodParameterInfoModel {
            origin,
            name,
            index,
            owner_class_name,
            owner_method_name,
            owner,
            signature: OnceLock::new(),
            annotations: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the parameter list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The declaring method model.
    pub fn owner(&self) -> PrismResult<Arc<MethodInfoModel>> {
        upgrade(&self.owner, &self.name)
    }

    /// The parameter's declared type.
    pub fn ty(&self) -> PrismResult<&SignatureModel> {
        try_cache(&self.signature, || {
            let parent = SignatureParent::Method(self.owner.clone());
            match &self.origin {
                ParameterOrigin::Runtime(parameter, universe) => SignatureModel::of(
                    TypeOccurrence::Runtime(parameter.ty.clone(), Arc::clone(universe)),
                    parent,
                ),
                ParameterOrigin::Scan(parameter, universe) => SignatureModel::of(
                    TypeOccurrence::Scan(
                        parse_descriptor(&parameter.descriptor)?,
                        Arc::clone(universe),
                    ),
                    parent,
                ),
            }
        })
    }

    pub fn annotations(&self) -> &[AnnotationInfoModel] {
        self.annotations.get_or_init(|| match &self.origin {
            ParameterOrigin::Runtime(parameter, universe) => parameter
                .annotations
                .iter()
                .map(|annotation| {
                    AnnotationInfoModel::of(AnnotationOrigin::Runtime(
                        annotation.clone(),
                        Arc::clone(universe),
                    ))
                })
                .collect(),
            ParameterOrigin::Scan(parameter, universe) => parameter
                .annotations
                .iter()
                .map(|annotation| {
                    AnnotationInfoModel::of(AnnotationOrigin::Scan(
                        annotation.clone(),
                        Arc::clone(universe),
                    ))
                })
                .collect(),
        })
    }
}

/// Identity: declaring class + method + parameter name.
impl PartialEq for MethodParameterInfoModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.owner_method_name == other.owner_method_name
            && self.owner_class_name == other.owner_class_name
    }
}

impl Eq for MethodParameterInfoModel {}

impl Hash for MethodParameterInfoModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner_class_name.hash(state);
        self.owner_method_name.hash(state);
        self.name.hash(state);
    }
}

impl std::fmt::Debug for MethodParameterInfoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MethodParameterInfoModel(`{}.{}#{}`)",
            self.owner_class_name, self.owner_method_name, self.name
        )
    }
}

impl Model for MethodParameterInfoModel {
    fn origin_kind(&self) -> OriginKind {
        self.origin.kind()
    }

    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
        let mut dependencies = IndexSet::new();
        self.ty()?.collect_dependencies(&mut dependencies)?;
        Ok(dependencies)
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Bean-style property: the union of a backing field and its optional
/// public getter.
pub struct PropertyInfoModel {
    name: String,
    owner_name: String,
    owner: Weak<ClassInfoModel>,
    field: Arc<FieldInfoModel>,
    getter: Option<Arc<MethodInfoModel>>,
}

impl PropertyInfoModel {
    pub(crate) fn new(
        field: Arc<FieldInfoModel>,
        getter: Option<Arc<MethodInfoModel>>,
        owner: Weak<ClassInfoModel>,
        owner_name: String,
    ) -> Arc<Self> {
        Arc::new(PropertyInfoModel {
            name: field.name().to_string(),
            owner_name,
            owner,
            field,
            getter,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaring class model.
    pub fn owner(&self) -> PrismResult<Arc<ClassInfoModel>> {
        upgrade(&self.owner, &self.name)
    }

    pub fn field(&self) -> &Arc<FieldInfoModel> {
        &self.field
    }

    /// The public getter, when one exists.
    pub fn getter(&self) -> Option<&Arc<MethodInfoModel>> {
        self.getter.as_ref()
    }

    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    /// No getter and a transient backing field.
    pub fn is_transient(&self) -> bool {
        !self.has_getter() && self.field.is_transient()
    }

    /// Hidden unless a public getter or a public field exposes it.
    pub fn is_hidden(&self) -> bool {
        !self.has_getter() && !self.field.is_public()
    }

    /// The property type, taken from the backing field.
    pub fn ty(&self) -> PrismResult<&SignatureModel> {
        self.field.ty()
    }

    /// Union of the field's and (if present) the getter's annotations.
    pub fn annotations(&self) -> Vec<AnnotationInfoModel> {
        let mut annotations: Vec<AnnotationInfoModel> = self.field.annotations().to_vec();
        if let Some(getter) = &self.getter {
            for annotation in getter.annotations() {
                if !annotations.contains(annotation) {
                    annotations.push(annotation.clone());
                }
            }
        }
        annotations
    }
}

/// Identity: declaring class name + property name.
impl PartialEq for PropertyInfoModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.owner_name == other.owner_name
    }
}

impl Eq for PropertyInfoModel {}

impl Hash for PropertyInfoModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner_name.hash(state);
        self.name.hash(state);
    }
}

impl std::fmt::Debug for PropertyInfoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PropertyInfoModel(`{}.{}`)", self.owner_name, self.name)
    }
}

impl Model for PropertyInfoModel {
    fn origin_kind(&self) -> OriginKind {
        self.field.origin_kind()
    }

    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
        let mut dependencies = self.field.dependencies()?;
        if let Some(getter) = &self.getter {
            dependencies.extend(getter.dependencies()?);
        }
        Ok(dependencies)
    }
}
