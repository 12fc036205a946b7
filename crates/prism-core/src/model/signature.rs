//! The signature model hierarchy: classification of a single type
//! occurrence, independent of origin.
//!
//! A closed set of six variants covers every occurrence either origin can
//! produce. The factory inspects the occurrence and returns the matching
//! variant; exactly one kind predicate answers true per instance.
//! Equality is structural and never involves the origin token, so the
//! same occurrence classified from both origins compares equal.

use std::sync::{Arc, OnceLock};

use indexmap::IndexSet;
use tracing::debug;

use crate::errors::{PrismError, PrismResult};
use crate::origin::descriptor::{NamedDescriptor, TypeDescriptor};
use crate::origin::runtime::{RuntimeClassRef, RuntimeType, RuntimeTypeParameter, RuntimeUniverse};
use crate::origin::scan::{ScanTypeParameter, ScanUniverse};
use crate::origin::{AnnotationOrigin, OriginKind, PrimitiveKind, TypeOccurrence, Universe};

use super::annotation::AnnotationInfoModel;
use super::class_info::ClassInfoModel;
use super::platform::{
    is_platform, platform_assignable, BOXED_PRIMITIVES, DATE_CLASSES, DATE_TIME_CLASSES,
    ITERABLE_CLASSES, MAP_CLASSES, OPTIONAL_CLASSES, STRING_CLASSES,
};
use super::{upgrade, Model, SignatureParent};

// ---------------------------------------------------------------------------
// Sum type
// ---------------------------------------------------------------------------

/// A classified type occurrence.
#[derive(Clone, Debug, PartialEq)]
pub enum SignatureModel {
    Base(BaseSignatureModel),
    Array(ArraySignatureModel),
    ClassRef(ClassRefSignatureModel),
    TypeVariable(TypeVariableSignatureModel),
    TypeArgument(TypeArgumentModel),
    TypeParameter(TypeParameterModel),
}

/// Wildcard kind of a type-argument slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WildcardKind {
    /// Concrete argument, no wildcard.
    None,
    Extends,
    Super,
    /// Unbounded (`?`; also `? extends Object`).
    Any,
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Primitive or `void` occurrence.
#[derive(Clone, Debug)]
pub struct BaseSignatureModel {
    origin_kind: OriginKind,
    primitive: PrimitiveKind,
}

impl BaseSignatureModel {
    pub fn primitive(&self) -> PrimitiveKind {
        self.primitive
    }
}

impl PartialEq for BaseSignatureModel {
    fn eq(&self, other: &Self) -> bool {
        self.primitive == other.primitive
    }
}

/// Array occurrence with its component signature.
#[derive(Clone, Debug)]
pub struct ArraySignatureModel {
    origin_kind: OriginKind,
    nested: Box<SignatureModel>,
}

impl ArraySignatureModel {
    /// The component (element) signature.
    pub fn nested(&self) -> &SignatureModel {
        &self.nested
    }
}

impl PartialEq for ArraySignatureModel {
    fn eq(&self, other: &Self) -> bool {
        self.nested == other.nested
    }
}

/// Reference to a class, possibly parameterized and nested.
///
/// The only variant that can carry type-use annotations and that may need
/// late resolution to a [`ClassInfoModel`]. The resolved reference is a
/// write-once cell; a concurrent first-write race is benign because the
/// resolved value is deterministic.
#[derive(Clone, Debug)]
pub struct ClassRefSignatureModel {
    origin_kind: OriginKind,
    universe: Universe,
    name: String,
    type_arguments: Vec<SignatureModel>,
    owner: Option<Box<ClassRefSignatureModel>>,
    annotations: Vec<AnnotationInfoModel>,
    reference: OnceLock<Arc<ClassInfoModel>>,
}

impl ClassRefSignatureModel {
    /// Artificial reference: the class model is pre-supplied instead of
    /// being discovered from an occurrence.
    pub fn artificial(reference: Arc<ClassInfoModel>) -> Self {
        let model = ClassRefSignatureModel {
            origin_kind: reference.origin_kind(),
            universe: reference.origin().universe(),
            name: reference.name().to_string(),
            type_arguments: Vec::new(),
            owner: None,
            annotations: Vec::new(),
            reference: OnceLock::new(),
        };
        model.set_reference(reference);
        model
    }

    /// Fully-qualified name of the referenced class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type-argument slots, each a [`SignatureModel::TypeArgument`].
    pub fn type_arguments(&self) -> &[SignatureModel] {
        &self.type_arguments
    }

    /// Enclosing reference for nested parameterized types.
    pub fn owner(&self) -> Option<&ClassRefSignatureModel> {
        self.owner.as_deref()
    }

    /// Type-use annotations on this reference.
    pub fn annotations(&self) -> &[AnnotationInfoModel] {
        &self.annotations
    }

    /// Resolve to the referenced class model, late-bound and write-once.
    pub fn resolve(&self) -> PrismResult<Arc<ClassInfoModel>> {
        if let Some(model) = self.reference.get() {
            return Ok(Arc::clone(model));
        }
        debug!("resolving class reference `{}`", self.name);
        let model = ClassInfoModel::of(self.universe.find_class(&self.name)?);
        Ok(Arc::clone(self.reference.get_or_init(|| model)))
    }

    /// Pre-supply the resolved reference. First write wins; later writes
    /// are ignored.
    pub fn set_reference(&self, reference: Arc<ClassInfoModel>) {
        let _ = self.reference.set(reference);
    }

    /// Name-based assignability of this reference to any of `targets`.
    pub fn assignable_to(&self, targets: &[&str]) -> bool {
        if targets.contains(&self.name.as_str()) {
            return true;
        }
        if is_platform(&self.name) {
            return platform_assignable(&self.name, targets);
        }
        match self.resolve() {
            Ok(model) => model.assignable_to(targets),
            // Predicates never fail; hard errors belong to the closure.
            Err(_) => false,
        }
    }
}

impl PartialEq for ClassRefSignatureModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.type_arguments == other.type_arguments
            && self.owner == other.owner
            && self.annotations == other.annotations
    }
}

/// Reference to a declared type parameter.
#[derive(Clone, Debug)]
pub struct TypeVariableSignatureModel {
    origin_kind: OriginKind,
    name: String,
    parent: SignatureParent,
}

impl TypeVariableSignatureModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve to the [`TypeParameterModel`] this variable names,
    /// searching the declaring method first, then the declaring class.
    pub fn resolve(&self) -> PrismResult<TypeParameterModel> {
        match &self.parent {
            SignatureParent::Method(weak) => {
                let method = upgrade(weak, &self.name)?;
                if let Some(parameter) = method
                    .type_parameters()?
                    .iter()
                    .find(|parameter| parameter.name() == self.name)
                {
                    return Ok(parameter.clone());
                }
                let class = method.owner()?;
                find_type_parameter(&class, &self.name)
            }
            SignatureParent::Class(weak) => {
                let class = upgrade(weak, &self.name)?;
                find_type_parameter(&class, &self.name)
            }
            SignatureParent::None => Err(PrismError::Resolution(format!(
                "type variable `{}` has no declaring context",
                self.name
            ))),
        }
    }
}

fn find_type_parameter(
    class: &Arc<ClassInfoModel>,
    name: &str,
) -> PrismResult<TypeParameterModel> {
    class
        .type_parameters()?
        .iter()
        .find(|parameter| parameter.name() == name)
        .cloned()
        .ok_or_else(|| {
            PrismError::Resolution(format!(
                "type variable `{name}` is not declared on `{}`",
                class.name()
            ))
        })
}

impl PartialEq for TypeVariableSignatureModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A type-argument slot within a parameterized reference.
#[derive(Clone, Debug)]
pub struct TypeArgumentModel {
    origin_kind: OriginKind,
    wildcard: WildcardKind,
    bounds: Vec<SignatureModel>,
}

impl TypeArgumentModel {
    pub fn wildcard(&self) -> WildcardKind {
        self.wildcard
    }

    /// Associated bound signatures: the single concrete signature for
    /// [`WildcardKind::None`], the bound(s) otherwise, empty for
    /// [`WildcardKind::Any`].
    pub fn bounds(&self) -> &[SignatureModel] {
        &self.bounds
    }
}

impl PartialEq for TypeArgumentModel {
    fn eq(&self, other: &Self) -> bool {
        self.wildcard == other.wildcard && self.bounds == other.bounds
    }
}

/// Declaration of a generic parameter on a class or method.
#[derive(Clone, Debug)]
pub struct TypeParameterModel {
    origin_kind: OriginKind,
    name: String,
    bounds: Vec<SignatureModel>,
    annotations: Vec<AnnotationInfoModel>,
}

impl TypeParameterModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[SignatureModel] {
        &self.bounds
    }

    pub fn annotations(&self) -> &[AnnotationInfoModel] {
        &self.annotations
    }

    pub(crate) fn of_runtime(
        declaration: &RuntimeTypeParameter,
        universe: &Arc<RuntimeUniverse>,
        parent: &SignatureParent,
    ) -> PrismResult<Self> {
        let bounds = declaration
            .bounds
            .iter()
            .map(|bound| {
                SignatureModel::of(
                    TypeOccurrence::Runtime(bound.clone(), Arc::clone(universe)),
                    parent.clone(),
                )
            })
            .collect::<PrismResult<Vec<_>>>()?;
        let annotations = declaration
            .annotations
            .iter()
            .map(|annotation| {
                AnnotationInfoModel::of(AnnotationOrigin::Runtime(
                    annotation.clone(),
                    Arc::clone(universe),
                ))
            })
            .collect();
        Ok(TypeParameterModel {
            origin_kind: OriginKind::Runtime,
            name: declaration.name.clone(),
            bounds,
            annotations,
        })
    }

    pub(crate) fn of_scan(
        declaration: &ScanTypeParameter,
        universe: &Arc<ScanUniverse>,
        parent: &SignatureParent,
    ) -> PrismResult<Self> {
        let bounds = declaration
            .bounds
            .iter()
            .map(|bound| {
                let descriptor = crate::origin::descriptor::parse_descriptor(bound)?;
                SignatureModel::of(
                    TypeOccurrence::Scan(descriptor, Arc::clone(universe)),
                    parent.clone(),
                )
            })
            .collect::<PrismResult<Vec<_>>>()?;
        let annotations = declaration
            .annotations
            .iter()
            .map(|annotation| {
                AnnotationInfoModel::of(AnnotationOrigin::Scan(
                    annotation.clone(),
                    Arc::clone(universe),
                ))
            })
            .collect();
        Ok(TypeParameterModel {
            origin_kind: OriginKind::Scan,
            name: declaration.name.clone(),
            bounds,
            annotations,
        })
    }
}

/// Structural equality: name + annotations + bounds.
impl PartialEq for TypeParameterModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.annotations == other.annotations
            && self.bounds == other.bounds
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

impl SignatureModel {
    /// Classify a type occurrence from either origin. `parent` is the
    /// declaring context used to resolve type variables.
    pub fn of(occurrence: TypeOccurrence, parent: SignatureParent) -> PrismResult<SignatureModel> {
        match occurrence {
            TypeOccurrence::Runtime(ty, universe) => from_runtime(&ty, &universe, &parent),
            TypeOccurrence::Scan(descriptor, universe) => {
                from_scan(&descriptor, &universe, &parent)
            }
        }
    }
}

fn from_runtime(
    ty: &RuntimeType,
    universe: &Arc<RuntimeUniverse>,
    parent: &SignatureParent,
) -> PrismResult<SignatureModel> {
    match ty {
        RuntimeType::Primitive(primitive) => Ok(SignatureModel::Base(BaseSignatureModel {
            origin_kind: OriginKind::Runtime,
            primitive: *primitive,
        })),
        RuntimeType::Array(nested) => Ok(SignatureModel::Array(ArraySignatureModel {
            origin_kind: OriginKind::Runtime,
            nested: Box::new(from_runtime(nested, universe, parent)?),
        })),
        RuntimeType::Class(class_ref) => Ok(SignatureModel::ClassRef(class_ref_from_runtime(
            class_ref, universe, parent,
        )?)),
        RuntimeType::Variable(name) => {
            Ok(SignatureModel::TypeVariable(TypeVariableSignatureModel {
                origin_kind: OriginKind::Runtime,
                name: name.clone(),
                parent: parent.clone(),
            }))
        }
        RuntimeType::Wildcard { .. } => Err(PrismError::UnsupportedType(
            "wildcard outside a type-argument slot".to_string(),
        )),
    }
}

fn class_ref_from_runtime(
    class_ref: &RuntimeClassRef,
    universe: &Arc<RuntimeUniverse>,
    parent: &SignatureParent,
) -> PrismResult<ClassRefSignatureModel> {
    let owner = match class_ref.owner.as_deref() {
        Some(RuntimeType::Class(owner_ref)) => Some(Box::new(class_ref_from_runtime(
            owner_ref, universe, parent,
        )?)),
        Some(other) => {
            return Err(PrismError::UnsupportedType(format!(
                "class reference owner must itself be a class reference, got {other:?}"
            )))
        }
        None => None,
    };
    let type_arguments = class_ref
        .type_arguments
        .iter()
        .map(|argument| runtime_argument(argument, universe, parent))
        .collect::<PrismResult<Vec<_>>>()?;
    let annotations = class_ref
        .annotations
        .iter()
        .map(|annotation| {
            AnnotationInfoModel::of(AnnotationOrigin::Runtime(
                annotation.clone(),
                Arc::clone(universe),
            ))
        })
        .collect();
    Ok(ClassRefSignatureModel {
        origin_kind: OriginKind::Runtime,
        universe: Universe::Runtime(Arc::clone(universe)),
        name: class_ref.name.clone(),
        type_arguments,
        owner,
        annotations,
        reference: OnceLock::new(),
    })
}

/// Classify one runtime type-argument slot.
fn runtime_argument(
    ty: &RuntimeType,
    universe: &Arc<RuntimeUniverse>,
    parent: &SignatureParent,
) -> PrismResult<SignatureModel> {
    let argument = match ty {
        RuntimeType::Wildcard { upper, lower } => {
            if !lower.is_empty() {
                let bounds = lower
                    .iter()
                    .map(|bound| from_runtime(bound, universe, parent))
                    .collect::<PrismResult<Vec<_>>>()?;
                TypeArgumentModel {
                    origin_kind: OriginKind::Runtime,
                    wildcard: WildcardKind::Super,
                    bounds,
                }
            } else if upper.is_empty() || is_object_only(upper) {
                // `? extends Object` is declared as a bare `?`; treat it
                // as unbounded.
                TypeArgumentModel {
                    origin_kind: OriginKind::Runtime,
                    wildcard: WildcardKind::Any,
                    bounds: Vec::new(),
                }
            } else {
                let bounds = upper
                    .iter()
                    .map(|bound| from_runtime(bound, universe, parent))
                    .collect::<PrismResult<Vec<_>>>()?;
                TypeArgumentModel {
                    origin_kind: OriginKind::Runtime,
                    wildcard: WildcardKind::Extends,
                    bounds,
                }
            }
        }
        concrete => TypeArgumentModel {
            origin_kind: OriginKind::Runtime,
            wildcard: WildcardKind::None,
            bounds: vec![from_runtime(concrete, universe, parent)?],
        },
    };
    Ok(SignatureModel::TypeArgument(argument))
}

fn is_object_only(bounds: &[RuntimeType]) -> bool {
    bounds.iter().all(|bound| {
        matches!(
            bound,
            RuntimeType::Class(class_ref)
                if class_ref.name == "java.lang.Object" && class_ref.type_arguments.is_empty()
        )
    })
}

fn from_scan(
    descriptor: &TypeDescriptor,
    universe: &Arc<ScanUniverse>,
    parent: &SignatureParent,
) -> PrismResult<SignatureModel> {
    match descriptor {
        TypeDescriptor::Primitive(primitive) => Ok(SignatureModel::Base(BaseSignatureModel {
            origin_kind: OriginKind::Scan,
            primitive: *primitive,
        })),
        TypeDescriptor::Array(nested) => Ok(SignatureModel::Array(ArraySignatureModel {
            origin_kind: OriginKind::Scan,
            nested: Box::new(from_scan(nested, universe, parent)?),
        })),
        TypeDescriptor::Named(named) => Ok(SignatureModel::ClassRef(class_ref_from_scan(
            named, universe, parent,
        )?)),
        TypeDescriptor::Variable(name) => {
            Ok(SignatureModel::TypeVariable(TypeVariableSignatureModel {
                origin_kind: OriginKind::Scan,
                name: name.clone(),
                parent: parent.clone(),
            }))
        }
        TypeDescriptor::Wildcard { .. } => Err(PrismError::UnsupportedType(
            "wildcard outside a type-argument slot".to_string(),
        )),
    }
}

fn class_ref_from_scan(
    named: &NamedDescriptor,
    universe: &Arc<ScanUniverse>,
    parent: &SignatureParent,
) -> PrismResult<ClassRefSignatureModel> {
    let owner = named
        .owner
        .as_deref()
        .map(|owner| class_ref_from_scan(owner, universe, parent).map(Box::new))
        .transpose()?;
    let type_arguments = named
        .arguments
        .iter()
        .map(|argument| scan_argument(argument, universe, parent))
        .collect::<PrismResult<Vec<_>>>()?;
    Ok(ClassRefSignatureModel {
        origin_kind: OriginKind::Scan,
        universe: Universe::Scan(Arc::clone(universe)),
        name: named.name.clone(),
        type_arguments,
        owner,
        // Descriptors carry no type-use annotations.
        annotations: Vec::new(),
        reference: OnceLock::new(),
    })
}

/// Classify one scanned type-argument slot.
fn scan_argument(
    descriptor: &TypeDescriptor,
    universe: &Arc<ScanUniverse>,
    parent: &SignatureParent,
) -> PrismResult<SignatureModel> {
    let argument = match descriptor {
        TypeDescriptor::Wildcard { upper, lower } => match (upper, lower) {
            (_, Some(lower)) => TypeArgumentModel {
                origin_kind: OriginKind::Scan,
                wildcard: WildcardKind::Super,
                bounds: vec![from_scan(lower, universe, parent)?],
            },
            (Some(upper), None) if !is_object_descriptor(upper) => TypeArgumentModel {
                origin_kind: OriginKind::Scan,
                wildcard: WildcardKind::Extends,
                bounds: vec![from_scan(upper, universe, parent)?],
            },
            // Bare `*`, or `+Ljava/lang/Object;`: unbounded.
            _ => TypeArgumentModel {
                origin_kind: OriginKind::Scan,
                wildcard: WildcardKind::Any,
                bounds: Vec::new(),
            },
        },
        concrete => TypeArgumentModel {
            origin_kind: OriginKind::Scan,
            wildcard: WildcardKind::None,
            bounds: vec![from_scan(concrete, universe, parent)?],
        },
    };
    Ok(SignatureModel::TypeArgument(argument))
}

fn is_object_descriptor(descriptor: &TypeDescriptor) -> bool {
    matches!(
        descriptor,
        TypeDescriptor::Named(named)
            if named.name == "java.lang.Object" && named.arguments.is_empty()
    )
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

impl SignatureModel {
    // -- Kind predicates (exactly one is true per instance) ------------------

    pub fn is_base(&self) -> bool {
        matches!(self, SignatureModel::Base(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SignatureModel::Array(_))
    }

    pub fn is_class_ref(&self) -> bool {
        matches!(self, SignatureModel::ClassRef(_))
    }

    pub fn is_type_variable(&self) -> bool {
        matches!(self, SignatureModel::TypeVariable(_))
    }

    pub fn is_type_argument(&self) -> bool {
        matches!(self, SignatureModel::TypeArgument(_))
    }

    pub fn is_type_parameter(&self) -> bool {
        matches!(self, SignatureModel::TypeParameter(_))
    }

    /// Primitive occurrence, `void` included.
    pub fn is_primitive(&self) -> bool {
        self.is_base()
    }

    // -- Primitive predicates (boxed class references included) -------------

    pub fn is_boolean(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Boolean)
    }

    pub fn is_byte(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Byte)
    }

    pub fn is_char(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Char)
    }

    pub fn is_short(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Short)
    }

    pub fn is_integer(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Int)
    }

    pub fn is_long(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Long)
    }

    pub fn is_float(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Float)
    }

    pub fn is_double(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Double)
    }

    pub fn is_void(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Void)
    }

    /// Whole-number type, primitive or boxed.
    pub fn has_integer_type(&self) -> bool {
        self.primitive_kind().is_some_and(PrimitiveKind::is_integer)
    }

    /// Floating-point type, primitive or boxed.
    pub fn has_float_type(&self) -> bool {
        self.primitive_kind().is_some_and(PrimitiveKind::is_float)
    }

    fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            SignatureModel::Base(base) => Some(base.primitive),
            SignatureModel::ClassRef(class_ref) => {
                BOXED_PRIMITIVES.get(class_ref.name.as_str()).copied()
            }
            _ => None,
        }
    }

    // -- Semantic predicates -------------------------------------------------

    pub fn is_string(&self) -> bool {
        self.assignable_to(STRING_CLASSES)
    }

    pub fn is_map(&self) -> bool {
        self.assignable_to(MAP_CLASSES)
    }

    pub fn is_optional(&self) -> bool {
        self.assignable_to(OPTIONAL_CLASSES)
    }

    pub fn is_iterable(&self) -> bool {
        self.assignable_to(ITERABLE_CLASSES)
    }

    pub fn is_date(&self) -> bool {
        self.assignable_to(DATE_CLASSES)
    }

    pub fn is_date_time(&self) -> bool {
        self.assignable_to(DATE_TIME_CLASSES)
    }

    fn assignable_to(&self, targets: &[&str]) -> bool {
        match self {
            SignatureModel::ClassRef(class_ref) => class_ref.assignable_to(targets),
            _ => false,
        }
    }

    // -- Variant accessors ---------------------------------------------------

    pub fn as_class_ref(&self) -> Option<&ClassRefSignatureModel> {
        match self {
            SignatureModel::ClassRef(class_ref) => Some(class_ref),
            _ => None,
        }
    }

    pub fn as_type_argument(&self) -> Option<&TypeArgumentModel> {
        match self {
            SignatureModel::TypeArgument(argument) => Some(argument),
            _ => None,
        }
    }

    pub fn as_type_variable(&self) -> Option<&TypeVariableSignatureModel> {
        match self {
            SignatureModel::TypeVariable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_type_parameter(&self) -> Option<&TypeParameterModel> {
        match self {
            SignatureModel::TypeParameter(parameter) => Some(parameter),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

impl SignatureModel {
    pub(crate) fn collect_dependencies(
        &self,
        dependencies: &mut IndexSet<Arc<ClassInfoModel>>,
    ) -> PrismResult<()> {
        match self {
            SignatureModel::Base(_) => Ok(()),
            SignatureModel::Array(array) => array.nested.collect_dependencies(dependencies),
            SignatureModel::ClassRef(class_ref) => {
                // The referenced class itself, unless platform; platform
                // references contribute only their arguments.
                if !is_platform(&class_ref.name) {
                    dependencies.insert(class_ref.resolve()?);
                }
                for argument in &class_ref.type_arguments {
                    argument.collect_dependencies(dependencies)?;
                }
                Ok(())
            }
            SignatureModel::TypeVariable(variable) => {
                // Only the first class bound of the resolved parameter is
                // chased; further interface bounds are out of scope.
                let parameter = variable.resolve()?;
                if let Some(bound) = parameter.bounds().iter().find(|bound| bound.is_class_ref())
                {
                    bound.collect_dependencies(dependencies)?;
                }
                Ok(())
            }
            SignatureModel::TypeArgument(argument) => {
                for bound in &argument.bounds {
                    bound.collect_dependencies(dependencies)?;
                }
                Ok(())
            }
            SignatureModel::TypeParameter(parameter) => {
                for bound in &parameter.bounds {
                    bound.collect_dependencies(dependencies)?;
                }
                Ok(())
            }
        }
    }
}

impl Model for SignatureModel {
    fn origin_kind(&self) -> OriginKind {
        match self {
            SignatureModel::Base(base) => base.origin_kind,
            SignatureModel::Array(array) => array.origin_kind,
            SignatureModel::ClassRef(class_ref) => class_ref.origin_kind,
            SignatureModel::TypeVariable(variable) => variable.origin_kind,
            SignatureModel::TypeArgument(argument) => argument.origin_kind,
            SignatureModel::TypeParameter(parameter) => parameter.origin_kind,
        }
    }

    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
        let mut dependencies = IndexSet::new();
        self.collect_dependencies(&mut dependencies)?;
        Ok(dependencies)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl std::fmt::Display for SignatureModel {
    /// Source-form rendering, for logs and error messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureModel::Base(base) => write!(f, "{}", base.primitive.keyword()),
            SignatureModel::Array(array) => write!(f, "{}[]", array.nested),
            SignatureModel::ClassRef(class_ref) => {
                write!(f, "{}", class_ref.name)?;
                if !class_ref.type_arguments.is_empty() {
                    write!(f, "<")?;
                    for (index, argument) in class_ref.type_arguments.iter().enumerate() {
                        if index > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{argument}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            SignatureModel::TypeVariable(variable) => write!(f, "{}", variable.name),
            SignatureModel::TypeArgument(argument) => match argument.wildcard {
                WildcardKind::None => write!(f, "{}", argument.bounds[0]),
                WildcardKind::Any => write!(f, "?"),
                WildcardKind::Extends => {
                    write!(f, "? extends ")?;
                    render_bounds(f, &argument.bounds)
                }
                WildcardKind::Super => {
                    write!(f, "? super ")?;
                    render_bounds(f, &argument.bounds)
                }
            },
            SignatureModel::TypeParameter(parameter) => write!(f, "{}", parameter.name),
        }
    }
}

fn render_bounds(
    f: &mut std::fmt::Formatter<'_>,
    bounds: &[SignatureModel],
) -> std::fmt::Result {
    for (index, bound) in bounds.iter().enumerate() {
        if index > 0 {
            write!(f, " & ")?;
        }
        write!(f, "{bound}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::descriptor::parse_descriptor;
    use crate::origin::scan::{ScanClass, ScanField, ScanTypeParameter};

    fn runtime_signature(ty: RuntimeType) -> SignatureModel {
        SignatureModel::of(
            TypeOccurrence::Runtime(ty, RuntimeUniverse::new()),
            SignatureParent::None,
        )
        .unwrap()
    }

    fn scan_signature(descriptor: &str) -> SignatureModel {
        SignatureModel::of(
            TypeOccurrence::Scan(parse_descriptor(descriptor).unwrap(), ScanUniverse::new()),
            SignatureParent::None,
        )
        .unwrap()
    }

    fn kind_flags(signature: &SignatureModel) -> Vec<bool> {
        vec![
            signature.is_base(),
            signature.is_array(),
            signature.is_class_ref(),
            signature.is_type_variable(),
            signature.is_type_argument(),
            signature.is_type_parameter(),
        ]
    }

    #[test]
    fn test_exactly_one_kind_predicate() {
        let samples = vec![
            runtime_signature(RuntimeType::Primitive(PrimitiveKind::Int)),
            runtime_signature(RuntimeType::Array(Box::new(RuntimeType::Primitive(
                PrimitiveKind::Byte,
            )))),
            runtime_signature(RuntimeType::class("com.acme.Pet")),
            runtime_signature(RuntimeType::Variable("T".to_string())),
            scan_signature("Ljava/util/List<Lcom/acme/Pet;>;")
                .as_class_ref()
                .unwrap()
                .type_arguments()[0]
                .clone(),
            SignatureModel::TypeParameter(
                TypeParameterModel::of_runtime(
                    &RuntimeTypeParameter {
                        name: "T".to_string(),
                        ..Default::default()
                    },
                    &RuntimeUniverse::new(),
                    &SignatureParent::None,
                )
                .unwrap(),
            ),
        ];
        for signature in samples {
            let true_flags = kind_flags(&signature).into_iter().filter(|flag| *flag).count();
            assert_eq!(true_flags, 1, "exactly one kind for {signature}");
        }
    }

    #[test]
    fn test_cross_origin_signature_equality() {
        let from_runtime = runtime_signature(RuntimeType::Class(RuntimeClassRef {
            name: "java.util.Map".to_string(),
            type_arguments: vec![
                RuntimeType::class("java.lang.String"),
                RuntimeType::class("com.acme.Pet"),
            ],
            ..Default::default()
        }));
        let from_scan =
            scan_signature("Ljava/util/Map<Ljava/lang/String;Lcom/acme/Pet;>;");
        assert_eq!(from_runtime, from_scan);
        assert!(from_runtime.is_runtime());
        assert!(from_scan.is_scan());
    }

    #[test]
    fn test_primitive_predicates_and_boxing() {
        let primitive = runtime_signature(RuntimeType::Primitive(PrimitiveKind::Int));
        assert!(primitive.is_integer());
        assert!(primitive.is_primitive());
        assert!(primitive.has_integer_type());
        assert!(!primitive.has_float_type());

        let boxed = scan_signature("Ljava/lang/Integer;");
        assert!(boxed.is_integer());
        assert!(!boxed.is_primitive());
        assert!(boxed.has_integer_type());

        let void = scan_signature("V");
        assert!(void.is_void());
        assert!(void.is_primitive());
        assert!(!void.has_integer_type());
    }

    #[test]
    fn test_semantic_predicates() {
        assert!(scan_signature("Ljava/lang/String;").is_string());
        assert!(scan_signature("Ljava/util/HashMap<Ljava/lang/String;Ljava/lang/Integer;>;").is_map());
        assert!(scan_signature("Ljava/util/Optional<Lcom/acme/Pet;>;").is_optional());
        assert!(scan_signature("Ljava/util/ArrayList<Lcom/acme/Pet;>;").is_iterable());
        assert!(scan_signature("Ljava/util/Date;").is_date());
        assert!(scan_signature("Ljava/time/LocalDate;").is_date());
        assert!(!scan_signature("Ljava/time/LocalDateTime;").is_date());
        assert!(scan_signature("Ljava/time/LocalDateTime;").is_date_time());
        assert!(scan_signature("Ljava/time/Instant;").is_date_time());
        assert!(!scan_signature("Lcom/acme/Pet;").is_string());
    }

    #[test]
    fn test_custom_class_assignability_through_supertypes() {
        let universe = ScanUniverse::new();
        universe
            .add(ScanClass {
                name: "com.acme.PetList".to_string(),
                superclass: Some("Ljava/util/ArrayList<Lcom/acme/Pet;>;".to_string()),
                ..Default::default()
            })
            .unwrap();
        let signature = SignatureModel::of(
            TypeOccurrence::Scan(
                parse_descriptor("Lcom/acme/PetList;").unwrap(),
                universe,
            ),
            SignatureParent::None,
        )
        .unwrap();
        assert!(signature.is_iterable());
        assert!(!signature.is_map());
    }

    #[test]
    fn test_wildcard_extends_object_is_any() {
        let from_scan = scan_signature("Ljava/util/List<+Ljava/lang/Object;>;");
        let argument = from_scan.as_class_ref().unwrap().type_arguments()[0]
            .as_type_argument()
            .unwrap();
        assert_eq!(argument.wildcard(), WildcardKind::Any);
        assert!(argument.bounds().is_empty());

        let from_runtime = runtime_signature(RuntimeType::Class(RuntimeClassRef {
            name: "java.util.List".to_string(),
            type_arguments: vec![RuntimeType::Wildcard {
                upper: vec![RuntimeType::class("java.lang.Object")],
                lower: vec![],
            }],
            ..Default::default()
        }));
        let argument = from_runtime.as_class_ref().unwrap().type_arguments()[0]
            .as_type_argument()
            .unwrap();
        assert_eq!(argument.wildcard(), WildcardKind::Any);
        assert_eq!(from_runtime, from_scan);
    }

    #[test]
    fn test_wildcard_kinds() {
        let extends = scan_signature("Ljava/util/List<+Lcom/acme/Pet;>;");
        assert_eq!(
            extends.as_class_ref().unwrap().type_arguments()[0]
                .as_type_argument()
                .unwrap()
                .wildcard(),
            WildcardKind::Extends
        );
        let supers = scan_signature("Ljava/util/List<-Lcom/acme/Pet;>;");
        assert_eq!(
            supers.as_class_ref().unwrap().type_arguments()[0]
                .as_type_argument()
                .unwrap()
                .wildcard(),
            WildcardKind::Super
        );
    }

    #[test]
    fn test_class_ref_dependencies_skip_platform() {
        let universe = ScanUniverse::new();
        universe
            .add(ScanClass {
                name: "com.acme.Pet".to_string(),
                ..Default::default()
            })
            .unwrap();
        let signature = SignatureModel::of(
            TypeOccurrence::Scan(
                parse_descriptor("Ljava/util/List<Lcom/acme/Pet;>;").unwrap(),
                universe,
            ),
            SignatureParent::None,
        )
        .unwrap();
        let dependencies = signature.dependencies().unwrap();
        let names: Vec<&str> = dependencies.iter().map(|model| model.name()).collect();
        assert_eq!(names, vec!["com.acme.Pet"]);
    }

    #[test]
    fn test_class_ref_resolution_failure_propagates() {
        let signature = scan_signature("Lcom/acme/Missing;");
        let err = signature.dependencies().unwrap_err();
        assert!(matches!(err, PrismError::Resolution(name) if name == "com.acme.Missing"));
    }

    #[test]
    fn test_set_reference_is_write_once() {
        let universe = ScanUniverse::new();
        let pet = universe
            .add(ScanClass {
                name: "com.acme.Pet".to_string(),
                ..Default::default()
            })
            .unwrap();
        let model = ClassInfoModel::of(crate::origin::ClassOrigin::Scan(
            pet,
            Arc::clone(&universe),
        ));
        let class_ref = ClassRefSignatureModel::artificial(Arc::clone(&model));
        let other = universe
            .add(ScanClass {
                name: "com.acme.Other".to_string(),
                ..Default::default()
            })
            .unwrap();
        class_ref.set_reference(ClassInfoModel::of(crate::origin::ClassOrigin::Scan(
            other,
            Arc::clone(&universe),
        )));
        // First write wins.
        assert_eq!(class_ref.resolve().unwrap().name(), "com.acme.Pet");
    }

    #[test]
    fn test_display_renders_source_form() {
        assert_eq!(
            scan_signature("Ljava/util/Map<Ljava/lang/String;[I>;").to_string(),
            "java.util.Map<java.lang.String, int[]>"
        );
        assert_eq!(
            scan_signature("Ljava/util/List<+Lcom/acme/Pet;>;").to_string(),
            "java.util.List<? extends com.acme.Pet>"
        );
        assert_eq!(scan_signature("Ljava/util/List<*>;").to_string(), "java.util.List<?>");
    }

    // The scope limitation is deliberate: a type variable contributes
    // only its first class bound, never the bounds after it.
    #[test]
    fn test_type_variable_first_bound_only() {
        let universe = ScanUniverse::new();
        for name in ["com.acme.Entity", "com.acme.Auditable"] {
            universe
                .add(ScanClass {
                    name: name.to_string(),
                    ..Default::default()
                })
                .unwrap();
        }
        universe
            .add(ScanClass {
                name: "com.acme.Holder".to_string(),
                type_parameters: vec![ScanTypeParameter {
                    name: "T".to_string(),
                    bounds: vec![
                        "Lcom/acme/Entity;".to_string(),
                        "Lcom/acme/Auditable;".to_string(),
                    ],
                    ..Default::default()
                }],
                fields: vec![ScanField {
                    name: "value".to_string(),
                    descriptor: "TT;".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            })
            .unwrap();

        let holder = ClassInfoModel::of(crate::origin::ClassOrigin::Scan(
            universe.lookup("com.acme.Holder").unwrap(),
            Arc::clone(&universe),
        ));
        let field_type = holder.fields().unwrap()[0].ty().unwrap().clone();
        assert!(field_type.is_type_variable());
        let resolved = field_type.as_type_variable().unwrap().resolve().unwrap();
        assert_eq!(resolved.name(), "T");
        assert_eq!(resolved.bounds().len(), 2);

        let names: Vec<String> = field_type
            .dependencies()
            .unwrap()
            .iter()
            .map(|model| model.name().to_string())
            .collect();
        assert_eq!(names, vec!["com.acme.Entity"]);
    }

    #[test]
    fn test_method_type_parameter_resolution() {
        let universe = ScanUniverse::new();
        universe
            .add(ScanClass {
                name: "com.acme.Mapper".to_string(),
                methods: vec![crate::origin::scan::ScanMethod {
                    name: "map".to_string(),
                    returns: "TR;".to_string(),
                    type_parameters: vec![ScanTypeParameter {
                        name: "R".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            })
            .unwrap();
        let mapper = ClassInfoModel::of(crate::origin::ClassOrigin::Scan(
            universe.lookup("com.acme.Mapper").unwrap(),
            Arc::clone(&universe),
        ));
        let method = Arc::clone(&mapper.methods().unwrap()[0]);
        let return_type = method.return_type().unwrap();
        let resolved = return_type.as_type_variable().unwrap().resolve().unwrap();
        assert_eq!(resolved.name(), "R");
        assert!(resolved.bounds().is_empty());
    }

    #[test]
    fn test_wildcard_outside_argument_slot_is_unsupported() {
        let err = SignatureModel::of(
            TypeOccurrence::Runtime(
                RuntimeType::Wildcard {
                    upper: vec![],
                    lower: vec![],
                },
                RuntimeUniverse::new(),
            ),
            SignatureParent::None,
        )
        .unwrap_err();
        assert!(matches!(err, PrismError::UnsupportedType(_)));
    }
}
