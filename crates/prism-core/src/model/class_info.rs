//! Class declaration models.
//!
//! A [`ClassInfoModel`] represents a class *declaration* (as opposed to a
//! type occurrence, which is a signature). Substructure — annotations,
//! members, superclass, inheritance chain, dependencies — is computed at
//! most once per node and cached; nodes are otherwise immutable.
//! Equality and hashing use the fully-qualified name only, so models of
//! the same class from different origins are interchangeable.

use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexSet;

use crate::errors::PrismResult;
use crate::origin::descriptor::parse_descriptor;
use crate::origin::runtime::RuntimeType;
use crate::origin::{
    AnnotationOrigin, ClassKind, ClassOrigin, FieldOrigin, MethodOrigin, Modifiers, OriginKind,
    TypeOccurrence, Universe, Visibility,
};

use super::annotation::AnnotationInfoModel;
use super::members::{FieldInfoModel, MethodInfoModel, PropertyInfoModel};
use super::platform::{is_platform, platform_assignable};
use super::signature::{SignatureModel, TypeParameterModel};
use super::{try_cache, upgrade, Model, SignatureParent};

// ---------------------------------------------------------------------------
// Package model
// ---------------------------------------------------------------------------

/// The package a class belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackageInfoModel {
    name: String,
}

impl PackageInfoModel {
    /// Dotted package name; empty for the default package.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for PackageInfoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// Class model
// ---------------------------------------------------------------------------

/// Origin-agnostic model of a class declaration.
pub struct ClassInfoModel {
    origin: ClassOrigin,
    name: String,
    self_weak: Weak<ClassInfoModel>,
    annotations: OnceLock<Vec<AnnotationInfoModel>>,
    type_parameters: OnceLock<Vec<TypeParameterModel>>,
    superclass_signature: OnceLock<Option<SignatureModel>>,
    superclass: OnceLock<Option<Arc<ClassInfoModel>>>,
    interfaces: OnceLock<Vec<SignatureModel>>,
    fields: OnceLock<Vec<Arc<FieldInfoModel>>>,
    methods: OnceLock<Vec<Arc<MethodInfoModel>>>,
    inner_classes: OnceLock<Vec<Arc<ClassInfoModel>>>,
    chain: OnceLock<Vec<Arc<ClassInfoModel>>>,
    properties: OnceLock<Vec<Arc<PropertyInfoModel>>>,
    dependencies: OnceLock<IndexSet<Arc<ClassInfoModel>>>,
}

impl ClassInfoModel {
    /// Model for a class origin token. Construction is cheap; everything
    /// else is computed on demand.
    pub fn of(origin: ClassOrigin) -> Arc<Self> {
        let name = origin.name().to_string();
        assert!(!name.is_empty(), "class origin with empty name");
        Arc::new_cyclic(|self_weak| ClassInfoModel {
            origin,
            name,
            self_weak: self_weak.clone(),
            annotations: OnceLock::new(),
            type_parameters: OnceLock::new(),
            superclass_signature: OnceLock::new(),
            superclass: OnceLock::new(),
            interfaces: OnceLock::new(),
            fields: OnceLock::new(),
            methods: OnceLock::new(),
            inner_classes: OnceLock::new(),
            chain: OnceLock::new(),
            properties: OnceLock::new(),
            dependencies: OnceLock::new(),
        })
    }

    /// Resolve a class model by qualified name from a universe.
    pub fn of_name(name: &str, universe: &Universe) -> PrismResult<Arc<Self>> {
        Ok(ClassInfoModel::of(universe.find_class(name)?))
    }

    /// Fully-qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unqualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn package(&self) -> PackageInfoModel {
        let name = match self.name.rfind('.') {
            Some(index) => self.name[..index].to_string(),
            None => String::new(),
        };
        PackageInfoModel { name }
    }

    /// The underlying origin token.
    pub fn origin(&self) -> &ClassOrigin {
        &self.origin
    }

    /// Whether this class belongs to the platform and is therefore never
    /// chased as a dependency.
    pub fn is_platform_class(&self) -> bool {
        is_platform(&self.name)
    }

    // -- Kind flags ----------------------------------------------------------

    fn kind(&self) -> ClassKind {
        match &self.origin {
            ClassOrigin::Runtime(class, _) => class.kind,
            ClassOrigin::Scan(class, _) => class.kind,
        }
    }

    fn modifiers(&self) -> Modifiers {
        match &self.origin {
            ClassOrigin::Runtime(class, _) => class.modifiers,
            ClassOrigin::Scan(class, _) => class.modifiers,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == ClassKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind() == ClassKind::Enum
    }

    pub fn is_annotation(&self) -> bool {
        self.kind() == ClassKind::Annotation
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers().is_abstract
    }

    pub fn is_final(&self) -> bool {
        self.modifiers().is_final
    }

    pub fn is_static(&self) -> bool {
        self.modifiers().is_static
    }

    pub fn is_synthetic(&self) -> bool {
        self.modifiers().is_synthetic
    }

    pub fn is_public(&self) -> bool {
        self.modifiers().visibility == Visibility::Public
    }

    pub fn is_protected(&self) -> bool {
        self.modifiers().visibility == Visibility::Protected
    }

    pub fn is_private(&self) -> bool {
        self.modifiers().visibility == Visibility::Private
    }

    pub fn is_array(&self) -> bool {
        self.name.ends_with("[]")
    }

    // -- Structure -----------------------------------------------------------

    pub fn annotations(&self) -> &[AnnotationInfoModel] {
        self.annotations.get_or_init(|| match &self.origin {
            ClassOrigin::Runtime(class, universe) => class
                .annotations
                .iter()
                .map(|annotation| {
                    AnnotationInfoModel::of(AnnotationOrigin::Runtime(
                        annotation.clone(),
                        Arc::clone(universe),
                    ))
                })
                .collect(),
            ClassOrigin::Scan(class, universe) => class
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

    pub fn type_parameters(&self) -> PrismResult<&[TypeParameterModel]> {
        try_cache(&self.type_parameters, || {
            let parent = SignatureParent::Class(self.self_weak.clone());
            match &self.origin {
                ClassOrigin::Runtime(class, universe) => class
                    .type_parameters
                    .iter()
                    .map(|declaration| TypeParameterModel::of_runtime(declaration, universe, &parent))
                    .collect(),
                ClassOrigin::Scan(class, universe) => class
                    .type_parameters
                    .iter()
                    .map(|declaration| TypeParameterModel::of_scan(declaration, universe, &parent))
                    .collect(),
            }
        })
        .map(Vec::as_slice)
    }

    /// The superclass as a signature, platform superclasses included.
    /// Dependency collection goes through this, so type arguments on a
    /// platform superclass still contribute.
    pub fn superclass_signature(&self) -> PrismResult<Option<&SignatureModel>> {
        try_cache(&self.superclass_signature, || {
            let parent = SignatureParent::Class(self.self_weak.clone());
            match &self.origin {
                ClassOrigin::Runtime(class, universe) => class
                    .superclass
                    .as_ref()
                    .map(|superclass| {
                        SignatureModel::of(
                            TypeOccurrence::Runtime(superclass.clone(), Arc::clone(universe)),
                            parent,
                        )
                    })
                    .transpose(),
                ClassOrigin::Scan(class, universe) => class
                    .superclass
                    .as_deref()
                    .map(|descriptor| {
                        SignatureModel::of(
                            TypeOccurrence::Scan(
                                parse_descriptor(descriptor)?,
                                Arc::clone(universe),
                            ),
                            parent,
                        )
                    })
                    .transpose(),
            }
        })
        .map(Option::as_ref)
    }

    /// The resolved superclass model; absent when there is none or when
    /// the declared superclass is a platform class.
    pub fn superclass(&self) -> PrismResult<Option<Arc<ClassInfoModel>>> {
        try_cache(&self.superclass, || {
            match self.superclass_signature()? {
                Some(SignatureModel::ClassRef(class_ref)) if !is_platform(class_ref.name()) => {
                    Ok(Some(class_ref.resolve()?))
                }
                _ => Ok(None),
            }
        })
        .cloned()
    }

    pub fn interfaces(&self) -> PrismResult<&[SignatureModel]> {
        try_cache(&self.interfaces, || {
            let parent = SignatureParent::Class(self.self_weak.clone());
            match &self.origin {
                ClassOrigin::Runtime(class, universe) => class
                    .interfaces
                    .iter()
                    .map(|interface| {
                        SignatureModel::of(
                            TypeOccurrence::Runtime(interface.clone(), Arc::clone(universe)),
                            parent.clone(),
                        )
                    })
                    .collect(),
                ClassOrigin::Scan(class, universe) => class
                    .interfaces
                    .iter()
                    .map(|descriptor| {
                        SignatureModel::of(
                            TypeOccurrence::Scan(
                                parse_descriptor(descriptor)?,
                                Arc::clone(universe),
                            ),
                            parent.clone(),
                        )
                    })
                    .collect(),
            }
        })
        .map(Vec::as_slice)
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> PrismResult<&[Arc<FieldInfoModel>]> {
        try_cache(&self.fields, || {
            let models = match &self.origin {
                ClassOrigin::Runtime(class, universe) => class
                    .fields
                    .iter()
                    .map(|field| {
                        FieldInfoModel::new(
                            FieldOrigin::Runtime(field.clone(), Arc::clone(universe)),
                            self.self_weak.clone(),
                            self.name.clone(),
                        )
                    })
                    .collect(),
                ClassOrigin::Scan(class, universe) => class
                    .fields
                    .iter()
                    .map(|field| {
                        FieldInfoModel::new(
                            FieldOrigin::Scan(field.clone(), Arc::clone(universe)),
                            self.self_weak.clone(),
                            self.name.clone(),
                        )
                    })
                    .collect(),
            };
            Ok(models)
        })
        .map(Vec::as_slice)
    }

    /// Declared methods, in declaration order.
    pub fn methods(&self) -> PrismResult<&[Arc<MethodInfoModel>]> {
        try_cache(&self.methods, || {
            let models = match &self.origin {
                ClassOrigin::Runtime(class, universe) => class
                    .methods
                    .iter()
                    .map(|method| {
                        MethodInfoModel::new(
                            MethodOrigin::Runtime(method.clone(), Arc::clone(universe)),
                            self.self_weak.clone(),
                            self.name.clone(),
                        )
                    })
                    .collect(),
                ClassOrigin::Scan(class, universe) => class
                    .methods
                    .iter()
                    .map(|method| {
                        MethodInfoModel::new(
                            MethodOrigin::Scan(method.clone(), Arc::clone(universe)),
                            self.self_weak.clone(),
                            self.name.clone(),
                        )
                    })
                    .collect(),
            };
            Ok(models)
        })
        .map(Vec::as_slice)
    }

    /// Directly nested classes, resolved from the active universe. An
    /// inner class missing from the universe is a resolution error.
    pub fn inner_classes(&self) -> PrismResult<&[Arc<ClassInfoModel>]> {
        try_cache(&self.inner_classes, || {
            let universe = self.origin.universe();
            let names: &[String] = match &self.origin {
                ClassOrigin::Runtime(class, _) => &class.inner_classes,
                ClassOrigin::Scan(class, _) => &class.inner_classes,
            };
            names
                .iter()
                .map(|name| ClassInfoModel::of_name(name, &universe))
                .collect()
        })
        .map(Vec::as_slice)
    }

    /// Self plus all non-platform ancestors, self-to-root order.
    pub fn inheritance_chain(&self) -> PrismResult<&[Arc<ClassInfoModel>]> {
        try_cache(&self.chain, || {
            let mut chain = vec![upgrade(&self.self_weak, &self.name)?];
            let mut current = self.superclass()?;
            while let Some(ancestor) = current {
                current = ancestor.superclass()?;
                chain.push(ancestor);
            }
            Ok(chain)
        })
        .map(Vec::as_slice)
    }

    /// Declared fields of self and every chain ancestor, self-first.
    /// Ancestors are visited once each; their members are not folded into
    /// the descendant's declared list.
    pub fn fields_in_chain(&self) -> PrismResult<Vec<Arc<FieldInfoModel>>> {
        let mut members = Vec::new();
        for class in self.inheritance_chain()? {
            members.extend(class.fields()?.iter().cloned());
        }
        Ok(members)
    }

    /// Declared methods of self and every chain ancestor, self-first.
    pub fn methods_in_chain(&self) -> PrismResult<Vec<Arc<MethodInfoModel>>> {
        let mut members = Vec::new();
        for class in self.inheritance_chain()? {
            members.extend(class.methods()?.iter().cloned());
        }
        Ok(members)
    }

    /// Bean-style properties: one per declared instance field, paired
    /// with its public getter when one exists.
    pub fn properties(&self) -> PrismResult<&[Arc<PropertyInfoModel>]> {
        try_cache(&self.properties, || {
            let mut properties = Vec::new();
            for field in self.fields()? {
                if field.is_static() {
                    continue;
                }
                let getter = self
                    .methods()?
                    .iter()
                    .find(|method| {
                        method.is_public()
                            && method.parameter_count() == 0
                            && is_getter_name(method.name(), field.name())
                    })
                    .cloned();
                properties.push(PropertyInfoModel::new(
                    Arc::clone(field),
                    getter,
                    self.self_weak.clone(),
                    self.name.clone(),
                ));
            }
            Ok(properties)
        })
        .map(Vec::as_slice)
    }

    // -- Assignability -------------------------------------------------------

    /// Name-based assignability to any of `targets`, walking declared
    /// supertype names. Platform names route through the static platform
    /// supertype table; unresolvable custom names answer `false`.
    pub fn assignable_to(&self, targets: &[&str]) -> bool {
        let universe = self.origin.universe();
        let mut queue: VecDeque<String> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();
        queue.push_back(self.name.clone());
        visited.insert(self.name.clone());
        while let Some(current) = queue.pop_front() {
            if targets.contains(&current.as_str()) {
                return true;
            }
            if is_platform(&current) {
                if platform_assignable(&current, targets) {
                    return true;
                }
                continue;
            }
            let Ok(origin) = universe.find_class(&current) else {
                continue;
            };
            for supertype in supertype_names(&origin) {
                if visited.insert(supertype.clone()) {
                    queue.push_back(supertype);
                }
            }
        }
        false
    }
}

/// One-hop supertype names of a class origin, platform names included.
fn supertype_names(origin: &ClassOrigin) -> Vec<String> {
    match origin {
        ClassOrigin::Runtime(class, _) => {
            let mut names = Vec::new();
            if let Some(RuntimeType::Class(superclass)) = &class.superclass {
                names.push(superclass.name.clone());
            }
            for interface in &class.interfaces {
                if let RuntimeType::Class(interface) = interface {
                    names.push(interface.name.clone());
                }
            }
            names
        }
        ClassOrigin::Scan(class, _) => {
            let mut names = Vec::new();
            let descriptors = class
                .superclass
                .iter()
                .chain(class.interfaces.iter());
            for descriptor in descriptors {
                // Malformed descriptors surface as hard errors elsewhere;
                // a predicate walk just skips them.
                if let Ok(crate::origin::descriptor::TypeDescriptor::Named(named)) =
                    parse_descriptor(descriptor)
                {
                    names.push(named.name);
                }
            }
            names
        }
    }
}

fn is_getter_name(method_name: &str, field_name: &str) -> bool {
    let mut chars = field_name.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => return false,
    };
    method_name == format!("get{capitalized}") || method_name == format!("is{capitalized}")
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Two class models are equal iff they denote the same fully-qualified
/// name, regardless of origin.
impl PartialEq for ClassInfoModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassInfoModel {}

impl Hash for ClassInfoModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Debug for ClassInfoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassInfoModel(`{}`, {})", self.name, self.origin.kind())
    }
}

impl Model for ClassInfoModel {
    fn origin_kind(&self) -> OriginKind {
        self.origin.kind()
    }

    /// Non-platform classes referenced by declared fields, declared
    /// methods, the superclass, interfaces, and inner classes. One hop.
    fn dependencies(&self) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
        try_cache(&self.dependencies, || {
            let mut dependencies = IndexSet::new();
            for field in self.fields()? {
                field.ty()?.collect_dependencies(&mut dependencies)?;
            }
            for method in self.methods()? {
                method.return_type()?.collect_dependencies(&mut dependencies)?;
                for parameter in method.parameters()? {
                    parameter.ty()?.collect_dependencies(&mut dependencies)?;
                }
            }
            if let Some(superclass) = self.superclass_signature()? {
                superclass.collect_dependencies(&mut dependencies)?;
            }
            for interface in self.interfaces()? {
                interface.collect_dependencies(&mut dependencies)?;
            }
            for inner in self.inner_classes()? {
                dependencies.insert(Arc::clone(inner));
            }
            Ok(dependencies)
        })
        .cloned()
    }
}
