//! Prism core library — dual-origin class introspection models and the
//! dependency-closure algorithm a schema generator runs over them.
//!
//! Two metadata origins produce interchangeable models: a runtime
//! universe registered by live introspection, and a scan universe loaded
//! from a static scan of compiled artifacts. Signature models classify
//! each type occurrence, structural models expose class shape, and the
//! closure walks fields, method signatures, superclasses, interfaces,
//! and inner classes to the full set of reachable custom classes.

pub mod closure;
pub mod errors;
pub mod model;
pub mod origin;

pub use closure::{annotated_roots, closure_of, MAX_CLOSURE_CLASSES};
pub use errors::{PrismError, PrismResult};
pub use model::annotation::{
    AnnotationInfoModel, AnnotationParameterModel, AnnotationValueModel, ClassLiteralValue,
};
pub use model::class_info::{ClassInfoModel, PackageInfoModel};
pub use model::members::{
    FieldInfoModel, MethodInfoModel, MethodParameterInfoModel, PropertyInfoModel,
};
pub use model::platform::{is_platform, PLATFORM_PREFIXES};
pub use model::signature::{
    ArraySignatureModel, BaseSignatureModel, ClassRefSignatureModel, SignatureModel,
    TypeArgumentModel, TypeParameterModel, TypeVariableSignatureModel, WildcardKind,
};
pub use model::{Model, SignatureParent};
pub use origin::{
    AnnotationOrigin, ClassKind, ClassOrigin, FieldOrigin, MethodOrigin, Modifiers, OriginKind,
    ParameterOrigin, PrimitiveKind, TypeOccurrence, Universe, Visibility,
};
