//! Dependency closure over class models, and annotated-root lookup.
//!
//! These are the two narrow interfaces the surrounding generation
//! pipeline consumes: find the entry-point classes, then compute the
//! full, deduplicated set of custom classes reachable from them.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::{debug, info};

use crate::errors::{PrismError, PrismResult};
use crate::model::class_info::ClassInfoModel;
use crate::model::Model;
use crate::origin::Universe;

/// Hard cap on distinct classes one closure computation may visit.
/// Exceeding it is an error, never a silent truncation.
pub const MAX_CLOSURE_CLASSES: usize = 10_000;

/// Compute the transitive set of non-platform classes reachable from
/// `roots` by following declared field types, method parameter and return
/// types, superclasses, interfaces, and inner classes.
///
/// The result is deduplicated across origins (models are keyed by
/// fully-qualified name) and kept in stable first-discovered order: roots
/// first, then breadth-first discovery order. Termination is guaranteed
/// by the seen-set; each class is expanded at most once. Any class that
/// cannot be materialized from its origin aborts the whole computation —
/// there are no partial results.
pub fn closure_of(
    roots: &[Arc<ClassInfoModel>],
) -> PrismResult<IndexSet<Arc<ClassInfoModel>>> {
    let mut seen: IndexSet<Arc<ClassInfoModel>> = IndexSet::new();
    let mut queue: VecDeque<Arc<ClassInfoModel>> = VecDeque::new();

    for root in roots {
        if seen.insert(Arc::clone(root)) {
            queue.push_back(Arc::clone(root));
        }
    }

    while let Some(current) = queue.pop_front() {
        for dependency in current.dependencies()? {
            if seen.insert(Arc::clone(&dependency)) {
                if seen.len() > MAX_CLOSURE_CLASSES {
                    return Err(PrismError::GraphLimit(format!(
                        "dependency closure exceeded {MAX_CLOSURE_CLASSES} classes"
                    )));
                }
                debug!(
                    "closure discovered `{}` via `{}`",
                    dependency.name(),
                    current.name()
                );
                queue.push_back(dependency);
            }
        }
    }

    info!(
        "dependency closure complete: {} classes from {} roots",
        seen.len(),
        roots.len()
    );
    Ok(seen)
}

/// Find entry-point classes carrying the given annotation, as models, in
/// sorted-name order.
pub fn annotated_roots(
    universe: &Universe,
    annotation_name: &str,
) -> PrismResult<Vec<Arc<ClassInfoModel>>> {
    let mut roots = Vec::new();
    for name in universe.class_names() {
        let model = ClassInfoModel::of(universe.find_class(&name)?);
        if model
            .annotations()
            .iter()
            .any(|annotation| annotation.name() == annotation_name)
        {
            roots.push(model);
        }
    }
    info!(
        "annotated root lookup found {} classes for `{annotation_name}`",
        roots.len()
    );
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::runtime::{
        RuntimeAnnotation, RuntimeClass, RuntimeField, RuntimeType, RuntimeUniverse,
    };
    use crate::origin::scan::{ScanClass, ScanField, ScanUniverse};
    use crate::origin::{ClassOrigin, Modifiers};

    fn runtime_class_with_field(name: &str, field_type: &str) -> RuntimeClass {
        RuntimeClass {
            name: name.to_string(),
            fields: vec![RuntimeField {
                name: "value".to_string(),
                ty: RuntimeType::class(field_type),
                modifiers: Modifiers::default(),
                annotations: vec![],
            }],
            ..Default::default()
        }
    }

    fn runtime_model(
        universe: &Arc<RuntimeUniverse>,
        name: &str,
    ) -> Arc<ClassInfoModel> {
        ClassInfoModel::of(ClassOrigin::Runtime(
            universe.lookup(name).unwrap(),
            Arc::clone(universe),
        ))
    }

    fn names(closure: &IndexSet<Arc<ClassInfoModel>>) -> Vec<&str> {
        closure.iter().map(|model| model.name()).collect()
    }

    #[test]
    fn test_closure_completeness() {
        let universe = RuntimeUniverse::new();
        universe.register(runtime_class_with_field("com.acme.A", "com.acme.B"));
        universe.register(runtime_class_with_field("com.acme.B", "com.acme.C"));
        universe.register(RuntimeClass {
            name: "com.acme.C".to_string(),
            ..Default::default()
        });
        // Unreachable from A; must not appear.
        universe.register(RuntimeClass {
            name: "com.acme.Stray".to_string(),
            ..Default::default()
        });

        let closure = closure_of(&[runtime_model(&universe, "com.acme.A")]).unwrap();
        assert_eq!(names(&closure), vec!["com.acme.A", "com.acme.B", "com.acme.C"]);
    }

    #[test]
    fn test_closure_idempotence() {
        let universe = RuntimeUniverse::new();
        universe.register(runtime_class_with_field("com.acme.A", "com.acme.B"));
        universe.register(runtime_class_with_field("com.acme.B", "com.acme.C"));
        universe.register(RuntimeClass {
            name: "com.acme.C".to_string(),
            ..Default::default()
        });

        let first = closure_of(&[runtime_model(&universe, "com.acme.A")]).unwrap();
        let as_roots: Vec<Arc<ClassInfoModel>> = first.iter().cloned().collect();
        let second = closure_of(&as_roots).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cyclic_graph_terminates() {
        let universe = RuntimeUniverse::new();
        universe.register(runtime_class_with_field("com.acme.Employee", "com.acme.Company"));
        universe.register(RuntimeClass {
            name: "com.acme.Company".to_string(),
            fields: vec![RuntimeField {
                name: "employees".to_string(),
                ty: RuntimeType::Class(crate::origin::runtime::RuntimeClassRef {
                    name: "java.util.List".to_string(),
                    type_arguments: vec![RuntimeType::class("com.acme.Employee")],
                    ..Default::default()
                }),
                modifiers: Modifiers::default(),
                annotations: vec![],
            }],
            ..Default::default()
        });

        let closure = closure_of(&[runtime_model(&universe, "com.acme.Employee")]).unwrap();
        assert_eq!(names(&closure), vec!["com.acme.Employee", "com.acme.Company"]);
    }

    #[test]
    fn test_cross_origin_deduplication() {
        let runtime_universe = RuntimeUniverse::new();
        runtime_universe.register(runtime_class_with_field("com.acme.A", "com.acme.Shared"));
        runtime_universe.register(RuntimeClass {
            name: "com.acme.Shared".to_string(),
            ..Default::default()
        });

        let scan_universe = ScanUniverse::new();
        scan_universe
            .add(ScanClass {
                name: "com.acme.B".to_string(),
                fields: vec![ScanField {
                    name: "value".to_string(),
                    descriptor: "Lcom/acme/Shared;".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            })
            .unwrap();
        scan_universe
            .add(ScanClass {
                name: "com.acme.Shared".to_string(),
                ..Default::default()
            })
            .unwrap();

        let root_a = runtime_model(&runtime_universe, "com.acme.A");
        let root_b = ClassInfoModel::of(ClassOrigin::Scan(
            scan_universe.lookup("com.acme.B").unwrap(),
            Arc::clone(&scan_universe),
        ));

        let closure = closure_of(&[root_a, root_b]).unwrap();
        // `Shared` is discovered from both origins but appears once.
        assert_eq!(names(&closure), vec!["com.acme.A", "com.acme.B", "com.acme.Shared"]);
        let shared = closure
            .iter()
            .find(|model| model.name() == "com.acme.Shared")
            .unwrap();
        assert!(shared.is_runtime());
    }

    #[test]
    fn test_unresolvable_dependency_aborts_whole_closure() {
        let universe = RuntimeUniverse::new();
        universe.register(runtime_class_with_field("com.acme.A", "com.acme.Missing"));

        let err = closure_of(&[runtime_model(&universe, "com.acme.A")]).unwrap_err();
        assert!(matches!(err, PrismError::Resolution(name) if name == "com.acme.Missing"));
    }

    #[test]
    fn test_closure_guard_limit() {
        let universe = RuntimeUniverse::new();
        let count = MAX_CLOSURE_CLASSES + 2;
        for index in 0..count {
            let next = format!("com.acme.gen.C{}", (index + 1) % count);
            universe.register(runtime_class_with_field(
                &format!("com.acme.gen.C{index}"),
                &next,
            ));
        }
        let err = closure_of(&[runtime_model(&universe, "com.acme.gen.C0")]).unwrap_err();
        assert!(matches!(err, PrismError::GraphLimit(_)));
    }

    #[test]
    fn test_annotated_roots() {
        let universe = RuntimeUniverse::new();
        universe.register(RuntimeClass {
            name: "com.acme.PetEndpoint".to_string(),
            annotations: vec![RuntimeAnnotation::marker("com.acme.Endpoint")],
            ..Default::default()
        });
        universe.register(RuntimeClass {
            name: "com.acme.AdminEndpoint".to_string(),
            annotations: vec![RuntimeAnnotation::marker("com.acme.Endpoint")],
            ..Default::default()
        });
        universe.register(RuntimeClass {
            name: "com.acme.Helper".to_string(),
            ..Default::default()
        });

        let roots =
            annotated_roots(&Universe::Runtime(universe), "com.acme.Endpoint").unwrap();
        let root_names: Vec<&str> = roots.iter().map(|model| model.name()).collect();
        assert_eq!(root_names, vec!["com.acme.AdminEndpoint", "com.acme.PetEndpoint"]);
    }
}
