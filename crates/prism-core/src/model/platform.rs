//! Platform-class tables.
//!
//! The platform split drives the whole closure: platform classes are
//! never chased as dependencies, and the semantic signature predicates
//! (is-string, is-map, is-date, ...) are defined by assignability to a
//! small fixed set of platform classes. The scan origin cannot
//! materialize platform classes, so assignability against platform
//! targets walks a static supertype table by name.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::LazyLock;

use crate::origin::PrimitiveKind;

// ---------------------------------------------------------------------------
// Platform package prefixes
// ---------------------------------------------------------------------------

/// Package prefixes owned by the platform / vendor runtime.
pub const PLATFORM_PREFIXES: &[&str] = &["java", "com.sun", "sun", "oracle", "org.xml", "com.oracle"];

/// Whether a fully-qualified name belongs to the platform.
///
/// Raw prefix match over the fixed list (so `javax.` is covered by the
/// `java` prefix). Pure function, no state.
pub fn is_platform(name: &str) -> bool {
    PLATFORM_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

// ---------------------------------------------------------------------------
// Predicate class sets
// ---------------------------------------------------------------------------

/// Boxed counterparts of the primitives.
pub static BOXED_PRIMITIVES: LazyLock<HashMap<&'static str, PrimitiveKind>> = LazyLock::new(|| {
    HashMap::from([
        ("java.lang.Boolean", PrimitiveKind::Boolean),
        ("java.lang.Byte", PrimitiveKind::Byte),
        ("java.lang.Character", PrimitiveKind::Char),
        ("java.lang.Short", PrimitiveKind::Short),
        ("java.lang.Integer", PrimitiveKind::Int),
        ("java.lang.Long", PrimitiveKind::Long),
        ("java.lang.Float", PrimitiveKind::Float),
        ("java.lang.Double", PrimitiveKind::Double),
        ("java.lang.Void", PrimitiveKind::Void),
    ])
});

pub const STRING_CLASSES: &[&str] = &["java.lang.String", "java.lang.CharSequence"];
pub const MAP_CLASSES: &[&str] = &["java.util.Map"];
pub const OPTIONAL_CLASSES: &[&str] = &["java.util.Optional"];
pub const ITERABLE_CLASSES: &[&str] = &["java.lang.Iterable"];
pub const DATE_CLASSES: &[&str] = &["java.util.Date", "java.time.LocalDate"];
pub const DATE_TIME_CLASSES: &[&str] = &[
    "java.time.LocalDateTime",
    "java.time.Instant",
    "java.time.LocalTime",
];

// ---------------------------------------------------------------------------
// Platform assignability
// ---------------------------------------------------------------------------

/// Direct supertypes of well-known platform types.
static PLATFORM_SUPERTYPES: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        HashMap::from([
            ("java.lang.String", &["java.lang.CharSequence"] as &[&str]),
            ("java.lang.StringBuilder", &["java.lang.CharSequence"]),
            ("java.util.Collection", &["java.lang.Iterable"]),
            ("java.util.List", &["java.util.Collection"]),
            ("java.util.Set", &["java.util.Collection"]),
            ("java.util.SortedSet", &["java.util.Set"]),
            ("java.util.ArrayList", &["java.util.List"]),
            ("java.util.LinkedList", &["java.util.List"]),
            ("java.util.HashSet", &["java.util.Set"]),
            ("java.util.LinkedHashSet", &["java.util.HashSet"]),
            ("java.util.TreeSet", &["java.util.SortedSet"]),
            ("java.util.SortedMap", &["java.util.Map"]),
            ("java.util.HashMap", &["java.util.Map"]),
            ("java.util.LinkedHashMap", &["java.util.HashMap"]),
            ("java.util.TreeMap", &["java.util.SortedMap"]),
            ("java.sql.Date", &["java.util.Date"]),
            ("java.sql.Timestamp", &["java.util.Date"]),
        ])
    });

/// Whether the platform type `name` is assignable to any of `targets`,
/// walking the static supertype table.
pub fn platform_assignable(name: &str, targets: &[&str]) -> bool {
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(name);
    let mut visited = vec![name];
    while let Some(current) = queue.pop_front() {
        if targets.contains(&current) {
            return true;
        }
        if let Some(supertypes) = PLATFORM_SUPERTYPES.get(current) {
            for supertype in *supertypes {
                if !visited.contains(supertype) {
                    visited.push(supertype);
                    queue.push_back(supertype);
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_prefixes() {
        assert!(is_platform("java.util.Date"));
        assert!(is_platform("javax.annotation.Nullable"));
        assert!(is_platform("com.sun.management.OperatingSystemMXBean"));
        assert!(is_platform("org.xml.sax.Parser"));
        assert!(!is_platform("com.acme.Pet"));
        assert!(!is_platform("org.acme.Pet"));
    }

    #[test]
    fn test_platform_assignable_walks_table() {
        assert!(platform_assignable("java.util.ArrayList", ITERABLE_CLASSES));
        assert!(platform_assignable("java.util.TreeMap", MAP_CLASSES));
        assert!(platform_assignable("java.sql.Timestamp", DATE_CLASSES));
        assert!(platform_assignable("java.lang.String", STRING_CLASSES));
        assert!(!platform_assignable("java.util.ArrayList", MAP_CLASSES));
        assert!(!platform_assignable("java.lang.Object", ITERABLE_CLASSES));
    }

    #[test]
    fn test_boxed_primitives() {
        assert_eq!(
            BOXED_PRIMITIVES.get("java.lang.Integer"),
            Some(&PrimitiveKind::Int)
        );
        assert!(!BOXED_PRIMITIVES.contains_key("java.lang.String"));
    }
}
