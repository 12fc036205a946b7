//! JVM type-signature descriptor parsing for the scan origin.
//!
//! The external scanner reads these straight out of compiled class files:
//! `Ljava/util/Map<Ljava/lang/String;Lcom/acme/Pet;>;`, `[I`, `TT;`,
//! `+Lcom/acme/Pet;`. A recursive-descent cursor turns one descriptor
//! into a [`TypeDescriptor`] tree; binary names (`java/util/Map`) are
//! normalized to dotted qualified names on the way out, and nested
//! suffixes (`Louter/Out<TX;>.In<TY;>;`) keep their enclosing reference.

use crate::errors::{PrismError, PrismResult};

use super::PrimitiveKind;

// ---------------------------------------------------------------------------
// Parsed shape
// ---------------------------------------------------------------------------

/// Parsed shape of a single scanned type occurrence.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeDescriptor {
    /// Primitive or `void`.
    Primitive(PrimitiveKind),
    /// Class reference, possibly parameterized and nested.
    Named(NamedDescriptor),
    /// Array with a component descriptor.
    Array(Box<TypeDescriptor>),
    /// Type-variable reference (`TT;`).
    Variable(String),
    /// Wildcard argument slot. `upper` for `+`, `lower` for `-`, neither
    /// for `*`.
    Wildcard {
        upper: Option<Box<TypeDescriptor>>,
        lower: Option<Box<TypeDescriptor>>,
    },
}

/// A class reference inside a descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedDescriptor {
    /// Dotted fully-qualified name, nested segments included
    /// (`com.acme.Outer.Inner`).
    pub name: String,
    pub arguments: Vec<TypeDescriptor>,
    /// Enclosing reference for nested suffixes.
    pub owner: Option<Box<NamedDescriptor>>,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    fn expect(&mut self, expected: u8) -> PrismResult<()> {
        match self.bump() {
            Some(byte) if byte == expected => Ok(()),
            _ => Err(self.error(&format!("expected `{}`", expected as char))),
        }
    }

    fn error(&self, message: &str) -> PrismError {
        PrismError::Descriptor(format!(
            "{message} at byte {} in `{}`",
            self.pos, self.input
        ))
    }

    /// Consume one identifier segment.
    fn ident(&mut self) -> PrismResult<String> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(self.input[start..self.pos].to_string())
    }
}

/// Parse one complete descriptor. Trailing input is an error.
pub fn parse_descriptor(input: &str) -> PrismResult<TypeDescriptor> {
    let mut cursor = Cursor::new(input);
    let descriptor = parse_type(&mut cursor)?;
    if cursor.pos != cursor.bytes.len() {
        return Err(cursor.error("trailing input"));
    }
    Ok(descriptor)
}

fn parse_type(cursor: &mut Cursor<'_>) -> PrismResult<TypeDescriptor> {
    match cursor.peek() {
        Some(b'[') => {
            cursor.bump();
            Ok(TypeDescriptor::Array(Box::new(parse_type(cursor)?)))
        }
        Some(b'T') => {
            cursor.bump();
            let name = cursor.ident()?;
            cursor.expect(b';')?;
            Ok(TypeDescriptor::Variable(name))
        }
        Some(b'L') => parse_class_ref(cursor),
        Some(byte) => {
            if let Some(primitive) = primitive_for(byte) {
                cursor.bump();
                Ok(TypeDescriptor::Primitive(primitive))
            } else {
                Err(cursor.error(&format!("unexpected `{}`", byte as char)))
            }
        }
        None => Err(cursor.error("unexpected end of descriptor")),
    }
}

fn primitive_for(byte: u8) -> Option<PrimitiveKind> {
    match byte {
        b'Z' => Some(PrimitiveKind::Boolean),
        b'B' => Some(PrimitiveKind::Byte),
        b'C' => Some(PrimitiveKind::Char),
        b'S' => Some(PrimitiveKind::Short),
        b'I' => Some(PrimitiveKind::Int),
        b'J' => Some(PrimitiveKind::Long),
        b'F' => Some(PrimitiveKind::Float),
        b'D' => Some(PrimitiveKind::Double),
        b'V' => Some(PrimitiveKind::Void),
        _ => None,
    }
}

fn parse_class_ref(cursor: &mut Cursor<'_>) -> PrismResult<TypeDescriptor> {
    cursor.expect(b'L')?;

    let mut name = cursor.ident()?;
    while cursor.peek() == Some(b'/') {
        cursor.bump();
        name.push('.');
        name.push_str(&cursor.ident()?);
    }
    let arguments = parse_optional_arguments(cursor)?;
    let mut node = NamedDescriptor {
        name,
        arguments,
        owner: None,
    };

    // Nested suffixes: each one becomes the new reference, owning the
    // previous.
    while cursor.peek() == Some(b'.') {
        cursor.bump();
        let segment = cursor.ident()?;
        let arguments = parse_optional_arguments(cursor)?;
        node = NamedDescriptor {
            name: format!("{}.{}", node.name, segment),
            arguments,
            owner: Some(Box::new(node)),
        };
    }

    cursor.expect(b';')?;
    Ok(TypeDescriptor::Named(node))
}

fn parse_optional_arguments(cursor: &mut Cursor<'_>) -> PrismResult<Vec<TypeDescriptor>> {
    let mut arguments = Vec::new();
    if cursor.peek() != Some(b'<') {
        return Ok(arguments);
    }
    cursor.bump();
    loop {
        match cursor.peek() {
            Some(b'>') => {
                cursor.bump();
                break;
            }
            Some(_) => arguments.push(parse_argument(cursor)?),
            None => return Err(cursor.error("unterminated type-argument list")),
        }
    }
    if arguments.is_empty() {
        return Err(cursor.error("empty type-argument list"));
    }
    Ok(arguments)
}

fn parse_argument(cursor: &mut Cursor<'_>) -> PrismResult<TypeDescriptor> {
    match cursor.peek() {
        Some(b'*') => {
            cursor.bump();
            Ok(TypeDescriptor::Wildcard {
                upper: None,
                lower: None,
            })
        }
        Some(b'+') => {
            cursor.bump();
            Ok(TypeDescriptor::Wildcard {
                upper: Some(Box::new(parse_type(cursor)?)),
                lower: None,
            })
        }
        Some(b'-') => {
            cursor.bump();
            Ok(TypeDescriptor::Wildcard {
                upper: None,
                lower: Some(Box::new(parse_type(cursor)?)),
            })
        }
        _ => parse_type(cursor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeDescriptor {
        TypeDescriptor::Named(NamedDescriptor {
            name: name.to_string(),
            arguments: Vec::new(),
            owner: None,
        })
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            parse_descriptor("I").unwrap(),
            TypeDescriptor::Primitive(PrimitiveKind::Int)
        );
        assert_eq!(
            parse_descriptor("V").unwrap(),
            TypeDescriptor::Primitive(PrimitiveKind::Void)
        );
        assert_eq!(
            parse_descriptor("Z").unwrap(),
            TypeDescriptor::Primitive(PrimitiveKind::Boolean)
        );
    }

    #[test]
    fn test_plain_class() {
        assert_eq!(
            parse_descriptor("Ljava/lang/String;").unwrap(),
            named("java.lang.String")
        );
    }

    #[test]
    fn test_array_of_generic() {
        let parsed = parse_descriptor("[Ljava/util/List<Lcom/acme/Pet;>;").unwrap();
        assert_eq!(
            parsed,
            TypeDescriptor::Array(Box::new(TypeDescriptor::Named(NamedDescriptor {
                name: "java.util.List".to_string(),
                arguments: vec![named("com.acme.Pet")],
                owner: None,
            })))
        );
    }

    #[test]
    fn test_nested_generics() {
        let parsed =
            parse_descriptor("Ljava/util/Map<Ljava/lang/String;Ljava/util/List<Lcom/acme/Pet;>;>;")
                .unwrap();
        let TypeDescriptor::Named(map) = parsed else {
            panic!("expected a class reference");
        };
        assert_eq!(map.name, "java.util.Map");
        assert_eq!(map.arguments.len(), 2);
        assert_eq!(map.arguments[0], named("java.lang.String"));
        let TypeDescriptor::Named(list) = &map.arguments[1] else {
            panic!("expected a class reference argument");
        };
        assert_eq!(list.name, "java.util.List");
        assert_eq!(list.arguments, vec![named("com.acme.Pet")]);
    }

    #[test]
    fn test_type_variable() {
        assert_eq!(
            parse_descriptor("TT;").unwrap(),
            TypeDescriptor::Variable("T".to_string())
        );
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(
            parse_descriptor("Ljava/util/List<*>;").unwrap(),
            TypeDescriptor::Named(NamedDescriptor {
                name: "java.util.List".to_string(),
                arguments: vec![TypeDescriptor::Wildcard {
                    upper: None,
                    lower: None
                }],
                owner: None,
            })
        );
        let extends = parse_descriptor("Ljava/util/List<+Lcom/acme/Pet;>;").unwrap();
        let TypeDescriptor::Named(list) = extends else {
            panic!("expected a class reference");
        };
        assert_eq!(
            list.arguments[0],
            TypeDescriptor::Wildcard {
                upper: Some(Box::new(named("com.acme.Pet"))),
                lower: None,
            }
        );
        let supers = parse_descriptor("Ljava/util/List<-Lcom/acme/Pet;>;").unwrap();
        let TypeDescriptor::Named(list) = supers else {
            panic!("expected a class reference");
        };
        assert_eq!(
            list.arguments[0],
            TypeDescriptor::Wildcard {
                upper: None,
                lower: Some(Box::new(named("com.acme.Pet"))),
            }
        );
    }

    #[test]
    fn test_nested_suffix_keeps_owner() {
        let parsed = parse_descriptor("Lcom/acme/Outer<TX;>.Inner<TY;>;").unwrap();
        let TypeDescriptor::Named(inner) = parsed else {
            panic!("expected a class reference");
        };
        assert_eq!(inner.name, "com.acme.Outer.Inner");
        assert_eq!(inner.arguments, vec![TypeDescriptor::Variable("Y".to_string())]);
        let outer = inner.owner.expect("inner reference keeps its owner");
        assert_eq!(outer.name, "com.acme.Outer");
        assert_eq!(outer.arguments, vec![TypeDescriptor::Variable("X".to_string())]);
        assert!(outer.owner.is_none());
    }

    #[test]
    fn test_malformed_descriptors() {
        for input in ["", "Q", "Ljava/lang/String", "Ljava/util/List<>;", "TT", "I;", "[", "L;"] {
            let err = parse_descriptor(input).unwrap_err();
            assert!(
                matches!(err, PrismError::Descriptor(_)),
                "`{input}` should fail as a descriptor error"
            );
        }
    }
}
