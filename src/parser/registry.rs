//! Type registry
//!
//! Maps type names to shared [`TypeInfo`] descriptors. The parser consults it to
//! resolve the type named by a cast, a type reference or a `new` expression.
//! A registry is built before parsing starts and is never modified by it.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Names registered by [`TypeRegistry::primitives`].
pub const PRIMITIVE_TYPES: [&str; 7] = ["null", "void", "bool", "char", "int", "float", "string"];

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    pub output: Type,
    pub params: Vec<ParamInfo>,
}

/// Descriptor of one named type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub name: String,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A resolved type: a registered descriptor plus an array rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub info: Arc<TypeInfo>,
    pub array_rank: u32,
}

impl Type {
    pub fn new(info: Arc<TypeInfo>) -> Self {
        Self {
            info,
            array_rank: 0,
        }
    }

    pub fn with_rank(mut self, array_rank: u32) -> Self {
        self.array_rank = array_rank;
        self
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        for _ in 0..self.array_rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: FxHashMap<String, Arc<TypeInfo>>,
}

impl TypeRegistry {
    /// An empty registry; most callers want [`TypeRegistry::primitives`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives() -> Self {
        PRIMITIVE_TYPES
            .iter()
            .fold(Self::new(), |registry, name| registry.with_type(TypeInfo::new(*name)))
    }

    /// Register `info`, replacing any earlier type of the same name.
    pub fn with_type(mut self, info: TypeInfo) -> Self {
        self.types.insert(info.name.clone(), Arc::new(info));
        self
    }

    pub fn resolve(&self, name: &str) -> Option<Type> {
        self.types.get(name).map(|info| Type::new(Arc::clone(info)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_registered() {
        let registry = TypeRegistry::primitives();
        assert_eq!(registry.len(), PRIMITIVE_TYPES.len());
        for name in PRIMITIVE_TYPES {
            assert_eq!(
                registry.resolve(name).map(|t| t.name().to_string()),
                Some(name.to_string())
            );
        }
        assert!(!registry.contains("Foo"));
    }

    #[test]
    fn test_user_type_with_members() {
        let registry = TypeRegistry::primitives();
        let int = registry.resolve("int").expect("int registered");
        let point = TypeInfo::new("Point")
            .with_field("x", int.clone())
            .with_method(MethodInfo {
                name: "length".to_string(),
                output: int.clone(),
                params: Vec::new(),
            });
        let registry = registry.with_type(point);

        let resolved = registry.resolve("Point").expect("Point registered");
        assert_eq!(resolved.info.field("x").map(|f| f.ty.name()), Some("int"));
        assert!(resolved.info.field("y").is_none());
        assert!(resolved.info.method("length").is_some());
    }

    #[test]
    fn test_array_type_display() {
        let registry = TypeRegistry::primitives();
        let ty = registry.resolve("float").expect("float registered").with_rank(2);
        assert_eq!(ty.to_string(), "float[][]");
    }
}
