// AST (Abstract Syntax Tree) definitions for expressions

use super::registry::Type;
use super::token::{Operator, SourceLocation};
use std::fmt;

/// Value of a literal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i32),
    Float(f32),
    Char(char),
    String(String),
    Bool(bool),
    Null,
}

impl LiteralValue {
    /// Registry name of the literal's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            LiteralValue::Int(_) => "int",
            LiteralValue::Float(_) => "float",
            LiteralValue::Char(_) => "char",
            LiteralValue::String(_) => "string",
            LiteralValue::Bool(_) => "bool",
            LiteralValue::Null => "null",
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Float(x) => write!(f, "{x:?}"),
            LiteralValue::Char(c) => write!(f, "'{c}'"),
            LiteralValue::String(s) => write!(f, "\"{s}\""),
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Null => f.write_str("null"),
        }
    }
}

/// Expression nodes; every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal {
        value: LiteralValue,
        ty: Type,
        location: SourceLocation,
    },
    BinaryOperation {
        op: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
        location: SourceLocation,
    },
    UnaryOperation {
        op: Operator,
        operand: Box<Expression>,
        location: SourceLocation,
    },
    /// Explicit grouping, kept so later stages can see it.
    Parenthesis {
        inner: Box<Expression>,
        location: SourceLocation,
    },
    MemberAccess {
        object: Box<Expression>,
        member: String,
        location: SourceLocation,
    },
    ArrayAccess {
        array: Box<Expression>,
        index: Box<Expression>,
        location: SourceLocation,
    },
    Invocation {
        callee: Box<Expression>,
        args: Vec<Expression>,
        location: SourceLocation,
    },
    ObjectCreation {
        ty: Type,
        args: Vec<Expression>,
        location: SourceLocation,
    },
    /// `new T[n]...{init}`; `ty` carries the array rank.
    ArrayCreation {
        ty: Type,
        sizes: Vec<Expression>,
        initializer: Option<Vec<Expression>>,
        location: SourceLocation,
    },
    TypeReference {
        ty: Type,
        location: SourceLocation,
    },
    TypeCast {
        ty: Type,
        operand: Box<Expression>,
        location: SourceLocation,
    },
    /// Variable or member name, bound later by semantic analysis.
    Reference {
        name: String,
        location: SourceLocation,
    },
}

impl Expression {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Expression::Literal { location, .. }
            | Expression::BinaryOperation { location, .. }
            | Expression::UnaryOperation { location, .. }
            | Expression::Parenthesis { location, .. }
            | Expression::MemberAccess { location, .. }
            | Expression::ArrayAccess { location, .. }
            | Expression::Invocation { location, .. }
            | Expression::ObjectCreation { location, .. }
            | Expression::ArrayCreation { location, .. }
            | Expression::TypeReference { location, .. }
            | Expression::TypeCast { location, .. }
            | Expression::Reference { location, .. } => *location,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal { .. }
            | Expression::TypeReference { .. }
            | Expression::Reference { .. } => Vec::new(),
            Expression::BinaryOperation { left, right, .. } => vec![&**left, &**right],
            Expression::UnaryOperation { operand, .. } | Expression::TypeCast { operand, .. } => {
                vec![&**operand]
            }
            Expression::Parenthesis { inner, .. } => vec![&**inner],
            Expression::MemberAccess { object, .. } => vec![&**object],
            Expression::ArrayAccess { array, index, .. } => vec![&**array, &**index],
            Expression::Invocation { callee, args, .. } => {
                std::iter::once(callee.as_ref()).chain(args).collect()
            }
            Expression::ObjectCreation { args, .. } => args.iter().collect(),
            Expression::ArrayCreation {
                sizes, initializer, ..
            } => sizes.iter().chain(initializer.iter().flatten()).collect(),
        }
    }

    /// One-line label used by [`Expression::render_tree`].
    fn label(&self) -> String {
        match self {
            Expression::Literal { value, ty, .. } => format!("Literal {value} : {ty}"),
            Expression::BinaryOperation { op, .. } => format!("BinaryOperation {op}"),
            Expression::UnaryOperation { op, .. } => format!("UnaryOperation {op}"),
            Expression::Parenthesis { .. } => "Parenthesis".to_string(),
            Expression::MemberAccess { member, .. } => format!("MemberAccess .{member}"),
            Expression::ArrayAccess { .. } => "ArrayAccess".to_string(),
            Expression::Invocation { args, .. } => format!("Invocation ({} args)", args.len()),
            Expression::ObjectCreation { ty, .. } => format!("ObjectCreation {ty}"),
            Expression::ArrayCreation { ty, initializer, .. } => match initializer {
                Some(items) => format!("ArrayCreation {ty} {{{} items}}", items.len()),
                None => format!("ArrayCreation {ty}"),
            },
            Expression::TypeReference { ty, .. } => format!("TypeReference {ty}"),
            Expression::TypeCast { ty, .. } => format!("TypeCast ({ty})"),
            Expression::Reference { name, .. } => format!("Reference {name}"),
        }
    }

    /// Indented box-drawing rendering of the tree, one node per line.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, "", true, true);
        out
    }

    fn render_into(&self, out: &mut String, indent: &str, last: bool, root: bool) {
        let (branch, extension) = match (root, last) {
            (true, _) => ("", ""),
            (false, true) => ("└── ", "    "),
            (false, false) => ("├── ", "│   "),
        };
        out.push_str(indent);
        out.push_str(branch);
        out.push_str(&self.label());
        out.push('\n');

        let child_indent = format!("{indent}{extension}");
        let children = self.children();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            child.render_into(out, &child_indent, i + 1 == count, false);
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for item in items {
        write!(f, " {item}")?;
    }
    Ok(())
}

/// Compact s-expression form: `(+ a (* b c))`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal { value, .. } => write!(f, "{value}"),
            Expression::BinaryOperation {
                op, left, right, ..
            } => write!(f, "({op} {left} {right})"),
            Expression::UnaryOperation { op, operand, .. } => write!(f, "({op} {operand})"),
            Expression::Parenthesis { inner, .. } => write!(f, "(paren {inner})"),
            Expression::MemberAccess { object, member, .. } => write!(f, "(. {object} {member})"),
            Expression::ArrayAccess { array, index, .. } => write!(f, "([] {array} {index})"),
            Expression::Invocation { callee, args, .. } => {
                write!(f, "(call {callee}")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expression::ObjectCreation { ty, args, .. } => {
                write!(f, "(new {ty}")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expression::ArrayCreation {
                ty,
                sizes,
                initializer,
                ..
            } => {
                write!(f, "(new {ty}")?;
                write_list(f, sizes)?;
                if let Some(items) = initializer {
                    f.write_str(" {")?;
                    write_list(f, items)?;
                    f.write_str(" }")?;
                }
                f.write_str(")")
            }
            Expression::TypeReference { ty, .. } => write!(f, "{ty}"),
            Expression::TypeCast { ty, operand, .. } => write!(f, "(cast {ty} {operand})"),
            Expression::Reference { name, .. } => f.write_str(name),
        }
    }
}

/// Root of one parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub root: Expression,
}

impl SyntaxTree {
    pub fn new(root: Expression) -> Self {
        SyntaxTree { root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::registry::TypeRegistry;

    fn reference(name: &str, col: usize) -> Expression {
        Expression::Reference {
            name: name.to_string(),
            location: SourceLocation::new(0, col),
        }
    }

    fn sample() -> Expression {
        let registry = TypeRegistry::primitives();
        Expression::BinaryOperation {
            op: Operator::Add,
            left: Box::new(reference("a", 0)),
            right: Box::new(Expression::Literal {
                value: LiteralValue::Int(1),
                ty: registry.resolve("int").expect("int"),
                location: SourceLocation::new(0, 4),
            }),
            location: SourceLocation::new(0, 2),
        }
    }

    #[test]
    fn test_sexpr_display() {
        assert_eq!(sample().to_string(), "(+ a 1)");
    }

    #[test]
    fn test_render_tree() {
        let rendered = sample().render_tree();
        assert_eq!(
            rendered,
            "BinaryOperation +\n├── Reference a\n└── Literal 1 : int\n"
        );
    }

    #[test]
    fn test_children_order() {
        let expr = Expression::Invocation {
            callee: Box::new(reference("f", 0)),
            args: vec![reference("x", 2), reference("y", 5)],
            location: SourceLocation::new(0, 1),
        };
        let names: Vec<_> = expr.children().iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["f", "x", "y"]);
        assert_eq!(expr.location(), SourceLocation::new(0, 1));
    }
}
