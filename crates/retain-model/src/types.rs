//! Type references as written on declarations.
//!
//! A [`TypeRef`] is parsed from and rendered back to Kotlin type syntax, for
//! example `kotlin.collections.ArrayList<out kotlin.String>?`. Rendering is the
//! inverse of parsing up to insignificant whitespace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, TypeParseError};

/// Use-site variance of a type argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variance {
    #[default]
    Invariant,
    Out,
    In,
}

impl Variance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::Out => "out",
            Variance::In => "in",
        }
    }
}

/// A single type argument: either a star projection or a concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    Star,
    Type { variance: Variance, ty: TypeRef },
}

impl TypeArg {
    pub fn invariant(ty: TypeRef) -> Self {
        TypeArg::Type {
            variance: Variance::Invariant,
            ty,
        }
    }

    /// The projected type, `None` for `*`.
    pub fn ty(&self) -> Option<&TypeRef> {
        match self {
            TypeArg::Star => None,
            TypeArg::Type { ty, .. } => Some(ty),
        }
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Star => f.write_str("*"),
            TypeArg::Type {
                variance: Variance::Invariant,
                ty,
            } => write!(f, "{ty}"),
            TypeArg::Type { variance, ty } => write!(f, "{} {ty}", variance.as_str()),
        }
    }
}

/// Fully-qualified type reference with optional type arguments and nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    name: String,
    args: Vec<TypeArg>,
    nullable: bool,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// Append an invariant type argument.
    #[must_use]
    pub fn with_arg(mut self, ty: TypeRef) -> Self {
        self.args.push(TypeArg::invariant(ty));
        self
    }

    #[must_use]
    pub fn with_type_arg(mut self, arg: TypeArg) -> Self {
        self.args.push(arg);
        self
    }

    /// The same type marked nullable (`T?`).
    #[must_use]
    pub fn make_nullable(&self) -> Self {
        Self {
            nullable: true,
            ..self.clone()
        }
    }

    /// The same type with the outer nullability removed.
    #[must_use]
    pub fn make_non_null(&self) -> Self {
        Self {
            nullable: false,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Canonical text without the outer `?` and without variance markers.
    ///
    /// Used to look types up in tables keyed by their erased spelling such as
    /// `kotlin.collections.ArrayList<kotlin.String>`.
    pub fn erased_key(&self) -> String {
        let mut out = String::new();
        self.write_erased(&mut out, false);
        out
    }

    fn write_erased(&self, out: &mut String, keep_nullability: bool) {
        out.push_str(&self.name);
        if !self.args.is_empty() {
            out.push('<');
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                match arg {
                    TypeArg::Star => out.push('*'),
                    TypeArg::Type { ty, .. } => ty.write_erased(out, true),
                }
            }
            out.push('>');
        }
        if keep_nullability && self.nullable {
            out.push('?');
        }
    }

    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        if input.trim().is_empty() {
            return Err(TypeParseError::Empty);
        }
        let mut parser = Parser::new(input);
        let parsed = parser.type_ref()?;
        parser.skip_ws();
        if parser.pos < parser.chars.len() {
            return Err(TypeParseError::TrailingInput {
                position: parser.pos,
            });
        }
        Ok(parsed)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl FromStr for TypeRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s).map_err(|source| ModelError::InvalidType {
            input: s.to_string(),
            source,
        })
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, expected: &'static str) -> TypeParseError {
        match self.peek() {
            Some(found) => TypeParseError::UnexpectedChar {
                position: self.pos,
                found,
                expected,
            },
            None => TypeParseError::UnexpectedEnd { expected },
        }
    }

    fn identifier(&mut self) -> Result<String, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected("identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn type_ref(&mut self) -> Result<TypeRef, TypeParseError> {
        let mut name = self.identifier()?;
        loop {
            self.skip_ws();
            if self.peek() != Some('.') {
                break;
            }
            self.pos += 1;
            name.push('.');
            name.push_str(&self.identifier()?);
        }
        let mut args = Vec::new();
        if self.peek() == Some('<') {
            self.pos += 1;
            loop {
                args.push(self.type_arg()?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('>') => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(self.unexpected("',' or '>'")),
                }
            }
            self.skip_ws();
        }
        let nullable = self.peek() == Some('?');
        if nullable {
            self.pos += 1;
        }
        Ok(TypeRef {
            name,
            args,
            nullable,
        })
    }

    fn type_arg(&mut self) -> Result<TypeArg, TypeParseError> {
        self.skip_ws();
        if self.peek() == Some('*') {
            self.pos += 1;
            return Ok(TypeArg::Star);
        }
        let variance = self.variance();
        let ty = self.type_ref()?;
        Ok(TypeArg::Type { variance, ty })
    }

    fn variance(&mut self) -> Variance {
        for variance in [Variance::Out, Variance::In] {
            let word = variance.as_str();
            let end = self.pos + word.len();
            let matches = self
                .chars
                .get(self.pos..end)
                .is_some_and(|slice| slice.iter().copied().eq(word.chars()));
            if matches && self.chars.get(end).is_some_and(|c| c.is_whitespace()) {
                self.pos = end;
                return variance;
            }
        }
        Variance::Invariant
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_generic_with_variance() {
        let ty = TypeRef::parse("kotlin.collections.ArrayList<out kotlin.String?>?").unwrap();
        assert_eq!(ty.name(), "kotlin.collections.ArrayList");
        assert!(ty.is_nullable());
        assert_eq!(ty.args().len(), 1);
        let TypeArg::Type { variance, ty: inner } = &ty.args()[0] else {
            panic!("expected a concrete argument");
        };
        assert_eq!(*variance, Variance::Out);
        assert_eq!(inner.name(), "kotlin.String");
        assert!(inner.is_nullable());
    }

    #[test]
    fn erased_key_drops_outer_nullability_and_variance() {
        let ty = TypeRef::parse("kotlin.collections.ArrayList<out kotlin.Int>?").unwrap();
        assert_eq!(ty.erased_key(), "kotlin.collections.ArrayList<kotlin.Int>");
    }

    #[test]
    fn star_projection() {
        let ty = TypeRef::parse("android.util.SparseArray<*>").unwrap();
        assert_eq!(ty.args(), &[TypeArg::Star]);
        assert_eq!(ty.to_string(), "android.util.SparseArray<*>");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(TypeRef::parse("  "), Err(TypeParseError::Empty));
        assert!(matches!(
            TypeRef::parse("kotlin.Array<kotlin.Int"),
            Err(TypeParseError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            TypeRef::parse("kotlin.Int kotlin.Long"),
            Err(TypeParseError::TrailingInput { position: 11 })
        ));
        assert!(matches!(
            TypeRef::parse("kotlin.<Int>"),
            Err(TypeParseError::UnexpectedChar { found: '<', .. })
        ));
    }

    #[test]
    fn identifier_named_out_is_not_a_variance() {
        let ty = TypeRef::parse("a.Box<out>").unwrap();
        assert_eq!(ty.args()[0], TypeArg::invariant(TypeRef::new("out")));
    }
}
