//! TypeScript declaration IR.
//!
//! This module defines the declaration-file representation the generators build:
//! - TsType: type expressions (keywords, literals, arrays, unions, object literals, ...)
//! - TsMember: members of object literals and interfaces
//! - TsDecl: statements of a declaration file (interfaces, aliases, functions, namespaces)

/// TypeScript keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TsKeyword {
    Any,
    String,
    Number,
    Boolean,
    Null,
    Void,
    Never,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    /// Printed JSON-quoted
    String(String),
    /// Integral numbers, printed without a fraction
    Int(i64),
    /// Any other number
    Number(f64),
    /// `true` or `false`
    Bool(bool),
}

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Keyword types: any, string, number, boolean, null, void, never
    Keyword(TsKeyword),
    /// Literal type: "foo", 42, -5, true
    Literal(TsLiteral),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B
    Intersection(Vec<TsType>),
    /// Object literal type: { foo: string; [key: string]: any }
    Object(Vec<TsMember>),
    /// Function type: (a: string, b?: number) => void
    Function(TsFunctionType),
    /// Named type reference: Tab, manifest.ImageData
    Ref(String),
    /// Generic reference: Promise<T>, WebExtEvent<T>
    Generic {
        /// Generic type name
        name: String,
        /// Type arguments in order
        args: Vec<TsType>,
    },
    /// Type query: typeof messenger
    TypeQuery(String),
    /// Type carrying its own doc comment (enum choices with descriptions)
    Documented {
        /// Comment printed before the type
        doc: JsDoc,
        /// The documented type
        ty: Box<TsType>,
    },
}

impl TsType {
    /// A keyword type.
    pub fn keyword(keyword: TsKeyword) -> Self {
        TsType::Keyword(keyword)
    }

    /// A named type reference.
    pub fn reference(name: impl Into<String>) -> Self {
        TsType::Ref(name.into())
    }

    /// `name<args>`
    pub fn generic(name: impl Into<String>, args: Vec<TsType>) -> Self {
        TsType::Generic {
            name: name.into(),
            args,
        }
    }

    /// `{ [key: string]: T }`
    pub fn string_index(value: TsType) -> Self {
        TsType::Object(vec![TsMember::Index(TsIndex {
            key: "key".into(),
            value,
        })])
    }

    /// Whether this is the `void` keyword.
    pub fn is_void(&self) -> bool {
        matches!(self, TsType::Keyword(TsKeyword::Void))
    }
}

/// Function type signature
#[derive(Debug, Clone, PartialEq)]
pub struct TsFunctionType {
    /// Parameters in order
    pub params: Vec<TsParam>,
    /// Type after `=>`
    pub return_type: Box<TsType>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: TsType,
    /// Printed with `?`
    pub optional: bool,
    /// Printed with a leading `...`
    pub rest: bool,
}

impl TsParam {
    /// A mandatory, non-rest parameter.
    pub fn new(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            rest: false,
        }
    }
}

/// Object property signature
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    /// Property key, quoted on output when needed
    pub name: String,
    /// Property type
    pub ty: TsType,
    /// Printed with `?`
    pub optional: bool,
    /// Comment printed above the property
    pub doc: JsDoc,
}

/// Method signature inside an interface or object literal
#[derive(Debug, Clone, PartialEq)]
pub struct TsMethod {
    /// Method name
    pub name: String,
    /// Parameters in order
    pub params: Vec<TsParam>,
    /// Declared return type
    pub return_type: TsType,
    /// Comment printed above the method
    pub doc: JsDoc,
}

/// Index signature: [key: string]: T
#[derive(Debug, Clone, PartialEq)]
pub struct TsIndex {
    /// Name of the key binding
    pub key: String,
    /// Type of every value
    pub value: TsType,
}

/// Member of an interface body or object literal type
#[derive(Debug, Clone, PartialEq)]
pub enum TsMember {
    /// `name?: T`
    Property(TsProp),
    /// `name(params): T`
    Method(TsMethod),
    /// `[key: string]: T`
    Index(TsIndex),
}

impl TsMember {
    /// Member name; index signatures have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            TsMember::Property(prop) => Some(&prop.name),
            TsMember::Method(method) => Some(&method.name),
            TsMember::Index(_) => None,
        }
    }
}

/// JSDoc annotation attached to a declaration or member
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsDoc {
    /// Free text, sanitised on output
    pub description: Option<String>,
    /// `(parameter name, description)` pairs rendered as `@param` tags
    pub params: Vec<(String, String)>,
    /// `Some("")` renders a bare `@deprecated` tag
    pub deprecated: Option<String>,
}

impl JsDoc {
    /// Whether nothing would be printed.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.params.is_empty() && self.deprecated.is_none()
    }
}

/// Declaration kind
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// interface Foo<T> { ... }
    Interface {
        /// Type parameters with their constraints, printed verbatim
        type_params: Vec<String>,
        /// Body members in order
        members: Vec<TsMember>,
    },
    /// type Foo = ...
    TypeAlias {
        /// Aliased type
        ty: TsType,
    },
    /// function foo(...): T;
    Function {
        /// Parameters in order
        params: Vec<TsParam>,
        /// Declared return type
        return_type: TsType,
    },
    /// const foo: T;
    Const {
        /// Constant type
        ty: TsType,
    },
    /// export { local as name };
    ExportAlias {
        /// Local binding being re-exported
        local: String,
    },
    /// import name = target;
    ImportAlias {
        /// Qualified name being aliased
        target: String,
    },
    /// namespace foo { ... }
    Namespace {
        /// Statements inside the namespace
        body: Vec<TsDecl>,
    },
}

/// A single declaration statement
#[derive(Debug, Clone, PartialEq)]
pub struct TsDecl {
    /// Declared name
    pub name: String,
    /// `export` modifier
    pub export: bool,
    /// `declare` modifier, only meaningful at file level
    pub declare: bool,
    /// Comment printed above the declaration
    pub doc: JsDoc,
    /// What is declared
    pub kind: DeclKind,
}

impl TsDecl {
    /// An exported declaration without documentation.
    pub fn exported(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            export: true,
            declare: false,
            doc: JsDoc::default(),
            kind,
        }
    }

    /// Attach a doc comment.
    pub fn with_doc(mut self, doc: JsDoc) -> Self {
        self.doc = doc;
        self
    }

    /// Whether this declaration introduces a type-level name that references can point at.
    pub fn declares_type(&self) -> bool {
        matches!(
            self.kind,
            DeclKind::Interface { .. } | DeclKind::TypeAlias { .. } | DeclKind::Function { .. }
        )
    }

    /// Declarations that may legally repeat under one name (interface merging, overloads).
    pub fn may_repeat(&self) -> bool {
        matches!(
            self.kind,
            DeclKind::Interface { .. } | DeclKind::Function { .. } | DeclKind::Namespace { .. }
        )
    }

    /// Whether the name is bound in TypeScript's type declaration space. Every other
    /// declaration binds a value.
    pub fn in_type_space(&self) -> bool {
        matches!(self.kind, DeclKind::Interface { .. } | DeclKind::TypeAlias { .. })
    }

    /// Whether both declarations bind the same name in the same declaration space.
    pub fn shares_name_with(&self, other: &TsDecl) -> bool {
        self.name == other.name && self.in_type_space() == other.in_type_space()
    }
}

/// Complete declaration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsModule {
    /// Top-level statements in output order
    pub statements: Vec<TsDecl>,
}
