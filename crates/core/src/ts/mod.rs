//! Declaration-file AST, printer and identifier helpers.

pub mod emit;
pub mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{
    DeclKind, JsDoc, TsDecl, TsFunctionType, TsIndex, TsKeyword, TsLiteral, TsMember, TsMethod,
    TsModule, TsParam, TsProp, TsType,
};
