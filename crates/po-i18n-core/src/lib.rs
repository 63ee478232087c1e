#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod catalog;
mod error;
mod header;
mod locale_code;
mod mo_decode;
mod plural;
mod plural_lexer;
mod plural_parser;
mod po_parse;
mod po_write;
mod translation;

pub use catalog::Catalog;
pub use error::{CoreError, CoreResult};
pub use header::{Headers, LANGUAGE, PLURAL_FORMS, PluralForms};
pub use locale_code::{LocaleCode, simplified_locale};
pub use mo_decode::decode_mo;
pub use plural::{PluralExpression, PluralRule, germanic_plural};
pub use plural_lexer::{PluralError, Span};
pub use plural_parser::{BinaryOp, Expr, UnaryOp};
pub use po_parse::{ParsedCatalog, ParsedEntry, parse_po, unquote};
pub use po_write::{quote, write_po};
pub use translation::TranslationEntry;
