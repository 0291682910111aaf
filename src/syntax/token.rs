//! Terminal tokens.

use smol_str::SmolStr;

use super::error::ShapeError;
use super::kind::Sym;

/// A terminal: symbol class plus its source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub sym: Sym,
    pub text: SmolStr,
}

impl Token {
    /// Create a token, checking that the text fits the symbol class.
    pub fn new(sym: Sym, text: impl Into<SmolStr>) -> Result<Self, ShapeError> {
        let text = text.into();
        if !is_valid_text(sym, &text) {
            return Err(ShapeError::InvalidToken { sym, text });
        }
        Ok(Self { sym, text })
    }

    /// Create a token with the symbol's canonical text.
    pub fn symbol(sym: Sym) -> Result<Self, ShapeError> {
        let text = sym.canonical().ok_or(ShapeError::NoCanonicalText { sym })?;
        Ok(Self {
            sym,
            text: SmolStr::new_static(text),
        })
    }

    pub(crate) const fn from_static(sym: Sym, text: &'static str) -> Self {
        Self {
            sym,
            text: SmolStr::new_static(text),
        }
    }

    pub fn is_symbol(&self, sym: Sym) -> bool {
        self.sym == sym
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn is_valid_text(sym: Sym, text: &str) -> bool {
    match sym {
        Sym::Name => is_identifier(text),
        Sym::Number => text.starts_with(|c: char| c.is_ascii_digit()) && text.parse::<f64>().is_ok(),
        Sym::Operator | Sym::Words => !text.is_empty(),
        Sym::Text => true,
        _ => sym.canonical() == Some(text),
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}
