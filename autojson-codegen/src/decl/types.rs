//! Builtin type categories and their canonical spellings.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Builtin type categories a front-end can report for a canonical type.
///
/// The set mirrors the categories a C++ front-end distinguishes after
/// desugaring. Only some of them have a canonical spelling in [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinKind {
    /// `void`
    Void,
    /// `bool`
    Bool,
    /// `std::nullptr_t`
    NullPtr,
    /// `char` on targets where it is unsigned.
    #[serde(rename = "char_u")]
    CharU,
    /// `unsigned char`
    UChar,
    /// `char` on targets where it is signed.
    #[serde(rename = "char_s")]
    CharS,
    /// `signed char`
    SChar,
    /// `wchar_t`
    WChar,
    /// `char16_t`
    Char16,
    /// `char32_t`
    Char32,
    /// `short`
    Short,
    /// `unsigned short`
    UShort,
    /// `int`
    Int,
    /// `unsigned int`
    UInt,
    /// `long`
    Long,
    /// `unsigned long`
    ULong,
    /// `long long`
    LongLong,
    /// `unsigned long long`
    ULongLong,
    /// `__int128`
    Int128,
    /// `unsigned __int128`
    UInt128,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `long double`
    #[serde(rename = "long_double")]
    LongDouble,
}

impl BuiltinKind {
    /// Host-language spelling used in diagnostics.
    #[must_use]
    pub const fn spelling(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::NullPtr => "std::nullptr_t",
            Self::CharU | Self::CharS => "char",
            Self::UChar => "unsigned char",
            Self::SChar => "signed char",
            Self::WChar => "wchar_t",
            Self::Char16 => "char16_t",
            Self::Char32 => "char32_t",
            Self::Short => "short",
            Self::UShort => "unsigned short",
            Self::Int => "int",
            Self::UInt => "unsigned int",
            Self::Long => "long",
            Self::ULong => "unsigned long",
            Self::LongLong => "long long",
            Self::ULongLong => "unsigned long long",
            Self::Int128 => "__int128",
            Self::UInt128 => "unsigned __int128",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
        }
    }
}

impl fmt::Display for BuiltinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

static SHARED: LazyLock<TypeTable> = LazyLock::new(TypeTable::new);

/// Read-only mapping from supported builtin categories to the spelling
/// emitted in generated code.
#[derive(Debug, Clone)]
pub struct TypeTable {
    spellings: HashMap<BuiltinKind, &'static str>,
}

impl TypeTable {
    /// Builds the table of supported builtin spellings.
    #[must_use]
    pub fn new() -> Self {
        let spellings = HashMap::from([
            (BuiltinKind::Bool, "bool"),
            (BuiltinKind::NullPtr, "::std::nullptr_t"),
            (BuiltinKind::CharU, "char"),
            (BuiltinKind::CharS, "char"),
            (BuiltinKind::Int, "int"),
            (BuiltinKind::UInt, "unsigned int"),
            (BuiltinKind::Long, "long"),
            (BuiltinKind::ULong, "unsigned long"),
            (BuiltinKind::LongLong, "long long"),
            (BuiltinKind::ULongLong, "unsigned long long"),
            (BuiltinKind::Double, "double"),
        ]);
        Self { spellings }
    }

    /// Process-wide table, built on first use.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Returns the canonical spelling for `kind`, if it is supported.
    #[must_use]
    pub fn spelling(&self, kind: BuiltinKind) -> Option<&'static str> {
        self.spellings.get(&kind).copied()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
