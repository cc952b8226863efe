//! Classification labels attached to doclets and template data entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DocError;

/// The kind of a documented identifier.
///
/// Declaration order is significant: it is the order kinds appear in
/// [`Namepaths`](crate::facade::Namepaths) output and the order used when
/// grouping the global index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Module,
    Class,
    Constructor,
    Mixin,
    #[default]
    Member,
    Namespace,
    Constant,
    Function,
    Event,
    Typedef,
    External,
    Interface,
    File,
    Package,
    /// Any kind label this crate does not know; kept so pre-built data still loads
    #[serde(other)]
    Unknown,
}

impl Kind {
    /// The kinds reported by `get_namepaths`, in output order.
    pub const NAMEPATH_KINDS: [Kind; 11] = [
        Kind::Module,
        Kind::Class,
        Kind::Constructor,
        Kind::Mixin,
        Kind::Member,
        Kind::Namespace,
        Kind::Constant,
        Kind::Function,
        Kind::Event,
        Kind::Typedef,
        Kind::External,
    ];

    /// Lowercase label, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Module => "module",
            Kind::Class => "class",
            Kind::Constructor => "constructor",
            Kind::Mixin => "mixin",
            Kind::Member => "member",
            Kind::Namespace => "namespace",
            Kind::Constant => "constant",
            Kind::Function => "function",
            Kind::Event => "event",
            Kind::Typedef => "typedef",
            Kind::External => "external",
            Kind::Interface => "interface",
            Kind::File => "file",
            Kind::Package => "package",
            Kind::Unknown => "unknown",
        }
    }

    /// Whether entries of this kind can own members.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Kind::Module | Kind::Class | Kind::Mixin | Kind::Namespace | Kind::Interface | Kind::External
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "module" => Ok(Kind::Module),
            "class" => Ok(Kind::Class),
            "constructor" => Ok(Kind::Constructor),
            "mixin" => Ok(Kind::Mixin),
            "member" | "var" => Ok(Kind::Member),
            "namespace" => Ok(Kind::Namespace),
            "constant" | "const" => Ok(Kind::Constant),
            "function" | "func" | "method" => Ok(Kind::Function),
            "event" => Ok(Kind::Event),
            "typedef" | "callback" => Ok(Kind::Typedef),
            "external" | "host" => Ok(Kind::External),
            "interface" => Ok(Kind::Interface),
            "file" => Ok(Kind::File),
            "package" => Ok(Kind::Package),
            _ => Err(DocError::Other {
                message: format!("Unknown kind '{s}'"),
            }),
        }
    }
}

/// Relationship between a member and its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Static,
    Instance,
    Inner,
}

impl Scope {
    /// Namepath separator between parent and member.
    #[must_use]
    pub const fn punctuation(self) -> &'static str {
        match self {
            Scope::Global => "",
            Scope::Static => ".",
            Scope::Instance => "#",
            Scope::Inner => "~",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Static => write!(f, "static"),
            Scope::Instance => write!(f, "instance"),
            Scope::Inner => write!(f, "inner"),
        }
    }
}

/// Access level from `@access`, `@private`, `@protected`, `@public` or `@package`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    Private,
    Package,
}

impl FromStr for Access {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Access::Public),
            "protected" => Ok(Access::Protected),
            "private" => Ok(Access::Private),
            "package" => Ok(Access::Package),
            other => Err(DocError::Other {
                message: format!("Unknown access level '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Public => write!(f, "public"),
            Access::Protected => write!(f, "protected"),
            Access::Private => write!(f, "private"),
            Access::Package => write!(f, "package"),
        }
    }
}
