//! Symbol records and the scope snapshots stamped onto them.

use std::fmt;

use serde::Serialize;

/// Value type keyword of a config symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// `bool`
    Bool,
    /// `tristate`
    Tristate,
    /// `string`
    String,
    /// `int`
    Int,
    /// `hex`
    Hex,
}

impl TypeKind {
    /// Maps a Kconfig type keyword to its kind.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "bool" => Some(Self::Bool),
            "tristate" => Some(Self::Tristate),
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "hex" => Some(Self::Hex),
            _ => None,
        }
    }

    /// The keyword as written in Kconfig.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Tristate => "tristate",
            Self::String => "string",
            Self::Int => "int",
            Self::Hex => "hex",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.keyword())
    }
}

/// Directive that introduced a default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultKind {
    /// `default`
    Default,
    /// `def_bool`
    DefBool,
    /// `def_tristate`
    DefTristate,
}

impl DefaultKind {
    /// Maps a default directive keyword to its kind.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "default" => Some(Self::Default),
            "def_bool" => Some(Self::DefBool),
            "def_tristate" => Some(Self::DefTristate),
            _ => None,
        }
    }

    /// The keyword as written in Kconfig.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::DefBool => "def_bool",
            Self::DefTristate => "def_tristate",
        }
    }
}

impl fmt::Display for DefaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.keyword())
    }
}

/// A type line, e.g. `bool "Networking support"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeEntry {
    /// The type keyword.
    pub kind: TypeKind,
    /// Verbatim remainder of the line (inline prompt and/or `if` condition).
    pub rest: Option<String>,
}

/// A default line, e.g. `def_bool y if X86`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultEntry {
    /// Which default keyword.
    pub kind: DefaultKind,
    /// Verbatim value expression.
    pub expr: String,
}

/// An open `menu` / `mainmenu` scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuScope {
    /// Title with quotes removed.
    pub title: String,
    /// `depends on` lines directly after the menu line.
    pub depends_on: Vec<String>,
    /// `visible if` lines directly after the menu line.
    pub visible_if: Vec<String>,
}

impl MenuScope {
    /// A scope with the given title and no conditions.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// An open `choice` scope.
///
/// Choices group mutually exclusive symbols but are not symbols themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChoiceScope {
    /// Optional name given on the `choice` line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Last `prompt` seen inside the choice, quotes stripped.
    pub prompt: String,
    /// `depends on` lines of the choice itself.
    pub depends_on: Vec<String>,
    /// `default` expressions, naming the preselected member.
    pub default: Vec<String>,
    /// Bare type lines such as `bool` or `tristate`.
    pub type_entries: Vec<TypeEntry>,
}

/// Copies of the live if/menu/choice stacks, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopeSnapshot {
    /// Conditions of enclosing `if` blocks.
    pub if_context: Vec<String>,
    /// Enclosing menus, `mainmenu` included.
    pub menu_context: Vec<MenuScope>,
    /// Enclosing choices.
    pub choice_context: Vec<ChoiceScope>,
}

/// Everything collected about one `config` / `menuconfig` symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Name without the `CONFIG_` prefix.
    pub name: String,
    /// Declared with `menuconfig` at least once.
    pub menuconfig: bool,
    /// Files that declare the symbol, in parse order. Repeats are kept.
    pub declaring_files: Vec<String>,
    /// Help lines with the block indentation removed.
    pub help: Vec<String>,
    /// `depends on` expressions, verbatim and in order.
    pub depends_on: Vec<String>,
    /// `select` expressions.
    pub select: Vec<String>,
    /// `imply` expressions.
    pub imply: Vec<String>,
    /// Type lines.
    pub type_entries: Vec<TypeEntry>,
    /// `default` / `def_bool` / `def_tristate` lines.
    pub default_entries: Vec<DefaultEntry>,
    /// `range` lines.
    pub range: Vec<String>,
    /// `option` lines.
    pub option: Vec<String>,
    /// `prompt` lines, verbatim.
    pub prompt: Vec<String>,
    /// Scopes enclosing the first declaration.
    #[serde(flatten)]
    pub scope: ScopeSnapshot,
}

impl Symbol {
    /// An empty record for `name` declared under `scope`.
    #[must_use]
    pub fn new(name: impl Into<String>, scope: ScopeSnapshot) -> Self {
        Self {
            name: name.into(),
            menuconfig: false,
            declaring_files: Vec::new(),
            help: Vec::new(),
            depends_on: Vec::new(),
            select: Vec::new(),
            imply: Vec::new(),
            type_entries: Vec::new(),
            default_entries: Vec::new(),
            range: Vec::new(),
            option: Vec::new(),
            prompt: Vec::new(),
            scope,
        }
    }

    /// The if-conditions enclosing the declaration.
    #[must_use]
    pub fn if_context(&self) -> &[String] {
        &self.scope.if_context
    }

    /// The menus enclosing the declaration, outermost first.
    #[must_use]
    pub fn menu_context(&self) -> &[MenuScope] {
        &self.scope.menu_context
    }

    /// The choices enclosing the declaration, outermost first.
    #[must_use]
    pub fn choice_context(&self) -> &[ChoiceScope] {
        &self.scope.choice_context
    }

    /// Entries of one relation field.
    #[must_use]
    pub fn relation(&self, field: RelationField) -> &[String] {
        match field {
            RelationField::DependsOn => &self.depends_on,
            RelationField::Select => &self.select,
            RelationField::Imply => &self.imply,
        }
    }
}

/// Relation fields that [`SymbolTable::search`](crate::SymbolTable::search)
/// can scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationField {
    /// [`Symbol::depends_on`]
    DependsOn,
    /// [`Symbol::select`]
    Select,
    /// [`Symbol::imply`]
    Imply,
}

impl RelationField {
    /// All searchable fields.
    pub const ALL: [Self; 3] = [Self::DependsOn, Self::Select, Self::Imply];

    /// Field name as used in serialized output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DependsOn => "depends_on",
            Self::Select => "select",
            Self::Imply => "imply",
        }
    }
}

impl fmt::Display for RelationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
