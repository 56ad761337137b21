//! The report definition: grouping levels and the functions evaluated over them.
//!
//! Everything here is plain configuration. It is validated and resolved into a
//! [`FunctionRegistry`](crate::registry::FunctionRegistry) before evaluation.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tally_types::{FunctionName, GroupName};

use crate::layout::BandSizes;

/// One grouping level. Levels are ordered outer to inner; a level's identity
/// also includes the fields of every outer level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDefinition {
    pub name: GroupName,
    pub fields: Vec<String>,
    #[serde(default)]
    pub repeat_header: bool,
    #[serde(default)]
    pub repeat_footer: bool,
}

impl GroupDefinition {
    pub fn new<I, S>(name: impl Into<GroupName>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            repeat_header: false,
            repeat_footer: false,
        }
    }

    /// Repeat this group's header and footer on every page the group spans.
    pub fn repeating(mut self) -> Self {
        self.repeat_header = true;
        self.repeat_footer = true;
        self
    }
}

/// A reference to a grouping level, either by name or positionally as
/// `::group-N` (N counted from the outermost level).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Name(GroupName),
    Index(usize),
}

impl GroupRef {
    pub fn parse(s: &str) -> Self {
        s.strip_prefix("::group-")
            .and_then(|n| n.parse().ok())
            .map(GroupRef::Index)
            .unwrap_or_else(|| GroupRef::Name(GroupName::from(s)))
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Name(name) => write!(f, "{}", name),
            GroupRef::Index(i) => write!(f, "::group-{}", i),
        }
    }
}

/// Where a function's accumulator restarts.
///
/// In JSON a scope is a string: `"report"`, `"page"`, a group reference, or
/// `"page:<group>"` for a group instance intersected with the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Scope {
    /// Never resets.
    Report,
    /// Resets on every new instance of the group.
    Group(GroupRef),
    /// Resets on every page.
    Page,
    /// Resets on a new group instance and on every page.
    PageGroup(GroupRef),
}

impl Scope {
    pub fn group(group: &str) -> Self {
        Scope::Group(GroupRef::parse(group))
    }

    pub fn page_group(group: &str) -> Self {
        Scope::PageGroup(GroupRef::parse(group))
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err("empty scope".to_string()),
            "report" => Ok(Scope::Report),
            "page" => Ok(Scope::Page),
            _ => Ok(match s.strip_prefix("page:") {
                Some(group) => Scope::page_group(group),
                None => Scope::group(s),
            }),
        }
    }
}

impl TryFrom<String> for Scope {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    Sum,
    Count,
    Min,
    Max,
}

impl AggregationKind {
    pub fn name(self) -> &'static str {
        match self {
            AggregationKind::Sum => "sum",
            AggregationKind::Count => "count",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
        }
    }

    /// Count can run over bare rows; every other kind needs a value to fold.
    pub fn requires_input(self) -> bool {
        !matches!(self, AggregationKind::Count)
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which value of the accumulator a rendered node shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The value as of the band.
    #[default]
    Running,
    /// The final value of the scope instance the band belongs to.
    Total,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Input {
    Field(String),
    Function(FunctionName),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionConfig {
    pub name: FunctionName,
    pub scope: Scope,
    #[serde(default)]
    pub dependency_level: u32,
    pub kind: AggregationKind,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub input: Option<Input>,
}

impl FunctionConfig {
    pub fn new(name: impl Into<FunctionName>, kind: AggregationKind, scope: Scope) -> Self {
        Self {
            name: name.into(),
            scope,
            dependency_level: 0,
            kind,
            mode: Mode::Running,
            input: None,
        }
    }

    pub fn count(name: impl Into<FunctionName>, scope: Scope) -> Self {
        Self::new(name, AggregationKind::Count, scope)
    }

    pub fn sum(name: impl Into<FunctionName>, scope: Scope, field: &str) -> Self {
        Self::new(name, AggregationKind::Sum, scope).reading_field(field)
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.dependency_level = level;
        self
    }

    pub fn total(mut self) -> Self {
        self.mode = Mode::Total;
        self
    }

    pub fn reading_field(mut self, field: &str) -> Self {
        self.input = Some(Input::Field(field.to_string()));
        self
    }

    pub fn reading_function(mut self, function: impl Into<FunctionName>) -> Self {
        self.input = Some(Input::Function(function.into()));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportDefinition {
    pub groups: Vec<GroupDefinition>,
    pub functions: Vec<FunctionConfig>,
    pub band_sizes: BandSizes,
}

impl ReportDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: GroupDefinition) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_function(mut self, function: FunctionConfig) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_band_sizes(mut self, sizes: BandSizes) -> Self {
        self.band_sizes = sizes;
        self
    }
}
