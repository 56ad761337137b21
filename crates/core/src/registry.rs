//! Validation of function configurations and their evaluation order.

use std::collections::HashMap;

use itertools::Itertools;
use log::debug;
use tally_types::{FunctionName, GroupName};

use crate::definition::{
    AggregationKind, FunctionConfig, GroupDefinition, GroupRef, Input, Mode, Scope,
};
use crate::error::ConfigError;
use crate::scope::ResolvedScope;
use crate::source::DataSource;

/// Where a function's per-item contribution comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedInput {
    /// Every item row contributes.
    Rows,
    Field(String),
    /// Position of the input function in evaluation order.
    Function(usize),
}

/// A validated function, ready for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFunction {
    pub name: FunctionName,
    pub kind: AggregationKind,
    pub mode: Mode,
    pub dependency_level: u32,
    pub scope: ResolvedScope,
    pub input: ResolvedInput,
    /// Whether the value depends on page boundaries, directly or through an
    /// input function.
    pub page_dependent: bool,
}

/// The active functions in evaluation order: ascending dependency level,
/// ties broken by declaration order.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: Vec<PreparedFunction>,
    groups: Vec<GroupDefinition>,
    index: HashMap<FunctionName, usize>,
}

impl FunctionRegistry {
    pub fn prepare(
        groups: &[GroupDefinition],
        configs: &[FunctionConfig],
    ) -> Result<Self, ConfigError> {
        if let Some(group) = groups.iter().map(|g| &g.name).duplicates().next() {
            return Err(ConfigError::DuplicateGroup(group.clone()));
        }
        if let Some(group) = groups.iter().find(|g| g.fields.is_empty()) {
            return Err(ConfigError::EmptyGroup(group.name.clone()));
        }
        if let Some(name) = configs.iter().map(|f| &f.name).duplicates().next() {
            return Err(ConfigError::DuplicateFunction(name.clone()));
        }

        let by_name: HashMap<&FunctionName, &FunctionConfig> =
            configs.iter().map(|f| (&f.name, f)).collect();

        for config in configs {
            if config.kind.requires_input() && config.input.is_none() {
                return Err(ConfigError::MissingInput {
                    function: config.name.clone(),
                    kind: config.kind.name(),
                });
            }
            if let Some(Input::Function(target)) = &config.input {
                let target_config =
                    by_name
                        .get(target)
                        .ok_or_else(|| ConfigError::UnknownFunctionInput {
                            function: config.name.clone(),
                            input: target.clone(),
                        })?;
                if target_config.dependency_level >= config.dependency_level {
                    return Err(ConfigError::DependencyOrder {
                        reader: config.name.clone(),
                        reader_level: config.dependency_level,
                        target: target.clone(),
                        target_level: target_config.dependency_level,
                    });
                }
            }
        }

        let ordered: Vec<&FunctionConfig> = configs
            .iter()
            .sorted_by_key(|f| f.dependency_level)
            .collect();
        let index: HashMap<FunctionName, usize> = ordered
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        let mut functions: Vec<PreparedFunction> = Vec::with_capacity(ordered.len());
        for config in ordered {
            let scope = resolve_scope(groups, config)?;
            let input = match &config.input {
                None => ResolvedInput::Rows,
                Some(Input::Field(field)) => ResolvedInput::Field(field.clone()),
                // Existence was checked above.
                Some(Input::Function(target)) => ResolvedInput::Function(index[target]),
            };
            let page_dependent = scope.is_page_bound()
                || matches!(input, ResolvedInput::Function(i) if functions[i].page_dependent);
            functions.push(PreparedFunction {
                name: config.name.clone(),
                kind: config.kind,
                mode: config.mode,
                dependency_level: config.dependency_level,
                scope,
                input,
                page_dependent,
            });
        }

        debug!(
            "Prepared {} functions ({} page-dependent) over {} group levels: [{}]",
            functions.len(),
            functions.iter().filter(|f| f.page_dependent).count(),
            groups.len(),
            functions.iter().map(|f| f.name.as_str()).join(", ")
        );

        Ok(Self {
            functions,
            groups: groups.to_vec(),
            index,
        })
    }

    /// Checks every group field and field input against the columns of the
    /// data source.
    pub fn check_fields<S: DataSource + ?Sized>(&self, source: &S) -> Result<(), ConfigError> {
        let group_fields = self
            .groups
            .iter()
            .flat_map(|g| g.fields.iter().map(move |f| (format!("group '{}'", g.name), f)));
        let input_fields = self.functions.iter().filter_map(|f| match &f.input {
            ResolvedInput::Field(field) => Some((format!("function '{}'", f.name), field)),
            _ => None,
        });

        match group_fields
            .chain(input_fields)
            .find(|(_, field)| !source.has_field(field))
        {
            Some((owner, field)) => Err(ConfigError::UnknownField {
                owner,
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn functions(&self) -> &[PreparedFunction] {
        &self.functions
    }

    pub fn groups(&self) -> &[GroupDefinition] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Evaluation position of a function.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&FunctionName::from(name)).copied()
    }

    pub fn get(&self, name: &str) -> Option<&PreparedFunction> {
        self.position(name).map(|i| &self.functions[i])
    }

    /// Per function, in evaluation order, whether it must be replayed when
    /// page boundaries move.
    pub fn page_dependent_mask(&self) -> Vec<bool> {
        self.functions.iter().map(|f| f.page_dependent).collect()
    }

    pub fn has_page_dependent(&self) -> bool {
        self.functions.iter().any(|f| f.page_dependent)
    }
}

fn resolve_scope(
    groups: &[GroupDefinition],
    config: &FunctionConfig,
) -> Result<ResolvedScope, ConfigError> {
    let level = |group: &GroupRef| {
        let found = match group {
            GroupRef::Index(i) => (*i < groups.len()).then_some(*i),
            GroupRef::Name(name) => groups.iter().position(|g| &g.name == name),
        };
        found.ok_or_else(|| ConfigError::UnknownGroup {
            function: config.name.clone(),
            group: group.to_string(),
        })
    };
    Ok(match &config.scope {
        Scope::Report => ResolvedScope::Report,
        Scope::Page => ResolvedScope::Page,
        Scope::Group(group) => ResolvedScope::Group(level(group)?),
        Scope::PageGroup(group) => ResolvedScope::PageGroup(level(group)?),
    })
}

/// Group names in the order they nest, for log output.
pub fn group_chain(groups: &[GroupDefinition]) -> String {
    groups.iter().map(|g| &g.name).map(GroupName::as_str).join(" > ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TableDataSource;

    fn groups() -> Vec<GroupDefinition> {
        vec![
            GroupDefinition::new("Region", ["Region"]),
            GroupDefinition::new("City", ["City"]),
        ]
    }

    #[test]
    fn orders_by_level_then_declaration() {
        let configs = vec![
            FunctionConfig::count("late", Scope::Report).with_level(2),
            FunctionConfig::count("a", Scope::Page),
            FunctionConfig::count("b", Scope::group("City")),
        ];
        let registry = FunctionRegistry::prepare(&groups(), &configs).unwrap();
        let names: Vec<_> = registry.functions().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "late"]);
        assert_eq!(registry.get("b").unwrap().scope, ResolvedScope::Group(1));
        assert_eq!(registry.position("late"), Some(2));
    }

    #[test]
    fn page_dependency_is_transitive() {
        let configs = vec![
            FunctionConfig::count("per-page", Scope::Page),
            FunctionConfig::new("max-page", AggregationKind::Max, Scope::Report)
                .reading_function("per-page")
                .with_level(1),
            FunctionConfig::sum("total", Scope::Report, "Value"),
        ];
        let registry = FunctionRegistry::prepare(&groups(), &configs).unwrap();
        assert_eq!(registry.page_dependent_mask(), vec![true, false, true]);
        assert_eq!(registry.get("max-page").unwrap().input, ResolvedInput::Function(0));
        assert!(registry.has_page_dependent());

        let group_only = vec![FunctionConfig::sum("total", Scope::Report, "Value")];
        let registry = FunctionRegistry::prepare(&groups(), &group_only).unwrap();
        assert!(!registry.has_page_dependent());
    }

    #[test]
    fn rejects_duplicates() {
        let configs = vec![
            FunctionConfig::count("n", Scope::Report),
            FunctionConfig::count("n", Scope::Page),
        ];
        assert_eq!(
            FunctionRegistry::prepare(&groups(), &configs).unwrap_err(),
            ConfigError::DuplicateFunction(FunctionName::from("n"))
        );

        let mut doubled = groups();
        doubled.push(GroupDefinition::new("City", ["Street"]));
        assert_eq!(
            FunctionRegistry::prepare(&doubled, &[]).unwrap_err(),
            ConfigError::DuplicateGroup(GroupName::from("City"))
        );
    }

    #[test]
    fn rejects_unknown_groups() {
        for scope in [Scope::group("Country"), Scope::page_group("::group-2")] {
            let configs = vec![FunctionConfig::count("n", scope)];
            assert!(matches!(
                FunctionRegistry::prepare(&groups(), &configs),
                Err(ConfigError::UnknownGroup { .. })
            ));
        }
    }

    #[test]
    fn rejects_equal_level_reads() {
        let configs = vec![
            FunctionConfig::count("a", Scope::Report).with_level(1),
            FunctionConfig::new("b", AggregationKind::Sum, Scope::Report)
                .reading_function("a")
                .with_level(1),
        ];
        assert!(matches!(
            FunctionRegistry::prepare(&groups(), &configs),
            Err(ConfigError::DependencyOrder { reader_level: 1, target_level: 1, .. })
        ));
    }

    #[test]
    fn rejects_bad_inputs() {
        let missing = vec![FunctionConfig::new("s", AggregationKind::Sum, Scope::Report)];
        assert!(matches!(
            FunctionRegistry::prepare(&groups(), &missing),
            Err(ConfigError::MissingInput { kind: "sum", .. })
        ));

        let unknown = vec![
            FunctionConfig::new("s", AggregationKind::Sum, Scope::Report)
                .reading_function("ghost")
                .with_level(1),
        ];
        assert!(matches!(
            FunctionRegistry::prepare(&groups(), &unknown),
            Err(ConfigError::UnknownFunctionInput { .. })
        ));

        let empty = vec![GroupDefinition::new("Nothing", Vec::<String>::new())];
        assert_eq!(
            FunctionRegistry::prepare(&empty, &[]).unwrap_err(),
            ConfigError::EmptyGroup(GroupName::from("Nothing"))
        );
    }

    #[test]
    fn checks_fields_against_source() {
        let source = TableDataSource::new(["Region", "City"]);
        let configs = vec![FunctionConfig::sum("s", Scope::Report, "Amount")];
        let registry = FunctionRegistry::prepare(&groups(), &configs).unwrap();

        assert_eq!(
            registry.check_fields(&source),
            Err(ConfigError::UnknownField {
                owner: "function 's'".to_string(),
                field: "Amount".to_string(),
            })
        );
        assert_eq!(group_chain(registry.groups()), "Region > City");
    }
}
