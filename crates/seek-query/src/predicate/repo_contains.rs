//! The `repo:contains(...)` predicate.

use tracing::debug;

use super::{ParamError, Predicate, parse_as_predicate};
use crate::{
    ast::{
        Annotation, FIELD_CONTENT, FIELD_FILE, FIELD_REPO, FIELD_SELECT, Labels, Node, Parameter,
        Pattern, Query,
    },
    parser::{SearchType, parse},
};

/// Restricts results to repositories that contain a matching file and/or content.
///
/// `repo:contains(file:README content:license)` expands to
/// `select:repo file:README license` followed by the parent query's plain `repo:` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContainsPredicate {
    /// File path pattern the repository must contain.
    pub file: Option<String>,
    /// Content pattern the repository must contain.
    pub content: Option<String>,
}

impl RepoContainsPredicate {
    /// Assigns `value` to `slot`, refusing to overwrite a non-empty value.
    fn set_once(
        slot: &mut Option<String>,
        value: String,
        option: &'static str,
    ) -> Result<(), ParamError> {
        if slot.is_some() {
            return Err(ParamError::DuplicateOption { option });
        }
        if !value.is_empty() {
            *slot = Some(value);
        }
        Ok(())
    }
}

impl Predicate for RepoContainsPredicate {
    fn field(&self) -> &'static str {
        FIELD_REPO
    }

    fn name(&self) -> &'static str {
        "contains"
    }

    fn parse_params(&mut self, params: &str) -> Result<(), ParamError> {
        let nodes = parse(params, SearchType::Regex).map_err(ParamError::Syntax)?;

        for node in nodes {
            match node {
                Node::Parameter(p) if p.is_field(FIELD_FILE) => {
                    Self::set_once(&mut self.file, p.value, FIELD_FILE)?;
                }
                Node::Parameter(p) if p.is_field(FIELD_CONTENT) => {
                    Self::set_once(&mut self.content, p.value, FIELD_CONTENT)?;
                }
                Node::Parameter(p) => {
                    return Err(ParamError::UnsupportedOption { field: p.field });
                }
                Node::Pattern(p) => {
                    Self::set_once(&mut self.content, p.value, FIELD_CONTENT)?;
                }
                other @ Node::Operator(_) => {
                    return Err(ParamError::UnsupportedNode { kind: other.kind() });
                }
            }
        }

        if self.file.is_none() && self.content.is_none() {
            return Err(ParamError::Empty);
        }

        Ok(())
    }

    fn expand(&self, parent: &Query) -> Query {
        let mut query = Query::new();
        query.push(Parameter::new(FIELD_SELECT, "repo"));

        if let Some(file) = &self.file {
            query.push(Parameter::new(FIELD_FILE, file.as_str()));
        }

        if let Some(content) = &self.content {
            query.push(Pattern::new(content.as_str()).with_annotation(Annotation {
                labels: Labels::REGEXP,
                ..Annotation::default()
            }));
        }

        query.extend(non_predicate_repos(parent));
        debug!(expansion = %query, "expanded repo:contains");
        query
    }
}

/// Collects the `repo:` parameters of `query` whose values are not predicates,
/// keeping their negation and annotation.
fn non_predicate_repos(query: &Query) -> Vec<Node> {
    let mut repos = Vec::new();
    query.visit_field(FIELD_REPO, |value, negated, annotation| {
        if parse_as_predicate(value).is_ok() {
            return;
        }
        repos.push(Node::Parameter(
            Parameter::new(FIELD_REPO, value)
                .with_negated(negated)
                .with_annotation(*annotation),
        ));
    });
    repos
}
