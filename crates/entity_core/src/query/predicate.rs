//! SQL predicates and their boolean composition.

use rusqlite::types::Value;

/// One parameterized SQL boolean expression using `?` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    sql: String,
    params: Vec<Value>,
}

impl Predicate {
    pub fn new(sql: impl Into<String>, params: impl IntoIterator<Item = Value>) -> Self {
        Self {
            sql: sql.into(),
            params: params.into_iter().collect(),
        }
    }

    /// `column = ?`
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(format!("{column} = ?"), [value.into()])
    }

    /// `column LIKE '%' || ? || '%'`
    pub fn contains(column: &str, needle: impl Into<String>) -> Self {
        Self::new(
            format!("{column} LIKE '%' || ? || '%'"),
            [Value::Text(needle.into())],
        )
    }

    /// `column IN (?, ...)`, or `None` for an empty list.
    pub fn in_list(column: &str, values: impl IntoIterator<Item = Value>) -> Option<Self> {
        let params: Vec<Value> = values.into_iter().collect();
        if params.is_empty() {
            return None;
        }
        Some(Self::new(
            format!("{column} IN ({})", placeholders(params.len())),
            params,
        ))
    }

    /// `column NOT IN (?, ...)`, or `None` for an empty list.
    pub fn not_in_list(column: &str, values: impl IntoIterator<Item = Value>) -> Option<Self> {
        let params: Vec<Value> = values.into_iter().collect();
        if params.is_empty() {
            return None;
        }
        Some(Self::new(
            format!("{column} NOT IN ({})", placeholders(params.len())),
            params,
        ))
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Conjunction of predicates contributed for one search object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGroup {
    predicates: Vec<Predicate>,
}

impl FilterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Adds the predicate when present; handy with [`Predicate::in_list`].
    pub fn and_some(&mut self, predicate: Option<Predicate>) {
        if let Some(predicate) = predicate {
            self.predicates.push(predicate);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    fn render(&self) -> (String, Vec<Value>) {
        let sql = self
            .predicates
            .iter()
            .map(|predicate| format!("({})", predicate.sql))
            .collect::<Vec<_>>()
            .join(" AND ");
        let params = self
            .predicates
            .iter()
            .flat_map(|predicate| predicate.params.iter().cloned())
            .collect();
        (sql, params)
    }
}

/// Disjunction of per-search-object groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterClause {
    groups: Vec<FilterGroup>,
}

impl FilterClause {
    pub fn new(groups: Vec<FilterGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    /// Whether every row is eligible.
    ///
    /// True without groups, and when any group carries no predicate since
    /// that group alone already admits every row.
    pub fn matches_all(&self) -> bool {
        self.groups.is_empty() || self.groups.iter().any(FilterGroup::is_empty)
    }

    /// Renders the `WHERE` body, or `None` when every row is eligible.
    pub fn render(&self) -> Option<(String, Vec<Value>)> {
        if self.matches_all() {
            return None;
        }

        if let [single] = self.groups.as_slice() {
            return Some(single.render());
        }

        let mut parts = Vec::with_capacity(self.groups.len());
        let mut params = Vec::new();
        for group in &self.groups {
            let (sql, group_params) = group.render();
            parts.push(format!("({sql})"));
            params.extend(group_params);
        }
        Some((parts.join(" OR "), params))
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
