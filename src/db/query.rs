/// Sort direction for an `order` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Builder for a PostgREST table request.
///
/// Rendered into query-string pairs by [`Query::params`]; the table name and
/// the single-row flag travel alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    any_of: Option<String>,
    order: Option<(String, Direction)>,
    limit: Option<usize>,
    single: bool,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: None,
            filters: Vec::new(),
            any_of: None,
            order: None,
            limit: None,
            single: false,
        }
    }

    /// Column list or embedding expression. Whitespace is dropped.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.split_whitespace().collect());
        self
    }

    /// `column = value`
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Matches rows where any of `columns` contains `needle`, ignoring case.
    pub fn ilike_any(mut self, columns: &[&str], needle: &str) -> Self {
        let terms: Vec<String> = columns
            .iter()
            .map(|column| format!("{}.ilike.*{}*", column, needle))
            .collect();
        self.any_of = Some(format!("({})", terms.join(",")));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Ask for exactly one row as a JSON object.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(any_of) = &self.any_of {
            params.push(("or".to_string(), any_of.clone()));
        }
        if let Some((column, direction)) = &self.order {
            params.push((
                "order".to_string(),
                format!("{}.{}", column, direction.as_str()),
            ));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}
