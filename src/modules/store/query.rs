/// Equality filter on a single column (`column=eq.value`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }

    pub fn to_param(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

/// Foreign row embedded into each result under `alias`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub alias: String,
    pub table: String,
    /// Column on the parent row holding the foreign `id`
    pub foreign_key: String,
    /// Embedded columns, `*` for all
    pub columns: Vec<String>,
}

impl Embed {
    pub fn render(&self) -> String {
        format!("{}:{}({})", self.alias, self.table, self.columns.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Select description for one table: columns, embeds, filters, ordering, limit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn embed(mut self, alias: &str, table: &str, foreign_key: &str, columns: &[&str]) -> Self {
        self.embeds.push(Embed {
            alias: alias.to_string(),
            table: table.to_string(),
            foreign_key: foreign_key.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The `select=` expression, e.g. `*,place:places(id,name,city)`
    pub fn select_expr(&self) -> String {
        std::iter::once("*".to_string())
            .chain(self.embeds.iter().map(Embed::render))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Query-string parameters understood by PostgREST
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select_expr())];

        params.extend(self.filters.iter().map(Filter::to_param));

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}
