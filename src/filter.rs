//! Filter options for OpenProject collection endpoints.
//!
//! OpenProject expects filters as a JSON array in the `filters` query
//! parameter, e.g. `[{"status":{"operator":"=","values":["21"]}}]`.
//! See <https://www.openproject.org/docs/api/filters/>.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{OpenProjectError, Result};

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchOperator {
    /// `=`
    #[serde(rename = "=")]
    Equal,
    /// `<>`
    #[serde(rename = "<>")]
    NotEqual,
    /// `>`
    #[serde(rename = ">")]
    GreaterThan,
    /// `<`
    #[serde(rename = "<")]
    LowerThan,
    /// `**` (full text search)
    #[serde(rename = "**")]
    SearchString,
    /// `~` (contains)
    #[serde(rename = "~")]
    Like,
    /// `>=`
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// `<=`
    #[serde(rename = "<=")]
    LowerOrEqual,
}

impl SearchOperator {
    /// Every operator, longest symbols first so parsing is unambiguous.
    const PARSE_ORDER: [SearchOperator; 8] = [
        Self::NotEqual,
        Self::GreaterOrEqual,
        Self::LowerOrEqual,
        Self::SearchString,
        Self::Equal,
        Self::GreaterThan,
        Self::LowerThan,
        Self::Like,
    ];

    /// The operator symbol as sent to the API.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::LowerThan => "<",
            Self::SearchString => "**",
            Self::Like => "~",
            Self::GreaterOrEqual => ">=",
            Self::LowerOrEqual => "<=",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        Self::PARSE_ORDER.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for SearchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `field operator values` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    /// Attribute to filter on (e.g. `status`, `assignee`, `subject`).
    pub field: String,
    /// Comparison operator.
    pub operator: SearchOperator,
    /// Values compared against.
    pub values: Vec<String>,
}

impl FilterField {
    /// Create a condition with a single value.
    pub fn new(
        field: impl Into<String>,
        operator: SearchOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            values: vec![value.into()],
        }
    }

    fn to_value(&self) -> Value {
        let mut condition = Map::new();
        condition.insert(
            self.field.clone(),
            json!({
                "operator": self.operator.symbol(),
                "values": self.values,
            }),
        );
        Value::Object(condition)
    }
}

impl FromStr for FilterField {
    type Err = OpenProjectError;

    /// Parse `field<op>value[,value...]`, e.g. `status=21` or `subject~release`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || OpenProjectError::InvalidFilter(s.to_string());

        let (start, operator) = SearchOperator::PARSE_ORDER
            .into_iter()
            .filter_map(|op| s.find(op.symbol()).map(|idx| (idx, op)))
            .min_by_key(|(idx, op)| (*idx, std::cmp::Reverse(op.symbol().len())))
            .ok_or_else(invalid)?;

        let field = s[..start].trim();
        let rest = s[start + operator.symbol().len()..].trim();
        if field.is_empty() || rest.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            field: field.to_string(),
            operator,
            values: rest.split(',').map(|v| v.trim().to_string()).collect(),
        })
    }
}

/// Set of filter conditions applied to a collection request.
///
/// An empty set is the "no filter" value: no `filters` parameter is sent
/// at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Conditions, combined with AND by the server.
    pub fields: Vec<FilterField>,
}

impl FilterOptions {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition.
    #[must_use]
    pub fn with(
        mut self,
        field: impl Into<String>,
        operator: SearchOperator,
        value: impl Into<String>,
    ) -> Self {
        self.fields.push(FilterField::new(field, operator, value));
        self
    }

    /// Returns true if no conditions are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON value of the `filters` query parameter, or `None` when empty.
    pub fn to_query_value(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let filters: Vec<Value> = self.fields.iter().map(FilterField::to_value).collect();
        Some(Value::Array(filters).to_string())
    }

    /// Parse the JSON value of a `filters` query parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid filter array.
    pub fn from_query_value(raw: &str) -> Result<Self> {
        let invalid = || OpenProjectError::InvalidFilter(raw.to_string());

        #[derive(Deserialize)]
        struct Condition {
            operator: SearchOperator,
            #[serde(default)]
            values: Vec<String>,
        }

        let entries: Vec<Map<String, Value>> = serde_json::from_str(raw)?;
        let mut fields = Vec::with_capacity(entries.len());

        for entry in entries {
            let (field, condition) = entry.into_iter().next().ok_or_else(invalid)?;
            let condition: Condition = serde_json::from_value(condition)?;
            fields.push(FilterField {
                field,
                operator: condition.operator,
                values: condition.values,
            });
        }

        Ok(Self { fields })
    }

    /// Find the first condition on `field`.
    pub fn get(&self, field: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.field == field)
    }
}

impl FromIterator<FilterField> for FilterOptions {
    fn from_iter<I: IntoIterator<Item = FilterField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_sends_nothing() {
        assert_eq!(FilterOptions::new().to_query_value(), None);
    }

    #[test]
    fn test_filter_encoding() {
        let filter = FilterOptions::new().with("status", SearchOperator::Equal, "21");
        let value = filter.to_query_value().unwrap();
        assert_eq!(value, r#"[{"status":{"operator":"=","values":["21"]}}]"#);
        assert_eq!(
            urlencoding::encode(&value),
            concat!(
                "%5B%7B%22status%22%3A%7B%22operator%22%3A%22%3D%22",
                "%2C%22values%22%3A%5B%2221%22%5D%7D%7D%5D"
            )
        );
    }

    #[test]
    fn test_filter_round_trips_through_query_value() {
        let filter = FilterOptions::new()
            .with("status", SearchOperator::NotEqual, "3")
            .with("subject", SearchOperator::Like, "release");
        let parsed = FilterOptions::from_query_value(&filter.to_query_value().unwrap()).unwrap();
        assert_eq!(parsed, filter);
    }

    #[test]
    fn test_parse_filter_expressions() {
        let f: FilterField = "status=21".parse().unwrap();
        assert_eq!(f, FilterField::new("status", SearchOperator::Equal, "21"));

        let f: FilterField = "status<>1,2".parse().unwrap();
        assert_eq!(f.operator, SearchOperator::NotEqual);
        assert_eq!(f.values, vec!["1", "2"]);

        let f: FilterField = "dueDate>=2024-01-01".parse().unwrap();
        assert_eq!(f.operator, SearchOperator::GreaterOrEqual);
        assert_eq!(f.values, vec!["2024-01-01"]);

        let f: FilterField = "search**bug report".parse().unwrap();
        assert_eq!(f.operator, SearchOperator::SearchString);
        assert_eq!(f.values, vec!["bug report"]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("status".parse::<FilterField>().is_err());
        assert!("=21".parse::<FilterField>().is_err());
        assert!("status=".parse::<FilterField>().is_err());
    }
}
