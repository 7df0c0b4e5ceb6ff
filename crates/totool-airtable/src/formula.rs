//! Airtable formula generation for simple field comparisons

use serde::{Deserialize, Serialize};

/// Comparison performed by the search-records tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchType {
    Equals,
    NotEquals,
    Contains,
    NotContains,
}

impl SearchType {
    /// Wire names, in schema order
    pub const ALL: [&'static str; 4] = ["equals", "notEquals", "contains", "notContains"];

    /// `filterByFormula` expression comparing `field` against `value`
    pub fn formula(self, field: &str, value: &str) -> String {
        let field = field.replace('}', "\\}");
        let value = escape(value);
        match self {
            Self::Equals => format!("{{{field}}} = \"{value}\""),
            Self::NotEquals => format!("{{{field}}} != \"{value}\""),
            Self::Contains => format!("FIND(\"{value}\", {{{field}}}) > 0"),
            Self::NotContains => format!("FIND(\"{value}\", {{{field}}}) = 0"),
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formulas() {
        assert_eq!(SearchType::Equals.formula("Name", "Ada"), "{Name} = \"Ada\"");
        assert_eq!(
            SearchType::NotEquals.formula("Status", "Done"),
            "{Status} != \"Done\""
        );
        assert_eq!(
            SearchType::Contains.formula("Name", "J"),
            "FIND(\"J\", {Name}) > 0"
        );
        assert_eq!(
            SearchType::NotContains.formula("Notes", "spam"),
            "FIND(\"spam\", {Notes}) = 0"
        );
    }

    #[test]
    fn test_value_is_escaped() {
        assert_eq!(
            SearchType::Equals.formula("Title", "say \"hi\" \\o/"),
            "{Title} = \"say \\\"hi\\\" \\\\o/\""
        );
    }

    #[test]
    fn test_closing_brace_in_field_is_escaped() {
        assert_eq!(
            SearchType::Equals.formula("Cost {USD}", "5"),
            "{Cost {USD\\}} = \"5\""
        );
        assert_eq!(
            SearchType::Contains.formula("a}b", "x"),
            "FIND(\"x\", {a\\}b}) > 0"
        );
    }

    #[test]
    fn test_wire_names() {
        let parsed: SearchType = serde_json::from_str("\"notContains\"").unwrap();
        assert_eq!(parsed, SearchType::NotContains);
        for name in SearchType::ALL {
            assert!(serde_json::from_value::<SearchType>(serde_json::json!(name)).is_ok());
        }
    }
}
