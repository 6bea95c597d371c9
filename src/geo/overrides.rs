//! Disambiguation overrides for country names the geocoding vocabulary does
//! not resolve cleanly, mostly the "X, <qualifier> of" ISO spellings.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// How a rule decides whether it applies to a country name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Applies to exactly this name.
    Exact(String),
    /// Applies to any name starting with this string.
    Prefix(String),
}

/// A substitute query for an ambiguous country name: the canonical query
/// string sent to the service and a two-letter region hint.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideRule {
    #[serde(flatten)]
    pub matcher: Matcher,
    pub query: String,
    pub region: String,
}

fn exact(name: &str, query: &str, region: &str) -> OverrideRule {
    OverrideRule {
        matcher: Matcher::Exact(name.to_string()),
        query: query.to_string(),
        region: region.to_string(),
    }
}

fn prefix(head: &str, query: &str, region: &str) -> OverrideRule {
    OverrideRule {
        matcher: Matcher::Prefix(head.to_string()),
        query: query.to_string(),
        region: region.to_string(),
    }
}

static BUILTIN: Lazy<Vec<OverrideRule>> = Lazy::new(|| {
    vec![
        // The country, not the US state.
        exact("Georgia", "Georgia", "ge"),
        exact("Korea, Republic of", "Korea", "kr"),
        exact("Palestine, State of", "Palestine", "ps"),
        exact("Taiwan, Province of China", "Taiwan", "tw"),
        prefix("Bolivia,", "Bolivia", "bo"),
        prefix("Iran,", "Iran", "ir"),
        prefix("Micronesia,", "Micronesia", "fm"),
        prefix("Moldova,", "Moldova", "md"),
        prefix("Tanzania,", "Tanzania", "tz"),
        prefix("Venezuela,", "Venezuela", "ve"),
    ]
});

/// The rule list consulted before falling back to the raw country name.
/// Exact rules win over prefix rules regardless of position in the list.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    /// Built-in rules plus `extra`, with `extra` consulted first within each
    /// matcher kind so configuration can shadow the built-ins.
    pub fn with_extra(extra: &[OverrideRule]) -> Self {
        let mut rules = extra.to_vec();
        rules.extend(BUILTIN.iter().cloned());
        Self { rules }
    }

    pub fn find(&self, country: &str) -> Option<&OverrideRule> {
        self.rules
            .iter()
            .find(|r| matches!(&r.matcher, Matcher::Exact(name) if name == country))
            .or_else(|| {
                self.rules.iter().find(
                    |r| matches!(&r.matcher, Matcher::Prefix(head) if country.starts_with(head.as_str())),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_rule_matches_the_full_name_only() {
        let table = OverrideTable::with_extra(&[]);
        let rule = table.find("Korea, Republic of").unwrap();
        assert_eq!(rule.query, "Korea");
        assert_eq!(rule.region, "kr");
        assert!(table.find("Korea").is_none());
    }

    #[test]
    fn prefix_rule_matches_any_tail() {
        let table = OverrideTable::with_extra(&[]);
        let rule = table.find("Tanzania, United Republic of").unwrap();
        assert_eq!(rule.query, "Tanzania");
        assert_eq!(rule.region, "tz");
    }

    #[test]
    fn exact_wins_over_prefix() {
        let table = OverrideTable::with_extra(&[
            prefix("Korea,", "South Korea", "kr"),
        ]);
        let rule = table.find("Korea, Republic of").unwrap();
        // The built-in exact rule beats the broader prefix rule.
        assert_eq!(rule.query, "Korea");
    }

    #[test]
    fn extra_rules_shadow_builtins_of_the_same_kind() {
        let table = OverrideTable::with_extra(&[exact("Georgia", "Sakartvelo", "ge")]);
        assert_eq!(table.find("Georgia").unwrap().query, "Sakartvelo");
    }

    #[test]
    fn unlisted_names_fall_through() {
        let table = OverrideTable::with_extra(&[]);
        assert!(table.find("France").is_none());
    }
}
