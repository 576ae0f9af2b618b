//! Allowance aggregation.
//!
//! Allowances are reported on the payslip and added to gross pay, but
//! they do not enter taxable income or the net-salary arithmetic.

use crate::models::{AllowanceBreakdown, AllowanceItem, AllowanceRule};
use crate::money::rule_amount;

/// Evaluates every enabled rule against `basic_salary`.
///
/// Disabled rules are left out entirely.  Items keep the configured
/// rule order and `total` is their sum.
pub fn aggregate_allowances(basic_salary: f64, rules: &[AllowanceRule]) -> AllowanceBreakdown {
    let items: Vec<AllowanceItem> = rules
        .iter()
        .filter(|rule| rule.enabled)
        .map(|rule| AllowanceItem {
            name: rule.name.clone(),
            amount: rule_amount(rule.kind, rule.value, basic_salary),
        })
        .collect();
    let total = items.iter().map(|item| item.amount).sum();
    AllowanceBreakdown { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleKind;
    use pretty_assertions::assert_eq;

    fn rule(name: &str, kind: RuleKind, value: f64, enabled: bool) -> AllowanceRule {
        AllowanceRule {
            name: name.into(),
            kind,
            value,
            enabled,
        }
    }

    #[test]
    fn test_mixes_percentage_and_fixed() {
        let rules = vec![
            rule("Housing", RuleKind::Percentage, 15.0, true),
            rule("Transport", RuleKind::Fixed, 3_000.0, true),
        ];
        let breakdown = aggregate_allowances(50_000.0, &rules);
        assert_eq!(
            breakdown.items,
            vec![
                AllowanceItem { name: "Housing".into(), amount: 7_500.0 },
                AllowanceItem { name: "Transport".into(), amount: 3_000.0 },
            ]
        );
        assert_eq!(breakdown.total, 10_500.0);
    }

    #[test]
    fn test_disabled_rules_are_excluded() {
        let rules = vec![
            rule("Housing", RuleKind::Percentage, 15.0, false),
            rule("Meal", RuleKind::Fixed, 1_500.0, true),
        ];
        let breakdown = aggregate_allowances(50_000.0, &rules);
        assert_eq!(breakdown.items.len(), 1);
        assert_eq!(breakdown.items[0].name, "Meal");
        assert_eq!(breakdown.total, 1_500.0);
    }

    #[test]
    fn test_no_rules_yields_empty_breakdown() {
        assert_eq!(aggregate_allowances(50_000.0, &[]), AllowanceBreakdown::default());
    }
}
