use std::collections::HashMap;

use super::ServiceError;
use crate::models::product_tokens::ProductToken;
use crate::repositories::beacon::BeaconRules;

/// Parses every rule of the snapshot. One non-integer value makes the whole
/// table unusable, whichever slug it belongs to.
pub fn parse_beacon_rules(rules: &BeaconRules) -> Result<HashMap<String, i64>, ServiceError> {
    rules
        .iter()
        .map(|(slug, value)| {
            let points = value.parse::<i64>().map_err(|e| {
                ServiceError::Configuration(format!(
                    "Beacon rule for {slug} is not a number ({value:?}): {e}"
                ))
            })?;
            Ok((slug.clone(), points))
        })
        .collect()
}

/// Sums the rule value of every owned token. Slugs without a rule are worth
/// nothing; a malformed rule table fails the whole computation.
pub fn beacon_points(tokens: &[ProductToken], rules: &BeaconRules) -> Result<i64, ServiceError> {
    let rules = parse_beacon_rules(rules)?;

    tokens.iter().try_fold(0_i64, |total, token| {
        let slug = &token.product.slug;
        let Some(points) = rules.get(slug) else {
            return Ok(total);
        };

        total.checked_add(*points).ok_or_else(|| {
            ServiceError::Configuration(format!("Beacon points overflow at {slug}"))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product_tokens::ProductTokenProduct;

    fn token(token_id: i64, product_id: i64, slug: &str) -> ProductToken {
        ProductToken {
            token_id,
            product: ProductTokenProduct {
                id: product_id,
                slug: slug.to_string(),
            },
        }
    }

    fn rules(entries: &[(&str, &str)]) -> BeaconRules {
        entries
            .iter()
            .map(|(slug, value)| (slug.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_each_token_counts() {
        let tokens = vec![token(2, 1, "bythen-pod"), token(3, 1, "bythen-pod")];

        assert_eq!(beacon_points(&tokens, &rules(&[("bythen-pod", "10")])).unwrap(), 20);
    }

    #[test]
    fn test_unruled_slug_is_worth_nothing() {
        let tokens = vec![
            token(2, 1, "bythen-pod"),
            token(3, 1, "bythen-pod"),
            token(3, 6, "mystery-pod"),
        ];

        assert_eq!(beacon_points(&tokens, &rules(&[("bythen-pod", "10")])).unwrap(), 20);
        assert_eq!(beacon_points(&[token(3, 6, "mystery-pod")], &rules(&[])).unwrap(), 0);
    }

    #[test]
    fn test_mixed_rules() {
        let tokens = vec![
            token(1, 1, "bythen-pod"),
            token(2, 2, "bythen-card"),
            token(3, 2, "bythen-card"),
            token(4, 3, "bythen-chip"),
        ];
        let rules = rules(&[("bythen-pod", "10"), ("bythen-card", "25"), ("bythen-chip", "0")]);

        assert_eq!(beacon_points(&tokens, &rules).unwrap(), 60);
    }

    #[test]
    fn test_no_tokens() {
        assert_eq!(beacon_points(&[], &rules(&[("bythen-pod", "10")])).unwrap(), 0);
    }

    #[test]
    fn test_malformed_rule_is_a_configuration_error() {
        let tokens = vec![token(2, 1, "bythen-pod")];
        let result = beacon_points(&tokens, &rules(&[("bythen-pod", "ten")]));

        assert!(matches!(result, Err(ServiceError::Configuration(_))));
    }

    #[test]
    fn test_malformed_rule_for_unowned_slug_fails() {
        let tokens = vec![token(2, 1, "bythen-pod")];
        let rules = rules(&[("bythen-pod", "10"), ("bythen-card", "lots")]);

        assert!(matches!(
            beacon_points(&tokens, &rules),
            Err(ServiceError::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_rule_fails_without_tokens() {
        let rules = rules(&[("bythen-pod", "10"), ("bythen-card", "lots")]);

        assert!(matches!(
            beacon_points(&[], &rules),
            Err(ServiceError::Configuration(_))
        ));
    }

    #[test]
    fn test_parse_beacon_rules() {
        let parsed =
            parse_beacon_rules(&rules(&[("bythen-pod", "10"), ("bythen-card", "-3")])).unwrap();

        assert_eq!(parsed.get("bythen-pod"), Some(&10));
        assert_eq!(parsed.get("bythen-card"), Some(&-3));
        assert!(parse_beacon_rules(&rules(&[("bythen-pod", " 10")])).is_err());
    }

    #[test]
    fn test_overflow_is_a_configuration_error() {
        let tokens = vec![token(1, 1, "bythen-pod"), token(2, 1, "bythen-pod")];
        let max = i64::MAX.to_string();
        let result = beacon_points(&tokens, &rules(&[("bythen-pod", max.as_str())]));

        assert!(matches!(result, Err(ServiceError::Configuration(_))));
    }
}
