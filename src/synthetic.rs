//! Synthetic collections with known distributions.
//!
//! Deterministic generators for calibrating handlers and benchmarking: each
//! one has scores that can be worked out by hand.
//!
//! | Generator | Property |
//! |-----------|----------|
//! | [`uniform_collection`] | every value equally likely; all means equal `values_per_attribute`, information content `1.0` |
//! | [`one_rare_collection`] | last token unique on every trait |
//! | [`mixed_collection`] | 10,000 tokens with the [`mixed_trait_spread`] proportions |

use crate::model::{Collection, Distribution, Token};
use crate::normalize::NullPolicy;

/// Supply of [`mixed_collection`].
pub const MIXED_SUPPLY: u64 = 10_000;

/// Token `i` holds `value_{i % values_per_attribute}` on every attribute.
///
/// The distribution is exactly uniform when `values_per_attribute` divides
/// `token_total_supply`.
#[must_use]
pub fn uniform_collection(
    attribute_count: usize,
    values_per_attribute: usize,
    token_total_supply: usize,
) -> Collection {
    let tokens = (0..token_total_supply)
        .map(|i| {
            let value = i % values_per_attribute.max(1);
            Token::from_pairs(
                i as u64,
                (0..attribute_count).map(|a| (attribute_name(a), value_name(value))),
            )
        })
        .collect();
    Collection::new("uniform", tokens)
}

/// The last token holds `value_{values_per_attribute - 1}` on every attribute;
/// every other token cycles through the remaining values.
///
/// Common values are equally frequent when `values_per_attribute - 1` divides
/// `token_total_supply - 1`.
#[must_use]
pub fn one_rare_collection(
    attribute_count: usize,
    values_per_attribute: usize,
    token_total_supply: usize,
) -> Collection {
    let common_values = values_per_attribute.saturating_sub(1).max(1);
    let rare_index = token_total_supply.saturating_sub(1);
    let tokens = (0..token_total_supply)
        .map(|i| {
            let value = if i == rare_index {
                common_values
            } else {
                i % common_values
            };
            Token::from_pairs(
                i as u64,
                (0..attribute_count).map(|a| (attribute_name(a), value_name(value))),
            )
        })
        .collect();
    Collection::new("onerare", tokens)
}

/// Token counts per trait value of [`mixed_collection`].
///
/// ```text
/// hat:     cap 20%, beanie 30%, hood 45%, visor 5%
/// shirt:   white-t 80%, vest 20%
/// special: special 1%, everyone else has no special trait
/// ```
#[must_use]
pub fn mixed_trait_spread() -> Distribution {
    let spread: [(&str, &[(&str, u64)]); 3] = [
        (
            "hat",
            &[("cap", 2_000), ("beanie", 3_000), ("hood", 4_500), ("visor", 500)],
        ),
        ("shirt", &[("white-t", 8_000), ("vest", 2_000)]),
        ("special", &[("special", 100)]),
    ];
    spread
        .into_iter()
        .map(|(trait_type, values)| {
            let values = values
                .iter()
                .map(|&(value, count)| (value.to_owned(), count))
                .collect();
            (trait_type.to_owned(), values)
        })
        .collect()
}

/// A 10,000-token collection realizing [`mixed_trait_spread`] exactly.
///
/// Each trait type walks the tokens with a different stride so values of
/// different traits are not lined up token by token.
#[must_use]
pub fn mixed_collection() -> Collection {
    let spread = mixed_trait_spread();
    let strides = [1u64, 3, 7];

    let tokens = (0..MIXED_SUPPLY)
        .map(|i| {
            let attrs = spread
                .iter()
                .zip(strides)
                .filter_map(|((trait_type, values), stride)| {
                    let position = (i * stride) % MIXED_SUPPLY;
                    let mut upper = 0;
                    values.iter().find_map(|(value, &count)| {
                        upper += count;
                        (position < upper).then(|| (trait_type.clone(), value.clone()))
                    })
                })
                .collect();
            Token::new(i, attrs)
        })
        .collect();
    Collection::new("mixed", tokens)
}

/// Build a collection from literal trait maps, applying `policy`.
#[must_use]
pub fn collection_with_traits<I, A, K, V>(traits: I, policy: &NullPolicy) -> Collection
where
    I: IntoIterator<Item = A>,
    A: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    Collection::from_traits("literal", traits, policy)
}

fn attribute_name(index: usize) -> String {
    format!("attribute_{index}")
}

fn value_name(index: usize) -> String {
    format!("value_{index}")
}
