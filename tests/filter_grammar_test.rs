//! Narrowing grammar of dataset filters and rule name normalization

use pretty_assertions::assert_eq;
use resource_access_core::domain::{
    validate, validate_chain, DatasetFilter, DatasetFilterError, DatasetFilterInput, FilterType,
    Rule,
};
use rstest::rstest;
use std::collections::BTreeSet;

fn ids(values: &[i64]) -> BTreeSet<i64> {
    values.iter().copied().collect()
}

#[test]
fn test_every_pair_follows_the_table() {
    for parent in FilterType::ALL {
        for child in FilterType::ALL {
            let result = validate(child, &ids(&[1]), Some(parent));
            if parent.allowed_children().contains(&child) {
                assert_eq!(result, Ok(()), "{parent} -> {child}");
            } else {
                assert_eq!(
                    result,
                    Err(DatasetFilterError::IncompatibleType {
                        parent,
                        filter_type: child
                    }),
                    "{parent} -> {child}"
                );
            }
        }
    }
}

#[rstest]
#[case(FilterType::HostGroup, FilterType::Host, true)]
#[case(FilterType::HostGroup, FilterType::Service, true)]
#[case(FilterType::HostCategory, FilterType::ServiceGroup, true)]
#[case(FilterType::Host, FilterType::ServiceCategory, true)]
#[case(FilterType::ServiceGroup, FilterType::Service, true)]
#[case(FilterType::ServiceCategory, FilterType::Service, true)]
#[case(FilterType::Host, FilterType::HostGroup, false)]
#[case(FilterType::Host, FilterType::HostCategory, false)]
#[case(FilterType::Service, FilterType::Service, false)]
#[case(FilterType::ServiceGroup, FilterType::Host, false)]
#[case(FilterType::MetaService, FilterType::Service, false)]
#[case(FilterType::All, FilterType::Host, false)]
#[case(FilterType::HostGroup, FilterType::HostGroup, false)]
fn test_narrowing_pairs(
    #[case] parent: FilterType,
    #[case] child: FilterType,
    #[case] allowed: bool,
) {
    assert_eq!(parent.can_be_narrowed_by(child), allowed);
    assert_eq!(validate(child, &ids(&[7]), Some(parent)).is_ok(), allowed);
}

#[rstest]
fn test_empty_resource_set_always_rejected(
    #[values(
        FilterType::All,
        FilterType::Host,
        FilterType::HostGroup,
        FilterType::HostCategory,
        FilterType::Service,
        FilterType::ServiceGroup,
        FilterType::ServiceCategory,
        FilterType::MetaService,
        FilterType::Empty
    )]
    filter_type: FilterType,
    #[values(None, Some(FilterType::HostGroup), Some(FilterType::Service))]
    parent: Option<FilterType>,
) {
    assert_eq!(
        validate(filter_type, &BTreeSet::new(), parent),
        Err(DatasetFilterError::EmptyResourceSet { filter_type })
    );
}

#[test]
fn test_placeholder_type_and_bad_ids_rejected() {
    assert_eq!(
        validate(FilterType::Empty, &ids(&[1]), None),
        Err(DatasetFilterError::EmptyResourceSet {
            filter_type: FilterType::Empty
        })
    );
    assert_eq!(
        validate(FilterType::All, &ids(&[0]), None),
        Err(DatasetFilterError::InvalidResourceId {
            filter_type: FilterType::All,
            id: 0
        })
    );
}

const CHAIN: [FilterType; 4] = [
    FilterType::HostGroup,
    FilterType::Host,
    FilterType::ServiceGroup,
    FilterType::Service,
];

/// Root-to-leaf chain where the level at `broken` has no resources.
fn chain_with_empty_level(broken: usize) -> DatasetFilterInput {
    CHAIN
        .iter()
        .enumerate()
        .rev()
        .fold(None, |child: Option<DatasetFilterInput>, (position, filter_type)| {
            let resources = if position == broken { vec![] } else { vec![1] };
            let node = DatasetFilterInput::new(*filter_type, resources);
            Some(match child {
                Some(child) => node.narrowed_by(child),
                None => node,
            })
        })
        .unwrap()
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
fn test_chain_fails_as_a_whole(#[case] broken: usize) {
    let input = chain_with_empty_level(broken);
    let expected = DatasetFilterError::EmptyResourceSet {
        filter_type: CHAIN[broken],
    };

    assert_eq!(validate_chain(&input), Err(expected.clone()));
    assert_eq!(DatasetFilter::try_from(input.clone()), Err(expected));

    let json = serde_json::to_value(&input).unwrap();
    assert!(serde_json::from_value::<DatasetFilter>(json).is_err());
}

/// Root-to-leaf chain where the level at `broken` cannot narrow its parent.
/// At the root, the level below is swapped for one the root cannot hold.
fn chain_with_incompatible_level(broken: usize) -> (DatasetFilterInput, DatasetFilterError) {
    let mut types = CHAIN;
    let expected = if broken == 0 {
        types[0] = FilterType::Service;
        DatasetFilterError::IncompatibleType {
            parent: FilterType::Service,
            filter_type: CHAIN[1],
        }
    } else {
        types[broken] = FilterType::HostGroup;
        DatasetFilterError::IncompatibleType {
            parent: CHAIN[broken - 1],
            filter_type: FilterType::HostGroup,
        }
    };

    let input = types
        .iter()
        .rev()
        .fold(None, |child: Option<DatasetFilterInput>, filter_type| {
            let node = DatasetFilterInput::new(*filter_type, vec![1]);
            Some(match child {
                Some(child) => node.narrowed_by(child),
                None => node,
            })
        })
        .unwrap();
    (input, expected)
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
fn test_incompatible_level_fails_whole_chain(#[case] broken: usize) {
    let (input, expected) = chain_with_incompatible_level(broken);

    assert_eq!(validate_chain(&input), Err(expected.clone()));
    assert_eq!(DatasetFilter::try_from(&input), Err(expected));

    let json = serde_json::to_value(&input).unwrap();
    assert!(serde_json::from_value::<DatasetFilter>(json).is_err());
}

#[test]
fn test_valid_chain_round_trips_through_json() {
    let json = serde_json::json!({
        "type": "hostgroup",
        "resources": [12, 11],
        "dataset_filter": {"type": "host", "resources": [110, 120]}
    });
    let filter: DatasetFilter = serde_json::from_value(json).unwrap();
    assert_eq!(filter.depth(), 2);
    assert_eq!(filter.resource_ids(), &ids(&[11, 12]));

    let back = serde_json::to_value(&filter).unwrap();
    assert_eq!(back["dataset_filter"]["type"], "host");
}

#[rstest]
#[case("Rule 1")]
#[case("  Rule   1  ")]
#[case("LINUX\tServers\nEU")]
#[case("already_formatted")]
#[case("")]
#[case("   ")]
#[case("Ünïcode Näme")]
fn test_format_name_is_idempotent(#[case] raw: &str) {
    let once = Rule::format_name(raw);
    assert_eq!(Rule::format_name(&once), once);
    assert!(!once.chars().any(char::is_whitespace));
}
