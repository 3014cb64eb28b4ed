//! Resource categories a dataset filter can scope, and which categories may
//! narrow each of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource category of a dataset filter level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterType {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "host")]
    Host,
    #[serde(rename = "hostgroup")]
    HostGroup,
    #[serde(rename = "host_category")]
    HostCategory,
    #[serde(rename = "service")]
    Service,
    #[serde(rename = "servicegroup")]
    ServiceGroup,
    #[serde(rename = "service_category")]
    ServiceCategory,
    #[serde(rename = "meta_service")]
    MetaService,
    /// Placeholder for a level whose category has not been chosen yet.
    #[serde(rename = "empty")]
    Empty,
}

const HOST_GROUP_CHILDREN: &[FilterType] = &[
    FilterType::Host,
    FilterType::HostCategory,
    FilterType::ServiceGroup,
    FilterType::ServiceCategory,
    FilterType::Service,
];

const HOST_CATEGORY_CHILDREN: &[FilterType] = &[
    FilterType::Host,
    FilterType::ServiceGroup,
    FilterType::ServiceCategory,
    FilterType::Service,
];

const HOST_CHILDREN: &[FilterType] = &[
    FilterType::ServiceGroup,
    FilterType::ServiceCategory,
    FilterType::Service,
];

const SERVICE_GROUP_CHILDREN: &[FilterType] = &[FilterType::ServiceCategory, FilterType::Service];

const SERVICE_CATEGORY_CHILDREN: &[FilterType] = &[FilterType::Service];

impl FilterType {
    /// Every variant, in declaration order.
    pub const ALL: [FilterType; 9] = [
        FilterType::All,
        FilterType::Host,
        FilterType::HostGroup,
        FilterType::HostCategory,
        FilterType::Service,
        FilterType::ServiceGroup,
        FilterType::ServiceCategory,
        FilterType::MetaService,
        FilterType::Empty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::All => "all",
            FilterType::Host => "host",
            FilterType::HostGroup => "hostgroup",
            FilterType::HostCategory => "host_category",
            FilterType::Service => "service",
            FilterType::ServiceGroup => "servicegroup",
            FilterType::ServiceCategory => "service_category",
            FilterType::MetaService => "meta_service",
            FilterType::Empty => "empty",
        }
    }

    /// Categories allowed as the direct child (narrowing) of this one.
    pub fn allowed_children(self) -> &'static [FilterType] {
        match self {
            FilterType::HostGroup => HOST_GROUP_CHILDREN,
            FilterType::HostCategory => HOST_CATEGORY_CHILDREN,
            FilterType::Host => HOST_CHILDREN,
            FilterType::ServiceGroup => SERVICE_GROUP_CHILDREN,
            FilterType::ServiceCategory => SERVICE_CATEGORY_CHILDREN,
            FilterType::All | FilterType::Service | FilterType::MetaService | FilterType::Empty => {
                &[]
            }
        }
    }

    pub fn can_be_narrowed_by(self, child: FilterType) -> bool {
        self.allowed_children().contains(&child)
    }

    /// True when nothing may narrow this category.
    pub fn is_leaf(self) -> bool {
        self.allowed_children().is_empty()
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown dataset filter type '{}'", s))
    }
}
