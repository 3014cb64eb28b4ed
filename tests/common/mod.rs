//! Common test utilities

#![allow(dead_code)]

use resource_access_core::config::{ResourceAccessConfig, DEFAULT_AUTHORIZED_ACL_GROUP};
use resource_access_core::domain::{
    AccessGroup, Contact, ContactGroup, CreateRuleInput, DatasetFilterInput, FilterType, Rule,
    ROLE_RESOURCE_ACCESS_READ, ROLE_RESOURCE_ACCESS_WRITE,
};
use resource_access_core::repository::{InMemoryDirectory, InMemoryResourceAccessRepository};
use resource_access_core::service::ResourceAccessService;
use std::sync::Arc;

pub const ADMIN_ID: i64 = 1;
pub const OPERATOR_ID: i64 = 5;
pub const GUEST_ID: i64 = 6;
pub const OPS_GROUP_ID: i64 = 10;
pub const NOC_GROUP_ID: i64 = 20;

pub type TestService = ResourceAccessService<
    InMemoryResourceAccessRepository,
    InMemoryResourceAccessRepository,
    InMemoryDirectory,
    InMemoryDirectory,
    InMemoryDirectory,
>;

/// Service wired to in-memory collaborators, with a small monitoring
/// inventory and directory.
pub struct TestWorld {
    pub rules: Arc<InMemoryResourceAccessRepository>,
    pub directory: Arc<InMemoryDirectory>,
    pub service: TestService,
}

impl TestWorld {
    pub fn new() -> Self {
        let rules = Arc::new(
            InMemoryResourceAccessRepository::new()
                .with_resources(FilterType::HostGroup, [11, 12, 13])
                .with_resources(FilterType::Host, [110, 120, 130])
                .with_resources(FilterType::ServiceGroup, [4, 5])
                .with_resources(FilterType::Service, [1000, 1001]),
        );

        let directory = Arc::new(
            InMemoryDirectory::new()
                .with_contact(admin())
                .with_contact(operator())
                .with_contact(guest())
                .with_contact_group(ContactGroup {
                    id: OPS_GROUP_ID,
                    name: "ops".to_string(),
                })
                .with_contact_group(ContactGroup {
                    id: NOC_GROUP_ID,
                    name: "noc".to_string(),
                })
                .with_membership(OPERATOR_ID, OPS_GROUP_ID)
                .with_access_group(
                    OPERATOR_ID,
                    AccessGroup {
                        id: 1,
                        name: DEFAULT_AUTHORIZED_ACL_GROUP.to_string(),
                    },
                )
                .with_access_group(
                    GUEST_ID,
                    AccessGroup {
                        id: 2,
                        name: "guests".to_string(),
                    },
                ),
        );

        let service = ResourceAccessService::new(
            rules.clone(),
            rules.clone(),
            directory.clone(),
            directory.clone(),
            directory.clone(),
            ResourceAccessConfig::default(),
        );

        Self {
            rules,
            directory,
            service,
        }
    }

    /// Create a rule as the admin, panicking on failure.
    pub async fn seed_rule(&self, input: CreateRuleInput) -> Rule {
        let name = input.name.clone();
        self.service
            .create(&admin(), input)
            .await
            .payload()
            .unwrap_or_else(|| panic!("failed to seed rule '{name}'"))
    }
}

pub fn admin() -> Contact {
    Contact::admin(ADMIN_ID, "admin")
}

/// Member of the authorized ACL group with the write role.
pub fn operator() -> Contact {
    Contact::new(OPERATOR_ID, "operator")
        .with_topology_role(ROLE_RESOURCE_ACCESS_READ)
        .with_topology_role(ROLE_RESOURCE_ACCESS_WRITE)
}

/// Neither in the authorized ACL group nor holding a topology role.
pub fn guest() -> Contact {
    Contact::new(GUEST_ID, "guest")
}

pub fn rule_input(name: &str, datasets: Vec<DatasetFilterInput>) -> CreateRuleInput {
    CreateRuleInput {
        name: name.to_string(),
        description: String::new(),
        is_enabled: true,
        contacts: vec![],
        contact_groups: vec![],
        datasets,
    }
}

pub fn host_group_dataset() -> DatasetFilterInput {
    DatasetFilterInput::new(FilterType::HostGroup, vec![11, 12])
        .narrowed_by(DatasetFilterInput::new(FilterType::Host, vec![110, 120]))
}

pub fn rule_ids(rules: &[Rule]) -> Vec<i64> {
    rules.iter().map(Rule::id).collect()
}
