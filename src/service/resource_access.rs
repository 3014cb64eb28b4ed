//! Resource access rule use cases
//!
//! Every operation runs the same sequence: authorize the caller, load the
//! target, validate the mutation on an in-memory copy, persist, present.
//! Nothing is written until the replacement rule is fully validated.

use crate::config::ResourceAccessConfig;
use crate::domain::{
    Contact, CreateRuleInput, NewRule, PartialUpdateRuleInput, Rule, UpdateRuleInput,
    ROLE_RESOURCE_ACCESS_READ, ROLE_RESOURCE_ACCESS_WRITE,
};
use crate::error::{AppError, Result};
use crate::repository::{
    ReadAccessGroupRepository, ReadContactGroupRepository, ReadContactRepository,
    ReadResourceAccessRepository, WriteResourceAccessRepository,
};
use crate::response::UseCaseResponse;
use crate::service::access::AccessResolver;
use crate::service::rule_validator::RuleValidator;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

const READ_ROLES: &[&str] = &[ROLE_RESOURCE_ACCESS_READ, ROLE_RESOURCE_ACCESS_WRITE];
const WRITE_ROLES: &[&str] = &[ROLE_RESOURCE_ACCESS_WRITE];

pub struct ResourceAccessService<R, W, A, C, G>
where
    R: ReadResourceAccessRepository,
    W: WriteResourceAccessRepository,
    A: ReadAccessGroupRepository,
    C: ReadContactRepository,
    G: ReadContactGroupRepository,
{
    read_repo: Arc<R>,
    write_repo: Arc<W>,
    access_group_repo: Arc<A>,
    validator: RuleValidator<R, C, G>,
    resolver: AccessResolver<R, G>,
    config: ResourceAccessConfig,
}

impl<R, W, A, C, G> ResourceAccessService<R, W, A, C, G>
where
    R: ReadResourceAccessRepository,
    W: WriteResourceAccessRepository,
    A: ReadAccessGroupRepository,
    C: ReadContactRepository,
    G: ReadContactGroupRepository,
{
    pub fn new(
        read_repo: Arc<R>,
        write_repo: Arc<W>,
        access_group_repo: Arc<A>,
        contact_repo: Arc<C>,
        contact_group_repo: Arc<G>,
        config: ResourceAccessConfig,
    ) -> Self {
        Self {
            validator: RuleValidator::new(
                read_repo.clone(),
                contact_repo,
                contact_group_repo.clone(),
            ),
            resolver: AccessResolver::new(read_repo.clone(), contact_group_repo),
            read_repo,
            write_repo,
            access_group_repo,
            config,
        }
    }

    // ==================== Use cases ====================

    pub async fn create(&self, caller: &Contact, input: CreateRuleInput) -> UseCaseResponse<Rule> {
        UseCaseResponse::success("create_rule", self.try_create(caller, input).await)
    }

    pub async fn find(&self, caller: &Contact, rule_id: i64) -> UseCaseResponse<Rule> {
        UseCaseResponse::success("find_rule", self.try_find(caller, rule_id).await)
    }

    pub async fn list(&self, caller: &Contact) -> UseCaseResponse<Vec<Rule>> {
        UseCaseResponse::success("find_rules", self.try_list(caller).await)
    }

    pub async fn update(
        &self,
        caller: &Contact,
        rule_id: i64,
        input: UpdateRuleInput,
    ) -> UseCaseResponse<()> {
        UseCaseResponse::no_content("update_rule", self.try_update(caller, rule_id, input).await)
    }

    pub async fn partial_update(
        &self,
        caller: &Contact,
        rule_id: i64,
        input: PartialUpdateRuleInput,
    ) -> UseCaseResponse<()> {
        UseCaseResponse::no_content(
            "partial_update_rule",
            self.try_partial_update(caller, rule_id, input).await,
        )
    }

    pub async fn delete(&self, caller: &Contact, rule_id: i64) -> UseCaseResponse<()> {
        UseCaseResponse::no_content("delete_rule", self.try_delete(caller, rule_id).await)
    }

    /// Rules granting resources to the caller. Needs no management role:
    /// every contact may see its own scope.
    pub async fn find_effective_rules(&self, caller: &Contact) -> UseCaseResponse<Vec<Rule>> {
        UseCaseResponse::success(
            "find_effective_rules",
            self.resolver.effective_rules(caller).await,
        )
    }

    // ==================== Steps ====================

    async fn try_create(&self, caller: &Contact, input: CreateRuleInput) -> Result<Rule> {
        self.authorize(caller, WRITE_ROLES, "create resource access rules")
            .await?;

        input.validate()?;
        let rule = NewRule::new(input.into_definition()?)?;

        self.validator.assert_is_valid_name(rule.name()).await?;
        self.validator
            .assert_contacts_exist(rule.linked_contacts())
            .await?;
        self.validator
            .assert_contact_groups_exist(rule.linked_contact_groups())
            .await?;
        self.validator
            .assert_resources_exist(rule.datasets())
            .await?;

        let rule_id = self.write_repo.add(&rule).await?;
        info!(
            rule_id,
            contact_id = caller.id,
            name = %rule.name(),
            "Resource access rule created"
        );

        self.read_repo.find_by_id(rule_id).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "rule {} not found right after creation",
                rule_id
            ))
        })
    }

    async fn try_find(&self, caller: &Contact, rule_id: i64) -> Result<Rule> {
        self.authorize(caller, READ_ROLES, "view resource access rules")
            .await?;
        let rule = self.load(rule_id).await?;

        if !self.resolver.is_rule_visible(caller, rule_id).await? {
            debug!(
                rule_id,
                contact_id = caller.id,
                "Rule is outside the caller's access scope"
            );
            return Err(AppError::Forbidden(
                "You are not allowed to view this resource access rule".to_string(),
            ));
        }
        Ok(rule)
    }

    async fn try_list(&self, caller: &Contact) -> Result<Vec<Rule>> {
        self.authorize(caller, READ_ROLES, "view resource access rules")
            .await?;
        self.resolver.effective_rules(caller).await
    }

    async fn try_update(&self, caller: &Contact, rule_id: i64, input: UpdateRuleInput) -> Result<()> {
        self.authorize(caller, WRITE_ROLES, "edit resource access rules")
            .await?;
        let current = self.load(rule_id).await?;

        input.validate()?;
        let replacement = current.replace(input.into_definition()?)?;

        if replacement.formatted_name() != current.formatted_name() {
            self.validator
                .assert_is_valid_name(replacement.name())
                .await?;
        }
        self.validator
            .assert_contacts_exist(replacement.linked_contacts())
            .await?;
        self.validator
            .assert_contact_groups_exist(replacement.linked_contact_groups())
            .await?;
        self.validator
            .assert_resources_exist(replacement.datasets())
            .await?;

        self.write_repo.update(&replacement).await?;
        info!(rule_id, contact_id = caller.id, "Resource access rule updated");
        Ok(())
    }

    async fn try_partial_update(
        &self,
        caller: &Contact,
        rule_id: i64,
        input: PartialUpdateRuleInput,
    ) -> Result<()> {
        self.authorize(caller, WRITE_ROLES, "edit resource access rules")
            .await?;
        let current = self.load(rule_id).await?;

        input.validate()?;
        let patch = input.into_patch()?;
        let merged = current.merge(&patch)?;

        if merged.formatted_name() != current.formatted_name() {
            self.validator.assert_is_valid_name(merged.name()).await?;
        }
        // Only supplied fields need their references re-checked
        if let Some(contacts) = &patch.linked_contacts {
            self.validator.assert_contacts_exist(contacts).await?;
        }
        if let Some(groups) = &patch.linked_contact_groups {
            self.validator.assert_contact_groups_exist(groups).await?;
        }
        if let Some(datasets) = &patch.datasets {
            self.validator.assert_resources_exist(datasets).await?;
        }

        if merged == current {
            debug!(rule_id, "Partial update changes nothing, skipping write");
            return Ok(());
        }

        self.write_repo.update(&merged).await?;
        info!(
            rule_id,
            contact_id = caller.id,
            "Resource access rule partially updated"
        );
        Ok(())
    }

    async fn try_delete(&self, caller: &Contact, rule_id: i64) -> Result<()> {
        self.authorize(caller, WRITE_ROLES, "delete resource access rules")
            .await?;
        self.load(rule_id).await?;

        self.write_repo.delete(rule_id).await?;
        info!(rule_id, contact_id = caller.id, "Resource access rule deleted");
        Ok(())
    }

    /// Admins pass. Anyone else needs the configured ACL group (when set)
    /// and one of `roles`.
    async fn authorize(&self, caller: &Contact, roles: &[&str], action: &str) -> Result<()> {
        if caller.is_admin {
            return Ok(());
        }

        let denied = || AppError::Forbidden(format!("You are not allowed to {}", action));

        if let Some(required_group) = &self.config.authorized_acl_group {
            let groups = self.access_group_repo.find_by_contact(caller.id).await?;
            if !groups.iter().any(|group| &group.name == required_group) {
                debug!(
                    contact_id = caller.id,
                    required_group = %required_group,
                    "Caller is not a member of the authorized ACL group"
                );
                return Err(denied());
            }
        }

        if !caller.has_any_topology_role(roles) {
            debug!(
                contact_id = caller.id,
                "Caller lacks the resource access management role"
            );
            return Err(denied());
        }
        Ok(())
    }

    async fn load(&self, rule_id: i64) -> Result<Rule> {
        self.read_repo
            .find_by_id(rule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rule".to_string()))
    }
}
