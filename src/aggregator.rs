use crate::classifier::{ComponentInfo, Role};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// One logical business domain and the components discovered for it.
///
/// At most one component per slot; when regeneration re-emits a file the
/// later discovery simply replaces the earlier one (last write wins).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<ComponentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_port: Option<ComponentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_port: Option<ComponentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_adapter: Option<ComponentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<ComponentInfo>,
}

impl DomainInfo {
    /// Retention rule: a domain is meaningful if it has an entity, handler
    /// or repository adapter, or a complete service+repository port pair.
    fn is_retained(&self) -> bool {
        self.entity.is_some()
            || self.handler.is_some()
            || self.repo_adapter.is_some()
            || (self.service_port.is_some() && self.repo_port.is_some())
    }

    /// Component kinds present, for legends and summaries.
    pub fn present_kinds(&self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        if self.entity.is_some() {
            kinds.push("entity");
        }
        if self.service_port.is_some() {
            kinds.push("service port");
        }
        if self.repo_port.is_some() {
            kinds.push("repository port");
        }
        if self.repo_adapter.is_some() {
            kinds.push("repository adapter");
        }
        if self.handler.is_some() {
            kinds.push("handler");
        }
        kinds
    }
}

/// Folds classified components into per-domain records.
///
/// Components without a role are dropped here without a warning; see the
/// classifier for why that is deliberate. The result is ordered
/// alphabetically by domain name so repeated runs produce identical output.
pub fn aggregate(components: Vec<ComponentInfo>) -> Vec<DomainInfo> {
    let mut domains: BTreeMap<String, DomainInfo> = BTreeMap::new();

    for component in components {
        let Some(role) = component.role else {
            continue;
        };

        let entry = domains
            .entry(component.name.clone())
            .or_insert_with(|| DomainInfo {
                name: component.name.clone(),
                ..DomainInfo::default()
            });

        let slot = match role {
            Role::Entity => &mut entry.entity,
            Role::ServicePort => &mut entry.service_port,
            Role::RepoPort => &mut entry.repo_port,
            Role::RepoAdapter => &mut entry.repo_adapter,
            Role::Handler => &mut entry.handler,
        };
        *slot = Some(component);
    }

    let total = domains.len();
    let retained: Vec<DomainInfo> = domains
        .into_values()
        .filter(DomainInfo::is_retained)
        .collect();

    debug!(
        "Aggregated {} domains, retained {}",
        total,
        retained.len()
    );

    retained
}
