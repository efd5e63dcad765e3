use crate::aggregator::DomainInfo;
use crate::cli::{DiagramDetail, DiagramFormat};
use std::fmt::Write;

/// Renders architecture diagrams over the aggregated domain list.
///
/// Pure formatting: the synthesizer owns no I/O and returns text for the
/// caller to print or write. Zero domains render a valid diagram with the
/// layer skeleton and no domain-derived content.
pub struct DiagramSynthesizer {
    domains: Vec<DomainInfo>,
}

impl DiagramSynthesizer {
    pub fn new(domains: Vec<DomainInfo>) -> Self {
        Self { domains }
    }

    /// Renders the requested format(s) at the requested detail level.
    ///
    /// With [`DiagramFormat::Both`] the mermaid block comes first, fenced,
    /// followed by the ASCII block.
    pub fn render(&self, format: DiagramFormat, detail: DiagramDetail) -> String {
        match format {
            DiagramFormat::Mermaid => self.mermaid_fenced(detail),
            DiagramFormat::Ascii => self.ascii(detail),
            DiagramFormat::Both => {
                format!("{}\n{}", self.mermaid_fenced(detail), self.ascii(detail))
            }
        }
    }

    fn mermaid_fenced(&self, detail: DiagramDetail) -> String {
        format!("```mermaid\n{}```\n", self.mermaid(detail))
    }

    /// The mermaid graph body for a detail level.
    pub fn mermaid(&self, detail: DiagramDetail) -> String {
        match detail {
            DiagramDetail::All => self.mermaid_all(),
            DiagramDetail::Domain => self.mermaid_domains(),
            DiagramDetail::Layers => mermaid_layers(),
            DiagramDetail::Dependencies => mermaid_dependencies(),
        }
    }

    /// Full layered diagram: one node per discovered component, edges per
    /// the dependency rule, adapters realizing their ports with dashed
    /// edges.
    fn mermaid_all(&self) -> String {
        let mut out = String::from("graph TD\n");

        let layers: [(&str, fn(&DomainInfo) -> Option<(String, String)>); 4] = [
            ("Presentation", |d| node_for(d, "handler", &d.handler)),
            ("Application", |d| {
                node_for(d, "service_port", &d.service_port)
            }),
            ("Domain", |d| node_for(d, "entity", &d.entity)),
            ("Infrastructure", |d| {
                node_for(d, "repo_adapter", &d.repo_adapter)
            }),
        ];

        for (layer, pick) in layers {
            let _ = writeln!(out, "    subgraph {}", layer);
            for domain in &self.domains {
                if let Some((id, label)) = pick(domain) {
                    let _ = writeln!(out, "        {}[\"{}\"]", id, label);
                }
                // Repository ports share the Domain layer with entities.
                if layer == "Domain" {
                    if let Some((id, label)) = node_for(domain, "repo_port", &domain.repo_port) {
                        let _ = writeln!(out, "        {}[\"{}\"]", id, label);
                    }
                }
            }
            let _ = writeln!(out, "    end");
        }
        let _ = writeln!(out, "    storage[(Storage)]");

        for domain in &self.domains {
            let name = &domain.name;
            let has_service = domain.service_port.is_some();

            if domain.handler.is_some() {
                if has_service {
                    let _ = writeln!(out, "    {0}_handler --> {0}_service_port", name);
                } else if domain.repo_port.is_some() {
                    let _ = writeln!(out, "    {0}_handler --> {0}_repo_port", name);
                }
            }
            if has_service {
                if domain.entity.is_some() {
                    let _ = writeln!(out, "    {0}_service_port --> {0}_entity", name);
                }
                if domain.repo_port.is_some() {
                    let _ = writeln!(out, "    {0}_service_port --> {0}_repo_port", name);
                }
            }
            if domain.repo_adapter.is_some() {
                if domain.repo_port.is_some() {
                    let _ = writeln!(out, "    {0}_repo_adapter -.-> {0}_repo_port", name);
                }
                let _ = writeln!(out, "    {0}_repo_adapter --> storage", name);
            }
        }

        out
    }

    /// One node per domain fanning out to its present components.
    fn mermaid_domains(&self) -> String {
        let mut out = String::from("graph TD\n");

        for domain in &self.domains {
            let name = &domain.name;
            let _ = writeln!(out, "    {0}[\"{0}\"]", name);
            for (suffix, component) in [
                ("entity", &domain.entity),
                ("service_port", &domain.service_port),
                ("repo_port", &domain.repo_port),
                ("repo_adapter", &domain.repo_adapter),
                ("handler", &domain.handler),
            ] {
                if let Some((id, label)) = node_for(domain, suffix, component) {
                    let _ = writeln!(out, "    {} --> {}[\"{}\"]", name, id, label);
                }
            }
        }

        out
    }

    /// The ASCII rendering for a detail level, legend included.
    pub fn ascii(&self, detail: DiagramDetail) -> String {
        let body = match detail {
            DiagramDetail::All => self.ascii_all(),
            DiagramDetail::Domain => self.ascii_domains(),
            DiagramDetail::Layers => ascii_boxes(&[
                ("Presentation", vec![]),
                ("Application", vec![]),
                ("Domain", vec![]),
                ("Infrastructure", vec![]),
                ("Storage", vec![]),
            ]),
            DiagramDetail::Dependencies => ascii_dependencies(),
        };

        format!("{}\n{}", body, self.legend())
    }

    fn ascii_all(&self) -> String {
        let handlers: Vec<String> = self
            .domains
            .iter()
            .filter_map(|d| d.handler.as_ref().map(|c| c.type_name.clone()))
            .collect();
        let services: Vec<String> = self
            .domains
            .iter()
            .filter_map(|d| d.service_port.as_ref().map(|c| c.type_name.clone()))
            .collect();
        let mut domain_layer: Vec<String> = Vec::new();
        for d in &self.domains {
            if let Some(e) = &d.entity {
                domain_layer.push(e.type_name.clone());
            }
            if let Some(p) = &d.repo_port {
                domain_layer.push(format!("{} (port)", p.type_name));
            }
        }
        let adapters: Vec<String> = self
            .domains
            .iter()
            .filter_map(|d| {
                d.repo_adapter
                    .as_ref()
                    .map(|c| format!("{} ({})", c.type_name, c.module))
            })
            .collect();

        ascii_boxes(&[
            ("Presentation", handlers),
            ("Application", services),
            ("Domain", domain_layer),
            ("Infrastructure", adapters),
            ("Storage", vec![]),
        ])
    }

    fn ascii_domains(&self) -> String {
        let mut out = String::new();
        for domain in &self.domains {
            let _ = writeln!(out, "{}", domain.name);
            let kinds = domain.present_kinds();
            for (i, kind) in kinds.iter().enumerate() {
                let connector = if i + 1 == kinds.len() {
                    "└──"
                } else {
                    "├──"
                };
                let _ = writeln!(out, "  {} {}", connector, kind);
            }
        }
        out
    }

    /// Every discovered domain with the component kinds present.
    fn legend(&self) -> String {
        let mut out = String::from("Domains:\n");
        if self.domains.is_empty() {
            out.push_str("  (none discovered)\n");
            return out;
        }
        for domain in &self.domains {
            let _ = writeln!(
                out,
                "  - {}: {}",
                domain.name,
                domain.present_kinds().join(", ")
            );
        }
        out
    }
}

/// Node id and label for a component slot, if present.
fn node_for(
    domain: &DomainInfo,
    suffix: &str,
    component: &Option<crate::classifier::ComponentInfo>,
) -> Option<(String, String)> {
    component.as_ref().map(|c| {
        let label = if suffix == "repo_adapter" {
            format!("{} ({})", c.type_name, c.module)
        } else {
            c.type_name.clone()
        };
        (format!("{}_{}", domain.name, suffix), label)
    })
}

/// Fixed generic layer diagram, independent of discovered domains.
fn mermaid_layers() -> String {
    let mut out = String::from("graph TD\n");
    let _ = writeln!(out, "    presentation[\"Presentation\"]");
    let _ = writeln!(out, "    application[\"Application\"]");
    let _ = writeln!(out, "    domain[\"Domain\"]");
    let _ = writeln!(out, "    infrastructure[\"Infrastructure\"]");
    let _ = writeln!(out, "    storage[(Storage)]");
    let _ = writeln!(out, "    presentation --> application");
    let _ = writeln!(out, "    application --> domain");
    let _ = writeln!(out, "    domain --> infrastructure");
    let _ = writeln!(out, "    infrastructure --> storage");
    out
}

/// Static diagram of this tool's own pipeline.
fn mermaid_dependencies() -> String {
    let mut out = String::from("graph TD\n");
    for edge in [
        ("cli", "scanner"),
        ("scanner", "parser"),
        ("parser", "extractor"),
        ("extractor", "classifier"),
        ("classifier", "aggregator"),
        ("aggregator", "wiring"),
        ("aggregator", "diagram"),
        ("manifest", "wiring"),
        ("backend", "wiring"),
    ] {
        let _ = writeln!(out, "    {} --> {}", edge.0, edge.1);
    }
    out
}

fn ascii_dependencies() -> String {
    "cli -> scanner -> parser -> extractor -> classifier -> aggregator\n\
     aggregator -> wiring (with manifest, backend)\n\
     aggregator -> diagram\n"
        .to_string()
}

/// Stacks boxed layers connected by vertical arrows.
fn ascii_boxes(layers: &[(&str, Vec<String>)]) -> String {
    let width = layers
        .iter()
        .flat_map(|(title, items)| {
            std::iter::once(title.len()).chain(items.iter().map(|i| i.len()))
        })
        .max()
        .unwrap_or(0)
        .max(16)
        + 4;

    let mut out = String::new();
    for (i, (title, items)) in layers.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "{:^width$}", "|", width = width + 2);
            let _ = writeln!(out, "{:^width$}", "v", width = width + 2);
        }
        let _ = writeln!(out, "┌{}┐", "─".repeat(width));
        let _ = writeln!(out, "│{:^width$}│", title, width = width);
        for item in items {
            let _ = writeln!(out, "│ {:<width$} │", item, width = width - 2);
        }
        let _ = writeln!(out, "└{}┘", "─".repeat(width));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ComponentInfo, ComponentKind, Role};
    use std::path::PathBuf;

    fn component(name: &str, type_name: &str, module: &str, role: Role) -> ComponentInfo {
        ComponentInfo {
            name: name.to_string(),
            type_name: type_name.to_string(),
            kind: match role {
                Role::Entity => ComponentKind::Entity,
                Role::ServicePort | Role::RepoPort => ComponentKind::Interface,
                _ => ComponentKind::Struct,
            },
            path: PathBuf::from("src/x.rs"),
            module: module.to_string(),
            is_port: matches!(role, Role::ServicePort | Role::RepoPort),
            is_adapter: matches!(role, Role::RepoAdapter | Role::Handler),
            role: Some(role),
        }
    }

    fn order_domain() -> DomainInfo {
        DomainInfo {
            name: "order".to_string(),
            entity: Some(component("order", "Order", "entity", Role::Entity)),
            service_port: Some(component(
                "order",
                "OrderService",
                "service",
                Role::ServicePort,
            )),
            repo_port: Some(component("order", "OrderRepository", "port", Role::RepoPort)),
            repo_adapter: Some(component(
                "order",
                "OrderRepository",
                "postgres",
                Role::RepoAdapter,
            )),
            handler: Some(component("order", "OrderHandler", "http", Role::Handler)),
        }
    }

    #[test]
    fn test_mermaid_all_layers_and_edges() {
        let synth = DiagramSynthesizer::new(vec![order_domain()]);
        let text = synth.mermaid(DiagramDetail::All);

        assert!(text.starts_with("graph TD"));
        for layer in ["Presentation", "Application", "Domain", "Infrastructure"] {
            assert!(text.contains(&format!("subgraph {}", layer)), "{}", layer);
        }
        assert!(text.contains("order_handler[\"OrderHandler\"]"));
        assert!(text.contains("order_repo_adapter[\"OrderRepository (postgres)\"]"));
        assert!(text.contains("order_handler --> order_service_port"));
        assert!(text.contains("order_service_port --> order_entity"));
        assert!(text.contains("order_service_port --> order_repo_port"));
        assert!(text.contains("order_repo_adapter -.-> order_repo_port"));
        assert!(text.contains("order_repo_adapter --> storage"));
        // With a service present the handler must not bypass it.
        assert!(!text.contains("order_handler --> order_repo_port"));
    }

    #[test]
    fn test_mermaid_handler_falls_back_to_repo_port() {
        let mut domain = order_domain();
        domain.service_port = None;

        let synth = DiagramSynthesizer::new(vec![domain]);
        let text = synth.mermaid(DiagramDetail::All);

        assert!(text.contains("order_handler --> order_repo_port"));
        assert!(!text.contains("order_service_port"));
    }

    #[test]
    fn test_mermaid_domain_detail_fans_out() {
        let synth = DiagramSynthesizer::new(vec![order_domain()]);
        let text = synth.mermaid(DiagramDetail::Domain);

        assert!(text.contains("order[\"order\"]"));
        assert!(text.contains("order --> order_entity[\"Order\"]"));
        assert!(text.contains("order --> order_handler[\"OrderHandler\"]"));
    }

    #[test]
    fn test_mermaid_layers_detail_is_domain_independent() {
        let empty = DiagramSynthesizer::new(vec![]);
        let full = DiagramSynthesizer::new(vec![order_domain()]);

        assert_eq!(
            empty.mermaid(DiagramDetail::Layers),
            full.mermaid(DiagramDetail::Layers)
        );
        assert!(empty
            .mermaid(DiagramDetail::Layers)
            .contains("presentation --> application"));
    }

    #[test]
    fn test_mermaid_dependencies_is_static() {
        let synth = DiagramSynthesizer::new(vec![]);
        let text = synth.mermaid(DiagramDetail::Dependencies);

        assert!(text.contains("cli --> scanner"));
        assert!(text.contains("aggregator --> wiring"));
        assert!(text.contains("aggregator --> diagram"));
    }

    #[test]
    fn test_ascii_includes_legend() {
        let synth = DiagramSynthesizer::new(vec![order_domain()]);
        let text = synth.ascii(DiagramDetail::All);

        assert!(text.contains("Presentation"));
        assert!(text.contains("OrderHandler"));
        assert!(text.contains("Domains:"));
        assert!(text.contains(
            "- order: entity, service port, repository port, repository adapter, handler"
        ));
    }

    #[test]
    fn test_ascii_empty_domains_renders_skeleton() {
        let synth = DiagramSynthesizer::new(vec![]);
        let text = synth.ascii(DiagramDetail::All);

        assert!(text.contains("Presentation"));
        assert!(text.contains("(none discovered)"));
    }

    #[test]
    fn test_both_renders_mermaid_then_ascii() {
        let synth = DiagramSynthesizer::new(vec![order_domain()]);
        let text = synth.render(DiagramFormat::Both, DiagramDetail::All);

        let mermaid_at = text.find("```mermaid").unwrap();
        let fence_end = text.rfind("```").unwrap();
        let ascii_at = text.find("Domains:").unwrap();

        assert!(mermaid_at < fence_end);
        assert!(fence_end < ascii_at);
    }

    #[test]
    fn test_mermaid_format_is_fenced() {
        let synth = DiagramSynthesizer::new(vec![order_domain()]);
        let text = synth.render(DiagramFormat::Mermaid, DiagramDetail::All);

        assert!(text.starts_with("```mermaid\n"));
        assert!(text.ends_with("```\n"));
    }
}
