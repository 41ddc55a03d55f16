//! Spring MVC controller renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Failure, HttpVerb, ParamSource, Returns, Route, RouteParam},
};
use kiln_core::ArtifactKind;
use kiln_ir::ProjectMeta;

use super::{JPA, service::INVALID_TRANSITION};
use crate::java::{Scope, annotation, ident, package_of};

const WEB: &str = "org.springframework.web.bind.annotation";

/// `controller/<Class>Controller.java`.
pub struct ControllerJava<'a> {
    project: &'a ProjectMeta,
    plan: &'a ClassPlan,
}

impl<'a> ControllerJava<'a> {
    pub fn new(project: &'a ProjectMeta, plan: &'a ClassPlan) -> Self {
        Self { project, plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.project, self.plan, ArtifactKind::Controller);
        let class = self.plan.name();
        let service = format!("{}Service", class);
        scope.import(&package_of(self.project, ArtifactKind::Service), &service);
        scope.import_all(WEB, &["RequestMapping", "RestController"]);

        let controller = &self.plan.controller;
        let mut body = CodeBuilder::java();
        body.push_line("@RestController")
            .push_line(&format!("@RequestMapping(\"{}\")", controller.base_path))
            .push_block(
                &format!("public class {}Controller {{", class),
                Some("}"),
                |b| {
                    b.push_blank()
                        .push_line(&format!("private final {} service;", service))
                        .push_blank()
                        .push_block(
                            &format!("public {}Controller({} service) {{", class, service),
                            Some("}"),
                            |b| {
                                b.push_line("this.service = service;");
                            },
                        );
                    for route in &controller.routes {
                        b.push_blank();
                        self.push_route(&mut scope, b, route);
                    }
                    self.push_handlers(&mut scope, b);
                },
            );

        format!("{}{}", scope.header(), body.build())
    }

    fn push_route(&self, scope: &mut Scope, b: &mut CodeBuilder, route: &Route) {
        let mapping = match route.verb {
            HttpVerb::Get => "GetMapping",
            HttpVerb::Post => "PostMapping",
            HttpVerb::Put => "PutMapping",
            HttpVerb::Delete => "DeleteMapping",
        };
        scope.import(WEB, mapping);
        if route.relative.is_empty() {
            b.push_line(&format!("@{}", mapping));
        } else {
            b.push_line(&format!("@{}(\"{}\")", mapping, route.relative));
        }
        if let Some(status) = response_status(route.success) {
            scope.import(WEB, "ResponseStatus");
            scope.import("org.springframework.http", "HttpStatus");
            b.push_line(&format!("@ResponseStatus(HttpStatus.{})", status));
        }

        let returns = self
            .plan
            .service
            .op(&route.handler)
            .map_or(Returns::Entity, |op| op.returns);
        let returns = scope.returns(returns);
        let params = route
            .params
            .iter()
            .map(|p| self.param(scope, p))
            .collect::<Vec<_>>()
            .join(", ");
        let args = route
            .params
            .iter()
            .map(|p| ident(&p.name))
            .collect::<Vec<_>>()
            .join(", ");

        b.push_block(
            &format!("public {} {}({}) {{", returns, route.handler, params),
            Some("}"),
            |b| {
                let call = format!("service.{}({});", route.handler, args);
                if returns == "void" {
                    b.push_line(&call);
                } else {
                    b.push_line(&format!("return {}", call));
                }
            },
        );
    }

    fn param(&self, scope: &mut Scope, param: &RouteParam) -> String {
        let ty = scope.param_type(&param.ty);
        let name = ident(&param.name);
        match param.source {
            ParamSource::Body => {
                scope.import(WEB, "RequestBody");
                scope.import("jakarta.validation", "Valid");
                format!("@Valid @RequestBody {} {}", ty, name)
            }
            ParamSource::Path => {
                scope.import(WEB, "PathVariable");
                format!("@PathVariable(\"{}\") {} {}", param.name, ty, name)
            }
            ParamSource::Query => {
                scope.import(WEB, "RequestParam");
                let mut args = vec![format!("value = \"{}\"", param.name)];
                if !param.required {
                    args.push("required = false".to_string());
                }
                format!("{} {} {}", annotation("RequestParam", &args), ty, name)
            }
        }
    }

    /// Exception handlers for the failures the routes can report.
    fn push_handlers(&self, scope: &mut Scope, b: &mut CodeBuilder) {
        let reports = |failure: Failure| {
            self.plan
                .controller
                .routes
                .iter()
                .any(|r| r.failures.contains(&failure))
        };
        let mut handlers = Vec::new();
        if reports(Failure::NotFound) {
            scope.import(JPA, "EntityNotFoundException");
            handlers.push(("EntityNotFoundException", "NOT_FOUND", "handleNotFound"));
        }
        if reports(Failure::InvalidTransition) {
            let service = format!(
                "{}.{}Service",
                package_of(self.project, ArtifactKind::Service),
                self.plan.name()
            );
            scope.import(&service, INVALID_TRANSITION);
            handlers.push((INVALID_TRANSITION, "BAD_REQUEST", "handleInvalidTransition"));
        }
        if handlers.is_empty() {
            return;
        }

        scope.import_all(WEB, &["ExceptionHandler", "ResponseStatus"]);
        scope.import("org.springframework.http", "HttpStatus");
        scope.import("java.util", "Map");
        for (exception, status, name) in handlers {
            b.push_blank()
                .push_line(&format!("@ExceptionHandler({}.class)", exception))
                .push_line(&format!("@ResponseStatus(HttpStatus.{})", status))
                .push_block(
                    &format!(
                        "public Map<String, String> {}({} e) {{",
                        name, exception
                    ),
                    Some("}"),
                    |b| {
                        b.push_line("return Map.of(\"error\", e.getMessage());");
                    },
                );
        }
    }
}

fn response_status(code: u16) -> Option<&'static str> {
    match code {
        201 => Some("CREATED"),
        204 => Some("NO_CONTENT"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing::{compile, order_ir, parent_child_ir};

    use super::*;

    fn render(ir: kiln_ir::DomainIR, class: &str) -> String {
        let project = ir.meta.clone();
        let ctx = compile(ir).unwrap();
        ControllerJava::new(&project, &ctx.plans[class]).render()
    }

    #[test]
    fn test_crud_routes() {
        let java = render(parent_child_ir(), "Parent");

        assert!(java.contains("package com.example.shop.controller;"));
        assert!(java.contains("@RestController\n@RequestMapping(\"/parents\")"));
        assert!(java.contains("@PostMapping\n    @ResponseStatus(HttpStatus.CREATED)"));
        assert!(java.contains(
            "public Parent findById(@PathVariable(\"id\") UUID id) {\n        return service.findById(id);\n    }"
        ));
        assert!(java.contains("@DeleteMapping(\"/{id}\")\n    @ResponseStatus(HttpStatus.NO_CONTENT)"));
        assert!(java.contains("public void delete(@PathVariable(\"id\") UUID id) {\n        service.delete(id);"));
        assert!(java.contains("@ExceptionHandler(EntityNotFoundException.class)\n    @ResponseStatus(HttpStatus.NOT_FOUND)"));
        assert!(!java.contains("InvalidTransitionException"));
    }

    #[test]
    fn test_status_routes() {
        let java = render(order_ir(), "Order");

        assert!(java.contains("@PutMapping(\"/{id}/status\")"));
        assert!(java.contains(
            "public Order updateStatus(@PathVariable(\"id\") UUID id, @RequestParam(value = \"newStatus\") OrderStatus newStatus, @RequestParam(value = \"updatedBy\", required = false) String updatedBy, @RequestParam(value = \"comment\", required = false) String comment) {"
        ));
        assert!(java.contains("public List<Order> findByStatus(@PathVariable(\"status\") OrderStatus status) {"));
        assert!(java.contains("public Order create(@Valid @RequestBody Order entity, @RequestParam(value = \"createdBy\", required = false) String createdBy) {"));
        assert!(java.contains(
            "import com.example.shop.service.OrderService.InvalidTransitionException;"
        ));
        assert!(java.contains("@ExceptionHandler(InvalidTransitionException.class)\n    @ResponseStatus(HttpStatus.BAD_REQUEST)"));
        assert!(!java.contains("IllegalStateException"));
    }
}
