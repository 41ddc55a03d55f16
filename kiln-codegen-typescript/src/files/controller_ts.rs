//! Express router renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Failure, ParamSource, ParamType, Route, RouteParam, Step},
};
use kiln_core::ArtifactKind;

use crate::{
    ts::{Scope, ident, var_name},
    type_mapper::is_numeric,
};

const EXPRESS: &str = "express";

/// `src/controllers/<class>.controller.ts`.
pub struct ControllerTs<'a> {
    plan: &'a ClassPlan,
}

impl<'a> ControllerTs<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Controller);
        let class = self.plan.name();
        let service = format!("{}Service", class);
        scope.artifact(class, ArtifactKind::Service, &service);
        scope.import_all(EXPRESS, &["Response", "Router"]);

        let controller = &self.plan.controller;
        let var = var_name(class);
        let mut body = CodeBuilder::typescript();
        body.push_line(&format!(
            "export const {}BasePath = \"{}\";",
            var, controller.base_path
        ))
        .push_blank()
        .push_block(
            &format!(
                "export function {}Router(service: {}): Router {{",
                var, service
            ),
            Some("}"),
            |b| {
                b.push_line("const router = Router();");
                for route in &controller.routes {
                    b.push_blank();
                    self.push_route(&mut scope, b, route);
                }
                b.push_blank().push_line("return router;");
            },
        );
        body.push_blank();
        self.push_error_handler(&mut scope, &mut body);

        format!("{}{}", scope.header(), body.build())
    }

    fn push_route(&self, scope: &mut Scope, b: &mut CodeBuilder, route: &Route) {
        let mut path = route.relative_with(|name| format!(":{}", name));
        if path.is_empty() {
            path.push('/');
        }
        b.push_block(
            &format!(
                "router.{}(\"{}\", async (req, res) => {{",
                route.verb.method(),
                path
            ),
            Some("});"),
            |b| {
                b.push_block("try {", None, |b| {
                    if route.body().is_some() {
                        b.push_block(
                            "if (typeof req.body !== \"object\" || req.body === null) {",
                            Some("}"),
                            |b| {
                                b.push_line(
                                    "res.status(400).json({ error: \"Request body must be a JSON object\" });",
                                )
                                .push_line("return;");
                            },
                        );
                    }
                    let args = route
                        .params
                        .iter()
                        .map(|p| self.argument(scope, route, p))
                        .collect::<Vec<_>>();
                    let call = format!("service.{}({})", route.handler, args.join(", "));
                    if route.success == 204 {
                        b.push_line(&format!("await {};", call))
                            .push_line("res.status(204).send();");
                    } else {
                        b.push_line(&format!("const result = await {};", call))
                            .push_line(&format!("res.status({}).json(result);", route.success));
                    }
                });
                b.push_block("} catch (error) {", Some("}"), |b| {
                    b.push_line("handleError(res, error);");
                });
            },
        );
    }

    /// Expression reading one parameter off the request.
    fn argument(&self, scope: &mut Scope, route: &Route, param: &RouteParam) -> String {
        let name = &param.name;
        match param.source {
            ParamSource::Body => {
                let ty = if self.is_partial(route, name) {
                    format!("Partial<{}>", scope.entity())
                } else {
                    scope.param_type(&param.ty)
                };
                format!("req.body as {}", ty)
            }
            ParamSource::Path => self.coerce(scope, &param.ty, &format!("req.params.{}", name)),
            ParamSource::Query => {
                let raw = format!("req.query.{}", name);
                let value = self.coerce(scope, &param.ty, &raw);
                if param.required {
                    value
                } else {
                    format!("typeof {} === \"string\" ? {} : undefined", raw, value)
                }
            }
        }
    }

    /// Convert a raw request string into the parameter's type.
    fn coerce(&self, scope: &mut Scope, ty: &ParamType, raw: &str) -> String {
        let ts = scope.param_type(ty);
        match ty {
            ParamType::State => format!("String({}) as {}", raw, ts),
            ParamType::Timestamp => format!("new Date(String({}))", raw),
            _ if is_numeric(&ts) => format!("Number({})", raw),
            _ => format!("String({})", raw),
        }
    }

    /// Whether the service merges this body parameter field by field.
    fn is_partial(&self, route: &Route, param: &str) -> bool {
        self.plan.service.op(&route.handler).is_some_and(|op| {
            op.steps
                .iter()
                .any(|s| matches!(s, Step::MergeFields { source, .. } if source == param))
        })
    }

    fn push_error_handler(&self, scope: &mut Scope, b: &mut CodeBuilder) {
        let reports = |failure: Failure| {
            self.plan
                .controller
                .routes
                .iter()
                .any(|r| r.failures.contains(&failure))
        };
        let class = self.plan.name();
        let mut mapped = Vec::new();
        if reports(Failure::NotFound) {
            mapped.push(("NotFoundError", Failure::NotFound.status()));
        }
        if reports(Failure::InvalidTransition) {
            mapped.push(("InvalidTransitionError", Failure::InvalidTransition.status()));
        }

        b.push_block(
            "function handleError(res: Response, error: unknown): void {",
            Some("}"),
            |b| {
                for (error, status) in mapped {
                    scope.artifact(class, ArtifactKind::Service, error);
                    b.push_block(
                        &format!("if (error instanceof {}) {{", error),
                        Some("}"),
                        |b| {
                            b.push_line(&format!(
                                "res.status({}).json({{ error: error.message }});",
                                status
                            ))
                            .push_line("return;");
                        },
                    );
                }
                b.push_line("res.status(500).json({ error: \"Internal server error\" });");
            },
        );
    }
}
