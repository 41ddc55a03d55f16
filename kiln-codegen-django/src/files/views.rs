//! Django REST framework view renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{
        ClassPlan, Failure, ParamSource, ParamType, Returns, Route, RouteParam, Step,
    },
};
use kiln_core::{ArtifactKind, to_pascal_case};

use crate::{
    PY_TYPES,
    py::{Scope, ident, quote},
    type_mapper::path_converter,
};

/// `<app>/views/<class>_views.py`.
pub struct ViewsPy<'a> {
    plan: &'a ClassPlan,
}

impl<'a> ViewsPy<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Controller);
        let class = self.plan.name();
        let entity = scope.entity();
        let service = format!("{}Service", class);
        scope.artifact(class, ArtifactKind::Service, &service);
        scope.import("rest_framework", "serializers");
        scope.import("rest_framework.request", "Request");
        scope.import("rest_framework.response", "Response");
        scope.import("rest_framework.views", "APIView");
        scope.import("django.urls", "path");

        let mut body = CodeBuilder::python();
        self.push_serializer(&mut body, &entity);

        let uses_query = self
            .plan
            .controller
            .routes
            .iter()
            .any(|r| r.params.iter().any(|p| p.source == ParamSource::Query));
        if uses_query {
            scope.import("collections.abc", "Callable");
            scope.import("typing", "Any");
            scope.import("rest_framework.exceptions", "ValidationError");
            body.push_blank().push_blank();
            push_query_helper(&mut body);
        }

        body.push_blank().push_blank();
        self.push_base_view(&mut scope, &mut body, &service);

        let groups = self.groups();
        for (_, routes) in &groups {
            body.push_blank().push_blank();
            self.push_view(&mut scope, &mut body, routes);
        }

        body.push_blank().push_blank().push_line("urlpatterns = [");
        body.push_indent();
        for (_, routes) in &groups {
            let Some(route) = routes.first() else {
                continue;
            };
            let pattern = route.path_with(|name| self.placeholder(route, name));
            body.push_line(&format!(
                "path({}, {}.as_view()),",
                quote(pattern.trim_start_matches('/')),
                self.view_name(route)
            ));
        }
        body.push_dedent().push_line("]");

        format!("{}{}", scope.header(), body.build())
    }

    fn push_serializer(&self, b: &mut CodeBuilder, entity: &str) {
        let fields: Vec<&str> = self
            .plan
            .entity
            .fields
            .iter()
            .filter(|f| !matches!(&f.relation, Some(end) if end.is_collection()))
            .map(|f| f.name.as_str())
            .collect();
        let read_only: Vec<&str> = self
            .plan
            .entity
            .fields
            .iter()
            .filter(|f| f.kind.is_managed())
            .map(|f| f.name.as_str())
            .collect();
        let list = |names: &[&str]| {
            names
                .iter()
                .map(|n| quote(&ident(n)))
                .collect::<Vec<_>>()
                .join(", ")
        };

        b.push_block(
            &format!("class {}Serializer(serializers.ModelSerializer):", entity),
            None,
            |b| {
                b.push_block("class Meta:", None, |b| {
                    b.push_line(&format!("model = {}", entity))
                        .push_line(&format!("fields = [{}]", list(&fields)))
                        .push_line(&format!("read_only_fields = [{}]", list(&read_only)));
                });
            },
        );
    }

    /// Shared service instance and failure mapping.
    fn push_base_view(&self, scope: &mut Scope, b: &mut CodeBuilder, service: &str) {
        let class = self.plan.name();
        let reports = |failure: Failure| {
            self.plan
                .controller
                .routes
                .iter()
                .any(|r| r.failures.contains(&failure))
        };
        let mut mapped = Vec::new();
        if reports(Failure::NotFound) {
            mapped.push(("NotFoundError", Failure::NotFound.status()));
        }
        if reports(Failure::InvalidTransition) {
            mapped.push(("InvalidTransitionError", Failure::InvalidTransition.status()));
        }

        b.push_block(&format!("class {}ApiView(APIView):", class), None, |b| {
            b.push_line(&format!("service = {}()", service));
            if mapped.is_empty() {
                return;
            }
            b.push_blank().push_block(
                "def handle_exception(self, exc: Exception) -> Response:",
                None,
                |b| {
                    for (error, status) in mapped {
                        scope.artifact(class, ArtifactKind::Service, error);
                        b.push_block(&format!("if isinstance(exc, {}):", error), None, |b| {
                            b.push_line(&format!(
                                "return Response({{\"error\": str(exc)}}, status={})",
                                status
                            ));
                        });
                    }
                    b.push_line("return super().handle_exception(exc)");
                },
            );
        });
    }

    /// Routes grouped by relative path, in declaration order.
    fn groups(&self) -> Vec<(String, Vec<&'a Route>)> {
        let mut groups: Vec<(String, Vec<&'a Route>)> = Vec::new();
        for route in &self.plan.controller.routes {
            match groups.iter_mut().find(|(relative, _)| *relative == route.relative) {
                Some((_, routes)) => routes.push(route),
                None => groups.push((route.relative.clone(), vec![route])),
            }
        }
        groups
    }

    /// `OrderListView` for the base path, `OrderDetailView` for `/{id}`,
    /// otherwise named after the first handler.
    fn view_name(&self, route: &Route) -> String {
        let suffix = match route.relative.as_str() {
            "" => "List".to_string(),
            "/{id}" => "Detail".to_string(),
            _ => to_pascal_case(&route.handler),
        };
        format!("{}{}View", self.plan.name(), suffix)
    }

    /// `<converter:name>` for a path placeholder.
    fn placeholder(&self, route: &Route, name: &str) -> String {
        let converter = route
            .params
            .iter()
            .find(|p| p.name == name)
            .map_or("str", |p| match &p.ty {
                ParamType::Id => path_converter(PY_TYPES.id(self.plan.entity.id.id_type)),
                ParamType::ForeignId(id) => path_converter(PY_TYPES.id(*id)),
                ParamType::Field(field) => PY_TYPES.field(field).map_or("str", path_converter),
                _ => "str",
            });
        format!("<{}:{}>", converter, ident(name))
    }

    fn push_view(&self, scope: &mut Scope, b: &mut CodeBuilder, routes: &[&Route]) {
        let class = self.plan.name();
        let Some(first) = routes.first() else {
            return;
        };
        b.push_block(
            &format!("class {}({}ApiView):", self.view_name(first), class),
            None,
            |b| {
                for (i, route) in routes.iter().enumerate() {
                    if i > 0 {
                        b.push_blank();
                    }
                    self.push_handler(scope, b, route);
                }
            },
        );
    }

    fn push_handler(&self, scope: &mut Scope, b: &mut CodeBuilder, route: &Route) {
        let entity = self.plan.name();
        let params = ["self".to_string(), "request: Request".to_string()]
            .into_iter()
            .chain(
                route
                    .path_params()
                    .map(|p| format!("{}: {}", ident(&p.name), scope.param_type(&p.ty))),
            )
            .collect::<Vec<_>>()
            .join(", ");
        let returns = self
            .plan
            .service
            .op(&route.handler)
            .map_or(Returns::Entity, |op| op.returns);

        b.push_block(
            &format!("def {}({}) -> Response:", route.verb.method(), params),
            None,
            |b| {
                if let Some(param) = route.body() {
                    let partial = if self.is_partial(route, &param.name) {
                        ", partial=True"
                    } else {
                        ""
                    };
                    b.push_line(&format!(
                        "serializer = {}Serializer(data=request.data{})",
                        entity, partial
                    ))
                    .push_line("serializer.is_valid(raise_exception=True)");
                }
                let args = route
                    .params
                    .iter()
                    .map(|p| self.argument(scope, route, p))
                    .collect::<Vec<_>>()
                    .join(", ");
                let call = format!("self.service.{}({})", ident(&route.handler), args);

                match returns {
                    Returns::Unit => {
                        b.push_line(&call)
                            .push_line(&format!("return Response(status={})", route.success));
                    }
                    Returns::Optional | Returns::Entity => {
                        b.push_line(&format!("result = {}", call)).push_line(&format!(
                            "return Response({}Serializer(result).data, status={})",
                            entity, route.success
                        ));
                    }
                    Returns::List => {
                        b.push_line(&format!("result = {}", call)).push_line(&format!(
                            "return Response({}Serializer(result, many=True).data, status={})",
                            entity, route.success
                        ));
                    }
                    Returns::Page => {
                        b.push_line(&format!("rows, total = {}", call)).push_line(&format!(
                            "return Response({{\"items\": {}Serializer(rows, many=True).data, \"total\": total}}, status={})",
                            entity, route.success
                        ));
                    }
                    Returns::Count => {
                        b.push_line(&format!("result = {}", call)).push_line(&format!(
                            "return Response({{\"count\": result}}, status={})",
                            route.success
                        ));
                    }
                }
            },
        );
    }

    /// Expression passing one parameter to the service.
    fn argument(&self, scope: &mut Scope, route: &Route, param: &RouteParam) -> String {
        let name = ident(&param.name);
        match param.source {
            ParamSource::Path => name,
            ParamSource::Body => {
                if self.is_partial(route, &param.name) {
                    "serializer.validated_data".to_string()
                } else {
                    format!("{}(**serializer.validated_data)", self.plan.name())
                }
            }
            ParamSource::Query => {
                let mut args = vec!["request".to_string(), quote(&name)];
                let hint = scope.param_type(&param.ty);
                match &param.ty {
                    ParamType::Timestamp => {
                        args.push("cast=datetime.fromisoformat".into());
                    }
                    ParamType::State if hint != "str" => args.push(format!("cast={}", hint)),
                    _ if hint == "int" || hint == "UUID" => args.push(format!("cast={}", hint)),
                    _ => {}
                }
                if param.required {
                    args.push("required=True".into());
                }
                format!("_query({})", args.join(", "))
            }
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
}

/// Reads a query parameter, rejecting missing required ones with a 400.
fn push_query_helper(b: &mut CodeBuilder) {
    b.push_block(
        "def _query(request: Request, name: str, cast: Callable[[str], Any] = str, required: bool = False) -> Any:",
        None,
        |b| {
            b.push_line("value = request.query_params.get(name)");
            b.push_block("if value is None:", None, |b| {
                b.push_block("if required:", None, |b| {
                    b.push_line("raise ValidationError({name: \"This query parameter is required.\"})");
                })
                .push_line("return None");
            })
            .push_line("return cast(value)");
        },
    );
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing::{compile, order_ir, parent_child_ir, shop_ir};

    use super::*;

    fn render(ir: kiln_ir::DomainIR, class: &str) -> String {
        let ctx = compile(ir).unwrap();
        ViewsPy::new(&ctx.plans[class]).render()
    }

    #[test]
    fn test_serializer_and_base_view() {
        let py = render(parent_child_ir(), "Parent");

        assert!(py.contains("from ..services.parent_service import NotFoundError, ParentService"));
        assert!(py.contains(
            "class ParentSerializer(serializers.ModelSerializer):\n    class Meta:\n        model = Parent\n        fields = [\"id\", \"name\"]\n        read_only_fields = [\"id\"]"
        ));
        assert!(py.contains("class ParentApiView(APIView):\n    service = ParentService()"));
        assert!(py.contains("        if isinstance(exc, NotFoundError):\n            return Response({\"error\": str(exc)}, status=404)"));
        assert!(!py.contains("InvalidTransitionError"));
    }

    #[test]
    fn test_views_and_urls() {
        let py = render(parent_child_ir(), "Parent");

        assert!(py.contains(
            "class ParentDetailView(ParentApiView):\n    def get(self, request: Request, id: UUID) -> Response:\n        result = self.service.find_by_id(id)\n        return Response(ParentSerializer(result).data, status=200)"
        ));
        assert!(py.contains("    def delete(self, request: Request, id: UUID) -> Response:\n        self.service.delete(id)\n        return Response(status=204)"));
        assert!(py.contains("serializer = ParentSerializer(data=request.data, partial=True)"));
        assert!(py.contains("result = self.service.update(id, serializer.validated_data)"));
        assert!(py.contains("result = self.service.create(Parent(**serializer.validated_data))"));
        assert!(py.contains(
            "urlpatterns = [\n    path(\"parents\", ParentListView.as_view()),\n    path(\"parents/<uuid:id>\", ParentDetailView.as_view()),\n]"
        ));
    }

    #[test]
    fn test_state_routes() {
        let py = render(order_ir(), "Order");

        assert!(py.contains("class OrderUpdateStatusView(OrderApiView):\n    def put(self, request: Request, id: UUID) -> Response:"));
        assert!(py.contains(
            "self.service.update_status(id, _query(request, \"new_status\", cast=OrderStatus, required=True), _query(request, \"updated_by\"), _query(request, \"comment\"))"
        ));
        assert!(py.contains("path(\"orders/status/<str:status>\", OrderFindByStatusView.as_view()),"));
        assert!(py.contains("def _query(request: Request, name: str, cast: Callable[[str], Any] = str, required: bool = False) -> Any:"));
        assert!(py.contains("status=400"));
    }

    #[test]
    fn test_numeric_ids() {
        let py = render(shop_ir(), "Product");
        assert!(py.contains("path(\"products/<int:id>\", ProductDetailView.as_view()),"));
    }
}
