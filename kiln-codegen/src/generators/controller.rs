//! Controller generator: HTTP routes delegating to the service.

use kiln_ir::{ClassModel, DomainRole, EffectiveMetadata};

use super::{Failure, ParamType, ServiceSignature};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Lowercase method name, as used by router APIs.
    pub fn method(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
        }
    }
}

/// Where a request parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParam {
    pub name: String,
    pub ty: ParamType,
    pub source: ParamSource,
    pub required: bool,
}

/// One HTTP route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub verb: HttpVerb,
    /// Full path, e.g. `/orders/{id}`.
    pub path: String,
    /// Path below the base, e.g. `/{id}`. Empty for the base itself.
    pub relative: String,
    /// Service operation the route delegates to.
    pub handler: String,
    /// Parameters in the order the service operation takes them.
    pub params: Vec<RouteParam>,
    pub success: u16,
    pub failures: Vec<Failure>,
}

impl Route {
    /// Every status code the route can answer with, success first.
    pub fn statuses(&self) -> Vec<u16> {
        let mut statuses = vec![self.success];
        for failure in &self.failures {
            if !statuses.contains(&failure.status()) {
                statuses.push(failure.status());
            }
        }
        statuses
    }

    pub fn path_params(&self) -> impl Iterator<Item = &RouteParam> {
        self.params.iter().filter(|p| p.source == ParamSource::Path)
    }

    pub fn body(&self) -> Option<&RouteParam> {
        self.params.iter().find(|p| p.source == ParamSource::Body)
    }

    /// Route path with `{name}` placeholders rewritten by `placeholder`.
    pub fn path_with(&self, placeholder: impl Fn(&str) -> String) -> String {
        rewrite_placeholders(&self.path, placeholder)
    }

    /// Relative path with `{name}` placeholders rewritten by `placeholder`.
    pub fn relative_with(&self, placeholder: impl Fn(&str) -> String) -> String {
        rewrite_placeholders(&self.relative, placeholder)
    }
}

fn rewrite_placeholders(path: &str, placeholder: impl Fn(&str) -> String) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => placeholder(name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Structured description of one controller artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSpec {
    pub class_name: String,
    pub base_path: String,
    pub routes: Vec<Route>,
    /// Service operations a route needed but the service does not provide.
    pub missing_service_ops: Vec<String>,
}

impl ControllerSpec {
    pub fn route(&self, verb: HttpVerb, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.verb == verb && r.path == path)
    }

    pub fn handlers(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.handler.as_str()).collect()
    }
}

struct RouteDef {
    verb: HttpVerb,
    relative: &'static str,
    handler: &'static str,
    success: u16,
    failures: &'static [Failure],
    /// Skip the route instead of reporting a missing handler.
    optional: bool,
}

const fn route(
    verb: HttpVerb,
    relative: &'static str,
    handler: &'static str,
    success: u16,
    failures: &'static [Failure],
) -> RouteDef {
    RouteDef {
        verb,
        relative,
        handler,
        success,
        failures,
        optional: false,
    }
}

const CRUD_ROUTES: &[RouteDef] = &[
    route(HttpVerb::Post, "", "create", 201, &[Failure::Validation]),
    route(HttpVerb::Get, "/{id}", "findById", 200, &[Failure::NotFound]),
    route(HttpVerb::Get, "", "findAll", 200, &[]),
    route(HttpVerb::Put, "/{id}", "update", 200, &[Failure::NotFound]),
    route(HttpVerb::Delete, "/{id}", "delete", 204, &[Failure::NotFound]),
];

const STATE_ROUTES: &[RouteDef] = &[
    route(
        HttpVerb::Put,
        "/{id}/status",
        "updateStatus",
        200,
        &[Failure::NotFound, Failure::InvalidTransition],
    ),
    route(HttpVerb::Get, "/status/{status}", "findByStatus", 200, &[]),
];

const USER_ROUTES: &[RouteDef] = &[
    route(HttpVerb::Post, "/{id}/promote", "promoteAccount", 200, &[Failure::NotFound]),
    route(HttpVerb::Post, "/{id}/assign", "assignToOrganization", 200, &[Failure::NotFound]),
    RouteDef {
        optional: true,
        ..route(HttpVerb::Get, "/account-type/{accountType}", "findByAccountType", 200, &[])
    },
];

const SHIPMENT_ROUTES: &[RouteDef] = &[
    route(
        HttpVerb::Post,
        "/{id}/deliver",
        "markDelivered",
        200,
        &[Failure::NotFound, Failure::InvalidTransition],
    ),
    route(
        HttpVerb::Post,
        "/{id}/pickup",
        "markPickedUp",
        200,
        &[Failure::NotFound, Failure::InvalidTransition],
    ),
];

/// Plan the controller for `class`.
///
/// `service_ops` lists the operations the service generator emitted. Routes
/// bind their parameters from the signature they delegate to. A required
/// route whose operation is absent is left out and recorded in
/// [`ControllerSpec::missing_service_ops`].
pub fn plan_controller(
    class: &ClassModel,
    meta: &EffectiveMetadata,
    service_ops: &[ServiceSignature],
) -> ControllerSpec {
    let mut defs: Vec<&RouteDef> = CRUD_ROUTES.iter().collect();
    if meta.is_stateful() {
        defs.extend(STATE_ROUTES);
    }
    match meta.capabilities.role {
        DomainRole::Generic => {}
        DomainRole::UserLike => defs.extend(USER_ROUTES),
        DomainRole::ShipmentLike { .. } => defs.extend(SHIPMENT_ROUTES),
    }

    let mut routes = Vec::new();
    let mut missing_service_ops = Vec::new();
    for def in defs {
        let Some(op) = service_ops.iter().find(|op| op.name == def.handler) else {
            if !def.optional {
                missing_service_ops.push(def.handler.to_string());
            }
            continue;
        };

        let params = op
            .params
            .iter()
            .map(|p| {
                let source = if p.ty == ParamType::Entity {
                    ParamSource::Body
                } else if def.relative.contains(&format!("{{{}}}", p.name)) {
                    ParamSource::Path
                } else {
                    ParamSource::Query
                };
                RouteParam {
                    name: p.name.clone(),
                    ty: p.ty.clone(),
                    source,
                    required: p.required,
                }
            })
            .collect();

        routes.push(Route {
            verb: def.verb,
            path: format!("{}{}", meta.route_base, def.relative),
            relative: def.relative.to_string(),
            handler: def.handler.to_string(),
            params,
            success: def.success,
            failures: def.failures.to_vec(),
        });
    }

    ControllerSpec {
        class_name: class.name.clone(),
        base_path: meta.route_base.clone(),
        routes,
        missing_service_ops,
    }
}

#[cfg(test)]
mod tests {
    use kiln_ir::{Attribute, GlobalConfig, SemanticType};

    use super::*;
    use crate::{
        generators::{plan_repository, plan_service},
        metadata::resolve,
    };

    fn plan(class: &ClassModel) -> ControllerSpec {
        let meta = resolve(class, &GlobalConfig::default(), None).unwrap();
        let repository = plan_repository(class, &meta, &[], &mut Vec::new());
        let service = plan_service(class, &meta, &[], &repository.op_names());
        plan_controller(class, &meta, &service.signatures())
    }

    #[test]
    fn test_crud_routes() {
        let spec = plan(&ClassModel::new("Tag"));
        assert_eq!(spec.base_path, "/tags");
        assert_eq!(spec.routes.len(), 5);
        assert!(spec.missing_service_ops.is_empty());

        let create = spec.route(HttpVerb::Post, "/tags").unwrap();
        assert_eq!(create.statuses(), vec![201, 400]);
        assert_eq!(create.body().unwrap().name, "entity");

        let get = spec.route(HttpVerb::Get, "/tags/{id}").unwrap();
        assert_eq!(get.handler, "findById");
        assert_eq!(get.statuses(), vec![200, 404]);
        assert_eq!(get.path_params().count(), 1);

        let delete = spec.route(HttpVerb::Delete, "/tags/{id}").unwrap();
        assert_eq!(delete.statuses(), vec![204, 404]);
        assert_eq!(spec.route(HttpVerb::Get, "/tags").unwrap().statuses(), vec![200]);
    }

    #[test]
    fn test_order_status_routes() {
        let order =
            ClassModel::new("Order").attribute(Attribute::new("status", SemanticType::String));
        let spec = plan(&order);

        let status = spec.route(HttpVerb::Put, "/orders/{id}/status").unwrap();
        assert_eq!(status.handler, "updateStatus");
        assert_eq!(status.statuses(), vec![200, 404, 400]);
        let sources: Vec<_> = status.params.iter().map(|p| (p.name.as_str(), p.source)).collect();
        assert_eq!(
            sources,
            vec![
                ("id", ParamSource::Path),
                ("newStatus", ParamSource::Query),
                ("updatedBy", ParamSource::Query),
                ("comment", ParamSource::Query),
            ]
        );

        let by_status = spec.route(HttpVerb::Get, "/orders/status/{status}").unwrap();
        assert_eq!(by_status.params[0].source, ParamSource::Path);
    }

    #[test]
    fn test_user_routes() {
        let user = ClassModel::new("User")
            .attribute(Attribute::new("email", SemanticType::String).unique());
        let spec = plan(&user);

        assert!(spec.route(HttpVerb::Post, "/users/{id}/promote").is_some());
        assert!(spec.route(HttpVerb::Post, "/users/{id}/assign").is_some());
        // No accountType attribute, so no finder and no error
        assert!(spec.route(HttpVerb::Get, "/users/account-type/{accountType}").is_none());
        assert!(spec.missing_service_ops.is_empty());
    }

    #[test]
    fn test_shipment_routes() {
        let parcel = ClassModel::new("Parcel")
            .with_state(None)
            .attribute(Attribute::new("trackingNumber", SemanticType::String));
        let spec = plan(&parcel);

        let deliver = spec.route(HttpVerb::Post, "/parcels/{id}/deliver").unwrap();
        assert_eq!(deliver.handler, "markDelivered");
        assert_eq!(deliver.statuses(), vec![200, 404, 400]);
        assert!(spec.route(HttpVerb::Post, "/parcels/{id}/pickup").is_some());
    }

    #[test]
    fn test_missing_service_op() {
        let order =
            ClassModel::new("Order").attribute(Attribute::new("status", SemanticType::String));
        let meta = resolve(&order, &GlobalConfig::default(), None).unwrap();
        let repository = plan_repository(&order, &meta, &[], &mut Vec::new());
        let service = plan_service(&order, &meta, &[], &repository.op_names());
        let mut signatures = service.signatures();
        signatures.retain(|op| op.name != "updateStatus");

        let spec = plan_controller(&order, &meta, &signatures);
        assert_eq!(spec.missing_service_ops, vec!["updateStatus"]);
        assert!(spec.route(HttpVerb::Put, "/orders/{id}/status").is_none());
    }

    #[test]
    fn test_path_placeholders() {
        let spec = plan(&ClassModel::new("OrderItem"));
        let get = spec.route(HttpVerb::Get, "/order-items/{id}").unwrap();
        assert_eq!(get.path_with(|name| format!(":{}", name)), "/order-items/:id");
        assert_eq!(get.relative_with(|name| format!("<{}>", name)), "/<id>");
    }
}
