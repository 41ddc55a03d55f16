//! The four artifact generators.
//!
//! Each generator turns a class and its [`EffectiveMetadata`] into a
//! structured, stack-independent spec. Stack adapters render the specs into
//! text. The service generator only sees the names of the repository
//! operations, and the controller generator binds its routes to the service
//! operation signatures.

mod controller;
mod entity;
mod repository;
mod service;

pub use controller::{ControllerSpec, HttpVerb, ParamSource, Route, RouteParam, plan_controller};
pub use entity::{EntityField, EntitySpec, FieldKind, plan_entity};
pub use repository::{Query, RepositoryOp, RepositorySpec, plan_repository};
pub use service::{
    HistoryAction, ServiceOp, ServiceOpKind, ServiceSignature, ServiceSpec, Step, TargetState,
    plan_service,
};

use kiln_ir::{ClassModel, EffectiveMetadata, IdType, SemanticType};

/// Type of an entity field or operation parameter, before stack mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(SemanticType),
    /// Declared type with no mapping; renders as the String mapping.
    Fallback(String),
    Id(IdType),
    /// The class's state enum.
    State(String),
    /// Another entity, or a collection of them.
    Entity { target: String, collection: bool },
}

impl FieldType {
    /// Semantic type used to look up the stack type table.
    pub fn semantic(&self) -> Option<SemanticType> {
        match self {
            FieldType::Scalar(ty) => Some(*ty),
            FieldType::Fallback(_) => Some(SemanticType::String),
            _ => None,
        }
    }
}

/// Type of an operation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// The class's own id type.
    Id,
    /// Id of another entity.
    ForeignId(IdType),
    Field(FieldType),
    /// One value of the state enum.
    State,
    /// Several values of the state enum.
    States,
    Timestamp,
    Text,
    Version,
    /// Page request.
    Page,
    /// The entity itself.
    Entity,
}

/// A named operation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
    pub required: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Shape of an operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    /// Zero or one entity.
    Optional,
    /// One entity, failing with not-found otherwise.
    Entity,
    List,
    Page,
    Count,
    Unit,
}

/// Failure an operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Failure {
    NotFound,
    InvalidTransition,
    Validation,
}

impl Failure {
    /// HTTP status a controller maps this failure to.
    pub fn status(&self) -> u16 {
        match self {
            Failure::NotFound => 404,
            Failure::InvalidTransition | Failure::Validation => 400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Failure::NotFound => "not-found",
            Failure::InvalidTransition => "invalid-transition",
            Failure::Validation => "validation",
        }
    }
}

/// Everything generated for one class.
#[derive(Debug, Clone)]
pub struct ClassPlan {
    pub class: ClassModel,
    pub metadata: EffectiveMetadata,
    pub entity: EntitySpec,
    pub repository: RepositorySpec,
    pub service: ServiceSpec,
    pub controller: ControllerSpec,
}

impl ClassPlan {
    pub fn name(&self) -> &str {
        &self.class.name
    }

    /// Name of the state enum, when the class is stateful.
    pub fn state_enum(&self) -> Option<&str> {
        self.metadata
            .capabilities
            .state
            .as_ref()
            .map(|s| s.enum_name.as_str())
    }
}
