//! Class operations, their parameters and exception references.

use crate::{
    identifier::ElementId,
    identity::Identity,
    typeref::{ReturnType, TypeRef},
};

/// Whether a parameter is a plain value or an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterKind {
    #[default]
    Simple,
    Array,
}

/// Payload of a parameter beyond identity and type.
#[derive(Debug, Clone, Default)]
pub struct ParameterData {
    pub position: i64,
    pub kind: ParameterKind,
    pub type_name: Option<String>,
}

/// An operation parameter.
///
/// Parameters are source-synthesized entities: they carry no row id of their
/// own, so their identity has `id == None`.
#[derive(Debug, Clone)]
pub struct Parameter {
    identity: Identity,
    type_ref: TypeRef,
    data: ParameterData,
}

impl Parameter {
    pub fn new(identity: Identity, type_ref: TypeRef, data: ParameterData) -> Self {
        Self {
            identity,
            type_ref,
            data,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn type_ref(&self) -> TypeRef {
        self.type_ref
    }

    pub fn kind(&self) -> ParameterKind {
        self.data.kind
    }

    pub fn position(&self) -> i64 {
        self.data.position
    }

    pub fn type_name(&self) -> Option<&str> {
        self.data.type_name.as_deref()
    }
}

/// An exception an operation declares, resolved by name when possible.
///
/// Unlike mandatory references, an exception that never resolves keeps just
/// its name; there is no sentinel substitution and no failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRef {
    pub name: String,
    pub class: Option<ElementId>,
}

/// Payload of an operation beyond identity and return type.
#[derive(Debug, Clone, Default)]
pub struct OperationData {
    pub position: i64,
    pub is_abstract: bool,
    pub is_static: bool,
    pub is_final: bool,
    /// The return type name as the source spelled it.
    pub return_type_name: Option<String>,
}

/// A class operation with its ordered parameters.
#[derive(Debug, Clone)]
pub struct Operation {
    identity: Identity,
    return_type: ReturnType,
    data: OperationData,
    parameters: Vec<Parameter>,
    exceptions: Vec<ExceptionRef>,
}

impl Operation {
    pub fn new(identity: Identity, return_type: ReturnType, data: OperationData) -> Self {
        Self {
            identity,
            return_type,
            data,
            parameters: Vec::new(),
            exceptions: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }

    pub fn position(&self) -> i64 {
        self.data.position
    }

    pub fn is_abstract(&self) -> bool {
        self.data.is_abstract
    }

    pub fn is_static(&self) -> bool {
        self.data.is_static
    }

    pub fn is_final(&self) -> bool {
        self.data.is_final
    }

    pub fn return_type_name(&self) -> Option<&str> {
        self.data.return_type_name.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn exceptions(&self) -> &[ExceptionRef] {
        &self.exceptions
    }

    pub(crate) fn push_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub(crate) fn push_exception(&mut self, exception: ExceptionRef) {
        self.exceptions.push(exception);
    }
}
