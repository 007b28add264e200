use thiserror::Error;

use crate::tree::NodeId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("container #{0} not found")]
    ContainerNotFound(String),
    #[error("template #{0} not found")]
    TemplateNotFound(String),
    #[error("element #{0} is not a template")]
    NotATemplate(String),
    #[error("no enclosing field group")]
    NoEnclosingGroup,
    #[error("host operation failed: {0}")]
    Host(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("node {0} cannot have children")]
    NotAnElement(NodeId),
    #[error("node {0} is not a template")]
    NotATemplate(NodeId),
    #[error("node {child} is already attached")]
    AlreadyAttached { child: NodeId },
    #[error("appending {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}
