//! Typed failure modes of scene generation.
//!
//! Every expected failure (malformed fact, exhausted retry budget,
//! oracle timeout) is a variant here rather than a panic; the retry
//! orchestrator matches on them to decide what is retryable.

use thiserror::Error;

use crate::resources::{Pose, Shape};

/// A malformed or inconsistent instruction set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed instruction fact: `{fact}`")]
    Malformed { fact: String },
    #[error("unknown shape `{ident}` in fact `{fact}`")]
    UnknownShape { ident: String, fact: String },
    #[error("unknown pose `{ident}` in fact `{fact}`")]
    UnknownPose { ident: String, fact: String },
    #[error("unknown relation `{ident}` in fact `{fact}`")]
    UnknownRelation { ident: String, fact: String },
    #[error("instruction id {id} appears more than once")]
    DuplicateId { id: u32 },
    #[error("instruction set contains no grounded instruction")]
    MissingGrounded,
    #[error("instruction {id} targets {target}, which is not realized before it")]
    ForwardTarget { id: u32, target: u32 },
}

/// Geometry collaborator failures.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("{shape} has no pose `{pose}`")]
    InvalidPose { shape: Shape, pose: Pose },
}

/// Entity registry invariant violations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("object id {id} is already registered")]
    DuplicateId { id: u32 },
}

/// Logic-engine boundary failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("instruction oracle exceeded its {secs}s wall-clock budget")]
    Timeout { secs: u64 },
    #[error("instruction oracle failed: {0}")]
    Failed(String),
}

impl OracleError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, OracleError::Timeout { .. })
    }
}

/// Anything that can fail while generating one scene.
#[derive(Debug, Error)]
pub enum GenError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("no collision-free placement for object {id} after {attempts} attempts")]
    PlacementExhausted { id: u32, attempts: u32 },
    #[error("object {id} requests unsupported relation `{relation}`")]
    UnsupportedRelation { id: u32, relation: &'static str },
    #[error("scene abandoned after {attempts} structure attempts")]
    AttemptsExhausted { attempts: u32 },
}
