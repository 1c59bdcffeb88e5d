use std::{fmt::Debug, path::PathBuf, time::Duration};

use camelpaste::paste;
use enum_as_inner::EnumAsInner;
use thiserror::Error;
use tokio::task::JoinError;

use crate::{general::function::ClusterManagementResult, sys::NodeID};

pub type MgmtResult<T> = Result<T, MgmtError>;

/// Raised before anything is sent to the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MgmtValidationErr {
    InvalidName { full_name: String },
    UnknownType { type_tag: String },
}

/// Raised after the command was handed to the execution engine.
#[derive(Debug)]
pub enum MgmtDispatchErr {
    Timeout {
        target_group: String,
        after: Duration,
    },
    NoMembers {
        target_group: String,
    },
    MemberExecution {
        target_path: String,
        result: ClusterManagementResult,
    },
}

#[derive(Debug)]
pub enum MgmtNetworkErr {
    HttpServe(hyper::Error),
}

#[derive(Debug)]
pub enum MgmtIoErr {
    Io(std::io::Error),
}

#[derive(Debug)]
pub enum MgmtConfigErr {
    Open {
        path: PathBuf,
        err: std::io::Error,
    },
    Decode {
        path: PathBuf,
        err: serde_yaml::Error,
    },
    ThisNodeMissing(NodeID),
    NoRole(NodeID),
    /// Member statuses are reported by name, so two members may not share one.
    DuplicateMemberName {
        name: String,
        nodes: (NodeID, NodeID),
    },
    /// The http endpoint listens on `addr.port() + 1`.
    NoHttpPort(NodeID),
}

#[derive(Debug)]
pub enum MgmtRuntimeErr {
    TokioJoin { err: JoinError, context: String },
    ModulesDropped,
}

#[derive(Error, Debug, EnumAsInner)]
pub enum MgmtError {
    #[error("Validation error: {0:?}")]
    MgmtValidationErr(MgmtValidationErr),

    #[error("Dispatch error: {0:?}")]
    MgmtDispatchErr(MgmtDispatchErr),

    #[error("Network error: {0:?}")]
    MgmtNetworkErr(MgmtNetworkErr),

    #[error("Io error: {0:?}")]
    MgmtIoErr(MgmtIoErr),

    #[error("Config error: {0:?}")]
    MgmtConfigErr(MgmtConfigErr),

    #[error("Runtime error: {0:?}")]
    MgmtRuntimeErr(MgmtRuntimeErr),
}

impl MgmtError {
    /// False when the request was rejected locally and no member was ever contacted.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, MgmtError::MgmtValidationErr(_))
    }
}

impl From<MgmtValidationErr> for MgmtError {
    fn from(e: MgmtValidationErr) -> Self {
        MgmtError::MgmtValidationErr(e)
    }
}

impl From<MgmtDispatchErr> for MgmtError {
    fn from(e: MgmtDispatchErr) -> Self {
        MgmtError::MgmtDispatchErr(e)
    }
}

impl From<MgmtNetworkErr> for MgmtError {
    fn from(e: MgmtNetworkErr) -> Self {
        MgmtError::MgmtNetworkErr(e)
    }
}

impl From<MgmtIoErr> for MgmtError {
    fn from(e: MgmtIoErr) -> Self {
        MgmtError::MgmtIoErr(e)
    }
}

impl From<MgmtConfigErr> for MgmtError {
    fn from(e: MgmtConfigErr) -> Self {
        MgmtError::MgmtConfigErr(e)
    }
}

impl From<MgmtRuntimeErr> for MgmtError {
    fn from(e: MgmtRuntimeErr) -> Self {
        MgmtError::MgmtRuntimeErr(e)
    }
}

impl From<std::io::Error> for MgmtError {
    fn from(e: std::io::Error) -> Self {
        MgmtError::MgmtIoErr(MgmtIoErr::Io(e))
    }
}

pub struct ErrCvt<T>(pub T);

macro_rules! impl_err_convertor {
    ($t:ty,$sub_t:ident,$sub_tt:ident) => {
        paste! {
            impl ErrCvt<$t> {
                pub fn [<to_ $sub_t:snake>](self) -> MgmtError {
                    MgmtError::$sub_t($sub_t::$sub_tt(self.0))
                }
            }
        }
    };
}

impl_err_convertor!(hyper::Error, MgmtNetworkErr, HttpServe);

pub trait MgmtResultExt {
    fn todo_handle(&self);
}

impl<T: Debug> MgmtResultExt for MgmtResult<T> {
    #[inline]
    fn todo_handle(&self) {
        match self {
            Ok(_ok) => {}
            Err(err) => {
                tracing::warn!("result err: {:?}", err);
            }
        }
    }
}
