use cbhunt_core::MissionConfigError;
use cbhunt_extract::ExtractError;
use cbhunt_store::StoreError;
use thiserror::Error;

use crate::phase::{Action, Phase};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("cannot {action} while {phase}")]
    IllegalTransition { action: Action, phase: Phase },

    #[error("an unconfirmed review is pending; confirm or discard it first")]
    ReviewPending,

    #[error("nothing selected")]
    EmptySelection,

    #[error("selection index {index} is out of range for {len} item(s)")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Config(#[from] MissionConfigError),

    #[error("mission failed: {0}")]
    MissionFailed(#[source] ExtractError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
