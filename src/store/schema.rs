use serde::{Deserialize, Serialize};

use crate::session::exam::ExamSession;
use crate::vocab::mastery::VocabMastery;
use crate::vocab::session::VocabSession;

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamHistoryData {
    pub schema_version: u32,
    pub sessions: Vec<ExamSession>,
}

impl Default for ExamHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabMasteryData {
    pub schema_version: u32,
    pub mastery: Vec<VocabMastery>,
}

impl Default for VocabMasteryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            mastery: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VocabSessionData {
    pub schema_version: u32,
    pub sessions: Vec<VocabSession>,
}

impl Default for VocabSessionData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}
