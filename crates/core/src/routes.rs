//! Dashboard routes: the only external trigger surface of the controllers.
//!
//! | Route                          | Meaning                                  |
//! |--------------------------------|------------------------------------------|
//! | `/` or `/upload`               | upload page                              |
//! | `/upload?autoLoadDemo=true`    | upload page, start the demo immediately  |
//! | `/analysis/:taskId`            | results dashboard for one task           |

use std::fmt;

use crate::error::CoreError;
use crate::types::TaskId;

/// Query parameter that asks the upload page to load the demo dataset.
pub const AUTO_LOAD_DEMO_PARAM: &str = "autoLoadDemo";

const UPLOAD_PATH: &str = "/upload";
const ANALYSIS_PREFIX: &str = "/analysis/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Upload { auto_load_demo: bool },
    Analysis(TaskId),
}

impl Route {
    /// The plain upload page.
    pub fn upload() -> Self {
        Self::Upload {
            auto_load_demo: false,
        }
    }

    pub fn analysis(task_id: TaskId) -> Self {
        Self::Analysis(task_id)
    }

    /// Parse a route path with an optional query string.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };
        let path = path.trim_end_matches('/');

        if path.is_empty() || path == UPLOAD_PATH {
            let auto_load_demo = query
                .into_iter()
                .flat_map(|q| q.split('&'))
                .filter_map(|pair| pair.split_once('='))
                .any(|(key, value)| key == AUTO_LOAD_DEMO_PARAM && value == "true");
            return Ok(Self::Upload { auto_load_demo });
        }

        if let Some(id) = path.strip_prefix(ANALYSIS_PREFIX) {
            return TaskId::new(id).map(Self::Analysis);
        }

        Err(CoreError::Validation(format!("Unknown route '{raw}'")))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload {
                auto_load_demo: false,
            } => f.write_str(UPLOAD_PATH),
            Self::Upload {
                auto_load_demo: true,
            } => write!(f, "{UPLOAD_PATH}?{AUTO_LOAD_DEMO_PARAM}=true"),
            Self::Analysis(id) => write!(f, "{ANALYSIS_PREFIX}{id}"),
        }
    }
}
