use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "keyrace";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for mutable state: the progress database, history and log.
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("progress.db"))
    }

    pub fn history_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.csv"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("keyrace.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_files_share_a_directory() {
        if let Some(dir) = AppDirs::state_dir() {
            assert_eq!(AppDirs::db_path().unwrap().parent(), Some(dir.as_path()));
            assert_eq!(AppDirs::history_path().unwrap().parent(), Some(dir.as_path()));
            assert_eq!(AppDirs::log_path().unwrap().parent(), Some(dir.as_path()));
        }
    }
}
