use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".recruit_wizard";
const SESSIONS_DIR: &str = "sessions";

/// Application data directory, defaulting to `~/.recruit_wizard`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("RECRUIT_WIZARD_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Where assistant answers are kept between runs.
pub fn sessions_dir(home: &Path) -> PathBuf {
    home.join(SESSIONS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_live_under_the_app_home() {
        let home = PathBuf::from("/tmp/recruit");
        assert_eq!(sessions_dir(&home), PathBuf::from("/tmp/recruit/sessions"));
    }
}
