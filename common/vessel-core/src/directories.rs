use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "vessel";
const SETTINGS_FILE: &str = "settings.yaml";
const DAEMON_SOCKET: &str = "vesseld.sock";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub config_home: Option<PathBuf>,
    pub runtime_dir: Option<PathBuf>,
}

impl Directory {
    pub fn from_env() -> Directory {
        Directory::from_vars(
            std::env::var_os("XDG_CONFIG_HOME"),
            std::env::var_os("XDG_RUNTIME_DIR"),
            std::env::home_dir(),
        )
    }

    fn from_vars(
        config_home: Option<OsString>,
        runtime_dir: Option<OsString>,
        home: Option<PathBuf>,
    ) -> Directory {
        fn abspath(path: OsString) -> Option<PathBuf> {
            let path: PathBuf = PathBuf::from(path);
            if path.is_absolute() {
                Some(path)
            } else {
                None
            }
        }

        let config_home = config_home
            .and_then(abspath)
            .or_else(|| home.as_ref().map(|home| home.join(".config")));

        Directory {
            config_home: config_home.map(|dir| dir.join(APP_DIR)),
            runtime_dir: runtime_dir.and_then(abspath).map(|dir| dir.join(APP_DIR)),
        }
    }

    pub fn settings_file(&self) -> Option<PathBuf> {
        self.config_home.as_ref().map(|dir| dir.join(SETTINGS_FILE))
    }

    pub fn default_daemon_socket(&self) -> PathBuf {
        match &self.runtime_dir {
            Some(dir) => dir.join(DAEMON_SOCKET),
            None => Path::new("/tmp").join(DAEMON_SOCKET),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_config_home_takes_precedence_over_home() {
        let dirs = Directory::from_vars(
            Some("/xdg/config".into()),
            None,
            Some(PathBuf::from("/home/alice")),
        );

        assert_eq!(
            dirs.settings_file(),
            Some(PathBuf::from("/xdg/config/vessel/settings.yaml"))
        );
    }

    #[test]
    fn relative_xdg_paths_are_ignored() {
        let dirs = Directory::from_vars(
            Some("relative/config".into()),
            Some("relative/run".into()),
            Some(PathBuf::from("/home/alice")),
        );

        assert_eq!(
            dirs.settings_file(),
            Some(PathBuf::from("/home/alice/.config/vessel/settings.yaml"))
        );
        assert_eq!(dirs.default_daemon_socket(), PathBuf::from("/tmp/vesseld.sock"));
    }

    #[test]
    fn daemon_socket_lives_in_runtime_dir() {
        let dirs = Directory::from_vars(None, Some("/run/user/1000".into()), None);

        assert_eq!(dirs.settings_file(), None);
        assert_eq!(
            dirs.default_daemon_socket(),
            PathBuf::from("/run/user/1000/vessel/vesseld.sock")
        );
    }
}
