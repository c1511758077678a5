//! 文件会话存储
//!
//! 令牌以纯文本保存在单个文件中，文件不存在即未认证。
//! 读写失败只记录日志，不向调用方传播。

use crate::session::SessionStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 在目录下以 `key` 为文件名存放令牌
    pub fn in_dir(dir: impl AsRef<Path>, key: &str) -> Self {
        Self::new(dir.as_ref().join(key))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get_token(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Some(content.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read token");
                None
            }
        }
    }

    fn set_token(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(
                        path = %parent.display(),
                        error = %e,
                        "failed to create token dir"
                    );
                    return;
                }
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist token");
        }
    }

    fn clear_token(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove token");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path(), "token");

        assert_eq!(store.get_token(), None);
        assert!(!store.is_authenticated());

        store.set_token("abc123");
        assert_eq!(store.get_token().as_deref(), Some("abc123"));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "abc123");

        store.clear_token();
        assert_eq!(store.get_token(), None);
        assert!(!store.path().exists());

        // 重复清除不会出错
        store.clear_token();
    }

    #[test]
    fn test_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        FileSessionStore::in_dir(dir.path(), "token").set_token("persisted");

        let reopened = FileSessionStore::in_dir(dir.path(), "token");
        assert_eq!(reopened.get_token().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session/token"));
        store.set_token("t");
        assert_eq!(store.get_token().as_deref(), Some("t"));
    }

    #[test]
    fn test_hand_edited_file_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path(), "token");
        fs::write(store.path(), "edited\n").unwrap();
        assert_eq!(store.get_token().as_deref(), Some("edited"));
    }

    #[test]
    fn test_unreadable_path_degrades_to_absent() {
        let dir = tempfile::tempdir().unwrap();
        // 路径指向目录，读取失败但不 panic
        let store = FileSessionStore::new(dir.path());
        assert_eq!(store.get_token(), None);
        store.set_token("ignored");
        store.clear_token();
    }
}
