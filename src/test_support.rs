use crate::config::Settings;
use crate::context::ProjectContext;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A scratch project with `.superbeads/` and default settings, no packs.
pub(crate) fn create_test_project() -> TempDir {
    create_test_project_with_packs(&[])
}

pub(crate) fn create_test_project_with_packs(packs: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let ctx = ProjectContext::for_init(temp_dir.path()).unwrap();
    std::fs::create_dir_all(&ctx.sprint_dir).unwrap();

    let settings = Settings {
        project_name: "test-project".to_string(),
        packs: packs.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    };
    settings.save(ctx.settings_path()).unwrap();

    temp_dir
}

pub(crate) fn context_for(dir: &TempDir) -> ProjectContext {
    ProjectContext::resolve_from(dir.path()).unwrap()
}
