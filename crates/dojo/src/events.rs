use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum AppEvent {
    DataChanged(PathBuf),
}
