use std::path::PathBuf;

// Helper defaults
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub(crate) fn default_filename() -> String {
    "[name].js".to_string()
}

pub(crate) fn default_min_size() -> u64 {
    20_000
}

pub(crate) fn default_min_chunks() -> usize {
    1
}

pub(crate) fn default_max_async_requests() -> usize {
    5
}

pub(crate) fn default_max_initial_requests() -> usize {
    3
}

pub(crate) fn default_name_delimiter() -> String {
    "~".to_string()
}

pub(crate) fn default_html_filename() -> String {
    "index.html".to_string()
}

pub(crate) fn default_dev_port() -> u16 {
    8080
}
