//! Configuration for the qualeval server
//!
//! Serving options come from CLI flags with environment-variable fallback.
//! Storage backend selection follows presence of credentials: the remote
//! relational store when the Supabase pair is set, the local SQLite store
//! when a database path is given, otherwise no store at all (the service
//! stays up; write endpoints report storage as uninitialized).

use clap::Parser;
use std::path::{Path, PathBuf};

/// Default public URL prefix for the evaluation image repository.
const DEFAULT_IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PakYouMu/qualitative-evaluation-images/refs/heads/main/static/evaluation_images";

#[derive(Parser, Debug)]
#[command(name = "qualeval", about = "Sequential image-rating survey server")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "QUALEVAL_LISTEN", default_value = "127.0.0.1:5730")]
    pub listen: String,

    /// Local directory scanned for evaluation images at startup
    #[arg(long, env = "QUALEVAL_IMAGE_DIR", default_value = "static/evaluation_images")]
    pub image_dir: PathBuf,

    /// Public URL prefix under which the same images are retrievable
    #[arg(long, env = "QUALEVAL_IMAGE_BASE_URL", default_value = DEFAULT_IMAGE_BASE_URL)]
    pub image_base_url: String,

    /// SQLite database path for the local record store (used only when the
    /// Supabase environment variables are absent)
    #[arg(long, env = "QUALEVAL_SQLITE_PATH")]
    pub sqlite_path: Option<PathBuf>,
}

/// Which record-store strategy the process runs with.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Remote relational store via its REST interface
    Supabase { url: String, service_key: String },
    /// Local SQLite database
    Sqlite { path: PathBuf },
    /// No credentials configured; submissions are disabled
    Disabled,
}

impl StorageConfig {
    /// Resolve the backend from the environment, remote store first.
    pub fn resolve(sqlite_path: Option<&Path>) -> Self {
        let url = std::env::var("SUPABASE_URL").unwrap_or_default();
        let key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default();
        if !url.is_empty() && !key.is_empty() {
            return StorageConfig::Supabase { url, service_key: key };
        }
        if let Some(path) = sqlite_path {
            return StorageConfig::Sqlite { path: path.to_path_buf() };
        }
        StorageConfig::Disabled
    }
}
