//! Server-rendered pages
//!
//! Templates are compiled into the binary. A configured template directory
//! may override any of them with `{name}.html`, read on every request so
//! edits show up without a restart.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Replaced with the crate version on render
const VERSION_PLACEHOLDER: &str = "{{APP_VERSION}}";

/// The five named page templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Search,
    Register,
    Involved,
    Sources,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Home, Page::Search, Page::Register, Page::Involved, Page::Sources];

    pub fn template_name(self) -> &'static str {
        match self {
            Page::Home => "index",
            Page::Search => "busca",
            Page::Register => "cadastro",
            Page::Involved => "envolvidos",
            Page::Sources => "fontes",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            Page::Home => include_str!("../templates/index.html"),
            Page::Search => include_str!("../templates/busca.html"),
            Page::Register => include_str!("../templates/cadastro.html"),
            Page::Involved => include_str!("../templates/envolvidos.html"),
            Page::Sources => include_str!("../templates/fontes.html"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Templates {
    override_dir: Option<PathBuf>,
}

impl Templates {
    /// Only the compiled-in templates
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_override_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            override_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Render `page` to HTML
    ///
    /// A missing override file falls back to the built-in template; any
    /// other read failure is an error.
    pub async fn render(&self, page: Page) -> ApiResult<String> {
        let source = match self.read_override(page).await? {
            Some(text) => text,
            None => page.builtin().to_string(),
        };
        Ok(source.replace(VERSION_PLACEHOLDER, env!("CARGO_PKG_VERSION")))
    }

    async fn read_override(&self, page: Page) -> ApiResult<Option<String>> {
        let Some(dir) = &self.override_dir else {
            return Ok(None);
        };
        let path = dir.join(format!("{}.html", page.template_name()));

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                debug!("Rendering {} from {}", page.template_name(), path.display());
                Ok(Some(text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Internal(format!(
                "Template {} unreadable: {}",
                path.display(),
                e
            ))),
        }
    }
}
