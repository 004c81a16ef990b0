//! Site configuration for the lecture pipeline.
//!
//! Values merge in three layers: compiled defaults, an optional TOML file,
//! and `LECTERN_*` environment variables.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use lectern_colorize::{Colorizer, KeywordSet, RenderCapabilities};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const CONFIG_FILE: &str = "config.toml";

/// The course's lecture directory names, in course order. The `gui` pair
/// has Swing-toolkit variants selected by [`GuiVariant`].
const DEFAULT_LECTURES: &[&str] = &[
    "intro",
    "objects",
    "pitfalls",
    "java_rep",
    "encapsulation",
    "subtyping",
    "intf_design",
    "inheritance",
    "exceptions",
    "mod_design",
    "recursion_lists",
    "generics",
    "complexity",
    "trees",
    "hashtables",
    "loopinv",
    "sorting",
    "parsing",
    "patterns",
    "gui",
    "guievents",
    "uidesign",
    "concurrency",
    "synchronization",
    "graphs",
    "traversals",
    "ssp",
    "heaps",
    "avl",
    "jvm",
    "undecidability",
];

/// Which GUI-toolkit variant of the `gui`/`guievents` lectures to serve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuiVariant {
    #[default]
    Standard,
    Swing,
}

/// Everything the pipeline needs to know about the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL the shell page is served from, without a trailing slash.
    pub base_url: String,
    /// Lecture directory names, in course order.
    pub lectures: Vec<String>,
    /// GUI lecture variant.
    pub gui: GuiVariant,
    /// What the target page can render; passed into the colorizer.
    pub capabilities: RenderCapabilities,
    /// Extra words colored as keywords on top of the default set.
    pub extra_keywords: Vec<String>,
}
impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            lectures: DEFAULT_LECTURES.iter().map(|l| l.to_string()).collect(),
            gui: GuiVariant::default(),
            capabilities: RenderCapabilities::default(),
            extra_keywords: Vec::new(),
        }
    }
}
impl SiteConfig {
    /// Load from the default per-user config file (if any) and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load with an explicit config file path taking the place of the
    /// default one. A missing file contributes nothing.
    #[instrument]
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("LECTERN_")).extract().or_raise(|| ErrorKind::Load)
    }

    /// The per-user default config file location.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lectern").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// The lecture list with the GUI variant applied.
    pub fn lectures(&self) -> Vec<String> {
        self.lectures
            .iter()
            .map(|lecture| match (lecture.as_str(), self.gui) {
                ("gui" | "guievents", GuiVariant::Swing) => format!("{lecture}_swing"),
                _ => lecture.clone(),
            })
            .collect()
    }

    /// The configured keyword set: defaults plus `extra_keywords`.
    pub fn keyword_set(&self) -> KeywordSet {
        let mut keywords = KeywordSet::default();
        for word in &self.extra_keywords {
            keywords.insert(word);
        }
        keywords
    }

    /// A colorizer configured from this site's keywords and capabilities.
    pub fn colorizer(&self) -> Colorizer {
        Colorizer::new(self.keyword_set(), self.capabilities)
    }
}
