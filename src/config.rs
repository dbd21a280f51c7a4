//! Loads the [`Config`] for a site, either from a `quire.yaml` project file or
//! from the default directory layout.

use crate::util::read;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The name of the optional project file.
pub const PROJECT_FILE: &str = "quire.yaml";

#[derive(Deserialize, Default)]
#[serde(default)]
struct Project {
    base_url: String,
    content_directory: Option<PathBuf>,
    templates_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
}

pub struct Config {
    /// The site-wide URL prefix threaded into every post and template.
    pub base_url: String,

    /// The directory holding the post source files.
    pub content_directory: PathBuf,

    pub layout_template: PathBuf,
    pub post_template: PathBuf,
    pub index_template: PathBuf,
    pub tag_template: PathBuf,

    /// The directory into which documents are written.
    pub output_directory: PathBuf,
}

impl Config {
    /// Looks for a [`PROJECT_FILE`] in `dir` and its ancestors. The search
    /// starts from the canonical form of `dir`, so a relative path like `.`
    /// still reaches the real parent directories. If there isn't one, the
    /// default layout rooted at `dir` is used: `content/posts`, `templates`,
    /// and `output`.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        // A directory that doesn't exist yet has no project file of its own.
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_owned());
        for ancestor in start.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path)
                    .map_err(|e| anyhow!("Loading configuration: {:?}", e));
            }
        }
        Ok(Config::from_project(dir, Project::default()))
    }

    /// Loads the configuration from a project file. Relative paths in the
    /// file are resolved against the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = match read(path, "project")? {
            contents if contents.trim().is_empty() => Project::default(),
            contents => serde_yaml::from_str(&contents)?,
        };
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::from_project(project_root, project)),
        }
    }

    /// Overrides the base URL, if `base_url` is given.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Config {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        self
    }

    fn from_project(root: &Path, project: Project) -> Config {
        let resolve = |dir: Option<PathBuf>, default: &str| {
            root.join(dir.unwrap_or_else(|| PathBuf::from(default)))
        };
        let templates_directory = resolve(project.templates_directory, "templates");
        Config {
            base_url: project.base_url,
            content_directory: resolve(project.content_directory, "content/posts"),
            layout_template: templates_directory.join("layout.html"),
            post_template: templates_directory.join("post.html"),
            index_template: templates_directory.join("index.html"),
            tag_template: templates_directory.join("tag.html"),
            output_directory: resolve(project.output_directory, "output"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!("", config.base_url);
        assert_eq!(dir.path().join("content/posts"), config.content_directory);
        assert_eq!(dir.path().join("templates/tag.html"), config.tag_template);
        assert_eq!(dir.path().join("output"), config.output_directory);
        Ok(())
    }

    #[test]
    fn test_project_file_in_ancestor() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join(PROJECT_FILE),
            "base_url: https://example.org\noutput_directory: public\n",
        )?;
        let nested = dir.path().join("content/posts");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        let root = dir.path().canonicalize()?;
        assert_eq!("https://example.org", config.base_url);
        assert_eq!(root.join("public"), config.output_directory);
        assert_eq!(root.join("content/posts"), config.content_directory);
        Ok(())
    }

    #[test]
    fn test_project_file_above_relative_directory() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(PROJECT_FILE), "base_url: https://example.org\n")?;
        let nested = dir.path().join("drafts");
        fs::create_dir_all(&nested)?;

        // Only this test changes the working directory; every other test
        // works with absolute paths.
        let cwd = std::env::current_dir()?;
        std::env::set_current_dir(&nested)?;
        let config = Config::from_directory(Path::new("."));
        std::env::set_current_dir(cwd)?;

        let config = config?;
        assert_eq!("https://example.org", config.base_url);
        assert_eq!(dir.path().canonicalize()?.join("output"), config.output_directory);
        Ok(())
    }

    #[test]
    fn test_missing_directory_uses_default_layout() -> Result<()> {
        let dir = TempDir::new()?;
        let missing = dir.path().join("not-yet");
        let config = Config::from_directory(&missing)?;
        assert_eq!(missing.join("output"), config.output_directory);
        Ok(())
    }

    #[test]
    fn test_invalid_project_file() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(PROJECT_FILE), "base_url: [")?;
        assert!(Config::from_directory(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_with_base_url() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!("/blog", config.with_base_url(Some("/blog".to_owned())).base_url);
        let config = Config::from_directory(dir.path())?;
        assert_eq!("", config.with_base_url(None).base_url);
        Ok(())
    }
}
