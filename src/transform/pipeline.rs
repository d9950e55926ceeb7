// src/transform/pipeline.rs

//! Production transform backend.
//!
//! Each asset class is converted by a single function performing an
//! internally ordered sequence of sub-steps; any sub-step error
//! short-circuits and becomes the task diagnostic. The style and script
//! transforms emit one deterministic artifact each (`css/app.css`,
//! `js/app.js`); compilation here is concatenation plus naive minification,
//! with the compatibility targets recorded in the development header.

use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use globset::{Glob, GlobSetBuilder};
use tracing::debug;

use crate::config::Settings;
use crate::graph::task::TaskAction;
use crate::reload::client_script;
use crate::transform::{ScheduledTask, TransformBackend};
use crate::types::{AssetClass, Mode};

/// File-producing backend bound to one project root and settings value.
///
/// Cheap to clone; every scheduled task runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct AssetPipeline {
    root: PathBuf,
    settings: Arc<Settings>,
    /// WebSocket port of the live reload channel, if serving. When set, the
    /// reload client script is injected into rendered pages.
    reload_port: Option<u16>,
}

impl TransformBackend for AssetPipeline {
    fn run_task(
        &self,
        task: ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let pipeline = self.clone();
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || pipeline.execute(&task)).await {
                Ok(result) => result,
                Err(join) => Err(anyhow::anyhow!("transform panicked: {join}")),
            }
        })
    }

    fn discard_artifacts(
        &self,
        class: AssetClass,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let path = self.artifact_path(class);
        Box::pin(async move {
            let Some(path) = path else { return Ok(()) };
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "removed stale artifact");
                    Ok(())
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => {
                    Err(e).with_context(|| format!("removing stale artifact {}", path.display()))
                }
            }
        })
    }
}

impl AssetPipeline {
    pub fn new(root: impl Into<PathBuf>, settings: Arc<Settings>, reload_port: Option<u16>) -> Self {
        Self {
            root: root.into(),
            settings,
            reload_port,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.settings.paths.output)
    }

    /// The single-file artifact for a class, if it has one.
    pub fn artifact_path(&self, class: AssetClass) -> Option<PathBuf> {
        let rel = match class {
            AssetClass::Style => "css/app.css",
            AssetClass::Script => "js/app.js",
            AssetClass::Static | AssetClass::Template => return None,
        };
        Some(self.output_dir().join(rel))
    }

    fn execute(&self, task: &ScheduledTask) -> Result<()> {
        match task.action {
            TaskAction::CleanOutput => self.clean(),
            TaskAction::Transform(AssetClass::Static) => self.copy_static(),
            TaskAction::Transform(AssetClass::Template) => self.render_templates(),
            TaskAction::Transform(class) => self.bundle(class, task.mode),
        }
    }

    /// Delete and recreate the output tree.
    fn clean(&self) -> Result<()> {
        let output = self.output_dir();
        match fs::remove_dir_all(&output) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("removing output tree {}", output.display()));
            }
        }
        fs::create_dir_all(&output)
            .with_context(|| format!("creating output tree {}", output.display()))
    }

    /// Copy static files into `{output}/assets/...`, preserving their path
    /// relative to the glob base.
    fn copy_static(&self) -> Result<()> {
        let dest_root = self.output_dir().join("assets");

        for pattern in &self.settings.paths.assets {
            let base = glob_base(pattern);
            for (abs, rel) in self.collect_matching(pattern)? {
                let dest = dest_root.join(strip_base(&rel, &base));
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                fs::copy(&abs, &dest)
                    .with_context(|| format!("copying {} to {}", rel, dest.display()))?;
                debug!(source = %rel, dest = %dest.display(), "copied static file");
            }
        }

        Ok(())
    }

    /// Render each page template into the output root. When serving, the
    /// live reload client script is injected before `</body>`.
    fn render_templates(&self) -> Result<()> {
        let output = self.output_dir();

        for pattern in &self.settings.paths.templates {
            let base = glob_base(pattern);
            for (abs, rel) in self.collect_matching(pattern)? {
                let mut page = fs::read_to_string(&abs)
                    .with_context(|| format!("reading template {rel}"))?;

                if let Some(port) = self.reload_port {
                    page = inject_reload_client(&page, port);
                }

                let dest = output.join(strip_base(&rel, &base));
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                fs::write(&dest, page)
                    .with_context(|| format!("writing page {}", dest.display()))?;
                debug!(source = %rel, dest = %dest.display(), "rendered page");
            }
        }

        Ok(())
    }

    /// Concatenate every matching source into the class artifact.
    fn bundle(&self, class: AssetClass, mode: Mode) -> Result<()> {
        let patterns = self.settings.paths.patterns_for(class);

        let mut sources = Vec::new();
        for pattern in &patterns {
            sources.extend(self.collect_matching(pattern)?);
        }
        sources.sort();
        sources.dedup();

        let mut bundle = String::new();
        if mode == Mode::Development {
            bundle.push_str(&format!(
                "/* targets: {} */\n",
                self.settings.compatibility.join(", ")
            ));
        }
        for (abs, rel) in &sources {
            let contents = fs::read_to_string(abs)
                .with_context(|| format!("reading {} source {rel}", class))?;
            match mode {
                Mode::Development => bundle.push_str(&contents),
                Mode::Production => bundle.push_str(&minify_naive(&contents)),
            }
            if !bundle.ends_with('\n') {
                bundle.push('\n');
            }
        }

        let artifact = self
            .artifact_path(class)
            .ok_or_else(|| anyhow::anyhow!("asset class {class} has no artifact"))?;
        if let Some(parent) = artifact.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&artifact, bundle)
            .with_context(|| format!("writing artifact {}", artifact.display()))?;

        debug!(
            artifact = %artifact.display(),
            inputs = sources.len(),
            "wrote {class} bundle"
        );
        Ok(())
    }

    /// All files under the project root matching `pattern`, as
    /// `(absolute, root-relative)` pairs in sorted order. The output tree
    /// and dot-directories are never descended into.
    fn collect_matching(&self, pattern: &str) -> Result<Vec<(PathBuf, String)>> {
        let glob = Glob::new(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        let set = {
            let mut builder = GlobSetBuilder::new();
            builder.add(glob);
            builder.build()?
        };

        let output = self.output_dir();
        let mut files = Vec::new();
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            let entries = fs::read_dir(&dir)
                .with_context(|| format!("reading directory {}", dir.display()))?;
            for entry in entries {
                let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
                let path = entry.path();
                let hidden = path
                    .file_name()
                    .map(|n| n.to_string_lossy().starts_with('.'))
                    .unwrap_or(false);
                if path == output || hidden {
                    continue;
                }
                if path.is_dir() {
                    stack.push(path);
                } else if let Ok(rel) = path.strip_prefix(&self.root) {
                    let rel = rel.to_string_lossy().replace('\\', "/");
                    if set.is_match(&rel) {
                        files.push((path, rel));
                    }
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Literal directory prefix of a glob pattern, e.g.
/// `src/styles/**/*.scss` -> `src/styles`.
fn glob_base(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();
    for part in pattern.split('/') {
        if part.contains(['*', '?', '[', '{']) {
            break;
        }
        base.push(part);
    }
    // A pattern with no meta characters names a single file; its base is the
    // containing directory.
    if base.as_os_str() == Path::new(pattern).as_os_str() {
        base.pop();
    }
    base
}

fn strip_base(rel: &str, base: &Path) -> PathBuf {
    Path::new(rel)
        .strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| PathBuf::from(rel))
}

/// Drop blank lines, line comments and leading indentation.
fn minify_naive(source: &str) -> String {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insert the reload client before the closing body tag, or append it when
/// the template has none.
fn inject_reload_client(page: &str, port: u16) -> String {
    let snippet = format!("<script>{}</script>\n", client_script(port));
    match page.rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(page.len() + snippet.len());
            out.push_str(&page[..idx]);
            out.push_str(&snippet);
            out.push_str(&page[idx..]);
            out
        }
        None => format!("{page}\n{snippet}"),
    }
}
