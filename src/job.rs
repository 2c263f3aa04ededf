//! Export job resolution
//!
//! [`JobRequest`] carries what the user asked for; [`ExportJob::resolve`]
//! checks it against the filesystem and produces the immutable job the
//! pipeline runs.

use crate::variant::{Variant, VariantDefaults, VariantSpec};
use crate::{Error, Result};
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Selector used when none is given: the conventional page container.
pub const DEFAULT_SELECTOR: &str = "#page";

/// Selector value that means "capture the whole viewport".
pub const VIEWPORT_SENTINEL: &str = "viewport";

/// Output directory (relative to the working directory) used when none is given.
pub const DEFAULT_OUT_DIR: &str = "exports";

/// What part of the page ends up in the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureRegion {
    /// The whole configured viewport
    Viewport,
    /// The bounding box of the element matched by a CSS selector
    Selector(String),
}

impl CaptureRegion {
    /// Interpret a selector argument; the `viewport` sentinel maps to [`CaptureRegion::Viewport`].
    pub fn from_selector(selector: &str) -> Self {
        if selector == VIEWPORT_SENTINEL {
            CaptureRegion::Viewport
        } else {
            CaptureRegion::Selector(selector.to_string())
        }
    }
}

impl Default for CaptureRegion {
    fn default() -> Self {
        CaptureRegion::Selector(DEFAULT_SELECTOR.to_string())
    }
}

/// Unresolved export request, as collected from the command line or built in code
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub source: PathBuf,
    pub region: CaptureRegion,
    pub out_dir: Option<PathBuf>,
    pub slug: Option<String>,
    pub defaults: VariantDefaults,
    /// Explicit variants; empty means the built-in set
    pub variants: Vec<VariantSpec>,
}

impl JobRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            region: CaptureRegion::default(),
            out_dir: None,
            slug: None,
            defaults: VariantDefaults::default(),
            variants: Vec::new(),
        }
    }
}

/// A resolved export job. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Absolute path of the HTML document
    pub source_document: PathBuf,
    pub capture_region: CaptureRegion,
    /// Absolute path of the directory images are written to
    pub output_directory: PathBuf,
    /// Filename stem shared by every output
    pub base_name: String,
    /// Capture order; never empty
    pub variants: Vec<Variant>,
}

impl ExportJob {
    /// Resolve `request` relative to `cwd`.
    ///
    /// Fails if the source document is missing or two variants share a name.
    /// Nothing is created on disk.
    pub fn resolve(request: JobRequest, cwd: &Path) -> Result<Self> {
        let source_document = absolutize(&request.source, cwd);
        if !source_document.is_file() {
            return Err(Error::SourceNotFound(source_document));
        }

        let output_directory = match &request.out_dir {
            Some(dir) => absolutize(dir, cwd),
            None => cwd.join(DEFAULT_OUT_DIR),
        };

        let base_name = match request.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => source_document
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        let specs = if request.variants.is_empty() {
            VariantSpec::builtin_set()
        } else {
            request.variants
        };
        let variants = resolve_variants(&specs, &request.defaults)?;

        debug!(
            "resolved job: {} -> {} ({} variants)",
            source_document.display(),
            output_directory.display(),
            variants.len()
        );

        Ok(Self {
            source_document,
            capture_region: request.region,
            output_directory,
            base_name,
            variants,
        })
    }

    /// Absolute output path for the variant at `index`. Index 0 is the primary output.
    pub fn output_path(&self, index: usize) -> PathBuf {
        let variant = &self.variants[index];
        self.output_directory
            .join(variant.file_name(&self.base_name, index == 0))
    }

    /// Create the output directory and its parents.
    pub fn prepare_output_directory(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_directory)
            .map_err(|e| Error::io(&self.output_directory, e))
    }
}

/// Resolve specs in order, rejecting duplicate names.
pub fn resolve_variants(specs: &[VariantSpec], defaults: &VariantDefaults) -> Result<Vec<Variant>> {
    let mut seen = HashSet::new();
    specs
        .iter()
        .map(|spec| {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::DuplicateVariant(spec.name.clone()));
            }
            Ok(spec.resolve(defaults))
        })
        .collect()
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Encoding;

    fn source_in(dir: &Path) -> PathBuf {
        let path = dir.join("poster.html");
        std::fs::write(&path, "<div id=page>hi</div>").unwrap();
        path
    }

    #[test]
    fn defaults_resolve_against_cwd() {
        let dir = tempfile::tempdir().unwrap();
        source_in(dir.path());

        let job = ExportJob::resolve(JobRequest::new("poster.html"), dir.path()).unwrap();
        assert_eq!(job.source_document, dir.path().join("poster.html"));
        assert_eq!(job.output_directory, dir.path().join("exports"));
        assert_eq!(job.base_name, "poster");
        assert_eq!(job.capture_region, CaptureRegion::Selector("#page".into()));
        assert_eq!(job.variants.len(), 3);
        assert!(job.variants.iter().all(|v| v.encoding == Encoding::Jpeg));
        assert_eq!(job.variants[2].device_scale_factor, 2.5);
    }

    #[test]
    fn missing_source_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExportJob::resolve(JobRequest::new("missing.html"), dir.path()).unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
        assert!(!dir.path().join("exports").exists());
    }

    #[test]
    fn explicit_variants_replace_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path());
        let mut request = JobRequest::new(&source);
        request.variants = vec!["b:100x50".parse().unwrap(), "a:200x100@9".parse().unwrap()];
        request.slug = Some("deck".into());

        let job = ExportJob::resolve(request, Path::new("/unused")).unwrap();
        let names: Vec<_> = job.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(job.variants[0].device_scale_factor, 2.0);
        assert_eq!(job.variants[1].device_scale_factor, 8.0);
        assert_eq!(job.output_path(0), Path::new("/unused/exports/deck.jpg"));
        assert_eq!(job.output_path(1), Path::new("/unused/exports/deck_a.jpg"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = JobRequest::new(source_in(dir.path()));
        request.variants = vec!["a:1x1".parse().unwrap(), "a:2x2".parse().unwrap()];
        assert!(matches!(
            ExportJob::resolve(request, dir.path()),
            Err(Error::DuplicateVariant(name)) if name == "a"
        ));
    }

    #[test]
    fn viewport_sentinel() {
        assert_eq!(CaptureRegion::from_selector("viewport"), CaptureRegion::Viewport);
        assert_eq!(
            CaptureRegion::from_selector(".max-w-6xl"),
            CaptureRegion::Selector(".max-w-6xl".into())
        );
    }
}
