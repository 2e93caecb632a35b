//! Main entry point
//!
//! Resolves the files of a run, compiles them in parallel and writes the
//! results to the output directory or stdout.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::config::NgxcConfig;
use crate::error::TransformError;
use crate::ngtsc::core::{compile_file_with_options, emit_definitions, CompileOptions};
use crate::ngtsc::transform::SynthesisStrategy;

/// Command line overrides applied on top of the project configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub files: Vec<PathBuf>,
    pub project: PathBuf,
    pub strategy: Option<SynthesisStrategy>,
    pub out_dir: Option<PathBuf>,
    /// Print compiled definitions instead of transformed files.
    pub emit_ir: bool,
}

#[derive(Debug)]
pub struct FileOutput {
    pub path: PathBuf,
    pub result: Result<String, TransformError>,
}

/// Runs one compilation and returns the process exit code.
pub fn main(run: RunOptions) -> anyhow::Result<i32> {
    let mut config = NgxcConfig::load_or_default(&run.project)?;
    if let Some(strategy) = run.strategy {
        config.strategy = strategy;
    }
    if let Some(out_dir) = &run.out_dir {
        config.out_dir = Some(out_dir.to_string_lossy().into_owned());
    }

    let base_dir = run.project.parent().unwrap_or_else(|| Path::new("."));
    let files = resolve_files(&config, &run.files, base_dir)?;
    if files.is_empty() {
        warn!("no input files");
        return Ok(0);
    }

    let outputs = compile_files(&files, &config.compile_options(), run.emit_ir);
    let mut failed = 0;
    for output in outputs {
        match output.result {
            Ok(code) => {
                let out_dir = config.out_dir.as_deref().map(Path::new);
                write_output(&output.path, &code, out_dir, base_dir, run.emit_ir)?
            }
            Err(err) => {
                error!(file = %output.path.display(), "{}", err);
                failed += 1;
            }
        }
    }

    info!(files = files.len(), failed, "done");
    Ok(if failed == 0 { 0 } else { 1 })
}

/// Explicit `files`, or the configuration's include globs relative to
/// `base_dir`, keeping only paths that match the file pattern.
pub fn resolve_files(config: &NgxcConfig, files: &[PathBuf], base_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let candidates = if files.is_empty() {
        let mut found = Vec::new();
        for pattern in &config.include {
            let full_pattern = base_dir.join(pattern);
            let pattern_str = full_pattern.to_string_lossy();
            let paths = glob::glob(&pattern_str).with_context(|| format!("invalid include pattern {:?}", pattern))?;
            found.extend(paths.filter_map(Result::ok).filter(|path| path.is_file()));
        }
        found.sort();
        found.dedup();
        found
    } else {
        files.to_vec()
    };

    let file_regex = config.file_regex()?;
    Ok(candidates
        .into_iter()
        .filter(|path| {
            let keep = file_regex.is_match(&path.to_string_lossy());
            if !keep {
                debug!(file = %path.display(), "skipping file outside the file pattern");
            }
            keep
        })
        .collect())
}

/// Compiles every file independently; results keep the order of `files`.
pub fn compile_files(files: &[PathBuf], options: &CompileOptions, emit_ir: bool) -> Vec<FileOutput> {
    files
        .par_iter()
        .map(|path| FileOutput {
            path: path.clone(),
            result: compile_path(path, options, emit_ir),
        })
        .collect()
}

fn compile_path(path: &Path, options: &CompileOptions, emit_ir: bool) -> Result<String, TransformError> {
    let file_name = path.to_string_lossy();
    let source_text = fs::read_to_string(path).map_err(|err| TransformError::Read {
        file: file_name.to_string(),
        message: err.to_string(),
    })?;
    if emit_ir {
        emit_definitions(&file_name, &source_text, options)
    } else {
        compile_file_with_options(&file_name, &source_text, options)
    }
}

/// Where the output for `input` is written under `out_dir`: `.tsx` becomes
/// `.ts` and the path relative to `base_dir` is kept. Root, `.` and `..`
/// components are dropped so the target never leaves `out_dir`.
pub fn output_path(out_dir: &Path, base_dir: &Path, input: &Path, emit_ir: bool) -> PathBuf {
    let relative = input.strip_prefix(base_dir).unwrap_or(input);
    let kept: PathBuf = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    let mut target = out_dir.join(kept);
    if emit_ir {
        let mut name = target.file_name().unwrap_or_default().to_os_string();
        name.push(".ir.js");
        target.set_file_name(name);
    } else if target.extension().is_some_and(|ext| ext == "tsx") {
        target.set_extension("ts");
    }
    target
}

fn write_output(input: &Path, code: &str, out_dir: Option<&Path>, base_dir: &Path, emit_ir: bool) -> anyhow::Result<()> {
    match out_dir {
        Some(out_dir) => {
            let target = output_path(out_dir, base_dir, input, emit_ir);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&target, code).with_context(|| format!("writing {}", target.display()))?;
            debug!(file = %input.display(), output = %target.display(), "wrote output");
        }
        None => println!("{}", code),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_replace_tsx_extension() {
        assert_eq!(
            output_path(Path::new("dist"), Path::new(""), Path::new("src/app/counter.component.tsx"), false),
            PathBuf::from("dist/src/app/counter.component.ts")
        );
    }

    #[test]
    fn should_keep_paths_relative_to_the_project() {
        assert_eq!(
            output_path(Path::new("dist"), Path::new("/work"), Path::new("/work/src/hello.ng.tsx"), false),
            PathBuf::from("dist/src/hello.ng.ts")
        );
    }

    #[test]
    fn should_not_merge_same_named_files_from_different_directories() {
        let base = Path::new("/work");
        let a = output_path(Path::new("dist"), base, Path::new("/work/a/x.ng.tsx"), false);
        let b = output_path(Path::new("dist"), base, Path::new("/work/b/x.ng.tsx"), false);
        assert_ne!(a, b);
        let outside = output_path(Path::new("dist"), base, Path::new("/elsewhere/x.ng.tsx"), false);
        assert_eq!(outside, PathBuf::from("dist/elsewhere/x.ng.ts"));
    }

    #[test]
    fn should_stay_inside_out_dir() {
        let target = output_path(Path::new("dist"), Path::new(""), Path::new("../../etc/x.ng.tsx"), false);
        assert_eq!(target, PathBuf::from("dist/etc/x.ng.ts"));
        assert!(target.starts_with("dist"));
    }

    #[test]
    fn should_suffix_ir_output() {
        assert_eq!(
            output_path(Path::new("out"), Path::new(""), Path::new("hello.ng.tsx"), true),
            PathBuf::from("out/hello.ng.tsx.ir.js")
        );
    }

    #[test]
    fn should_filter_explicit_files_by_pattern() {
        let config = NgxcConfig::default();
        let files = vec![PathBuf::from("a.component.tsx"), PathBuf::from("b.tsx"), PathBuf::from("c.ng.tsx")];
        let resolved = resolve_files(&config, &files, Path::new(".")).unwrap();
        assert_eq!(resolved, vec![PathBuf::from("a.component.tsx"), PathBuf::from("c.ng.tsx")]);
    }

    #[test]
    fn should_report_missing_files_per_file() {
        let outputs = compile_files(&[PathBuf::from("does/not/exist.ng.tsx")], &CompileOptions::default(), false);
        assert_eq!(outputs.len(), 1);
        assert!(matches!(outputs[0].result, Err(TransformError::Read { .. })));
    }
}
