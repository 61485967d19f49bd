use ignore::{
    WalkBuilder,
    overrides::{Override, OverrideBuilder},
};
use log::{debug, trace, warn};
use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use crate::{
    config::ResourceConfig,
    error::{ResourceError, Result},
};

/// Longest first line inspected when looking for a `#!` interpreter line
const SHEBANG_LIMIT: u64 = 256;

/// Expand `inputs` into the source files to process, with the default config
/// and no exclusions.
pub fn collect_files<P: AsRef<Path>>(inputs: &[P], recursive: bool) -> Result<Vec<PathBuf>> {
    collect_files_with(inputs, recursive, &[] as &[&str], &ResourceConfig::default())
}

/// Same as [`collect_files`], dropping anything matched by the gitignore-style
/// `exclude` globs.
pub fn collect_files_excluding<P: AsRef<Path>, S: AsRef<str>>(
    inputs: &[P],
    recursive: bool,
    exclude: &[S],
) -> Result<Vec<PathBuf>> {
    collect_files_with(inputs, recursive, exclude, &ResourceConfig::default())
}

/// Expand `inputs` into a duplicate-free list of canonical file paths.
///
/// Explicit files are kept whatever their extension. Directories contribute
/// their source files: direct children only, or the whole subtree when
/// `recursive` is set. Exclude globs are matched relative to the input they
/// were reached through. A missing input is an error.
pub fn collect_files_with<P: AsRef<Path>, S: AsRef<str>>(
    inputs: &[P],
    recursive: bool,
    exclude: &[S],
    cfg: &ResourceConfig,
) -> Result<Vec<PathBuf>> {
    debug!("Collecting files from {} inputs (recursive: {})", inputs.len(), recursive);
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files: Vec<PathBuf> = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let meta = fs::metadata(input).map_err(|e| ResourceError::explicit(input, e))?;
        let canonical = fs::canonicalize(input).map_err(|e| ResourceError::explicit(input, e))?;

        if meta.is_file() {
            let base = canonical.parent().unwrap_or(&canonical);
            if build_excludes(base, exclude)?.matched(&canonical, false).is_ignore() {
                trace!("Excluded explicit file: {}", canonical.display());
                continue;
            }
            trace!("Found explicit file: {}", canonical.display());
            if seen.insert(canonical.clone()) {
                files.push(canonical);
            }
        } else if meta.is_dir() {
            let excludes = build_excludes(&canonical, exclude)?;
            for file in expand_dir(&canonical, recursive, excludes, cfg)? {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        } else {
            warn!("Skipping {}: not a regular file or directory", input.display());
        }
    }

    debug!("Collected {} files", files.len());
    Ok(files)
}

fn build_excludes<S: AsRef<str>>(root: &Path, exclude: &[S]) -> Result<Override> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in exclude {
        let pattern = pattern.as_ref();
        // In override globs a leading '!' means "ignore"
        builder.add(&format!("!{}", pattern)).map_err(|e| ResourceError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
    }
    builder.build().map_err(|e| ResourceError::InvalidPattern {
        pattern: exclude.iter().map(|p| p.as_ref()).collect::<Vec<_>>().join(", "),
        message: e.to_string(),
    })
}

fn expand_dir(
    dir: &Path,
    recursive: bool,
    excludes: Override,
    cfg: &ResourceConfig,
) -> Result<Vec<PathBuf>> {
    debug!("Walking directory: {} (recursive: {})", dir.display(), recursive);
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(if recursive { None } else { Some(1) })
        .overrides(excludes)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for res in walker {
        let dent = res.map_err(|e| walk_error(dir, e))?;
        if dent.depth() == 0 {
            continue;
        }
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let p = dent.path();
        if !is_source_file(p, cfg) {
            trace!("Skipping non-source file: {}", p.display());
            continue;
        }
        let canonical = fs::canonicalize(p).map_err(|e| ResourceError::access(p, e))?;
        trace!("Found source file: {}", canonical.display());
        files.push(canonical);
    }
    Ok(files)
}

fn walk_error(dir: &Path, err: ignore::Error) -> ResourceError {
    let kind = err.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
    ResourceError::access(dir, io::Error::new(kind, err.to_string()))
}

fn is_source_file(path: &Path, cfg: &ResourceConfig) -> bool {
    let wanted = cfg.extension.trim_start_matches('.');
    if path.extension().and_then(|e| e.to_str()) == Some(wanted) {
        return true;
    }
    match &cfg.interpreter {
        Some(interpreter) => has_interpreter_line(path, interpreter),
        None => false,
    }
}

fn has_interpreter_line(path: &Path, interpreter: &str) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("Could not open {} to check for a #! line: {}", path.display(), e);
            return false;
        }
    };
    let mut first = Vec::new();
    if let Err(e) = BufReader::new(file).take(SHEBANG_LIMIT).read_until(b'\n', &mut first) {
        debug!("Could not read {} to check for a #! line: {}", path.display(), e);
        return false;
    }
    let line = String::from_utf8_lossy(&first);
    line.strip_prefix("#!").is_some_and(|rest| names_interpreter(rest, interpreter))
}

/// Whether a `#!` line runs `interpreter`, directly (`/usr/bin/python3`) or
/// through `env` (`/usr/bin/env -S python3.11 -u`). A version suffix made of
/// digits and dots is allowed; any other suffix is a different program.
fn names_interpreter(rest: &str, interpreter: &str) -> bool {
    let mut words = rest.split_whitespace();
    let Some(program) = words.next().map(program_name) else {
        return false;
    };
    let program = if program == "env" {
        match words.find(|w| !w.starts_with('-') && !w.contains('=')) {
            Some(w) => program_name(w),
            None => return false,
        }
    } else {
        program
    };
    program
        .strip_prefix(interpreter)
        .is_some_and(|version| version.chars().all(|c| c.is_ascii_digit() || c == '.'))
}

fn program_name(word: &str) -> &str {
    word.rsplit('/').next().unwrap_or(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn canonical_tempdir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        (temp_dir, root)
    }

    fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.sort();
        paths
    }

    #[test]
    fn test_nonrecursive_find_in_dir() {
        let (_guard, root) = canonical_tempdir();
        let file1 = create_test_file(&root, "test1/testfile1.py", "");
        create_test_file(&root, "test1/foo/testfile2.py", "");

        let files = collect_files(&[root.join("test1")], false).unwrap();
        assert_eq!(files, vec![file1]);
    }

    #[test]
    fn test_recursive_find_in_dir() {
        let (_guard, root) = canonical_tempdir();
        let files = vec![
            create_test_file(&root, "test1/testfile1.py", ""),
            create_test_file(&root, "test2/testinner/testfile2.py", ""),
            create_test_file(&root, "test3/foo/bar/bas/kkk/testfile3.py", ""),
        ];

        let found = collect_files(&[&root], true).unwrap();
        assert_eq!(sorted(found), sorted(files));
    }

    #[test]
    fn test_directory_expansion_filters_by_extension() {
        let (_guard, root) = canonical_tempdir();
        let source = create_test_file(&root, "keep.py", "");
        create_test_file(&root, "notes.txt", "");
        create_test_file(&root, "data.pyc", "");

        assert_eq!(collect_files(&[&root], true).unwrap(), vec![source]);
    }

    #[test]
    fn test_explicit_file_kept_regardless_of_extension() {
        let (_guard, root) = canonical_tempdir();
        let notes = create_test_file(&root, "notes.txt", "");

        assert_eq!(collect_files(&[&notes], false).unwrap(), vec![notes]);
    }

    #[test]
    fn test_duplicates_removed() {
        let (_guard, root) = canonical_tempdir();
        let file = create_test_file(&root, "pkg/mod.py", "");
        let dotted = root.join("pkg").join(".").join("mod.py");

        let inputs = vec![root.join("pkg"), file.clone(), dotted, root.clone()];
        assert_eq!(collect_files(&inputs, true).unwrap(), vec![file]);
    }

    #[test]
    fn test_hidden_and_gitignored_files_are_collected() {
        let (_guard, root) = canonical_tempdir();
        create_test_file(&root, ".gitignore", "ignored.py\n");
        let expected = vec![
            create_test_file(&root, ".hidden/a.py", ""),
            create_test_file(&root, "ignored.py", ""),
        ];

        assert_eq!(sorted(collect_files(&[&root], true).unwrap()), sorted(expected));
    }

    #[test]
    fn test_missing_input_is_error() {
        let (_guard, root) = canonical_tempdir();
        let missing = root.join("nope.py");

        let err = collect_files(&[&missing], false).unwrap_err();
        assert!(matches!(err, ResourceError::PathNotFound { path } if path == missing));
    }

    #[test]
    fn test_shebang_script_collected() {
        let (_guard, root) = canonical_tempdir();
        let script = create_test_file(&root, "bin/tool", "#!/usr/bin/env python3\nprint(1)\n");
        create_test_file(&root, "bin/other", "#!/bin/sh\necho 1\n");
        create_test_file(&root, "bin/README", "plain text\n");

        assert_eq!(collect_files(&[&root], true).unwrap(), vec![script]);
    }

    #[test]
    fn test_shebang_script_with_other_extension_collected() {
        let (_guard, root) = canonical_tempdir();
        let cgi = create_test_file(&root, "www/tool.cgi", "#!/usr/bin/env python3\nprint(1)\n");
        create_test_file(&root, "www/page.html", "<html></html>\n");

        assert_eq!(collect_files(&[&root], true).unwrap(), vec![cgi]);
    }

    #[test]
    fn test_shebang_must_name_interpreter_exactly() {
        let (_guard, root) = canonical_tempdir();
        create_test_file(&root, "run", "#!/usr/bin/env pythonista-runner\n");
        create_test_file(&root, "wrap", "#!/opt/mypython/bin/bash\n");
        create_test_file(&root, "note", "# see #!/usr/bin/python\n");

        assert!(collect_files(&[&root], true).unwrap().is_empty());
    }

    #[test]
    fn test_names_interpreter() {
        assert!(names_interpreter("/usr/bin/python", "python"));
        assert!(names_interpreter("/usr/bin/python3.11 -u", "python"));
        assert!(names_interpreter(" /usr/bin/env -S PYTHONPATH=. python2", "python"));
        assert!(!names_interpreter("/usr/bin/env", "python"));
        assert!(!names_interpreter("/usr/bin/env pythonista", "python"));
        assert!(!names_interpreter("/usr/bin/python3-config", "python"));
        assert!(!names_interpreter("", "python"));
    }

    #[test]
    fn test_shebang_detection_can_be_disabled() {
        let (_guard, root) = canonical_tempdir();
        create_test_file(&root, "tool", "#!/usr/bin/env python\n");
        let cfg = ResourceConfig { interpreter: None, ..Default::default() };

        let files = collect_files_with(&[&root], true, &[] as &[&str], &cfg).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_custom_extension() {
        let (_guard, root) = canonical_tempdir();
        let pyi = create_test_file(&root, "stubs/mod.pyi", "");
        create_test_file(&root, "stubs/mod.py", "");
        let cfg = ResourceConfig { extension: ".pyi".to_string(), ..Default::default() };

        let files = collect_files_with(&[&root], true, &[] as &[&str], &cfg).unwrap();
        assert_eq!(files, vec![pyi]);
    }

    #[test]
    fn test_exclude_prunes_directories_and_files() {
        let (_guard, root) = canonical_tempdir();
        let kept = create_test_file(&root, "src/app.py", "");
        create_test_file(&root, "src/app_test.py", "");
        create_test_file(&root, "build/gen.py", "");

        let files = collect_files_excluding(&[&root], true, &["build/", "*_test.py"]).unwrap();
        assert_eq!(files, vec![kept]);
    }

    #[test]
    fn test_exclude_applies_to_explicit_files() {
        let (_guard, root) = canonical_tempdir();
        let skipped = create_test_file(&root, "gen_pb2.py", "");
        let kept = create_test_file(&root, "main.py", "");

        let files = collect_files_excluding(&[&skipped, &kept], false, &["*_pb2.py"]).unwrap();
        assert_eq!(files, vec![kept]);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let (_guard, root) = canonical_tempdir();
        create_test_file(&root, "a.py", "");

        let err = collect_files_excluding(&[&root], true, &["src/[a-"]).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidPattern { .. }));
    }

    #[test]
    fn test_result_contains_no_directories() {
        let (_guard, root) = canonical_tempdir();
        fs::create_dir_all(root.join("looks_like.py")).unwrap();
        let file = create_test_file(&root, "looks_like.py/inner.py", "");

        assert_eq!(collect_files(&[&root], true).unwrap(), vec![file]);
    }
}
