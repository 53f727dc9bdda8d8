// Path helpers
//
// Posix-style string paths. Programs are addressed by normalized absolute paths
// such as `/app/app.module.ts`, independent of the host platform.

pub fn dirname(file: &str) -> String {
    match file.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => file[..idx].to_string(),
        None => ".".to_string(),
    }
}

pub fn basename(file: &str) -> &str {
    file.rsplit('/').next().unwrap_or(file)
}

/// Join `path` onto `base` and normalize the result.
pub fn join(base: &str, path: &str) -> String {
    if is_rooted(path) {
        return normalize(path);
    }
    normalize(&format!("{}/{}", base, path))
}

/// Collapse `.`, `..` and duplicate separators.
pub fn normalize(path: &str) -> String {
    let rooted = is_rooted(path);
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().map_or(false, |last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

pub fn is_rooted(path: &str) -> bool {
    path.starts_with('/')
}

pub fn is_local_relative_path(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

pub fn is_declaration_file(path: &str) -> bool {
    path.ends_with(".d.ts")
}

/// `./svc.js` and `./svc.mjs` name the output of `./svc.ts`.
pub fn strip_js_extension(specifier: &str) -> &str {
    specifier
        .strip_suffix(".js")
        .or_else(|| specifier.strip_suffix(".mjs"))
        .unwrap_or(specifier)
}
