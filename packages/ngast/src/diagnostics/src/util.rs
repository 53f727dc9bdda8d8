use super::error_code::ErrorCode;
use once_cell::sync::Lazy;
use regex::Regex;
use ts::Diagnostic;

static ERROR_CODE_MATCHER: Lazy<Regex> = Lazy::new(|| Regex::new(r"TS-99(\d+)").unwrap());

/// The numeric code of each diagnostic is printed with the hard-coded "TS" prefix. Angular's own
/// codes all start with "-99", so "TS-99" can be rewritten to the "NG" prefix.
pub fn replace_ts_with_ng_in_errors(errors: &str) -> String {
    ERROR_CODE_MATCHER.replace_all(errors, "NG${1}").to_string()
}

/// `-99` followed by the decimal code, e.g. `1001` becomes `-991001`.
pub fn ng_error_code(code: ErrorCode) -> i32 {
    let digits = code as i32;
    let mut scale = 1;
    while scale <= digits {
        scale *= 10;
    }
    -(99 * scale + digits)
}

/// One diagnostic per line, with Angular codes shown as `NGxxxx`.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let formatted = diagnostics
        .iter()
        .map(|diagnostic| diagnostic.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    replace_ts_with_ng_in_errors(&formatted)
}
