// C entry points for embedding the analysis in another host.
// Each loaded script lives behind its own handle; nothing is process-global.
use crate::config::AnalysisConfig;
use crate::core::engine::{ScriptAnalysis, ScriptAnalyzer};
use crate::report::ReportKind;
use libc::c_char;
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::ptr;

/// One analysed script, owned by the caller until `script_analysis_close`.
pub struct ScriptHandle {
    analysis: ScriptAnalysis,
    top_n: usize,
}

// A panic inside `f` becomes None instead of unwinding into the host.
fn guarded<T>(f: impl FnOnce() -> Option<T>) -> Option<T> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        log::error!("Panic caught at the C boundary");
        None
    })
}

unsafe fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

fn into_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Loads and analyses the CSV at `path`. Returns null on any failure.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn script_analysis_open(path: *const c_char) -> *mut ScriptHandle {
    let Some(path) = read_str(path) else {
        return ptr::null_mut();
    };
    let analyzer = ScriptAnalyzer::new(AnalysisConfig::default());
    let result = catch_unwind(AssertUnwindSafe(|| analyzer.analyze_path(Path::new(path))));
    match result {
        Ok(Ok((_, analysis))) => {
            let top_n = analyzer.config().top_n;
            Box::into_raw(Box::new(ScriptHandle { analysis, top_n }))
        }
        Ok(Err(e)) => {
            log::error!("Cannot open script '{}': {}", path, e);
            ptr::null_mut()
        }
        Err(_) => {
            log::error!("Panic while opening script '{}'", path);
            ptr::null_mut()
        }
    }
}

/// Releases a handle from `script_analysis_open`. Null is ignored.
///
/// # Safety
/// `handle` must come from `script_analysis_open` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn script_analysis_close(handle: *mut ScriptHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// A report as JSON, or null for an unknown kind. `"top"` uses the handle's row limit.
/// Free the result with `script_analysis_free_string`.
///
/// # Safety
/// `handle` must be a live handle and `kind` a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn script_analysis_report_json(
    handle: *const ScriptHandle,
    kind: *const c_char,
) -> *mut c_char {
    let (Some(handle), Some(kind)) = (handle.as_ref(), read_str(kind)) else {
        return ptr::null_mut();
    };
    let kind = match ReportKind::parse_with_top_n(kind, handle.top_n) {
        Ok(kind) => kind,
        Err(e) => {
            log::warn!("{}", e);
            return ptr::null_mut();
        }
    };
    match guarded(|| serde_json::to_string(&handle.analysis.report(kind, None)).ok()) {
        Some(json) => into_c_string(json),
        None => ptr::null_mut(),
    }
}

/// Shared-scene count for a pair of names; 0 for unknown names or a bad handle.
///
/// # Safety
/// `handle` must be null or live; `a` and `b` null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn script_analysis_lookup(
    handle: *const ScriptHandle,
    a: *const c_char,
    b: *const c_char,
) -> u64 {
    match (handle.as_ref(), read_str(a), read_str(b)) {
        (Some(handle), Some(a), Some(b)) => handle.analysis.graph.lookup(a, b),
        _ => 0,
    }
}

/// # Safety
/// `s` must be null or a string returned by this library, freed once.
#[no_mangle]
pub unsafe extern "C" fn script_analysis_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn handle_lifecycle() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Scene_Characters,Scene_Dialogue").unwrap();
        writeln!(file, "\"Wade, Vanessa\",Wade loves Vanessa").unwrap();
        writeln!(file, "Wade,").unwrap();
        let path = CString::new(file.path().to_str().unwrap()).unwrap();

        unsafe {
            let handle = script_analysis_open(path.as_ptr());
            assert!(!handle.is_null());

            let wade = CString::new("wade").unwrap();
            let vanessa = CString::new("Vanessa").unwrap();
            assert_eq!(script_analysis_lookup(handle, wade.as_ptr(), vanessa.as_ptr()), 1);

            let kind = CString::new("scenes").unwrap();
            let json = script_analysis_report_json(handle, kind.as_ptr());
            assert!(!json.is_null());
            let text = CStr::from_ptr(json).to_str().unwrap().to_string();
            assert!(text.contains("\"Wade\""));
            script_analysis_free_string(json);

            let top = CString::new("top").unwrap();
            let json = script_analysis_report_json(handle, top.as_ptr());
            let text = CStr::from_ptr(json).to_str().unwrap().to_string();
            assert!(text.contains(&format!("{{\"top_pairs\":{{\"n\":{}}}}}", (*handle).top_n)));
            script_analysis_free_string(json);

            let bogus = CString::new("heatmap").unwrap();
            assert!(script_analysis_report_json(handle, bogus.as_ptr()).is_null());

            script_analysis_close(handle);
        }
    }

    #[test]
    fn panics_stop_at_the_boundary() {
        assert_eq!(guarded::<u8>(|| panic!("report failed")), None);
        assert_eq!(guarded(|| Some(7)), Some(7));
    }

    #[test]
    fn bad_inputs_are_null_or_zero() {
        let missing = CString::new("/definitely/not/here.csv").unwrap();
        unsafe {
            assert!(script_analysis_open(ptr::null()).is_null());
            assert!(script_analysis_open(missing.as_ptr()).is_null());
            assert_eq!(script_analysis_lookup(ptr::null(), ptr::null(), ptr::null()), 0);
            script_analysis_close(ptr::null_mut());
            script_analysis_free_string(ptr::null_mut());
        }
    }
}
