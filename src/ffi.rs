//! FFI interface for host pipelines written in other languages
//!
//! Strings cross the boundary as UTF-8. Results are owned by Rust and must be
//! released with `free_loader_result`.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::dom::Document;
use crate::loader::LoaderContext;
use crate::scrape::scrape;
use crate::selectors::SelectorMap;

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via free_loader_result
#[repr(C)]
pub struct LoaderResultFFI {
    /// Output (null-terminated), or null on failure
    pub output_ptr: *mut c_char,
    /// Error message if the call failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Run the loader on a source file's contents.
///
/// Fetches synchronously when the source names a URL.
///
/// # Arguments
/// * `source_ptr` - Pointer to the source text (UTF-8, not necessarily null-terminated)
/// * `source_len` - Length of the source in bytes
/// * `query` - Loader query string (null-terminated), or null for none
///
/// # Returns
/// LoaderResultFFI with output_ptr holding the generated module source, or error_ptr set
///
/// # Safety
/// - `source_ptr` must point to valid memory of at least `source_len` bytes
/// - `query` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_loader_result`
#[no_mangle]
pub unsafe extern "C" fn scrape_loader_transform(
    source_ptr: *const c_char,
    source_len: usize,
    query: *const c_char,
) -> LoaderResultFFI {
    crate::logging::init();

    let source = match read_utf8(source_ptr, source_len) {
        Ok(s) => s,
        Err(msg) => return make_error_result(msg),
    };

    let mut ctx = LoaderContext::new();
    if !query.is_null() {
        match CStr::from_ptr(query).to_str() {
            Ok(q) => ctx.query = Some(q.to_string()),
            Err(_) => return make_error_result("Invalid UTF-8 in query"),
        }
    }

    match ctx.run_blocking(source) {
        Ok(code) => make_ok_result(code),
        Err(e) => make_error_result(&e.to_string()),
    }
}

/// Scrape HTML with a JSON selector specification
///
/// Returns the extraction result as JSON.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `selectors_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_loader_result`
#[no_mangle]
pub unsafe extern "C" fn scrape_html_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    selectors_json: *const c_char,
) -> LoaderResultFFI {
    let html = match read_utf8(html_ptr, html_len) {
        Ok(s) => s,
        Err(msg) => return make_error_result(msg),
    };

    let selectors_str = if selectors_json.is_null() {
        return make_error_result("Selectors JSON is null");
    } else {
        match CStr::from_ptr(selectors_json).to_str() {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in selectors JSON"),
        }
    };

    let selectors = match serde_json::from_str::<serde_json::Value>(selectors_str) {
        Ok(value) => match SelectorMap::try_from(&value) {
            Ok(map) => map,
            Err(e) => return make_error_result(&e.to_string()),
        },
        Err(e) => {
            return make_error_result(&format!("Failed to parse selectors JSON: {}", e));
        }
    };

    let document = Document::parse(html);
    let result = match scrape(&selectors, &document.root()) {
        Ok(r) => r,
        Err(e) => return make_error_result(&e.to_string()),
    };

    match serde_json::to_string(&result) {
        Ok(json) => make_ok_result(json),
        Err(e) => make_error_result(&format!("Serialize error: {}", e)),
    }
}

/// Free a LoaderResultFFI returned by this library
///
/// # Safety
/// - `result` must have been returned by a function of this module
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_loader_result(result: LoaderResultFFI) {
    if !result.output_ptr.is_null() {
        drop(CString::from_raw(result.output_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

/// Borrow a UTF-8 string from a pointer and length; null or empty reads as ""
unsafe fn read_utf8<'a>(ptr: *const c_char, len: usize) -> Result<&'a str, &'static str> {
    if ptr.is_null() || len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(ptr as *const u8, len);
    std::str::from_utf8(slice).map_err(|_| "Invalid UTF-8 in input")
}

fn make_ok_result(output: String) -> LoaderResultFFI {
    match CString::new(output) {
        Ok(cstr) => LoaderResultFFI {
            output_ptr: cstr.into_raw(),
            error_ptr: ptr::null_mut(),
        },
        Err(_) => make_error_result("Result contains null bytes"),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> LoaderResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    LoaderResultFFI {
        output_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take(result: LoaderResultFFI) -> (Option<String>, Option<String>) {
        let read = |ptr: *mut c_char| {
            if ptr.is_null() {
                None
            } else {
                Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
            }
        };
        let output = read(result.output_ptr);
        let error = read(result.error_ptr);
        free_loader_result(result);
        (output, error)
    }

    #[test]
    fn test_transform_inline_html() {
        let source = "<ul><li>one</li><li> two </li></ul>";
        let query = CString::new("?items=li").unwrap();
        let (output, error) = unsafe {
            take(scrape_loader_transform(
                source.as_ptr() as *const c_char,
                source.len(),
                query.as_ptr(),
            ))
        };

        assert!(error.is_none());
        assert_eq!(
            output.unwrap(),
            "module.exports = {\n  \"items\": [\n    \"one\",\n    \"two\"\n  ]\n};"
        );
    }

    #[test]
    fn test_transform_missing_content() {
        let (output, error) = unsafe { take(scrape_loader_transform(ptr::null(), 0, ptr::null())) };
        assert!(output.is_none());
        assert!(error.unwrap().contains("html or url"));
    }

    #[test]
    fn test_scrape_html_json() {
        let html = r#"<div class="c"><h1>T</h1></div>"#;
        let selectors = CString::new(r#"{"c":[".c",{"h":"h1"}]}"#).unwrap();
        let (output, error) = unsafe {
            take(scrape_html_ffi(
                html.as_ptr() as *const c_char,
                html.len(),
                selectors.as_ptr(),
            ))
        };

        assert!(error.is_none());
        assert_eq!(output.unwrap(), r#"{"c":{"h":["T"]}}"#);
    }

    #[test]
    fn test_scrape_html_bad_selector() {
        let html = "<p>x</p>";
        let selectors = CString::new(r#"{"p":"p["}"#).unwrap();
        let (output, error) = unsafe {
            take(scrape_html_ffi(
                html.as_ptr() as *const c_char,
                html.len(),
                selectors.as_ptr(),
            ))
        };

        assert!(output.is_none());
        assert!(error.unwrap().contains("p["));
    }
}
