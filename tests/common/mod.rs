#![allow(dead_code)]

use chainrouter::{Context, Handler};

/// Append `s` to the context body, treating it as a string
pub fn append(ctx: &mut Context, s: &str) {
    let body = ctx.body.as_str().unwrap_or("").to_string();
    ctx.body = format!("{body}{s}").into();
}

/// Body as text ("" when not a string)
pub fn body(ctx: &Context) -> &str {
    ctx.body_text().unwrap_or("")
}

/// Handler that appends `s` to the body and continues
pub fn tag(s: &'static str) -> Handler {
    Handler::direct(move |ctx, next| {
        append(ctx, s);
        next.run(ctx)
    })
}

/// Handler that sets `status` and stops the chain
pub fn stop(status: u16) -> Handler {
    Handler::direct(move |ctx, _next| {
        ctx.status = status;
        Ok(())
    })
}

/// Handler that sets `status` and continues
pub fn status(status: u16) -> Handler {
    Handler::direct(move |ctx, next| {
        ctx.status = status;
        next.run(ctx)
    })
}

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write a YAML manifest to a temporary file that lives as long as the handle
    pub fn manifest(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("chainrouter_manifest_")
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}
