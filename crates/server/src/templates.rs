// Server-rendered pages. Templates are compiled into the binary so the
// server does not depend on its working directory.

use std::collections::HashMap;
use std::fmt::Write;

use axum::response::Html;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tera::{Context, Tera};

use crate::error::Result;

const DATE_FORMAT: &str = "%m/%d/%Y";
const DATETIME_FORMAT: &str = "%m/%d %H:%M";

pub fn load() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("project.html", include_str!("../templates/project.html")),
        (
            "quick_capture.html",
            include_str!("../templates/quick_capture.html"),
        ),
    ])?;
    tera.register_filter("strftime", date_filter(DATE_FORMAT));
    tera.register_filter("format_datetime", date_filter(DATETIME_FORMAT));
    Ok(tera)
}

pub fn render(tera: &Tera, name: &str, context: &Context) -> Result<Html<String>> {
    Ok(Html(tera.render(name, context)?))
}

fn date_filter(
    default_format: &'static str,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync {
    move |value: &Value, args: &HashMap<String, Value>| {
        let format = args
            .get("format")
            .and_then(Value::as_str)
            .unwrap_or(default_format);
        let formatted = value
            .as_str()
            .and_then(|raw| format_date(raw, format))
            .unwrap_or_default();
        Ok(Value::String(formatted))
    }
}

/// Reformats a stored date or timestamp for display.
///
/// Returns `None` for an empty input. Input that does not parse, or a format
/// chrono cannot render, yields the raw string unchanged.
pub fn format_date(raw: &str, format: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let Some(parsed) = parse_timestamp(raw) else {
        return Some(raw.to_string());
    };

    let mut out = String::new();
    if write!(out, "{}", parsed.format(format)).is_err() {
        return Some(raw.to_string());
    }
    Some(out)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if raw.contains('T') {
        // Stored timestamps carry an offset; show them in local time
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Local).naive_local());
        }
        return ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
