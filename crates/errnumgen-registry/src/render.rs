//! Registry file rendering.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use errnumgen_core::LangGo;
use errnumgen_error::{Error, Result};

use crate::CONST_PREFIX;

const TEMPLATE: &str = include_str!("../templates/errnums.go.tmpl");

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").ok());

/// Render the registry file declaring `N_1 ..= N_<count>`.
pub fn render_registry(package: &str, count: u32) -> Result<String> {
    render_template(TEMPLATE, package, count)
}

fn constants(count: u32) -> String {
    let mut out = String::new();
    for i in 1..=count {
        let _ = writeln!(out, "\t{CONST_PREFIX}{i} = {i}");
    }
    out
}

fn render_template(template: &str, package: &str, count: u32) -> Result<String> {
    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        return Err(Error::template_failed("placeholder pattern failed to compile")
            .with_operation("render::render_template"));
    };

    let constants = constants(count);
    let mut unknown = Vec::new();
    let rendered = placeholder
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "package" => package.to_string(),
            "constants" => constants.clone(),
            other => {
                unknown.push(other.to_string());
                String::new()
            }
        })
        .into_owned();

    if !unknown.is_empty() {
        return Err(Error::template_failed(format!(
            "unknown placeholders: {}",
            unknown.join(", ")
        ))
        .with_operation("render::render_template"));
    }

    let valid = LangGo::parse(&rendered).is_some_and(|tree| !tree.root_node().has_error());
    if !valid {
        return Err(Error::template_failed("rendered registry does not parse")
            .with_operation("render::render_template")
            .with_context("package", package));
    }
    Ok(rendered)
}
