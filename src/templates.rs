use std::collections::BTreeMap;
use std::fs;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow, bail};
use camino::Utf8Path;
use regex::{Captures, Regex};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "templates"]
struct Templates;

/// Values substituted into `{{name}}` placeholders.
pub type TemplateVars = BTreeMap<&'static str, String>;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
    })
}

pub fn get_bytes(path: &str) -> Result<Vec<u8>> {
    let file = Templates::get(path).ok_or_else(|| anyhow!("embedded template `{}` missing", path))?;
    Ok(file.data.as_ref().to_vec())
}

pub fn get_string(path: &str) -> Result<String> {
    let bytes = get_bytes(path)?;
    std::str::from_utf8(&bytes)
        .with_context(|| format!("decoding embedded template `{}`", path))
        .map(|value| value.to_owned())
}

/// Embedded template paths below `prefix`, sorted.
pub fn list(prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = Templates::iter()
        .filter(|name| name.starts_with(prefix))
        .map(|name| name.into_owned())
        .collect();
    names.sort();
    names
}

/// Substitute every placeholder in `source`. A placeholder without a value is an error.
pub fn render(source: &str, vars: &TemplateVars) -> Result<String> {
    let mut missing = Vec::new();
    let rendered = placeholder().replace_all(source, |caps: &Captures<'_>| {
        let key = &caps[1];
        match vars.get(key) {
            Some(value) => value.clone(),
            None => {
                missing.push(key.to_owned());
                caps[0].to_owned()
            }
        }
    });

    if !missing.is_empty() {
        missing.sort();
        missing.dedup();
        bail!("template has no value for: {}", missing.join(", "));
    }

    Ok(rendered.into_owned())
}

pub fn render_embedded(path: &str, vars: &TemplateVars) -> Result<String> {
    let source = get_string(path)?;
    render(&source, vars).with_context(|| format!("rendering template `{}`", path))
}

pub fn write_to(destination: &Utf8Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating directory {}", parent))?;
    }
    fs::write(destination, bytes).with_context(|| format!("writing {}", destination))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> TemplateVars {
        pairs.iter().map(|(k, v)| (*k, (*v).to_owned())).collect()
    }

    #[test]
    fn substitutes_placeholders_with_optional_spacing() {
        let out = render("a {{x}} b {{ y }} c {{x}}", &vars(&[("x", "1"), ("y", "2")])).unwrap();
        assert_eq!(out, "a 1 b 2 c 1");
    }

    #[test]
    fn leaves_single_braces_alone() {
        let source = "target_sources({{name}} PRIVATE ${DSP_SOURCES})\nreturn {};";
        let out = render(source, &vars(&[("name", "Fuzz")])).unwrap();
        assert_eq!(out, "target_sources(Fuzz PRIVATE ${DSP_SOURCES})\nreturn {};");
    }

    #[test]
    fn unknown_placeholders_are_reported() {
        let err = render("{{known}} {{mystery}} {{mystery}}", &vars(&[("known", "k")])).unwrap_err();
        assert_eq!(err.to_string(), "template has no value for: mystery");
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = render("{{a}}", &vars(&[("a", "{{b}}")])).unwrap();
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn lists_embedded_juce_templates() {
        let names = list("juce/");
        assert_eq!(
            names,
            vec![
                "juce/CMakeLists.txt",
                "juce/Source/PluginEditor.cpp",
                "juce/Source/PluginEditor.h",
                "juce/Source/PluginProcessor.cpp",
                "juce/Source/PluginProcessor.h",
            ]
        );
    }

    #[test]
    fn missing_template_is_an_error() {
        assert!(get_string("juce/Nope.txt").is_err());
    }
}
