use crate::identity::ProjectIdentity;
use crate::templates::TemplateVars;

/// Embedded template paired with its location inside the generated project.
pub const MANIFEST: [(&str, &str); 5] = [
    ("juce/CMakeLists.txt", "CMakeLists.txt"),
    ("juce/Source/PluginProcessor.cpp", "Source/PluginProcessor.cpp"),
    ("juce/Source/PluginProcessor.h", "Source/PluginProcessor.h"),
    ("juce/Source/PluginEditor.cpp", "Source/PluginEditor.cpp"),
    ("juce/Source/PluginEditor.h", "Source/PluginEditor.h"),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PluginKind {
    /// Stereo in, stereo out.
    Effect,
    /// Generates audio and takes MIDI input.
    Synth,
}

impl PluginKind {
    pub fn from_synth_flag(synth: bool) -> Self {
        if synth { PluginKind::Synth } else { PluginKind::Effect }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PluginKind::Effect => "Effect",
            PluginKind::Synth => "Synthesizer",
        }
    }

    /// Name shown by `vibevst templates`.
    pub fn template_name(&self) -> &'static str {
        match self {
            PluginKind::Effect => "Effect",
            PluginKind::Synth => "Synth",
        }
    }

    fn cmake_flag(&self) -> &'static str {
        match self {
            PluginKind::Effect => "FALSE",
            PluginKind::Synth => "TRUE",
        }
    }
}

/// Escape text placed between double quotes. CMake and C++ agree on `\\` and `\"`.
pub fn escape_string_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Values for the `{{name}}` placeholders. Free text only ever lands inside string literals.
pub fn template_vars(identity: &ProjectIdentity, kind: PluginKind) -> TemplateVars {
    let mut vars = TemplateVars::new();
    vars.insert("project_name", identity.project_name.clone());
    vars.insert("class_name", identity.class_name.clone());
    vars.insert("display_name", escape_string_literal(&identity.display_name));
    vars.insert("company_name", escape_string_literal(&identity.company_name));
    vars.insert("is_synth", kind.cmake_flag().to_owned());
    vars.insert("needs_midi", kind.cmake_flag().to_owned());
    vars.insert(
        "manufacturer_code",
        format!("\"{}\"", escape_string_literal(&identity.manufacturer_code)),
    );
    vars.insert("plugin_code", format!("\"{}\"", escape_string_literal(&identity.plugin_code)));
    vars
}
