use anyhow::{Result, bail};

/// Length of the manufacturer and plugin codes required by the plugin formats.
pub const CODE_LEN: usize = 4;
const CODE_PAD: char = 'X';

/// Names and codes derived from the display name given to `vibevst init`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectIdentity {
    /// Identifier used for the CMake target and the project directory.
    pub project_name: String,
    /// Prefix of the generated C++ classes.
    pub class_name: String,
    /// Original input, shown in the plugin UI and product name.
    pub display_name: String,
    pub company_name: String,
    pub manufacturer_code: String,
    pub plugin_code: String,
}

impl ProjectIdentity {
    pub fn new(display_name: &str, company_name: &str) -> Result<Self> {
        let project_name = sanitize_project_name(display_name);
        if project_name.is_empty() {
            bail!(
                "project name `{}` has no letters, digits, or underscores to build an identifier from",
                display_name
            );
        }

        let class_name = class_name_for(&project_name);
        if class_name.is_empty() {
            bail!(
                "project name `{}` needs at least one letter or digit to form a class name",
                display_name
            );
        }

        Ok(Self {
            manufacturer_code: plugin_code_for(company_name),
            plugin_code: plugin_code_for(&project_name),
            project_name,
            class_name,
            display_name: display_name.to_owned(),
            company_name: company_name.to_owned(),
        })
    }
}

/// Keep only the characters that are safe in both a directory name and a C++ identifier.
pub fn sanitize_project_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

pub fn class_name_for(project_name: &str) -> String {
    project_name.chars().filter(|c| *c != '_').collect()
}

/// Derive a 4-character code: uppercase the first four characters, pad with `X`.
///
/// Uppercasing can expand a character (`ß` becomes `SS`), so the result is
/// truncated again after case mapping.
pub fn plugin_code_for(source: &str) -> String {
    let mut code: String = source
        .chars()
        .take(CODE_LEN)
        .flat_map(char::to_uppercase)
        .take(CODE_LEN)
        .collect();
    while code.chars().count() < CODE_LEN {
        code.push(CODE_PAD);
    }
    code
}
