/// Overview request sent while composing a context document
pub fn repo_overview(repo_name: &str) -> String {
    format!("Provide a high-level overview of the repository '{}' and its purpose.", repo_name)
}

/// Static overview used when the AI provider cannot answer
pub fn fallback_overview(repo_name: &str, language: Option<&str>) -> String {
    format!(
        "This repository contains code for {} in {}.",
        repo_name,
        language.unwrap_or(UNKNOWN_LANGUAGE)
    )
}

/// Summary request for a single file; `excerpt` may already be truncated
pub fn file_summary(repo: &str, path: &str, excerpt: &str, truncated: bool) -> String {
    let note = if truncated {
        "\n(The file was truncated for length.)"
    } else {
        ""
    };
    format!(
        "Summarize the purpose and key functionality of the file '{path}' \
         from the repository '{repo}' in a few sentences.{note}\n\n```\n{excerpt}\n```"
    )
}

/// Stand-in when the provider reports no primary language
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Purpose recorded for every important file of a module
pub const IMPORTANT_FILE_PURPOSE: &str = "Key file in module.";

/// Description recorded for a top-level directory
pub fn module_description(path: &str) -> String {
    format!("Module or directory at {}", path)
}
