use indexmap::IndexMap;
use std::path::PathBuf;

/// File content plus fence language tag, keyed by path, in discovery order.
pub type FilesData = IndexMap<PathBuf, (String, String)>;

pub(crate) const SYSTEM_MESSAGE: &str =
    "You are an expert developer who carefully modifies code according to instructions.";

const RESPONSE_FORMAT: &str = r#"
RESPONSE FORMAT:
For any files you wish to return in your reply, they must have this format:

---<relative-file-path>---
```<filetype>
< file contents here >
```

Only return files that need to be changed. If a file doesn't need modification, don't include it in your response.
Ensure all code is syntactically correct and follows best practices for the respective language.
"#;

/// Build the single prompt sent to every provider: instructions first,
/// then each file as a `---<path>---` fenced block, then the response
/// format contract the parser depends on.
pub(crate) fn create_prompt(instructions: &str, files_data: &FilesData) -> String {
    let mut prompt = format!(
        "You are a skilled developer tasked with modifying multiple files according to specific instructions.\n\nINSTRUCTIONS:\n{instructions}\n\nFILES TO PROCESS:\n"
    );

    for (path, (content, language)) in files_data {
        let path = path.display();
        if language.is_empty() {
            prompt.push_str(&format!("\n---{path}---\n```\n{content}\n```\n"));
        } else {
            prompt.push_str(&format!("\n---{path}---\n```{language}\n{content}\n```\n"));
        }
    }

    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}
